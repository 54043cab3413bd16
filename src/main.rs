//! CardioPredict: multi-model cardiovascular risk assessment.
//!
//! Main entry point for the command-line application.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cardiopredict::adapters::sanitize::SanitizingMakeWriter;
use cardiopredict::adapters::{ChaChaSource, SqliteStore};
use cardiopredict::application::{
    render_record_report, render_report, PredictionService, PredictionWorker,
};
use cardiopredict::cli::{self, Command, PredictOptions};
use cardiopredict::config::{AppConfig, LogMode};
use cardiopredict::domain::{PatientAttributes, PredictionRecord};

type Service = PredictionService<SqliteStore, ChaChaSource>;

fn main() -> Result<()> {
    let command = match cli::parse_args(std::env::args().skip(1)) {
        Ok(command) => command,
        Err(message) => {
            eprintln!("{message}");
            std::process::exit(2);
        }
    };
    if command == Command::Help {
        println!("{}", cli::usage());
        return Ok(());
    }

    let config = AppConfig::from_env_or_default();

    // Logs never go to stdout: it carries the JSON or report output.
    let (writer, _guard) = match config.log_mode {
        LogMode::File => {
            if let Some(parent) = config.log_file.parent() {
                // Best-effort: a missing directory surfaces when opening the file.
                let _ = std::fs::create_dir_all(parent);
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&config.log_file)
                .with_context(|| format!("Failed to open log file {}", config.log_file.display()))?;
            tracing_appender::non_blocking(file)
        }
        LogMode::Stderr => tracing_appender::non_blocking(std::io::stderr()),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(SanitizingMakeWriter::new(writer)))
        .init();

    let store = SqliteStore::new(&config.db_path)
        .with_context(|| format!("Failed to open database {}", config.db_path.display()))?;
    let rng = match config.seed {
        Some(seed) => {
            tracing::info!("Using fixed random seed");
            ChaChaSource::from_seed(seed)
        }
        None => ChaChaSource::from_entropy(),
    };
    let service = Arc::new(PredictionService::new(Arc::new(store), rng));

    run(command, &service, &config)
}

fn run(command: Command, service: &Arc<Service>, config: &AppConfig) -> Result<()> {
    match command {
        Command::Predict { input, options } => {
            let attributes = cli::read_attributes(&input).context("Failed to load patient attributes")?;
            predict(service, attributes, &options)
        }
        Command::Demo(options) => predict(service, PatientAttributes::default(), &options),
        Command::History { limit, filter } => {
            let limit = limit.unwrap_or(config.history_limit);
            let records = service.history(&filter, limit)?;
            tracing::info!("Loaded {} records", records.len());
            print_json(&records)
        }
        Command::Show { id, report } => {
            let record = service
                .find(&id)?
                .with_context(|| format!("No prediction with id {id}"))?;
            if report {
                print!("{}", render_record_report(&record));
                Ok(())
            } else {
                print_json(&record)
            }
        }
        Command::Delete { id } => {
            if !service.delete(&id)? {
                anyhow::bail!("No prediction with id {id}");
            }
            Ok(())
        }
        Command::Help => {
            println!("{}", cli::usage());
            Ok(())
        }
    }
}

fn predict(service: &Arc<Service>, attributes: PatientAttributes, options: &PredictOptions) -> Result<()> {
    if options.save {
        let handle = PredictionWorker::spawn(Arc::clone(service), attributes, options.ecg);
        let record = handle.wait().map_err(anyhow::Error::msg)?;
        if options.report {
            print!("{}", render_record_report(&record));
            return Ok(());
        }
        return print_json(&record);
    }

    let result = service.evaluate(&attributes, options.ecg)?;
    if options.report {
        print!("{}", render_report(&attributes, &result));
        Ok(())
    } else {
        print_json(&PredictionRecord::new(attributes, options.ecg, &result))
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
