//! Command-line argument parsing.

use std::io::Read;
use std::path::PathBuf;

use chrono::NaiveDate;

use crate::domain::{HistoryFilter, PatientAttributes, RiskLevel};

/// Source of patient attributes for `predict`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Stdin,
    File(PathBuf),
}

/// Options shared by `predict` and `demo`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PredictOptions {
    pub ecg: bool,
    pub report: bool,
    pub save: bool,
}

/// A parsed command line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Predict {
        input: Input,
        options: PredictOptions,
    },
    Demo(PredictOptions),
    History {
        limit: Option<usize>,
        filter: HistoryFilter,
    },
    Show {
        id: String,
        report: bool,
    },
    Delete {
        id: String,
    },
    Help,
}

/// Read patient attributes as JSON from `input`.
///
/// # Errors
/// Returns `Io` if the input cannot be read and `Serialization` if it is not
/// a valid attribute object.
pub fn read_attributes(input: &Input) -> crate::Result<PatientAttributes> {
    let raw = match input {
        Input::Stdin => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
        Input::File(path) => std::fs::read_to_string(path)?,
    };
    parse_attributes(&raw)
}

/// Parse patient attributes from a JSON object.
///
/// # Errors
/// Returns `Serialization` on malformed or incomplete JSON.
pub fn parse_attributes(raw: &str) -> crate::Result<PatientAttributes> {
    Ok(serde_json::from_str(raw)?)
}

#[must_use]
pub fn usage() -> String {
    [
        "Usage: cardiopredict <command> [options]",
        "",
        "Commands:",
        "  predict --input <path|-> [--ecg] [--report] [--no-save]",
        "  demo [--ecg] [--report] [--no-save]",
        "  history [--limit N] [--risk LEVEL] [--min-age N] [--max-age N]",
        "          [--from YYYY-MM-DD] [--to YYYY-MM-DD]",
        "  show <id> [--report]",
        "  delete <id>",
    ]
    .join("\n")
}

/// Parse arguments, excluding the program name.
///
/// # Errors
/// Returns a message describing the problem, or the usage text.
pub fn parse_args<I>(args: I) -> Result<Command, String>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let Some(command) = args.next() else {
        return Err(usage());
    };

    match command.as_str() {
        "predict" => parse_predict(args),
        "demo" => parse_demo(args),
        "history" => parse_history(args),
        "show" => parse_show(args),
        "delete" => {
            let id = args.next().ok_or_else(usage)?;
            if args.next().is_some() {
                return Err(usage());
            }
            Ok(Command::Delete { id })
        }
        "-h" | "--help" | "help" => Ok(Command::Help),
        other => Err(format!("Unknown command: {other}\n\n{}", usage())),
    }
}

fn parse_predict(mut args: impl Iterator<Item = String>) -> Result<Command, String> {
    let mut input: Option<Input> = None;
    let mut options = PredictOptions {
        save: true,
        ..Default::default()
    };

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--input" | "-i" => {
                let v = args.next().ok_or_else(usage)?;
                input = Some(if v == "-" {
                    Input::Stdin
                } else {
                    Input::File(PathBuf::from(v))
                });
            }
            "--ecg" => options.ecg = true,
            "--report" => options.report = true,
            "--no-save" => options.save = false,
            "-h" | "--help" => return Ok(Command::Help),
            _ => return Err(format!("Unexpected argument: {arg}")),
        }
    }

    let input = input.ok_or_else(|| "predict requires --input <path|->".to_string())?;
    Ok(Command::Predict { input, options })
}

fn parse_demo(args: impl Iterator<Item = String>) -> Result<Command, String> {
    let mut options = PredictOptions {
        save: true,
        ..Default::default()
    };
    for arg in args {
        match arg.as_str() {
            "--ecg" => options.ecg = true,
            "--report" => options.report = true,
            "--no-save" => options.save = false,
            "-h" | "--help" => return Ok(Command::Help),
            _ => return Err(format!("Unexpected argument: {arg}")),
        }
    }
    Ok(Command::Demo(options))
}

fn parse_history(mut args: impl Iterator<Item = String>) -> Result<Command, String> {
    let mut limit = None;
    let mut filter = HistoryFilter::default();

    while let Some(arg) = args.next() {
        let mut value = || args.next().ok_or_else(|| format!("{arg} requires a value"));
        match arg.as_str() {
            "--limit" => {
                let n = value()?
                    .trim()
                    .parse::<usize>()
                    .map_err(|_| "--limit must be a positive integer".to_string())?;
                if n == 0 {
                    return Err("--limit must be a positive integer".to_string());
                }
                limit = Some(n);
            }
            "--risk" => {
                let level = value()?.parse::<RiskLevel>()?;
                filter.risk_level = Some(level);
            }
            "--min-age" => filter.min_age = Some(parse_age(&value()?)?),
            "--max-age" => filter.max_age = Some(parse_age(&value()?)?),
            "--from" => filter.date_from = Some(parse_date(&value()?)?),
            "--to" => filter.date_to = Some(parse_date(&value()?)?),
            "-h" | "--help" => return Ok(Command::Help),
            _ => return Err(format!("Unexpected argument: {arg}")),
        }
    }

    Ok(Command::History { limit, filter })
}

fn parse_show(args: impl Iterator<Item = String>) -> Result<Command, String> {
    let mut id = None;
    let mut report = false;
    for arg in args {
        match arg.as_str() {
            "--report" => report = true,
            _ if id.is_none() => id = Some(arg),
            _ => return Err(usage()),
        }
    }
    let id = id.ok_or_else(usage)?;
    Ok(Command::Show { id, report })
}

fn parse_age(v: &str) -> Result<f64, String> {
    v.trim()
        .parse::<f64>()
        .ok()
        .filter(|x| x.is_finite())
        .ok_or_else(|| format!("Invalid age: {v}"))
}

fn parse_date(v: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(v.trim(), "%Y-%m-%d").map_err(|_| format!("Invalid date (expected YYYY-MM-DD): {v}"))
}
