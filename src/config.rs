//! Runtime configuration.

use std::path::PathBuf;

/// Where log output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogMode {
    /// Standard error, keeping stdout clean for JSON output
    Stderr,
    /// Append to a log file
    File,
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// SQLite database holding the prediction history
    pub db_path: PathBuf,

    /// Number of records fetched for history listings
    pub history_limit: usize,

    /// Fixed seed for the random source; entropy when unset
    pub seed: Option<u64>,

    pub log_mode: LogMode,

    pub log_file: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("cardiopredict.db"),
            history_limit: 50,
            seed: None,
            log_mode: LogMode::Stderr,
            log_file: PathBuf::from("cardiopredict.log"),
        }
    }
}

impl AppConfig {
    /// Load config overrides from environment (best-effort).
    ///
    /// Supported:
    /// - CARDIOPREDICT_DB_PATH
    /// - CARDIOPREDICT_HISTORY_LIMIT
    /// - CARDIOPREDICT_SEED
    /// - CARDIOPREDICT_LOG_MODE="stderr|file"
    /// - CARDIOPREDICT_LOG_FILE
    #[must_use]
    pub fn from_env_or_default() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`AppConfig::from_env_or_default`], reading from `lookup`.
    ///
    /// Malformed values are ignored and the default is kept.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(v) = lookup("CARDIOPREDICT_DB_PATH") {
            let v = v.trim();
            if !v.is_empty() {
                cfg.db_path = PathBuf::from(v);
            }
        }

        if let Some(v) = lookup("CARDIOPREDICT_HISTORY_LIMIT") {
            if let Ok(n) = v.trim().parse::<usize>() {
                if n > 0 {
                    cfg.history_limit = n;
                }
            }
        }

        if let Some(v) = lookup("CARDIOPREDICT_SEED") {
            if let Ok(seed) = v.trim().parse::<u64>() {
                cfg.seed = Some(seed);
            }
        }

        if let Some(v) = lookup("CARDIOPREDICT_LOG_MODE") {
            cfg.log_mode = match v.trim() {
                "file" => LogMode::File,
                _ => LogMode::Stderr,
            };
        }

        if let Some(v) = lookup("CARDIOPREDICT_LOG_FILE") {
            let v = v.trim();
            if !v.is_empty() {
                cfg.log_file = PathBuf::from(v);
            }
        }

        cfg
    }
}
