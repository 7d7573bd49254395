//! Runtime configuration.
//!
//! The binary takes its three required settings as positional arguments,
//! falling back to environment variables so containerized runs need no
//! argument plumbing:
//!
//! ```bash
//! sheet-sync <database> <token-file> <spreadsheet-id>
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Environment fallback for the database path argument.
const DB_ENV: &str = "SHEET_SYNC_DB";

/// Environment fallback for the token file argument.
const TOKEN_FILE_ENV: &str = "SHEET_SYNC_TOKEN_FILE";

/// Environment fallback for the spreadsheet id argument.
const SPREADSHEET_ENV: &str = "SHEET_SYNC_SPREADSHEET";

/// Optional override of the Sheets API endpoint.
const BASE_URL_ENV: &str = "SHEETS_BASE_URL";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required setting was given neither as an argument nor in the
    /// environment.
    #[error("missing {name}: pass it as {position} positional argument or set {env}")]
    Missing {
        /// What the setting configures.
        name: &'static str,
        /// Which positional argument carries it.
        position: &'static str,
        /// Environment variable fallback.
        env: &'static str,
    },
}

/// Parsed runtime configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Path to the event log database.
    pub database: PathBuf,
    /// Path to the authorized-user token file.
    pub token_file: PathBuf,
    /// Target spreadsheet id.
    pub spreadsheet_id: String,
    /// Sheets API endpoint override, unset in production.
    pub sheets_base_url: Option<String>,
}

impl AppConfig {
    /// Resolve config from positional arguments (binary name excluded),
    /// with environment variables filling in whatever is not passed.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` for any required setting absent from
    /// both sources.
    pub fn parse(args: &[String]) -> Result<Self, ConfigError> {
        let database = setting(args, 0, DB_ENV).ok_or(ConfigError::Missing {
            name: "event log database path",
            position: "the first",
            env: DB_ENV,
        })?;
        let token_file = setting(args, 1, TOKEN_FILE_ENV).ok_or(ConfigError::Missing {
            name: "token file path",
            position: "the second",
            env: TOKEN_FILE_ENV,
        })?;
        let spreadsheet_id = setting(args, 2, SPREADSHEET_ENV).ok_or(ConfigError::Missing {
            name: "spreadsheet id",
            position: "the third",
            env: SPREADSHEET_ENV,
        })?;

        Ok(Self {
            database: PathBuf::from(database),
            token_file: PathBuf::from(token_file),
            spreadsheet_id,
            sheets_base_url: std::env::var(BASE_URL_ENV).ok(),
        })
    }
}

/// Positional argument if present, environment variable otherwise.
fn setting(args: &[String], index: usize, env: &str) -> Option<String> {
    args.get(index)
        .cloned()
        .or_else(|| std::env::var(env).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn parses_positional_arguments() {
        let config =
            AppConfig::parse(&args(&["trading.db", "token.json", "spreadsheet-1"])).unwrap();

        assert_eq!(config.database, PathBuf::from("trading.db"));
        assert_eq!(config.token_file, PathBuf::from("token.json"));
        assert_eq!(config.spreadsheet_id, "spreadsheet-1");
    }

    #[test]
    fn missing_settings_name_their_fallback() {
        let err = AppConfig::parse(&args(&["trading.db", "token.json"]))
            .map(|_| ())
            .unwrap_err();

        assert!(err.to_string().contains(SPREADSHEET_ENV));
    }
}
