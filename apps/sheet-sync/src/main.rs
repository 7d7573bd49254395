//! Sheet Sync Binary
//!
//! One incremental sync pass from the trading event log to the spreadsheet.
//!
//! # Usage
//!
//! ```bash
//! sheet-sync <database> <token-file> <spreadsheet-id>
//! ```
//!
//! # Environment Variables
//!
//! - `SHEET_SYNC_DB`: Event log database path (fallback for argument 1)
//! - `SHEET_SYNC_TOKEN_FILE`: Token file path (fallback for argument 2)
//! - `SHEET_SYNC_SPREADSHEET`: Spreadsheet id (fallback for argument 3)
//! - `SHEETS_BASE_URL`: Sheets API endpoint override (optional)
//! - `RUST_LOG`: Log level (default: info)

use std::sync::Arc;

use sheet_sync::application::ports::SheetCursorProvider;
use sheet_sync::application::use_cases::RunSyncUseCase;
use sheet_sync::config::AppConfig;
use sheet_sync::infrastructure::sheets::{SheetsConfig, SheetsSink};
use sheet_sync::infrastructure::store::SqliteEventStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = AppConfig::parse(&args)?;

    tracing::info!(
        database = %config.database.display(),
        spreadsheet = %config.spreadsheet_id,
        "Starting sync run"
    );

    let store = Arc::new(SqliteEventStore::open(&config.database).await?);

    let mut sheets_config = SheetsConfig::new(&config.spreadsheet_id, &config.token_file);
    if let Some(base_url) = &config.sheets_base_url {
        sheets_config = sheets_config.with_base_url(base_url);
    }
    let sink = Arc::new(SheetsSink::new(&sheets_config)?);
    let cursors = Arc::new(SheetCursorProvider::new(Arc::clone(&sink)));

    let run = RunSyncUseCase::new(store, sink, cursors);
    let report = run.execute().await?;

    if report.is_empty() {
        tracing::info!("Sink already up to date");
    } else {
        tracing::info!(
            orders = report.orders_rows,
            fragments = report.fragments_rows,
            balances = report.balances_rows,
            cells = report.cells_written,
            "Sync run complete"
        );
    }

    Ok(())
}

/// Load .env from the current directory or any ancestor directory.
fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    if let Ok(cwd) = std::env::current_dir() {
        let mut dir = cwd.as_path();
        while let Some(parent) = dir.parent() {
            let env_path = parent.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
                return;
            }
            dir = parent;
        }
    }
}

/// Initialize the tracing subscriber with environment filter.
///
/// Uses a static directive string that is a compile-time constant guaranteed to parse.
#[allow(clippy::expect_used)]
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(
                "sheet_sync=info"
                    .parse()
                    .expect("static directive 'sheet_sync=info' is valid"),
            ),
        )
        .init();
}
