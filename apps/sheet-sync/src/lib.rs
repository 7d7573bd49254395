// Allow unwrap/expect in tests - tests should panic on unexpected errors
// Allow test-specific patterns and pedantic lints in test code
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::too_many_lines,
        clippy::default_trait_access,
        clippy::items_after_statements
    )
)]

//! Sheet Sync - Trade Log Spreadsheet Synchronizer
//!
//! Incrementally appends new rows from a trading bot's append-only SQLite
//! event log to a Google Sheets spreadsheet. Three streams are synced per
//! run, in order: fulfilled orders, their fragments, and balance snapshots.
//!
//! # Architecture (Clean Architecture + Hexagonal)
//!
//! ## Layers (inside → outside)
//!
//! - **Domain**: Pure types and derivations
//!   - `model`: Event log entities (`Order`, `Fragment`, `Balance`)
//!   - `sheet`: Sink value model (`CellValue`, `Formula`, sheet names)
//!   - `derivation`: Store entity → sink row mapping, including the
//!     symbolic formulas the sink evaluates itself
//!
//! - **Application**: Use cases and port definitions
//!   - `ports`: `EventStorePort`, `TableSinkPort`, `CursorProviderPort`
//!   - `use_cases`: One sync per stream plus the run orchestrator
//!
//! - **Infrastructure**: Adapters
//!   - `store`: SQLite event store (turso)
//!   - `sheets`: Google Sheets values API sink (reqwest)
//!
//! # Resumability
//!
//! There is no checkpoint store. Each stream derives its cursor from the
//! sink's own trailing data, so re-running after any partial failure
//! resumes exactly where the sink left off.

/// Domain layer - event log entities, sink value model, derivations.
pub mod domain;

/// Application layer - ports and sync use cases.
pub mod application;

/// Infrastructure layer - store and sink adapters.
pub mod infrastructure;

/// Runtime configuration.
pub mod config;

pub use application::ports::{
    CursorError, CursorProviderPort, EventStorePort, ResolvedCursor, SheetCursorProvider,
    SinkError, StoreError, TableSinkPort,
};
pub use application::use_cases::{RunReport, RunSyncUseCase, Stream, SyncError};
pub use domain::model::{Balance, EpochMillis, Fragment, Order, OrderStatus, Side};
pub use domain::sheet::{CellValue, Formula, SheetRow};
pub use infrastructure::sheets::{SheetsConfig, SheetsSink};
pub use infrastructure::store::SqliteEventStore;
