//! Application layer - ports and sync use cases.

/// Driven ports: interfaces the engine consumes.
pub mod ports;

/// Sync use cases and the run orchestrator.
pub mod use_cases;
