//! Domain layer - event log entities, sink value model, and derivations.
//!
//! Everything in this layer is pure: no I/O, no clocks, no network.

/// Event log entities as they exist in the trading bot's store.
pub mod model;

/// Sink-side value model (cells, rows, formula templates).
pub mod sheet;

/// Derived sink rows computed from store entities.
pub mod derivation;
