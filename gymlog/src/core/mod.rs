//! Deterministic, pure logic for the fitness log.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! values, take the current time as an argument, and build new values instead
//! of mutating their inputs.

pub mod categories;
pub mod envelope;
pub mod error;
pub mod ids;
pub mod invariants;
pub mod normalize;
pub mod progress;
pub mod session;
pub mod timestamp;
pub mod types;
