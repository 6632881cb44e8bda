//! Offline workout tracker: sessions, category templates and JSON transfer.
//!
//! The crate keeps a strict separation:
//!
//! - **[`core`]**: Pure, deterministic logic (normalization, session and
//!   category edits, import/export envelopes, progress queries). No I/O.
//! - **[`io`]**: Side-effecting operations (key-value slots, config, export
//!   files). Failures here never corrupt in-memory state.
//!
//! [`tracker`] coordinates both: every edit is computed by `core` and then
//! persisted through `io`.

pub mod core;
pub mod exit_codes;
pub mod io;
pub mod logging;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod tracker;
