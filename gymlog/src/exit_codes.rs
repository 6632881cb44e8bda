//! Stable exit codes for gymlog CLI commands.

/// Command succeeded.
pub const OK: i32 = 0;
/// Command failed: bad arguments, rejected edit, unreadable config or files.
pub const INVALID: i32 = 1;
/// `gymlog import` rejected the document (bad JSON, shape or schema version).
pub const IMPORT_REJECTED: i32 = 2;
