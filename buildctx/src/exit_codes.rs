//! Stable exit codes for `buildctx` commands.

/// Command succeeded.
pub const OK: i32 = 0;
/// Invalid configuration or arguments, or any other unclassified error.
pub const INVALID: i32 = 1;
/// A required tool could not be installed.
pub const TOOL_INSTALL_FAILED: i32 = 2;
/// The build version could not be resolved.
pub const VERSION_FAILED: i32 = 3;
