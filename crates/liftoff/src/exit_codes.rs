//! Exit codes for the CLI

/// Success
pub const SUCCESS: i32 = 0;

/// Any failure, including cancellation
pub const ERROR: i32 = 1;
