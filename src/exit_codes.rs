//! Stable exit codes for the harness binary.

/// All stages completed and the image was loaded.
pub const OK: i32 = 0;
/// Invalid usage or a failed stage (plan generation, build, or image load).
pub const FAILURE: i32 = 1;
/// Interrupted by SIGINT/SIGTERM; the workspace was released first.
pub const INTERRUPTED: i32 = 130;
