//! Exit code constants for the promptlab CLI.
//!
//! - 0: Success
//! - 1: User error (bad args, unknown prompt or version)
//! - 2: Execution failure (the language-model request failed)
//! - 3: Store failure (unreadable or corrupt store files)
//! - 4: Lock acquisition failure

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, unknown ids, or invalid input.
pub const USER_ERROR: i32 = 1;

/// Execution failure: the endpoint could not be reached or reported an error.
pub const EXECUTION_FAILURE: i32 = 2;

/// Store failure: I/O errors or store files that violate history invariants.
pub const STORE_FAILURE: i32 = 3;

/// Lock acquisition failure: the store or a run target is locked.
pub const LOCK_FAILURE: i32 = 4;
