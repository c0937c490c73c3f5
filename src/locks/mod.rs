//! Lock files for promptlab.
//!
//! Two kinds of lock exist:
//! - the store lock (`store.lock`), held while any prompt, version history or
//!   selection is written
//! - a per-prompt run lock (`PROMPT-NNN.run.lock`), held while a rendered
//!   prompt is in flight so two processes cannot run the same prompt at once
//!
//! Locks are created with `create_new` semantics and contain JSON metadata
//! (`owner`, `pid`, `created_at`, `action`, and `prompt_id` for run locks).
//! They are released by an RAII [`LockGuard`]; a lock left behind by a
//! crashed process is reported as stale once it is older than
//! `lock_stale_minutes` and can be removed with `promptlab lock clear`.

mod guard;
mod metadata;
mod operations;
mod types;


pub use guard::LockGuard;
pub use metadata::LockMetadata;
pub(crate) use metadata::owner_string;
pub use operations::{acquire_run_lock, acquire_store_lock, clear_lock, list_locks};
pub use types::{LockInfo, LockType};
