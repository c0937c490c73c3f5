//! Filesystem utilities for promptlab.
//!
//! Prompt files and config are replaced atomically; version histories and the
//! event log are append-only NDJSON files.

pub mod atomic;
pub mod ndjson;

pub use atomic::{atomic_write, atomic_write_file};
pub use ndjson::{append_json_line, read_json_lines};
