//! Configuration model for promptlab.
//!
//! This module defines the Config struct that represents `.promptlab/config.yaml`.
//! Unknown fields are ignored, every field has a default, and values are
//! validated on load.
//!
//! The API credential is resolved once per session into a
//! [`ResolvedExecution`] and handed to the execution client; nothing else
//! reads or writes it.

mod model;
mod operations;
pub mod types;


pub use model::Config;
pub use types::{ExecutionSettings, ResolvedExecution};
