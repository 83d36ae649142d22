//! promptvault - a command-line store for prompts
//!
//! Prompts are kept as one JSON file each under a public and a private root,
//! with metadata suggested by an analysis service or by local heuristics.

pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod store;
pub mod suggest;
pub mod utils;

pub use core::{
    data::{PromptCollection, PromptRecord, PromptStats},
    operations::{ListFilter, PromptOperations},
    traits::PromptStore,
};
pub use store::FileStore;
pub use suggest::{MetadataSuggestion, Suggester};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
