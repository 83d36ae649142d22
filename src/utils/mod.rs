//! Shared helpers: errors, terminal output and input, formatting, search and export

pub mod clipboard;
pub mod error;
pub mod export;
pub mod format;
pub mod interactive;
pub mod output;
pub mod pagination;
pub mod search;

pub use error::{AppError, AppResult};
pub use output::{OutputStyle, print_success, print_warning};
