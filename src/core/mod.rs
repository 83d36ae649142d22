//! Core business logic layer
//!
//! This module contains the prompt record model, the storage trait and the
//! operations hub the command handlers work through.

pub mod data;
pub mod operations;
pub mod traits;
