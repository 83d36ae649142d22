//! Command handlers behind the CLI subcommands and the interactive session

pub mod add;
pub mod configure;
pub mod copy;
pub mod delete;
pub mod edit;
pub mod export;
pub mod favorite;
pub mod list;
pub mod search;
pub mod session;
pub mod show;

use crate::core::data::PromptRecord;
use crate::core::operations::PromptOperations;
use crate::utils::error::{AppError, FlowResult, handle_flow};
use anyhow::Result;

/// Resolve an identifier, reporting a miss instead of failing
pub(crate) fn find_or_report(
    ops: &PromptOperations,
    identifier: &str,
) -> Result<Option<PromptRecord>> {
    match ops.resolve(identifier) {
        Ok(record) => Ok(Some(record)),
        Err(AppError::NotFound(_)) => {
            handle_flow(FlowResult::NotFound {
                item_type: "Prompt".to_string(),
                search_term: identifier.to_string(),
            });
            Ok(None)
        }
        Err(err) => Err(err.into()),
    }
}
