use crate::cli::SearchArgs;
use crate::core::operations::PromptOperations;
use crate::utils::error::{FlowResult, handle_flow};
use crate::utils::output::DisplayFormatter;
use anyhow::Result;

pub fn handle_search_command(ops: &PromptOperations, args: &SearchArgs) -> Result<()> {
    let query = args.query_string();
    let outcome = ops.search(&query, args.favorites)?;

    if outcome.is_empty() {
        handle_flow(FlowResult::NotFound {
            item_type: "Prompts matching".to_string(),
            search_term: query,
        });
        return Ok(());
    }

    DisplayFormatter::print_search_results(&outcome, &query, ops.config());
    Ok(())
}
