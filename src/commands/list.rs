use crate::cli::ListArgs;
use crate::core::operations::{ListFilter, PromptOperations};
use crate::utils::output::DisplayFormatter;
use anyhow::Result;

pub fn handle_list_command(ops: &PromptOperations, args: &ListArgs) -> Result<()> {
    if args.stats {
        DisplayFormatter::print_stats(&ops.stats()?);
        return Ok(());
    }
    if args.tags {
        return DisplayFormatter::print_tags(&ops.all_tags()?);
    }
    if args.categories {
        return DisplayFormatter::print_categories(&ops.categories()?);
    }

    let filter = ListFilter {
        favorites_only: args.favorites,
        privacy: args.privacy.choice(),
        category: args.category.clone(),
    };
    let records = ops.list(&filter)?;
    DisplayFormatter::format_list(&records, &args.format, ops.config())
}
