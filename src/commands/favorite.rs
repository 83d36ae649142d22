use super::find_or_report;
use crate::cli::FavoriteArgs;
use crate::core::data::PromptRecord;
use crate::core::operations::PromptOperations;
use crate::utils::output::print_success;
use anyhow::Result;

pub fn handle_favorite_command(ops: &PromptOperations, args: &FavoriteArgs) -> Result<()> {
    if let Some(record) = find_or_report(ops, &args.identifier)? {
        toggle(ops, &record)?;
    }
    Ok(())
}

pub fn toggle(ops: &PromptOperations, record: &PromptRecord) -> Result<PromptRecord> {
    let updated = ops.toggle_favorite(record.id())?;
    if updated.favorite {
        print_success(&format!("⭐ Added '{}' to favorites", updated.title));
    } else {
        print_success(&format!("Removed '{}' from favorites", updated.title));
    }
    Ok(updated)
}
