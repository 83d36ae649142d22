use super::find_or_report;
use crate::cli::DeleteArgs;
use crate::core::data::PromptRecord;
use crate::core::operations::PromptOperations;
use crate::utils::error::{FlowResult, handle_flow};
use crate::utils::format::format_datetime;
use crate::utils::interactive::prompt_yes_no;
use crate::utils::output::{OutputStyle, print_success};
use anyhow::Result;

pub fn handle_delete_command(ops: &PromptOperations, args: &DeleteArgs) -> Result<()> {
    if let Some(record) = find_or_report(ops, &args.identifier)? {
        delete_record(ops, &record, !args.force)?;
    }
    Ok(())
}

/// Remove the prompt's file. Returns false when the user declined.
pub fn delete_record(ops: &PromptOperations, record: &PromptRecord, confirm: bool) -> Result<bool> {
    if confirm {
        println!("{}", OutputStyle::header("Prompt to delete:"));
        OutputStyle::print_field_colored("Title", &record.title, OutputStyle::description);
        OutputStyle::print_field_colored("ID", record.id(), OutputStyle::muted);
        OutputStyle::print_field_colored("Created", &format_datetime(&record.created()), OutputStyle::muted);

        if !prompt_yes_no("Are you sure you want to delete this prompt?")? {
            handle_flow(FlowResult::Cancelled("Deletion cancelled".to_string()));
            return Ok(false);
        }
    }

    ops.delete(record.id())?;
    print_success(&format!("Deleted '{}'", record.title));
    Ok(true)
}
