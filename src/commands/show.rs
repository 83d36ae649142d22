use super::find_or_report;
use crate::cli::ShowArgs;
use crate::core::data::PromptRecord;
use crate::core::operations::PromptOperations;
use crate::utils::output::OutputStyle;
use crate::utils::pagination::print_paged;
use anyhow::Result;

const PREVIEW_LINES: usize = 20;

pub fn handle_show_command(ops: &PromptOperations, args: &ShowArgs) -> Result<()> {
    if let Some(record) = find_or_report(ops, &args.identifier)? {
        show_record(ops, &record, args.full)?;
    }
    Ok(())
}

/// Details followed by the content, paged when it does not fit the terminal
pub fn show_record(ops: &PromptOperations, record: &PromptRecord, full: bool) -> Result<()> {
    OutputStyle::print_prompt_detailed(record);

    if full || ops.config().general.content_preview {
        println!();
        print_paged(&OutputStyle::format_content(record, full, PREVIEW_LINES))?;
    }
    Ok(())
}
