use super::find_or_report;
use crate::cli::CopyArgs;
use crate::core::data::PromptRecord;
use crate::core::operations::PromptOperations;
use crate::utils::clipboard::copy_to_clipboard;
use crate::utils::output::{OutputStyle, print_warning};
use anyhow::Result;

pub fn handle_copy_command(ops: &PromptOperations, args: &CopyArgs) -> Result<()> {
    let Some(record) = find_or_report(ops, &args.identifier)? else {
        return Ok(());
    };

    if args.print {
        println!("{}", record.content());
        ops.record_use(record.id())?;
        return Ok(());
    }

    use_prompt(ops, &record)
}

/// Copy the content to the clipboard and count the use.
/// Falls back to printing when no clipboard tool works.
pub fn use_prompt(ops: &PromptOperations, record: &PromptRecord) -> Result<()> {
    match copy_to_clipboard(record.content()) {
        Ok(()) => OutputStyle::print_clipboard_success(),
        Err(err) => {
            print_warning(&format!("{:#}", err));
            println!("{}", record.content());
        }
    }

    let updated = ops.record_use(record.id())?;
    println!(
        "{}",
        OutputStyle::muted(&format!("Used {} time(s)", updated.usage_count))
    );
    Ok(())
}
