use super::find_or_report;
use crate::cli::{ExportArgs, ExportFormat};
use crate::core::data::PromptRecord;
use crate::core::operations::PromptOperations;
use crate::utils::clipboard::copy_to_clipboard;
use crate::utils::export::{project_setup_steps, render};
use crate::utils::output::{OutputStyle, print_success};
use anyhow::{Context, Result};
use std::path::Path;

pub fn handle_export_command(ops: &PromptOperations, args: &ExportArgs) -> Result<()> {
    let Some(record) = find_or_report(ops, &args.identifier)? else {
        return Ok(());
    };
    export_record(ops, &record, args.format, args.output.as_deref(), args.copy)
}

pub fn export_record(
    ops: &PromptOperations,
    record: &PromptRecord,
    format: ExportFormat,
    output: Option<&Path>,
    copy: bool,
) -> Result<()> {
    let text = render(record, format)?;

    if let Some(path) = output {
        std::fs::write(path, &text)
            .with_context(|| format!("Failed to write export to {}", path.display()))?;
        print_success(&format!("Exported '{}' to {}", record.title, path.display()));
    }

    if copy {
        copy_to_clipboard(&text)?;
        OutputStyle::print_clipboard_success();
        if format == ExportFormat::Project {
            println!("\n{}", OutputStyle::header("Next steps:"));
            for (i, step) in project_setup_steps(&record.title).iter().enumerate() {
                println!("  {}. {}", i + 1, step);
            }
        }
    }

    if output.is_none() && !copy {
        println!("{}", text);
    }

    ops.record_use(record.id())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use tempfile::TempDir;

    #[test]
    fn test_export_to_file_counts_use() {
        let temp = TempDir::new().unwrap();
        let mut config = Config::default();
        config.general.prompts_dir = temp.path().join("prompts");
        let ops = PromptOperations::new(config);

        let record = PromptRecord::new("Coach", "Be a coach.");
        ops.add(&record).unwrap();

        let out = temp.path().join("coach.md");
        export_record(&ops, &record, ExportFormat::Markdown, Some(out.as_path()), false).unwrap();

        let written = std::fs::read_to_string(&out).unwrap();
        assert!(written.starts_with("# Coach"));
        assert_eq!(ops.resolve(record.id()).unwrap().usage_count, 1);
    }
}
