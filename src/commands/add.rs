use crate::cli::AddArgs;
use crate::core::data::PromptRecord;
use crate::core::operations::PromptOperations;
use crate::suggest::MetadataSuggestion;
use crate::utils::error::{AppError, FlowResult, handle_flow, report_error};
use crate::utils::format::{format_tags_comma, parse_tag_list};
use crate::utils::interactive::{
    open_editor, prompt_input, prompt_input_with_autocomplete, prompt_multiline,
    prompt_with_default, prompt_yes_no_default, read_piped_stdin,
};
use crate::utils::output::{OutputStyle, print_success};
use anyhow::{Context, Result};
use std::io::IsTerminal;

/// Metadata given up front that takes precedence over the suggestion
#[derive(Debug, Default, Clone)]
pub struct MetadataOverrides {
    pub title: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub description: Option<String>,
    pub private: Option<bool>,
}

impl MetadataOverrides {
    pub fn from_args(args: &AddArgs) -> Self {
        Self {
            title: args.title.clone(),
            category: args.category.clone(),
            tags: args.tags.as_deref().map(parse_tag_list),
            description: args.description.clone(),
            private: args.privacy.choice(),
        }
    }

    pub fn apply(&self, suggestion: &mut MetadataSuggestion) {
        if let Some(title) = self.title.as_ref().filter(|t| !t.trim().is_empty()) {
            suggestion.title = title.trim().to_string();
        }
        if let Some(category) = self.category.as_ref().filter(|c| !c.trim().is_empty()) {
            suggestion.category = category.trim().to_string();
        }
        if let Some(tags) = &self.tags {
            suggestion.tags = tags.clone();
        }
        if let Some(description) = &self.description {
            suggestion.description = description.clone();
        }
        if let Some(private) = self.private {
            suggestion.private = private;
        }
    }
}

enum Review {
    Save,
    Edit,
    Cancel,
}

pub async fn handle_add_command(ops: &PromptOperations, args: &AddArgs) -> Result<()> {
    let Some(content) = read_content(ops, args)? else {
        handle_flow(FlowResult::Cancelled("Empty prompt, nothing saved".to_string()));
        return Ok(());
    };

    let review = !args.yes && std::io::stdin().is_terminal();
    add_prompt(ops, content, &MetadataOverrides::from_args(args), review).await?;
    Ok(())
}

fn read_content(ops: &PromptOperations, args: &AddArgs) -> Result<Option<String>> {
    let content = if let Some(content) = &args.content {
        content.clone()
    } else if let Some(path) = &args.file {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read prompt file {}", path.display()))?
    } else if args.editor {
        open_editor(None, Some(ops.config().general.editor.as_str()))?
    } else if let Some(piped) = read_piped_stdin()? {
        piped
    } else {
        prompt_multiline(&format!(
            "{} {}",
            OutputStyle::label("Prompt content"),
            OutputStyle::muted("(Enter to submit, Ctrl+J for a new line)")
        ))?
    };

    Ok(Some(content).filter(|c| !c.trim().is_empty()))
}

/// Suggest metadata for `content`, let the user review it and store the result.
/// Returns `None` when the user cancels.
pub async fn add_prompt(
    ops: &PromptOperations,
    content: String,
    overrides: &MetadataOverrides,
    review: bool,
) -> Result<Option<PromptRecord>> {
    let suggester = ops.suggester();
    if suggester.is_online() {
        println!("🤖 {}", OutputStyle::info("Analyzing prompt..."));
    }
    let mut suggestion = suggester.suggest(&content).await;
    overrides.apply(&mut suggestion);

    loop {
        OutputStyle::print_suggestion(&suggestion);

        if review {
            match ask_review()? {
                Review::Save => {}
                Review::Edit => {
                    edit_suggestion(ops, &mut suggestion)?;
                    continue;
                }
                Review::Cancel => {
                    handle_flow(FlowResult::Cancelled("Prompt not saved".to_string()));
                    return Ok(None);
                }
            }
        }

        let record = suggestion.clone().into_record(&content);
        match ops.add(&record) {
            Ok(()) => {
                print_success(&format!(
                    "Saved '{}' ({}) as {}",
                    record.title,
                    record.short_id(),
                    if record.private { "private" } else { "public" }
                ));
                return Ok(Some(record));
            }
            Err(err @ AppError::Validation(_)) if review => report_error(&err),
            Err(err) => return Err(err.into()),
        }
    }
}

fn ask_review() -> Result<Review> {
    loop {
        let answer = prompt_input(&format!(
            "\n{} ",
            OutputStyle::label("Save this prompt? [Y]es / [e]dit / [n]o:")
        ))?;
        match answer.to_lowercase().as_str() {
            "" | "y" | "yes" => return Ok(Review::Save),
            "e" | "edit" => return Ok(Review::Edit),
            "n" | "no" => return Ok(Review::Cancel),
            _ => println!("Please enter 'y', 'e' or 'n'"),
        }
    }
}

fn edit_suggestion(ops: &PromptOperations, suggestion: &mut MetadataSuggestion) -> Result<()> {
    suggestion.title = prompt_with_default(&OutputStyle::label("Title").to_string(), &suggestion.title)?;

    let categories = ops.categories()?;
    let category = prompt_input_with_autocomplete(
        &format!(
            "{} [{}]: ",
            OutputStyle::label("Category"),
            OutputStyle::muted(&suggestion.category)
        ),
        &categories,
    )?;
    if !category.trim().is_empty() {
        suggestion.category = category.trim().to_string();
    }

    let tags = prompt_with_default(
        &OutputStyle::label("Tags (comma separated)").to_string(),
        &format_tags_comma(&suggestion.tags),
    )?;
    suggestion.tags = parse_tag_list(&tags);

    suggestion.description = prompt_with_default(
        &OutputStyle::label("Description").to_string(),
        &suggestion.description,
    )?;
    suggestion.private = prompt_yes_no_default(
        &OutputStyle::label("Private?").to_string(),
        suggestion.private,
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use tempfile::TempDir;

    fn operations() -> (TempDir, PromptOperations) {
        let temp = TempDir::new().unwrap();
        let mut config = Config::default();
        config.general.prompts_dir = temp.path().join("prompts");
        config.ai.enabled = false;
        (temp, PromptOperations::new(config))
    }

    #[test]
    fn test_overrides_take_precedence() {
        let mut suggestion = MetadataSuggestion::fallback(
            "# Suggested\nBody",
            &AppError::ServiceUnavailable("offline".to_string()),
        );
        let overrides = MetadataOverrides {
            title: Some("Mine".to_string()),
            category: Some("  ".to_string()),
            tags: Some(vec!["x".to_string()]),
            description: None,
            private: Some(true),
        };
        overrides.apply(&mut suggestion);

        assert_eq!(suggestion.title, "Mine");
        assert_eq!(suggestion.category, "general");
        assert_eq!(suggestion.tags, vec!["x"]);
        assert!(suggestion.private);
    }

    #[tokio::test]
    async fn test_add_without_review_stores_fallback_metadata() {
        let (_temp, ops) = operations();
        let record = add_prompt(
            &ops,
            "# Title\nBody text".to_string(),
            &MetadataOverrides::default(),
            false,
        )
        .await
        .unwrap()
        .unwrap();

        assert_eq!(record.title, "Title");
        assert_eq!(record.content(), "# Title\nBody text");
        let stored = ops.resolve(record.id()).unwrap();
        assert_eq!(stored, record);
    }

    #[tokio::test]
    async fn test_add_private_override_lands_in_private_root() {
        let (_temp, ops) = operations();
        let overrides = MetadataOverrides {
            private: Some(true),
            ..Default::default()
        };
        let record = add_prompt(&ops, "Secret body".to_string(), &overrides, false)
            .await
            .unwrap()
            .unwrap();

        let path = ops.store().path_for(&record);
        assert!(path.starts_with(ops.config().private_dir()));
        assert!(path.exists());
    }
}
