use super::find_or_report;
use crate::cli::EditArgs;
use crate::core::data::{DEFAULT_CATEGORY, PromptRecord, validate_temperature};
use crate::core::operations::PromptOperations;
use crate::utils::error::{AppError, report_error};
use crate::utils::format::{format_tags_comma, parse_tag_list};
use crate::utils::interactive::{prompt_input, prompt_with_default, prompt_yes_no_default};
use crate::utils::output::{OutputStyle, print_success};
use anyhow::Result;

/// Metadata changes to apply to a stored prompt. Content is never edited.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MetadataEdit {
    pub title: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub description: Option<String>,
    pub private: Option<bool>,
    pub model: Option<String>,
    pub temperature: Option<f64>,
    pub max_tokens: Option<String>,
    pub note: Option<String>,
}

impl MetadataEdit {
    pub fn from_args(args: &EditArgs) -> Self {
        Self {
            title: args.title.clone(),
            category: args.category.clone(),
            tags: args.tags.as_deref().map(parse_tag_list),
            description: args.description.clone(),
            private: args.privacy.choice(),
            model: args.model.clone(),
            temperature: args.temperature,
            max_tokens: args.max_tokens.clone(),
            note: args.note.clone(),
        }
    }

    pub fn apply(self, record: &mut PromptRecord) {
        if let Some(title) = self.title {
            record.title = title.trim().to_string();
        }
        if let Some(category) = self.category {
            let category = category.trim();
            record.category = if category.is_empty() {
                DEFAULT_CATEGORY.to_string()
            } else {
                category.to_string()
            };
        }
        if let Some(tags) = self.tags {
            record.set_tags(tags);
        }
        if let Some(description) = self.description {
            record.description = description;
        }
        if let Some(private) = self.private {
            record.private = private;
        }

        let notes = &mut record.technical_notes;
        if let Some(model) = self.model {
            notes.recommended_model = Some(model).filter(|m| !m.trim().is_empty());
        }
        if let Some(temperature) = self.temperature {
            notes.temperature = Some(temperature);
        }
        if let Some(tokens) = self.max_tokens {
            notes.max_tokens = Some(tokens).filter(|t| !t.trim().is_empty());
        }
        if let Some(note) = self.note.filter(|n| !n.trim().is_empty()) {
            notes.additional_notes.push(note);
        }
    }
}

pub fn handle_edit_command(ops: &PromptOperations, args: &EditArgs) -> Result<()> {
    let Some(record) = find_or_report(ops, &args.identifier)? else {
        return Ok(());
    };

    if args.is_interactive() {
        edit_interactively(ops, &record)?;
        return Ok(());
    }

    let edit = MetadataEdit::from_args(args);
    if let Some(temperature) = edit.temperature {
        validate_temperature(temperature)?;
    }
    let updated = ops.update(record.id(), |r| edit.apply(r))?;
    print_success(&format!("Updated '{}'", updated.title));
    Ok(())
}

/// Prompt for each field, keeping the current value on empty input.
/// Invalid answers are reported and asked again.
pub fn edit_interactively(ops: &PromptOperations, record: &PromptRecord) -> Result<PromptRecord> {
    println!("{}", OutputStyle::title(&format!("✏️  Editing '{}'", record.title)));
    println!(
        "{}",
        OutputStyle::muted(&format!(
            "Press Enter to keep the current value, '{}' to clear it",
            CLEAR_MARKER
        ))
    );

    loop {
        let edit = prompt_edit(record)?;
        match ops.update(record.id(), |r| edit.apply(r)) {
            Ok(updated) => {
                print_success(&format!("Updated '{}'", updated.title));
                return Ok(updated);
            }
            Err(err @ AppError::Validation(_)) => report_error(&err),
            Err(err) => return Err(err.into()),
        }
    }
}

/// Typed into a text field to empty it
const CLEAR_MARKER: &str = "-";

/// Raw answers from the interactive editor. Empty means keep.
#[derive(Debug, Default)]
struct EditAnswers {
    title: String,
    category: String,
    tags: String,
    description: String,
    model: String,
    temperature: Option<f64>,
    max_tokens: String,
    note: String,
    private: bool,
}

/// `current` on empty input, nothing on the clear marker
fn keep_or_clear(answer: &str, current: &str) -> String {
    match answer.trim() {
        "" => current.to_string(),
        CLEAR_MARKER => String::new(),
        other => other.to_string(),
    }
}

impl EditAnswers {
    fn into_edit(self, record: &PromptRecord) -> MetadataEdit {
        let notes = &record.technical_notes;
        let keep = |answer: &str, current: &str| match answer.trim() {
            "" => current.to_string(),
            other => other.to_string(),
        };
        MetadataEdit {
            title: Some(keep(&self.title, &record.title)),
            category: Some(keep(&self.category, &record.category)),
            tags: Some(parse_tag_list(&keep_or_clear(
                &self.tags,
                &format_tags_comma(&record.tags),
            ))),
            description: Some(keep_or_clear(&self.description, &record.description)),
            private: Some(self.private),
            model: Some(keep_or_clear(
                &self.model,
                notes.recommended_model.as_deref().unwrap_or(""),
            )),
            temperature: self.temperature,
            max_tokens: Some(keep_or_clear(
                &self.max_tokens,
                notes.max_tokens.as_deref().unwrap_or(""),
            )),
            note: Some(self.note),
        }
    }
}

fn ask(label: &str, current: &str) -> Result<String> {
    let prompt = if current.is_empty() {
        format!("{}: ", OutputStyle::label(label))
    } else {
        format!("{} [{}]: ", OutputStyle::label(label), OutputStyle::muted(current))
    };
    prompt_input(&prompt)
}

fn prompt_edit(record: &PromptRecord) -> Result<MetadataEdit> {
    let notes = &record.technical_notes;

    let answers = EditAnswers {
        title: ask("Title", &record.title)?,
        category: ask("Category", &record.category)?,
        tags: ask("Tags (comma separated)", &format_tags_comma(&record.tags))?,
        description: ask("Description", &record.description)?,
        model: ask("Model", notes.recommended_model.as_deref().unwrap_or(""))?,
        temperature: prompt_temperature(notes.temperature)?,
        max_tokens: ask("Max tokens", notes.max_tokens.as_deref().unwrap_or(""))?,
        note: prompt_input(&format!("{}: ", OutputStyle::label("Add note")))?,
        private: prompt_yes_no_default(
            &OutputStyle::label("Private?").to_string(),
            record.private,
        )?,
    };
    Ok(answers.into_edit(record))
}

fn prompt_temperature(current: Option<f64>) -> Result<Option<f64>> {
    let current_text = current.map(|t| t.to_string()).unwrap_or_default();
    loop {
        let answer =
            prompt_with_default(&OutputStyle::label("Temperature").to_string(), &current_text)?;
        if answer.is_empty() {
            return Ok(None);
        }
        match answer.parse::<f64>() {
            Ok(value) => match validate_temperature(value) {
                Ok(()) => return Ok(Some(value)),
                Err(err) => report_error(&err),
            },
            Err(_) => report_error(&AppError::Validation(format!(
                "'{}' is not a number",
                answer
            ))),
        }
    }
}
