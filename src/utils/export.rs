//! Render a prompt for use outside the store

use crate::cli::ExportFormat;
use crate::core::data::PromptRecord;
use crate::utils::error::{AppError, AppResult};
use crate::utils::format::format_tags_comma;

const RULE_WIDTH: usize = 70;

pub fn render(record: &PromptRecord, format: ExportFormat) -> AppResult<String> {
    match format {
        ExportFormat::Project => Ok(project_instructions(record)),
        ExportFormat::Markdown => Ok(markdown(record)),
        ExportFormat::Json => serde_json::to_string_pretty(record)
            .map_err(|e| AppError::System(format!("Failed to serialize prompt: {}", e))),
    }
}

/// The prompt wrapped as a block of project custom instructions
pub fn project_instructions(record: &PromptRecord) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut lines = vec![
        rule.clone(),
        "CUSTOM INSTRUCTIONS FOR CLAUDE PROJECT".to_string(),
        rule.clone(),
        String::new(),
        record.content().to_string(),
        String::new(),
        rule.clone(),
        format!("Source: {}", record.title),
        format!("Category: {}", record.category),
    ];
    if let Some(purpose) = record.discovery.purpose.as_deref().filter(|p| !p.is_empty()) {
        lines.push(format!("Purpose: {}", purpose));
    }
    lines.push(rule);
    lines.join("\n")
}

/// Steps printed after the project block has been copied
pub fn project_setup_steps(title: &str) -> Vec<String> {
    vec![
        "Go to Claude.ai".to_string(),
        "Click 'Projects' in the left sidebar".to_string(),
        "Click '+ New Project'".to_string(),
        format!("Name your project (e.g., '{}')", title),
        "Click 'Set custom instructions'".to_string(),
        "Paste the copied content".to_string(),
        "Save and start a new chat in that project".to_string(),
    ]
}

pub fn markdown(record: &PromptRecord) -> String {
    let mut out = format!("# {}\n\n", record.title);

    out.push_str(&format!("- **Category:** {}\n", record.category));
    if !record.tags.is_empty() {
        out.push_str(&format!("- **Tags:** {}\n", format_tags_comma(&record.tags)));
    }
    if !record.description.is_empty() {
        out.push_str(&format!("- **Use case:** {}\n", record.description));
    }
    let notes = &record.technical_notes;
    if let Some(model) = &notes.recommended_model {
        out.push_str(&format!("- **Model:** {}\n", model));
    }
    if let Some(temperature) = notes.temperature {
        out.push_str(&format!("- **Temperature:** {}\n", temperature));
    }
    if let Some(tokens) = &notes.max_tokens {
        out.push_str(&format!("- **Max tokens:** {}\n", tokens));
    }
    for (label, value) in record.discovery.fields() {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            out.push_str(&format!("- **{}:** {}\n", label, value));
        }
    }

    out.push_str("\n## Prompt\n\n");
    out.push_str(record.content());
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> PromptRecord {
        let mut record = PromptRecord::new("Focus Coach", "You are a focus coach.");
        record.category = "Personal Development".to_string();
        record.set_tags(["focus", "habits"]);
        record
    }

    #[test]
    fn test_project_instructions_layout() {
        let mut rec = record();
        rec.discovery.purpose = Some("Stay on task".to_string());
        let text = project_instructions(&rec);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "=".repeat(70));
        assert_eq!(lines[1], "CUSTOM INSTRUCTIONS FOR CLAUDE PROJECT");
        assert_eq!(lines[4], "You are a focus coach.");
        assert_eq!(lines[7], "Source: Focus Coach");
        assert_eq!(lines[8], "Category: Personal Development");
        assert_eq!(lines[9], "Purpose: Stay on task");
        assert_eq!(lines[10], "=".repeat(70));
        assert_eq!(lines.len(), 11);
    }

    #[test]
    fn test_project_instructions_without_purpose() {
        let text = project_instructions(&record());
        assert!(!text.contains("Purpose:"));
        assert!(text.ends_with(&"=".repeat(70)));
    }

    #[test]
    fn test_markdown_and_json() {
        let rec = record();
        let md = render(&rec, ExportFormat::Markdown).unwrap();
        assert!(md.starts_with("# Focus Coach\n"));
        assert!(md.contains("- **Tags:** focus, habits"));
        assert!(md.ends_with("You are a focus coach.\n"));

        let json = render(&rec, ExportFormat::Json).unwrap();
        let back: PromptRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, rec);
    }
}
