use crate::cli::ListFormat;
use crate::config::Config;
use crate::core::data::{PromptRecord, PromptStats};
use crate::suggest::MetadataSuggestion;
use crate::utils::format::{
    format_datetime, format_optional_datetime, format_tags_comma, format_tags_hash,
    truncate_string,
};
use crate::utils::search::SearchOutcome;
use anyhow::Result;
use colored::*;

pub struct OutputStyle;

impl OutputStyle {
    pub fn description(text: &str) -> ColoredString {
        text.bright_green()
    }

    pub fn command(text: &str) -> ColoredString {
        text.bright_yellow()
    }

    pub fn content(text: &str) -> ColoredString {
        text.clear()
    }

    pub fn tags(text: &str) -> ColoredString {
        text.bright_cyan()
    }

    pub fn tag(text: &str) -> ColoredString {
        text.cyan()
    }

    pub fn title(text: &str) -> ColoredString {
        text.bright_blue().bold()
    }

    pub fn header(text: &str) -> ColoredString {
        text.bold()
    }

    pub fn label(text: &str) -> ColoredString {
        text.cyan()
    }

    pub fn success(text: &str) -> ColoredString {
        text.green()
    }

    pub fn error(text: &str) -> ColoredString {
        text.red()
    }

    pub fn warning(text: &str) -> ColoredString {
        text.yellow()
    }

    pub fn info(text: &str) -> ColoredString {
        text.blue()
    }

    pub fn muted(text: &str) -> ColoredString {
        text.dimmed()
    }

    pub fn separator() -> String {
        "─".repeat(50)
    }

    pub fn header_separator() -> String {
        "═".repeat(50)
    }

    pub fn print_header(title: &str) {
        println!("{}", Self::title(title));
        println!("{}", Self::header_separator());
    }

    pub fn print_field_colored(label: &str, value: &str, color_fn: impl Fn(&str) -> ColoredString) {
        println!("{:>14}: {}", Self::label(label), color_fn(value));
    }

    fn print_optional_field(label: &str, value: Option<&str>) {
        if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
            Self::print_field_colored(label, value, Self::content);
        }
    }

    /// Marker column: star for favorites, lock for private prompts
    pub fn markers(record: &PromptRecord) -> String {
        format!(
            "{}{}",
            if record.favorite { "⭐" } else { "  " },
            if record.private { "🔒" } else { "  " }
        )
    }

    /// One-line summary used in lists and the browser
    pub fn format_prompt_line(record: &PromptRecord, config: &Config) -> String {
        let mut line = format!(
            "{} {} {} {}",
            Self::markers(record),
            Self::muted(record.short_id()),
            Self::description(&record.title),
            Self::tag(&format!("[{}]", record.category)),
        );

        if !record.tags.is_empty() {
            line.push(' ');
            line.push_str(&Self::tags(&format_tags_hash(&record.tags)).to_string());
        }

        if config.general.content_preview {
            let preview = record
                .discovery
                .purpose
                .as_deref()
                .filter(|p| !p.trim().is_empty())
                .unwrap_or(record.content());
            line.push_str(&format!(
                "\n        {}",
                Self::muted(&truncate_string(preview, 80))
            ));
        }

        line
    }

    /// Short "model · temp · tokens" summary, empty when nothing is known
    pub fn technical_summary(record: &PromptRecord) -> String {
        let notes = &record.technical_notes;
        let mut parts = Vec::new();
        if let Some(model) = &notes.recommended_model {
            parts.push(model.clone());
        }
        if let Some(temperature) = notes.temperature {
            parts.push(format!("{} temp", temperature));
        }
        if let Some(tokens) = &notes.max_tokens {
            parts.push(format!("{} tokens", tokens));
        }
        parts.join(" · ")
    }

    pub fn print_prompt_detailed(record: &PromptRecord) {
        println!("{}", Self::title(&format!("📝 {}", record.title)));
        println!("{}", Self::header_separator());

        Self::print_field_colored("ID", record.id(), Self::muted);
        Self::print_field_colored("Category", &record.category, Self::tag);
        Self::print_field_colored("Tags", &format_tags_comma(&record.tags), Self::tags);
        Self::print_field_colored(
            "Visibility",
            if record.private { "🔒 private" } else { "🌐 public" },
            Self::content,
        );
        Self::print_field_colored(
            "Favorite",
            if record.favorite { "⭐ yes" } else { "no" },
            Self::content,
        );
        Self::print_optional_field("Description", Some(record.description.as_str()));

        let technical = Self::technical_summary(record);
        Self::print_optional_field("Technical", Some(technical.as_str()));
        for note in &record.technical_notes.additional_notes {
            Self::print_field_colored("Note", &truncate_string(note, 100), Self::muted);
        }

        if let Some(level) = record.ai_analysis.complexity_level {
            Self::print_field_colored("Complexity", level.as_str(), Self::content);
        }
        Self::print_optional_field("Privacy note", record.ai_analysis.privacy_reasoning.as_deref());

        if !record.discovery.is_empty() {
            println!("\n{}", Self::header("🧭 When to use it"));
            for (label, value) in record.discovery.fields() {
                Self::print_optional_field(label, value);
            }
        }

        println!();
        Self::print_field_colored("Created", &format_datetime(&record.created()), Self::muted);
        Self::print_field_colored(
            "Last used",
            &format_optional_datetime(record.last_used.as_ref()),
            Self::muted,
        );
        Self::print_field_colored("Used", &record.usage_count.to_string(), Self::muted);
    }

    /// Content block shown under the details, truncated unless `full`
    pub fn format_content(record: &PromptRecord, full: bool, preview_lines: usize) -> String {
        let mut out = format!("{}\n{}\n", Self::title("📄 Content"), Self::separator());
        let total = record.content().lines().count();
        if full || total <= preview_lines {
            out.push_str(record.content());
        } else {
            let shown: Vec<&str> = record.content().lines().take(preview_lines).collect();
            out.push_str(&shown.join("\n"));
            out.push_str(&format!(
                "\n{}",
                Self::muted(&format!("... {} more lines (use --full)", total - preview_lines))
            ));
        }
        out
    }

    pub fn print_suggestion(suggestion: &MetadataSuggestion) {
        if suggestion.degraded {
            let notice = suggestion.notice.as_deref().unwrap_or("analysis unavailable");
            println!(
                "🌐 {}",
                Self::warning(&format!("Using local metadata only: {}", notice))
            );
        }

        println!("\n{}", Self::title("🤖 Suggested metadata"));
        Self::print_field_colored("Title", &suggestion.title, Self::description);
        Self::print_field_colored("Category", &suggestion.category, Self::tag);
        Self::print_field_colored("Tags", &format_tags_comma(&suggestion.tags), Self::tags);
        Self::print_field_colored(
            "Visibility",
            if suggestion.private { "🔒 private" } else { "🌐 public" },
            Self::content,
        );
        Self::print_optional_field(
            "Privacy note",
            suggestion.ai_analysis.privacy_reasoning.as_deref(),
        );
        Self::print_optional_field("Description", Some(suggestion.description.as_str()));
        if let Some(level) = suggestion.ai_analysis.complexity_level {
            Self::print_field_colored("Complexity", level.as_str(), Self::content);
        }
        if let Some(temperature) = suggestion.technical_notes.temperature {
            Self::print_field_colored("Temperature", &temperature.to_string(), Self::content);
        }
        Self::print_optional_field(
            "Model",
            suggestion.technical_notes.recommended_model.as_deref(),
        );
        Self::print_optional_field("Max tokens", suggestion.technical_notes.max_tokens.as_deref());
    }

    pub fn print_clipboard_success() {
        println!("✓ {}", Self::success("Prompt copied to clipboard!"));
    }
}

pub fn print_prompt_count(count: usize) {
    if count == 0 {
        println!("{}", OutputStyle::muted("No prompts found."));
    } else {
        println!(
            "📝 {} ({} found)",
            OutputStyle::header("Prompts"),
            OutputStyle::info(&count.to_string())
        );
    }
}

pub fn print_warning(message: &str) {
    println!("⚠️  {}", OutputStyle::warning(message));
}

pub fn print_success(message: &str) {
    println!("✅ {}", OutputStyle::success(message));
}

/// Display formatter for different output formats
pub struct DisplayFormatter;

impl DisplayFormatter {
    pub fn format_list(records: &[PromptRecord], format: &ListFormat, config: &Config) -> Result<()> {
        if records.is_empty() {
            crate::utils::error::handle_flow(crate::utils::error::FlowResult::EmptyList {
                item_type: "prompts matching your criteria".to_string(),
            });
            return Ok(());
        }

        match format {
            ListFormat::Simple => Self::print_simple_list(records, config),
            ListFormat::Detailed => Self::print_detailed_list(records),
            ListFormat::Table => Self::print_table_list(records),
            ListFormat::Json => Self::print_json_list(records)?,
        }

        Ok(())
    }

    pub fn print_search_results(outcome: &SearchOutcome, query: &str, config: &Config) {
        println!(
            "🔍 {} {}",
            OutputStyle::header(&format!("{} results for", outcome.len())),
            OutputStyle::command(&format!("'{}'", query))
        );
        println!("{}", OutputStyle::separator());

        for (i, hit) in outcome.hits.iter().enumerate() {
            println!(
                "{:>3}. {} {}",
                i + 1,
                OutputStyle::format_prompt_line(&hit.record, config),
                OutputStyle::muted(&format!("(score {})", hit.score))
            );
        }

        if outcome.needs_refinement {
            println!(
                "\n💡 {}",
                OutputStyle::info("Many matches. Add more terms to narrow the results.")
            );
        }
    }

    pub fn print_tags(tags: &[String]) -> Result<()> {
        if tags.is_empty() {
            println!("{}", OutputStyle::muted("No tags found"));
            return Ok(());
        }

        println!("🏷️  Available Tags ({})", tags.len());
        println!("====================");
        for tag in tags {
            println!("  {}", OutputStyle::tags(tag));
        }

        Ok(())
    }

    pub fn print_categories(categories: &[String]) -> Result<()> {
        if categories.is_empty() {
            println!("{}", OutputStyle::muted("No categories found"));
            return Ok(());
        }

        println!("📁 Available Categories ({})", categories.len());
        println!("=========================");
        for category in categories {
            println!("  {}", OutputStyle::tag(category));
        }

        Ok(())
    }

    pub fn print_stats(stats: &PromptStats) {
        OutputStyle::print_header("📊 Prompt Statistics");

        OutputStyle::print_field_colored("Total prompts", &stats.total_prompts.to_string(), OutputStyle::info);
        OutputStyle::print_field_colored("Public", &stats.public_prompts.to_string(), OutputStyle::info);
        OutputStyle::print_field_colored("Private", &stats.private_prompts.to_string(), OutputStyle::info);
        OutputStyle::print_field_colored("Favorites", &stats.favorites.to_string(), OutputStyle::info);
        OutputStyle::print_field_colored("Total uses", &stats.total_usage.to_string(), OutputStyle::info);

        if !stats.tag_counts.is_empty() {
            println!("\n🏷️  {}:", OutputStyle::header("Most used tags"));
            for (tag, count) in sorted_counts(&stats.tag_counts).into_iter().take(10) {
                println!("  {}: {}", OutputStyle::tags(tag), OutputStyle::info(&count.to_string()));
            }
        }

        if !stats.category_counts.is_empty() {
            println!("\n📁 {}:", OutputStyle::header("Categories"));
            for (category, count) in sorted_counts(&stats.category_counts) {
                println!("  {}: {}", OutputStyle::tag(category), OutputStyle::info(&count.to_string()));
            }
        }
    }

    fn print_simple_list(records: &[PromptRecord], config: &Config) {
        print_prompt_count(records.len());
        println!("{}", OutputStyle::separator());

        for record in records {
            println!("{}", OutputStyle::format_prompt_line(record, config));
        }
    }

    fn print_detailed_list(records: &[PromptRecord]) {
        for (i, record) in records.iter().enumerate() {
            OutputStyle::print_prompt_detailed(record);
            if i + 1 < records.len() {
                println!("\n{}\n", OutputStyle::separator());
            }
        }
    }

    fn print_table_list(records: &[PromptRecord]) {
        print_prompt_count(records.len());

        let title_width = records
            .iter()
            .map(|r| r.title.chars().count())
            .max()
            .unwrap_or(0)
            .clamp(5, 40);
        let category_width = records
            .iter()
            .map(|r| r.category.chars().count())
            .max()
            .unwrap_or(0)
            .clamp(8, 24);
        let tag_width = 25;

        let border = |left: &str, mid: &str, right: &str| {
            format!(
                "{left}─{}─{mid}─{}─{mid}─{}─{mid}─{}─{mid}─{}─{right}",
                "─".repeat(8),
                "─".repeat(title_width),
                "─".repeat(category_width),
                "─".repeat(tag_width),
                "─".repeat(16),
            )
        };

        println!("{}", border("┌", "┬", "┐"));
        println!(
            "│ {:<8} │ {:<tw$} │ {:<cw$} │ {:<gw$} │ {:<16} │",
            "ID",
            "Title",
            "Category",
            "Tags",
            "Created",
            tw = title_width,
            cw = category_width,
            gw = tag_width
        );
        println!("{}", border("├", "┼", "┤"));

        for record in records {
            // pad before coloring so ANSI codes don't skew the columns
            let title = format!("{:<tw$}", truncate_string(&record.title, title_width), tw = title_width);
            let category = format!(
                "{:<cw$}",
                truncate_string(&record.category, category_width),
                cw = category_width
            );
            let tags = format!(
                "{:<gw$}",
                truncate_string(&format_tags_comma(&record.tags), tag_width),
                gw = tag_width
            );
            println!(
                "│ {:<8} │ {} │ {} │ {} │ {} │",
                record.short_id(),
                OutputStyle::description(&title),
                OutputStyle::tag(&category),
                OutputStyle::tags(&tags),
                OutputStyle::muted(&format_datetime(&record.created())),
            );
        }

        println!("{}", border("└", "┴", "┘"));
    }

    fn print_json_list(records: &[PromptRecord]) -> Result<()> {
        let json = serde_json::to_string_pretty(records)
            .map_err(|e| anyhow::anyhow!("Failed to serialize prompts to JSON: {}", e))?;
        println!("{}", json);
        Ok(())
    }
}

fn sorted_counts(counts: &std::collections::HashMap<String, usize>) -> Vec<(&String, &usize)> {
    let mut sorted: Vec<_> = counts.iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn record() -> PromptRecord {
        let mut record = PromptRecord::new("Coach", "line 1\nline 2\nline 3\nline 4");
        record.set_tags(["growth"]);
        record
    }

    #[test]
    fn test_technical_summary() {
        let mut rec = record();
        assert_eq!(OutputStyle::technical_summary(&rec), "");
        rec.technical_notes.recommended_model = Some("GPT-4".to_string());
        rec.technical_notes.temperature = Some(0.3);
        rec.technical_notes.max_tokens = Some("1000-2000".to_string());
        assert_eq!(
            OutputStyle::technical_summary(&rec),
            "GPT-4 · 0.3 temp · 1000-2000 tokens"
        );
    }

    #[test]
    fn test_format_content_truncates() {
        let rec = record();
        let preview = OutputStyle::format_content(&rec, false, 2);
        assert!(preview.contains("line 2"));
        assert!(!preview.contains("line 3"));
        assert!(preview.contains("2 more lines"));

        let full = OutputStyle::format_content(&rec, true, 2);
        assert!(full.contains("line 4"));
    }

    #[test]
    fn test_prompt_line_contains_key_fields() {
        let mut rec = record();
        rec.favorite = true;
        let line = OutputStyle::format_prompt_line(&rec, &Config::default());
        assert!(line.contains("⭐"));
        assert!(line.contains(rec.short_id()));
        assert!(line.contains("#growth"));
        assert!(line.contains("line 1 line 2"));
    }

    #[test]
    fn test_sorted_counts() {
        let counts: HashMap<String, usize> =
            [("b".to_string(), 2), ("a".to_string(), 2), ("c".to_string(), 5)]
                .into_iter()
                .collect();
        let keys: Vec<&str> = sorted_counts(&counts).into_iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["c", "a", "b"]);
    }
}
