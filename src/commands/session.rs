//! Menu-driven interactive session
//!
//! The loop is an explicit state machine: the main menu leads to a browsable
//! list of prompts, a list entry leads to its detail view, and every action on
//! a prompt returns either to the refreshed detail view or to the menu.
//! Recoverable errors raised inside a step are reported and the session
//! carries on from the menu.

use super::add::{MetadataOverrides, add_prompt};
use super::copy::use_prompt;
use super::delete::delete_record;
use super::edit::edit_interactively;
use super::export::export_record;
use super::favorite;
use super::show::show_record;
use crate::cli::ExportFormat;
use crate::core::data::PromptRecord;
use crate::core::operations::{ListFilter, PromptOperations};
use crate::utils::error::{AppError, FlowResult, handle_flow, report_any};
use crate::utils::interactive::{prompt_input, prompt_multiline, select_from_list};
use crate::utils::output::{DisplayFormatter, OutputStyle, print_success, print_warning};
use anyhow::Result;
use std::io::IsTerminal;

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Menu,
    Browse {
        heading: String,
        records: Vec<PromptRecord>,
    },
    Detail(PromptRecord),
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MenuChoice {
    Add,
    List,
    Favorites,
    Search,
    Stats,
    Exit,
}

impl MenuChoice {
    const ALL: [(MenuChoice, &'static str); 6] = [
        (MenuChoice::Add, "Add new prompt"),
        (MenuChoice::List, "List all prompts"),
        (MenuChoice::Favorites, "Show favorites"),
        (MenuChoice::Search, "Search prompts"),
        (MenuChoice::Stats, "Statistics"),
        (MenuChoice::Exit, "Exit"),
    ];

    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "1" | "a" | "add" => Some(Self::Add),
            "2" | "l" | "list" => Some(Self::List),
            "3" | "f" | "favorites" => Some(Self::Favorites),
            "4" | "s" | "search" => Some(Self::Search),
            "5" | "stats" => Some(Self::Stats),
            "6" | "q" | "quit" | "exit" => Some(Self::Exit),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DetailAction {
    Copy,
    Favorite,
    Export,
    Edit,
    TogglePrivacy,
    Delete,
    Back,
}

impl DetailAction {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "c" | "copy" => Some(Self::Copy),
            "f" | "favorite" => Some(Self::Favorite),
            "x" | "export" => Some(Self::Export),
            "e" | "edit" => Some(Self::Edit),
            "p" | "privacy" => Some(Self::TogglePrivacy),
            "d" | "delete" => Some(Self::Delete),
            "" | "b" | "back" | "q" => Some(Self::Back),
            _ => None,
        }
    }
}

pub async fn run_session(ops: &PromptOperations) -> Result<()> {
    if !std::io::stdin().is_terminal() {
        print_warning("The interactive session needs a terminal. Run with --help to see the commands.");
        return Ok(());
    }
    ops.ensure_storage_exists()?;
    OutputStyle::print_header("📚 promptvault");
    if !ops.suggester().is_online() {
        println!(
            "{}",
            OutputStyle::muted("AI analysis is offline; metadata will be suggested locally")
        );
    }

    let mut state = SessionState::Menu;
    while state != SessionState::Exit {
        let step = match state {
            SessionState::Menu => menu_step(ops).await,
            SessionState::Browse { heading, records } => browse_step(&heading, records),
            SessionState::Detail(record) => detail_step(ops, record),
            SessionState::Exit => break,
        };
        state = match step {
            Ok(next) => next,
            Err(err) => {
                if err
                    .downcast_ref::<AppError>()
                    .is_some_and(|app_err| !app_err.is_recoverable())
                {
                    return Err(err);
                }
                report_any(&err);
                SessionState::Menu
            }
        };
    }

    print_success("Goodbye! 👋");
    Ok(())
}

async fn menu_step(ops: &PromptOperations) -> Result<SessionState> {
    println!("\n{}", OutputStyle::header("Options:"));
    for (i, (_, label)) in MenuChoice::ALL.iter().enumerate() {
        println!("  [{}] {}", i + 1, label);
    }

    let input = prompt_input(&format!("\n{} ", OutputStyle::label("Select option [1-6]:")))?;
    let Some(choice) = MenuChoice::parse(&input) else {
        println!("{}", OutputStyle::error("Invalid choice. Please select 1-6."));
        return Ok(SessionState::Menu);
    };

    match choice {
        MenuChoice::Add => {
            let content = prompt_multiline(&format!(
                "{} {}",
                OutputStyle::label("Prompt content"),
                OutputStyle::muted("(Enter to submit, Ctrl+J for a new line)")
            ))?;
            if content.trim().is_empty() {
                handle_flow(FlowResult::Cancelled("Empty prompt, nothing saved".to_string()));
                return Ok(SessionState::Menu);
            }
            let added = add_prompt(ops, content, &MetadataOverrides::default(), true).await?;
            Ok(added.map_or(SessionState::Menu, SessionState::Detail))
        }
        MenuChoice::List => Ok(SessionState::Browse {
            heading: "📝 All prompts".to_string(),
            records: ops.list(&ListFilter::default())?,
        }),
        MenuChoice::Favorites => Ok(SessionState::Browse {
            heading: "⭐ Favorites".to_string(),
            records: ops.list(&ListFilter {
                favorites_only: true,
                ..Default::default()
            })?,
        }),
        MenuChoice::Search => {
            let query = prompt_input(&format!("{} ", OutputStyle::label("Search terms:")))?;
            let outcome = ops.search(&query, false)?;
            if outcome.is_empty() {
                handle_flow(FlowResult::NotFound {
                    item_type: "Prompts matching".to_string(),
                    search_term: query,
                });
                return Ok(SessionState::Menu);
            }
            if outcome.needs_refinement {
                println!(
                    "💡 {}",
                    OutputStyle::info(&format!(
                        "{} matches. Add more terms to narrow the results.",
                        outcome.len()
                    ))
                );
            }
            Ok(SessionState::Browse {
                heading: format!("🔍 Results for '{}'", query),
                records: outcome.into_records(),
            })
        }
        MenuChoice::Stats => {
            DisplayFormatter::print_stats(&ops.stats()?);
            Ok(SessionState::Menu)
        }
        MenuChoice::Exit => Ok(SessionState::Exit),
    }
}

fn browse_step(heading: &str, records: Vec<PromptRecord>) -> Result<SessionState> {
    if records.is_empty() {
        handle_flow(FlowResult::EmptyList {
            item_type: "prompts".to_string(),
        });
        return Ok(SessionState::Menu);
    }

    let lines: Vec<String> = records.iter().map(browse_line).collect();
    let selected = select_from_list(&format!("{} ({})", heading, records.len()), &lines)?;
    Ok(match selected {
        Some(index) => records
            .into_iter()
            .nth(index)
            .map_or(SessionState::Menu, SessionState::Detail),
        None => SessionState::Menu,
    })
}

fn browse_line(record: &PromptRecord) -> String {
    format!(
        "{} {}{} [{}]",
        record.short_id(),
        OutputStyle::markers(record),
        record.title,
        record.category
    )
}

fn detail_step(ops: &PromptOperations, record: PromptRecord) -> Result<SessionState> {
    println!();
    show_record(ops, &record, false)?;

    println!(
        "\n{}",
        OutputStyle::muted(
            "[c]opy  [f]avorite  e[x]port  [e]dit  [p]rivacy  [d]elete  [b]ack"
        )
    );
    let input = prompt_input(&format!("{} ", OutputStyle::label("Action:")))?;
    let Some(action) = DetailAction::parse(&input) else {
        println!("{}", OutputStyle::error("Unknown action"));
        return Ok(SessionState::Detail(record));
    };

    let next = match action {
        DetailAction::Copy => {
            use_prompt(ops, &record)?;
            SessionState::Detail(ops.resolve(record.id())?)
        }
        DetailAction::Favorite => SessionState::Detail(favorite::toggle(ops, &record)?),
        DetailAction::Export => {
            export_record(ops, &record, ExportFormat::Project, None, true)?;
            SessionState::Detail(ops.resolve(record.id())?)
        }
        DetailAction::Edit => SessionState::Detail(edit_interactively(ops, &record)?),
        DetailAction::TogglePrivacy => {
            let updated = ops.set_privacy(record.id(), !record.private)?;
            print_success(&format!(
                "'{}' is now {}",
                updated.title,
                if updated.private { "private" } else { "public" }
            ));
            SessionState::Detail(updated)
        }
        DetailAction::Delete => {
            if delete_record(ops, &record, true)? {
                SessionState::Menu
            } else {
                SessionState::Detail(record)
            }
        }
        DetailAction::Back => SessionState::Menu,
    };
    Ok(next)
}
