use crate::commands::{
    add, configure, copy, delete, edit, export, favorite, list, search, session, show,
};
use crate::core::operations::PromptOperations;
use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "promptvault")]
#[command(about = "Store, tag and retrieve prompts with AI-suggested metadata")]
#[command(version)]
pub struct Cli {
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[arg(short, long, help = "Enable debug logging")]
    pub debug: bool,

    /// Without a command the interactive menu is started
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    pub async fn run(self, ops: &PromptOperations) -> Result<()> {
        match self.command {
            Some(command) => command.execute(ops, self.config).await,
            None => session::run_session(ops).await,
        }
    }
}

impl Commands {
    pub async fn execute(self, ops: &PromptOperations, config_path: Option<PathBuf>) -> Result<()> {
        match self {
            Commands::Add(args) => add::handle_add_command(ops, &args).await?,
            Commands::List(args) => list::handle_list_command(ops, &args)?,
            Commands::Search(args) => search::handle_search_command(ops, &args)?,
            Commands::Show(args) => show::handle_show_command(ops, &args)?,
            Commands::Copy(args) => copy::handle_copy_command(ops, &args)?,
            Commands::Favorite(args) => favorite::handle_favorite_command(ops, &args)?,
            Commands::Export(args) => export::handle_export_command(ops, &args)?,
            Commands::Edit(args) => edit::handle_edit_command(ops, &args)?,
            Commands::Delete(args) => delete::handle_delete_command(ops, &args)?,
            Commands::Config(args) => {
                configure::handle_config_command(ops.config(), config_path, args.command)?
            }
        }
        Ok(())
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a new prompt with suggested metadata
    Add(AddArgs),

    /// List stored prompts
    List(ListArgs),

    /// Search prompts by title, category, tags and content
    Search(SearchArgs),

    /// Show prompt details
    Show(ShowArgs),

    /// Copy a prompt to the clipboard and count the use
    Copy(CopyArgs),

    /// Toggle the favorite flag of a prompt
    Favorite(FavoriteArgs),

    /// Export a prompt as project instructions, markdown or JSON
    Export(ExportArgs),

    /// Edit prompt metadata
    Edit(EditArgs),

    /// Delete a prompt
    Delete(DeleteArgs),

    /// Configuration management
    Config(ConfigArgs),
}

/// `--private` / `--public` pair shared by several commands
#[derive(Args, Debug, Default, Clone)]
pub struct PrivacyArgs {
    #[arg(long, conflicts_with = "public", help = "Store in the private directory")]
    pub private: bool,

    #[arg(long, help = "Store in the public directory")]
    pub public: bool,
}

impl PrivacyArgs {
    pub fn choice(&self) -> Option<bool> {
        match (self.private, self.public) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

#[derive(Args, Debug)]
pub struct AddArgs {
    #[arg(long, conflicts_with_all = ["file", "editor"], help = "Prompt text")]
    pub content: Option<String>,

    #[arg(short = 'f', long, value_name = "FILE", conflicts_with = "editor")]
    pub file: Option<PathBuf>,

    #[arg(long, help = "Write the prompt in your editor")]
    pub editor: bool,

    #[arg(short = 'T', long)]
    pub title: Option<String>,

    #[arg(short = 'c', long)]
    pub category: Option<String>,

    #[arg(short = 't', long, value_name = "TAGS", help = "Comma separated tags")]
    pub tags: Option<String>,

    #[arg(short = 'd', long)]
    pub description: Option<String>,

    #[command(flatten)]
    pub privacy: PrivacyArgs,

    #[arg(short = 'y', long, help = "Accept the suggested metadata without asking")]
    pub yes: bool,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    #[arg(long)]
    pub favorites: bool,

    #[command(flatten)]
    pub privacy: PrivacyArgs,

    #[arg(short = 'c', long)]
    pub category: Option<String>,

    #[arg(short, long, value_enum, default_value_t = ListFormat::Simple)]
    pub format: ListFormat,

    #[arg(long)]
    pub stats: bool,

    #[arg(long, help = "Show all available tags")]
    pub tags: bool,

    #[arg(long, help = "Show all available categories")]
    pub categories: bool,
}

#[derive(Args, Debug)]
pub struct SearchArgs {
    #[arg(required = true, num_args = 1.., help = "Search terms (any term may match)")]
    pub query: Vec<String>,

    #[arg(long, help = "Only favorite prompts")]
    pub favorites: bool,
}

impl SearchArgs {
    pub fn query_string(&self) -> String {
        self.query.join(" ")
    }
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    #[arg(help = "Prompt ID, ID prefix or title")]
    pub identifier: String,

    #[arg(long, help = "Show the whole content")]
    pub full: bool,
}

#[derive(Args, Debug)]
pub struct CopyArgs {
    #[arg(help = "Prompt ID, ID prefix or title")]
    pub identifier: String,

    #[arg(long, help = "Print the content instead of copying it")]
    pub print: bool,
}

#[derive(Args, Debug)]
pub struct FavoriteArgs {
    #[arg(help = "Prompt ID, ID prefix or title")]
    pub identifier: String,
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    #[arg(help = "Prompt ID, ID prefix or title")]
    pub identifier: String,

    #[arg(short, long, value_enum, default_value_t = ExportFormat::Project)]
    pub format: ExportFormat,

    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    #[arg(long, help = "Copy the export to the clipboard")]
    pub copy: bool,
}

#[derive(Args, Debug)]
pub struct EditArgs {
    #[arg(help = "Prompt ID, ID prefix or title")]
    pub identifier: String,

    #[arg(short = 'T', long)]
    pub title: Option<String>,

    #[arg(short = 'c', long)]
    pub category: Option<String>,

    #[arg(short = 't', long, value_name = "TAGS", help = "Comma separated tags (replaces existing)")]
    pub tags: Option<String>,

    #[arg(short = 'd', long)]
    pub description: Option<String>,

    #[command(flatten)]
    pub privacy: PrivacyArgs,

    #[arg(long)]
    pub model: Option<String>,

    #[arg(long)]
    pub temperature: Option<f64>,

    #[arg(long, value_name = "TOKENS")]
    pub max_tokens: Option<String>,

    #[arg(long, help = "Append a technical note")]
    pub note: Option<String>,
}

impl EditArgs {
    /// True when no field flag was given
    pub fn is_interactive(&self) -> bool {
        self.title.is_none()
            && self.category.is_none()
            && self.tags.is_none()
            && self.description.is_none()
            && self.privacy.choice().is_none()
            && self.model.is_none()
            && self.temperature.is_none()
            && self.max_tokens.is_none()
            && self.note.is_none()
    }
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    #[arg(help = "Prompt ID, ID prefix or title")]
    pub identifier: String,

    #[arg(short, long)]
    pub force: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq)]
pub enum ListFormat {
    Simple,
    Detailed,
    Table,
    Json,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq)]
pub enum ExportFormat {
    /// Custom instructions block for a project
    Project,
    Markdown,
    Json,
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: Option<ConfigCommands>,
}

#[derive(Subcommand, Clone, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Open configuration file in editor
    Open,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file location
    Path,

    /// Set a single value, e.g. `ai.enabled false`
    Set { key: String, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("promptvault").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_no_command_starts_session() {
        let cli = parse(&[]);
        assert!(cli.command.is_none());
        assert!(!cli.debug);
    }

    #[test]
    fn test_add_args() {
        let cli = parse(&["add", "--content", "Hello", "--tags", "a,b", "--private", "-y"]);
        let Some(Commands::Add(args)) = cli.command else {
            panic!("expected add");
        };
        assert_eq!(args.content.as_deref(), Some("Hello"));
        assert_eq!(args.tags.as_deref(), Some("a,b"));
        assert_eq!(args.privacy.choice(), Some(true));
        assert!(args.yes);
    }

    #[test]
    fn test_privacy_flags_conflict() {
        let result = Cli::try_parse_from(["promptvault", "list", "--private", "--public"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_search_joins_terms() {
        let cli = parse(&["search", "code", "review", "--favorites"]);
        let Some(Commands::Search(args)) = cli.command else {
            panic!("expected search");
        };
        assert_eq!(args.query_string(), "code review");
        assert!(args.favorites);
    }

    #[test]
    fn test_search_requires_query() {
        assert!(Cli::try_parse_from(["promptvault", "search"]).is_err());
    }

    #[test]
    fn test_export_defaults_to_project() {
        let cli = parse(&["export", "abcd1234"]);
        let Some(Commands::Export(args)) = cli.command else {
            panic!("expected export");
        };
        assert_eq!(args.format, ExportFormat::Project);
        assert!(args.output.is_none());
    }

    #[test]
    fn test_edit_interactive_detection() {
        let cli = parse(&["edit", "abcd"]);
        let Some(Commands::Edit(args)) = cli.command else {
            panic!("expected edit");
        };
        assert!(args.is_interactive());

        let cli = parse(&["edit", "abcd", "--temperature", "0.3"]);
        let Some(Commands::Edit(args)) = cli.command else {
            panic!("expected edit");
        };
        assert!(!args.is_interactive());
        assert_eq!(args.temperature, Some(0.3));
    }

    #[test]
    fn test_config_set() {
        let cli = parse(&["--config", "/tmp/c.toml", "config", "set", "ai.enabled", "false"]);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.toml")));
        let Some(Commands::Config(args)) = cli.command else {
            panic!("expected config");
        };
        assert!(matches!(
            args.command,
            Some(ConfigCommands::Set { ref key, ref value }) if key == "ai.enabled" && value == "false"
        ));
    }
}
