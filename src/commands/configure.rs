use crate::cli::ConfigCommands;
use crate::config::{API_KEY_ENV, Config};
use crate::utils::interactive::{edit_file_direct, prompt_yes_no};
use crate::utils::output::{OutputStyle, print_success};
use anyhow::Result;
use std::path::{Path, PathBuf};

pub fn handle_config_command(
    config: &Config,
    config_path: Option<PathBuf>,
    command: Option<ConfigCommands>,
) -> Result<()> {
    let path = config_path.unwrap_or_else(Config::config_file_path);
    match command {
        Some(ConfigCommands::Show) => handle_show_command(config, &path),
        Some(ConfigCommands::Open) => handle_open_command(config, &path),
        Some(ConfigCommands::Reset) => handle_reset_command(&path),
        Some(ConfigCommands::Path) => {
            println!("{}", path.display());
            Ok(())
        }
        Some(ConfigCommands::Set { key, value }) => handle_set_command(&path, &key, &value),
        None => handle_config_help(&path),
    }
}

fn handle_show_command(config: &Config, path: &Path) -> Result<()> {
    OutputStyle::print_header("⚙️  promptvault configuration");
    println!("{}", OutputStyle::muted(&format!("File: {}", path.display())));

    println!("\n{}", OutputStyle::header("General:"));
    println!("  Prompts dir: {}", config.general.prompts_dir.display());
    println!("  Editor: {}", config.general.editor);
    println!("  Color: {}", config.general.color);
    println!("  Content preview: {}", config.general.content_preview);

    let ai = &config.ai;
    println!("\n{}", OutputStyle::header("AI:"));
    println!("  Enabled: {}", ai.enabled);
    println!("  API URL: {}", ai.api_url);
    println!("  Model: {}", ai.model);
    println!("  API version: {}", ai.anthropic_version);
    println!("  Max tokens: {}", ai.max_tokens);
    println!("  Timeout: {}s", ai.timeout_secs);
    let key_source = if ai.api_key.is_some() {
        "✓ (config)".to_string()
    } else if ai.resolve_api_key().is_some() {
        format!("✓ ({})", API_KEY_ENV)
    } else {
        "not set".to_string()
    };
    println!("  API key: {}", key_source);

    let weights = &config.search.weights;
    println!("\n{}", OutputStyle::header("Search:"));
    println!(
        "  Weights: title {}, category {}, tag {}, content {}",
        weights.title, weights.category, weights.tag, weights.discovery
    );
    println!("  Refine threshold: {}", config.search.refine_threshold);

    Ok(())
}

fn handle_config_help(path: &Path) -> Result<()> {
    OutputStyle::print_header("⚙️  Configuration Management");
    println!("Available configuration commands:");
    println!("  promptvault config show           - Show current configuration");
    println!("  promptvault config open           - Open configuration file in editor");
    println!("  promptvault config reset          - Reset configuration to defaults");
    println!("  promptvault config path           - Print the configuration file location");
    println!("  promptvault config set KEY VALUE  - Change one value, e.g. ai.enabled false");
    println!();
    println!("Configuration file location: {}", path.display());
    Ok(())
}

fn handle_open_command(config: &Config, path: &Path) -> Result<()> {
    if !path.exists() {
        Config::default().save_to(path)?;
    }

    println!("Opening configuration file in editor...");
    println!("File: {}", path.display());
    edit_file_direct(path, Some(config.general.editor.as_str()))?;

    if let Err(err) = Config::load_custom(path) {
        println!(
            "⚠️  {}",
            OutputStyle::warning(&format!("The edited configuration is invalid: {}", err))
        );
    }
    Ok(())
}

fn handle_reset_command(path: &Path) -> Result<()> {
    if prompt_yes_no(
        "Are you sure you want to reset configuration to defaults? This will overwrite your current settings.",
    )? {
        Config::default().save_to(path)?;
        print_success("Configuration reset to defaults!");
    } else {
        println!("Reset cancelled.");
    }
    Ok(())
}

fn handle_set_command(path: &Path, key: &str, value: &str) -> Result<()> {
    Config::set_value(path, key, value)?;
    print_success(&format!("Set {} = {}", key, value));
    Ok(())
}
