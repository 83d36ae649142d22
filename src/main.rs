use clap::Parser;
use promptvault::cli::Cli;
use promptvault::config::Config;
use promptvault::core::operations::PromptOperations;
use promptvault::utils::error::report_any;
use tracing_subscriber::EnvFilter;

fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("promptvault=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load_custom(path)?,
        None => {
            Config::ensure_config_exists()?;
            Config::load()?
        }
    };

    if !config.general.color {
        colored::control::set_override(false);
    }

    let ops = PromptOperations::new(config);
    cli.run(&ops).await
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.debug);

    if let Err(err) = run(cli).await {
        report_any(&err);
        std::process::exit(1);
    }
}
