mod config;
mod logging;
mod server;
mod signals;

use std::path::{Path, PathBuf};

use anyhow::Result;
use checkout::CheckoutModule;
use clap::{Parser, Subcommand};

use crate::config::AppConfig;

/// Checkout Server - PayPal standard checkout proxy
#[derive(Parser)]
#[command(name = "checkout-server")]
#[command(about = "Checkout Server - PayPal standard checkout proxy")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port override for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print effective configuration (YAML) and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Validate configuration and exit
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(ref path) = cli.config
        && !Path::new(path).is_file()
    {
        anyhow::bail!("config file does not exist: {}", path.display());
    }

    // defaults -> YAML (if provided) -> env (APP__*, PAYPAL_*) -> CLI overrides
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(cli.port);

    logging::init(&config.logging, cli.verbose)?;
    tracing::info!("Checkout Server starting");

    if cli.print_config {
        println!("Effective configuration:\n{}", config.to_yaml()?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(&config).await,
        Commands::Check => check_config(&config),
    }
}

fn check_config(config: &AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");
    config.validate()?;
    println!("Configuration is valid");
    println!("{}", config.to_yaml()?);
    Ok(())
}

async fn run_server(config: &AppConfig) -> Result<()> {
    let addr = config.socket_addr()?;
    let module = CheckoutModule::from_config(&config.paypal)?;
    let router = server::build_router(&module, &config.server);
    server::serve(router, addr).await?;
    tracing::info!("Checkout Server stopped");
    Ok(())
}
