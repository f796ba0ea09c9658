use std::process::ExitCode;

use anyhow::{Context, Result};
use checkout_client::ProxyClient;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use url::Url;

use crate::prompt::Prompt;

mod pay;
mod prompt;
mod refund;

/// Checkout CLI - pay and refund through a running checkout proxy
#[derive(Parser)]
#[command(name = "checkout-cli")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Base URL of the checkout proxy
    #[arg(long, default_value = "http://127.0.0.1:8080/")]
    proxy_url: Url,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an order, wait for approval, then capture it
    Pay(pay::PayArgs),
    /// Refund a captured payment
    Refund(refund::RefundArgs),
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let client = ProxyClient::new(cli.proxy_url).context("invalid proxy URL")?;
    tracing::debug!(proxy = %client.base_url(), "checkout proxy selected");

    let mut prompt = Prompt::stdin();
    let ok = match cli.command {
        Commands::Pay(args) => args.run(&client, &mut prompt).await?,
        Commands::Refund(args) => args.run(&client, &mut prompt).await?,
    };
    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn init_logging(verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level)?,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
}
