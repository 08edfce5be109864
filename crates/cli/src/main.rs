//! Financial Nudger CLI
//!
//! A command-line tool for classifying transaction descriptions and
//! inspecting the health of the inference service.

mod client;
mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{health, predict};

/// Financial Nudger CLI
#[derive(Parser)]
#[command(name = "nudge")]
#[command(author, version, about = "CLI for the Financial Nudger inference service", long_about = None)]
pub struct Cli {
    /// API endpoint URL (can also be set via NUDGE_API_URL env var)
    #[arg(long, env = "NUDGE_API_URL", default_value = "http://localhost:5000")]
    pub api_url: String,

    /// Output format
    #[arg(long, short, default_value = "table")]
    pub format: output::OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Classify a transaction description
    Predict {
        /// Transaction text to classify
        text: String,
    },

    /// Show service health and loaded model details
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize client
    let client = client::ApiClient::new(&cli.api_url)?;

    // Execute command
    match cli.command {
        Commands::Predict { text } => {
            predict::classify(&client, &text, cli.format).await?;
        }
        Commands::Health => {
            health::show(&client, cli.format).await?;
        }
    }

    Ok(())
}
