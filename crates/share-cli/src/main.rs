//! hackmd-share: sync local markdown notes with HackMD from the terminal.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use hackmd_api::{ApiConfig, ConfigError, HackmdClient};
use share_cli::{FileStore, TerminalPrompter};
use share_core::engine::{Outcome, ShareError, ShareFlow};
use share_core::host::Prompter;
use share_core::remote::RemoteNotes;

#[derive(Parser, Debug)]
#[command(name = "hackmd-share")]
#[command(about = "Sync local markdown notes with HackMD")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose logging
    #[arg(long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one sync action (create/update/delete) for a note file
    Share {
        /// Path to the markdown note
        file: PathBuf,
    },
    /// List the teams the configured token belongs to
    Teams,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Respects RUST_LOG, defaults to info (or debug with --verbose)
    let default_filter = if args.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = match ApiConfig::from_env() {
        Ok(config) => config,
        Err(err @ ConfigError::MissingToken) => {
            tracing::debug!(%err, "missing credentials");
            return Err(ShareError::ConfigurationMissing)
                .context("set HACKMD_TOKEN (and optionally HACKMD_ENDPOINT)");
        }
    };
    // One client per action; a settings change is picked up next run.
    let client = HackmdClient::new(&config)?;

    match args.command {
        Command::Share { file } => {
            let store = FileStore::new(file);
            let prompter = TerminalPrompter;
            match ShareFlow::new(&client, &store, &prompter).run().await {
                Ok(Outcome::Created { publish_link }) => println!("Created: {publish_link}"),
                Ok(Outcome::Updated) => println!("Updated the remote note"),
                Ok(Outcome::Deleted) => println!("Deleted the remote note"),
                Ok(Outcome::Cancelled) => println!("Cancelled"),
                Ok(Outcome::Unchanged) => println!("Nothing to do"),
                Err(err) => {
                    let _ = prompter.notify(&format!("Share failed: {err}")).await;
                    std::process::exit(1);
                }
            }
        }
        Command::Teams => {
            let teams = client.teams().await?;
            if teams.is_empty() {
                println!("No teams");
            }
            for team in teams {
                println!("{}\t{}", team.path, team.name);
            }
        }
    }

    Ok(())
}
