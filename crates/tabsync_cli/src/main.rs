//! tabsync CLI
//!
//! Command-line front end for the tabsync engine.
//!
//! # Commands
//!
//! - `sync` - Reconcile the local snapshot with the server
//! - `save` - Save HTML files as the new document set
//! - `show` - Print the local snapshot
//! - `serials` - List serials known to the server and this machine
//! - `probe` - Check server connectivity once
//! - `watch` - Report connectivity changes until interrupted
//! - `configure` - Update the settings file

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Sync a tabbed notepad's documents with a tab server.
#[derive(Parser)]
#[command(name = "tabsync")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the settings file
    #[arg(global = true, short, long, default_value = "settings.json")]
    settings: PathBuf,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile the local snapshot with the server
    Sync,

    /// Save HTML files as the new document set
    Save {
        /// HTML files, one document each, in tab order
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Index of the active document
        #[arg(short, long, default_value = "0", allow_negative_numbers = true)]
        active: i64,
    },

    /// Print the local snapshot
    Show {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// List serials known to the server and this machine
    Serials,

    /// Check server connectivity once
    Probe,

    /// Report connectivity changes until interrupted
    Watch {
        /// Seconds between probes (defaults to the configured interval)
        #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
        interval_secs: Option<u64>,

        /// Reconcile whenever the server becomes reachable
        #[arg(short, long)]
        refresh: bool,

        /// Stop after this many seconds
        #[arg(long)]
        duration_secs: Option<u64>,
    },

    /// Update the settings file
    Configure {
        /// Serial to sync under
        #[arg(long)]
        serial: Option<String>,

        /// Local snapshot file
        #[arg(long)]
        local_file: Option<PathBuf>,

        /// Tab server base URL
        #[arg(long)]
        server_url: Option<String>,

        /// Remote call timeout in seconds
        #[arg(long)]
        timeout_secs: Option<u64>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Sync => commands::sync::run(&cli.settings)?,
        Commands::Save { files, active } => commands::save::run(&cli.settings, &files, active)?,
        Commands::Show { format } => commands::show::run(&cli.settings, &format)?,
        Commands::Serials => commands::serials::run(&cli.settings)?,
        Commands::Probe => commands::probe::run(&cli.settings)?,
        Commands::Watch {
            interval_secs,
            refresh,
            duration_secs,
        } => commands::watch::run(&cli.settings, interval_secs, refresh, duration_secs)?,
        Commands::Configure {
            serial,
            local_file,
            server_url,
            timeout_secs,
        } => commands::configure::run(
            &cli.settings,
            commands::configure::Changes {
                serial,
                local_file,
                server_url,
                timeout_secs,
            },
        )?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn watch_rejects_zero_interval() {
        assert!(Cli::try_parse_from(["tabsync", "watch", "--interval-secs", "0"]).is_err());

        let cli = Cli::try_parse_from(["tabsync", "watch", "--interval-secs", "2"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Watch {
                interval_secs: Some(2),
                ..
            }
        ));
    }
}
