mod commands;
mod render;
mod utils;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;

#[derive(Parser)]
#[command(name = "hkipo")]
#[command(about = "Build a Hong Kong IPO calendar with consolidated events and tiered reminders")]
struct Cli {
    /// Use this config file instead of ~/.config/hkipo/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch, classify and write the .ics and summary files
    Generate {
        /// Classify as of this date (YYYY-MM-DD) instead of now
        #[arg(long)]
        today: Option<String>,

        /// Calendar file to write
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Summary file to write
        #[arg(short, long)]
        summary: Option<PathBuf>,

        /// Include upcoming events up to this many days ahead
        #[arg(long)]
        lookahead: Option<u32>,

        /// Also save the raw upstream response here
        #[arg(long)]
        dump_response: Option<PathBuf>,

        /// Print the summary without writing any files
        #[arg(long)]
        dry_run: bool,
    },
    /// Fetch and classify, then list events in the terminal
    Events {
        /// Classify as of this date (YYYY-MM-DD) instead of now
        #[arg(long)]
        today: Option<String>,

        /// Include upcoming events up to this many days ahead
        #[arg(long)]
        lookahead: Option<u32>,

        /// Show offering details for every company
        #[arg(short, long)]
        verbose: bool,
    },
    /// Show the config file location, creating a default one if missing
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            today,
            output,
            summary,
            lookahead,
            dump_response,
            dry_run,
        } => {
            let mut config = commands::load_config(cli.config.as_deref())?;
            if let Some(days) = lookahead {
                config.calendar.lookahead_days = days;
            }
            if let Some(path) = output {
                config.calendar.output_file = path;
            }
            if let Some(path) = summary {
                config.calendar.summary_file = path;
            }

            let options = commands::generate::Options {
                today,
                dump_response,
                dry_run,
            };
            commands::generate::run(config, options).await
        }
        Commands::Events {
            today,
            lookahead,
            verbose,
        } => {
            let mut config = commands::load_config(cli.config.as_deref())?;
            if let Some(days) = lookahead {
                config.calendar.lookahead_days = days;
            }
            commands::events::run(config, today.as_deref(), verbose).await
        }
        Commands::Config => commands::config::run(cli.config.as_deref()),
    }
}
