//! skycat - catalogs of timestamped instrument data files
//!
//! Standalone commands for building a catalog of one data directory,
//! looking files up by time, and reporting files that are new since the
//! previous run.

use anyhow::Result;
use clap::{Parser, Subcommand};
use skycat_catalog::config::skycat_home;
use skycat_logging::{init_logging, LogConfig};
use std::path::PathBuf;
use std::process::ExitCode;

mod cli;

#[derive(Parser, Debug)]
#[command(name = "skycat", version, about = "Catalogs of timestamped instrument data files")]
struct Cli {
    /// Enable verbose logging (info/debug to stderr)
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build a catalog of a data directory and print every entry
    List {
        /// Data directory holding the instrument's files
        #[arg(short, long)]
        path: PathBuf,

        /// Filename template, e.g. "inst_{year:04d}_{day:03d}.dat"
        #[arg(short, long)]
        template: String,

        /// Instrument tag
        #[arg(long, default_value = "")]
        tag: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Find the file recorded at a timestamp
    Lookup {
        /// Data directory holding the instrument's files
        #[arg(short, long)]
        path: PathBuf,

        /// Filename template
        #[arg(short, long)]
        template: String,

        /// Instrument tag
        #[arg(long, default_value = "")]
        tag: String,

        /// Timestamp: YYYY-MM-DD, YYYY-MM-DDTHH:MM:SS or YYYY-DDD
        #[arg(long)]
        time: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Report files added since the previous run of this config
    New {
        /// Catalog config (TOML)
        #[arg(short, long, env = "SKYCAT_CONFIG")]
        config: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compile a filename template and describe its fields
    CheckTemplate {
        /// Filename template
        template: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn run_command(command: Commands) -> Result<()> {
    match command {
        Commands::List {
            path,
            template,
            tag,
            json,
        } => cli::list::run(cli::list::ListArgs {
            path,
            template,
            tag,
            json,
        }),
        Commands::Lookup {
            path,
            template,
            tag,
            time,
            json,
        } => cli::lookup::run(cli::lookup::LookupArgs {
            path,
            template,
            tag,
            time,
            json,
        }),
        Commands::New { config, json } => cli::new::run(cli::new::NewArgs { config, json }),
        Commands::CheckTemplate { template, json } => {
            cli::check_template::run(cli::check_template::CheckTemplateArgs { template, json })
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let _log_guard = match init_logging(LogConfig {
        app_name: "skycat",
        verbose: cli.verbose,
        log_dir: Some(skycat_home().join("logs")),
    }) {
        Ok(guard) => Some(guard),
        Err(err) => {
            eprintln!("Warning: failed to initialize logging: {:#}", err);
            None
        }
    };

    match run_command(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<cli::error::HelpfulError>() {
                Some(helpful) => eprint!("{}", helpful),
                None => eprintln!("{:?}", err),
            }
            ExitCode::from(1)
        }
    }
}
