mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use commands::check::cmd_check;
use commands::parse::cmd_parse;

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// MSTS sound-management script tools.
#[derive(Parser)]
#[command(
    name = "sms",
    version,
    about = "Inspect and check MSTS sound-management scripts"
)]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a .sms file and print the loaded model
    Parse {
        /// Path to the .sms file
        file: PathBuf,
    },

    /// Report load diagnostics for a .sms file
    Check {
        /// Path to the .sms file
        file: PathBuf,
        /// Fail when any warning is reported
        #[arg(long)]
        deny_warnings: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.quiet { "error" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match cli.command {
        Commands::Parse { file } => {
            cmd_parse(&file, cli.output, cli.quiet);
        }
        Commands::Check {
            file,
            deny_warnings,
        } => {
            cmd_check(&file, deny_warnings, cli.output, cli.quiet);
        }
    }
}
