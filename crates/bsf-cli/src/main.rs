//! # bsf-cli
//!
//! Command line queries over layered BSF pipeline configuration.
//!
//! This is the entry point of the `bsf-config` tool. It parses the command
//! line, sets up logging, loads the configuration layers and dispatches to
//! the query handlers. Exit status is 0 when a value was printed, 1 when the
//! option is not set and 2 on errors.

use bsf_core::error::{BsfError, BsfResult};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, error};

mod commands;
mod output;

use commands::{CommandContext, Outcome};
use output::errors::ErrorFormatter;

/// Query layered BSF pipeline configuration
#[derive(Parser)]
#[command(name = "bsf-config", version, about = "Query layered BSF pipeline configuration")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file, repeat to layer files (later files win).
    /// Defaults to $BSF_CONFIG followed by ~/.bsfpython.ini
    #[arg(short, long = "config", value_name = "FILE", global = true)]
    pub config: Vec<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// A section and option to resolve
#[derive(Args, Debug, Clone)]
pub struct OptionQuery {
    /// Dotted section name, e.g. bsf.analyses.bwa.BWA.DRMS.align
    pub section: String,

    /// Option name
    pub option: String,

    /// Value to use when no section on the ancestor chain sets the option
    #[arg(long)]
    pub fallback: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the effective raw value of an option
    Get(OptionQuery),
    /// Print a path option after home and variable expansion
    Path {
        #[command(flatten)]
        query: OptionQuery,
        /// Directory prepended to relative paths
        #[arg(long)]
        root: Option<PathBuf>,
    },
    /// Print a size option in bytes
    Size(OptionQuery),
    /// Print a time limit option in seconds
    Duration(OptionQuery),
    /// Print an integer option
    Int {
        #[command(flatten)]
        query: OptionQuery,
        /// Smallest accepted value
        #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
        minimum: i64,
    },
    /// Print a boolean option as true or false
    Bool(OptionQuery),
    /// List declared sections
    Sections,
    /// Show every option visible from a section and where it is set
    Show {
        section: String,
        /// Print JSON instead of INI text
        #[arg(long)]
        json: bool,
    },
    /// Print the job resources of an analysis stage as JSON
    Resources {
        /// Analysis section, e.g. bsf.analyses.bwa.BWA
        analysis: String,
        /// Stage name below <analysis>.DRMS
        stage: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    setup_logging(cli.verbose);
    setup_panic_handler();

    debug!("Starting bsf-config v{}", env!("CARGO_PKG_VERSION"));

    match run_cli(cli) {
        Ok(Outcome::Done) => ExitCode::SUCCESS,
        Ok(Outcome::Absent) => ExitCode::from(1),
        Err(e) => {
            eprintln!("{}", ErrorFormatter::new().format_error(&e));
            ExitCode::from(2)
        },
    }
}

fn run_cli(cli: Cli) -> BsfResult<Outcome> {
    // Create Tokio runtime for loading the configuration files
    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| BsfError::io("Failed to create async runtime".to_string(), e))?;

    rt.block_on(async {
        let ctx = CommandContext::load(&cli.config).await?;
        commands::dispatch_command(cli.command, &ctx)
    })
}

fn setup_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "bsf_config={},bsf_core={},bsf_cli={}",
            level, level, level
        ))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|panic_info| {
        error!("bsf-config encountered an unexpected error: {}", panic_info);
        eprintln!("bsf-config crashed! This is a bug.");
        eprintln!("Error: {}", panic_info);
    }));
}
