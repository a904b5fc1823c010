//! Argument parsing and subcommands for the `seo-lens` binary.
//!
//! [`Cli`] is the clap root, [`Commands`] lists the subcommands and
//! [`commands`] holds one module per subcommand. `main.rs` only loads
//! configuration, starts logging and dispatches.

pub mod commands;

#[cfg(feature = "mcp")]
pub mod server;

use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

/// When to colorize terminal output.
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum ColorChoice {
    /// Let owo-colors decide from the terminal.
    #[default]
    Auto,
    /// Force colors on.
    Always,
    /// Force colors off.
    Never,
}

impl ColorChoice {
    /// Set the process-wide owo-colors override.
    pub fn apply(self) {
        match self {
            Self::Auto => {}
            Self::Always => owo_colors::set_override(true),
            Self::Never => owo_colors::set_override(false),
        }
    }
}

const ENV_HELP: &str = "\
ENVIRONMENT VARIABLES:
    RUST_LOG                      Log filter (e.g., debug, seo_lens=trace)
    SEO_LENS_LOG_PATH             Explicit log file path
    SEO_LENS_LOG_DIR              Log directory
    SEO_LENS_<KEY>                Override a config key (e.g., SEO_LENS_MAX_GRADE=9)
    SEO_LENS_<TABLE>__<KEY>       Override a nested key (e.g., SEO_LENS_SERP__TITLE_MAX=55)
";
/// Global flags plus the chosen subcommand.
#[derive(Parser)]
#[command(name = "seo-lens")]
#[command(
    about = "Keyword density, readability, and search snippet checks for page copy",
    long_about = None
)]
#[command(version, arg_required_else_help = true)]
#[command(after_long_help = ENV_HELP)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Print the bare version number and exit
    #[arg(long)]
    pub version_only: bool,

    /// Extra config file, merged over discovered ones
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Run as if started in DIR
    #[arg(short = 'C', long, global = true)]
    pub chdir: Option<PathBuf>,

    /// Log errors only
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log more (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// When to use colors
    #[arg(long, global = true, value_enum, default_value_t)]
    pub color: ColorChoice,

    /// Print reports as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

/// seo-lens subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Measure keyword density and list the most frequent phrases
    Density(commands::density::DensityArgs),

    /// Count words, sentences, and reading time, and score readability
    Count(commands::count::CountArgs),

    /// Preview how a title and meta description appear in search results
    Serp(commands::serp::SerpArgs),

    /// Show version and effective configuration
    Info(commands::info::InfoArgs),

    /// Serve the analyses as MCP tools over stdio
    #[cfg(feature = "mcp")]
    Serve(commands::serve::ServeArgs),
}

/// The clap command tree, for man pages and completions.
pub fn command() -> clap::Command {
    Cli::command()
}
