use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "codecritic",
    version,
    about = "AI code review for snippets, powered by Gemini"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output machine-readable JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Color mode
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorMode,

    /// Configuration directory (overrides CODECRITIC_CONFIG_DIR)
    #[arg(long, global = true)]
    pub config_dir: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Review a code snippet
    Review {
        /// File to review ("-" or omitted reads stdin)
        input: Option<String>,

        /// Also write the review as sanitized HTML to this file
        #[arg(long)]
        html: Option<PathBuf>,

        /// Save a Markdown report (and HTML, with --html) to this directory
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Gemini model to use
        #[arg(long, env = "CODECRITIC_MODEL")]
        model: Option<String>,
    },

    /// Manage the stored Gemini API key
    Key {
        #[command(subcommand)]
        action: KeyAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum KeyAction {
    /// Save or replace the API key (prompts when KEY is omitted)
    Set {
        /// The API key
        key: Option<String>,
    },
    /// Show whether an API key is configured
    Status,
    /// Delete the stored API key
    Remove,
}
