//! CLI definitions for PromptSnap.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// PromptSnap CLI.
#[derive(Parser)]
#[command(name = "promptsnap")]
#[command(about = "Batch image-to-prompt generation with Gemini")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml", global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Generate prompts for a list of images
    Run {
        /// JSON array of work items, or a text file with one image URL or path per line
        items: PathBuf,

        /// Prompt style (creative, technical, artistic, commercial)
        #[arg(short, long)]
        style: Option<String>,

        /// Write results here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Items processed concurrently per chunk
        #[arg(long)]
        max_concurrent: Option<usize>,

        /// Pause between chunks in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,

        /// Attempts per item
        #[arg(long)]
        retries: Option<u32>,
    },

    /// Estimate how long a batch will take
    Estimate {
        /// Number of images
        count: usize,

        /// Items processed concurrently per chunk
        #[arg(long)]
        max_concurrent: Option<usize>,
    },

    /// List prompt styles
    Styles,
}
