//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Timeline harvester CLI
#[derive(Parser, Debug)]
#[command(name = "post-harvester")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// File holding the bearer token on its first line
    #[arg(short, long, global = true)]
    pub token_file: Option<PathBuf>,

    /// Directory receiving the CSV files
    #[arg(short, long, global = true)]
    pub output_dir: Option<PathBuf>,

    /// API base URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Print progress for every request and account
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Download the timeline of one account
    Fetch {
        /// Account handle, with or without "@"
        handle: String,

        /// Do not write a result file
        #[arg(long)]
        no_save: bool,
    },

    /// Download every account listed in the input file that has no output yet
    Batch {
        /// CSV file with account links
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Column holding the links
        #[arg(long)]
        column: Option<String>,

        /// Do not write result files
        #[arg(long)]
        no_save: bool,
    },

    /// Print the account identifier for a handle
    Resolve {
        /// Account handle, with or without "@"
        handle: String,
    },
}
