use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "quotebook")]
#[command(about = "Keep a categorized quote collection in sync from the command line")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Directory holding the local quote store
    #[arg(long, global = true, value_name = "PATH")]
    pub data_dir: Option<PathBuf>,

    /// Remote collection URL used by `sync` and `watch`
    #[arg(long, global = true, value_name = "URL")]
    pub remote_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show a random quote
    #[command(alias = "random")]
    Show {
        /// Only pick from this category (defaults to the saved filter)
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Add a new quote
    #[command(alias = "new")]
    Add {
        /// Quote text (read from piped stdin when omitted)
        text: Vec<String>,
        /// Quote category
        #[arg(short, long)]
        category: String,
    },
    /// List stored quotes
    List {
        /// Only list this category
        #[arg(short, long)]
        category: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List known categories
    Categories {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show or change the saved category filter
    Filter {
        /// Category to select, or `all` to clear the filter
        category: Option<String>,
    },
    /// Export all quotes as JSON
    Export {
        /// Output path, `-` for stdout
        #[arg(short, long, value_name = "PATH", default_value = "quotes.json")]
        output: PathBuf,
    },
    /// Import quotes from a JSON file, appending to the collection
    Import {
        /// JSON file containing an array of quotes, `-` for stdin
        path: PathBuf,
    },
    /// Run one sync cycle against the remote collection
    Sync,
    /// Keep syncing on a fixed interval until interrupted
    Watch {
        /// Seconds between sync cycles
        #[arg(short, long, value_name = "SECS")]
        interval: Option<u64>,
        /// Run a cycle immediately instead of waiting one interval
        #[arg(long)]
        now: bool,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}
