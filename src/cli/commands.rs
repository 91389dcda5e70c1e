use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "harvester")]
#[command(about = "Incremental feed harvester with site-specific article extraction")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a new feed source URL
    Add {
        /// Feed URL to add
        url: String,
    },

    /// Remove a source (interactive selection)
    Remove,

    /// List all sources with their watermarks
    List,

    /// Import sources from OPML file
    Import {
        /// Path to OPML file
        path: String,
    },

    /// Export sources to OPML format
    Export {
        /// Output file path (prints to stdout if not specified)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Poll all sources once and harvest new articles
    Run {
        /// Dry run - print new articles without storing them or advancing watermarks
        #[arg(long)]
        dry_run: bool,

        /// Print harvested articles as JSON lines
        #[arg(long)]
        json: bool,
    },

    /// Show recently harvested articles
    Articles {
        /// Maximum number of articles to show
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },
}
