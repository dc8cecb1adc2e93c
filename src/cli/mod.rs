pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "brook")]
#[command(about = "A microsub feed aggregator", long_about = None)]
pub struct Cli {
    /// Configuration file (default: ~/.config/brook/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Normalize a microformats2 JSON document into a channel
    Ingest {
        /// Channel to add the items to
        channel: String,
        /// Path to the mf2 JSON document
        path: PathBuf,
    },
    /// Fetch pages, parse their microformats and add the items to a channel
    Fetch {
        channel: String,
        /// Page URLs (http or https)
        #[arg(required = true)]
        urls: Vec<String>,
    },
    /// Print a page of a channel's timeline as JSON
    Timeline {
        channel: String,
        /// Only items newer than this cursor
        #[arg(long)]
        before: Option<String>,
        /// Only items older than this cursor
        #[arg(long)]
        after: Option<String>,
    },
    /// Count the items retained by a channel
    Count { channel: String },
    /// Mark items as read
    MarkRead {
        channel: String,
        /// Item ids
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// List configured channels and their timeline types
    Channels,
}
