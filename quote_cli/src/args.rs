//! Command-line arguments for the quote CLI.
//!
//! This module defines the CLI interface using `clap`. See `main` for end-to-end usage.
use clap::{Parser, Subcommand};

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Directory holding the durable quote storage.
    #[clap(long, default_value = "./quotes-data")]
    pub data_dir: String,

    /// What to do with the store.
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands, each a thin wrapper over one store operation.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print one quote, preferring the one remembered for this session.
    Show {
        /// Restrict the draw to one category ("all" for everything).
        #[clap(long)]
        category: Option<String>,

        /// Always draw a fresh quote instead of re-showing the last one.
        #[clap(long)]
        new: bool,
    },

    /// Add a new quote to the store.
    Add {
        /// The quote text.
        text: String,

        /// Category the quote belongs to.
        #[clap(long, default_value = quote_store::quote::DEFAULT_CATEGORY)]
        category: String,

        /// Optional attribution.
        #[clap(long)]
        author: Option<String>,

        /// Also send the new quote to this remote endpoint, fire-and-forget.
        #[clap(long)]
        push_url: Option<String>,
    },

    /// List the categories currently present in the store.
    Categories,

    /// Select and persist the category filter used by `show`.
    Filter {
        /// Category name, or "all" to clear the filter.
        category: String,
    },

    /// Write the full quote list to a JSON snapshot file.
    Export {
        /// Output file path.
        #[clap(long, default_value = quote_store::snapshot::EXPORT_FILE_NAME)]
        out: String,
    },

    /// Append the quotes from a JSON snapshot file.
    Import {
        /// Snapshot file path.
        file: String,
    },

    /// Poll a remote endpoint periodically, replacing local data on success.
    Sync {
        /// Remote endpoint URL serving a JSON array of quotes.
        #[clap(long)]
        remote_url: String,

        /// Seconds between polls.
        #[clap(long, default_value_t = 30)]
        interval: u64,
    },
}
