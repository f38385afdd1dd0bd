use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use pdfsplitter::DropPosition;

/// Edit PDF bookmarks and split PDFs into chapter files.
#[derive(Debug, Parser)]
#[command(name = "pdfsplitter", about, version)]
pub struct Cli {
    /// Print debug logging to stderr (filter with RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List the bookmark tree
    Bookmarks {
        /// Path to the PDF file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Detect chapter page ranges from the top-level bookmarks
    Chapters {
        /// Path to the PDF file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Add a bookmark
    Add {
        /// Path to the PDF file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Target page (1-based)
        #[arg(long)]
        page: usize,

        /// Bookmark title
        #[arg(long)]
        title: String,

        /// Parent bookmark path (titles joined with '/', '\/' for a slash in a title). Default: top level
        #[arg(long)]
        parent: Option<String>,

        /// Heading level 1-4. Default: one below the parent
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=4))]
        level: Option<u8>,

        /// Write to this file instead of modifying FILE
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Delete a bookmark and everything below it
    Delete {
        /// Path to the PDF file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Bookmark path (titles joined with '/', '\/' for a slash in a title)
        #[arg(value_name = "PATH")]
        path: String,

        /// Write to this file instead of modifying FILE
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Move a bookmark before, after or inside another one
    Move {
        /// Path to the PDF file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Path of the bookmark to move
        #[arg(value_name = "SOURCE")]
        source: String,

        /// Path of the bookmark to drop onto
        #[arg(value_name = "TARGET")]
        target: String,

        /// Drop position relative to TARGET
        #[arg(long, value_enum)]
        position: PositionArg,

        /// Write to this file instead of modifying FILE
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Only validate the move; do not write anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Split the PDF into one file per chapter
    Split {
        /// Path to the PDF file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Directory for the chapter files (created if missing)
        #[arg(long)]
        output_dir: PathBuf,

        /// Chapter ranges, e.g. 'Intro:1-3,Body:4-9'. Default: detected chapters
        #[arg(long)]
        ranges: Option<String>,

        /// Replace chapter files that already exist
        #[arg(long)]
        overwrite: bool,

        /// Reject ranges that run past the last page instead of clamping them
        #[arg(long)]
        no_clamp: bool,
    },
}

/// Output format for listing commands.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Drop position for `move`.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PositionArg {
    Before,
    After,
    Inside,
}

impl From<PositionArg> for DropPosition {
    fn from(position: PositionArg) -> Self {
        match position {
            PositionArg::Before => DropPosition::Before,
            PositionArg::After => DropPosition::After,
            PositionArg::Inside => DropPosition::Inside,
        }
    }
}
