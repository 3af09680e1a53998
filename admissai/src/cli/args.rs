//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// AdmissAI - college admissions assistant client
#[derive(Parser, Debug)]
#[command(name = "admissai")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Backend base URL (default: $ADMISSAI_SERVER or http://127.0.0.1:5000)
    #[arg(long, global = true)]
    pub server: Option<String>,

    /// Directory for saved checklist progress (default: $ADMISSAI_DATA_DIR)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Interactive chat with the admissions assistant
    Chat {
        /// Program id to scope questions to
        #[arg(short, long)]
        program: Option<String>,

        /// Print replies as rendered HTML instead of plain text
        #[arg(long)]
        html: bool,
    },

    /// Ask a single question and print the reply
    Ask {
        /// Program id to scope the question to
        #[arg(short, long)]
        program: Option<String>,

        /// Print the reply as rendered HTML instead of plain text
        #[arg(long)]
        html: bool,

        /// The question
        #[arg(trailing_var_arg = true, required = true)]
        message: Vec<String>,
    },

    /// List programs in the catalog
    Programs {
        /// Only programs in this category
        #[arg(short, long)]
        category: Option<String>,

        /// Free-text search over university and program names
        #[arg(short, long)]
        query: Option<String>,
    },

    /// Show one program and its context-compression stats
    Program {
        /// Program id
        id: String,
    },

    /// Application checklist for a program
    Checklist {
        #[command(subcommand)]
        action: ChecklistAction,
    },

    /// Compress text with the backend compressor
    Compress {
        /// Target compression ratio (0.1 - 0.9)
        #[arg(short, long, default_value = "0.45")]
        ratio: f64,

        /// Text to compress
        #[arg(trailing_var_arg = true, required = true)]
        text: Vec<String>,
    },

    /// Render markdown from stdin to HTML on stdout
    Render,
}

/// Checklist actions
#[derive(Subcommand, Debug)]
pub enum ChecklistAction {
    /// Show the checklist and saved progress
    Show {
        /// Program id
        program_id: String,
    },

    /// Check or uncheck one or more items
    Toggle {
        /// Program id
        program_id: String,

        /// Item ids to flip, in order
        #[arg(required = true)]
        items: Vec<String>,
    },
}
