//! CLI for the document chat backend.

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};

use output::OutputFormat;

/// Chat with your documents: upload PDFs and images, then ask questions
/// answered from their content.
#[derive(Debug, Parser)]
#[command(name = "docchat")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[arg(long, short = 'f', global = true, help = "Output format: text or json")]
    pub format: Option<OutputFormat>,

    #[arg(long, short = 'v', global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Check backend status (vector store, registries, model)
    Status,

    /// Upload a PDF or image document
    Upload(commands::UploadArgs),

    /// Manage uploaded documents (list, delete)
    #[command(subcommand)]
    Documents(commands::DocumentsCommand),

    /// Manage chat sessions (new, list, show, rename, delete, export)
    #[command(subcommand)]
    Sessions(commands::SessionsCommand),

    /// Ask a question answered from the uploaded documents
    Chat(commands::ChatArgs),

    /// Manage the generative model (list, set)
    #[command(subcommand)]
    Models(commands::ModelsCommand),

    /// Delete all documents, chunks, and chat sessions
    Clear {
        /// Skip confirmation prompt
        #[arg(long, short = 'y')]
        force: bool,
    },
}
