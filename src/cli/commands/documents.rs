//! Documents command implementation.

use anyhow::Result;
use clap::Subcommand;

use crate::app::App;
use crate::cli::output::{OutputFormat, get_formatter};
use crate::models::Config;

#[derive(Debug, Subcommand)]
pub enum DocumentsCommand {
    /// List uploaded documents
    List,

    /// Delete a document and its indexed chunks
    Delete {
        /// Document id (see `docchat documents list`)
        #[arg(required = true)]
        id: String,

        /// Skip confirmation prompt
        #[arg(long, short = 'y')]
        force: bool,
    },
}

pub async fn handle_documents(
    cmd: DocumentsCommand,
    format: OutputFormat,
    verbose: bool,
) -> Result<()> {
    let config = Config::load()?;
    let formatter = get_formatter(format);
    let mut app = App::load(config).await?;

    match cmd {
        DocumentsCommand::List => {
            print!("{}", formatter.format_documents(&app.documents()));
        }
        DocumentsCommand::Delete { id, force } => {
            if !force {
                println!("This will delete document '{}' and its chunks. Continue? [y/N]", id);
                let mut input = String::new();
                std::io::stdin().read_line(&mut input)?;
                if !input.trim().eq_ignore_ascii_case("y") {
                    println!("{}", formatter.format_message("Cancelled."));
                    return Ok(());
                }
            }

            if verbose {
                println!("Deleting document {}", id);
            }
            let removed = app.delete_document(&id).await?;
            print!(
                "{}",
                formatter.format_message(&format!("Deleted '{}' ({})", removed.name, removed.id))
            );
        }
    }

    Ok(())
}
