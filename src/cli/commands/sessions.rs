//! Sessions command implementation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Subcommand;

use crate::app::App;
use crate::cli::output::{OutputFormat, get_formatter};
use crate::models::Config;

#[derive(Debug, Subcommand)]
pub enum SessionsCommand {
    /// Create a new chat session
    New,

    /// List chat sessions
    List,

    /// Show a session transcript
    Show {
        #[arg(required = true)]
        id: String,
    },

    /// Rename a session
    Rename {
        #[arg(required = true)]
        id: String,

        #[arg(required = true)]
        title: String,
    },

    /// Delete a session
    Delete {
        #[arg(required = true)]
        id: String,

        /// Skip confirmation prompt
        #[arg(long, short = 'y')]
        force: bool,
    },

    /// Export a session transcript as plain text
    Export {
        #[arg(required = true)]
        id: String,

        /// Write to a file instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
}

pub async fn handle_sessions(
    cmd: SessionsCommand,
    format: OutputFormat,
    _verbose: bool,
) -> Result<()> {
    let config = Config::load()?;
    let formatter = get_formatter(format);
    let mut app = App::load(config).await?;

    match cmd {
        SessionsCommand::New => {
            let session_id = app.create_session()?;
            print!(
                "{}",
                formatter.format_message(&format!("Created session {}", session_id))
            );
        }
        SessionsCommand::List => {
            print!("{}", formatter.format_sessions(&app.sessions()));
        }
        SessionsCommand::Show { id } => {
            let session = app.session(&id)?;
            print!("{}", formatter.format_session(&id, session));
        }
        SessionsCommand::Rename { id, title } => {
            app.rename_session(&id, &title)?;
            print!(
                "{}",
                formatter.format_message(&format!("Renamed session {}", id))
            );
        }
        SessionsCommand::Delete { id, force } => {
            if !force {
                println!("This will delete session '{}'. Continue? [y/N]", id);
                let mut input = String::new();
                std::io::stdin().read_line(&mut input)?;
                if !input.trim().eq_ignore_ascii_case("y") {
                    println!("{}", formatter.format_message("Cancelled."));
                    return Ok(());
                }
            }
            app.delete_session(&id)?;
            print!(
                "{}",
                formatter.format_message(&format!("Deleted session {}", id))
            );
        }
        SessionsCommand::Export { id, output } => {
            let transcript = app.export_session(&id)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, &transcript)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    print!(
                        "{}",
                        formatter.format_message(&format!("Exported to {}", path.display()))
                    );
                }
                None => println!("{}", transcript),
            }
        }
    }

    Ok(())
}
