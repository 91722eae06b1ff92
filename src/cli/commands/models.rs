//! Models command implementation.

use anyhow::Result;
use clap::Subcommand;

use crate::app::App;
use crate::cli::output::{OutputFormat, get_formatter};
use crate::models::Config;

#[derive(Debug, Subcommand)]
pub enum ModelsCommand {
    /// List available models and the active one
    List,

    /// Switch the active model and persist the choice
    Set {
        #[arg(required = true)]
        model: String,
    },
}

pub async fn handle_models(cmd: ModelsCommand, format: OutputFormat, _verbose: bool) -> Result<()> {
    let mut config = Config::load()?;
    let formatter = get_formatter(format);

    match cmd {
        ModelsCommand::List => {
            let app = App::load(config).await?;
            print!("{}", formatter.format_models(&app.models().await));
        }
        ModelsCommand::Set { model } => {
            let app = App::load(config.clone()).await?;
            let changed = app.set_model(&model).await?;
            if changed {
                config.generation.model = model.clone();
                config.save()?;
                print!(
                    "{}",
                    formatter.format_message(&format!("Switched to {}", model))
                );
            } else {
                print!(
                    "{}",
                    formatter.format_message(&format!("{} is already active", model))
                );
            }
        }
    }

    Ok(())
}
