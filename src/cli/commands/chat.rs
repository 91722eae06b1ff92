//! Chat command implementation.

use anyhow::Result;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};

use crate::app::App;
use crate::cli::output::{OutputFormat, get_formatter};
use crate::models::Config;

#[derive(Debug, Args)]
pub struct ChatArgs {
    /// The question to ask
    #[arg(required = true)]
    pub message: String,

    /// Continue an existing session instead of starting a new one
    #[arg(long, short = 's')]
    pub session: Option<String>,

    /// Restrict retrieval to these document ids (repeatable)
    #[arg(long, short = 'd', value_name = "DOC_ID")]
    pub docs: Vec<String>,
}

pub async fn handle_chat(args: ChatArgs, format: OutputFormat, verbose: bool) -> Result<()> {
    let config = Config::load()?;
    let formatter = get_formatter(format);
    let mut app = App::load(config).await?;

    let session_id = match args.session {
        Some(id) => id,
        None => app.create_session()?,
    };

    let doc_ids = if args.docs.is_empty() {
        None
    } else {
        Some(args.docs)
    };

    if verbose {
        println!(
            "Session {} (scope: {})",
            session_id,
            doc_ids
                .as_ref()
                .map(|d| d.len().to_string())
                .unwrap_or_else(|| "all documents".to_string())
        );
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message("Thinking...");
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    let result = app.chat(&session_id, &args.message, doc_ids).await;
    pb.finish_and_clear();

    let reply = result?;
    print!("{}", formatter.format_reply(&session_id, &reply));

    Ok(())
}
