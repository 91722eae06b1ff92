//! Clear command implementation.

use anyhow::Result;
use console::style;

use crate::app::App;
use crate::cli::output::{OutputFormat, get_formatter};
use crate::models::Config;

pub async fn handle_clear(force: bool, format: OutputFormat, verbose: bool) -> Result<()> {
    let config = Config::load()?;
    let formatter = get_formatter(format);

    if !force {
        println!(
            "{} This will delete ALL documents, chunks, and chat sessions. Continue? [y/N]",
            style("Warning:").red().bold()
        );
        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;
        if !input.trim().eq_ignore_ascii_case("y") {
            println!("{}", formatter.format_message("Cancelled."));
            return Ok(());
        }
    }

    if verbose {
        println!("Clearing all data...");
    }

    let mut app = App::load(config).await?;
    app.clear_all().await?;

    print!(
        "{}",
        formatter.format_message("All documents and chat sessions have been cleared.")
    );

    Ok(())
}
