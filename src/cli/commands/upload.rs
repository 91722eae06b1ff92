//! Upload command implementation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};

use crate::app::App;
use crate::cli::output::{OutputFormat, get_formatter};
use crate::extract::DEFAULT_OCR_LANG;
use crate::models::Config;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "tiff", "bmp", "gif"];

#[derive(Debug, Args)]
pub struct UploadArgs {
    /// Path to the PDF or image file to upload
    #[arg(required = true)]
    pub path: PathBuf,

    /// OCR language for image uploads (tesseract language code)
    #[arg(long, default_value = DEFAULT_OCR_LANG)]
    pub lang: String,
}

pub async fn handle_upload(args: UploadArgs, format: OutputFormat, verbose: bool) -> Result<()> {
    let config = Config::load()?;
    let formatter = get_formatter(format);

    let path = args.path.canonicalize().context("invalid path")?;
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    let is_pdf = extension == "pdf";
    let is_image = IMAGE_EXTENSIONS.contains(&extension.as_str());
    if !is_pdf && !is_image {
        anyhow::bail!("unsupported file type: {} (expected pdf or image)", extension);
    }

    if verbose {
        println!("Uploading {}", path.display());
    }

    let mut app = App::load(config).await?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(if is_pdf {
        "Extracting and indexing..."
    } else {
        "Running OCR and indexing..."
    });
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    let result = if is_pdf {
        app.upload_pdf(&path).await
    } else {
        app.upload_image(&path, &args.lang).await
    };
    pb.finish_and_clear();

    let report = result?;
    print!("{}", formatter.format_upload(&report));

    Ok(())
}
