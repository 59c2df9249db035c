//! overtrace: prepare a reference image for tracing.
//!
//! Runs the transform pipeline on an image file, writes the result as
//! `trace_image.png` and optionally emits the overlay data URI.
//!
//! # Usage
//!
//! ```text
//! overtrace [OPTIONS] <IMAGE_PATH>
//! overtrace photo.jpg --rotation 90 --mode "magic outline" --grid --data-uri -
//! ```

use std::io::Write;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod args;

use args::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over --verbose so a single module can be traced.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if cli.verbose { "debug" } else { "warn" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    run(&cli)
}

fn run(cli: &Cli) -> Result<()> {
    let params = cli.transform_params()?;
    tracing::debug!(?params, "transform parameters");

    let image_bytes = std::fs::read(&cli.image_path)
        .with_context(|| format!("reading {}", cli.image_path.display()))?;
    tracing::info!(
        path = %cli.image_path.display(),
        bytes = image_bytes.len(),
        "loaded image"
    );

    let output = overtrace_pipeline::process(&image_bytes, &params)
        .with_context(|| format!("processing {}", cli.image_path.display()))?;

    let png = overtrace_export::to_png(&output)?;
    std::fs::create_dir_all(&cli.out_dir)
        .with_context(|| format!("creating {}", cli.out_dir.display()))?;
    let png_path = cli.out_dir.join(overtrace_export::DOWNLOAD_FILENAME);
    std::fs::write(&png_path, &png)
        .with_context(|| format!("writing {}", png_path.display()))?;
    tracing::info!(
        path = %png_path.display(),
        width = output.width(),
        height = output.height(),
        "wrote download image"
    );

    if let Some(ref target) = cli.data_uri {
        let overlay = overtrace_export::encode(&output)?;
        if cli.data_uri_to_stdout() {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{overlay}").context("writing data URI to stdout")?;
        } else {
            std::fs::write(target, overlay.as_str())
                .with_context(|| format!("writing {}", target.display()))?;
            tracing::info!(path = %target.display(), "wrote overlay data URI");
        }
    }

    Ok(())
}
