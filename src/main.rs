use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};

use healthsheet::cli::Cli;
use healthsheet::sheets::{flatten_row, SheetSink};
use healthsheet::{generate_report, AppConfig, QuickAdds, SinkError, UploadedImage};

/// Raster formats accepted at the upload boundary.
const ALLOWED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;

    let mut files = Vec::with_capacity(cli.images.len());
    for path in &cli.images {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default();
        if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
            anyhow::bail!(
                "unsupported image type '{}' (allowed: jpg, jpeg, png)",
                path.display()
            );
        }
        let bytes = std::fs::read(path)
            .with_context(|| format!("failed to read image '{}'", path.display()))?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        files.push(UploadedImage { filename, bytes });
    }

    let quick_adds = QuickAdds {
        bcaa: cli.bcaa,
        protein: cli.protein,
    };

    let record = generate_report(&files, &quick_adds, &config).await?;

    let output = if cli.pretty {
        serde_json::to_string_pretty(&record)?
    } else {
        serde_json::to_string(&record)?
    };
    println!("{}", output);
    for line in record.overview_lines() {
        eprintln!("{}", line);
    }

    if config.auto_sync && !cli.no_sync {
        match SheetSink::from_config(&config) {
            Ok(sink) => match sink.append_row(&flatten_row(&record)).await {
                Ok(()) => info!("Report appended to sheet"),
                Err(e) => {
                    warn!("Sheet sync failed: {}", e);
                    eprintln!("warning: sheet sync failed: {}", e);
                }
            },
            Err(SinkError::MissingCredentials) => {
                info!("Sheet sync not configured, skipping")
            }
            Err(e) => {
                warn!("Sheet sync unavailable: {}", e);
                eprintln!("warning: sheet sync unavailable: {}", e);
            }
        }
    }

    Ok(())
}
