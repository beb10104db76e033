use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(name = "healthsheet")]
#[command(version)]
#[command(about = "Daily health report from food photos and tracker screenshots")]
pub struct Cli {
    /// Image files for one day's batch (food photos and screenshots)
    #[arg(required = true)]
    pub images: Vec<PathBuf>,

    /// Fold intra-workout BCAA into the extra-meal slot
    #[arg(long)]
    pub bcaa: bool,

    /// Fold post-workout protein + creatine into the extra-meal slot
    #[arg(long)]
    pub protein: bool,

    /// Skip the spreadsheet append even when configured
    #[arg(long)]
    pub no_sync: bool,

    /// Config file path (default: ~/.config/healthsheet/config.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Pretty-print the report JSON
    #[arg(long)]
    pub pretty: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_at_least_one_image() {
        assert!(Cli::try_parse_from(["healthsheet"]).is_err());
    }

    #[test]
    fn test_parses_flags_and_files() {
        let cli = Cli::try_parse_from([
            "healthsheet",
            "a.jpg",
            "b.png",
            "--bcaa",
            "--no-sync",
        ])
        .unwrap();
        assert_eq!(cli.images.len(), 2);
        assert!(cli.bcaa);
        assert!(!cli.protein);
        assert!(cli.no_sync);
        assert!(cli.config.is_none());
    }
}
