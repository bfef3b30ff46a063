//! Build the Leaflet docset from a mirrored reference page.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use leaflet_docset::{build_docset, BundleInfo, Options};

#[derive(Parser)]
#[command(name = "leaflet-docset")]
#[command(version)]
#[command(about = "Build an offline Dash/Zeal docset from the Leaflet API reference", long_about = None)]
struct Cli {
    /// Docset bundle directory holding the mirrored site
    #[arg(long, default_value = "dist/Leaflet.docset")]
    docset: PathBuf,

    /// Mirrored site directory under Contents/Resources/Documents
    #[arg(long, default_value = "leafletjs.com")]
    site: String,

    /// Reference page inside the site directory
    #[arg(long, default_value = "reference.html")]
    index_file: String,

    /// syntect theme for code samples
    #[arg(long, default_value = "InspiredGitHub")]
    theme: String,

    /// Where to write the JSON symbol dump
    #[arg(long, default_value = "nodes.json")]
    symbols: PathBuf,

    /// Skip the JSON symbol dump
    #[arg(long, conflicts_with = "symbols")]
    no_symbols: bool,

    /// Where to write the .tgz archive
    #[arg(long, default_value = "dist/Leaflet.tgz")]
    archive: PathBuf,

    /// Skip the archive
    #[arg(long, conflicts_with = "archive")]
    no_archive: bool,

    /// Keep the page's original whitespace
    #[arg(long)]
    no_minify: bool,

    /// Print the full run report as JSON
    #[arg(long)]
    report: bool,

    /// Log per-item progress
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn options(&self) -> Options {
        Options {
            docset_dir: self.docset.clone(),
            path_prefix: format!("{}/{}", self.site, self.index_file),
            site_dir_name: self.site.clone(),
            index_file: self.index_file.clone(),
            highlight_theme: self.theme.clone(),
            symbols_dump: (!self.no_symbols).then(|| self.symbols.clone()),
            archive_path: (!self.no_archive).then(|| self.archive.clone()),
            minify: !self.no_minify,
            bundle: BundleInfo::default(),
            ..Options::default()
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let options = cli.options();
    let report = build_docset(&options)
        .with_context(|| format!("failed to build docset in {}", options.docset_dir.display()))?;

    if cli.report {
        println!("{}", report.to_json()?);
    } else {
        println!("{report}");
    }
    Ok(())
}
