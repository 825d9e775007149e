//! Docshelf - terminal catalog for PDF, EPUB and plain-text documents
//!
//! Documents live under a storage root split into one canonical subdirectory
//! per type. Docshelf lists them with their filesystem metadata and lets the
//! operator add, rename and remove files from a text menu.

mod app;
mod core;
mod ui;

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::DocshelfApp;
use crate::core::catalog::CatalogManager;
use crate::core::config::AppConfig;
use crate::ui::catalog_view::CatalogView;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Storage root holding the document directories
    #[arg(short, long)]
    root: Option<PathBuf>,

    /// Configuration file to use instead of the default one
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the catalog once and exit
    #[arg(long)]
    list: bool,

    /// With --list, only show documents under this subdirectory of the root
    #[arg(long, value_name = "SUBDIR", requires = "list")]
    under: Option<PathBuf>,

    /// With --list, print the catalog as JSON
    #[arg(long, requires = "list")]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; stdout belongs to the menu
    let level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(level)
        .init();

    let config = match cli.config.clone().or_else(AppConfig::config_path) {
        Some(path) => AppConfig::load_with_root(&path, cli.root),
        None => {
            tracing::warn!("Could not determine config directory, using defaults");
            let mut config = AppConfig::default();
            if let Some(root) = cli.root {
                config.use_storage_root(root);
            }
            config
        }
    };

    let catalog = CatalogManager::new(config.storage_root.clone(), config.type_directories.clone());

    if cli.list {
        let records = match &cli.under {
            Some(subdir) => catalog.list_documents_under(subdir),
            None => catalog.list_documents(),
        };
        let stdout = io::stdout();
        let mut out = stdout.lock();
        if cli.json {
            serde_json::to_writer_pretty(&mut out, &records).context("Failed to write catalog")?;
            writeln!(out)?;
        } else {
            CatalogView::show(&mut out, catalog.root(), &records)?;
        }
        return Ok(());
    }

    let stdin = io::stdin();
    DocshelfApp::new(catalog, stdin.lock(), io::stdout()).run()
}
