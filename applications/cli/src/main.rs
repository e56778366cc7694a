/// Audioshelf - audiobook library scanner
use anyhow::Context;
use clap::{Parser, Subcommand};
use shelf_artwork::FolderCoverResolver;
use shelf_cli::{render, CliError, ShelfConfig, DEFAULT_LOG_FILTER};
use shelf_core::LibraryFilter;
use shelf_metadata::AudioProbe;
use shelf_scanner::{LibraryScanner, ScanEvent};
use shelf_storage::CatalogStore;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "shelf")]
#[command(about = "Audiobook library scanner", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "SHELF_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a library directory into the catalog
    Scan {
        /// Library root (defaults to library.root from the configuration)
        path: Option<PathBuf>,
    },
    /// Print the catalog as a tree
    List {
        /// all, not-started, in-progress or completed
        #[arg(short, long, default_value = "all", value_parser = parse_filter)]
        filter: LibraryFilter,

        /// Print JSON instead of a tree
        #[arg(long)]
        json: bool,
    },
    /// Show one catalog node and its files
    Show {
        /// Library-relative path of the node
        path: String,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

fn parse_filter(value: &str) -> Result<LibraryFilter, String> {
    LibraryFilter::from_str(value).ok_or_else(|| {
        format!("unknown filter '{value}' (expected all, not-started, in-progress or completed)")
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so command output can be piped
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = ShelfConfig::load(cli.config.as_deref())?;
    config.validate()?;

    match cli.command {
        Commands::Scan { path } => scan(&config, path).await?,
        Commands::List { filter, json } => list(&config, filter, json).await?,
        Commands::Show { path, json } => show(&config, &path, json).await?,
    }

    Ok(())
}

async fn open_catalog(config: &ShelfConfig) -> anyhow::Result<CatalogStore> {
    if let Some(parent) = config
        .library
        .database_file()
        .as_deref()
        .and_then(std::path::Path::parent)
        .filter(|p| !p.as_os_str().is_empty())
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating database directory {}", parent.display()))?;
    }

    let store = CatalogStore::open(&config.library.database_url).await?;
    tracing::debug!("Catalog open at {}", config.library.database_url);
    Ok(store)
}

async fn scan(config: &ShelfConfig, path: Option<PathBuf>) -> anyhow::Result<()> {
    let root = path.or_else(|| config.library.root.clone()).ok_or_else(|| {
        CliError::InvalidArgument(
            "no library path given and library.root is not configured".to_string(),
        )
    })?;

    let store = open_catalog(config).await?;
    let probe = AudioProbe::new(&config.probe);
    let covers = FolderCoverResolver::new(config.covers.clone())
        .with_audio_extensions(config.scan.audio_extensions.clone());

    let scanner = LibraryScanner::new(store, Arc::new(probe), Arc::new(covers))
        .with_config(config.scan.clone());

    let mut handle = scanner.spawn(root);
    let mut failure = None;
    while let Some(event) = handle.next_event().await {
        if let ScanEvent::Failed { error } = event {
            failure = Some(error);
        }
    }

    let count = handle.finish().await;
    if let Some(error) = failure {
        anyhow::bail!("scan failed: {}", error);
    }

    println!("{}", count);
    Ok(())
}

async fn list(config: &ShelfConfig, filter: LibraryFilter, json: bool) -> anyhow::Result<()> {
    let store = open_catalog(config).await?;
    let nodes = store.list_filtered(filter).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&nodes)?);
    } else if nodes.is_empty() {
        match filter {
            LibraryFilter::All => println!("Catalog is empty"),
            other => println!("No {} audiobooks", other),
        }
    } else {
        print!("{}", render::render_tree(&nodes));
    }

    Ok(())
}

async fn show(config: &ShelfConfig, path: &str, json: bool) -> anyhow::Result<()> {
    let store = open_catalog(config).await?;
    let node = store
        .get_node(path)
        .await?
        .ok_or_else(|| CliError::NotFound(path.to_string()))?;
    let files = store.file_records(path).await?;

    if json {
        let value = serde_json::json!({ "node": node, "files": files });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        print!("{}", render::render_node(&node, &files));
    }

    Ok(())
}
