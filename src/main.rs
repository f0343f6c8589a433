use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

pub mod chunking;
pub mod cli;
pub mod config;
pub mod embedding;
pub mod error;
pub mod index_db;
pub mod ingestion;
pub mod manifest;
pub mod pdf;
pub mod platform;
pub mod search;
pub mod store;
pub mod walker;

use cli::{Cli, Command};
use config::ApiConfig;
use embedding::EmbeddingClient;
use index_db::IndexDb;
use platform::Platform;
use store::IndexStore;
use walker::DiscoveredPdf;

fn init_tracing(verbose: u8) {
    let filter = if let Ok(env) = std::env::var("PDFSEEK_LOG") {
        EnvFilter::new(env)
    } else {
        match verbose {
            0 => EnvFilter::new("info"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

#[tokio::main]
async fn main() -> error::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let platform = Platform::detect();
    debug!(?platform, "detected platform");

    match cli.command {
        Command::Search(args) => {
            let store = IndexStore::resolve(&cli.dir)?;
            let api =
                ApiConfig::resolve(cli.api_key.as_deref(), cli.model.as_deref())?;
            cmd_search(&store, &api, &args, platform).await?;
        }
        Command::Rebuild => {
            let store = IndexStore::resolve(&cli.dir)?;
            let api =
                ApiConfig::resolve(cli.api_key.as_deref(), cli.model.as_deref())?;
            cmd_rebuild(&store, &api).await?;
        }
        Command::Status(args) => {
            let store = IndexStore::resolve(&cli.dir)?;
            cmd_status(&store, args.json)?;
        }
        Command::Completions(args) => args.generate(),
    }

    Ok(())
}

/// Discover the folder's PDFs, failing fast when there are none.
fn discover_or_fail(store: &IndexStore) -> error::Result<Vec<DiscoveredPdf>> {
    let pdfs = walker::discover_pdfs(store.folder())?;
    if pdfs.is_empty() {
        return Err(error::Error::Config(format!(
            "no PDF documents found in {}",
            store.folder().display()
        )));
    }
    Ok(pdfs)
}

async fn cmd_search(
    store: &IndexStore,
    api: &ApiConfig,
    args: &cli::SearchArgs,
    platform: Platform,
) -> error::Result<()> {
    let pdfs = discover_or_fail(store)?;
    let embedder = EmbeddingClient::new(api);

    if !store.has_index() {
        info!("no local index stored, building one, this could take a while");
        ingestion::rebuild_index(store, &pdfs, &embedder).await?;
    } else if manifest::is_stale(store.folder())? {
        info!("changes detected in the documents, rebuilding index");
        ingestion::rebuild_index(store, &pdfs, &embedder).await?;
    } else {
        debug!("documents unchanged, using stored index");
    }

    let index = IndexDb::open(&store.index_path())?;
    let hits =
        search::execute_search(args, &index, &embedder, store.folder()).await?;

    if args.json {
        search::format_json(&hits, &args.query);
    } else if args.files {
        search::format_files(&hits);
    } else {
        search::format_human(&hits, platform);
    }

    Ok(())
}

async fn cmd_rebuild(store: &IndexStore, api: &ApiConfig) -> error::Result<()> {
    let pdfs = discover_or_fail(store)?;
    let embedder = EmbeddingClient::new(api);

    let stats = ingestion::rebuild_index(store, &pdfs, &embedder).await?;
    println!(
        "Rebuilt index for {}: {} document(s), {} page(s), {} chunk(s)",
        store.folder().display(),
        stats.documents,
        stats.pages,
        stats.chunks
    );
    Ok(())
}

fn cmd_status(store: &IndexStore, json: bool) -> error::Result<()> {
    let pdfs = walker::discover_pdfs(store.folder())?;
    let has_index = store.has_index();
    let has_manifest = store.manifest_path().is_file();
    let stale = manifest::is_stale(store.folder())?;

    // Only open the database when it already exists; opening creates one.
    let chunks = if has_index {
        Some(IndexDb::open(&store.index_path())?.count()?)
    } else {
        None
    };

    if json {
        println!(
            "{}",
            serde_json::json!({
                "folder": store.folder().to_string_lossy(),
                "documents": pdfs.len(),
                "index": has_index,
                "chunks": chunks,
                "manifest": has_manifest,
                "stale": stale,
            })
        );
    } else {
        println!("Folder: {}", store.folder().display());
        println!("PDF documents: {}", pdfs.len());
        match chunks {
            Some(chunks) => println!("Index: present ({chunks} chunks)"),
            None => println!("Index: missing"),
        }
        println!(
            "Manifest: {}",
            if has_manifest { "present" } else { "missing" }
        );
        println!(
            "Freshness: {}",
            if stale { "stale (rebuild needed)" } else { "fresh" }
        );
    }
    Ok(())
}
