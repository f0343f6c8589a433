//! pdfseek - semantic search over folders of PDF documents.
//!
//! pdfseek embeds a natural-language question and compares it against
//! embedded chunks of every PDF page in a folder, printing the best
//! matching passages together with a command that opens the document at
//! the right page. A content-hash manifest (`hash_store.json` next to the
//! PDFs) records what the vector index was built from, so the index is
//! only rebuilt when the folder's PDF bytes actually change.
//!
//! # Quick start
//!
//! ```no_run
//! use pdfseek::{ApiConfig, EmbeddingClient, IndexStore, manifest};
//!
//! # async fn run() -> pdfseek::Result<()> {
//! let store = IndexStore::resolve(std::path::Path::new("./docs"))?;
//!
//! if !store.has_index() || manifest::is_stale(store.folder())? {
//!     let pdfs = pdfseek::walker::discover_pdfs(store.folder())?;
//!     let api = ApiConfig::resolve(None, None)?;
//!     let embedder = EmbeddingClient::new(&api);
//!     pdfseek::ingestion::rebuild_index(&store, &pdfs, &embedder).await?;
//! }
//! // The rebuild persisted a fresh manifest, so the next check is cheap.
//! assert!(!manifest::is_stale(store.folder())?);
//! # Ok(())
//! # }
//! ```

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

pub use config::ApiConfig;
pub use embedding::EmbeddingClient;
pub use error::{Error, Result};
pub use index_db::IndexDb;
pub use platform::Platform;
pub use store::IndexStore;
