//! Index rebuild pipeline: fingerprint, extract, chunk, embed, store.

use tracing::info;

use crate::{
    chunking::{self, DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE},
    embedding::EmbeddingClient,
    error::Result,
    index_db::{ChunkRecord, IndexDb},
    manifest, pdf,
    store::IndexStore,
    walker::DiscoveredPdf,
};

/// Counters reported after a completed rebuild.
#[derive(Debug, Default)]
pub struct RebuildStats {
    pub documents: usize,
    pub pages: usize,
    pub chunks: usize,
}

/// Rebuild the vector index for a folder and persist the matching manifest.
///
/// The manifest snapshot is taken up front so the persisted record
/// describes the exact bytes that were indexed, and it is saved only after
/// the index write committed. An interruption between the two leaves a
/// mismatch that forces a redundant (but safe) rebuild on the next run.
pub async fn rebuild_index(
    store: &IndexStore,
    pdfs: &[DiscoveredPdf],
    embedder: &EmbeddingClient,
) -> Result<RebuildStats> {
    let snapshot = manifest::compute_folder_manifest(store.folder())?;

    let documents = pdf::load_documents(pdfs)?;
    info!(
        documents = pdfs.len(),
        pages = documents.len(),
        "extracted page text"
    );

    let mut records = Vec::new();
    for doc in &documents {
        for chunk in chunking::chunk_text(
            &doc.text,
            DEFAULT_CHUNK_SIZE,
            DEFAULT_CHUNK_OVERLAP,
        ) {
            records.push(ChunkRecord {
                file_name: doc.file_name.clone(),
                page: doc.page,
                text: chunk.text,
            });
        }
    }

    let texts: Vec<String> = records.iter().map(|r| r.text.clone()).collect();
    let vectors = embedder.embed_documents(&texts).await?;
    info!(chunks = records.len(), "embedded chunks");

    let entries: Vec<(u64, ChunkRecord, Vec<f32>)> = records
        .into_iter()
        .zip(vectors)
        .enumerate()
        .map(|(id, (record, vector))| (id as u64, record, vector))
        .collect();

    let index = IndexDb::open(&store.index_path())?;
    index.clear()?;
    index.batch_store(&entries)?;

    manifest::save_manifest(store.folder(), &snapshot)?;

    Ok(RebuildStats {
        documents: pdfs.len(),
        pages: documents.len(),
        chunks: entries.len(),
    })
}
