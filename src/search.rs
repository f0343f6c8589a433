use std::path::{Path, PathBuf};

use serde_json::json;

use crate::{
    cli::SearchArgs,
    embedding::EmbeddingClient,
    error::Result,
    index_db::{IndexDb, ScoredChunk},
    platform::Platform,
};

/// Number of characters of chunk text shown per hit.
const SNIPPET_CHARS: usize = 300;

/// A search hit mapped back to its source document and page.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub rank: usize,
    pub score: f32,
    pub file_name: String,
    pub absolute_path: PathBuf,
    pub page: u32,
    pub snippet: String,
}

/// Execute the similarity query pipeline.
///
/// 1. Embed the question
/// 2. Cosine top-K over the chunk index
/// 3. Filter by --min-score
/// 4. Map hits back to their source file and page
pub async fn execute_search(
    args: &SearchArgs,
    index: &IndexDb,
    embedder: &EmbeddingClient,
    folder: &Path,
) -> Result<Vec<SearchHit>> {
    let query_embedding = embedder.embed_query(&args.query).await?;
    let scored = index.search(&query_embedding, args.count)?;
    Ok(rank_hits(scored, folder, args.min_score))
}

/// Filter, rank, and resolve scored chunks into final hits.
fn rank_hits(
    scored: Vec<ScoredChunk>,
    folder: &Path,
    min_score: f32,
) -> Vec<SearchHit> {
    scored
        .into_iter()
        .filter(|c| c.score >= min_score)
        .enumerate()
        .map(|(i, c)| {
            let joined = folder.join(&c.record.file_name);
            let absolute_path = joined.canonicalize().unwrap_or(joined);
            SearchHit {
                rank: i + 1,
                score: c.score,
                file_name: c.record.file_name,
                absolute_path,
                page: c.record.page,
                snippet: snippet(&c.record.text),
            }
        })
        .collect()
}

/// Collapse whitespace and cap the passage preview length.
fn snippet(text: &str) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    flat.chars().take(SNIPPET_CHARS).collect()
}

/// Format results for human-readable terminal output.
pub fn format_human(hits: &[SearchHit], platform: Platform) {
    if hits.is_empty() {
        println!("No results found.");
        return;
    }

    for hit in hits {
        println!(
            "{:>3}. [{:.3}] {} p.{}",
            hit.rank, hit.score, hit.file_name, hit.page
        );
        println!("     {}", hit.snippet);
        match platform.open_command(&hit.absolute_path, hit.page) {
            Some(cmd) => println!(
                "     To jump directly to this section, copy this command: {cmd}"
            ),
            None => println!(
                "     (unrecognized operating system, no page link available)"
            ),
        }
    }
    println!("\n{} result(s)", hits.len());
}

/// Format results as JSON output.
pub fn format_json(hits: &[SearchHit], query: &str) {
    let results: Vec<_> = hits
        .iter()
        .map(|hit| {
            json!({
                "rank": hit.rank,
                "score": hit.score,
                "file": hit.file_name,
                "path": hit.absolute_path.to_string_lossy(),
                "page": hit.page,
                "snippet": hit.snippet,
            })
        })
        .collect();

    let output = json!({
        "query": query,
        "result_count": hits.len(),
        "results": results,
    });
    println!("{output}");
}

/// Format results as plain file paths (one per line).
pub fn format_files(hits: &[SearchHit]) {
    for hit in hits {
        println!("{}", hit.absolute_path.display());
    }
}
