use std::path::Path;

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};

use crate::error::Result;

const CHUNKS: TableDefinition<u64, &[u8]> = TableDefinition::new("chunks");
const EMBEDDINGS: TableDefinition<u64, &[u8]> =
    TableDefinition::new("embeddings");

/// Header size: 4 bytes embedding dimension.
const HEADER_SIZE: usize = 4;

/// A chunk of PDF page text stored in the index.
///
/// Serialized as: `"file_name\0page\0text"`.
///
/// # Examples
///
/// ```
/// use pdfseek::index_db::ChunkRecord;
///
/// let record = ChunkRecord {
///     file_name: "manual.pdf".to_string(),
///     page: 12,
///     text: "torque settings".to_string(),
/// };
/// let bytes = record.serialize();
/// let restored = ChunkRecord::deserialize(&bytes).unwrap();
/// assert_eq!(record, restored);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkRecord {
    pub file_name: String,
    pub page: u32,
    pub text: String,
}

impl ChunkRecord {
    /// Serialize to a byte vector for storage in the index database.
    pub fn serialize(&self) -> Vec<u8> {
        format!("{}\0{}\0{}", self.file_name, self.page, self.text)
            .into_bytes()
    }

    /// Deserialize from bytes. Returns `None` if the format is invalid.
    pub fn deserialize(bytes: &[u8]) -> Option<Self> {
        let s = std::str::from_utf8(bytes).ok()?;
        let mut parts = s.splitn(3, '\0');
        let file_name = parts.next()?.to_string();
        let page = parts.next()?.parse().ok()?;
        let text = parts.next()?.to_string();
        Some(Self {
            file_name,
            page,
            text,
        })
    }
}

/// A similarity hit returned by [`IndexDb::search`].
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    pub score: f32,
    pub record: ChunkRecord,
}

/// Vector index over embedded text chunks, keyed by chunk id.
///
/// Binary format per embedding entry:
/// - 4 bytes: dimension D (u32 LE)
/// - D * 4 bytes: f32 LE values
pub struct IndexDb {
    db: Database,
}

impl IndexDb {
    /// Open or create an index database at the given path.
    pub fn open(path: &Path) -> Result<Self> {
        let db = Database::create(path)?;

        let txn = db.begin_write()?;
        txn.open_table(CHUNKS)?;
        txn.open_table(EMBEDDINGS)?;
        txn.commit()?;

        Ok(Self { db })
    }

    /// Remove every stored chunk and embedding.
    pub fn clear(&self) -> Result<()> {
        let txn = self.db.begin_write()?;
        txn.delete_table(CHUNKS)?;
        txn.delete_table(EMBEDDINGS)?;
        txn.open_table(CHUNKS)?;
        txn.open_table(EMBEDDINGS)?;
        txn.commit()?;
        Ok(())
    }

    /// Store chunk records with their embeddings in a single transaction.
    pub fn batch_store(
        &self,
        entries: &[(u64, ChunkRecord, Vec<f32>)],
    ) -> Result<()> {
        if entries.is_empty() {
            return Ok(());
        }

        let txn = self.db.begin_write()?;
        {
            let mut chunks = txn.open_table(CHUNKS)?;
            let mut embeddings = txn.open_table(EMBEDDINGS)?;

            for (chunk_id, record, vector) in entries {
                chunks.insert(*chunk_id, record.serialize().as_slice())?;

                let byte_len =
                    HEADER_SIZE + std::mem::size_of_val(vector.as_slice());
                let mut guard =
                    embeddings.insert_reserve(*chunk_id, byte_len)?;
                let dest = guard.as_mut();
                dest[0..HEADER_SIZE]
                    .copy_from_slice(&(vector.len() as u32).to_le_bytes());
                dest[HEADER_SIZE..]
                    .copy_from_slice(bytemuck::cast_slice(vector));
            }
        }
        txn.commit()?;
        Ok(())
    }

    /// Number of stored chunks.
    pub fn count(&self) -> Result<usize> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(CHUNKS)?;
        let mut count = 0;
        for entry in table.iter()? {
            entry?;
            count += 1;
        }
        Ok(count)
    }

    /// Brute-force cosine similarity search over all stored chunks.
    ///
    /// Returns the top `k` chunks sorted by score descending. Entries
    /// whose stored bytes do not decode are skipped.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<ScoredChunk>> {
        let txn = self.db.begin_read()?;
        let chunks = txn.open_table(CHUNKS)?;
        let embeddings = txn.open_table(EMBEDDINGS)?;

        let mut scored = Vec::new();
        for entry in embeddings.iter()? {
            let (key, value) = entry?;
            let chunk_id = key.value();

            let Some(vector) = decode_embedding(value.value()) else {
                continue;
            };
            let score = cosine_similarity(query, &vector);

            let Some(guard) = chunks.get(chunk_id)? else {
                continue;
            };
            let Some(record) = ChunkRecord::deserialize(guard.value()) else {
                continue;
            };

            scored.push(ScoredChunk { score, record });
        }

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(k);
        Ok(scored)
    }
}

impl std::fmt::Debug for IndexDb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexDb").finish_non_exhaustive()
    }
}

/// Decode a stored embedding: dimension header followed by f32 LE values.
///
/// Returns `None` when the byte length does not match the header.
fn decode_embedding(bytes: &[u8]) -> Option<Vec<f32>> {
    if bytes.len() < HEADER_SIZE {
        return None;
    }
    let dimension =
        u32::from_le_bytes(bytes[0..HEADER_SIZE].try_into().ok()?) as usize;
    if bytes.len() != HEADER_SIZE + dimension * 4 {
        return None;
    }
    Some(bytemuck::pod_collect_to_vec(&bytes[HEADER_SIZE..]))
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.is_empty() || a.len() != b.len() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a <= f32::EPSILON || norm_b <= f32::EPSILON {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}
