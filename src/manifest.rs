//! Content-hash manifest gating vector index rebuilds.
//!
//! Every watched folder carries a `hash_store.json` record mapping each PDF
//! file name to the SHA-256 digest of its full byte content. The record is
//! written together with the vector index after a successful rebuild; a
//! later invocation compares it against a freshly computed manifest to
//! decide whether the stored index may be reused.
//!
//! Whole-file content hashing (rather than mtime or size heuristics) stays
//! correct under clock skew, timestamp-preserving copies, and same-size
//! edits, at the cost of reading every PDF once per check.

use std::{collections::BTreeMap, io::Read, path::Path};

use sha2::{Digest, Sha256};

use crate::{error::Result, walker};

/// File name of the persisted manifest record inside the watched folder.
pub const MANIFEST_FILENAME: &str = "hash_store.json";

/// Read buffer size used while fingerprinting a file.
const HASH_CHUNK_SIZE: usize = 4096;

/// Mapping from PDF file name to lowercase hex SHA-256 digest.
pub type Manifest = BTreeMap<String, String>;

/// Compute the content fingerprint of a single file.
///
/// Streams the file through the hasher in fixed-size chunks, so memory use
/// stays flat regardless of file size. The handle is closed when the read
/// completes or fails.
///
/// # Examples
///
/// ```
/// # let tmp = tempfile::tempdir().unwrap();
/// # let path = tmp.path().join("doc.pdf");
/// # std::fs::write(&path, b"X").unwrap();
/// use pdfseek::manifest::fingerprint_file;
///
/// let digest = fingerprint_file(&path).unwrap();
/// assert_eq!(digest.len(), 64);
/// assert_eq!(digest, fingerprint_file(&path).unwrap());
/// ```
pub fn fingerprint_file(path: &Path) -> Result<String> {
    let mut file = std::fs::File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; HASH_CHUNK_SIZE];

    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

/// Fingerprint every PDF in the folder (non-recursive).
///
/// Pure computation: no persisted state is touched. Fails with an I/O
/// error if the folder is unreadable or a file disappears mid-scan.
pub fn compute_folder_manifest(folder: &Path) -> Result<Manifest> {
    let mut manifest = Manifest::new();
    for pdf in walker::discover_pdfs(folder)? {
        let digest = fingerprint_file(&pdf.absolute_path)?;
        manifest.insert(pdf.file_name, digest);
    }
    Ok(manifest)
}

/// Load the persisted manifest record for a folder.
///
/// A missing record file is the "no prior index" case and yields an empty
/// mapping, not an error. There is no version field: a record that does
/// not parse as a flat string-to-string object also reads as empty, which
/// [`is_stale`] turns into a rebuild.
pub fn load_manifest(folder: &Path) -> Result<Manifest> {
    let path = folder.join(MANIFEST_FILENAME);
    if !path.is_file() {
        return Ok(Manifest::new());
    }
    let contents = std::fs::read_to_string(&path)?;
    Ok(serde_json::from_str(&contents).unwrap_or_default())
}

/// Overwrite the persisted manifest record for a folder.
///
/// Called only after an index rebuild completed, so the record always
/// describes the exact index stored on disk. No concurrent-writer
/// guarantee: two processes racing on one folder is last-writer-wins.
pub fn save_manifest(folder: &Path, manifest: &Manifest) -> Result<()> {
    let path = folder.join(MANIFEST_FILENAME);
    let contents = serde_json::to_string(manifest)?;
    std::fs::write(path, contents)?;
    Ok(())
}

/// Report whether the cached index is stale for the folder's current PDFs.
///
/// Stale means: no manifest was ever persisted, or the stored mapping
/// differs from the freshly computed one in any key or value. Exact
/// equality also covers removals and renames, since a missing or renamed
/// file leaves the stored mapping with a key the current one lacks.
///
/// Advisory only, no mutation: the caller rebuilds and then persists the
/// new manifest via [`save_manifest`].
pub fn is_stale(folder: &Path) -> Result<bool> {
    let stored = load_manifest(folder)?;
    if stored.is_empty() {
        return Ok(true);
    }
    let current = compute_folder_manifest(folder)?;
    Ok(stored != current)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprints_are_deterministic() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("a.pdf"), "same bytes").unwrap();
        std::fs::write(tmp.path().join("b.pdf"), "other bytes").unwrap();

        let first = compute_folder_manifest(tmp.path()).unwrap();
        let second = compute_folder_manifest(tmp.path()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn fingerprint_changes_with_content() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("a.pdf");

        std::fs::write(&path, "version one").unwrap();
        let before = compute_folder_manifest(tmp.path()).unwrap();

        std::fs::write(&path, "version two").unwrap();
        let after = compute_folder_manifest(tmp.path()).unwrap();

        assert_ne!(before["a.pdf"], after["a.pdf"]);
    }

    #[test]
    fn known_sha256_digest() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("x.pdf");
        std::fs::write(&path, "abc").unwrap();

        // sha256("abc")
        assert_eq!(
            fingerprint_file(&path).unwrap(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn large_file_streams_in_chunks() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("big.pdf");
        // Larger than the read buffer, not a multiple of it.
        std::fs::write(&path, vec![0x5au8; HASH_CHUNK_SIZE * 3 + 17]).unwrap();

        let streamed = fingerprint_file(&path).unwrap();

        let mut hasher = Sha256::new();
        hasher.update(std::fs::read(&path).unwrap());
        assert_eq!(streamed, format!("{:x}", hasher.finalize()));
    }

    #[test]
    fn only_pdfs_are_fingerprinted() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("a.pdf"), "x").unwrap();
        std::fs::write(tmp.path().join("readme.md"), "y").unwrap();

        let manifest = compute_folder_manifest(tmp.path()).unwrap();
        assert_eq!(manifest.len(), 1);
        assert!(manifest.contains_key("a.pdf"));
    }

    #[test]
    fn record_file_is_not_part_of_the_manifest() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("a.pdf"), "x").unwrap();

        let manifest = compute_folder_manifest(tmp.path()).unwrap();
        save_manifest(tmp.path(), &manifest).unwrap();

        let again = compute_folder_manifest(tmp.path()).unwrap();
        assert_eq!(manifest, again);
    }

    #[test]
    fn load_without_record_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(load_manifest(tmp.path()).unwrap().is_empty());
    }

    #[test]
    fn save_and_load_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("a.pdf"), "x").unwrap();

        let manifest = compute_folder_manifest(tmp.path()).unwrap();
        save_manifest(tmp.path(), &manifest).unwrap();
        assert_eq!(load_manifest(tmp.path()).unwrap(), manifest);
    }

    #[test]
    fn record_is_a_flat_json_object_with_hex_digests() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("a.pdf"), "x").unwrap();

        let manifest = compute_folder_manifest(tmp.path()).unwrap();
        save_manifest(tmp.path(), &manifest).unwrap();

        let raw =
            std::fs::read_to_string(tmp.path().join(MANIFEST_FILENAME)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 1);

        let digest = object["a.pdf"].as_str().unwrap();
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn stale_without_persisted_manifest() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("a.pdf"), "x").unwrap();

        assert!(is_stale(tmp.path()).unwrap());
    }

    #[test]
    fn fresh_after_save() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("a.pdf"), "x").unwrap();

        let manifest = compute_folder_manifest(tmp.path()).unwrap();
        save_manifest(tmp.path(), &manifest).unwrap();
        assert!(!is_stale(tmp.path()).unwrap());
    }

    #[test]
    fn added_pdf_flips_to_stale() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("a.pdf"), "X").unwrap();

        save_manifest(tmp.path(), &compute_folder_manifest(tmp.path()).unwrap())
            .unwrap();
        assert!(!is_stale(tmp.path()).unwrap());

        std::fs::write(tmp.path().join("b.pdf"), "Y").unwrap();
        assert!(is_stale(tmp.path()).unwrap());

        // After a rebuild persists the new manifest, fresh again.
        save_manifest(tmp.path(), &compute_folder_manifest(tmp.path()).unwrap())
            .unwrap();
        assert!(!is_stale(tmp.path()).unwrap());
    }

    #[test]
    fn removed_pdf_flips_to_stale() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("a.pdf"), "X").unwrap();
        std::fs::write(tmp.path().join("b.pdf"), "Y").unwrap();

        save_manifest(tmp.path(), &compute_folder_manifest(tmp.path()).unwrap())
            .unwrap();
        assert!(!is_stale(tmp.path()).unwrap());

        std::fs::remove_file(tmp.path().join("b.pdf")).unwrap();
        assert!(is_stale(tmp.path()).unwrap());
    }

    #[test]
    fn renamed_pdf_flips_to_stale() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("a.pdf"), "X").unwrap();

        save_manifest(tmp.path(), &compute_folder_manifest(tmp.path()).unwrap())
            .unwrap();
        assert!(!is_stale(tmp.path()).unwrap());

        // Same bytes, different name: the file name is part of the key.
        std::fs::rename(tmp.path().join("a.pdf"), tmp.path().join("z.pdf"))
            .unwrap();
        assert!(is_stale(tmp.path()).unwrap());
    }

    #[test]
    fn modified_pdf_flips_to_stale() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("a.pdf");
        std::fs::write(&path, "before").unwrap();

        save_manifest(tmp.path(), &compute_folder_manifest(tmp.path()).unwrap())
            .unwrap();
        assert!(!is_stale(tmp.path()).unwrap());

        // Same length, different bytes.
        std::fs::write(&path, "BEFORE").unwrap();
        assert!(is_stale(tmp.path()).unwrap());
    }

    #[test]
    fn malformed_record_reads_as_stale() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("a.pdf"), "x").unwrap();
        std::fs::write(tmp.path().join(MANIFEST_FILENAME), "[1, 2]").unwrap();

        assert!(load_manifest(tmp.path()).unwrap().is_empty());
        assert!(is_stale(tmp.path()).unwrap());
    }
}
