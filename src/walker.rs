use std::path::{Path, PathBuf};

use crate::error::Result;

/// A PDF document discovered in the watched folder.
#[derive(Debug, Clone)]
pub struct DiscoveredPdf {
    /// File name within the folder. Unique, and the key used in the
    /// content-hash manifest.
    pub file_name: String,
    /// Fully resolved absolute path.
    pub absolute_path: PathBuf,
}

/// Enumerate the PDF documents in a folder (non-recursive).
///
/// An entry counts when its name case-insensitively ends in `.pdf` and it
/// resolves to a regular file. Results are sorted by file name. I/O errors
/// (unreadable folder, a file vanishing mid-scan) propagate; nothing is
/// silently skipped.
pub fn discover_pdfs(folder: &Path) -> Result<Vec<DiscoveredPdf>> {
    let mut results = Vec::new();

    for entry in std::fs::read_dir(folder)? {
        let entry = entry?;
        let file_name = entry.file_name().to_string_lossy().to_string();
        if !is_pdf_name(&file_name) {
            continue;
        }

        // Follows symlinks, so a linked PDF counts like a plain one.
        if !std::fs::metadata(entry.path())?.is_file() {
            continue;
        }

        let absolute_path = entry.path().canonicalize()?;
        results.push(DiscoveredPdf {
            file_name,
            absolute_path,
        });
    }

    results.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    Ok(results)
}

fn is_pdf_name(name: &str) -> bool {
    name.to_ascii_lowercase().ends_with(".pdf")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discovers_pdfs_case_insensitively() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("manual.pdf"), "a").unwrap();
        std::fs::write(tmp.path().join("REPORT.PDF"), "b").unwrap();
        std::fs::write(tmp.path().join("notes.txt"), "c").unwrap();

        let pdfs = discover_pdfs(tmp.path()).unwrap();
        let names: Vec<_> = pdfs.iter().map(|p| p.file_name.as_str()).collect();
        assert_eq!(names, vec!["REPORT.PDF", "manual.pdf"]);
    }

    #[test]
    fn skips_directories_with_pdf_suffix() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir(tmp.path().join("archive.pdf")).unwrap();
        std::fs::write(tmp.path().join("real.pdf"), "x").unwrap();

        let pdfs = discover_pdfs(tmp.path()).unwrap();
        assert_eq!(pdfs.len(), 1);
        assert_eq!(pdfs[0].file_name, "real.pdf");
    }

    #[test]
    fn does_not_recurse() {
        let tmp = tempfile::tempdir().unwrap();
        let sub = tmp.path().join("sub");
        std::fs::create_dir(&sub).unwrap();
        std::fs::write(sub.join("nested.pdf"), "x").unwrap();
        std::fs::write(tmp.path().join("top.pdf"), "x").unwrap();

        let pdfs = discover_pdfs(tmp.path()).unwrap();
        assert_eq!(pdfs.len(), 1);
        assert_eq!(pdfs[0].file_name, "top.pdf");
    }

    #[test]
    fn absolute_paths_are_resolved() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("doc.pdf"), "x").unwrap();

        let pdfs = discover_pdfs(tmp.path()).unwrap();
        assert!(pdfs[0].absolute_path.is_absolute());
        assert!(pdfs[0].absolute_path.ends_with("doc.pdf"));
    }

    #[test]
    fn empty_folder() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(discover_pdfs(tmp.path()).unwrap().is_empty());
    }

    #[test]
    fn unreadable_folder_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("gone");
        assert!(discover_pdfs(&missing).is_err());
    }
}
