//! Page-level text extraction from PDF documents.
//!
//! Extraction quality is the PDF's problem, not ours: pages without a
//! usable text layer are skipped with a warning rather than failing the
//! whole rebuild. Only a structurally unreadable file is an error.

use std::path::PathBuf;

use tracing::{debug, warn};

use crate::{error::Result, walker::DiscoveredPdf};

/// A page of extracted text, tagged with its source document.
#[derive(Debug, Clone)]
pub struct PageDocument {
    /// File name of the source PDF within the watched folder.
    pub file_name: String,
    /// Absolute path to the source PDF.
    pub absolute_path: PathBuf,
    /// 1-based page number.
    pub page: u32,
    /// Extracted page text.
    pub text: String,
}

/// Extract page-level documents from every discovered PDF.
pub fn load_documents(pdfs: &[DiscoveredPdf]) -> Result<Vec<PageDocument>> {
    let mut documents = Vec::new();
    for pdf in pdfs {
        let pages = extract_pages(pdf)?;
        debug!(file = %pdf.file_name, pages = pages.len(), "extracted pages");
        documents.extend(pages);
    }
    Ok(documents)
}

/// Extract per-page text from one PDF.
///
/// Falls back to whole-document extraction (tagged as page 1) when no
/// page yields usable text, since some generators produce text layers
/// that defeat page-by-page extraction.
fn extract_pages(pdf: &DiscoveredPdf) -> Result<Vec<PageDocument>> {
    let document = lopdf::Document::load(&pdf.absolute_path)?;
    let mut page_numbers: Vec<u32> =
        document.get_pages().keys().copied().collect();
    page_numbers.sort_unstable();

    let mut pages = Vec::new();
    for page in page_numbers {
        match document.extract_text(&[page]) {
            Ok(text) => {
                let text = text.trim().to_string();
                if text.is_empty() {
                    debug!(file = %pdf.file_name, page, "page has no text layer");
                    continue;
                }
                pages.push(PageDocument {
                    file_name: pdf.file_name.clone(),
                    absolute_path: pdf.absolute_path.clone(),
                    page,
                    text,
                });
            }
            Err(err) => {
                warn!(
                    file = %pdf.file_name,
                    page,
                    error = %err,
                    "failed to extract page text, skipping page"
                );
            }
        }
    }

    if pages.is_empty()
        && let Some(text) = extract_whole(pdf)?
    {
        warn!(
            file = %pdf.file_name,
            "per-page extraction found nothing, indexing whole document as page 1"
        );
        pages.push(PageDocument {
            file_name: pdf.file_name.clone(),
            absolute_path: pdf.absolute_path.clone(),
            page: 1,
            text,
        });
    }

    Ok(pages)
}

/// Whole-document fallback via pdf-extract.
fn extract_whole(pdf: &DiscoveredPdf) -> Result<Option<String>> {
    let bytes = std::fs::read(&pdf.absolute_path)?;
    match pdf_extract::extract_text_from_mem(&bytes) {
        Ok(text) => {
            let text = text.trim().to_string();
            Ok((!text.is_empty()).then_some(text))
        }
        Err(err) => {
            warn!(file = %pdf.file_name, error = %err, "whole-document extraction failed");
            Ok(None)
        }
    }
}
