//! Document loading.
//!
//! [`DocumentLoader`] reads a file and decodes it to text. Paths ending in
//! `.pdf` go through structured text extraction when the `pdf` feature is
//! enabled; if extraction is unavailable or fails, the raw bytes are decoded
//! as UTF-8 and a single warning is recorded instead of failing the load.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::document::LoadedDocument;
use crate::error::{RagError, Result};

/// Reads documents from the filesystem.
#[derive(Debug, Clone, Copy)]
pub struct DocumentLoader {
    pdf_extraction: bool,
}

impl Default for DocumentLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentLoader {
    /// Create a loader that uses structured PDF extraction when it is compiled in.
    pub fn new() -> Self {
        Self { pdf_extraction: cfg!(feature = "pdf") }
    }

    /// Create a loader that always treats PDF extraction as unavailable.
    pub fn without_pdf_extraction() -> Self {
        Self { pdf_extraction: false }
    }

    /// Whether this loader attempts structured PDF extraction.
    pub fn pdf_extraction(&self) -> bool {
        self.pdf_extraction
    }

    /// Load and decode the document at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::IoError`] if the file cannot be read. Decoding
    /// never fails.
    pub async fn load(&self, path: impl AsRef<Path>) -> Result<LoadedDocument> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await.map_err(|source| {
            error!(path = %path.display(), error = %source, "failed to read document");
            RagError::IoError { path: path.to_path_buf(), source }
        })?;

        let byte_count = bytes.len();
        let document =
            if is_pdf(path) { self.decode_pdf(path, bytes).await } else { decode_text(path, &bytes) };

        debug!(
            path = %path.display(),
            bytes = byte_count,
            warnings = document.warnings.len(),
            "loaded document"
        );
        Ok(document)
    }

    async fn decode_pdf(&self, path: &Path, bytes: Vec<u8>) -> LoadedDocument {
        let bytes: Arc<[u8]> = bytes.into();
        let extracted = if self.pdf_extraction {
            // Parsing is CPU-bound; keep it off the async worker threads.
            let task_bytes = Arc::clone(&bytes);
            tokio::task::spawn_blocking(move || extract_pdf_text(&task_bytes))
                .await
                .unwrap_or_else(|e| Err(format!("PDF extraction task failed: {e}")))
        } else {
            Err("structured PDF extraction is not available".to_string())
        };

        match extracted {
            Ok(text) => LoadedDocument { text, warnings: Vec::new() },
            Err(reason) => {
                warn!(path = %path.display(), reason = %reason, "falling back to UTF-8 decoding for PDF");
                LoadedDocument {
                    text: String::from_utf8_lossy(&bytes).into_owned(),
                    warnings: vec![format!(
                        "PDF text extraction failed ({reason}). Falling back to UTF-8 decoding \
                         which only works for text-based PDFs."
                    )],
                }
            }
        }
    }
}

/// Load the document at `path` with a default [`DocumentLoader`].
pub async fn load_document(path: impl AsRef<Path>) -> Result<LoadedDocument> {
    DocumentLoader::new().load(path).await
}

fn is_pdf(path: &Path) -> bool {
    path.extension().and_then(|ext| ext.to_str()).is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

fn decode_text(path: &Path, bytes: &[u8]) -> LoadedDocument {
    let text = String::from_utf8_lossy(bytes);
    if let std::borrow::Cow::Owned(_) = text {
        debug!(path = %path.display(), "document contains invalid UTF-8; replaced with U+FFFD");
    }
    LoadedDocument { text: text.into_owned(), warnings: Vec::new() }
}

#[cfg(feature = "pdf")]
fn extract_pdf_text(bytes: &[u8]) -> std::result::Result<String, String> {
    let doc = lopdf::Document::load_mem(bytes).map_err(|e| format!("failed to parse PDF: {e}"))?;

    // `get_pages` is keyed by page number, so iteration is already in page order.
    let mut pages = Vec::new();
    for page_number in doc.get_pages().keys() {
        match doc.extract_text(&[*page_number]) {
            Ok(text) => {
                let text = text.trim();
                if !text.is_empty() {
                    pages.push(text.to_string());
                }
            }
            Err(e) => debug!(page = page_number, error = %e, "skipping unreadable PDF page"),
        }
    }

    let text = pages.join("\n");
    if text.is_empty() {
        return Err("no text content found in PDF".to_string());
    }
    Ok(text)
}

#[cfg(not(feature = "pdf"))]
fn extract_pdf_text(_bytes: &[u8]) -> std::result::Result<String, String> {
    Err("the `pdf` feature is not enabled".to_string())
}
