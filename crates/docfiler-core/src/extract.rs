use lopdf::Document;

/// The declared kind of an uploaded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Pdf,
    Text,
    Other,
}

impl FileKind {
    /// Detect the kind from the filename extension, falling back to the
    /// `%PDF-` magic bytes for misnamed uploads.
    pub fn detect(filename: &str, data: &[u8]) -> Self {
        let lower = filename.to_lowercase();
        if lower.ends_with(".pdf") || data.starts_with(b"%PDF-") {
            return FileKind::Pdf;
        }
        if lower.ends_with(".txt") || lower.ends_with(".md") {
            return FileKind::Text;
        }
        FileKind::Other
    }
}

/// Best-effort plain-text extraction. Never fails: any extraction fault
/// yields whatever text was accumulated up to that point, possibly the empty
/// string. Empty output is a valid outcome (scanned/image-only documents) and
/// is distinguished downstream from transport errors.
pub fn extract(data: &[u8], kind: FileKind) -> String {
    let text = match kind {
        FileKind::Pdf => pdf_text(data),
        // Fallback for txt and other simple formats: decode as UTF-8,
        // substituting invalid sequences rather than failing.
        FileKind::Text | FileKind::Other => String::from_utf8_lossy(data).into_owned(),
    };
    text.trim().to_string()
}

/// Page-by-page PDF extraction. Pages that fail to decode (corrupt streams,
/// image-only content) are skipped; a document that fails to open yields an
/// empty string.
fn pdf_text(data: &[u8]) -> String {
    let doc = match Document::load_mem(data) {
        Ok(doc) => doc,
        Err(e) => {
            tracing::debug!(error = %e, "failed to open PDF");
            return String::new();
        }
    };

    let mut text = String::new();
    for page_number in doc.get_pages().keys() {
        match doc.extract_text(&[*page_number]) {
            Ok(page_text) if !page_text.trim().is_empty() => {
                text.push_str(&page_text);
                text.push('\n');
            }
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(page = page_number, error = %e, "skipping unextractable page");
            }
        }
    }
    text
}
