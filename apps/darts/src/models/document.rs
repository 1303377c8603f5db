use bytes::Bytes;
use serde::{Deserialize, Serialize};

const PDF_MIME: &str = "application/pdf";
const WORD_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Declared media kind of an uploaded document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Pdf,
    Word,
    PlainText,
}

impl MediaKind {
    /// Resolves the kind from the declared content type, falling back to the
    /// file extension. Anything unrecognised is plain text.
    pub fn detect(content_type: Option<&str>, file_name: Option<&str>) -> Self {
        match content_type.map(|ct| ct.split(';').next().unwrap_or(ct).trim()) {
            Some(PDF_MIME) => return MediaKind::Pdf,
            Some(WORD_MIME) => return MediaKind::Word,
            _ => {}
        }

        let extension = file_name
            .and_then(|name| name.rsplit_once('.'))
            .map(|(_, ext)| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("pdf") => MediaKind::Pdf,
            Some("docx") => MediaKind::Word,
            _ => MediaKind::PlainText,
        }
    }
}

/// An opaque uploaded payload. Consumed once by the text extractor.
#[derive(Debug, Clone)]
pub struct Document {
    pub kind: MediaKind,
    pub bytes: Bytes,
}

impl Document {
    pub fn new(kind: MediaKind, bytes: impl Into<Bytes>) -> Self {
        Self {
            kind,
            bytes: bytes.into(),
        }
    }

    #[cfg(test)]
    pub fn plain_text(text: &str) -> Self {
        Self::new(MediaKind::PlainText, text.as_bytes().to_vec())
    }
}
