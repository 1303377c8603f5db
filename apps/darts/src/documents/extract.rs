//! Text Extractor: turns an uploaded PDF, Word or plain-text blob into one string.
//!
//! PDF and Word failures degrade to empty text plus a reported error, so the
//! pipeline can keep going. Invalid UTF-8 in a plain-text upload is fatal.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::models::document::{Document, MediaKind};

const WORD_BODY_PART: &str = "word/document.xml";

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Error reading PDF file: {0}")]
    Pdf(String),

    #[error("Error reading Word file: {0}")]
    Word(String),

    #[error("Text file is not valid UTF-8: {0}")]
    Text(#[from] std::string::FromUtf8Error),
}

impl ExtractionError {
    /// Stage that failed, as shown to the user.
    pub fn kind(&self) -> &'static str {
        match self {
            ExtractionError::Pdf(_) => "pdf",
            ExtractionError::Word(_) => "word",
            ExtractionError::Text(_) => "text",
        }
    }

    pub fn report(&self) -> ExtractionReport {
        ExtractionReport {
            kind: self.kind(),
            message: self.to_string(),
        }
    }
}

/// Serializable view of a degraded extraction.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionReport {
    pub kind: &'static str,
    pub message: String,
}

/// Result of a non-fatal extraction. `error` is set when the text is empty
/// because the document could not be decoded.
#[derive(Debug)]
pub struct Extraction {
    pub text: String,
    pub error: Option<ExtractionError>,
}

impl Extraction {
    fn ok(text: String) -> Self {
        Self { text, error: None }
    }

    fn degraded(error: ExtractionError) -> Self {
        warn!("Document extraction degraded to empty text: {error}");
        Self {
            text: String::new(),
            error: Some(error),
        }
    }
}

/// Extracts the text of a document according to its declared kind.
pub fn extract_text(document: &Document) -> Result<Extraction, ExtractionError> {
    let extraction = match document.kind {
        MediaKind::Pdf => match extract_pdf(&document.bytes) {
            Ok(text) => Extraction::ok(text),
            Err(e) => Extraction::degraded(e),
        },
        MediaKind::Word => match extract_word(&document.bytes) {
            Ok(text) => Extraction::ok(text),
            Err(e) => Extraction::degraded(e),
        },
        MediaKind::PlainText => Extraction::ok(String::from_utf8(document.bytes.to_vec())?),
    };

    info!(
        "Extracted {} chars from {:?} document ({} bytes)",
        extraction.text.len(),
        document.kind,
        document.bytes.len()
    );
    Ok(extraction)
}

/// Concatenates the text of every page, in page order.
fn extract_pdf(bytes: &[u8]) -> Result<String, ExtractionError> {
    // pdf-extract panics on some malformed inputs; treat that as a decode failure.
    std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes))
        .map_err(|_| ExtractionError::Pdf("PDF decoder aborted on malformed input".to_string()))?
        .map_err(|e| ExtractionError::Pdf(e.to_string()))
}

/// Joins the paragraphs of `word/document.xml` with newlines, in document order.
fn extract_word(bytes: &[u8]) -> Result<String, ExtractionError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ExtractionError::Word(e.to_string()))?;

    let mut xml = String::new();
    archive
        .by_name(WORD_BODY_PART)
        .map_err(|e| ExtractionError::Word(e.to_string()))?
        .read_to_string(&mut xml)
        .map_err(|e| ExtractionError::Word(e.to_string()))?;

    Ok(word_paragraphs(&xml)?.join("\n"))
}

/// Collects the text of each `<w:p>` element. Runs inside a paragraph are
/// concatenated; `<w:tab/>` and `<w:br/>` become a tab and a newline.
fn word_paragraphs(xml: &str) -> Result<Vec<String>, ExtractionError> {
    let malformed = |e: &dyn std::fmt::Display| ExtractionError::Word(e.to_string());
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    let mut current: Option<String> = None;
    let mut in_text = false;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf).map_err(|e| malformed(&e))? {
            Event::Start(e) => match e.name().as_ref() {
                b"w:p" => current = Some(String::new()),
                b"w:t" => in_text = true,
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:p" => paragraphs.push(String::new()),
                b"w:tab" => {
                    if let Some(p) = current.as_mut() {
                        p.push('\t');
                    }
                }
                b"w:br" | b"w:cr" => {
                    if let Some(p) = current.as_mut() {
                        p.push('\n');
                    }
                }
                _ => {}
            },
            Event::Text(e) if in_text => {
                if let Some(p) = current.as_mut() {
                    p.push_str(&e.unescape().map_err(|e| malformed(&e))?);
                }
            }
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:p" => {
                    if let Some(p) = current.take() {
                        paragraphs.push(p);
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(paragraphs)
}
