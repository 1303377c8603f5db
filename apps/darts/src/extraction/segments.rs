//! Segment Extractor: one call for the list of Dart names, then one call per
//! retained name for its characteristics and psychographic drivers.
//!
//! Cost is 1 + N model round-trips per document. The per-name calls run
//! through the bounded scheduler; output order always follows the name list.

use std::sync::Arc;

use tracing::{debug, info};

use crate::documents::normalize::remove_formatting_marks;
use crate::errors::AppError;
use crate::extraction::prompts::{SEGMENT_DETAILS_PROMPT_TEMPLATE, SEGMENT_NAMES_PROMPT_TEMPLATE};
use crate::extraction::sections::split_labeled;
use crate::llm_client::prompts::{fill_template, PLAIN_TEXT_INSTRUCTION};
use crate::llm_client::{ChatMessage, ChatModel};
use crate::models::segment::{is_generic_name, Segment, SegmentCollection};
use crate::scheduler::run_bounded;

/// Detail section labels, in canonical order.
pub const DETAIL_LABELS: [&str; 2] = ["Characteristics:", "Psychographic Drivers:"];

/// Runs both phases and assembles the collection.
pub async fn extract_segments(
    text: &str,
    llm: Arc<dyn ChatModel>,
    concurrency: usize,
) -> Result<SegmentCollection, AppError> {
    let names = extract_segment_names(text, llm.as_ref()).await?;
    info!("Extracting details for {} segments", names.len());

    let document: Arc<str> = Arc::from(text);
    let segments = run_bounded(concurrency, names, |name| {
        let llm = Arc::clone(&llm);
        let document = Arc::clone(&document);
        async move { extract_segment_details(&document, &name, llm.as_ref()).await }
    })
    .await?;

    let collection: SegmentCollection = segments.into_iter().collect();
    info!(
        "Segment extraction complete: {} segments ({} presentable)",
        collection.len(),
        collection.presentable().len()
    );
    Ok(collection)
}

/// Phase one: asks for a bare numbered list of segment names.
pub async fn extract_segment_names(
    text: &str,
    llm: &dyn ChatModel,
) -> Result<Vec<String>, AppError> {
    let prompt = fill_template(SEGMENT_NAMES_PROMPT_TEMPLATE, &[("document", text)]);
    let response = llm
        .complete(&[ChatMessage::user(prompt)])
        .await
        .map_err(|e| AppError::Llm(format!("Segment name extraction failed: {e}")))?;

    Ok(parse_segment_names(&response))
}

/// One candidate per non-empty line, list markers removed, generic names
/// dropped. Order of appearance is kept; repeats are not removed here.
pub fn parse_segment_names(response: &str) -> Vec<String> {
    remove_formatting_marks(response)
        .lines()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .filter(|name| {
            let generic = is_generic_name(name);
            if generic {
                debug!("Dropping generic segment name {name:?}");
            }
            !generic
        })
        .map(String::from)
        .collect()
}

/// Phase two: asks for the two detail sections of one named segment.
pub async fn extract_segment_details(
    text: &str,
    name: &str,
    llm: &dyn ChatModel,
) -> Result<Segment, AppError> {
    let prompt = fill_template(
        SEGMENT_DETAILS_PROMPT_TEMPLATE,
        &[
            ("segment", name),
            ("plain_text_instruction", PLAIN_TEXT_INSTRUCTION),
            ("document", text),
        ],
    );

    let response = llm
        .complete(&[ChatMessage::user(prompt)])
        .await
        .map_err(|e| AppError::Llm(format!("Detail extraction for segment '{name}' failed: {e}")))?;

    Ok(parse_segment_details(name, &response))
}

/// Splits a detail answer on its two labels. Empty sections become the sentinel.
pub fn parse_segment_details(name: &str, response: &str) -> Segment {
    let mut values = split_labeled(response, &DETAIL_LABELS)
        .into_iter()
        .map(|value| remove_formatting_marks(&value));

    Segment::new(
        name.to_string(),
        values.next().unwrap_or_default(),
        values.next().unwrap_or_default(),
    )
}
