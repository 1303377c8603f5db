//! Brand Profile Extractor: one model call, three labelled sections.

use tracing::info;

use crate::documents::normalize::remove_formatting_marks;
use crate::errors::AppError;
use crate::extraction::prompts::BRAND_PROMPT_TEMPLATE;
use crate::extraction::sections::split_labeled;
use crate::llm_client::prompts::{fill_template, PLAIN_TEXT_INSTRUCTION};
use crate::llm_client::{ChatMessage, ChatModel};
use crate::models::brand::BrandProfile;

/// Section labels in the order the model is told to emit them.
pub const BRAND_LABELS: [&str; 3] = [
    "Brand Voice:",
    "Brand Positioning:",
    "Unique Value Propositions:",
];

/// Asks the model to summarise a brand guide and parses the answer.
pub async fn extract_brand_profile(
    text: &str,
    llm: &dyn ChatModel,
) -> Result<BrandProfile, AppError> {
    let prompt = fill_template(
        BRAND_PROMPT_TEMPLATE,
        &[
            ("plain_text_instruction", PLAIN_TEXT_INSTRUCTION),
            ("document", text),
        ],
    );

    let response = llm
        .complete(&[ChatMessage::user(prompt)])
        .await
        .map_err(|e| AppError::Llm(format!("Brand profile extraction failed: {e}")))?;

    let profile = parse_brand_response(&response);
    info!(
        "Brand profile extracted from {} chars of guide text",
        text.len()
    );
    Ok(profile)
}

/// Cuts the three brand sections out of a model answer. Each value is
/// stripped of list markers; empty values become the sentinel.
pub fn parse_brand_response(response: &str) -> BrandProfile {
    let mut values = split_labeled(response, &BRAND_LABELS)
        .into_iter()
        .map(|value| remove_formatting_marks(&value));

    BrandProfile::new(
        values.next().unwrap_or_default(),
        values.next().unwrap_or_default(),
        values.next().unwrap_or_default(),
    )
}
