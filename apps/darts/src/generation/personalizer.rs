//! Content Personalizer: rewrites source content once per audience segment.
//!
//! Flow: pick target segments (skipping the one the content already targets)
//!       → one LLM rewrite per segment via the bounded scheduler
//!       → strip markers and re-space paragraphs → GeneratedVariant records.
//!
//! Revisions are a separate call that only sees the previous draft and the
//! user's instructions, so they can drift from the brand voice.

use std::sync::Arc;

use tracing::{debug, info};

use crate::documents::normalize::clean_generated;
use crate::errors::AppError;
use crate::generation::prompts::PERSONALIZE_PROMPT_TEMPLATE;
use crate::llm_client::prompts::{fill_template, PLAIN_TEXT_INSTRUCTION};
use crate::llm_client::{ChatMessage, ChatModel};
use crate::models::brand::BrandProfile;
use crate::models::segment::SegmentCollection;
use crate::models::variant::{SourceContent, Variant};
use crate::scheduler::run_bounded;

/// Rewrites `content` for one segment's characteristics under the brand profile.
pub async fn personalize(
    content: &str,
    brand: &BrandProfile,
    characteristics: &str,
    llm: &dyn ChatModel,
) -> Result<String, AppError> {
    let prompt = build_personalize_prompt(content, brand, characteristics);
    let response = llm
        .complete(&[ChatMessage::user(prompt)])
        .await
        .map_err(|e| AppError::Llm(format!("Personalization failed: {e}")))?;

    Ok(clean_generated(&response))
}

/// Revises a previous draft. The draft goes in as system context and the
/// instructions as the user turn; brand and segment context are not re-sent.
pub async fn revise(
    previous_text: &str,
    instructions: &str,
    llm: &dyn ChatModel,
) -> Result<String, AppError> {
    let messages = [
        ChatMessage::system(previous_text),
        ChatMessage::user(instructions),
    ];
    let response = llm
        .complete(&messages)
        .await
        .map_err(|e| AppError::Llm(format!("Revision failed: {e}")))?;

    Ok(clean_generated(&response))
}

/// Personalizes the content for every presentable segment except `targeted`
/// (the segment the content was originally written for). Segments holding
/// only sentinel values are skipped. Variants come back in collection order.
pub async fn personalize_segments(
    content: &SourceContent,
    brand: &BrandProfile,
    segments: &SegmentCollection,
    targeted: Option<&str>,
    llm: Arc<dyn ChatModel>,
    concurrency: usize,
) -> Result<Vec<Variant>, AppError> {
    let jobs: Vec<(String, String)> = segments
        .iter()
        .filter(|segment| Some(segment.name.as_str()) != targeted)
        .filter(|segment| {
            if !segment.is_presentable() {
                debug!("Skipping segment {:?}: no details extracted", segment.name);
            }
            segment.is_presentable()
        })
        .map(|segment| (segment.name.clone(), segment.characteristics.clone()))
        .collect();

    info!(
        "Personalizing content for {} segments (targeted: {:?})",
        jobs.len(),
        targeted
    );

    let content: Arc<str> = Arc::from(content.text.as_str());
    let brand = Arc::new(brand.clone());

    run_bounded(concurrency, jobs, |(name, characteristics)| {
        let llm = Arc::clone(&llm);
        let content = Arc::clone(&content);
        let brand = Arc::clone(&brand);
        async move {
            let text = personalize(&content, &brand, &characteristics, llm.as_ref()).await?;
            Ok(Variant::generated(name, text))
        }
    })
    .await
}

fn build_personalize_prompt(content: &str, brand: &BrandProfile, characteristics: &str) -> String {
    fill_template(
        PERSONALIZE_PROMPT_TEMPLATE,
        &[
            ("characteristics", characteristics),
            ("voice", brand.voice()),
            ("positioning", brand.positioning()),
            ("value_propositions", brand.unique_value_propositions()),
            ("plain_text_instruction", PLAIN_TEXT_INSTRUCTION),
            ("content", content),
        ],
    )
}
