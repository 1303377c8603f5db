//! Pipeline Orchestrator: sequences extraction and generation stages against
//! one explicit `SessionContext`.
//!
//! Stage order in a typical session:
//! brand guide (or typed brand text) → Darts document → source content
//! → personalize → optional revisions.
//!
//! Document read failures for pdf/word degrade to empty text and are reported
//! back with the stage result; no model call is made for an empty document,
//! so nothing beyond the sentinel values is produced from it.

use std::sync::Arc;

use tracing::{info, warn};

use crate::documents::extract::{extract_text, ExtractionReport};
use crate::errors::AppError;
use crate::extraction::brand::extract_brand_profile;
use crate::extraction::segments::extract_segments;
use crate::generation::personalizer::{personalize_segments, revise};
use crate::llm_client::ChatModel;
use crate::models::brand::BrandProfile;
use crate::models::document::Document;
use crate::models::segment::SegmentCollection;
use crate::models::variant::{SourceContent, Variant};
use crate::session::store::SessionContext;

/// A stage result plus the degraded-extraction report, if any.
#[derive(Debug, Clone)]
pub struct Ingested<T> {
    pub value: T,
    pub extraction_error: Option<ExtractionReport>,
}

#[derive(Clone)]
pub struct Pipeline {
    llm: Arc<dyn ChatModel>,
    concurrency: usize,
}

impl Pipeline {
    pub fn new(llm: Arc<dyn ChatModel>, concurrency: usize) -> Self {
        Self { llm, concurrency }
    }

    /// Extracts a brand profile from an uploaded brand guide and stores it.
    pub async fn load_brand_guide(
        &self,
        session: &mut SessionContext,
        document: &Document,
    ) -> Result<Ingested<BrandProfile>, AppError> {
        let extraction = extract_text(document)?;

        let profile = if extraction.text.trim().is_empty() {
            warn!("Session {}: brand guide has no text", session.id);
            BrandProfile::unavailable()
        } else {
            extract_brand_profile(&extraction.text, self.llm.as_ref()).await?
        };

        session.brand = Some(profile.clone());
        session.clear_variants();
        info!("Session {}: brand profile loaded", session.id);

        Ok(Ingested {
            value: profile,
            extraction_error: extraction.error.map(|e| e.report()),
        })
    }

    /// Extracts a brand profile from manually typed brand text.
    pub async fn enter_brand_text(
        &self,
        session: &mut SessionContext,
        text: &str,
    ) -> Result<BrandProfile, AppError> {
        if text.trim().is_empty() {
            return Err(AppError::Validation("Brand text cannot be empty".to_string()));
        }

        let profile = extract_brand_profile(text, self.llm.as_ref()).await?;
        session.brand = Some(profile.clone());
        session.clear_variants();
        info!("Session {}: brand profile entered manually", session.id);
        Ok(profile)
    }

    /// Extracts the segment collection from a Darts document and stores it.
    pub async fn load_segments(
        &self,
        session: &mut SessionContext,
        document: &Document,
    ) -> Result<Ingested<SegmentCollection>, AppError> {
        let extraction = extract_text(document)?;

        let segments = if extraction.text.trim().is_empty() {
            warn!("Session {}: Darts document has no text", session.id);
            SegmentCollection::new()
        } else {
            extract_segments(&extraction.text, Arc::clone(&self.llm), self.concurrency).await?
        };

        session.segments = Some(segments.clone());
        session.clear_variants();
        info!(
            "Session {}: {} segments loaded {:?}",
            session.id,
            segments.len(),
            segments.names()
        );

        Ok(Ingested {
            value: segments,
            extraction_error: extraction.error.map(|e| e.report()),
        })
    }

    /// Stores the text to personalize.
    pub fn load_source_content(
        &self,
        session: &mut SessionContext,
        document: &Document,
    ) -> Result<Ingested<SourceContent>, AppError> {
        let extraction = extract_text(document)?;
        let source = SourceContent {
            text: extraction.text,
        };

        session.source = Some(source.clone());
        session.clear_variants();
        info!(
            "Session {}: source content loaded ({} chars)",
            session.id,
            source.text.len()
        );

        Ok(Ingested {
            value: source,
            extraction_error: extraction.error.map(|e| e.report()),
        })
    }

    /// Generates one variant per segment, skipping `targeted` when given.
    ///
    /// Refuses to run on empty source content or an empty segment collection,
    /// which is what a degraded document read leaves behind.
    pub async fn personalize(
        &self,
        session: &mut SessionContext,
        targeted: Option<&str>,
    ) -> Result<Vec<Variant>, AppError> {
        let (Some(brand), Some(segments), Some(source)) =
            (&session.brand, &session.segments, &session.source)
        else {
            return Err(AppError::Validation(missing_prerequisites(session)));
        };

        if source.text.trim().is_empty() {
            return Err(AppError::Validation(
                "Source content is empty; upload a readable document first".to_string(),
            ));
        }
        if segments.is_empty() {
            return Err(AppError::Validation(
                "No segments were extracted; upload a Darts document first".to_string(),
            ));
        }

        if let Some(name) = targeted {
            if !segments.contains(name) {
                return Err(AppError::NotFound(format!("Segment '{name}' not found")));
            }
        }

        let variants = personalize_segments(
            source,
            brand,
            segments,
            targeted,
            Arc::clone(&self.llm),
            self.concurrency,
        )
        .await?;

        for variant in &variants {
            session.record_variant(variant.clone());
        }
        info!(
            "Session {}: generated {} variants",
            session.id,
            variants.len()
        );
        Ok(variants)
    }

    /// Revises the current variant of one segment with free-text instructions.
    pub async fn revise(
        &self,
        session: &mut SessionContext,
        segment: &str,
        instructions: &str,
    ) -> Result<Variant, AppError> {
        let instructions = instructions.trim();
        if instructions.is_empty() {
            return Err(AppError::Validation(
                "Revision instructions cannot be empty".to_string(),
            ));
        }

        let previous = session
            .variant(segment)
            .ok_or_else(|| AppError::NotFound(format!("No content generated for '{segment}'")))?;

        let text = revise(&previous.text, instructions, self.llm.as_ref()).await?;
        let variant = Variant::revised(segment.to_string(), instructions.to_string(), text);
        session.record_variant(variant.clone());
        info!("Session {}: revised content for '{segment}'", session.id);
        Ok(variant)
    }
}

fn missing_prerequisites(session: &SessionContext) -> String {
    let missing: Vec<&str> = [
        (session.brand.is_none(), "brand profile"),
        (session.segments.is_none(), "segments"),
        (session.source.is_none(), "source content"),
    ]
    .into_iter()
    .filter_map(|(absent, what)| absent.then_some(what))
    .collect();

    format!("Cannot personalize yet, missing: {}", missing.join(", "))
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::llm_client::testing::ScriptedModel;
    use crate::models::brand::SENTINEL;
    use crate::models::document::MediaKind;
    use crate::models::variant::VariantKind;

    const BRAND_ANSWER: &str = "Brand Voice: Friendly and bold\nBrand Positioning: Premium outdoor gear\nUnique Value Propositions: Lifetime warranty";

    /// Routes each prompt kind to a canned answer.
    fn model() -> Arc<ScriptedModel> {
        Arc::new(ScriptedModel::new(|messages| {
            let prompt = &messages[0].content;
            let answer = if prompt.starts_with("Extract the brand") {
                BRAND_ANSWER.to_string()
            } else if prompt.starts_with("List only the names") {
                "1. Trailblazer\n2. Red\n3. Homebody".to_string()
            } else if prompt.contains("'Trailblazer'") {
                "Characteristics: adventurous\nPsychographic Drivers: freedom".to_string()
            } else if prompt.contains("'Homebody'") {
                "Characteristics: cozy\nPsychographic Drivers: comfort".to_string()
            } else if prompt.starts_with("Rewrite") {
                let who = if prompt.contains("adventurous") { "explorers" } else { "nesters" };
                format!("Hello {who}!")
            } else {
                format!("Revised: {}", messages.last().map(|m| m.content.as_str()).unwrap_or(""))
            };
            Ok(answer)
        }))
    }

    fn session() -> SessionContext {
        SessionContext::new(Uuid::new_v4())
    }

    async fn ready_session(pipeline: &Pipeline) -> SessionContext {
        let mut session = session();
        pipeline
            .load_brand_guide(&mut session, &Document::plain_text("guide"))
            .await
            .unwrap();
        pipeline
            .load_segments(&mut session, &Document::plain_text("darts"))
            .await
            .unwrap();
        pipeline
            .load_source_content(&mut session, &Document::plain_text("Buy now!"))
            .unwrap();
        session
    }

    #[tokio::test]
    async fn test_full_session_flow() {
        let llm = model();
        let pipeline = Pipeline::new(llm.clone(), 2);
        let mut session = ready_session(&pipeline).await;

        assert_eq!(session.brand.as_ref().unwrap().voice(), "Friendly and bold");
        assert_eq!(
            session.segments.as_ref().unwrap().names(),
            vec!["Trailblazer", "Homebody"]
        );

        let variants = pipeline.personalize(&mut session, None).await.unwrap();
        assert_eq!(variants.len(), 2);
        assert_eq!(variants[0].text, "Hello explorers!");
        assert_eq!(variants[1].text, "Hello nesters!");

        let revised = pipeline
            .revise(&mut session, "Homebody", "  warmer please ")
            .await
            .unwrap();
        assert_eq!(revised.kind, VariantKind::Revised);
        assert_eq!(revised.text, "Revised: warmer please");
        assert_eq!(session.variant("Homebody").unwrap().text, "Revised: warmer please");
        assert_eq!(session.variants().len(), 2);
    }

    #[tokio::test]
    async fn test_targeted_segment_is_not_personalized() {
        let pipeline = Pipeline::new(model(), 1);
        let mut session = ready_session(&pipeline).await;

        let variants = pipeline
            .personalize(&mut session, Some("Trailblazer"))
            .await
            .unwrap();
        assert_eq!(variants.len(), 1);
        assert_eq!(variants[0].segment, "Homebody");
        assert!(session.variant("Trailblazer").is_none());
    }

    #[tokio::test]
    async fn test_unknown_targeted_segment_is_not_found() {
        let pipeline = Pipeline::new(model(), 1);
        let mut session = ready_session(&pipeline).await;
        let err = pipeline
            .personalize(&mut session, Some("Nobody"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_personalize_reports_missing_prerequisites() {
        let pipeline = Pipeline::new(model(), 1);
        let mut session = session();
        let err = pipeline.personalize(&mut session, None).await.unwrap_err();
        match err {
            AppError::Validation(msg) => {
                assert!(msg.contains("brand profile"));
                assert!(msg.contains("segments"));
                assert!(msg.contains("source content"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_degraded_pdf_reports_stage_without_calling_model() {
        let llm = model();
        let pipeline = Pipeline::new(llm.clone(), 1);
        let mut session = session();

        let broken = Document::new(MediaKind::Pdf, b"not a pdf".to_vec());
        let ingested = pipeline
            .load_brand_guide(&mut session, &broken)
            .await
            .unwrap();

        assert_eq!(ingested.extraction_error.as_ref().map(|r| r.kind), Some("pdf"));
        assert_eq!(ingested.value.voice(), SENTINEL);
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_degraded_word_yields_empty_segments() {
        let llm = model();
        let pipeline = Pipeline::new(llm.clone(), 1);
        let mut session = session();

        let broken = Document::new(MediaKind::Word, b"not a docx".to_vec());
        let ingested = pipeline.load_segments(&mut session, &broken).await.unwrap();

        assert_eq!(ingested.extraction_error.as_ref().map(|r| r.kind), Some("word"));
        assert!(ingested.value.is_empty());
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_invalid_utf8_content_is_fatal() {
        let pipeline = Pipeline::new(model(), 1);
        let mut session = session();
        let bad = Document::new(MediaKind::PlainText, vec![0xff, 0xfe, 0xfd]);
        let err = pipeline.load_source_content(&mut session, &bad).unwrap_err();
        assert!(matches!(err, AppError::Extraction(_)));
        assert!(session.source.is_none());
    }

    #[tokio::test]
    async fn test_degraded_source_content_is_not_personalized() {
        let llm = model();
        let pipeline = Pipeline::new(llm.clone(), 1);
        let mut session = ready_session(&pipeline).await;
        let calls_before = llm.call_count();

        let broken = Document::new(MediaKind::Word, b"not a docx".to_vec());
        let ingested = pipeline.load_source_content(&mut session, &broken).unwrap();
        assert_eq!(ingested.value.text, "");

        let err = pipeline.personalize(&mut session, None).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(llm.call_count(), calls_before);
        assert!(session.variants().is_empty());
    }

    #[tokio::test]
    async fn test_empty_segment_collection_is_not_personalized() {
        let llm = model();
        let pipeline = Pipeline::new(llm.clone(), 1);
        let mut session = ready_session(&pipeline).await;

        let broken = Document::new(MediaKind::Pdf, b"not a pdf".to_vec());
        pipeline.load_segments(&mut session, &broken).await.unwrap();
        let calls_before = llm.call_count();

        let err = pipeline.personalize(&mut session, None).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(llm.call_count(), calls_before);
    }

    #[tokio::test]
    async fn test_new_source_content_clears_variants() {
        let pipeline = Pipeline::new(model(), 1);
        let mut session = ready_session(&pipeline).await;
        pipeline.personalize(&mut session, None).await.unwrap();
        assert_eq!(session.variants().len(), 2);

        pipeline
            .load_source_content(&mut session, &Document::plain_text("New offer"))
            .unwrap();
        assert!(session.variants().is_empty());
    }

    #[tokio::test]
    async fn test_revise_requires_existing_variant_and_instructions() {
        let pipeline = Pipeline::new(model(), 1);
        let mut session = ready_session(&pipeline).await;

        let err = pipeline
            .revise(&mut session, "Homebody", "shorter")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        pipeline.personalize(&mut session, None).await.unwrap();
        let err = pipeline.revise(&mut session, "Homebody", "   ").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_manual_brand_text() {
        let pipeline = Pipeline::new(model(), 1);
        let mut session = session();

        let err = pipeline.enter_brand_text(&mut session, "  ").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let profile = pipeline
            .enter_brand_text(&mut session, "We are bold.")
            .await
            .unwrap();
        assert_eq!(profile.positioning(), "Premium outdoor gear");
        assert!(session.brand.is_some());
    }
}
