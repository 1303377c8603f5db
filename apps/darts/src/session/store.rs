use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::brand::BrandProfile;
use crate::models::segment::{Segment, SegmentCollection};
use crate::models::variant::{SourceContent, Variant};

/// Everything one interactive session has produced so far.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub brand: Option<BrandProfile>,
    pub segments: Option<SegmentCollection>,
    pub source: Option<SourceContent>,
    /// Latest variant per segment, in the order segments were first generated.
    variants: Vec<Variant>,
}

impl SessionContext {
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            created_at: Utc::now(),
            brand: None,
            segments: None,
            source: None,
            variants: Vec::new(),
        }
    }

    /// Stores a variant, replacing any earlier one for the same segment.
    pub fn record_variant(&mut self, variant: Variant) {
        match self
            .variants
            .iter_mut()
            .find(|v| v.segment == variant.segment)
        {
            Some(existing) => *existing = variant,
            None => self.variants.push(variant),
        }
    }

    pub fn variant(&self, segment: &str) -> Option<&Variant> {
        self.variants.iter().find(|v| v.segment == segment)
    }

    #[cfg(test)]
    pub fn variants(&self) -> &[Variant] {
        &self.variants
    }

    pub fn clear_variants(&mut self) {
        self.variants.clear();
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.id,
            created_at: self.created_at,
            brand: self.brand.clone(),
            segments: self
                .segments
                .as_ref()
                .map(|c| c.presentable().into_iter().cloned().collect())
                .unwrap_or_default(),
            source: self.source.clone(),
            variants: self.variants.clone(),
        }
    }
}

/// What the presentation layer sees of a session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub brand: Option<BrandProfile>,
    /// Presentable segments only.
    pub segments: Vec<Segment>,
    pub source: Option<SourceContent>,
    pub variants: Vec<Variant>,
}

pub type SessionHandle = Arc<Mutex<SessionContext>>;

/// In-memory session registry. Each session has its own lock so a slow
/// pipeline run only blocks requests for that session.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, SessionHandle>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self) -> SessionHandle {
        let id = Uuid::new_v4();
        let handle = Arc::new(Mutex::new(SessionContext::new(id)));
        self.sessions.write().await.insert(id, Arc::clone(&handle));
        info!("Created session {id}");
        handle
    }

    pub async fn get(&self, id: Uuid) -> Result<SessionHandle, AppError> {
        self.sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))
    }

    pub async fn remove(&self, id: Uuid) -> Result<(), AppError> {
        if self.sessions.write().await.remove(&id).is_none() {
            return Err(AppError::NotFound(format!("Session {id} not found")));
        }
        info!("Removed session {id}");
        Ok(())
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}
