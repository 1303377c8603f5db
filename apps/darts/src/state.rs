use crate::config::Config;
use crate::session::pipeline::Pipeline;
use crate::session::store::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionStore,
    /// Extraction and generation stages, wired to the configured chat model.
    pub pipeline: Pipeline,
    pub config: Config,
}
