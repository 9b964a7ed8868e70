//! TrustDoc - document legal-risk analysis backend.
//!
//! `POST /analyze` runs a single pipeline per request:
//! intake → text extraction → language detection → completion call → Markdown rendering.
//! A small Threads OAuth/keyword-search proxy lives alongside it.

pub mod analysis;
pub mod api;
pub mod config;
pub mod error;
pub mod extract;
pub mod intake;
pub mod language;
pub mod openai;
pub mod render;
pub mod session;
pub mod threads;

pub use api::build_router;

use analysis::Analyzer;
use config::AppConfig;
use language::LinguaIdentifier;
use openai::{CompletionService, OpenAiClient};
use session::SessionStore;
use std::sync::Arc;
use threads::ThreadsClient;
use tracing::{info, warn};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<Analyzer>,
    /// `None` when Threads credentials are not configured.
    pub threads: Option<Arc<ThreadsClient>>,
    pub sessions: SessionStore,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(
        analyzer: Analyzer,
        threads: Option<ThreadsClient>,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            analyzer: Arc::new(analyzer),
            threads: threads.map(Arc::new),
            sessions: SessionStore::new(),
            max_upload_bytes,
        }
    }

    /// Wire up the production collaborators.
    ///
    /// A missing OpenAI key does not stop startup; `/analyze` reports it instead.
    pub fn from_config(config: &AppConfig) -> Self {
        let completion: Option<Arc<dyn CompletionService>> =
            match OpenAiClient::from_config(&config.openai) {
                Ok(client) => {
                    info!("OpenAI client initialized (model={})", config.openai.model);
                    Some(Arc::new(client))
                }
                Err(e) => {
                    warn!("Document analysis disabled: {}", e);
                    None
                }
            };

        let analyzer = Analyzer::new(
            completion,
            Arc::new(LinguaIdentifier::new()),
            config.openai.model.clone(),
        );

        let threads = config.threads.clone().map(ThreadsClient::new);
        if threads.is_none() {
            info!("Threads integration not configured");
        }

        Self::new(analyzer, threads, config.max_upload_bytes)
    }
}
