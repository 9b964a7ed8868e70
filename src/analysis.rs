//! Legal-risk analysis of extracted document text.
//!
//! Builds the prompt pair for the completion service and enforces the
//! result contract (trimmed, non-empty Markdown).

use crate::language::{detect_language, DetectedLanguage, LanguageIdentifier};
use crate::openai::{CompletionError, CompletionRequest, CompletionService};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Longest document prefix, in characters, sent for analysis.
pub const MAX_DOCUMENT_CHARS: usize = 16_000;
pub const TEMPERATURE: f32 = 0.2;
pub const MAX_OUTPUT_TOKENS: u32 = 900;

/// Reply the model gives for a document with no significant risks.
pub const NO_RISKS_REPLY: &str =
    "✅ No significant legal risks under the laws of the Republic of Kazakhstan.";

pub const SYSTEM_PROMPT: &str = concat!(
    "You are a Kazakhstani legal expert working for TrustDoc.ai — an AI system for document and contract risk analysis. ",
    "Analyze uploaded documents in the context of the laws and Constitution of the Republic of Kazakhstan, ",
    "using the official database Adilet.gov.kz for legal reasoning when appropriate. ",
    "Detect potential legal or contractual risks and cite relevant Kazakhstani legal norms briefly. ",
    "Identify the document’s language (Kazakh, Russian, or English) automatically and respond only in that same language. ",
    "Never mix multiple languages in one response. ",
    "Keep your output concise, factual, and formatted in Markdown. ",
    "If there are no significant legal risks, respond briefly: ",
    "'✅ No significant legal risks under the laws of the Republic of Kazakhstan.' ",
    "If risks exist, structure your output as follows:",
    "\n\n⚠️ Potential Legal Risks (based on Kazakh law):",
    "\n- [Short description of the issue]",
    "\n- [Relevant reference, e.g. 'May contradict Article 26 of the Constitution of the Republic of Kazakhstan' or 'Violates Article 375 of the Civil Code']",
    "\n\nKeep your answer under 1000 tokens."
);

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("The document does not contain readable text.")]
    EmptyText,

    #[error("OpenAI API key is not configured.")]
    MissingCredential,

    #[error("Received an empty response from the AI service.")]
    EmptyResponse,

    #[error("AI analysis failed: {0}")]
    Upstream(String),
}

impl From<CompletionError> for AnalysisError {
    fn from(err: CompletionError) -> Self {
        match err {
            CompletionError::MissingCredential => Self::MissingCredential,
            other => Self::Upstream(other.to_string()),
        }
    }
}

/// Runs the analysis stage against an injected completion service.
pub struct Analyzer {
    completion: Option<Arc<dyn CompletionService>>,
    identifier: Arc<dyn LanguageIdentifier>,
    model: String,
}

impl Analyzer {
    /// `completion` is `None` when no API key was configured; every analysis
    /// then fails with [`AnalysisError::MissingCredential`].
    pub fn new(
        completion: Option<Arc<dyn CompletionService>>,
        identifier: Arc<dyn LanguageIdentifier>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            completion,
            identifier,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Analyze document text and return the model's Markdown report.
    pub async fn analyze(&self, text: &str) -> Result<String, AnalysisError> {
        let cleaned = text.trim();
        if cleaned.is_empty() {
            return Err(AnalysisError::EmptyText);
        }

        let snippet = truncate_chars(cleaned, MAX_DOCUMENT_CHARS);
        if snippet.len() < cleaned.len() {
            info!(
                "Document truncated to {} of {} chars",
                MAX_DOCUMENT_CHARS,
                cleaned.chars().count()
            );
        }

        let language = self.detect(snippet).await;
        let completion = self
            .completion
            .as_ref()
            .ok_or(AnalysisError::MissingCredential)?;

        let request = self.build_request(language, snippet);
        let analysis = completion.complete(&request).await.map_err(|e| {
            warn!("Completion call failed: {}", e);
            AnalysisError::from(e)
        })?;

        let analysis = analysis.trim();
        if analysis.is_empty() {
            return Err(AnalysisError::EmptyResponse);
        }

        info!(
            "Analysis complete: language={} result_chars={}",
            language,
            analysis.chars().count()
        );
        Ok(analysis.to_string())
    }

    /// Detection is CPU-bound on long snippets, so it runs on the blocking pool.
    async fn detect(&self, snippet: &str) -> DetectedLanguage {
        let identifier = Arc::clone(&self.identifier);
        let snippet = snippet.to_string();
        tokio::task::spawn_blocking(move || detect_language(identifier.as_ref(), &snippet))
            .await
            .unwrap_or_else(|e| {
                warn!("Language detection aborted: {}", e);
                DetectedLanguage::default()
            })
    }

    fn build_request(&self, language: DetectedLanguage, snippet: &str) -> CompletionRequest {
        CompletionRequest {
            model: self.model.clone(),
            system: SYSTEM_PROMPT.to_string(),
            user: user_prompt(language, snippet),
            temperature: TEMPERATURE,
            max_output_tokens: MAX_OUTPUT_TOKENS,
        }
    }
}

/// User message: the language annotation followed by the document text.
pub fn user_prompt(language: DetectedLanguage, snippet: &str) -> String {
    format!(
        "The document language is {}. Analyze accordingly:\n{}",
        language.code(),
        snippet
    )
}

/// Prefix of at most `max_chars` characters, cut on a char boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}
