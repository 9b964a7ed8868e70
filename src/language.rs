//! Document language guessing.
//!
//! Detection is advisory: the result only annotates the analysis prompt.
//! [`LanguageIdentifier`] returns `None` when it cannot decide, and
//! [`DetectedLanguage::from_code`] folds that, and any language outside the
//! supported set, into English.

use lingua::{LanguageDetector, LanguageDetectorBuilder};
use std::fmt;
use tracing::debug;

/// Languages the analysis prompt is tuned for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DetectedLanguage {
    #[default]
    English,
    Russian,
    Kazakh,
}

impl DetectedLanguage {
    /// Map a detector code onto the supported set. Unknown or missing codes
    /// become English.
    pub fn from_code(code: Option<&str>) -> Self {
        match code.map(|c| c.trim().to_ascii_lowercase()).as_deref() {
            Some("en") => Self::English,
            Some("ru") => Self::Russian,
            Some("kk") => Self::Kazakh,
            _ => Self::default(),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Russian => "ru",
            Self::Kazakh => "kk",
        }
    }
}

impl fmt::Display for DetectedLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Best-guess language identification.
pub trait LanguageIdentifier: Send + Sync {
    /// ISO 639-1 code of the most likely language, or `None` if undecided.
    fn identify(&self, text: &str) -> Option<String>;
}

/// Detect and normalize in one step.
pub fn detect_language(identifier: &dyn LanguageIdentifier, text: &str) -> DetectedLanguage {
    let code = identifier.identify(text);
    let language = DetectedLanguage::from_code(code.as_deref());
    debug!("Language detection: raw={:?} resolved={}", code, language);
    language
}

/// [`LanguageIdentifier`] backed by lingua's statistical models.
pub struct LinguaIdentifier {
    detector: LanguageDetector,
}

impl LinguaIdentifier {
    /// Detector over every language lingua knows, so that text in an
    /// unsupported language is reported as such rather than forced into the
    /// nearest supported one. Models load lazily on first use.
    pub fn new() -> Self {
        Self {
            detector: LanguageDetectorBuilder::from_all_languages().build(),
        }
    }
}

impl Default for LinguaIdentifier {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageIdentifier for LinguaIdentifier {
    fn identify(&self, text: &str) -> Option<String> {
        self.detector
            .detect_language_of(text)
            .map(|language| language.iso_code_639_1().to_string().to_lowercase())
    }
}
