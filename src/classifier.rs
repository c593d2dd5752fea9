//! Text content classification.
//!
//! [`TextClassifier`] is the seam between the sampling pipeline and the
//! text-classification capability. Implementations return the full
//! label→score mapping the underlying model reports — no re-normalization
//! and no category curation happens at this layer. Thresholding is the
//! report generator's job, kept separate so both sides stay independently
//! testable.
//!
//! Two implementations ship with the crate:
//!
//! - [`RemoteClassifier`] — calls a hosted text-classification inference
//!   endpoint (by default `unitary/toxic-bert` on the Hugging Face
//!   inference API).
//! - [`KeywordClassifier`] — an offline, rule-based fallback using
//!   per-category indicator terms.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::FrameGuardError;

/// Classifies a piece of text into content categories with confidences.
///
/// The label set is owned by the implementation, not fixed by this crate;
/// scores lie in `[0, 1]`. A failure is recoverable from the pipeline's
/// point of view — the affected frame is dropped, processing continues.
pub trait TextClassifier: Send + Sync {
    /// Classify `text` and return the complete label→score mapping.
    fn classify(&self, text: &str) -> Result<BTreeMap<String, f32>, FrameGuardError>;
}

// ── Remote model classifier ──────────────────────────────────────

/// Default inference endpoint, matching the model the report format was
/// designed around.
const DEFAULT_ENDPOINT: &str = "https://api-inference.huggingface.co/models/unitary/toxic-bert";

#[derive(Debug, Deserialize)]
struct LabelScore {
    label: String,
    score: f32,
}

/// Classifier backed by a hosted text-classification inference endpoint.
///
/// Sends `{"inputs": <text>}` and expects the standard
/// `[[{"label": .., "score": ..}, ..]]` response shape. The HTTP client is
/// built once at construction; each classification is a stateless call.
///
/// # Example
///
/// ```no_run
/// use frameguard::{RemoteClassifier, TextClassifier};
///
/// let classifier = RemoteClassifier::new().with_token("hf_...");
/// let scores = classifier.classify("some on-screen text")?;
/// for (label, score) in &scores {
///     println!("{label}: {score:.3}");
/// }
/// # Ok::<(), frameguard::FrameGuardError>(())
/// ```
#[derive(Debug, Clone)]
pub struct RemoteClassifier {
    client: reqwest::blocking::Client,
    endpoint: String,
    token: Option<String>,
}

impl RemoteClassifier {
    /// Create a classifier against the default toxicity model endpoint.
    pub fn new() -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            token: None,
        }
    }

    /// Point the classifier at a different inference endpoint.
    #[must_use]
    pub fn with_endpoint<S: Into<String>>(mut self, endpoint: S) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Attach a bearer token for authenticated endpoints.
    #[must_use]
    pub fn with_token<S: Into<String>>(mut self, token: S) -> Self {
        self.token = Some(token.into());
        self
    }
}

impl Default for RemoteClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl TextClassifier for RemoteClassifier {
    fn classify(&self, text: &str) -> Result<BTreeMap<String, f32>, FrameGuardError> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .json(&serde_json::json!({ "inputs": text }));

        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .map_err(|error| FrameGuardError::Classification(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FrameGuardError::Classification(format!(
                "inference endpoint returned {status}",
            )));
        }

        // The inference API wraps single-input results in an outer list.
        let results: Vec<Vec<LabelScore>> = response
            .json()
            .map_err(|error| FrameGuardError::Classification(error.to_string()))?;

        let scores = results
            .into_iter()
            .next()
            .ok_or_else(|| {
                FrameGuardError::Classification("empty classification response".to_string())
            })?
            .into_iter()
            .map(|entry| (entry.label, entry.score.clamp(0.0, 1.0)))
            .collect();

        Ok(scores)
    }
}

// ── Keyword rule classifier ──────────────────────────────────────

/// Confidence assigned to a category on its first matching term; each
/// additional match adds [`MATCH_STEP`], capped at [`MATCH_CEILING`].
const BASE_CONFIDENCE: f32 = 0.7;
const MATCH_STEP: f32 = 0.1;
const MATCH_CEILING: f32 = 0.95;

/// Offline rule-based classifier using per-category indicator terms.
///
/// Matches whole lowercase words against each category's term list and
/// reports a heuristic confidence per matched category. Categories with no
/// match are omitted from the result, so the label set varies per input —
/// exactly as with a model-backed classifier.
///
/// Useful when no inference endpoint is reachable, and as the static rule
/// set for comment scanning.
#[derive(Debug, Clone)]
pub struct KeywordClassifier {
    rules: Vec<(String, Vec<String>)>,
}

impl KeywordClassifier {
    /// Create a classifier with the default category rules.
    pub fn new() -> Self {
        let rules = [
            ("hate_speech", vec!["hate", "suck", "stupid", "idiot", "dumb"]),
            ("homophobia", vec!["homophobic", "homophobe"]),
            ("racism", vec!["racist", "supremacist"]),
            ("sexism", vec!["sexist", "misogynist", "misogyny"]),
            (
                "positive",
                vec!["love", "wholesome", "great", "awesome", "amazing"],
            ),
        ];

        Self {
            rules: rules
                .into_iter()
                .map(|(label, terms)| {
                    (
                        label.to_string(),
                        terms.into_iter().map(str::to_string).collect(),
                    )
                })
                .collect(),
        }
    }

    /// Add or replace a category rule.
    #[must_use]
    pub fn with_rule<S: Into<String>>(mut self, label: S, terms: Vec<String>) -> Self {
        let label = label.into();
        self.rules.retain(|(existing, _)| *existing != label);
        self.rules.push((label, terms));
        self
    }

    /// Count whole-word matches of `terms` in the lowercased `text`.
    fn match_count(text: &str, terms: &[String]) -> usize {
        let words: Vec<&str> = text.split_whitespace().collect();
        terms
            .iter()
            .filter(|term| words.iter().any(|word| word == &term.as_str()))
            .count()
    }
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl TextClassifier for KeywordClassifier {
    fn classify(&self, text: &str) -> Result<BTreeMap<String, f32>, FrameGuardError> {
        let lowered = text.to_lowercase();
        let mut scores = BTreeMap::new();

        for (label, terms) in &self.rules {
            let count = Self::match_count(&lowered, terms);
            if count > 0 {
                let confidence =
                    (BASE_CONFIDENCE + MATCH_STEP * (count - 1) as f32).min(MATCH_CEILING);
                scores.insert(label.clone(), confidence);
            }
        }

        Ok(scores)
    }
}
