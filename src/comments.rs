//! YouTube comment scanning — the sibling feature to frame analysis.
//!
//! Where the sampling pipeline works on a video's own frames, this module
//! runs a single fetch-then-classify pass over a video's comment section:
//! page through the YouTube Data API for top-level comments, then label each
//! comment by combining static keyword rules with the model classifier's
//! confidence.
//!
//! The per-item failure policy here is the origin of the pipeline's
//! classification-failure handling: a comment the classifier rejects is
//! marked with the `error` classification and scanning continues.

use serde::{Deserialize, Serialize};

use crate::classifier::{KeywordClassifier, TextClassifier};
use crate::error::FrameGuardError;

const COMMENT_THREADS_ENDPOINT: &str = "https://www.googleapis.com/youtube/v3/commentThreads";

/// Category precedence for choosing a comment's primary classification.
/// First matching rule category wins.
const PRECEDENCE: [(&str, &str); 5] = [
    ("homophobia", "homophobic content"),
    ("hate_speech", "hate speech"),
    ("racism", "racism"),
    ("sexism", "sexism"),
    ("positive", "positive content"),
];

/// Classification result for a single comment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommentClassification {
    /// The comment text as returned by the API.
    pub comment: String,
    /// Primary category label (`"neutral"` when no rule matched, `"error"`
    /// when the classifier failed for this comment).
    pub classification: String,
    /// The model's top confidence for this comment, rounded to 3 decimals.
    pub confidence: f32,
}

// ── YouTube Data API response shapes ─────────────────────────────

#[derive(Debug, Deserialize)]
struct CommentThreadsResponse {
    #[serde(default)]
    items: Vec<CommentThread>,
    #[serde(rename = "nextPageToken")]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CommentThread {
    snippet: ThreadSnippet,
}

#[derive(Debug, Deserialize)]
struct ThreadSnippet {
    #[serde(rename = "topLevelComment")]
    top_level_comment: TopLevelComment,
}

#[derive(Debug, Deserialize)]
struct TopLevelComment {
    snippet: CommentSnippet,
}

#[derive(Debug, Deserialize)]
struct CommentSnippet {
    #[serde(rename = "textDisplay")]
    text_display: String,
}

/// Fetches top-level comments for a video via the YouTube Data API.
#[derive(Debug, Clone)]
pub struct YouTubeCommentSource {
    client: reqwest::blocking::Client,
    api_key: String,
}

impl YouTubeCommentSource {
    /// Create a comment source with the given API key.
    pub fn new<S: Into<String>>(api_key: S) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            api_key: api_key.into(),
        }
    }

    /// Fetch up to `max_results` top-level comments for `video_id`,
    /// following pagination tokens until the quota is met or the comment
    /// section is exhausted.
    ///
    /// # Errors
    ///
    /// Returns [`FrameGuardError::HttpError`] if a request fails or the
    /// response cannot be parsed. Unlike per-comment classification,
    /// fetching is all-or-nothing.
    pub fn fetch_comments(
        &self,
        video_id: &str,
        max_results: usize,
    ) -> Result<Vec<String>, FrameGuardError> {
        let mut comments = Vec::new();
        let mut page_token: Option<String> = None;

        while comments.len() < max_results {
            let page_size = (max_results - comments.len()).min(100);
            let mut request = self.client.get(COMMENT_THREADS_ENDPOINT).query(&[
                ("part", "snippet"),
                ("videoId", video_id),
                ("maxResults", &page_size.to_string()),
                ("key", &self.api_key),
            ]);

            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token.as_str())]);
            }

            let response = request.send()?;
            let status = response.status();
            if !status.is_success() {
                return Err(FrameGuardError::HttpError(format!(
                    "comment threads request returned {status}",
                )));
            }

            let page: CommentThreadsResponse = response
                .json()
                .map_err(|error| FrameGuardError::HttpError(error.to_string()))?;

            for thread in page.items {
                comments.push(thread.snippet.top_level_comment.snippet.text_display);
            }

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        log::info!("Fetched {} comments for video {video_id}", comments.len());
        Ok(comments)
    }
}

/// Classify a batch of comments.
///
/// Each comment gets a primary category from the static keyword rules
/// (highest-precedence matching category wins, `"neutral"` otherwise) and a
/// confidence taken from the model classifier's top score. A classifier
/// failure marks that one comment as `"error"` with confidence 0.0 and
/// scanning continues.
pub fn classify_comments(
    comments: &[String],
    classifier: &dyn TextClassifier,
) -> Vec<CommentClassification> {
    let rules = KeywordClassifier::new();
    let mut results = Vec::with_capacity(comments.len());

    for comment in comments {
        // The rule classifier is infallible; only the model call can fail.
        let rule_matches = rules.classify(comment).unwrap_or_default();

        match classifier.classify(comment) {
            Ok(scores) => {
                let classification = PRECEDENCE
                    .iter()
                    .find(|(category, _)| rule_matches.contains_key(*category))
                    .map(|(_, label)| label.to_string())
                    .unwrap_or_else(|| "neutral".to_string());

                let top_score = scores.values().copied().fold(0.0f32, f32::max);

                results.push(CommentClassification {
                    comment: comment.clone(),
                    classification,
                    confidence: (top_score * 1000.0).round() / 1000.0,
                });
            }
            Err(error) => {
                log::warn!("Classification failed for a comment, marking as error: {error}");
                results.push(CommentClassification {
                    comment: comment.clone(),
                    classification: "error".to_string(),
                    confidence: 0.0,
                });
            }
        }
    }

    results
}
