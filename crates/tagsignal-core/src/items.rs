//! Pipeline input types.
//!
//! A [`RawPost`] is what the collection subsystem hands over; an [`Item`] is
//! the same post after the sentiment and lexical collaborators have attached
//! their features. Items are never mutated once built.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Upper bound on the number of `(term, score)` pairs carried per item.
pub const MAX_TOP_TERMS: usize = 10;

/// A single lexical-importance term with its per-item score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermScore {
    pub term: String,
    pub score: f64,
}

impl TermScore {
    #[must_use]
    pub fn new(term: impl Into<String>, score: f64) -> Self {
        Self {
            term: term.into(),
            score,
        }
    }
}

/// Ordered top terms for one item, capped at [`MAX_TOP_TERMS`].
///
/// Construction truncates anything past the cap, so the bound holds for
/// deserialized input as well.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<TermScore>", into = "Vec<TermScore>")]
pub struct TopTerms(Vec<TermScore>);

impl TopTerms {
    #[must_use]
    pub fn new(terms: impl IntoIterator<Item = TermScore>) -> Self {
        Self(terms.into_iter().take(MAX_TOP_TERMS).collect())
    }

    #[must_use]
    pub fn as_slice(&self) -> &[TermScore] {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TermScore> {
        self.0.iter()
    }

    /// Whether any term matches one of `needles`, ignoring ASCII case.
    #[must_use]
    pub fn contains_any(&self, needles: &[&str]) -> bool {
        self.0
            .iter()
            .any(|t| needles.iter().any(|n| t.term.trim().eq_ignore_ascii_case(n)))
    }
}

impl From<Vec<TermScore>> for TopTerms {
    fn from(terms: Vec<TermScore>) -> Self {
        Self::new(terms)
    }
}

impl From<TopTerms> for Vec<TermScore> {
    fn from(terms: TopTerms) -> Self {
        terms.0
    }
}

impl<'a> IntoIterator for &'a TopTerms {
    type Item = &'a TermScore;
    type IntoIter = std::slice::Iter<'a, TermScore>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A collected post before feature extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPost {
    pub id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub likes: u64,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub retweets: u64,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub replies: u64,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub views: u64,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

/// One analyzed post: engagement counts plus collaborator features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub likes: u64,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub retweets: u64,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub replies: u64,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub views: u64,
    /// Carried through to tag time ranges; never used in scoring.
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    /// Polarity in `[-1, 1]`.
    #[serde(default)]
    pub sentiment_score: f64,
    /// Model confidence in `[0, 1]`.
    #[serde(default)]
    pub sentiment_confidence: f64,
    /// Share of finance vocabulary in `[0, 1]`.
    #[serde(default)]
    pub finance_term_density: f64,
    #[serde(default)]
    pub top_terms: TopTerms,
}

impl Item {
    /// Build an item with zero engagement and neutral features.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tags: Vec::new(),
            likes: 0,
            retweets: 0,
            replies: 0,
            views: 0,
            timestamp: None,
            sentiment_score: 0.0,
            sentiment_confidence: 0.0,
            finance_term_density: 0.0,
            top_terms: TopTerms::default(),
        }
    }

    /// Normalized, de-duplicated tags in first-seen order.
    #[must_use]
    pub fn normalized_tags(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::with_capacity(self.tags.len());
        for tag in self.tags.iter().filter_map(|t| normalize_tag(t)) {
            if !out.contains(&tag) {
                out.push(tag);
            }
        }
        out
    }
}

/// Lower-case a tag, strip leading `#` and surrounding whitespace.
///
/// Returns `None` when nothing is left.
#[must_use]
pub fn normalize_tag(raw: &str) -> Option<String> {
    let tag = raw.trim().trim_start_matches('#').trim().to_lowercase();
    if tag.is_empty() {
        None
    } else {
        Some(tag)
    }
}

/// Accept any JSON number (or null) for an engagement count.
///
/// Negative and fractional values from a misbehaving collector are clamped
/// to the nearest valid count instead of failing the whole batch.
fn deserialize_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<f64>::deserialize(deserializer)?;
    Ok(raw.map_or(0, clamp_count))
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn clamp_count(value: f64) -> u64 {
    if value.is_nan() || value <= 0.0 {
        0
    } else if value >= u64::MAX as f64 {
        u64::MAX
    } else {
        value.floor() as u64
    }
}
