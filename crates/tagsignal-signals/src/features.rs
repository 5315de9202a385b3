//! Seams to the sentiment and lexical-importance collaborators.
//!
//! The lexical side is two-phase: a [`LexicalVectorizer`] is fit once over
//! the batch corpus and the resulting [`FittedLexicon`] is passed explicitly
//! to every per-post transform.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tagsignal_core::{Item, RawPost, TopTerms};

use crate::math::{clip_signed, clip_unit};

/// Sentiment model output for one text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentReading {
    /// Polarity in `[-1, 1]`.
    pub score: f64,
    /// Model confidence in `[0, 1]`.
    pub confidence: f64,
}

/// Lexical features for one text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LexicalFeatures {
    pub finance_term_density: f64,
    pub top_terms: TopTerms,
}

/// Scores text polarity.
///
/// Implementations return the zero reading for empty or unanalyzable text
/// rather than failing.
pub trait SentimentModel: Sync {
    fn score(&self, text: &str) -> SentimentReading;
}

/// Learns a vocabulary from a batch corpus.
pub trait LexicalVectorizer {
    type Fitted: FittedLexicon;

    fn fit(&self, corpus: &[&str]) -> Self::Fitted;
}

/// A vocabulary fit over one batch.
pub trait FittedLexicon: Sync {
    /// Features for one text. An empty vocabulary yields the zero features.
    fn transform(&self, text: &str) -> LexicalFeatures;
}

/// Turn collected posts into scoring-ready items.
///
/// Fits the vectorizer once over every post's text, then runs both
/// collaborators per post in parallel. Collaborator outputs are clipped to
/// their documented ranges. Output order follows input order.
pub fn enrich_posts<S, V>(posts: Vec<RawPost>, sentiment: &S, vectorizer: &V) -> Vec<Item>
where
    S: SentimentModel,
    V: LexicalVectorizer,
{
    let corpus: Vec<&str> = posts.iter().map(|p| p.text.as_str()).collect();
    let lexicon = vectorizer.fit(&corpus);
    tracing::debug!(posts = posts.len(), "fitted lexical vocabulary");

    let items: Vec<Item> = posts
        .into_par_iter()
        .map(|post| enrich_post(post, sentiment, &lexicon))
        .collect();

    tracing::info!(items = items.len(), "enriched posts");
    items
}

fn enrich_post<S, L>(post: RawPost, sentiment: &S, lexicon: &L) -> Item
where
    S: SentimentModel,
    L: FittedLexicon,
{
    let reading = sentiment.score(&post.text);
    let features = lexicon.transform(&post.text);

    Item {
        id: post.id,
        tags: post.tags,
        likes: post.likes,
        retweets: post.retweets,
        replies: post.replies,
        views: post.views,
        timestamp: post.timestamp,
        sentiment_score: clip_signed(reading.score),
        sentiment_confidence: clip_unit(reading.confidence),
        finance_term_density: clip_unit(features.finance_term_density),
        top_terms: features.top_terms,
    }
}
