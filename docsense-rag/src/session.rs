//! Caller-owned retrieval state: the current index and the chat history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::answer::Answer;
use crate::index::SimilarityIndex;

/// One recorded query and the answer it produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    pub query: String,
    pub answer: Answer,
    pub asked_at: DateTime<Utc>,
}

/// Append-only log of interactions, oldest first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatHistory {
    entries: Vec<Interaction>,
}

impl ChatHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an interaction at the current time.
    pub fn record(&mut self, query: impl Into<String>, answer: Answer) {
        self.entries.push(Interaction { query: query.into(), answer, asked_at: Utc::now() });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Interactions in chronological order.
    pub fn iter(&self) -> impl Iterator<Item = &Interaction> {
        self.entries.iter()
    }

    pub fn last(&self) -> Option<&Interaction> {
        self.entries.last()
    }
}

/// State carried between pipeline calls.
///
/// A session owns the [`SimilarityIndex`] built by the latest ingestion and
/// the [`ChatHistory`] of queries against it. The hosting application decides
/// how long a session lives; pipeline operations borrow it mutably, so ingest
/// and query calls on one session never overlap.
#[derive(Debug, Clone, Default)]
pub struct Session {
    index: SimilarityIndex,
    history: ChatHistory,
}

impl Session {
    /// Create a session with an empty index and history.
    pub fn new() -> Self {
        Self::default()
    }

    /// The index built by the most recent ingestion.
    pub fn index(&self) -> &SimilarityIndex {
        &self.index
    }

    /// The recorded interactions, oldest first.
    pub fn history(&self) -> &ChatHistory {
        &self.history
    }

    /// Whether any fragments are available to search.
    pub fn has_documents(&self) -> bool {
        !self.index.is_empty()
    }

    pub(crate) fn replace_index(&mut self, index: SimilarityIndex) -> SimilarityIndex {
        std::mem::replace(&mut self.index, index)
    }

    pub(crate) fn history_mut(&mut self) -> &mut ChatHistory {
        &mut self.history
    }
}
