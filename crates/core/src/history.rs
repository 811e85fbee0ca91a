//! Session-scoped history of completed generations.
//!
//! Entries are only ever added. The newest entry is first. Identifiers
//! are assigned by the store at append time and strictly increase.

use std::collections::VecDeque;

use serde::Serialize;

use crate::artifacts::ArtifactFile;
use crate::document::MarketingDocument;
use crate::error::CoreError;
use crate::request::ContentType;
use crate::types::{HistoryId, Timestamp};

/// One completed generation. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub id: HistoryId,
    pub title: String,
    pub content_type: ContentType,
    pub completed_at: Timestamp,
    pub document: MarketingDocument,
    pub artifacts: Vec<ArtifactFile>,
}

/// Everything needed to record a generation; the store supplies the id.
#[derive(Debug, Clone)]
pub struct NewHistoryEntry {
    pub title: String,
    pub content_type: ContentType,
    pub completed_at: Timestamp,
    pub document: MarketingDocument,
    pub artifacts: Vec<ArtifactFile>,
}

/// Lightweight listing row for history views.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistorySummary {
    pub id: HistoryId,
    pub title: String,
    pub content_type: ContentType,
    pub completed_at: Timestamp,
    pub artifact_count: usize,
}

impl From<&HistoryEntry> for HistorySummary {
    fn from(entry: &HistoryEntry) -> Self {
        Self {
            id: entry.id,
            title: entry.title.clone(),
            content_type: entry.content_type,
            completed_at: entry.completed_at,
            artifact_count: entry.artifacts.len(),
        }
    }
}

/// Append-only, most-recent-first collection of [`HistoryEntry`]s.
#[derive(Debug)]
pub struct HistoryStore {
    entries: VecDeque<HistoryEntry>,
    next_id: HistoryId,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::new(),
            next_id: 1,
        }
    }

    /// Store a completed generation at the front and return its id.
    pub fn append(&mut self, entry: NewHistoryEntry) -> HistoryId {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push_front(HistoryEntry {
            id,
            title: entry.title,
            content_type: entry.content_type,
            completed_at: entry.completed_at,
            document: entry.document,
            artifacts: entry.artifacts,
        });
        id
    }

    pub fn get(&self, id: HistoryId) -> Option<&HistoryEntry> {
        // Ids are dense and newest-first, so the position is computable.
        let newest = self.next_id.checked_sub(1)?;
        let offset = newest.checked_sub(id)?;
        let entry = self.entries.get(usize::try_from(offset).ok()?)?;
        (entry.id == id).then_some(entry)
    }

    /// Like [`get`](Self::get) but with a typed not-found error.
    pub fn require(&self, id: HistoryId) -> Result<&HistoryEntry, CoreError> {
        self.get(id).ok_or(CoreError::NotFound {
            entity: "history entry",
            id,
        })
    }

    /// Entries, most recent first.
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn summaries(&self) -> Vec<HistorySummary> {
        self.iter().map(HistorySummary::from).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
