//! Index row and query hit models.

use crate::domain::{EntryType, OwnerId, ReferenceId};
use serde::{Deserialize, Serialize};

/// One stored row of the inverted index.
///
/// The primary key is `((owner_id), keyword, entry_type, reference_id)`:
/// `owner_id` is the partition, the remaining three columns cluster rows so a
/// keyword prefix is a contiguous range within the partition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    /// Partition key
    pub owner_id: OwnerId,

    /// Normalized word token
    pub keyword: String,

    /// Kind of entity the row points at
    pub entry_type: EntryType,

    /// Entity the row points at
    pub reference_id: ReferenceId,

    /// Full text of the source document, repeated on every row built from it
    pub original_text: String,

    /// Milliseconds since epoch of the write that produced this row
    pub indexed_at: i64,
}

/// Identity of a row within its partition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowKey {
    pub keyword: String,
    pub entry_type: EntryType,
    pub reference_id: ReferenceId,
}

impl IndexEntry {
    /// Clustering key of this row.
    pub fn row_key(&self) -> RowKey {
        RowKey {
            keyword: self.keyword.clone(),
            entry_type: self.entry_type,
            reference_id: self.reference_id.clone(),
        }
    }
}

/// A ranked search result derived from an [`IndexEntry`] at query time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryHit {
    /// Display name (the indexed document's original text)
    pub name: String,

    /// The keyword that matched
    pub description: String,

    /// Entity the hit points at
    pub reference_id: ReferenceId,

    /// Kind of entity
    pub entry_type: EntryType,

    /// Edit distance between the canonical query and canonical document text
    pub distance: usize,
}

impl QueryHit {
    /// Build a hit from a stored row and its score.
    pub fn from_entry(entry: IndexEntry, distance: usize) -> Self {
        Self {
            name: entry.original_text,
            description: entry.keyword,
            reference_id: entry.reference_id,
            entry_type: entry.entry_type,
            distance,
        }
    }
}
