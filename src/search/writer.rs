//! Index writer: fans a document out into one row per distinct token.

use super::normalizer::distinct_tokens;
use crate::domain::{EntryType, OwnerId, ReferenceId};
use crate::error::{IndexResult, StoreError};
use crate::models::IndexEntry;
use crate::storage::IndexStore;
use futures::stream::{self, StreamExt, TryStreamExt};
use std::sync::Arc;

/// Default number of row writes in flight per document.
pub const DEFAULT_WRITE_CONCURRENCY: usize = 16;

/// Writes documents into the inverted index.
#[derive(Clone)]
pub struct IndexWriter {
    store: Arc<dyn IndexStore>,
    concurrency: usize,
}

impl IndexWriter {
    /// Create a writer issuing at most `concurrency` upserts at once.
    pub fn new(store: Arc<dyn IndexStore>, concurrency: usize) -> Self {
        Self {
            store,
            concurrency: concurrency.max(1),
        }
    }

    /// Index `text` for `owner` under `reference_id`.
    ///
    /// Upserts one row per distinct normalized token and returns how many rows
    /// were written. Rows become visible independently; if one write fails
    /// the error is returned and rows already written stay in place.
    /// Re-indexing the same document overwrites its rows.
    pub async fn add_entry(
        &self,
        owner: &OwnerId,
        text: &str,
        reference_id: &ReferenceId,
        entry_type: EntryType,
    ) -> IndexResult<usize> {
        let tokens = distinct_tokens(text);
        if tokens.is_empty() {
            tracing::debug!(owner = %owner, reference = %reference_id, "No tokens to index");
            return Ok(0);
        }

        let indexed_at = chrono::Utc::now().timestamp_millis();
        let row_count = tokens.len();

        stream::iter(tokens)
            .map(|keyword| {
                Ok::<_, StoreError>(IndexEntry {
                    owner_id: owner.clone(),
                    keyword,
                    entry_type,
                    reference_id: reference_id.clone(),
                    original_text: text.to_string(),
                    indexed_at,
                })
            })
            .try_for_each_concurrent(self.concurrency, |entry| async move {
                self.store.upsert(&entry).await
            })
            .await?;

        tracing::debug!(
            owner = %owner,
            reference = %reference_id,
            entry_type = %entry_type,
            rows = row_count,
            "Indexed document"
        );

        Ok(row_count)
    }
}
