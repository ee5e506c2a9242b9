//! Query engine: parallel prefix fan-out, merge, rank.

use super::normalizer::{distinct_tokens, normalize_text};
use super::ranking::rank;
use crate::domain::OwnerId;
use crate::error::IndexResult;
use crate::models::{IndexEntry, QueryHit};
use crate::storage::schema::SCAN_LIMIT;
use crate::storage::IndexStore;
use futures::future::try_join_all;
use std::collections::HashSet;
use std::sync::Arc;

/// Default number of hits returned by a search.
pub const DEFAULT_MAX_RESULTS: usize = 10;

/// Answers free-text queries against one owner's partition.
#[derive(Clone)]
pub struct QueryEngine {
    store: Arc<dyn IndexStore>,
    max_results: usize,
}

/// Candidates gathered for one query before ranking.
#[derive(Debug, Default)]
pub struct CandidateSet {
    /// Distinct rows in first-seen order
    pub rows: Vec<IndexEntry>,

    /// Rows returned by storage before deduplication
    pub scanned: usize,
}

impl QueryEngine {
    /// Create an engine returning at most `max_results` hits per query.
    pub fn new(store: Arc<dyn IndexStore>, max_results: usize) -> Self {
        Self { store, max_results }
    }

    /// Search `owner`'s index for `query`.
    ///
    /// Returns at most `max_results` hits, closest first. Any failed scan fails
    /// the whole query.
    ///
    /// Hits are index rows, not documents: a document that matches through
    /// several of its words yields one hit per matching word, each with the
    /// same distance. A long document matching many query words can fill
    /// every slot and push other matching documents out of the result.
    pub async fn search(&self, owner: &OwnerId, query: &str) -> IndexResult<Vec<QueryHit>> {
        self.search_counted(owner, query)
            .await
            .map(|(hits, _scanned)| hits)
    }

    /// Like [`search`](Self::search), also returning how many rows storage
    /// handed back before deduplication.
    pub async fn search_counted(
        &self,
        owner: &OwnerId,
        query: &str,
    ) -> IndexResult<(Vec<QueryHit>, usize)> {
        let canonical_query = normalize_text(query);
        let candidates = self.collect_candidates(owner, query).await?;

        let hits = rank(candidates.rows, &canonical_query, self.max_results);

        tracing::debug!(
            owner = %owner,
            scanned = candidates.scanned,
            hits = hits.len(),
            "Search completed"
        );

        Ok((hits, candidates.scanned))
    }

    /// Run one prefix scan per distinct query token concurrently and merge the
    /// results, dropping rows already seen through another token.
    pub async fn collect_candidates(
        &self,
        owner: &OwnerId,
        query: &str,
    ) -> IndexResult<CandidateSet> {
        let tokens = distinct_tokens(query);
        if tokens.is_empty() {
            return Ok(CandidateSet::default());
        }

        let scans = tokens
            .iter()
            .map(|token| self.store.scan_prefix(owner, token, SCAN_LIMIT));
        let batches = try_join_all(scans).await?;

        let scanned: usize = batches.iter().map(Vec::len).sum();
        let mut seen = HashSet::new();
        let rows = batches
            .into_iter()
            .flatten()
            .filter(|row| seen.insert(row.row_key()))
            .collect();

        Ok(CandidateSet { rows, scanned })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EntryType, ReferenceId};
    use crate::search::IndexWriter;
    use crate::storage::InMemoryIndexStore;

    async fn setup() -> (Arc<InMemoryIndexStore>, IndexWriter, QueryEngine) {
        let store = Arc::new(InMemoryIndexStore::new());
        store.create_table().await.unwrap();
        let writer = IndexWriter::new(store.clone(), 4);
        let engine = QueryEngine::new(store.clone(), DEFAULT_MAX_RESULTS);
        (store, writer, engine)
    }

    async fn index(writer: &IndexWriter, owner: &str, text: &str, reference: &str) {
        writer
            .add_entry(
                &OwnerId::new(owner).unwrap(),
                text,
                &ReferenceId::new(reference).unwrap(),
                EntryType::Unknown,
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_plural_query_finds_singular_stem() {
        let (_store, writer, engine) = setup().await;
        index(&writer, "u1", "Blue Widgets", "w1").await;

        let hits = engine
            .search(&OwnerId::new("u1").unwrap(), "widget")
            .await
            .unwrap();

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Blue Widgets");
        assert_eq!(hits[0].description, "widget");
    }

    #[tokio::test]
    async fn test_overlapping_prefixes_are_deduplicated() {
        let (_store, writer, engine) = setup().await;
        index(&writer, "u1", "Reporting", "r1").await;

        // "rep" and "report" both reach the single "reporting" row
        let candidates = engine
            .collect_candidates(&OwnerId::new("u1").unwrap(), "rep report")
            .await
            .unwrap();

        assert_eq!(candidates.scanned, 2);
        assert_eq!(candidates.rows.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_query_skips_storage() {
        let (store, _writer, engine) = setup().await;
        let hits = engine
            .search(&OwnerId::new("u1").unwrap(), "   ")
            .await
            .unwrap();
        assert!(hits.is_empty());
        assert_eq!(store.scan_count(), 0);
    }

    #[tokio::test]
    async fn test_one_scan_per_distinct_token() {
        let (store, _writer, engine) = setup().await;
        engine
            .search(&OwnerId::new("u1").unwrap(), "red cars Red car blue")
            .await
            .unwrap();
        assert_eq!(store.scan_count(), 3);
    }
}
