use crate::domain::OwnerId;
use crate::error::StoreResult;
use crate::models::IndexEntry;
use async_trait::async_trait;

/// Access to the inverted index table and its metadata.
///
/// Implementations must be safe to share across any number of concurrent
/// ingest and query tasks.
#[async_trait]
pub trait IndexStore: Send + Sync {
    /// Keyspace the table lives in, if the session has one.
    fn keyspace(&self) -> Option<&str>;

    /// Create the index table if it does not exist. Idempotent.
    async fn create_table(&self) -> StoreResult<()>;

    /// Insert or overwrite the row identified by the entry's key.
    async fn upsert(&self, entry: &IndexEntry) -> StoreResult<()>;

    /// Rows of `owner` whose keyword starts with `prefix`, in clustering
    /// order, at most `limit` of them.
    async fn scan_prefix(
        &self,
        owner: &OwnerId,
        prefix: &str,
        limit: usize,
    ) -> StoreResult<Vec<IndexEntry>>;

    /// Compaction class recorded for the table in the metadata catalog.
    ///
    /// `Ok(None)` means the catalog does not list the table (yet).
    async fn compaction_class(&self) -> StoreResult<Option<String>>;

    /// Switch the table's compaction strategy.
    async fn set_compaction(&self, class: &str) -> StoreResult<()>;
}
