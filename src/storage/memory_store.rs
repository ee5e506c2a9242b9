use super::schema::TABLE_NAME;
use super::IndexStore;
use crate::domain::{EntryType, OwnerId, ReferenceId};
use crate::error::{StoreError, StoreResult};
use crate::models::IndexEntry;
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::{Mutex, RwLock};

/// Compaction class a freshly created table reports.
const DEFAULT_COMPACTION: &str = "org.apache.cassandra.db.compaction.SizeTieredCompactionStrategy";

/// When the emulated metadata catalog starts listing the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogVisibility {
    /// Listed as soon as the table exists
    Immediate,
    /// Listed once this many lookups have missed
    AfterPolls(usize),
    /// Never listed
    Never,
}

/// Clustering key in storage order: (keyword, entry type code, reference id).
type ClusteringKey = (String, i32, String);

#[derive(Debug, Clone)]
struct StoredRow {
    original_text: String,
    indexed_at: i64,
}

#[derive(Debug, Default)]
struct TableState {
    created: bool,
    partitions: HashMap<OwnerId, BTreeMap<ClusteringKey, StoredRow>>,
}

#[derive(Debug)]
struct CatalogState {
    visibility: CatalogVisibility,
    misses: usize,
    compaction_class: String,
}

/// In-process [`IndexStore`] with the same partition and clustering behavior
/// as the CQL table.
///
/// Rows are kept in one ordered map per owner, so a prefix scan walks a
/// contiguous key range exactly like the cluster does. The metadata catalog
/// can be made to lag behind table creation to exercise eventual
/// consistency, and every operation is counted for verification.
pub struct InMemoryIndexStore {
    keyspace: Option<String>,
    table: RwLock<TableState>,
    catalog: Mutex<CatalogState>,
    upserts: AtomicUsize,
    scans: AtomicUsize,
    catalog_lookups: AtomicUsize,
    alterations: AtomicUsize,
}

impl InMemoryIndexStore {
    /// Create an empty store in keyspace `fuzzy_search` with an immediately
    /// consistent catalog.
    pub fn new() -> Self {
        Self {
            keyspace: Some("fuzzy_search".to_string()),
            table: RwLock::new(TableState::default()),
            catalog: Mutex::new(CatalogState {
                visibility: CatalogVisibility::Immediate,
                misses: 0,
                compaction_class: DEFAULT_COMPACTION.to_string(),
            }),
            upserts: AtomicUsize::new(0),
            scans: AtomicUsize::new(0),
            catalog_lookups: AtomicUsize::new(0),
            alterations: AtomicUsize::new(0),
        }
    }

    /// Drop the keyspace context, as a session opened without one would.
    pub fn without_keyspace(mut self) -> Self {
        self.keyspace = None;
        self
    }

    /// Control when the catalog lists the table.
    pub fn with_catalog_visibility(mut self, visibility: CatalogVisibility) -> Self {
        self.catalog.get_mut().visibility = visibility;
        self
    }

    /// Compaction class the table reports after creation.
    pub fn with_compaction_class(mut self, class: &str) -> Self {
        self.catalog.get_mut().compaction_class = class.to_string();
        self
    }

    /// Number of rows stored for `owner`.
    pub async fn row_count(&self, owner: &OwnerId) -> usize {
        let table = self.table.read().await;
        table.partitions.get(owner).map_or(0, BTreeMap::len)
    }

    /// Number of rows across all owners.
    pub async fn total_rows(&self) -> usize {
        let table = self.table.read().await;
        table.partitions.values().map(BTreeMap::len).sum()
    }

    /// Whether `create_table` has run.
    pub async fn table_exists(&self) -> bool {
        self.table.read().await.created
    }

    /// Compaction class currently applied to the table.
    pub async fn current_compaction(&self) -> String {
        self.catalog.lock().await.compaction_class.clone()
    }

    pub fn upsert_count(&self) -> usize {
        self.upserts.load(Ordering::Relaxed)
    }

    pub fn scan_count(&self) -> usize {
        self.scans.load(Ordering::Relaxed)
    }

    pub fn catalog_lookup_count(&self) -> usize {
        self.catalog_lookups.load(Ordering::Relaxed)
    }

    pub fn alteration_count(&self) -> usize {
        self.alterations.load(Ordering::Relaxed)
    }

    fn unconfigured() -> StoreError {
        StoreError::Statement(format!("unconfigured table {}", TABLE_NAME))
    }
}

impl Default for InMemoryIndexStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IndexStore for InMemoryIndexStore {
    fn keyspace(&self) -> Option<&str> {
        self.keyspace.as_deref()
    }

    async fn create_table(&self) -> StoreResult<()> {
        if self.keyspace.is_none() {
            return Err(StoreError::NoKeyspace);
        }
        let mut table = self.table.write().await;
        table.created = true;
        Ok(())
    }

    async fn upsert(&self, entry: &IndexEntry) -> StoreResult<()> {
        self.upserts.fetch_add(1, Ordering::Relaxed);

        let mut table = self.table.write().await;
        if !table.created {
            return Err(Self::unconfigured());
        }

        let key = (
            entry.keyword.clone(),
            entry.entry_type.code(),
            entry.reference_id.as_str().to_string(),
        );
        table
            .partitions
            .entry(entry.owner_id.clone())
            .or_default()
            .insert(
                key,
                StoredRow {
                    original_text: entry.original_text.clone(),
                    indexed_at: entry.indexed_at,
                },
            );
        Ok(())
    }

    async fn scan_prefix(
        &self,
        owner: &OwnerId,
        prefix: &str,
        limit: usize,
    ) -> StoreResult<Vec<IndexEntry>> {
        self.scans.fetch_add(1, Ordering::Relaxed);

        let table = self.table.read().await;
        if !table.created {
            return Err(Self::unconfigured());
        }

        let Some(partition) = table.partitions.get(owner) else {
            return Ok(Vec::new());
        };

        let start: ClusteringKey = (prefix.to_string(), i32::MIN, String::new());
        partition
            .range(start..)
            .take_while(|((keyword, _, _), _)| keyword.starts_with(prefix))
            .take(limit)
            .map(|((keyword, code, reference), row)| {
                ReferenceId::new(reference.clone())
                    .map_err(|e| StoreError::RowDecode(e.to_string()))
                    .map(|reference_id| IndexEntry {
                        owner_id: owner.clone(),
                        keyword: keyword.clone(),
                        entry_type: EntryType::from_code(*code),
                        reference_id,
                        original_text: row.original_text.clone(),
                        indexed_at: row.indexed_at,
                    })
            })
            .collect()
    }

    async fn compaction_class(&self) -> StoreResult<Option<String>> {
        self.catalog_lookups.fetch_add(1, Ordering::Relaxed);

        if !self.table.read().await.created {
            return Ok(None);
        }

        let mut catalog = self.catalog.lock().await;
        let visible = match catalog.visibility {
            CatalogVisibility::Immediate => true,
            CatalogVisibility::AfterPolls(n) => catalog.misses >= n,
            CatalogVisibility::Never => false,
        };

        if visible {
            Ok(Some(catalog.compaction_class.clone()))
        } else {
            catalog.misses += 1;
            Ok(None)
        }
    }

    async fn set_compaction(&self, class: &str) -> StoreResult<()> {
        self.alterations.fetch_add(1, Ordering::Relaxed);

        if !self.table.read().await.created {
            return Err(Self::unconfigured());
        }
        self.catalog.lock().await.compaction_class = class.to_string();
        Ok(())
    }
}
