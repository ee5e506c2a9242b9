use async_trait::async_trait;
use fuzzy_index_server::domain::OwnerId;
use fuzzy_index_server::error::{StoreError, StoreResult};
use fuzzy_index_server::models::IndexEntry;
use fuzzy_index_server::storage::{InMemoryIndexStore, IndexStore};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct FailurePlan {
    upserts_allowed: Option<usize>,
    failing_prefixes: HashSet<String>,
    create_table: bool,
    catalog: bool,
    set_compaction: bool,
}

/// Mock index store for testing.
///
/// Delegates to an [`InMemoryIndexStore`] and can be told to fail specific
/// operations. Tracks method calls for verification.
#[allow(dead_code)]
pub struct MockIndexStore {
    inner: InMemoryIndexStore,
    plan: Arc<Mutex<FailurePlan>>,
    call_counts: Arc<Mutex<HashMap<String, usize>>>,
}

#[allow(dead_code)]
impl MockIndexStore {
    /// Create a mock over a fresh in-memory store.
    pub fn new() -> Self {
        Self::wrapping(InMemoryIndexStore::new())
    }

    /// Create a mock over a preconfigured in-memory store.
    pub fn wrapping(inner: InMemoryIndexStore) -> Self {
        Self {
            inner,
            plan: Arc::new(Mutex::new(FailurePlan::default())),
            call_counts: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Let `n` upserts through, then fail every one after.
    pub fn fail_upserts_after(&self, n: usize) {
        self.plan.lock().unwrap().upserts_allowed = Some(n);
    }

    /// Fail scans for exactly this prefix.
    pub fn fail_scan_for(&self, prefix: &str) {
        self.plan
            .lock()
            .unwrap()
            .failing_prefixes
            .insert(prefix.to_string());
    }

    pub fn fail_create_table(&self) {
        self.plan.lock().unwrap().create_table = true;
    }

    pub fn fail_catalog(&self) {
        self.plan.lock().unwrap().catalog = true;
    }

    pub fn fail_set_compaction(&self) {
        self.plan.lock().unwrap().set_compaction = true;
    }

    /// The wrapped store, for inspecting what was written.
    pub fn inner(&self) -> &InMemoryIndexStore {
        &self.inner
    }

    /// Get the number of times a method was called.
    pub fn get_call_count(&self, method: &str) -> usize {
        let counts = self.call_counts.lock().unwrap();
        *counts.get(method).unwrap_or(&0)
    }

    fn track_call(&self, method: &str) -> usize {
        let mut counts = self.call_counts.lock().unwrap();
        let count = counts.entry(method.to_string()).or_insert(0);
        *count += 1;
        *count
    }

    fn injected(operation: &str) -> StoreError {
        StoreError::Statement(format!("injected {} failure", operation))
    }
}

impl Default for MockIndexStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IndexStore for MockIndexStore {
    fn keyspace(&self) -> Option<&str> {
        self.inner.keyspace()
    }

    async fn create_table(&self) -> StoreResult<()> {
        self.track_call("create_table");
        if self.plan.lock().unwrap().create_table {
            return Err(Self::injected("create_table"));
        }
        self.inner.create_table().await
    }

    async fn upsert(&self, entry: &IndexEntry) -> StoreResult<()> {
        let attempt = self.track_call("upsert");
        let allowed = self.plan.lock().unwrap().upserts_allowed;
        if allowed.is_some_and(|n| attempt > n) {
            return Err(Self::injected("upsert"));
        }
        self.inner.upsert(entry).await
    }

    async fn scan_prefix(
        &self,
        owner: &OwnerId,
        prefix: &str,
        limit: usize,
    ) -> StoreResult<Vec<IndexEntry>> {
        self.track_call("scan_prefix");
        if self.plan.lock().unwrap().failing_prefixes.contains(prefix) {
            return Err(Self::injected("scan_prefix"));
        }
        self.inner.scan_prefix(owner, prefix, limit).await
    }

    async fn compaction_class(&self) -> StoreResult<Option<String>> {
        self.track_call("compaction_class");
        if self.plan.lock().unwrap().catalog {
            return Err(Self::injected("compaction_class"));
        }
        self.inner.compaction_class().await
    }

    async fn set_compaction(&self, class: &str) -> StoreResult<()> {
        self.track_call("set_compaction");
        if self.plan.lock().unwrap().set_compaction {
            return Err(Self::injected("set_compaction"));
        }
        self.inner.set_compaction(class).await
    }
}
