//! Physical layout of the inverted index and schema provisioning.
//!
//! ```text
//! search_index
//!   owner_id       text     -- partition key
//!   keyword        text     -- clustering, ASC
//!   entry_type     int      -- clustering, ASC
//!   reference_id   text     -- clustering, ASC
//!   original_text  text
//!   indexed_at     bigint   -- epoch millis of last write
//! ```

use super::IndexStore;
use crate::error::{IndexError, IndexResult};

/// Name of the index table.
pub const TABLE_NAME: &str = "search_index";

/// Maximum rows returned by one prefix scan.
pub const SCAN_LIMIT: usize = 1000;

/// Fully qualified class of the compaction strategy the table should use.
pub const LEVELED_COMPACTION: &str = "org.apache.cassandra.db.compaction.LeveledCompactionStrategy";

/// True if a catalog compaction class names the leveled strategy.
///
/// The catalog may report either the short or the fully qualified class name.
pub fn is_leveled(class: &str) -> bool {
    class
        .rsplit('.')
        .next()
        .is_some_and(|short| short == "LeveledCompactionStrategy")
}

/// `CREATE KEYSPACE IF NOT EXISTS` for a simple-strategy keyspace.
pub fn create_keyspace_cql(keyspace: &str, replication_factor: u32) -> String {
    format!(
        "CREATE KEYSPACE IF NOT EXISTS {} WITH replication = \
         {{'class': 'SimpleStrategy', 'replication_factor': {}}}",
        keyspace, replication_factor
    )
}

/// `CREATE TABLE IF NOT EXISTS` for the index table.
pub fn create_table_cql(keyspace: &str) -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {}.{} (\
         owner_id text, \
         keyword text, \
         entry_type int, \
         reference_id text, \
         original_text text, \
         indexed_at bigint, \
         PRIMARY KEY ((owner_id), keyword, entry_type, reference_id)\
         ) WITH CLUSTERING ORDER BY (keyword ASC, entry_type ASC, reference_id ASC)",
        keyspace, TABLE_NAME
    )
}

/// Upsert of one row; CQL `INSERT` overwrites an existing row with the same key.
pub fn insert_cql(keyspace: &str) -> String {
    format!(
        "INSERT INTO {}.{} \
         (owner_id, keyword, entry_type, reference_id, original_text, indexed_at) \
         VALUES (?, ?, ?, ?, ?, ?)",
        keyspace, TABLE_NAME
    )
}

/// Clustering range scan bounded by `[prefix, prefix_upper_bound(prefix))`.
pub fn prefix_scan_cql(keyspace: &str) -> String {
    format!(
        "SELECT owner_id, keyword, entry_type, reference_id, original_text, indexed_at \
         FROM {}.{} WHERE owner_id = ? AND keyword >= ? AND keyword < ? LIMIT ?",
        keyspace, TABLE_NAME
    )
}

/// Catalog lookup of the table's compaction options.
pub const COMPACTION_LOOKUP_CQL: &str =
    "SELECT compaction FROM system_schema.tables WHERE keyspace_name = ? AND table_name = ?";

/// Schema alteration switching the table's compaction class.
pub fn alter_compaction_cql(keyspace: &str, class: &str) -> String {
    format!(
        "ALTER TABLE {}.{} WITH compaction = {{'class': '{}'}}",
        keyspace, TABLE_NAME, class
    )
}

/// Exclusive upper bound of the keyword range that starts with `prefix`.
///
/// Appending the highest code point sorts after every string that extends
/// `prefix` by a valid character.
pub fn prefix_upper_bound(prefix: &str) -> String {
    let mut upper = String::with_capacity(prefix.len() + 4);
    upper.push_str(prefix);
    upper.push(char::MAX);
    upper
}

/// Make sure the index table exists.
///
/// Meant to run once at startup. Safe to call repeatedly. Failure is fatal
/// and is not retried.
pub async fn ensure_schema(store: &dyn IndexStore) -> IndexResult<()> {
    match store.create_table().await {
        Ok(()) => {
            tracing::info!(table = TABLE_NAME, "Search index table ready");
            Ok(())
        }
        Err(e) => {
            tracing::error!(table = TABLE_NAME, error = %e, "Failed to create search index table");
            Err(IndexError::SchemaUnavailable(e))
        }
    }
}
