use super::schema::{self, TABLE_NAME};
use super::IndexStore;
use crate::config::Config;
use crate::domain::{EntryType, OwnerId, ReferenceId};
use crate::error::{StoreError, StoreResult};
use crate::models::IndexEntry;
use async_trait::async_trait;
use scylla::prepared_statement::PreparedStatement;
use scylla::{Session, SessionBuilder};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::OnceCell;

/// Row shape returned by the prefix scan.
type ScanRow = (String, String, i32, String, Option<String>, Option<i64>);

/// [`IndexStore`] backed by a CQL cluster through the `scylla` driver.
///
/// The session is long-lived and shared by every ingest and query task; the
/// driver multiplexes concurrent statements over its connection pool.
///
/// The hot-path insert and scan are prepared once, on first use. They cannot
/// be prepared at connect time because the table is only created afterwards
/// by the startup migration.
pub struct CqlIndexStore {
    session: Session,
    keyspace: String,
    insert_cql: String,
    scan_cql: String,
    insert: OnceCell<PreparedStatement>,
    scan: OnceCell<PreparedStatement>,
}

impl CqlIndexStore {
    /// Connect to the cluster and make sure the keyspace exists.
    pub async fn connect(config: &Config) -> StoreResult<Self> {
        let mut builder = SessionBuilder::new()
            .known_nodes(&config.contact_points)
            .connection_timeout(Duration::from_secs(config.connect_timeout));

        if let (Some(user), Some(password)) = (&config.username, &config.password) {
            builder = builder.user(user.as_str(), password.as_str());
        }

        let session = builder
            .build()
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        tracing::info!(
            contact_points = ?config.contact_points,
            keyspace = %config.keyspace,
            "Connected to storage cluster"
        );

        session
            .query(
                schema::create_keyspace_cql(&config.keyspace, config.replication_factor),
                (),
            )
            .await
            .map_err(statement_error)?;

        Ok(Self {
            session,
            insert_cql: schema::insert_cql(&config.keyspace),
            scan_cql: schema::prefix_scan_cql(&config.keyspace),
            keyspace: config.keyspace.clone(),
            insert: OnceCell::new(),
            scan: OnceCell::new(),
        })
    }

    /// Prepared statement held in `cell`, preparing `cql` on the first call.
    ///
    /// A failed prepare leaves the cell empty so the next call retries.
    async fn prepared<'a>(
        &self,
        cell: &'a OnceCell<PreparedStatement>,
        cql: &str,
    ) -> StoreResult<&'a PreparedStatement> {
        cell.get_or_try_init(|| async {
            tracing::debug!(cql = %cql, "Preparing statement");
            self.session.prepare(cql).await.map_err(statement_error)
        })
        .await
    }
}

fn statement_error(e: impl std::fmt::Display) -> StoreError {
    StoreError::Statement(e.to_string())
}

fn decode_error(e: impl std::fmt::Display) -> StoreError {
    StoreError::RowDecode(e.to_string())
}

#[async_trait]
impl IndexStore for CqlIndexStore {
    fn keyspace(&self) -> Option<&str> {
        Some(&self.keyspace)
    }

    async fn create_table(&self) -> StoreResult<()> {
        self.session
            .query(schema::create_table_cql(&self.keyspace), ())
            .await
            .map_err(statement_error)?;
        Ok(())
    }

    async fn upsert(&self, entry: &IndexEntry) -> StoreResult<()> {
        let insert = self.prepared(&self.insert, &self.insert_cql).await?;
        self.session
            .execute(
                insert,
                (
                    entry.owner_id.as_str(),
                    entry.keyword.as_str(),
                    entry.entry_type.code(),
                    entry.reference_id.as_str(),
                    entry.original_text.as_str(),
                    entry.indexed_at,
                ),
            )
            .await
            .map_err(statement_error)?;
        Ok(())
    }

    async fn scan_prefix(
        &self,
        owner: &OwnerId,
        prefix: &str,
        limit: usize,
    ) -> StoreResult<Vec<IndexEntry>> {
        let upper = schema::prefix_upper_bound(prefix);
        let limit = i32::try_from(limit).unwrap_or(i32::MAX);
        let scan = self.prepared(&self.scan, &self.scan_cql).await?;

        let result = self
            .session
            .execute(
                scan,
                (owner.as_str(), prefix, upper.as_str(), limit),
            )
            .await
            .map_err(statement_error)?;

        let rows = result.rows_typed::<ScanRow>().map_err(decode_error)?;

        let mut entries = Vec::new();
        for row in rows {
            let (owner_id, keyword, entry_type, reference_id, original_text, indexed_at) =
                row.map_err(decode_error)?;
            entries.push(IndexEntry {
                owner_id: OwnerId::new(owner_id).map_err(decode_error)?,
                keyword,
                entry_type: EntryType::from_code(entry_type),
                reference_id: ReferenceId::new(reference_id).map_err(decode_error)?,
                original_text: original_text.unwrap_or_default(),
                indexed_at: indexed_at.unwrap_or_default(),
            });
        }

        Ok(entries)
    }

    async fn compaction_class(&self) -> StoreResult<Option<String>> {
        let result = self
            .session
            .query(
                schema::COMPACTION_LOOKUP_CQL,
                (self.keyspace.as_str(), TABLE_NAME),
            )
            .await
            .map_err(statement_error)?;

        let mut rows = result
            .rows_typed::<(Option<HashMap<String, String>>,)>()
            .map_err(decode_error)?;

        match rows.next() {
            Some(row) => {
                let (compaction,) = row.map_err(decode_error)?;
                let class = compaction
                    .and_then(|options| options.get("class").cloned())
                    .unwrap_or_default();
                Ok(Some(class))
            }
            None => Ok(None),
        }
    }

    async fn set_compaction(&self, class: &str) -> StoreResult<()> {
        self.session
            .query(schema::alter_compaction_cql(&self.keyspace, class), ())
            .await
            .map_err(statement_error)?;
        Ok(())
    }
}
