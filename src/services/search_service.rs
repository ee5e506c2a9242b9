//! Search service layer.
//!
//! Validates requests, applies the per-owner rate limit, records metrics and
//! hands off to the index writer and query engine.

use crate::config::Config;
use crate::domain::{EntryType, OwnerId, ReferenceId};
use crate::error::{ServiceError, ServiceResult};
use crate::models::QueryHit;
use crate::observability::{MetricsTracker, Timer};
use crate::ratelimit::{RateDecision, RateLimiter, SystemClock};
use crate::search::{IndexWriter, QueryEngine};
use crate::storage::IndexStore;
use async_trait::async_trait;
use std::sync::Arc;

const MAX_QUERY_CHARS: usize = 500;
const MAX_TEXT_CHARS: usize = 4000;

/// Parameters for indexing one piece of text.
#[derive(Debug, Clone, Default)]
pub struct IndexTextParams {
    pub owner_id: String,
    pub text: String,
    pub reference_id: String,
    /// Entry type name; `None` or empty means unknown
    pub entry_type: Option<String>,
}

/// Search service trait for index operations.
#[async_trait]
pub trait SearchService: Send + Sync {
    /// Index `params.text` for its owner. Returns the number of rows written.
    async fn index_text(&self, params: IndexTextParams) -> ServiceResult<usize>;

    /// Search one owner's index.
    async fn search(&self, owner_id: &str, query: &str) -> ServiceResult<Vec<QueryHit>>;
}

/// Default implementation of SearchService.
pub struct SearchServiceImpl {
    writer: IndexWriter,
    engine: QueryEngine,
    limiter: Arc<RateLimiter>,
    metrics: MetricsTracker,
}

/// Validation helper functions.
impl SearchServiceImpl {
    fn validate_owner(owner_id: &str) -> ServiceResult<OwnerId> {
        OwnerId::new(owner_id)
            .map_err(|_| ServiceError::InvalidRequest("Owner ID cannot be empty".to_string()))
    }

    fn validate_reference(reference_id: &str) -> ServiceResult<ReferenceId> {
        ReferenceId::new(reference_id)
            .map_err(|_| ServiceError::InvalidRequest("Reference ID cannot be empty".to_string()))
    }

    fn validate_text(text: &str) -> ServiceResult<()> {
        if text.trim().is_empty() {
            return Err(ServiceError::InvalidRequest(
                "Text cannot be empty".to_string(),
            ));
        }
        if text.chars().count() > MAX_TEXT_CHARS {
            return Err(ServiceError::InvalidRequest(format!(
                "Text too long (max {} characters)",
                MAX_TEXT_CHARS
            )));
        }
        Ok(())
    }

    fn validate_query(query: &str) -> ServiceResult<()> {
        if query.chars().count() > MAX_QUERY_CHARS {
            return Err(ServiceError::InvalidRequest(format!(
                "Search query too long (max {} characters)",
                MAX_QUERY_CHARS
            )));
        }
        Ok(())
    }

    fn parse_entry_type(raw: Option<&str>) -> ServiceResult<EntryType> {
        raw.unwrap_or_default()
            .parse::<EntryType>()
            .map_err(|e| ServiceError::InvalidRequest(e.to_string()))
    }
}

impl SearchServiceImpl {
    pub fn new(
        writer: IndexWriter,
        engine: QueryEngine,
        limiter: Arc<RateLimiter>,
        metrics: MetricsTracker,
    ) -> Self {
        Self {
            writer,
            engine,
            limiter,
            metrics,
        }
    }

    /// Wire a writer, engine and wall-clock limiter over `store` from configuration.
    pub fn from_config(store: Arc<dyn IndexStore>, config: &Config, metrics: MetricsTracker) -> Self {
        let writer = IndexWriter::new(store.clone(), config.write_concurrency);
        let engine = QueryEngine::new(store, config.max_query_results);
        let limiter = Arc::new(RateLimiter::new(
            config.rate_limit_per_minute,
            Arc::new(SystemClock),
        ));
        Self::new(writer, engine, limiter, metrics)
    }

    async fn admit(&self, owner: &OwnerId) -> ServiceResult<()> {
        match self.limiter.check(owner.as_str()).await {
            RateDecision::Allowed { .. } => Ok(()),
            RateDecision::Limited { retry_after } => {
                self.metrics.track_rate_limited(owner.as_str());
                // Round up so a client never retries before the window opens
                let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
                Err(ServiceError::RateLimitExceeded {
                    retry_after_secs: secs.max(1),
                })
            }
        }
    }
}

#[async_trait]
impl SearchService for SearchServiceImpl {
    async fn index_text(&self, params: IndexTextParams) -> ServiceResult<usize> {
        let owner = Self::validate_owner(&params.owner_id)?;
        let reference = Self::validate_reference(&params.reference_id)?;
        Self::validate_text(&params.text)?;
        let entry_type = Self::parse_entry_type(params.entry_type.as_deref())?;

        self.admit(&owner).await?;

        let timer = Timer::new("index_text");
        match self
            .writer
            .add_entry(&owner, &params.text, &reference, entry_type)
            .await
        {
            Ok(rows) => {
                self.metrics.track_ingest(rows, timer.finish_with_status(true));
                Ok(rows)
            }
            Err(e) => {
                timer.finish_with_status(false);
                self.metrics.track_storage_error("index_text");
                Err(e.into())
            }
        }
    }

    async fn search(&self, owner_id: &str, query: &str) -> ServiceResult<Vec<QueryHit>> {
        let owner = Self::validate_owner(owner_id)?;
        Self::validate_query(query)?;

        self.admit(&owner).await?;

        let timer = Timer::new("search_index");
        match self.engine.search_counted(&owner, query).await {
            Ok((hits, scanned)) => {
                self.metrics.track_candidates(scanned);
                self.metrics
                    .track_search(timer.finish_with_status(true), hits.len());
                Ok(hits)
            }
            Err(e) => {
                timer.finish_with_status(false);
                self.metrics.track_storage_error("search_index");
                Err(e.into())
            }
        }
    }
}
