//! MCP tool handlers for the fuzzy index server.
//!
//! This module implements the MCP tools using the rmcp SDK's tool_router pattern.

use crate::error::ServiceError;
use crate::services::{IndexTextParams, SearchService};
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::*;
use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use schemars::JsonSchema;
use serde::Deserialize;
use std::borrow::Cow;
use std::sync::Arc;

/// MCP server exposing per-owner fuzzy text indexing and search.
#[derive(Clone)]
pub struct FuzzyIndexServer {
    search_service: Arc<dyn SearchService>,
    tool_router: ToolRouter<Self>,
}

#[tool_handler]
impl ServerHandler for FuzzyIndexServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities {
                tools: Some(Default::default()),
                ..Default::default()
            },
            server_info: Implementation {
                name: "fuzzy-index-server".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                icons: None,
                title: None,
                website_url: None,
            },
            instructions: Some("Per-owner fuzzy text index - index short texts under a reference id, then search them with typo- and plural-tolerant queries.".into()),
        }
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
struct IndexTextToolParams {
    owner_id: String,
    text: String,
    reference_id: String,
    #[serde(default)]
    entry_type: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct SearchIndexToolParams {
    owner_id: String,
    query: String,
}

// Rejected requests are the caller's fault; everything else is ours
fn to_mcp_error(e: ServiceError) -> McpError {
    let code = match e {
        ServiceError::InvalidRequest(_) | ServiceError::RateLimitExceeded { .. } => {
            ErrorCode::INVALID_PARAMS
        }
        ServiceError::Index(_) => ErrorCode::INTERNAL_ERROR,
    };
    McpError {
        code,
        message: Cow::from(e.to_string()),
        data: None,
    }
}

fn json_error(e: serde_json::Error) -> McpError {
    McpError {
        code: ErrorCode::INTERNAL_ERROR,
        message: Cow::from(e.to_string()),
        data: None,
    }
}

#[tool_router]
impl FuzzyIndexServer {
    pub fn new(search_service: Arc<dyn SearchService>) -> Self {
        Self {
            search_service,
            tool_router: Self::tool_router(),
        }
    }

    /// Index a piece of text for an owner.
    #[tool(
        description = "Index a short text (a name, title or phrase) for an owner under a reference id. Every word becomes searchable; indexing the same text and reference again is harmless. entry_type is one of contact, conversation, document or unknown."
    )]
    async fn index_text(
        &self,
        params: Parameters<IndexTextToolParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;
        let reference_id = params.reference_id.clone();

        let rows = self
            .search_service
            .index_text(IndexTextParams {
                owner_id: params.owner_id,
                text: params.text,
                reference_id: params.reference_id,
                entry_type: params.entry_type,
            })
            .await
            .map_err(to_mcp_error)?;

        let response = serde_json::json!({
            "reference_id": reference_id,
            "keywords_indexed": rows,
        });

        Ok(CallToolResult::success(vec![Content::text(
            serde_json::to_string_pretty(&response).map_err(json_error)?,
        )]))
    }

    /// Search an owner's index.
    #[tool(
        description = "Search an owner's indexed texts. Each query word matches indexed words it is a prefix of; results are ranked by edit distance to the whole query, closest first. A document matching through several words appears once per matching word."
    )]
    async fn search_index(
        &self,
        params: Parameters<SearchIndexToolParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;

        let hits = self
            .search_service
            .search(&params.owner_id, &params.query)
            .await
            .map_err(to_mcp_error)?;

        let response = serde_json::json!({
            "query": params.query,
            "result_count": hits.len(),
            "results": hits,
        });

        Ok(CallToolResult::success(vec![Content::text(
            serde_json::to_string_pretty(&response).map_err(json_error)?,
        )]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IndexError;
    use crate::error::StoreError;

    #[test]
    fn test_error_codes() {
        let invalid = to_mcp_error(ServiceError::InvalidRequest("bad".to_string()));
        assert_eq!(invalid.code, ErrorCode::INVALID_PARAMS);

        let limited = to_mcp_error(ServiceError::RateLimitExceeded {
            retry_after_secs: 3,
        });
        assert_eq!(limited.code, ErrorCode::INVALID_PARAMS);
        assert!(limited.message.contains("3s"));

        let storage = to_mcp_error(ServiceError::Index(IndexError::StorageUnavailable(
            StoreError::Statement("timeout".to_string()),
        )));
        assert_eq!(storage.code, ErrorCode::INTERNAL_ERROR);
    }
}
