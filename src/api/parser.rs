// src/api/parser.rs
//! Query-response parsing with graceful per-row degradation.
//!
//! Success bodies are decoded into a pagination envelope whose rows are
//! parsed one at a time — a single undecodable row is logged and
//! dropped rather than failing the whole response. Error bodies are
//! mapped into the typed [`RemoteErrorCode`] vocabulary.

use serde::Deserialize;
use serde_json::Value;

use super::client::ApiResponse;
use crate::error::{AppError, RemoteErrorCode};
use crate::model::Row;

/// One page of query results.
#[derive(Debug)]
pub struct RowPage {
    pub rows: Vec<Row>,
    pub next_cursor: Option<String>,
    pub has_more: bool,
}

#[derive(Debug, Deserialize)]
struct QueryEnvelope {
    #[serde(default)]
    results: Vec<Value>,
    #[serde(default)]
    next_cursor: Option<String>,
    #[serde(default)]
    has_more: bool,
}

/// The Notion API error body shape.
#[derive(Debug, Deserialize)]
struct RemoteErrorBody {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

/// Parses one page of a database query response.
pub fn parse_query_response(result: ApiResponse<String>) -> Result<RowPage, AppError> {
    if !result.status.is_success() {
        return Err(parse_error_response(&result));
    }

    let envelope: QueryEnvelope = serde_json::from_str(&result.data).map_err(|e| {
        log::error!("Failed to parse query response from {}: {}", result.url, e);
        AppError::MalformedResponse(e.to_string())
    })?;

    let rows = envelope
        .results
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<Row>(value) {
            Ok(row) => Some(row),
            Err(e) => {
                log::warn!("Dropping undecodable row from {}: {}", result.url, e);
                None
            }
        })
        .collect();

    Ok(RowPage {
        rows,
        next_cursor: envelope.next_cursor,
        has_more: envelope.has_more,
    })
}

fn parse_error_response(result: &ApiResponse<String>) -> AppError {
    if let Ok(body) = serde_json::from_str::<RemoteErrorBody>(&result.data) {
        if !body.code.is_empty() {
            return AppError::RemoteService {
                code: RemoteErrorCode::from_api_response(&body.code),
                message: body.message,
                status: result.status,
            };
        }
    }

    AppError::RemoteService {
        code: RemoteErrorCode::from_http_status(result.status.as_u16()),
        message: format!("HTTP {} from {}", result.status, result.url),
        status: result.status,
    }
}
