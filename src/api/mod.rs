// src/api/mod.rs
//! Notion API interaction — the ability to query listing collections.
//!
//! The pipeline depends only on the [`ListingStore`] trait: "query a
//! named collection with a filter/sort, get back property-bag rows."
//! HTTP details stay behind this seam.

pub mod client;
pub mod parser;
pub mod query;

use crate::constants::NOTION_API_PAGE_SIZE;
use crate::error::AppError;
use crate::model::Row;
use crate::types::DatabaseId;

pub use client::{extract_response_text, ApiResponse, NotionHttpClient};
pub use query::{RowFilter, RowQuery, SortDirection, SortSpec};

/// The ability to query rows from a remote listing collection.
///
/// Business logic depends on this trait, never on HTTP details, which
/// also makes the pipeline testable against an in-memory store.
#[async_trait::async_trait]
pub trait ListingStore: Send + Sync {
    async fn query_rows(
        &self,
        database: &DatabaseId,
        query: &RowQuery,
    ) -> Result<Vec<Row>, AppError>;
}

#[async_trait::async_trait]
impl ListingStore for NotionHttpClient {
    /// Queries a database, following pagination cursors until
    /// exhaustion, and returns all rows in query order.
    async fn query_rows(
        &self,
        database: &DatabaseId,
        query: &RowQuery,
    ) -> Result<Vec<Row>, AppError> {
        let endpoint = format!("databases/{}/query", database.to_hyphenated());
        let mut all_rows = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let body = query.to_body(NOTION_API_PAGE_SIZE, cursor.as_deref());
            let response = self.post(&endpoint, &body).await?;
            let text = extract_response_text(response).await?;
            let page = parser::parse_query_response(text)?;

            let has_more = page.has_more;
            cursor = page.next_cursor;
            all_rows.extend(page.rows);

            if !has_more || cursor.is_none() {
                break;
            }
        }

        Ok(all_rows)
    }
}
