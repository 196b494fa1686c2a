//! Shared test harness: an in-memory listing store and row builders.
#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::json;

use notion_estates::{
    AppError, DatabaseId, DatabaseIds, ImageMirror, ListingStore, Row, RowFilter, RowQuery,
};

pub const PROPERTIES_DB: &str = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
pub const AMENITIES_DB: &str = "bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";
pub const NEARBY_DB: &str = "cccccccccccccccccccccccccccccccc";
pub const SCENES_DB: &str = "dddddddddddddddddddddddddddddddd";

pub fn database_ids() -> DatabaseIds {
    DatabaseIds {
        properties: DatabaseId::parse(PROPERTIES_DB).unwrap(),
        amenities: DatabaseId::parse(AMENITIES_DB).unwrap(),
        nearby_locations: DatabaseId::parse(NEARBY_DB).unwrap(),
        virtual_tour_scenes: DatabaseId::parse(SCENES_DB).unwrap(),
    }
}

/// An in-memory store that counts queries per database.
#[derive(Default)]
pub struct MockStore {
    rows: HashMap<String, Vec<Row>>,
    failing: Vec<String>,
    counts: Mutex<HashMap<String, usize>>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(mut self, database: &str, rows: Vec<Row>) -> Self {
        self.rows.insert(database.to_string(), rows);
        self
    }

    /// Makes every query against `database` fail.
    pub fn with_failure(mut self, database: &str) -> Self {
        self.failing.push(database.to_string());
        self
    }

    pub fn query_count(&self, database: &str) -> usize {
        self.counts
            .lock()
            .unwrap()
            .get(database)
            .copied()
            .unwrap_or(0)
    }
}

#[async_trait]
impl ListingStore for MockStore {
    async fn query_rows(
        &self,
        database: &DatabaseId,
        query: &RowQuery,
    ) -> Result<Vec<Row>, AppError> {
        let key = database.as_str().to_string();
        *self.counts.lock().unwrap().entry(key.clone()).or_insert(0) += 1;

        if self.failing.contains(&key) {
            return Err(AppError::RemoteQuery {
                collection: key,
                cause: "simulated outage".to_string(),
            });
        }

        let rows = self.rows.get(&key).cloned().unwrap_or_default();
        Ok(match &query.filter {
            None => rows,
            Some(RowFilter::RichTextEquals { property, value }) => rows
                .into_iter()
                .filter(|row| &row.plain_text(property) == value)
                .collect(),
            Some(RowFilter::RelationContains { property, id }) => rows
                .into_iter()
                .filter(|row| row.relation_ids(property).contains(id))
                .collect(),
        })
    }
}

/// A parent row with a title, slug, and nothing else that would touch
/// the network.
pub fn parent_row(id_hex32: &str, name: &str, slug: &str) -> Row {
    serde_json::from_value(json!({
        "id": hyphenate(id_hex32),
        "properties": {
            "Name": {"id": "t", "type": "title", "title": [{"plain_text": name}]},
            "Slug": {"id": "s", "type": "rich_text", "rich_text": [{"plain_text": slug}]},
        }
    }))
    .unwrap()
}

pub fn row_from_value(value: serde_json::Value) -> Row {
    serde_json::from_value(value).unwrap()
}

pub fn hyphenate(hex32: &str) -> String {
    format!(
        "{}-{}-{}-{}-{}",
        &hex32[0..8],
        &hex32[8..12],
        &hex32[12..16],
        &hex32[16..20],
        &hex32[20..32]
    )
}

/// An image mirror rooted in a unique temp directory.
pub async fn temp_mirror(tag: &str) -> (ImageMirror, PathBuf) {
    let unique = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let dir = std::env::temp_dir().join(format!("notion_estates_it_{}_{}", tag, unique));
    let mirror = ImageMirror::new(&dir, 4).await.unwrap();
    (mirror, dir)
}
