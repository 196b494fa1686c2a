// src/api/query.rs
//! Typed query vocabulary for database queries.
//!
//! The pipeline only ever needs two filter shapes — exact rich-text
//! equality and relation membership — so those are encoded as a closed
//! enum rather than exposing Notion's full filter grammar.

use serde_json::{json, Value};

use crate::types::PageId;

/// A filter restricting which rows a query returns.
#[derive(Debug, Clone)]
pub enum RowFilter {
    /// Rows whose rich-text field equals `value` exactly.
    RichTextEquals { property: String, value: String },
    /// Rows whose relation field contains the given record id.
    RelationContains { property: String, id: PageId },
}

impl RowFilter {
    fn to_json(&self) -> Value {
        match self {
            RowFilter::RichTextEquals { property, value } => json!({
                "property": property,
                "rich_text": { "equals": value },
            }),
            RowFilter::RelationContains { property, id } => json!({
                "property": property,
                "relation": { "contains": id.to_hyphenated() },
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    fn as_str(self) -> &'static str {
        match self {
            SortDirection::Ascending => "ascending",
            SortDirection::Descending => "descending",
        }
    }
}

/// An ordering applied to query results.
#[derive(Debug, Clone)]
pub struct SortSpec {
    pub property: String,
    pub direction: SortDirection,
}

/// A complete query: optional filter plus orderings.
#[derive(Debug, Clone, Default)]
pub struct RowQuery {
    pub filter: Option<RowFilter>,
    pub sorts: Vec<SortSpec>,
}

impl RowQuery {
    /// A query matching every row in the collection.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn filtered(filter: RowFilter) -> Self {
        Self {
            filter: Some(filter),
            ..Self::default()
        }
    }

    pub fn sorted_by(mut self, property: impl Into<String>, direction: SortDirection) -> Self {
        self.sorts.push(SortSpec {
            property: property.into(),
            direction,
        });
        self
    }

    /// Serializes this query into a Notion `databases/{id}/query` body
    /// for one page of results.
    pub fn to_body(&self, page_size: u32, cursor: Option<&str>) -> Value {
        let mut body = json!({ "page_size": page_size });
        if let Some(filter) = &self.filter {
            body["filter"] = filter.to_json();
        }
        if !self.sorts.is_empty() {
            body["sorts"] = Value::Array(
                self.sorts
                    .iter()
                    .map(|s| {
                        json!({
                            "property": s.property,
                            "direction": s.direction.as_str(),
                        })
                    })
                    .collect(),
            );
        }
        if let Some(cursor) = cursor {
            body["start_cursor"] = json!(cursor);
        }
        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn relation_filter_uses_hyphenated_id() {
        let id = PageId::parse("11111111222233334444555555555555").unwrap();
        let query = RowQuery::filtered(RowFilter::RelationContains {
            property: "Property".to_string(),
            id,
        });
        let body = query.to_body(100, None);
        assert_eq!(
            body["filter"]["relation"]["contains"],
            "11111111-2222-3333-4444-555555555555"
        );
        assert_eq!(body["page_size"], 100);
    }

    #[test]
    fn slug_filter_and_sorts_serialize() {
        let query = RowQuery::filtered(RowFilter::RichTextEquals {
            property: "Slug".to_string(),
            value: "torre-reforma".to_string(),
        })
        .sorted_by("Created", SortDirection::Descending);
        let body = query.to_body(50, Some("cursor-1"));
        assert_eq!(body["filter"]["rich_text"]["equals"], "torre-reforma");
        assert_eq!(body["sorts"][0]["direction"], "descending");
        assert_eq!(body["start_cursor"], "cursor-1");
    }
}
