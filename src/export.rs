// src/export.rs
//! Batch export: serializes listings plus a validity summary to disk.
//!
//! Pure glue over the pipeline's output — one `{slug}.json` per
//! listing and a `summary.json` flagging which records are missing
//! required content.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::AppError;
use crate::model::Listing;

/// Presence/validity flags for the fields a published listing needs.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequiredFields {
    pub name: bool,
    pub slug: bool,
    pub description: bool,
    pub images: bool,
    pub pricing: bool,
}

impl RequiredFields {
    pub fn check(listing: &Listing) -> Self {
        Self {
            name: !listing.property_name.is_empty(),
            slug: !listing.slug.is_empty(),
            description: !listing.description.is_empty(),
            images: listing.media.images.iter().any(|i| !i.is_placeholder()),
            pricing: listing.pricing.is_valid(),
        }
    }

    pub fn all_present(&self) -> bool {
        self.name && self.slug && self.description && self.images && self.pricing
    }

    /// Human-readable labels of the missing fields, for the CLI report.
    pub fn missing(&self) -> Vec<&'static str> {
        let mut issues = Vec::new();
        if !self.name {
            issues.push("missing name");
        }
        if !self.slug {
            issues.push("missing slug");
        }
        if !self.description {
            issues.push("missing description");
        }
        if !self.images {
            issues.push("no images");
        }
        if !self.pricing {
            issues.push("invalid pricing");
        }
        issues
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingSummary {
    pub name: String,
    pub slug: String,
    pub has_required_fields: RequiredFields,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSummary {
    pub export_date: String,
    pub total_properties: usize,
    pub properties: Vec<ListingSummary>,
}

impl ExportSummary {
    pub fn of(listings: &[Listing]) -> Self {
        Self {
            export_date: chrono::Utc::now().to_rfc3339(),
            total_properties: listings.len(),
            properties: listings
                .iter()
                .map(|listing| ListingSummary {
                    name: listing.property_name.clone(),
                    slug: listing.slug.clone(),
                    has_required_fields: RequiredFields::check(listing),
                })
                .collect(),
        }
    }
}

/// Where the export landed, for reporting.
#[derive(Debug)]
pub struct ExportReport {
    pub output_dir: PathBuf,
    pub files_written: usize,
    pub summary: ExportSummary,
}

/// Writes one pretty-printed JSON file per listing plus `summary.json`.
pub async fn export_listings(listings: &[Listing], output_dir: &Path) -> Result<ExportReport, AppError> {
    tokio::fs::create_dir_all(output_dir).await?;

    let mut files_written = 0;
    for listing in listings {
        let path = output_dir.join(format!("{}.json", listing.slug));
        let json = serde_json::to_string_pretty(listing)?;
        tokio::fs::write(&path, json)
            .await
            .map_err(|e| AppError::ExportFailed {
                path: path.clone(),
                cause: e.to_string(),
            })?;
        files_written += 1;
        log::debug!("Exported {}", path.display());
    }

    let summary = ExportSummary::of(listings);
    let summary_path = output_dir.join("summary.json");
    let json = serde_json::to_string_pretty(&summary)?;
    tokio::fs::write(&summary_path, json)
        .await
        .map_err(|e| AppError::ExportFailed {
            path: summary_path,
            cause: e.to_string(),
        })?;

    Ok(ExportReport {
        output_dir: output_dir.to_path_buf(),
        files_written,
        summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn fallback_record_reports_its_gaps() {
        let listing = Listing::fallback("x");
        let flags = RequiredFields::check(&listing);
        assert!(flags.name);
        assert!(flags.slug);
        assert!(flags.pricing);
        // All fallback images are placeholders.
        assert!(!flags.images);
        assert!(!flags.all_present());
        assert_eq!(flags.missing(), vec!["no images"]);
    }

    #[tokio::test]
    async fn export_writes_one_file_per_listing_plus_summary() {
        let unique = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        let dir = std::env::temp_dir().join(format!("notion_estates_export_{}", unique));

        let listings = vec![Listing::fallback("a"), {
            let mut b = Listing::fallback("b");
            b.slug = "second-property".to_string();
            b
        }];
        let report = export_listings(&listings, &dir).await.unwrap();

        assert_eq!(report.files_written, 2);
        assert!(dir.join("fallback-property.json").exists());
        assert!(dir.join("second-property.json").exists());
        assert!(dir.join("summary.json").exists());
        assert_eq!(report.summary.total_properties, 2);

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }
}
