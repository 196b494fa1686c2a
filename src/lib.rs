// src/lib.rs
//! notion-estates library — fetches real-estate listings and their
//! child records from Notion databases, normalizes their loosely-typed
//! property bags into a fixed record shape, mirrors referenced images
//! to local storage, and memoizes everything for one build.
//!
//! # Public API
//!
//! - **Error handling** — `AppError`, `RemoteErrorCode`, `ValidationError`
//! - **Configuration** — `PipelineConfig`, `DatabaseIds`, `CommandLineInput`
//! - **Domain model** — `Listing`, `Amenity`, `NearbyLocation`, `Scene`, `Row`, ...
//! - **API client** — `ListingStore`, `NotionHttpClient`, `RowQuery`
//! - **Pipeline** — `ListingPipeline`, `SlugLookup`
//! - **Images** — `ImageMirror`, `ImageKind`
//! - **Export** — `export_listings`, `ExportSummary`

mod api;
mod config;
mod constants;
mod error;
mod export;
mod images;
mod model;
mod pipeline;
mod types;

// --- Error Handling ---
pub use crate::error::{AppError, RemoteErrorCode, Result};
pub use crate::types::ValidationError;

// --- Configuration ---
pub use crate::config::{CommandLineInput, DatabaseIds, PipelineConfig};
pub use crate::constants::{DEFAULT_DOWNLOAD_CONCURRENCY, PLACEHOLDER_IMAGE_REF};

// --- Domain Model ---
pub use crate::model::{
    Amenity, Contact, Delivery, Developer, Dimensions, Features, HotSpot, Listing, Location,
    Media, NearbyLocation, Pricing, Scene, VirtualTour,
};

// --- Remote Rows ---
pub use crate::model::{FileEntry, PropertyValue, RichTextItem, Row, SelectOption};

// --- Domain Types ---
pub use crate::types::{slugify, ApiKey, DatabaseId, LocalImageRef, PageId};

// --- API Client ---
pub use crate::api::{
    ApiResponse, ListingStore, NotionHttpClient, RowFilter, RowQuery, SortDirection,
};

// --- Images ---
pub use crate::images::{ImageKind, ImageMirror};

// --- Pipeline ---
pub use crate::pipeline::{BuildCache, ListingPipeline, SlugLookup};

// --- Export ---
pub use crate::export::{export_listings, ExportReport, ExportSummary, RequiredFields};
