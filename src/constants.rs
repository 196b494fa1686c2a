// src/constants.rs
//! Domain constants that define the operational boundaries of the system.

// ---------------------------------------------------------------------------
// Notion API boundaries
// ---------------------------------------------------------------------------

/// How many objects the Notion API returns per page of results.
///
/// The Notion API maximum is 100. We use the maximum to minimize
/// round-trips when querying listing databases.
pub const NOTION_API_PAGE_SIZE: u32 = 100;

// ---------------------------------------------------------------------------
// Image mirroring
// ---------------------------------------------------------------------------

/// The fixed fallback image path substituted whenever a real image could
/// not be resolved or mirrored.
pub const PLACEHOLDER_IMAGE_REF: &str = "/images/img-placeholder.webp";

/// Site-relative prefix under which mirrored images are served.
pub const MIRRORED_IMAGE_PREFIX: &str = "/images/notion";

/// File extension assumed when a source URL's path carries none.
pub const DEFAULT_IMAGE_EXTENSION: &str = ".webp";

/// Default cap on simultaneous image downloads.
///
/// The hosted-file URLs Notion hands out are served by S3; a modest cap
/// keeps a large gallery from opening dozens of connections at once.
pub const DEFAULT_DOWNLOAD_CONCURRENCY: usize = 8;

// ---------------------------------------------------------------------------
// Fallback record defaults
// ---------------------------------------------------------------------------

/// Currency assumed when a listing does not specify one.
pub const DEFAULT_CURRENCY: &str = "MXN";

/// City assumed when a listing does not specify one.
pub const DEFAULT_CITY: &str = "Ciudad de México";

/// Country assumed when a listing does not specify one.
pub const DEFAULT_COUNTRY: &str = "México";

/// Listing status assumed when the remote select is empty.
pub const DEFAULT_STATUS: &str = "for_sale";

/// Listing type assumed when the remote select is empty.
pub const DEFAULT_PROPERTY_TYPE: &str = "departamento";

/// Delivery label assumed when the remote select is empty.
pub const DEFAULT_DELIVERY_TYPE: &str = "entrega inmediata";

/// Sales commission percentage assumed when none is set.
pub const DEFAULT_COMMISSION_PERCENTAGE: f64 = 3.0;
