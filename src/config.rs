// src/config.rs
//! Environment and CLI configuration for the pipeline and export glue.

use std::path::PathBuf;

use clap::Parser;

use crate::constants::DEFAULT_DOWNLOAD_CONCURRENCY;
use crate::error::AppError;
use crate::types::{ApiKey, DatabaseId};

/// The four Notion databases the pipeline reads from.
#[derive(Debug, Clone)]
pub struct DatabaseIds {
    pub properties: DatabaseId,
    pub amenities: DatabaseId,
    pub nearby_locations: DatabaseId,
    pub virtual_tour_scenes: DatabaseId,
}

/// Parsed and validated command-line input.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CommandLineInput {
    /// Directory the exported JSON files are written to
    #[arg(short, long, default_value = "./notion-exports")]
    pub output_dir: String,

    /// Export a single listing by its slug instead of the whole database
    #[arg(long)]
    pub slug: Option<String>,

    /// Only report listings whose virtual tour is enabled
    #[arg(long, default_value_t = false)]
    pub tours_only: bool,

    /// Re-download images even when a local copy already exists
    #[arg(long, default_value_t = false)]
    pub force_download: bool,

    /// Directory mirrored images are stored in
    #[arg(long, default_value = "public/images/notion")]
    pub images_dir: String,

    /// Maximum simultaneous image downloads
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Enable verbose logging (debug level)
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

/// Resolved pipeline configuration — validated and ready to build a
/// [`ListingPipeline`](crate::pipeline::ListingPipeline).
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub api_key: ApiKey,
    pub databases: DatabaseIds,
    pub images_dir: PathBuf,
    pub max_concurrent_downloads: usize,
    pub force_download: bool,
}

fn required_env(name: &str) -> Result<String, AppError> {
    std::env::var(name)
        .map_err(|_| AppError::MissingConfiguration(format!("{} environment variable not set", name)))
}

fn database_id_from_env(name: &str) -> Result<DatabaseId, AppError> {
    let raw = required_env(name)?;
    DatabaseId::parse(&raw)
        .map_err(|e| AppError::MissingConfiguration(format!("{}: {}", name, e)))
}

impl PipelineConfig {
    /// Resolves a complete configuration from CLI input and environment.
    ///
    /// Reads `NOTION_TOKEN` plus the four `NOTION_*_DB_ID` variables;
    /// everything else comes from the CLI with defaults.
    pub fn resolve(cli: &CommandLineInput) -> Result<Self, AppError> {
        let api_key = ApiKey::new(required_env("NOTION_TOKEN")?)?;

        let databases = DatabaseIds {
            properties: database_id_from_env("NOTION_PROPERTIES_DB_ID")?,
            amenities: database_id_from_env("NOTION_AMENITIES_DB_ID")?,
            nearby_locations: database_id_from_env("NOTION_NEARBY_LOCATIONS_DB_ID")?,
            virtual_tour_scenes: database_id_from_env("NOTION_VIRTUAL_TOUR_SCENES_DB_ID")?,
        };

        Ok(PipelineConfig {
            api_key,
            databases,
            images_dir: PathBuf::from(&cli.images_dir),
            max_concurrent_downloads: cli.concurrency.unwrap_or(DEFAULT_DOWNLOAD_CONCURRENCY),
            force_download: cli.force_download,
        })
    }
}
