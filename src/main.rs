// src/main.rs

use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;
use log4rs::{
    append::console::ConsoleAppender,
    append::file::FileAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
    Config,
};

use notion_estates::{
    export_listings, CommandLineInput, Listing, ListingPipeline, PipelineConfig, SlugLookup,
};

/// Sets up logging configuration.
fn setup_logging(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let log_file_path = std::env::temp_dir().join("notion_estates.log");

    let pattern = if verbose {
        "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}"
    } else {
        "{m}{n}"
    };

    let stdout_appender = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(pattern)))
        .build();

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}",
        )))
        .build(&log_file_path)?;

    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout_appender)))
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(LevelFilter::Debug)))
                .build("file", Box::new(file_appender)),
        )
        .build(
            Root::builder()
                .appender("stdout")
                .appender("file")
                .build(log_level),
        )?;

    log4rs::init_config(config)?;
    log::debug!("Logging initialized. Log file: {}", log_file_path.display());
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CommandLineInput::parse();

    if let Err(e) = setup_logging(cli.verbose) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let config = PipelineConfig::resolve(&cli)?;
    let pipeline = ListingPipeline::from_config(&config).await?;
    let output_dir = PathBuf::from(&cli.output_dir);

    let listings: Vec<Listing> = if let Some(slug) = &cli.slug {
        match pipeline.fetch_by_slug(slug).await {
            SlugLookup::Found(listing) => vec![listing],
            SlugLookup::Fallback(listing) => {
                log::warn!("Fetch for '{}' degraded to the fallback record", slug);
                vec![listing]
            }
            SlugLookup::NotFound => {
                anyhow::bail!("No property found with slug '{}'", slug);
            }
        }
    } else if cli.tours_only {
        pipeline.fetch_tours_only().await
    } else {
        pipeline.fetch_all().await
    };

    if cli.tours_only {
        report_tours(&listings);
    }

    let report = export_listings(&listings, &output_dir).await?;
    log::info!(
        "Exported {} properties to {}",
        report.files_written,
        report.output_dir.display()
    );

    for summary in &report.summary.properties {
        let flags = &summary.has_required_fields;
        if flags.all_present() {
            continue;
        }
        log::warn!(
            "{} ({}): {}",
            if summary.name.is_empty() {
                "Unnamed"
            } else {
                summary.name.as_str()
            },
            summary.slug,
            flags.missing().join(", ")
        );
    }

    Ok(())
}

/// Prints a per-property virtual-tour breakdown, scene by scene.
fn report_tours(listings: &[Listing]) {
    log::info!("Properties with virtual tours: {}", listings.len());
    for listing in listings {
        log::info!(
            "  {} ({}) - {} scenes",
            listing.property_name,
            listing.slug,
            listing.virtual_tour.scenes.len()
        );
        for scene in &listing.virtual_tour.scenes {
            log::info!(
                "    {} ({}): {} hotspots",
                scene.title,
                scene.id,
                scene.hot_spots.len()
            );
        }
    }
}
