//! imgindex - Index embedded JPEG metadata.
//!
//! This binary parses the command line, sets up logging and runs the chosen
//! command.

use clap::Parser;
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use imgindex::{
    config::{Cli, Command, IndexConfig, InspectConfig, LogConfig},
    describe,
    format::{sof::SOF_TAG_NAMES, ExifTag, IptcSegment, IptcTag, XmpTag},
    meta::{Image, Namespace},
    ExifSegment, Indexer, LocalImageSource, TagGroup,
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.into_command() {
        Command::Index(config) => run_index(config).await,
        Command::Inspect(config) => run_inspect(config).await,
        Command::Tags => run_tags(),
        Command::Version => {
            println!("imgindex {}", env!("CARGO_PKG_VERSION"));
            ExitCode::SUCCESS
        }
    }
}

/// Initialize the tracing/logging subsystem.
///
/// `RUST_LOG` takes precedence over the verbosity flags.
fn init_logging(log: &LogConfig) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log.filter().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

// =============================================================================
// Index Command
// =============================================================================

async fn run_index(config: IndexConfig) -> ExitCode {
    init_logging(&config.log);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let fields = match config.field_tags() {
        Ok(fields) => fields,
        Err(e) => {
            error!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let source =
        LocalImageSource::new(&config.dir).with_extensions(config.normalized_extensions());
    let indexer = Indexer::new(source)
        .with_concurrency(config.concurrency)
        .with_fields(fields);

    let index = match indexer.run().await {
        Ok(index) => index,
        Err(e) => {
            error!("Indexing {} failed: {}", config.dir.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let json = match index.to_json(config.pretty) {
        Ok(json) => json,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    match config.output {
        Some(ref path) => {
            if let Err(e) = tokio::fs::write(path, json + "\n").await {
                error!("Failed to write {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
            info!("Index written to {}", path.display());
        }
        None => println!("{}", json),
    }

    ExitCode::SUCCESS
}

// =============================================================================
// Inspect Command
// =============================================================================

async fn run_inspect(config: InspectConfig) -> ExitCode {
    init_logging(&config.log);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let data = match tokio::fs::read(&config.file).await {
        Ok(data) => data,
        Err(e) => {
            error!("Failed to read {}: {}", config.file.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let image = match Image::from_bytes(data.into()) {
        Ok(image) => image,
        Err(e) => {
            error!("{}: {}", config.file.display(), e);
            return ExitCode::FAILURE;
        }
    };
    debug!(
        file = %config.file.display(),
        segments = image.jpeg().segments().len(),
        "Scanned image"
    );

    let result = match config.tag_id() {
        Ok(Some(tag)) => print_tag(&image, config.namespace, tag),
        Ok(None) => print_namespace(&image, config.namespace),
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}: {}", config.file.display(), e);
            ExitCode::FAILURE
        }
    }
}

fn print_tag(image: &Image, namespace: Namespace, tag: u16) -> Result<(), String> {
    let value = image
        .read_tag_value(namespace, tag)
        .map_err(|e| e.to_string())?;

    let described = match namespace {
        Namespace::Exif => ExifTag::from_u16(tag).and_then(|t| describe(t, &value)),
        _ => None,
    };
    match described {
        Some(text) => println!("{} ({})", value, text),
        None => println!("{}", value),
    }
    Ok(())
}

fn print_namespace(image: &Image, namespace: Namespace) -> Result<(), String> {
    let segment = image
        .segment(namespace)
        .ok_or_else(|| format!("no {} segment", namespace))?;

    match namespace {
        Namespace::Exif => {
            let fields = ExifSegment::new(&segment.data)
                .tags()
                .map_err(|e| e.to_string())?;
            for field in fields {
                let name = field
                    .tag()
                    .map(|t| t.name().to_string())
                    .unwrap_or_else(|| format!("0x{:04X}", field.entry.tag_id));
                let value = match (&field.value, field.tag()) {
                    (Ok(value), Some(tag)) => match describe(tag, value) {
                        Some(text) => format!("{} ({})", value, text),
                        None => value.to_string(),
                    },
                    (Ok(value), None) => value.to_string(),
                    (Err(e), _) => format!("<{}>", e),
                };
                println!("{:<10} {:<32} {}", field.ifd.name(), name, value);
            }
        }
        Namespace::Iptc => {
            let datasets = IptcSegment::new(&segment.data)
                .datasets()
                .map_err(|e| e.to_string())?;
            for dataset in datasets {
                let name = IptcTag::from_u16(dataset.tag_id())
                    .map(|t| t.name().to_string())
                    .unwrap_or_else(|| format!("{}:{}", dataset.record, dataset.dataset));
                println!("{:<32} {}", name, dataset.text());
            }
        }
        Namespace::Xmp => {
            for tag in XmpTag::ALL {
                match image.read_tag_value(namespace, tag.as_u16()) {
                    Ok(value) => println!("{:<32} {}", tag.name(), value),
                    Err(e) if e.is_not_found() => {}
                    Err(e) => return Err(e.to_string()),
                }
            }
        }
        Namespace::Sof0 => {
            for (id, name) in (0u16..).zip(SOF_TAG_NAMES) {
                let value = image
                    .read_tag_value(namespace, id)
                    .map_err(|e| e.to_string())?;
                println!("{:<32} {}", name, value);
            }
        }
    }

    Ok(())
}

// =============================================================================
// Tags Command
// =============================================================================

fn run_tags() -> ExitCode {
    for group in [
        TagGroup::Primary,
        TagGroup::Exif,
        TagGroup::Gps,
        TagGroup::WindowsXp,
        TagGroup::Pointer,
    ] {
        for tag in ExifTag::in_group(group) {
            println!("0x{:04X}  {:<10} {}", tag.as_u16(), group.name(), tag.name());
        }
    }
    ExitCode::SUCCESS
}
