//! Command-line configuration for imgindex.
//!
//! Options come from command-line arguments via clap, with environment
//! variable fallbacks (`IMGINDEX_` prefix) for the indexing options and
//! sensible defaults for everything optional.
//!
//! # Example
//!
//! ```ignore
//! use imgindex::config::{Cli, Command};
//! use clap::Parser;
//!
//! let cli = Cli::parse();
//! match cli.into_command() {
//!     Command::Index(config) => println!("Indexing {}", config.dir.display()),
//!     Command::Inspect(config) => println!("Inspecting {}", config.file.display()),
//!     Command::Tags | Command::Version => {}
//! }
//! ```
//!
//! # Environment Variables
//!
//! - `IMGINDEX_DIR` - Directory to index (default: current directory)
//! - `IMGINDEX_OUTPUT` - Output file (default: stdout)
//! - `IMGINDEX_CONCURRENCY` - Files decoded at once (default: 8)
//! - `IMGINDEX_FIELDS` - Extra EXIF tags to record, comma-separated
//! - `IMGINDEX_EXTENSIONS` - Image file extensions (default: jpg,jpeg)

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::format::exif::{parse_tag_id, tag_by_name};
use crate::format::sof::SOF_TAG_NAMES;
use crate::format::{ExifTag, IptcTag, XmpTag};
use crate::index::DEFAULT_CONCURRENCY;
use crate::meta::Namespace;

// =============================================================================
// Default Values
// =============================================================================

/// Default directory to index.
pub const DEFAULT_DIR: &str = ".";

/// Default image file extensions.
pub const DEFAULT_EXTENSIONS: &str = "jpg,jpeg";

// =============================================================================
// CLI Arguments
// =============================================================================

/// imgindex - Index embedded JPEG metadata.
///
/// Reads EXIF, IPTC, XMP and frame header metadata from every JPEG below a
/// directory and writes a single JSON index.
#[derive(Parser, Debug, Clone)]
#[command(name = "imgindex")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Index options used when no subcommand is given.
    #[command(flatten)]
    pub index: IndexConfig,
}

impl Cli {
    /// The command to run; `index` when none was given.
    pub fn into_command(self) -> Command {
        self.command.unwrap_or(Command::Index(self.index))
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Index every image below a directory (default).
    Index(IndexConfig),

    /// Print the metadata of a single image.
    Inspect(InspectConfig),

    /// List the known EXIF tag names.
    Tags,

    /// Print the version.
    Version,
}

// =============================================================================
// Logging
// =============================================================================

#[derive(Args, Debug, Clone, Default)]
pub struct LogConfig {
    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Only log errors.
    #[arg(short, long, default_value_t = false)]
    pub silent: bool,
}

impl LogConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.verbose && self.silent {
            return Err("--verbose and --silent cannot be used together".to_string());
        }
        Ok(())
    }

    /// Default `tracing` filter for the chosen verbosity.
    pub fn filter(&self) -> &'static str {
        if self.verbose {
            "imgindex=debug"
        } else if self.silent {
            "imgindex=error"
        } else {
            "imgindex=warn"
        }
    }
}

// =============================================================================
// Index Command
// =============================================================================

#[derive(Args, Debug, Clone)]
pub struct IndexConfig {
    /// Directory to index.
    #[arg(default_value = DEFAULT_DIR, env = "IMGINDEX_DIR")]
    pub dir: PathBuf,

    /// Write the index to this file instead of stdout.
    #[arg(short, long, env = "IMGINDEX_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Maximum number of files decoded at the same time.
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY, env = "IMGINDEX_CONCURRENCY")]
    pub concurrency: usize,

    /// Extra EXIF tags to record per image (repeatable or comma-separated).
    #[arg(long = "field", env = "IMGINDEX_FIELDS", value_delimiter = ',')]
    pub fields: Vec<String>,

    /// File extensions treated as JPEG images (comma-separated).
    #[arg(
        long,
        default_value = DEFAULT_EXTENSIONS,
        env = "IMGINDEX_EXTENSIONS",
        value_delimiter = ','
    )]
    pub extensions: Vec<String>,

    /// Pretty-print the JSON output.
    #[arg(long, default_value_t = false)]
    pub pretty: bool,

    #[command(flatten)]
    pub log: LogConfig,
}

impl IndexConfig {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        self.log.validate()?;

        if self.concurrency == 0 {
            return Err("concurrency must be greater than 0".to_string());
        }

        if self.extensions.iter().all(|e| e.trim().is_empty()) {
            return Err("at least one file extension is required".to_string());
        }

        self.field_tags().map(|_| ())
    }

    /// Resolve `--field` names through the EXIF tag table.
    pub fn field_tags(&self) -> Result<Vec<ExifTag>, String> {
        let mut tags = Vec::new();
        for name in self.fields.iter().map(|f| f.trim()).filter(|f| !f.is_empty()) {
            let tag = tag_by_name(name).ok_or_else(|| format!("unknown EXIF tag '{}'", name))?;
            if !tags.contains(&tag) {
                tags.push(tag);
            }
        }
        Ok(tags)
    }

    /// Extensions with surrounding whitespace and leading dots removed.
    pub fn normalized_extensions(&self) -> Vec<String> {
        self.extensions
            .iter()
            .map(|e| e.trim().trim_start_matches('.').to_string())
            .filter(|e| !e.is_empty())
            .collect()
    }
}

// =============================================================================
// Inspect Command
// =============================================================================

#[derive(Args, Debug, Clone)]
pub struct InspectConfig {
    /// Image file to inspect.
    pub file: PathBuf,

    /// Namespace to read (EXIF, IPTC, SOF0 or XMP).
    #[arg(short, long, default_value = "EXIF")]
    pub namespace: Namespace,

    /// Print only this tag, given by name or hexadecimal id (e.g. 0x112).
    #[arg(short, long)]
    pub tag: Option<String>,

    #[command(flatten)]
    pub log: LogConfig,
}

impl InspectConfig {
    pub fn validate(&self) -> Result<(), String> {
        self.log.validate()?;
        self.tag_id().map(|_| ())
    }

    /// Resolve `--tag` to a numeric id within the chosen namespace.
    pub fn tag_id(&self) -> Result<Option<u16>, String> {
        let Some(tag) = self.tag.as_deref() else {
            return Ok(None);
        };

        let id = match self.namespace {
            Namespace::Exif => parse_tag_id(tag),
            Namespace::Iptc => parse_hex(tag)
                .or_else(|| IptcTag::from_name(tag).map(|t| t.as_u16())),
            Namespace::Xmp => parse_hex(tag)
                .or_else(|| XmpTag::from_name(tag).map(|t| t.as_u16())),
            Namespace::Sof0 => parse_hex(tag).or_else(|| {
                SOF_TAG_NAMES
                    .iter()
                    .position(|n| n.eq_ignore_ascii_case(tag))
                    .and_then(|i| u16::try_from(i).ok())
            }),
        };

        id.map(Some)
            .ok_or_else(|| format!("unknown {} tag '{}'", self.namespace, tag))
    }
}

fn parse_hex(input: &str) -> Option<u16> {
    let input = input.trim();
    let hex = input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))?;
    u16::from_str_radix(hex, 16).ok()
}

// =============================================================================
// Tests
// =============================================================================
