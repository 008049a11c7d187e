//! Error types shared by the inspector, the stripper and the directory walker.

use serde::{Deserialize, Serialize};
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures while reading metadata out of a file.
#[derive(Debug, Error)]
pub enum InspectError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Metadata extraction unavailable for this file type: {}", .0.display())]
    Unavailable(PathBuf),

    #[error("Image support unavailable: {0}")]
    ImageSupportUnavailable(String),

    #[error("Error reading metadata from {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("Error reading metadata: {0}")]
    Image(#[from] image::ImageError),

    #[error("Error reading EXIF data: {0}")]
    Exif(#[from] exif::Error),

    #[error("Error reading PNG metadata: {0}")]
    PngText(#[from] png::DecodingError),
}

/// Failures while producing a metadata-free copy of a file.
#[derive(Debug, Error)]
pub enum StripError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Unsupported file type: {}", .0.display())]
    Unsupported(PathBuf),

    #[error("Image support unavailable: {0}")]
    ImageSupportUnavailable(String),

    #[error("Error processing image: {0}")]
    Image(#[from] image::ImageError),

    #[error("Error processing image: {0}")]
    Png(#[from] png::EncodingError),

    #[error("Error processing image: pixel buffer does not match {width}x{height}")]
    PixelBuffer { width: u32, height: u32 },

    #[error("Error processing {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
}

impl StripError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Failures while walking a directory tree.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("{} is not a valid directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("Error walking directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Error preparing {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
}

/// Failures while loading the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read config file {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("Could not parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Failures while exporting a scan report.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Unrecognized export format: {0}")]
    UnknownFormat(String),

    #[error("Could not write report: {0}")]
    Io(#[from] io::Error),

    #[error("Could not write CSV report: {0}")]
    Csv(#[from] csv::Error),

    #[error("Could not serialize JSON report: {0}")]
    Json(#[from] serde_json::Error),
}

/// Outcome of a single removal: a pass/fail flag plus either the output path
/// or a human-readable failure message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovalResult {
    pub success: bool,
    pub message: String,
}

impl RemovalResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

impl From<Result<PathBuf, StripError>> for RemovalResult {
    fn from(result: Result<PathBuf, StripError>) -> Self {
        match result {
            Ok(path) => Self::ok(path.display().to_string()),
            Err(error) => Self::failed(error.to_string()),
        }
    }
}
