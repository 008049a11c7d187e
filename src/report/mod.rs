//! File-level details shown next to the embedded metadata, and exports of
//! scan results.

mod export;
mod hashing;
mod permissions;

use infer::Infer;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::formats::{self, FormatCategory};
use crate::formatting::{format_size, format_timestamp};

pub use export::{ExportFormat, export_scan};
pub use hashing::{HashSummary, file_hashes};

/// Filesystem facts about a file, pre-formatted for display.
#[derive(Clone, Debug, Serialize)]
pub struct FileDetails {
    pub path: PathBuf,
    pub category: Option<FormatCategory>,
    pub mime: Option<String>,
    pub size: String,
    pub modified: String,
    pub readonly: bool,
    pub permissions: Option<String>,
    pub owner: Option<String>,
    pub group: Option<String>,
    pub md5: String,
    pub sha256: String,
}

pub fn file_details(path: &Path) -> std::io::Result<FileDetails> {
    let metadata = fs::metadata(path)?;
    let hashes = file_hashes(path, &metadata);

    Ok(FileDetails {
        path: path.to_path_buf(),
        category: formats::category_of(path),
        mime: sniff_mime(path),
        size: format_size(metadata.len()),
        modified: format_timestamp(metadata.modified().ok()),
        readonly: metadata.permissions().readonly(),
        permissions: permissions::describe(&metadata),
        owner: permissions::owner_name(&metadata),
        group: permissions::group_name(&metadata),
        md5: hashes.md5,
        sha256: hashes.sha256,
    })
}

/// MIME type from the file's leading bytes; the extension is ignored.
fn sniff_mime(path: &Path) -> Option<String> {
    let kind = Infer::new().get_from_path(path).ok()??;
    Some(kind.mime_type().to_string())
}
