//! Produces metadata-free copies of supported files.

mod copy;
mod exif_carry;
mod paths;
mod raster;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::{RemovalResult, StripError};
use crate::formats;
use crate::inspector;

pub use exif_carry::insert_jpeg_exif;
pub use paths::{DEFAULT_SUFFIX, resolve_output_path};

/// Knobs for a removal run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StripOptions {
    /// Appended to the file stem when writing a sibling copy.
    pub suffix: String,
    /// Reattach the source EXIF block to re-encoded images.
    pub keep_exif: bool,
    pub verbose: bool,
}

impl Default for StripOptions {
    fn default() -> Self {
        Self {
            suffix: DEFAULT_SUFFIX.to_string(),
            keep_exif: false,
            verbose: false,
        }
    }
}

/// Removes metadata from `path`, folding every failure into a
/// [`RemovalResult`] whose message explains what went wrong.
pub fn remove_metadata(
    path: &Path,
    output: Option<&Path>,
    overwrite: bool,
    options: &StripOptions,
) -> RemovalResult {
    let result = strip_file(path, output, overwrite, options);
    if let Err(error) = &result {
        warn!(path = %path.display(), %error, "metadata removal failed");
    }
    RemovalResult::from(result)
}

/// Removes metadata from `path` and returns where the clean file was written.
pub fn strip_file(
    path: &Path,
    output: Option<&Path>,
    overwrite: bool,
    options: &StripOptions,
) -> Result<PathBuf, StripError> {
    let source = std::path::absolute(path).map_err(|e| StripError::io(path, e))?;

    if !source.exists() {
        return Err(StripError::NotFound(source));
    }
    if !source.is_file() || !formats::is_supported(&source) {
        return Err(StripError::Unsupported(source));
    }

    let target = resolve_output_path(&source, output, overwrite, &options.suffix);

    if options.verbose {
        info!("Processing: {}", source.display());
    }

    if formats::is_reencoded_image(&source) {
        raster::reencode_without_metadata(&source, &target, options.keep_exif)?;
    } else {
        copy::copy_verbatim(&source, &target)?;
    }

    if options.verbose {
        match inspector::get_metadata(&target) {
            Ok(metadata) => debug!(
                output = %target.display(),
                exif_tags = metadata.exif_data.len(),
                text_chunks = metadata.png_metadata.len(),
                "metadata left after removal"
            ),
            Err(error) => debug!(output = %target.display(), %error, "output not inspectable"),
        }
    }

    Ok(target)
}
