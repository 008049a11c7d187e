//! Pass-through handling for supported formats that are not re-encoded.

use std::fs::{self, File};
use std::path::Path;
use tracing::debug;

use super::paths::{same_file, temp_sibling};
use crate::error::StripError;

/// Copies `source` to `target` byte-for-byte, keeping permissions and the
/// modification time. Targeting the source itself leaves it untouched.
pub fn copy_verbatim(source: &Path, target: &Path) -> Result<(), StripError> {
    if same_file(source, target) {
        debug!(path = %source.display(), "pass-through format already in place");
        return Ok(());
    }

    ensure_parent(target)?;

    // fs::copy carries the permission bits over to `staged`.
    let staged = temp_sibling(target);
    if let Err(error) = fs::copy(source, &staged) {
        let _ = fs::remove_file(&staged);
        return Err(StripError::io(source, error));
    }

    if let Err(error) = preserve_modified(source, &staged) {
        let _ = fs::remove_file(&staged);
        return Err(error);
    }

    fs::rename(&staged, target).map_err(|error| {
        let _ = fs::remove_file(&staged);
        StripError::io(target, error)
    })
}

fn preserve_modified(source: &Path, target: &Path) -> Result<(), StripError> {
    let modified = fs::metadata(source)
        .and_then(|metadata| metadata.modified())
        .map_err(|error| StripError::io(source, error))?;

    File::options()
        .write(true)
        .open(target)
        .and_then(|file| file.set_modified(modified))
        .map_err(|error| StripError::io(target, error))
}

pub(super) fn ensure_parent(target: &Path) -> Result<(), StripError> {
    match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
            fs::create_dir_all(parent).map_err(|error| StripError::io(parent, error))
        }
        _ => Ok(()),
    }
}
