//! Output path resolution and temporary sibling names.

use std::path::{Path, PathBuf};
use std::process;
use std::time::{SystemTime, UNIX_EPOCH};

pub const DEFAULT_SUFFIX: &str = "_clean";

/// Decides where the clean copy of `source` goes.
///
/// An explicit output naming an existing directory receives the source's file
/// name. Otherwise `overwrite` targets the source itself, an explicit output is
/// used as given, and with neither the copy lands next to the source as
/// `<stem><suffix>.<ext>`.
pub fn resolve_output_path(
    source: &Path,
    output: Option<&Path>,
    overwrite: bool,
    suffix: &str,
) -> PathBuf {
    if let Some(output) = output
        && output.is_dir()
    {
        return output.join(source.file_name().unwrap_or_default());
    }

    if overwrite {
        return source.to_path_buf();
    }

    if let Some(output) = output {
        return output.to_path_buf();
    }

    suffixed_sibling(source, suffix)
}

fn suffixed_sibling(source: &Path, suffix: &str) -> PathBuf {
    let stem = source.file_stem().unwrap_or_default().to_string_lossy();
    let name = match source.extension() {
        Some(ext) => format!("{stem}{suffix}.{}", ext.to_string_lossy()),
        None => format!("{stem}{suffix}"),
    };
    source.with_file_name(name)
}

/// Hidden scratch file in the same directory as `path`, so the final rename
/// never crosses filesystems.
pub(crate) fn temp_sibling(path: &Path) -> PathBuf {
    let stem = path.file_stem().unwrap_or_default().to_string_lossy();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.subsec_nanos())
        .unwrap_or(0);

    let mut name = format!(".{stem}_tmp_{}_{nanos}", process::id());
    if let Some(extension) = path.extension() {
        name.push('.');
        name.push_str(&extension.to_string_lossy());
    }
    path.with_file_name(name)
}

/// True when both paths name the same file on disk.
pub(crate) fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}
