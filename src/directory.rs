//! Batch removal and metadata scans over whole directories.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::DirectoryError;
use crate::formats;
use crate::inspector::{self, ImageMetadata};
use crate::stripper::{self, StripOptions};

/// Progress notifications emitted while a directory is processed.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum CleanupEvent {
    Started { total: usize },
    Processing { index: usize, total: usize, path: PathBuf },
    Success { path: PathBuf, output: String },
    Failure { path: PathBuf, error: String },
    Finished { processed: usize, errors: usize },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectorySummary {
    pub processed: usize,
    pub errors: usize,
}

/// A file found to carry metadata during a scan.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScanHit {
    pub path: PathBuf,
    pub metadata: ImageMetadata,
}

/// Supported files under `root`, sorted by path. Only the top level is read
/// unless `recursive` is set.
pub fn collect_candidate_files(root: &Path, recursive: bool) -> Result<Vec<PathBuf>, DirectoryError> {
    if !root.is_dir() {
        return Err(DirectoryError::NotADirectory(root.to_path_buf()));
    }

    let mut walker = WalkDir::new(root).min_depth(1).sort_by_file_name();
    if !recursive {
        walker = walker.max_depth(1);
    }

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry?;
        if entry.file_type().is_file() && formats::is_supported(entry.path()) {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

/// Strips every supported file under `root`, one after another.
///
/// With `output_dir` the relative layout below `root` is mirrored there;
/// otherwise each file follows the usual sibling/overwrite rules. A failing
/// file is counted and reported, and the walk carries on.
pub fn process_directory(
    root: &Path,
    recursive: bool,
    output_dir: Option<&Path>,
    overwrite: bool,
    options: &StripOptions,
    sender: Option<&Sender<CleanupEvent>>,
) -> Result<DirectorySummary, DirectoryError> {
    let files = collect_candidate_files(root, recursive)?;

    if let Some(output_dir) = output_dir {
        fs::create_dir_all(output_dir).map_err(|source| DirectoryError::Io {
            path: output_dir.to_path_buf(),
            source,
        })?;
    }

    let total = files.len();
    notify(sender, CleanupEvent::Started { total });

    let mut summary = DirectorySummary::default();
    for (index, path) in files.into_iter().enumerate() {
        notify(
            sender,
            CleanupEvent::Processing {
                index: index + 1,
                total,
                path: path.clone(),
            },
        );

        let target = output_dir.map(|dir| mirrored_path(root, dir, &path));
        let result = stripper::remove_metadata(&path, target.as_deref(), overwrite, options);

        if result.success {
            summary.processed += 1;
            debug!(path = %path.display(), output = %result.message, "cleaned");
            notify(
                sender,
                CleanupEvent::Success {
                    path,
                    output: result.message,
                },
            );
        } else {
            summary.errors += 1;
            notify(
                sender,
                CleanupEvent::Failure {
                    path,
                    error: result.message,
                },
            );
        }
    }

    info!(
        root = %root.display(),
        processed = summary.processed,
        errors = summary.errors,
        "directory processed"
    );
    notify(
        sender,
        CleanupEvent::Finished {
            processed: summary.processed,
            errors: summary.errors,
        },
    );
    Ok(summary)
}

/// Inspects every supported file under `root` and keeps those that carry
/// EXIF tags or PNG text chunks.
pub fn scan_directory(root: &Path, recursive: bool) -> Result<Vec<ScanHit>, DirectoryError> {
    let files = collect_candidate_files(root, recursive)?;

    let mut hits = Vec::new();
    for path in files {
        match inspector::get_metadata(&path) {
            Ok(metadata) if metadata.has_metadata() => hits.push(ScanHit { path, metadata }),
            Ok(_) => {}
            Err(error) => debug!(path = %path.display(), %error, "skipped during scan"),
        }
    }

    Ok(hits)
}

fn mirrored_path(root: &Path, output_dir: &Path, path: &Path) -> PathBuf {
    match path.strip_prefix(root) {
        Ok(relative) => output_dir.join(relative),
        Err(_) => output_dir.join(path.file_name().unwrap_or_default()),
    }
}

fn notify(sender: Option<&Sender<CleanupEvent>>, event: CleanupEvent) {
    if let Some(sender) = sender
        && sender.send(event).is_err()
    {
        warn!("progress receiver dropped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{exif_with_make, write_png};
    use std::sync::mpsc;
    use tempfile::tempdir;

    #[test]
    fn scanning_an_empty_directory_finds_nothing() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        assert!(scan_directory(dir.path(), true)?.is_empty());
        Ok(())
    }

    #[test]
    fn scan_reports_only_files_with_metadata() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        write_png(
            &dir.path().join("tagged.png"),
            6,
            6,
            Some(&exif_with_make("Acme Optics")),
            &[],
        )?;
        write_png(&dir.path().join("plain.png"), 6, 6, None, &[])?;
        fs::write(dir.path().join("report.pdf"), b"%PDF-1.7")?;
        fs::write(dir.path().join("notes.txt"), b"hello")?;

        let hits = scan_directory(dir.path(), false)?;

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].path, dir.path().join("tagged.png"));
        assert!(hits[0].metadata.exif_data["Make"].contains("Acme Optics"));
        Ok(())
    }

    #[test]
    fn recursion_is_opt_in() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let nested = dir.path().join("a").join("b");
        fs::create_dir_all(&nested)?;
        fs::write(dir.path().join("top.mp3"), b"ID3")?;
        fs::write(nested.join("deep.mp4"), b"ftyp")?;
        fs::write(nested.join("skip.md"), b"# no")?;

        let shallow = collect_candidate_files(dir.path(), false)?;
        assert_eq!(shallow, vec![dir.path().join("top.mp3")]);

        let deep = collect_candidate_files(dir.path(), true)?;
        assert_eq!(deep.len(), 2);
        assert!(deep.contains(&nested.join("deep.mp4")));
        Ok(())
    }

    #[test]
    fn rejects_files_as_roots() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let file = dir.path().join("single.png");
        fs::write(&file, b"x")?;

        assert!(matches!(
            collect_candidate_files(&file, true),
            Err(DirectoryError::NotADirectory(_))
        ));
        assert!(scan_directory(&dir.path().join("missing"), true).is_err());
        Ok(())
    }

    #[test]
    fn processing_tallies_successes_and_failures() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        write_png(
            &dir.path().join("good.png"),
            4,
            4,
            Some(&exif_with_make("Acme Optics")),
            &[],
        )?;
        fs::write(dir.path().join("bad.jpg"), b"not a jpeg at all")?;
        fs::write(dir.path().join("doc.pdf"), b"%PDF-1.7")?;

        let (sender, receiver) = mpsc::channel();
        let summary = process_directory(
            dir.path(),
            true,
            None,
            true,
            &StripOptions::default(),
            Some(&sender),
        )?;
        drop(sender);
        let events: Vec<CleanupEvent> = receiver.iter().collect();

        assert_eq!(summary, DirectorySummary { processed: 2, errors: 1 });
        assert!(matches!(events.first(), Some(CleanupEvent::Started { total: 3 })));
        assert!(matches!(
            events.last(),
            Some(CleanupEvent::Finished { processed: 2, errors: 1 })
        ));
        assert!(events.iter().any(|event| matches!(
            event,
            CleanupEvent::Failure { path, .. } if path.ends_with("bad.jpg")
        )));
        assert!(events.iter().any(|event| matches!(
            event,
            CleanupEvent::Processing { index: 3, total: 3, .. }
        )));
        assert!(!inspector::get_metadata(&dir.path().join("good.png"))?.has_metadata());
        Ok(())
    }

    #[test]
    fn output_directory_mirrors_the_tree() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let source = dir.path().join("src");
        let nested = source.join("trip");
        fs::create_dir_all(&nested)?;
        write_png(&nested.join("beach.png"), 5, 5, None, &[("Location", "Home")])?;
        fs::write(source.join("itinerary.docx"), b"docx bytes")?;
        let out = dir.path().join("out");

        let summary =
            process_directory(&source, true, Some(&out), false, &StripOptions::default(), None)?;

        assert_eq!(summary, DirectorySummary { processed: 2, errors: 0 });
        assert_eq!(fs::read(out.join("itinerary.docx"))?, b"docx bytes");
        let beach = out.join("trip").join("beach.png");
        assert!(!inspector::get_metadata(&beach)?.has_metadata());
        assert!(inspector::get_metadata(&nested.join("beach.png"))?.has_metadata());
        Ok(())
    }
}
