//! Registry of the file extensions the remover accepts.

use serde::Serialize;
use std::fmt;
use std::path::Path;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatCategory {
    Images,
    Documents,
    Archives,
    Audio,
    Video,
}

impl FormatCategory {
    pub fn label(self) -> &'static str {
        match self {
            FormatCategory::Images => "Images",
            FormatCategory::Documents => "Documents",
            FormatCategory::Archives => "Archives",
            FormatCategory::Audio => "Audio",
            FormatCategory::Video => "Video",
        }
    }

    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            FormatCategory::Images => IMAGE_EXTENSIONS,
            FormatCategory::Documents => DOCUMENT_EXTENSIONS,
            FormatCategory::Archives => ARCHIVE_EXTENSIONS,
            FormatCategory::Audio => AUDIO_EXTENSIONS,
            FormatCategory::Video => VIDEO_EXTENSIONS,
        }
    }
}

impl fmt::Display for FormatCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Categories in display order.
pub const CATEGORIES: [FormatCategory; 5] = [
    FormatCategory::Images,
    FormatCategory::Documents,
    FormatCategory::Archives,
    FormatCategory::Audio,
    FormatCategory::Video,
];

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "tiff", "webp", "bmp", "gif"];
const DOCUMENT_EXTENSIONS: &[&str] = &[
    "pdf", "doc", "docx", "odt", "xls", "xlsx", "odp", "ppt", "pptx",
];
const ARCHIVE_EXTENSIONS: &[&str] = &["zip", "tar", "gz", "7z", "rar"];
const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "ogg", "flac", "m4a"];
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "avi", "mkv", "wmv", "flv"];

/// Raster formats that get decoded and re-encoded. Everything else in the
/// registry, `tiff` and `webp` included, is copied byte-for-byte.
const REENCODED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif"];

/// Lowercased final extension of `path`, without the dot.
pub fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

pub fn category_of(path: &Path) -> Option<FormatCategory> {
    let ext = extension_of(path)?;
    CATEGORIES
        .into_iter()
        .find(|category| category.extensions().contains(&ext.as_str()))
}

pub fn is_supported(path: &Path) -> bool {
    category_of(path).is_some()
}

pub fn is_reencoded_image(path: &Path) -> bool {
    extension_of(path).is_some_and(|ext| REENCODED_EXTENSIONS.contains(&ext.as_str()))
}

/// Flat list of every supported extension, dotted, in registry order.
pub fn supported_extensions() -> Vec<String> {
    CATEGORIES
        .iter()
        .flat_map(|category| category.extensions().iter())
        .map(|ext| format!(".{ext}"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_extensions_case_insensitively() {
        assert_eq!(
            category_of(Path::new("holiday.JPG")),
            Some(FormatCategory::Images)
        );
        assert_eq!(
            category_of(Path::new("/tmp/report.Docx")),
            Some(FormatCategory::Documents)
        );
        assert_eq!(
            category_of(Path::new("song.flac")),
            Some(FormatCategory::Audio)
        );
        assert!(is_supported(Path::new("backup.tar.gz")));
    }

    #[test]
    fn rejects_unknown_or_missing_extensions() {
        assert!(!is_supported(Path::new("notes.txt")));
        assert!(!is_supported(Path::new("Makefile")));
        assert!(!is_supported(Path::new(".png")));
    }

    #[test]
    fn only_five_raster_formats_are_reencoded() {
        for name in ["a.png", "a.jpg", "a.JPEG", "a.bmp", "a.gif"] {
            assert!(is_reencoded_image(Path::new(name)), "{name}");
        }
        for name in ["a.tiff", "a.webp", "a.pdf", "a.mp4"] {
            assert!(!is_reencoded_image(Path::new(name)), "{name}");
        }
    }

    #[test]
    fn every_extension_maps_back_to_its_category() {
        for category in CATEGORIES {
            for ext in category.extensions() {
                let name = format!("file.{ext}");
                assert_eq!(category_of(Path::new(&name)), Some(category));
            }
        }
        assert_eq!(supported_extensions().len(), 32);
        assert_eq!(supported_extensions()[0], ".jpg");
    }
}
