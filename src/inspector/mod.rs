//! Reads the metadata a file carries so it can be shown before removal.

mod exif_tags;
mod png_text;

use image::{ColorType, ImageError, ImageFormat, ImageReader};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

use crate::error::InspectError;
use crate::formats::{self, FormatCategory};

pub use exif_tags::{read_exif_blob, read_exif_tags};
pub use png_text::read_png_text;

/// Header attributes reported by the image decoder.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    pub format: String,
    pub mode: String,
    pub width: u32,
    pub height: u32,
}

/// Everything the inspector found in one image.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageMetadata {
    pub file_info: FileInfo,
    pub exif_data: BTreeMap<String, String>,
    pub png_metadata: BTreeMap<String, String>,
}

impl ImageMetadata {
    /// True when the file carries anything that would be removed.
    pub fn has_metadata(&self) -> bool {
        !self.exif_data.is_empty() || !self.png_metadata.is_empty()
    }
}

/// Inspects `path`, reporting image attributes, EXIF tags and PNG text chunks.
pub fn get_metadata(path: &Path) -> Result<ImageMetadata, InspectError> {
    if !path.exists() {
        return Err(InspectError::NotFound(path.to_path_buf()));
    }

    let reader = ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|source| InspectError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    let Some(format) = reader.format() else {
        return Err(unavailable_or_unsupported(path));
    };

    let image = reader.decode().map_err(|error| match error {
        ImageError::Unsupported(unsupported) => {
            InspectError::ImageSupportUnavailable(unsupported.to_string())
        }
        other => InspectError::Image(other),
    })?;

    let file_info = FileInfo {
        format: format_name(format),
        mode: color_mode_label(image.color()),
        width: image.width(),
        height: image.height(),
    };

    let exif_data = if carries_exif(format) {
        read_exif_tags(path)?
    } else {
        BTreeMap::new()
    };

    let png_metadata = if format == ImageFormat::Png {
        read_png_text(path)?
    } else {
        BTreeMap::new()
    };

    debug!(
        path = %path.display(),
        exif_tags = exif_data.len(),
        text_chunks = png_metadata.len(),
        "inspected image"
    );

    Ok(ImageMetadata {
        file_info,
        exif_data,
        png_metadata,
    })
}

fn unavailable_or_unsupported(path: &Path) -> InspectError {
    match formats::category_of(path) {
        Some(FormatCategory::Images) => InspectError::ImageSupportUnavailable(format!(
            "could not determine the image format of {}",
            path.display()
        )),
        _ => InspectError::Unavailable(path.to_path_buf()),
    }
}

/// Containers kamadak-exif knows how to search for an EXIF block.
pub(crate) fn carries_exif(format: ImageFormat) -> bool {
    matches!(
        format,
        ImageFormat::Jpeg | ImageFormat::Png | ImageFormat::Tiff | ImageFormat::WebP
    )
}

pub(crate) fn format_name(format: ImageFormat) -> String {
    format!("{format:?}").to_uppercase()
}

/// Short color mode names in the style image tools usually print.
pub fn color_mode_label(color: ColorType) -> String {
    let label = match color {
        ColorType::L8 => "L",
        ColorType::La8 => "LA",
        ColorType::Rgb8 => "RGB",
        ColorType::Rgba8 => "RGBA",
        ColorType::L16 => "I;16",
        ColorType::La16 => "LA;16",
        ColorType::Rgb16 => "RGB;16",
        ColorType::Rgba16 => "RGBA;16",
        ColorType::Rgb32F => "RGB;32F",
        ColorType::Rgba32F => "RGBA;32F",
        other => return format!("{other:?}"),
    };
    label.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{exif_with_make, write_image, write_jpeg, write_png};
    use image::{DynamicImage, GrayImage};
    use tempfile::tempdir;

    #[test]
    fn reports_attributes_exif_and_text() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("photo.png");
        let exif = exif_with_make("Acme Optics");
        write_png(&path, 12, 7, Some(&exif), &[("Author", "Jane Roe")])?;

        let metadata = get_metadata(&path)?;

        assert_eq!(
            metadata.file_info,
            FileInfo {
                format: "PNG".to_string(),
                mode: "RGB".to_string(),
                width: 12,
                height: 7,
            }
        );
        let make = metadata.exif_data.get("Make").expect("Make tag");
        assert!(make.contains("Acme Optics"), "{make}");
        assert_eq!(
            metadata.png_metadata.get("Author").map(String::as_str),
            Some("Jane Roe")
        );
        assert!(metadata.has_metadata());
        Ok(())
    }

    #[test]
    fn reads_exif_from_jpeg() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("shot.jpg");
        write_jpeg(&path, 16, 16, Some(&exif_with_make("Field Camera")))?;

        let metadata = get_metadata(&path)?;

        assert_eq!(metadata.file_info.format, "JPEG");
        assert!(metadata.exif_data["Make"].contains("Field Camera"));
        assert!(metadata.png_metadata.is_empty());
        Ok(())
    }

    #[test]
    fn plain_images_have_no_metadata() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("plain.bmp");
        write_image(&path, &DynamicImage::ImageLuma8(GrayImage::new(5, 3)))?;

        let metadata = get_metadata(&path)?;

        assert_eq!(metadata.file_info.format, "BMP");
        assert_eq!((metadata.file_info.width, metadata.file_info.height), (5, 3));
        assert!(!metadata.has_metadata());
        Ok(())
    }

    #[test]
    fn missing_file_is_reported() {
        let error = get_metadata(Path::new("/definitely/not/here.png")).unwrap_err();
        assert!(matches!(error, InspectError::NotFound(_)));
        assert!(error.to_string().starts_with("File not found"));
    }

    #[test]
    fn documents_are_not_inspected() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("report.pdf");
        std::fs::write(&path, b"%PDF-1.4\n%%EOF\n")?;

        let error = get_metadata(&path).unwrap_err();

        assert!(matches!(error, InspectError::Unavailable(_)));
        Ok(())
    }

    #[test]
    fn corrupt_images_become_errors() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"\x89PNG\r\n\x1a\nnot really a png")?;

        assert!(get_metadata(&path).is_err());
        Ok(())
    }
}
