//! Re-encoding of raster images from their decoded pixels.

use image::{DynamicImage, ImageBuffer, ImageError, ImageFormat, ImageReader};
use std::fs;
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, warn};

use super::copy::ensure_parent;
use super::exif_carry::{encode_png_with_exif, insert_jpeg_exif};
use super::paths::temp_sibling;
use crate::error::StripError;
use crate::inspector::{self, read_exif_blob};

/// Decodes `source`, copies its pixels into a fresh image of the same size and
/// color type, and writes that image to `target`.
///
/// The fresh image holds nothing but pixels, so EXIF and text chunks are gone
/// unless `keep_exif` asks for the source's EXIF block to be reattached.
pub fn reencode_without_metadata(
    source: &Path,
    target: &Path,
    keep_exif: bool,
) -> Result<(), StripError> {
    let reader = ImageReader::open(source)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|error| StripError::io(source, error))?;
    let source_format = reader.format();
    let decoded = reader.decode().map_err(map_image_error)?;

    let clean = copy_pixels(&decoded)?;

    let format = ImageFormat::from_path(target)
        .ok()
        .or(source_format)
        .ok_or_else(|| {
            StripError::ImageSupportUnavailable(format!(
                "no encoder for {}",
                target.display()
            ))
        })?;

    let exif = if keep_exif {
        exif_to_carry(source, source_format)?
    } else {
        None
    };

    let bytes = encode(&clean, format, exif.as_deref())?;
    write_atomically(source, target, &bytes)?;

    debug!(
        source = %source.display(),
        target = %target.display(),
        format = ?format,
        kept_exif = exif.is_some(),
        "re-encoded image"
    );
    Ok(())
}

/// Builds a new buffer of identical dimensions and color type from the raw
/// samples of `image`.
pub(crate) fn copy_pixels(image: &DynamicImage) -> Result<DynamicImage, StripError> {
    let (width, height) = (image.width(), image.height());

    macro_rules! rebuild {
        ($variant:ident, $buffer:expr) => {
            ImageBuffer::from_raw(width, height, $buffer.as_raw().clone()).map(DynamicImage::$variant)
        };
    }

    let fresh = match image {
        DynamicImage::ImageLuma8(buffer) => rebuild!(ImageLuma8, buffer),
        DynamicImage::ImageLumaA8(buffer) => rebuild!(ImageLumaA8, buffer),
        DynamicImage::ImageRgb8(buffer) => rebuild!(ImageRgb8, buffer),
        DynamicImage::ImageRgba8(buffer) => rebuild!(ImageRgba8, buffer),
        DynamicImage::ImageLuma16(buffer) => rebuild!(ImageLuma16, buffer),
        DynamicImage::ImageLumaA16(buffer) => rebuild!(ImageLumaA16, buffer),
        DynamicImage::ImageRgb16(buffer) => rebuild!(ImageRgb16, buffer),
        DynamicImage::ImageRgba16(buffer) => rebuild!(ImageRgba16, buffer),
        DynamicImage::ImageRgb32F(buffer) => rebuild!(ImageRgb32F, buffer),
        DynamicImage::ImageRgba32F(buffer) => rebuild!(ImageRgba32F, buffer),
        other => Some(DynamicImage::ImageRgba8(other.to_rgba8())),
    };

    fresh.ok_or(StripError::PixelBuffer { width, height })
}

fn exif_to_carry(
    source: &Path,
    source_format: Option<ImageFormat>,
) -> Result<Option<Vec<u8>>, StripError> {
    if !source_format.is_some_and(inspector::carries_exif) {
        return Ok(None);
    }

    match read_exif_blob(source) {
        Ok(blob) => Ok(blob),
        Err(error) => {
            warn!(path = %source.display(), %error, "could not read EXIF to keep; dropping it");
            Ok(None)
        }
    }
}

fn encode(
    image: &DynamicImage,
    format: ImageFormat,
    exif: Option<&[u8]>,
) -> Result<Vec<u8>, StripError> {
    if let (ImageFormat::Png, Some(exif)) = (format, exif) {
        return encode_png_with_exif(image, exif);
    }

    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), format)
        .map_err(map_image_error)?;

    match (format, exif) {
        (ImageFormat::Jpeg, Some(exif)) => match insert_jpeg_exif(&bytes, exif) {
            Some(with_exif) => Ok(with_exif),
            None => {
                warn!("EXIF block too large for a JPEG APP1 segment; dropping it");
                Ok(bytes)
            }
        },
        (_, Some(_)) => {
            debug!(format = ?format, "output format cannot carry EXIF; dropping it");
            Ok(bytes)
        }
        (_, None) => Ok(bytes),
    }
}

/// Writes through a scratch sibling so a failed encode never leaves a partial
/// file, and so overwriting the source only happens once the copy is complete.
/// The written file takes the permission bits of `source`.
fn write_atomically(source: &Path, target: &Path, bytes: &[u8]) -> Result<(), StripError> {
    ensure_parent(target)?;

    let permissions = fs::metadata(source)
        .map(|metadata| metadata.permissions())
        .map_err(|error| StripError::io(source, error))?;

    let staged = temp_sibling(target);
    if let Err(error) = fs::write(&staged, bytes) {
        let _ = fs::remove_file(&staged);
        return Err(StripError::io(target, error));
    }
    if let Err(error) = fs::set_permissions(&staged, permissions) {
        let _ = fs::remove_file(&staged);
        return Err(StripError::io(target, error));
    }

    fs::rename(&staged, target).map_err(|error| {
        let _ = fs::remove_file(&staged);
        StripError::io(target, error)
    })
}

fn map_image_error(error: ImageError) -> StripError {
    match error {
        ImageError::Unsupported(unsupported) => {
            StripError::ImageSupportUnavailable(unsupported.to_string())
        }
        other => StripError::Image(other),
    }
}
