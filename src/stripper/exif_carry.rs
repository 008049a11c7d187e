//! Reattaching a source EXIF block to freshly encoded JPEG and PNG data.

use image::DynamicImage;

use crate::error::StripError;

const JPEG_SOI: [u8; 2] = [0xFF, 0xD8];
const JPEG_APP1: [u8; 2] = [0xFF, 0xE1];
const EXIF_HEADER: &[u8] = b"Exif\0\0";

/// Inserts `exif` (TIFF-structured) as an APP1 segment right after the JPEG
/// start-of-image marker. Returns `None` when `jpeg` does not start with SOI or
/// the block does not fit in one segment.
pub fn insert_jpeg_exif(jpeg: &[u8], exif: &[u8]) -> Option<Vec<u8>> {
    if !jpeg.starts_with(&JPEG_SOI) {
        return None;
    }

    // The length field counts itself but not the marker.
    let segment_len = u16::try_from(2 + EXIF_HEADER.len() + exif.len()).ok()?;

    let mut out = Vec::with_capacity(jpeg.len() + usize::from(segment_len) + 2);
    out.extend_from_slice(&JPEG_SOI);
    out.extend_from_slice(&JPEG_APP1);
    out.extend_from_slice(&segment_len.to_be_bytes());
    out.extend_from_slice(EXIF_HEADER);
    out.extend_from_slice(exif);
    out.extend_from_slice(&jpeg[JPEG_SOI.len()..]);
    Some(out)
}

/// Encodes `image` as PNG with an `eXIf` chunk placed ahead of the pixel data.
pub fn encode_png_with_exif(image: &DynamicImage, exif: &[u8]) -> Result<Vec<u8>, StripError> {
    let (color, depth, data) = png_samples(image);

    let mut bytes = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut bytes, image.width(), image.height());
        encoder.set_color(color);
        encoder.set_depth(depth);

        let mut writer = encoder.write_header()?;
        writer.write_chunk(png::chunk::ChunkType(*b"eXIf"), exif)?;
        writer.write_image_data(&data)?;
        writer.finish()?;
    }
    Ok(bytes)
}

/// PNG color type, bit depth and big-endian sample bytes for `image`.
fn png_samples(image: &DynamicImage) -> (png::ColorType, png::BitDepth, Vec<u8>) {
    use png::{BitDepth, ColorType};

    fn be16(samples: &[u16]) -> Vec<u8> {
        samples.iter().flat_map(|sample| sample.to_be_bytes()).collect()
    }

    match image {
        DynamicImage::ImageLuma8(buffer) => {
            (ColorType::Grayscale, BitDepth::Eight, buffer.as_raw().clone())
        }
        DynamicImage::ImageLumaA8(buffer) => (
            ColorType::GrayscaleAlpha,
            BitDepth::Eight,
            buffer.as_raw().clone(),
        ),
        DynamicImage::ImageRgb8(buffer) => (ColorType::Rgb, BitDepth::Eight, buffer.as_raw().clone()),
        DynamicImage::ImageRgba8(buffer) => {
            (ColorType::Rgba, BitDepth::Eight, buffer.as_raw().clone())
        }
        DynamicImage::ImageLuma16(buffer) => {
            (ColorType::Grayscale, BitDepth::Sixteen, be16(buffer.as_raw()))
        }
        DynamicImage::ImageLumaA16(buffer) => (
            ColorType::GrayscaleAlpha,
            BitDepth::Sixteen,
            be16(buffer.as_raw()),
        ),
        DynamicImage::ImageRgb16(buffer) => (ColorType::Rgb, BitDepth::Sixteen, be16(buffer.as_raw())),
        DynamicImage::ImageRgba16(buffer) => {
            (ColorType::Rgba, BitDepth::Sixteen, be16(buffer.as_raw()))
        }
        DynamicImage::ImageRgb32F(_) => (ColorType::Rgb, BitDepth::Sixteen, be16(image.to_rgb16().as_raw())),
        other => (ColorType::Rgba, BitDepth::Sixteen, be16(other.to_rgba16().as_raw())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::exif_with_make;

    #[test]
    fn app1_segment_follows_soi() {
        let jpeg = [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x02, 0xFF, 0xD9];
        let exif = exif_with_make("Acme Optics");

        let spliced = insert_jpeg_exif(&jpeg, &exif).expect("splice");

        assert_eq!(&spliced[..4], &[0xFF, 0xD8, 0xFF, 0xE1]);
        let len = u16::from_be_bytes([spliced[4], spliced[5]]) as usize;
        assert_eq!(len, 2 + 6 + exif.len());
        assert_eq!(&spliced[6..12], b"Exif\0\0");
        assert_eq!(&spliced[12..12 + exif.len()], exif.as_slice());
        assert_eq!(&spliced[12 + exif.len()..], &jpeg[2..]);
    }

    #[test]
    fn rejects_non_jpeg_and_oversized_blocks() {
        assert!(insert_jpeg_exif(b"\x89PNG", b"MM").is_none());
        let huge = vec![0_u8; 70_000];
        assert!(insert_jpeg_exif(&[0xFF, 0xD8, 0xFF, 0xD9], &huge).is_none());
    }
}
