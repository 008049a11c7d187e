//! Fixture builders shared by the unit tests.

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::fs::File;
use std::io::{BufWriter, Cursor};
use std::path::Path;

use crate::stripper::insert_jpeg_exif;

/// Big-endian TIFF structure holding a single IFD0 `Make` tag.
pub fn exif_with_make(make: &str) -> Vec<u8> {
    let mut value = make.as_bytes().to_vec();
    value.push(0);
    assert!(value.len() > 4, "make must not fit inline in the IFD entry");

    let mut tiff = Vec::new();
    tiff.extend_from_slice(b"MM\x00\x2a");
    tiff.extend_from_slice(&8_u32.to_be_bytes());
    tiff.extend_from_slice(&1_u16.to_be_bytes());
    tiff.extend_from_slice(&0x010f_u16.to_be_bytes());
    tiff.extend_from_slice(&2_u16.to_be_bytes());
    tiff.extend_from_slice(&(value.len() as u32).to_be_bytes());
    // header (8) + entry count (2) + one entry (12) + next IFD offset (4)
    tiff.extend_from_slice(&26_u32.to_be_bytes());
    tiff.extend_from_slice(&0_u32.to_be_bytes());
    tiff.extend_from_slice(&value);
    tiff
}

pub fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 7 % 256) as u8, (y * 13 % 256) as u8, ((x + y) % 256) as u8])
    })
}

/// Writes an RGB PNG carrying an optional `eXIf` chunk and `tEXt` entries.
pub fn write_png(
    path: &Path,
    width: u32,
    height: u32,
    exif: Option<&[u8]>,
    text: &[(&str, &str)],
) -> Result<(), Box<dyn std::error::Error>> {
    let pixels = gradient(width, height);
    let file = BufWriter::new(File::create(path)?);
    let mut encoder = png::Encoder::new(file, width, height);
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);
    for (keyword, value) in text {
        encoder.add_text_chunk(keyword.to_string(), value.to_string())?;
    }

    let mut writer = encoder.write_header()?;
    if let Some(exif) = exif {
        writer.write_chunk(png::chunk::ChunkType(*b"eXIf"), exif)?;
    }
    writer.write_image_data(pixels.as_raw())?;
    writer.finish()?;
    Ok(())
}

/// Writes a baseline JPEG, optionally with an EXIF APP1 segment.
pub fn write_jpeg(
    path: &Path,
    width: u32,
    height: u32,
    exif: Option<&[u8]>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(gradient(width, height))
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Jpeg)?;
    if let Some(exif) = exif {
        bytes = insert_jpeg_exif(&bytes, exif).ok_or("could not splice EXIF")?;
    }
    std::fs::write(path, bytes)?;
    Ok(())
}

/// Saves `image` through the image crate in the format implied by `path`.
pub fn write_image(path: &Path, image: &DynamicImage) -> Result<(), Box<dyn std::error::Error>> {
    image.save(path)?;
    Ok(())
}
