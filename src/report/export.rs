//! Scan reports written to disk as CSV or JSON.

use serde::Serialize;
use std::fs::{self, File};
use std::path::Path;

use crate::directory::ScanHit;
use crate::error::ExportError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    /// Picks the format from the report path's extension.
    pub fn from_path(path: &Path) -> Result<Self, ExportError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            _ => Err(ExportError::UnknownFormat(path.display().to_string())),
        }
    }
}

/// One CSV line per hit; the tag lists are joined with `;`.
#[derive(Serialize)]
struct ScanRow<'a> {
    path: String,
    format: &'a str,
    mode: &'a str,
    width: u32,
    height: u32,
    exif_tags: usize,
    png_chunks: usize,
    keys: String,
}

impl<'a> From<&'a ScanHit> for ScanRow<'a> {
    fn from(hit: &'a ScanHit) -> Self {
        let info = &hit.metadata.file_info;
        let keys = hit
            .metadata
            .exif_data
            .keys()
            .chain(hit.metadata.png_metadata.keys())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(";");

        ScanRow {
            path: hit.path.display().to_string(),
            format: &info.format,
            mode: &info.mode,
            width: info.width,
            height: info.height,
            exif_tags: hit.metadata.exif_data.len(),
            png_chunks: hit.metadata.png_metadata.len(),
            keys,
        }
    }
}

pub fn export_scan(hits: &[ScanHit], path: &Path) -> Result<ExportFormat, ExportError> {
    let format = ExportFormat::from_path(path)?;
    match format {
        ExportFormat::Csv => export_csv(hits, path)?,
        ExportFormat::Json => export_json(hits, path)?,
    }
    Ok(format)
}

fn export_csv(hits: &[ScanHit], path: &Path) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_writer(File::create(path)?);
    for hit in hits {
        writer.serialize(ScanRow::from(hit))?;
    }
    writer.flush()?;
    Ok(())
}

fn export_json(hits: &[ScanHit], path: &Path) -> Result<(), ExportError> {
    let json = serde_json::to_string_pretty(hits)?;
    fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inspector::{FileInfo, ImageMetadata};
    use std::collections::BTreeMap;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn sample_hit() -> ScanHit {
        let mut exif_data = BTreeMap::new();
        exif_data.insert("Make".to_string(), "\"Acme\"".to_string());
        let mut png_metadata = BTreeMap::new();
        png_metadata.insert("Author".to_string(), "someone".to_string());

        ScanHit {
            path: PathBuf::from("/photos/a.png"),
            metadata: ImageMetadata {
                file_info: FileInfo {
                    format: "PNG".to_string(),
                    mode: "RGB".to_string(),
                    width: 4,
                    height: 2,
                },
                exif_data,
                png_metadata,
            },
        }
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(
            ExportFormat::from_path(Path::new("r.CSV")).ok(),
            Some(ExportFormat::Csv)
        );
        assert_eq!(
            ExportFormat::from_path(Path::new("r.json")).ok(),
            Some(ExportFormat::Json)
        );
        assert!(matches!(
            ExportFormat::from_path(Path::new("r.xlsx")),
            Err(ExportError::UnknownFormat(_))
        ));
    }

    #[test]
    fn csv_has_header_and_one_row_per_hit() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("report.csv");

        export_scan(&[sample_hit()], &path)?;

        let text = fs::read_to_string(&path)?;
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            "path,format,mode,width,height,exif_tags,png_chunks,keys"
        );
        assert!(lines[1].starts_with("/photos/a.png,PNG,RGB,4,2,1,1,"));
        assert!(lines[1].ends_with("Make;Author"));
        Ok(())
    }

    #[test]
    fn json_keeps_full_metadata() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("report.json");

        export_scan(&[sample_hit()], &path)?;

        let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path)?)?;
        assert_eq!(value[0]["metadata"]["exif_data"]["Make"], "\"Acme\"");
        assert_eq!(value[0]["metadata"]["file_info"]["width"], 4);
        Ok(())
    }

    #[test]
    fn unknown_format_writes_nothing() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("report.txt");

        assert!(export_scan(&[sample_hit()], &path).is_err());
        assert!(!path.exists());
        Ok(())
    }
}
