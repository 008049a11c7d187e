//! EXIF extraction through kamadak-exif.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::InspectError;

/// Maps every EXIF field to its displayed value, keyed by standard tag name.
///
/// Fields outside the primary image are prefixed with their IFD so the
/// thumbnail's tags do not shadow the main ones.
pub fn read_exif_tags(path: &Path) -> Result<BTreeMap<String, String>, InspectError> {
    let Some(exif) = read_container(path)? else {
        return Ok(BTreeMap::new());
    };

    let mut tags = BTreeMap::new();
    for field in exif.fields() {
        let name = if field.ifd_num == exif::In::PRIMARY {
            field.tag.to_string()
        } else {
            format!("{}.{}", field.ifd_num, field.tag)
        };
        let value = field.display_value().with_unit(&exif).to_string();
        tags.entry(name).or_insert(value);
    }

    Ok(tags)
}

/// Raw TIFF-structured EXIF block, exactly as stored in the container.
pub fn read_exif_blob(path: &Path) -> Result<Option<Vec<u8>>, InspectError> {
    Ok(read_container(path)?.map(|exif| exif.buf().to_vec()))
}

fn read_container(path: &Path) -> Result<Option<exif::Exif>, InspectError> {
    let file = File::open(path).map_err(|source| InspectError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = BufReader::new(file);

    match exif::Reader::new().read_from_container(&mut reader) {
        Ok(exif) => Ok(Some(exif)),
        Err(exif::Error::NotFound(_)) | Err(exif::Error::BlankValue(_)) => Ok(None),
        Err(other) => Err(InspectError::Exif(other)),
    }
}
