//! Text chunks (`tEXt`, `zTXt`, `iTXt`) stored in PNG headers.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::InspectError;

pub fn read_png_text(path: &Path) -> Result<BTreeMap<String, String>, InspectError> {
    let file = File::open(path).map_err(|source| InspectError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = png::Decoder::new(BufReader::new(file)).read_info()?;
    let info = reader.info();

    let mut text = BTreeMap::new();
    for chunk in &info.uncompressed_latin1_text {
        text.insert(chunk.keyword.clone(), chunk.text.clone());
    }
    for chunk in &info.compressed_latin1_text {
        text.insert(chunk.keyword.clone(), chunk.get_text()?);
    }
    for chunk in &info.utf8_text {
        text.insert(chunk.keyword.clone(), chunk.get_text()?);
    }

    Ok(text)
}
