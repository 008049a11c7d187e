//! Content hashes, so a clean copy can be told apart from its source.

use md5::Md5;
use sha2::{Digest, Sha256};
use std::fs::{File, Metadata};
use std::io::Read;
use std::path::Path;

const HASH_SIZE_LIMIT: u64 = 256 * 1024 * 1024; // 256 MiB

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HashSummary {
    pub md5: String,
    pub sha256: String,
}

impl HashSummary {
    fn uniform(value: String) -> Self {
        Self {
            md5: value.clone(),
            sha256: value,
        }
    }
}

/// Hex digests of the file, or a short note when hashing does not apply.
pub fn file_hashes(path: &Path, metadata: &Metadata) -> HashSummary {
    if !metadata.is_file() {
        return HashSummary::uniform("Not applicable".to_string());
    }

    if metadata.len() > HASH_SIZE_LIMIT {
        return HashSummary::uniform(format!(
            "Skipped (> {} MiB)",
            HASH_SIZE_LIMIT / (1024 * 1024)
        ));
    }

    let mut file = match File::open(path) {
        Ok(file) => file,
        Err(error) => return HashSummary::uniform(format!("Unavailable ({error})")),
    };

    let mut md5 = Md5::new();
    let mut sha256 = Sha256::new();
    let mut buffer = [0_u8; 8192];
    loop {
        match file.read(&mut buffer) {
            Ok(0) => break,
            Ok(bytes_read) => {
                md5.update(&buffer[..bytes_read]);
                sha256.update(&buffer[..bytes_read]);
            }
            Err(error) => return HashSummary::uniform(format!("Unavailable ({error})")),
        }
    }

    HashSummary {
        md5: format!("{:x}", md5.finalize()),
        sha256: format!("{:x}", sha256.finalize()),
    }
}
