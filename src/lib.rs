//! Strip embedded metadata (EXIF, PNG text chunks, document properties) from
//! files before sharing them.

pub mod config;
pub mod directory;
pub mod error;
pub mod formats;
pub mod formatting;
pub mod inspector;
pub mod logging;
pub mod report;
pub mod stripper;
pub mod ui;
pub mod worker;

#[cfg(test)]
mod test_helpers;
