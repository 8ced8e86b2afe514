//! Utility functions for error handling
//!
//! Artifact and data files are opened through these helpers so that a
//! missing file surfaces as a configuration error naming its purpose.

use std::fs;
use std::io;
use std::path::Path;

use crate::error::{IndicationError, Result};

/// Open a file, mapping absence to a configuration error
///
/// # Arguments
/// * `path` - The path to the file to open
/// * `purpose` - Why the file is being opened (for error context)
pub fn safe_open_file(path: &Path, purpose: &str) -> Result<fs::File> {
    if !path.exists() {
        return Err(IndicationError::config_at(
            format!("{purpose} not found"),
            path,
        ));
    }

    if !path.is_file() {
        return Err(IndicationError::config_at(
            format!("Expected a file for {purpose}"),
            path,
        ));
    }

    fs::File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::PermissionDenied => IndicationError::config_at(
            format!("Permission denied while opening {purpose}"),
            path,
        ),
        _ => IndicationError::io_at(e, path),
    })
}

/// Read a text artifact to a string
pub fn safe_read_to_string(path: &Path, purpose: &str) -> Result<String> {
    let mut file = safe_open_file(path, purpose)?;

    let mut content = String::new();
    match io::Read::read_to_string(&mut file, &mut content) {
        Ok(_) => Ok(content),
        Err(e) if e.kind() == io::ErrorKind::InvalidData => Err(IndicationError::config_at(
            format!("{purpose} contains invalid UTF-8 data"),
            path,
        )),
        Err(e) => Err(IndicationError::io_at(e, path)),
    }
}
