use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use tracing::{info, warn};

/// Serialize with the 4-space indentation the status board's file has always used.
pub fn to_pretty_json<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut ser)?;
    Ok(buf)
}

/// Replace the document at `path`. An existing file is only checked for
/// well-formed JSON so a corrupt one gets reported before it is overwritten.
pub fn write_document<T: Serialize>(path: &Path, doc: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    check_existing(path);

    let bytes = to_pretty_json(doc)?;
    fs::write(path, bytes).with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Updated {} with new data", path.display());
    Ok(())
}

fn check_existing(path: &Path) {
    if !path.exists() {
        info!("File {} does not exist, creating a new file", path.display());
        return;
    }
    match fs::read_to_string(path) {
        Ok(text) => match serde_json::from_str::<serde_json::Value>(&text) {
            Ok(_) => info!("Read existing data from {}", path.display()),
            Err(e) => warn!(
                "Existing file {} contains invalid JSON ({}), it will be overwritten",
                path.display(),
                e
            ),
        },
        Err(e) => warn!(
            "Could not read existing file {} ({}), it will be overwritten",
            path.display(),
            e
        ),
    }
}
