use crate::core::types::InstalledWorkshop;
use crate::error::{Result, WorkshopError};
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::Path;

#[derive(Serialize)]
struct StateDocumentRef<'a> {
    workshops: &'a [InstalledWorkshop],
}

pub(super) fn write_state_atomically(path: &Path, workshops: &[InstalledWorkshop]) -> Result<()> {
    let dir = path.parent().ok_or_else(|| {
        WorkshopError::Other(format!(
            "Invalid state path (no parent directory): {}",
            path.display()
        ))
    })?;
    fs::create_dir_all(dir).map_err(|e| WorkshopError::io_at(dir, e))?;

    let content = serde_json::to_string_pretty(&StateDocumentRef { workshops })
        .map_err(|e| WorkshopError::SerializationError(format!("State serialization: {}", e)))?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "state".to_string());
    let tmp_path = dir.join(format!("{}.tmp", file_name));
    let mut tmp_file = fs::File::create(&tmp_path).map_err(|e| WorkshopError::io_at(&tmp_path, e))?;

    tmp_file
        .write_all(content.as_bytes())
        .map_err(|e| WorkshopError::io_at(&tmp_path, e))?;
    tmp_file
        .sync_all()
        .map_err(|e| WorkshopError::io_at(&tmp_path, e))?;
    drop(tmp_file);

    fs::rename(&tmp_path, path).map_err(|e| WorkshopError::io_at(path, e))?;

    Ok(())
}
