use crate::error::{Result, WorkshopError};
use crate::ui;
use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::{Read, Seek};
use std::path::{Path, PathBuf};
use zip::ZipArchive;

/// Extract `archive` into `out_dir` and return the extracted root directory.
///
/// The root is named by the archive's own first entry (GitHub zipballs use
/// `{repo}-{sha}/`). A stale root left by an earlier run is removed first.
pub(crate) fn extract_archive(archive: &Path, out_dir: &Path) -> Result<PathBuf> {
    let file = File::open(archive).map_err(|e| {
        WorkshopError::DownloadFailure(format!("Cannot open {}: {}", archive.display(), e))
    })?;
    let mut zip = ZipArchive::new(file).map_err(|e| {
        WorkshopError::DownloadFailure(format!("Invalid archive {}: {}", archive.display(), e))
    })?;

    let root = archive_root(&mut zip)?;
    let root_path = out_dir.join(&root);
    if root_path.exists() {
        fs::remove_dir_all(&root_path).map_err(|e| WorkshopError::io_at(&root_path, e))?;
    }

    let strays = stray_entries(&zip, &root);
    zip.extract(out_dir).map_err(|e| {
        WorkshopError::DownloadFailure(format!("Failed to extract {}: {}", archive.display(), e))
    })?;
    remove_strays(out_dir, &strays);

    Ok(root_path)
}

/// Top-level names in the archive other than `root`.
fn stray_entries<R: Read + Seek>(zip: &ZipArchive<R>, root: &str) -> BTreeSet<String> {
    zip.file_names()
        .filter_map(|name| name.split('/').find(|part| !part.is_empty()))
        .filter(|top| *top != root && *top != "." && *top != "..")
        .map(str::to_string)
        .collect()
}

fn remove_strays(out_dir: &Path, strays: &BTreeSet<String>) {
    for name in strays {
        let path = out_dir.join(name);
        let removed = match fs::symlink_metadata(&path) {
            Ok(meta) if meta.is_dir() => fs::remove_dir_all(&path),
            Ok(_) => fs::remove_file(&path),
            Err(_) => continue,
        };
        if let Err(e) = removed {
            ui::verbose(&format!("Could not remove {}: {}", path.display(), e));
        }
    }
}

fn archive_root<R: Read + Seek>(zip: &mut ZipArchive<R>) -> Result<String> {
    if zip.is_empty() {
        return Err(WorkshopError::DownloadFailure(
            "Archive is empty".to_string(),
        ));
    }

    let (name, is_dir) = {
        let first = zip.by_index(0).map_err(|e| {
            WorkshopError::DownloadFailure(format!("Unreadable archive entry: {}", e))
        })?;
        (first.name().to_string(), first.is_dir())
    };

    let mut components = name.split('/').filter(|part| !part.is_empty());
    let root = components.next();
    let nested = components.next().is_some();

    match root {
        Some(root) if (is_dir || nested) && root != ".." && root != "." => Ok(root.to_string()),
        _ => Err(WorkshopError::DownloadFailure(format!(
            "Archive has no top-level directory (first entry: '{}')",
            name
        ))),
    }
}
