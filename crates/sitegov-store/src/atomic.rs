//! Crash-safe file replacement.
//!
//! Writes go to a sibling temp file which is flushed, synced and renamed
//! over the target; the parent directory is synced afterwards so the rename
//! itself is durable. Readers see the old file or the new one, never a mix.

use crate::error::StoreError;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Atomically replace `path` with `bytes`, creating parent directories.
pub fn atomic_write(path: impl AsRef<Path>, bytes: &[u8]) -> Result<(), StoreError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
    }

    let tmp_path = tmp_write_path(path);
    let write_result = (|| -> Result<(), StoreError> {
        let file = File::create(&tmp_path).map_err(|e| StoreError::io(&tmp_path, e))?;
        let mut writer = BufWriter::new(file);
        writer
            .write_all(bytes)
            .map_err(|e| StoreError::io(&tmp_path, e))?;
        writer.flush().map_err(|e| StoreError::io(&tmp_path, e))?;
        let file = writer
            .into_inner()
            .map_err(|e| StoreError::io(&tmp_path, e))?;
        file.sync_all().map_err(|e| StoreError::io(&tmp_path, e))?;
        Ok(())
    })();

    if let Err(error) = write_result {
        let _ = fs::remove_file(&tmp_path);
        return Err(error);
    }

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        StoreError::Io {
            path: format!("{} -> {}", tmp_path.display(), path.display()),
            message: e.to_string(),
        }
    })?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        let dir = File::open(parent).map_err(|e| StoreError::io(parent, e))?;
        dir.sync_all().map_err(|e| StoreError::io(parent, e))?;
    }

    Ok(())
}

fn tmp_write_path(path: &Path) -> PathBuf {
    let unique = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let mut tmp: OsString = path.as_os_str().to_os_string();
    tmp.push(format!(".tmp.{}.{}", std::process::id(), unique));
    PathBuf::from(tmp)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn temp_path(prefix: &str, ext: &str) -> PathBuf {
        let unique = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be after unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "sitegov-store-{prefix}-{}-{unique}.{ext}",
            std::process::id()
        ))
    }

    #[test]
    fn atomic_write_replaces_file() {
        let path = temp_path("atomic", "xml");
        atomic_write(&path, b"<urlset>first</urlset>").expect("first write should succeed");
        atomic_write(&path, b"<urlset>second</urlset>").expect("second write should succeed");

        let body = fs::read_to_string(&path).expect("file should exist");
        assert_eq!(body, "<urlset>second</urlset>");

        let _ = fs::remove_file(path);
    }

    #[test]
    fn atomic_write_creates_parent_dirs() {
        let dir = temp_path("nested", "d");
        let path = dir.join("out").join("sitemap.xml");
        atomic_write(&path, b"ok").expect("nested write should succeed");
        assert_eq!(fs::read(&path).expect("file should exist"), b"ok");

        let _ = fs::remove_dir_all(dir);
    }
}
