//! Atomic file replacement.

use super::SyncError;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Replace `path` with `bytes` so that readers see either the old or the new
/// content, never a partial file.
///
/// The temporary file is created in the destination directory (a rename
/// across filesystems is not atomic) and removed on any failure.
pub fn atomic_write(path: &Path, bytes: &[u8]) -> Result<(), SyncError> {
    let dir = path.parent().unwrap_or(Path::new("."));

    let mut tmp = tempfile::Builder::new()
        .prefix(".gluesync-")
        .tempfile_in(dir)
        .map_err(|e| SyncError::write(dir, e))?;

    tmp.write_all(bytes)
        .and_then(|()| tmp.as_file().sync_all())
        .map_err(|e| SyncError::write(path, e))?;

    // NamedTempFile is created 0600; the copy must stay readable by the server
    let permissions = match fs::metadata(path) {
        Ok(meta) => Some(meta.permissions()),
        Err(_) => default_permissions(),
    };
    if let Some(permissions) = permissions {
        tmp.as_file()
            .set_permissions(permissions)
            .map_err(|e| SyncError::write(path, e))?;
    }

    tmp.persist(path)
        .map_err(|e| SyncError::write(path, e.error))?;
    Ok(())
}

#[cfg(unix)]
fn default_permissions() -> Option<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn default_permissions() -> Option<fs::Permissions> {
    None
}
