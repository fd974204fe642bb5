use filetime::FileTime;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::platform::Platform;

/// Copies the access and modification times of `source` onto `target`, and
/// the creation time where the platform supports setting it.
pub fn copy_creation_date(source: &Path, target: &Path, platform: &dyn Platform) -> Result<()> {
    let metadata = fs::metadata(source).map_err(|e| Error::io(source, e))?;

    let atime = FileTime::from_last_access_time(&metadata);
    let mtime = FileTime::from_last_modification_time(&metadata);
    filetime::set_file_times(target, atime, mtime).map_err(|e| Error::Timestamps {
        path: target.to_path_buf(),
        source: e,
    })?;
    tracing::debug!("Copied access/modified times from {}", source.display());

    // Not every filesystem records a birth time.
    let created = metadata.created().or_else(|_| metadata.modified());
    match created {
        Ok(created) => {
            if let Err(e) = platform.set_creation_time(target, created) {
                tracing::warn!("Could not set creation time on {}: {}", target.display(), e);
            }
        }
        Err(e) => tracing::warn!("No creation time available for {}: {}", source.display(), e),
    }

    Ok(())
}
