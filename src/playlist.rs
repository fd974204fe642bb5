use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::utils;

/// Concat demuxer playlist for one session. The file is removed when the
/// value is dropped, so it never outlives a merge attempt.
#[derive(Debug)]
pub struct Playlist {
    path: PathBuf,
}

impl Playlist {
    pub fn file_name(session: &str) -> String {
        format!("file_list_{}.txt", session)
    }

    pub fn write(folder: &Path, session: &str, files: &[String]) -> Result<Self> {
        let path = folder.join(Self::file_name(session));
        let contents: String = files
            .iter()
            .map(|file| utils::concat_line(&folder.join(file)))
            .collect();

        fs::write(&path, contents).map_err(|e| Error::io(&path, e))?;
        tracing::debug!("Wrote playlist {}", path.display());

        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for Playlist {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            tracing::warn!("Could not remove playlist {}: {}", self.path.display(), e);
        }
    }
}
