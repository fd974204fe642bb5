use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Reading the folder or writing the playlist failed.
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An external program could not be started at all.
    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("ffmpeg exited with {status} while merging session {session}")]
    MergeFailed { session: String, status: ExitStatus },

    #[error("Failed to copy timestamps onto '{path}': {source}")]
    Timestamps {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Folder picker failed: {0}")]
    Picker(String),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
