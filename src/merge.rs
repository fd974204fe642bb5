use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::{Error, Result};
use crate::grouper::SessionGroup;
use crate::platform::Platform;
use crate::playlist::Playlist;
use crate::report::{Event, Reporter};
use crate::timestamps;

/// Joins session chapters with ffmpeg's concat demuxer.
pub struct Merger<'a> {
    ffmpeg: PathBuf,
    platform: &'a dyn Platform,
}

impl<'a> Merger<'a> {
    pub fn new(ffmpeg: impl Into<PathBuf>, platform: &'a dyn Platform) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
            platform,
        }
    }

    pub fn output_path(folder: &Path, session: &str) -> PathBuf {
        folder.join(format!("{}.mp4", session))
    }

    /// Merges one session into `<folder>/<id>.mp4` and returns its path.
    ///
    /// `folder` must be absolute; the playlist references the segments by
    /// absolute path. The playlist is removed whatever ffmpeg does.
    pub fn merge_group(
        &self,
        folder: &Path,
        group: &SessionGroup,
        reporter: &mut dyn Reporter,
    ) -> Result<PathBuf> {
        reporter.report(Event::MergeStarted {
            session: group.id.clone(),
            files: group.files.len(),
        });

        let output_file = Self::output_path(folder, &group.id);
        {
            let playlist = Playlist::write(folder, &group.id, &group.files)?;
            self.run_ffmpeg(&group.id, playlist.path(), &output_file)?;
        }

        // Copy creation date from the first file in the group
        let source_file = folder.join(&group.files[0]);
        timestamps::copy_creation_date(&source_file, &output_file, self.platform)?;

        reporter.report(Event::MergeCreated {
            session: group.id.clone(),
            output: output_file.clone(),
        });
        Ok(output_file)
    }

    fn run_ffmpeg(&self, session: &str, list_path: &Path, output_file: &Path) -> Result<()> {
        let args = concat_args(list_path, output_file);
        tracing::debug!(
            "Running: {} {}",
            self.ffmpeg.display(),
            args.iter()
                .map(|arg| arg.to_string_lossy())
                .collect::<Vec<_>>()
                .join(" ")
        );

        let status = Command::new(&self.ffmpeg)
            .args(&args)
            .stdin(Stdio::null())
            .status()
            .map_err(|source| Error::Spawn {
                program: self.ffmpeg.display().to_string(),
                source,
            })?;

        if !status.success() {
            return Err(Error::MergeFailed {
                session: session.to_string(),
                status,
            });
        }

        tracing::info!("ffmpeg finished session {}", session);
        Ok(())
    }
}

/// Arguments for a lossless concat of the playlist into `output_file`.
/// `-y` lets a second run overwrite an earlier output.
pub fn concat_args(list_path: &Path, output_file: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = ["-y", "-f", "concat", "-safe", "0", "-i"]
        .iter()
        .map(OsString::from)
        .collect();
    args.push(list_path.as_os_str().to_owned());
    args.push("-c".into());
    args.push("copy".into());
    args.push(output_file.as_os_str().to_owned());
    args
}
