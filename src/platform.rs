//! OS-specific helpers, chosen once at startup.
//!
//! Only macOS has a folder picker and a way to set a file's creation date
//! (`osascript` and `SetFile` from the developer tools). Everywhere else
//! both are no-ops.

use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::SystemTime;

use crate::error::{Error, Result};

const PICKER_SCRIPT: &str =
    r#"POSIX path of (choose folder with prompt "Select GoPro Video Folder")"#;
const STARTUP_VOLUME: &str = "Macintosh HD";

pub trait Platform {
    fn name(&self) -> &'static str;

    /// Asks the user for a folder. `Ok(None)` when cancelled or unsupported.
    fn pick_folder(&self) -> Result<Option<PathBuf>>;

    /// Sets the creation date of `target`. Best effort.
    fn set_creation_time(&self, target: &Path, created: SystemTime) -> Result<()>;
}

pub fn current() -> Box<dyn Platform> {
    if cfg!(target_os = "macos") {
        Box::new(MacOs)
    } else {
        Box::new(Generic)
    }
}

pub struct MacOs;

impl Platform for MacOs {
    fn name(&self) -> &'static str {
        "macos"
    }

    fn pick_folder(&self) -> Result<Option<PathBuf>> {
        let output = Command::new("osascript")
            .args(["-e", PICKER_SCRIPT])
            .stdin(Stdio::null())
            .output()
            .map_err(|e| Error::Picker(e.to_string()))?;

        if !output.status.success() {
            tracing::info!("Folder picker closed without a selection");
            return Ok(None);
        }

        let selection = String::from_utf8_lossy(&output.stdout);
        Ok(picker_output_to_path(&selection))
    }

    fn set_creation_time(&self, target: &Path, created: SystemTime) -> Result<()> {
        let date = setfile_date(created);
        tracing::debug!("SetFile -d {:?} {}", date, target.display());

        let status = Command::new("SetFile")
            .arg("-d")
            .arg(&date)
            .arg(target)
            .status()
            .map_err(|source| Error::Spawn {
                program: "SetFile".to_string(),
                source,
            })?;

        if !status.success() {
            return Err(Error::Timestamps {
                path: target.to_path_buf(),
                source: std::io::Error::new(
                    std::io::ErrorKind::Other,
                    format!("SetFile exited with {}", status),
                ),
            });
        }
        Ok(())
    }
}

pub struct Generic;

impl Platform for Generic {
    fn name(&self) -> &'static str {
        "generic"
    }

    fn pick_folder(&self) -> Result<Option<PathBuf>> {
        tracing::warn!("No folder picker is available on this platform");
        Ok(None)
    }

    fn set_creation_time(&self, target: &Path, _created: SystemTime) -> Result<()> {
        tracing::trace!("Leaving creation time of {} untouched", target.display());
        Ok(())
    }
}

/// Date string in the form `SetFile -d` expects, in local time.
pub fn setfile_date(time: SystemTime) -> String {
    DateTime::<Local>::from(time)
        .format("%m/%d/%Y %H:%M:%S")
        .to_string()
}

fn picker_output_to_path(output: &str) -> Option<PathBuf> {
    let selection = output.trim();
    if selection.is_empty() {
        return None;
    }
    if selection.starts_with('/') {
        let trimmed = selection.trim_end_matches('/');
        return Some(PathBuf::from(if trimmed.is_empty() { "/" } else { trimmed }));
    }
    Some(hfs_to_posix(selection))
}

/// Converts an HFS path such as `Macintosh HD:Users:me:GoPro:` (optionally
/// prefixed with `alias `) into a POSIX path.
pub fn hfs_to_posix(hfs: &str) -> PathBuf {
    let hfs = hfs.trim().trim_start_matches("alias ").trim_end_matches(':');
    let (volume, rest) = hfs.split_once(':').unwrap_or((hfs, ""));

    let mut path = if volume == STARTUP_VOLUME {
        PathBuf::from("/")
    } else {
        PathBuf::from("/Volumes").join(volume)
    };
    // '/' in an HFS name is ':' in POSIX.
    for component in rest.split(':').filter(|c| !c.is_empty()) {
        path.push(component.replace('/', ":"));
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn startup_volume_maps_to_root() {
        assert_eq!(
            hfs_to_posix("Macintosh HD:Users:me:GoPro:"),
            PathBuf::from("/Users/me/GoPro")
        );
    }

    #[test]
    fn alias_prefix_is_stripped() {
        assert_eq!(
            hfs_to_posix("alias Macintosh HD:Users:me:Trip 2024:\n"),
            PathBuf::from("/Users/me/Trip 2024")
        );
    }

    #[test]
    fn other_volumes_live_under_volumes() {
        assert_eq!(
            hfs_to_posix("GOPRO SD:DCIM:100GOPRO:"),
            PathBuf::from("/Volumes/GOPRO SD/DCIM/100GOPRO")
        );
        assert_eq!(hfs_to_posix("Backup"), PathBuf::from("/Volumes/Backup"));
    }

    #[test]
    fn slash_in_hfs_name_becomes_colon() {
        assert_eq!(
            hfs_to_posix("Macintosh HD:Users:me:01/02 ride:"),
            PathBuf::from("/Users/me/01:02 ride")
        );
    }

    #[test]
    fn posix_picker_output_is_used_as_is() {
        assert_eq!(
            picker_output_to_path("/Users/me/GoPro/\n"),
            Some(PathBuf::from("/Users/me/GoPro"))
        );
        assert_eq!(picker_output_to_path("/"), Some(PathBuf::from("/")));
        assert_eq!(picker_output_to_path("  \n"), None);
    }

    #[test]
    fn setfile_date_uses_us_layout() {
        let time = Local.with_ymd_and_hms(2024, 7, 4, 9, 5, 30).unwrap();
        assert_eq!(setfile_date(time.into()), "07/04/2024 09:05:30");
    }

    #[test]
    fn generic_platform_does_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("0100.mp4");
        assert!(Generic.pick_folder().unwrap().is_none());
        assert!(Generic.set_creation_time(&target, SystemTime::now()).is_ok());
        assert!(!target.exists());
    }
}
