use regex::Regex;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use crate::error::{Error, Result};
use crate::utils;

/// All chapters of one recording, sorted by filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionGroup {
    pub id: String,
    pub files: Vec<String>,
}

// GOPR1234.MP4 is the first chapter, GP011234.MP4 / GX011234.MP4 the following ones.
fn segment_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^(?:GOPR|GP\d{2}|GX\d{2})(\d{4})\.MP4$").expect("segment pattern is valid")
    })
}

/// Returns the session id for a chaptered GoPro filename.
pub fn session_id(file_name: &str) -> Option<&str> {
    if !utils::has_mp4_extension(file_name) {
        return None;
    }
    segment_pattern()
        .captures(file_name)
        .and_then(|caps| caps.get(1))
        .map(|id| id.as_str())
}

/// Scans the top level of `folder` and groups GoPro segments by session id.
///
/// Groups come back ordered by id, each with its files sorted ascending.
/// Anything that isn't a recognised segment is skipped.
pub fn find_gopro_groups(folder: &Path) -> Result<Vec<SessionGroup>> {
    let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for entry in fs::read_dir(folder).map_err(|e| Error::io(folder, e))? {
        let entry = entry.map_err(|e| Error::io(folder, e))?;
        if entry.file_type().map_or(true, |t| t.is_dir()) {
            continue;
        }

        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            tracing::trace!("Skipping non UTF-8 filename {:?}", file_name);
            continue;
        };

        match session_id(name) {
            Some(id) => groups.entry(id.to_string()).or_default().push(name.to_string()),
            None => tracing::trace!("Skipping {}", name),
        }
    }

    Ok(groups
        .into_iter()
        .map(|(id, mut files)| {
            files.sort();
            SessionGroup { id, files }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    fn folder_with(names: &[&str]) -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        for name in names {
            File::create(dir.path().join(name)).unwrap();
        }
        dir
    }

    #[test]
    fn recognises_all_naming_conventions() {
        assert_eq!(session_id("GOPR0100.MP4"), Some("0100"));
        assert_eq!(session_id("GP010100.MP4"), Some("0100"));
        assert_eq!(session_id("GX020417.MP4"), Some("0417"));
        assert_eq!(session_id("gopr0100.mp4"), Some("0100"));
    }

    #[test]
    fn rejects_other_names() {
        for name in [
            "GOPR0100.THM",
            "GOPR0100.LRV",
            "GOPR010.MP4",
            "GOPR01000.MP4",
            "GP10100.MP4",
            "GH010100.MP4",
            "XGOPR0100.MP4",
            "0100.mp4",
            "file_list_0100.txt",
        ] {
            assert_eq!(session_id(name), None, "{name} should not match");
        }
    }

    #[test]
    fn groups_chapters_in_filename_order() {
        let dir = folder_with(&["GP020100.MP4", "GOPR0100.MP4", "GP010100.MP4"]);

        let groups = find_gopro_groups(dir.path()).unwrap();

        assert_eq!(
            groups,
            vec![SessionGroup {
                id: "0100".to_string(),
                files: vec![
                    "GOPR0100.MP4".to_string(),
                    "GP010100.MP4".to_string(),
                    "GP020100.MP4".to_string(),
                ],
            }]
        );
    }

    #[test]
    fn separates_sessions_and_skips_noise() {
        let dir = folder_with(&[
            "GX010417.MP4",
            "GOPR0100.MP4",
            "GX020417.MP4",
            "GP010100.MP4",
            "GOPR0100.THM",
            "notes.txt",
            "0100.mp4",
            "GOPR12.MP4",
        ]);
        std::fs::create_dir(dir.path().join("GOPR0999.MP4")).unwrap();

        let groups = find_gopro_groups(dir.path()).unwrap();

        let ids: Vec<&str> = groups.iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, ["0100", "0417"]);
        assert_eq!(groups[0].files, ["GOPR0100.MP4", "GP010100.MP4"]);
        assert_eq!(groups[1].files, ["GX010417.MP4", "GX020417.MP4"]);
    }

    #[test]
    fn empty_folder_has_no_groups() {
        let dir = folder_with(&[]);
        assert!(find_gopro_groups(dir.path()).unwrap().is_empty());

        let dir = folder_with(&["holiday.mov", "readme.md"]);
        assert!(find_gopro_groups(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn missing_folder_is_an_io_error() {
        let dir = folder_with(&[]);
        let missing = dir.path().join("nope");
        assert!(matches!(find_gopro_groups(&missing), Err(Error::Io { .. })));
    }
}
