use std::io;
use std::path::{Path, PathBuf};

pub fn has_mp4_extension(file_name: &str) -> bool {
    file_name.len() >= 4
        && file_name.is_char_boundary(file_name.len() - 4)
        && file_name[file_name.len() - 4..].eq_ignore_ascii_case(".mp4")
}

/// One line of an ffmpeg concat demuxer playlist.
///
/// Single quotes can't appear inside a quoted string, so they are closed,
/// escaped and reopened (`'\''`).
pub fn concat_line(path: &Path) -> String {
    let escaped = path.to_string_lossy().replace('\'', r"'\''");
    format!("file '{}'\n", escaped)
}

pub fn absolute_dir(dir: &Path) -> io::Result<PathBuf> {
    if dir.is_absolute() {
        Ok(dir.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(dir))
    }
}
