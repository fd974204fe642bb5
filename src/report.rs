use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;

/// Everything the tool tells the user about a run.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    NoFolder,
    PickerFailed { error: String },
    InvalidFolder { path: Option<PathBuf> },
    NoSegments { path: PathBuf },
    SessionFound { session: String, files: Vec<String> },
    MergeStarted { session: String, files: usize },
    MergeCreated { session: String, output: PathBuf },
    MergeFailed { session: String, error: String },
    Summary { merged: usize, failed: usize, skipped: usize },
}

pub trait Reporter {
    fn report(&mut self, event: Event);
}

/// Human readable lines on stdout.
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn report(&mut self, event: Event) {
        println!("{}", console_line(&event));
    }
}

pub fn console_line(event: &Event) -> String {
    match event {
        Event::NoFolder => "No folder path provided. Opening folder picker...".to_string(),
        Event::PickerFailed { error } => format!("Error opening folder picker: {}", error),
        Event::InvalidFolder { .. } => "Invalid folder path.".to_string(),
        Event::NoSegments { path } => {
            format!("No GoPro video segments found at {}.", path.display())
        }
        Event::SessionFound { session, files } => {
            format!("Session {}: {}", session, files.join(", "))
        }
        Event::MergeStarted { session, files } => {
            format!("Merging session {} with {} files...", session, files)
        }
        Event::MergeCreated { output, .. } => format!("Created: {}", output.display()),
        Event::MergeFailed { session, error } => {
            format!("Failed to merge session {}: {}", session, error)
        }
        Event::Summary {
            merged,
            failed,
            skipped,
        } => {
            if *skipped > 0 {
                format!(
                    "Done! Merged {} sessions, {} failed, {} not attempted.",
                    merged, failed, skipped
                )
            } else {
                format!("Done! Merged {} sessions, {} failed.", merged, failed)
            }
        }
    }
}

/// One JSON object per line, for scripts.
pub struct JsonReporter<W: Write> {
    out: W,
}

impl JsonReporter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> JsonReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for JsonReporter<W> {
    fn report(&mut self, event: Event) {
        let written = serde_json::to_writer(&mut self.out, &event)
            .map_err(io::Error::from)
            .and_then(|_| writeln!(self.out));
        if let Err(e) = written {
            tracing::error!("Failed to write event {:?}: {}", event, e);
        }
    }
}

/// Collects events in memory.
#[cfg(test)]
#[derive(Default)]
pub struct MemoryReporter {
    pub events: Vec<Event>,
}

#[cfg(test)]
impl Reporter for MemoryReporter {
    fn report(&mut self, event: Event) {
        self.events.push(event);
    }
}
