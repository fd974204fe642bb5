use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

mod error;
mod grouper;
mod logging;
mod merge;
mod platform;
mod playlist;
mod report;
mod timestamps;
mod utils;

use merge::Merger;
use platform::Platform;
use report::{ConsoleReporter, Event, JsonReporter, Reporter};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Directory containing GoPro segments. Opens a folder picker when omitted (macOS only).
    directory: Option<PathBuf>,

    /// ffmpeg binary used for merging
    #[arg(long, env = "GOPROMERGE_FFMPEG", default_value = "ffmpeg")]
    ffmpeg: PathBuf,

    /// Keep merging the remaining sessions after one fails
    #[arg(short, long, default_value_t = false)]
    keep_going: bool,

    /// Only list the sessions that would be merged
    #[arg(short = 'n', long, default_value_t = false)]
    dry_run: bool,

    /// Print one JSON object per event instead of text
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Verbose mode
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

#[derive(Debug, PartialEq, Eq)]
enum Outcome {
    InvalidFolder,
    NoSegments,
    DryRun { sessions: usize },
    Finished {
        merged: usize,
        failed: usize,
        skipped: usize,
    },
}

impl Outcome {
    fn exit_code(&self) -> ExitCode {
        match self {
            Outcome::InvalidFolder => ExitCode::FAILURE,
            Outcome::Finished { failed, .. } if *failed > 0 => ExitCode::FAILURE,
            _ => ExitCode::SUCCESS,
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    logging::init(args.verbose);

    let platform = platform::current();
    tracing::debug!("Using {} platform services", platform.name());

    let outcome = if args.json {
        run(&args, platform.as_ref(), &mut JsonReporter::stdout())
    } else {
        run(&args, platform.as_ref(), &mut ConsoleReporter)
    };
    outcome.exit_code()
}

fn run(args: &Args, platform: &dyn Platform, reporter: &mut dyn Reporter) -> Outcome {
    let folder = match &args.directory {
        Some(directory) => Some(directory.clone()),
        None => ask_folder(platform, reporter),
    };

    let folder = match validate_directory(folder) {
        Ok(folder) => folder,
        Err(path) => {
            reporter.report(Event::InvalidFolder { path });
            return Outcome::InvalidFolder;
        }
    };

    let groups = match grouper::find_gopro_groups(&folder) {
        Ok(groups) => groups,
        Err(error) => {
            tracing::error!("{}", error);
            reporter.report(Event::InvalidFolder { path: Some(folder) });
            return Outcome::InvalidFolder;
        }
    };

    if groups.is_empty() {
        reporter.report(Event::NoSegments { path: folder });
        return Outcome::NoSegments;
    }

    if args.dry_run {
        let sessions = groups.len();
        for group in groups {
            reporter.report(Event::SessionFound {
                session: group.id,
                files: group.files,
            });
        }
        return Outcome::DryRun { sessions };
    }

    let merger = Merger::new(&args.ffmpeg, platform);
    let (mut merged, mut failed, mut skipped) = (0, 0, 0);

    for (index, group) in groups.iter().enumerate() {
        match merger.merge_group(&folder, group, reporter) {
            Ok(_) => merged += 1,
            Err(error) => {
                tracing::error!("Session {}: {}", group.id, error);
                reporter.report(Event::MergeFailed {
                    session: group.id.clone(),
                    error: error.to_string(),
                });
                failed += 1;

                if !args.keep_going {
                    skipped = groups.len() - index - 1;
                    break;
                }
            }
        }
    }

    reporter.report(Event::Summary {
        merged,
        failed,
        skipped,
    });
    Outcome::Finished {
        merged,
        failed,
        skipped,
    }
}

fn ask_folder(platform: &dyn Platform, reporter: &mut dyn Reporter) -> Option<PathBuf> {
    reporter.report(Event::NoFolder);
    match platform.pick_folder() {
        Ok(folder) => folder,
        Err(error) => {
            reporter.report(Event::PickerFailed {
                error: error.to_string(),
            });
            None
        }
    }
}

/// Returns the folder as an absolute path, or gives back whatever was
/// rejected.
fn validate_directory(folder: Option<PathBuf>) -> Result<PathBuf, Option<PathBuf>> {
    match folder {
        Some(path) if path.is_dir() => utils::absolute_dir(&path).map_err(|error| {
            tracing::error!("Cannot resolve {}: {}", path.display(), error);
            Some(path)
        }),
        other => Err(other),
    }
}
