//! # CLI Module
//!
//! Command-line interface for the frame curator.
//!
//! ## Usage
//! ```bash
//! # Move near-duplicate frames into ./frames/for_deletion
//! frame-curate dedup ./frames
//!
//! # Normalize sizes, blur twice, be stricter about what counts as change
//! frame-curate dedup ./frames --resize-to 480 640 --blur-radius 5 3 --th 0.01
//!
//! # Preview the per-camera split as JSON
//! frame-curate split ./frames --dry-run --output json
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use console::{style, Term};
use frame_curator::core::config::{
    BorderMask, DedupConfig, FrameSize, PreprocessConfig, DEFAULT_EXTENSION,
    DEFAULT_MIN_DIFF_AREA, DEFAULT_MIN_HEIGHT, DEFAULT_MIN_WIDTH, DEFAULT_QUARANTINE_DIR,
    DEFAULT_THRESHOLD,
};
use frame_curator::core::split::{split_directory, SplitConfig, SplitReport, TimeZoneMode};
use frame_curator::core::sweep::{dedup_directory, DedupReport};
use frame_curator::error::Result;
use frame_curator::events::{Event, EventChannel, EventReceiver, SplitEvent, SweepEvent};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::thread;

/// Frame Curator - tidy up camera still frames
#[derive(Parser, Debug)]
#[command(name = "frame-curate")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Find near-duplicate frames and move them to a quarantine folder
    Dedup {
        /// Directory with the frames
        src_dir: PathBuf,

        /// Resize all frames to the given height and width
        #[arg(long = "resize-to", num_args = 2, value_names = ["H", "W"])]
        resize_to: Option<Vec<u32>>,

        /// Ratio of changed area below which frames are duplicates, in [0, 1]
        #[arg(long = "th", default_value_t = DEFAULT_THRESHOLD)]
        threshold: f64,

        /// Border to ignore, as right, top, left, bottom percentages.
        ///
        /// RIGHT trims columns from the right-hand edge and LEFT from the
        /// left-hand edge (x = 0); TOP and BOTTOM trim rows likewise.
        #[arg(
            long = "black-mask",
            num_args = 4,
            value_names = ["RIGHT", "TOP", "LEFT", "BOTTOM"],
            default_values_t = [5, 10, 5, 0]
        )]
        black_mask: Vec<u32>,

        /// Minimum ratio of pixels a changed region must cover, in [0, 1]
        #[arg(long = "min-diff-area", default_value_t = DEFAULT_MIN_DIFF_AREA)]
        min_diff_area: f64,

        /// Gaussian blur kernel sizes, one pass each, applied in order. Must be odd.
        #[arg(long = "blur-radius", num_args = 1..)]
        blur_radius: Vec<u32>,

        /// Minimum frame height
        #[arg(long, default_value_t = DEFAULT_MIN_HEIGHT)]
        min_height: u32,

        /// Minimum frame width
        #[arg(long, default_value_t = DEFAULT_MIN_WIDTH)]
        min_width: u32,

        /// Extension of the frames to compare
        #[arg(short, long, default_value = DEFAULT_EXTENSION)]
        extension: String,

        /// Name of the quarantine folder inside SRC_DIR
        #[arg(long, default_value = DEFAULT_QUARANTINE_DIR)]
        quarantine_dir: String,

        /// Include hidden files
        #[arg(long)]
        include_hidden: bool,

        /// Report what would be moved without moving anything
        #[arg(long)]
        dry_run: bool,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Move frames into camera_<id> folders and normalize their timestamps
    Split {
        /// Directory with the frames
        src_dir: PathBuf,

        /// Extension of the frames to move
        #[arg(short, long, default_value = DEFAULT_EXTENSION)]
        extension: String,

        /// Render timestamps in local time instead of UTC
        #[arg(long)]
        local_time: bool,

        /// Include hidden files
        #[arg(long)]
        include_hidden: bool,

        /// Report the plan without moving anything
        #[arg(long)]
        dry_run: bool,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output with colors
    Pretty,
    /// JSON output for scripting
    Json,
    /// Minimal output (paths only)
    Minimal,
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Dedup {
            src_dir,
            resize_to,
            threshold,
            black_mask,
            min_diff_area,
            blur_radius,
            min_height,
            min_width,
            extension,
            quarantine_dir,
            include_hidden,
            dry_run,
            output,
            verbose,
        } => {
            frame_curator::init_tracing(if verbose { "debug" } else { "warn" });

            let border_mask = match black_mask[..] {
                [right, top, left, bottom] => BorderMask::new(right, top, left, bottom),
                _ => BorderMask::default(),
            };
            let resize_to = resize_to.and_then(|hw| match hw[..] {
                [height, width] => Some(FrameSize::new(height, width)),
                _ => None,
            });

            let config = DedupConfig {
                preprocess: PreprocessConfig {
                    resize_to,
                    blur_radii: blur_radius,
                    border_mask,
                    min_height,
                    min_width,
                },
                threshold,
                min_diff_area,
                extension,
                quarantine_dir,
                include_hidden,
                dry_run,
            };
            run_dedup(src_dir, config, output, verbose)
        }
        Commands::Split {
            src_dir,
            extension,
            local_time,
            include_hidden,
            dry_run,
            output,
            verbose,
        } => {
            frame_curator::init_tracing(if verbose { "debug" } else { "warn" });

            let config = SplitConfig {
                extension,
                include_hidden,
                timezone: if local_time {
                    TimeZoneMode::Local
                } else {
                    TimeZoneMode::Utc
                },
                dry_run,
            };
            run_split(src_dir, config, output)
        }
    }
}

fn progress_bar(output: OutputFormat, label: &str) -> Option<ProgressBar> {
    if !matches!(output, OutputFormat::Pretty) {
        return None;
    }
    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░"),
    );
    pb.set_prefix(label.to_string());
    Some(pb)
}

/// Drive `progress` from library events until every sender is dropped
fn render_events(receiver: EventReceiver, progress: Option<ProgressBar>, verbose: bool) {
    let Some(pb) = progress else {
        // Drain so senders never block on a full channel.
        for _ in receiver.iter() {}
        return;
    };

    for event in receiver.iter() {
        match event {
            Event::Sweep(SweepEvent::Started { total })
            | Event::Split(SplitEvent::Started { total }) => pb.set_length(total as u64),
            Event::Sweep(SweepEvent::AnchorVisited { position, .. }) => {
                pb.set_position(position as u64)
            }
            Event::Sweep(SweepEvent::Quarantined { path, reason }) => {
                if verbose {
                    pb.set_message(format!(
                        "{}: {}",
                        path.file_name().unwrap_or_default().to_string_lossy(),
                        reason
                    ));
                }
            }
            Event::Split(SplitEvent::Moved { .. }) | Event::Split(SplitEvent::Skipped { .. }) => {
                pb.inc(1)
            }
            Event::Sweep(SweepEvent::Completed { .. })
            | Event::Split(SplitEvent::Completed { .. }) => pb.finish_and_clear(),
            _ => {}
        }
    }
}

fn run_dedup(
    src_dir: PathBuf,
    config: DedupConfig,
    output: OutputFormat,
    verbose: bool,
) -> Result<()> {
    let term = Term::stderr();
    if matches!(output, OutputFormat::Pretty) {
        term.write_line(&format!(
            "{} {}",
            style("Frame Curator").bold().cyan(),
            style("dedup").dim()
        ))
        .ok();
    }

    let (sender, receiver) = EventChannel::new();
    let progress = progress_bar(output, "Comparing");
    let event_thread = thread::spawn(move || render_events(receiver, progress, verbose));

    let result = dedup_directory(&src_dir, &config, &sender);

    drop(sender);
    event_thread.join().ok();
    let report = result?;

    match output {
        OutputFormat::Pretty => print_pretty_dedup(&term, &report, verbose),
        OutputFormat::Json => print_json(&report),
        OutputFormat::Minimal => {
            for frame in &report.sweep.quarantined {
                println!("{}", frame.path.display());
            }
        }
    }

    Ok(())
}

fn run_split(src_dir: PathBuf, config: SplitConfig, output: OutputFormat) -> Result<()> {
    let term = Term::stderr();
    if matches!(output, OutputFormat::Pretty) {
        term.write_line(&format!(
            "{} {}",
            style("Frame Curator").bold().cyan(),
            style("split").dim()
        ))
        .ok();
    }

    let (sender, receiver) = EventChannel::new();
    let progress = progress_bar(output, "Splitting");
    let event_thread = thread::spawn(move || render_events(receiver, progress, false));

    let result = split_directory(&src_dir, &config, &sender);

    drop(sender);
    event_thread.join().ok();
    let report = result?;

    match output {
        OutputFormat::Pretty => print_pretty_split(&term, &report),
        OutputFormat::Json => print_json(&report),
        OutputFormat::Minimal => {
            for planned in &report.moved {
                println!("{}", planned.destination.display());
            }
        }
    }

    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => tracing::error!("failed to serialize result: {}", e),
    }
}

fn print_pretty_dedup(term: &Term, report: &DedupReport, verbose: bool) {
    let sweep = &report.sweep;
    term.write_line("").ok();
    term.write_line(&format!(
        "  {} frames kept, {} comparisons in {:.1}s",
        style(sweep.survivors.len()).cyan(),
        sweep.comparisons,
        sweep.duration_ms as f64 / 1000.0
    ))
    .ok();
    term.write_line(&format!(
        "  {} near-duplicates",
        style(sweep.near_duplicate_count()).yellow()
    ))
    .ok();
    term.write_line(&format!(
        "  {} unreadable or too small",
        style(sweep.rejected_count()).red()
    ))
    .ok();

    if verbose {
        term.write_line("").ok();
        for frame in &sweep.quarantined {
            term.write_line(&format!(
                "    {} {} ({})",
                style("○").dim(),
                frame.path.display(),
                frame.reason
            ))
            .ok();
        }
    }

    term.write_line("").ok();
    if report.dry_run {
        term.write_line(&format!(
            "{} Dry run: nothing was moved.",
            style("✓").green().bold()
        ))
        .ok();
    } else {
        term.write_line(&format!(
            "{} Done. Deleted images are moved to {}.",
            style("✓").green().bold(),
            report.quarantine_dir.display()
        ))
        .ok();
    }
}

fn print_pretty_split(term: &Term, report: &SplitReport) {
    term.write_line("").ok();
    term.write_line(&format!(
        "  {} frames moved into {} new camera folders",
        style(report.moved.len()).cyan(),
        report.folders_created
    ))
    .ok();

    if !report.skipped.is_empty() {
        term.write_line(&format!(
            "  {} frames skipped:",
            style(report.skipped.len()).yellow()
        ))
        .ok();
        for skipped in &report.skipped {
            term.write_line(&format!("    {} {}", style("○").dim(), skipped.message))
                .ok();
        }
    }

    term.write_line("").ok();
    let done = if report.dry_run {
        "Dry run: nothing was moved."
    } else {
        "Done."
    };
    term.write_line(&format!("{} {}", style("✓").green().bold(), done))
        .ok();
}
