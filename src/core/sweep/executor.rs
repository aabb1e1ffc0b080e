//! Sweep execution: an explicit (anchor, comparand) cursor over an owned,
//! shrinking candidate list.

use super::quarantine::{Quarantine, QuarantineReason};
use crate::core::config::DedupConfig;
use crate::core::preprocess::{FrameLoader, PreprocessOutcome, PreprocessedImage, Preprocessor};
use crate::core::scorer::ChangeScorer;
use crate::error::{ConfigError, CurateError};
use crate::events::{null_sender, Event, EventSender, SweepEvent, SweepSummary};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// A frame removed from the candidate list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuarantinedFrame {
    /// Where the frame was listed
    pub path: PathBuf,
    /// Where it was moved to; `None` for dry runs
    pub destination: Option<PathBuf>,
    pub reason: QuarantineReason,
}

/// Result of a sweep
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepReport {
    /// Frames still in the list, in their original order
    pub survivors: Vec<PathBuf>,
    /// Removed frames, in removal order
    pub quarantined: Vec<QuarantinedFrame>,
    /// Pairwise scores computed
    pub comparisons: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl SweepReport {
    pub fn rejected_count(&self) -> usize {
        self.quarantined
            .iter()
            .filter(|q| q.reason.is_rejection())
            .count()
    }

    pub fn near_duplicate_count(&self) -> usize {
        self.quarantined.len() - self.rejected_count()
    }

    fn summary(&self, total_frames: usize) -> SweepSummary {
        SweepSummary {
            total_frames,
            survivors: self.survivors.len(),
            rejected: self.rejected_count(),
            near_duplicates: self.near_duplicate_count(),
            comparisons: self.comparisons,
            duration_ms: self.duration_ms,
        }
    }
}

/// Where the sweep is in its nested iteration
enum Cursor {
    /// Load the frame at `idx` as the next anchor
    SelectAnchor { idx: usize },
    /// Compare the anchor at `idx` against the frame at `jdx`
    Compare {
        idx: usize,
        jdx: usize,
        anchor: PreprocessedImage,
        min_region_area: u64,
    },
    Finished,
}

/// O(n²) near-duplicate sweep over a sorted candidate list.
///
/// When an anchor matches a later frame, the *anchor* is quarantined and
/// the same position is visited again, so a run of near-duplicates keeps
/// only its latest frame.
pub struct DedupSweep<L: FrameLoader> {
    loader: L,
    scorer: ChangeScorer,
    threshold: f64,
    min_diff_area: f64,
}

impl DedupSweep<Preprocessor> {
    /// Build a sweep that decodes frames from disk
    pub fn from_config(config: &DedupConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let preprocessor = Preprocessor::new(config.preprocess.clone())?;
        Self::new(preprocessor, config.threshold, config.min_diff_area)
    }
}

impl<L: FrameLoader> DedupSweep<L> {
    /// Build a sweep over frames produced by `loader`
    pub fn new(loader: L, threshold: f64, min_diff_area: f64) -> Result<Self, ConfigError> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ConfigError::ThresholdOutOfRange { value: threshold });
        }
        if !(0.0..=1.0).contains(&min_diff_area) {
            return Err(ConfigError::MinDiffAreaOutOfRange {
                value: min_diff_area,
            });
        }
        Ok(Self {
            loader,
            scorer: ChangeScorer::new(),
            threshold,
            min_diff_area,
        })
    }

    /// Run without progress events
    pub fn run(
        &mut self,
        candidates: Vec<PathBuf>,
        quarantine: &mut dyn Quarantine,
    ) -> Result<SweepReport, CurateError> {
        self.run_with_events(candidates, quarantine, &null_sender())
    }

    /// Run the sweep, reporting progress through `events`
    pub fn run_with_events(
        &mut self,
        candidates: Vec<PathBuf>,
        quarantine: &mut dyn Quarantine,
        events: &EventSender,
    ) -> Result<SweepReport, CurateError> {
        let start_time = Instant::now();
        let total_frames = candidates.len();
        tracing::info!(frames = total_frames, threshold = self.threshold, "starting sweep");
        events.send(Event::Sweep(SweepEvent::Started {
            total: total_frames,
        }));

        let mut run = SweepRun {
            candidates,
            quarantined: Vec::new(),
            comparisons: 0,
            anchors_visited: 0,
            quarantine,
            events,
        };

        let mut cursor = Cursor::SelectAnchor { idx: 0 };
        while !matches!(cursor, Cursor::Finished) {
            cursor = self.step(cursor, &mut run)?;
        }

        let report = SweepReport {
            survivors: run.candidates,
            quarantined: run.quarantined,
            comparisons: run.comparisons,
            duration_ms: start_time.elapsed().as_millis() as u64,
        };

        tracing::info!(
            survivors = report.survivors.len(),
            quarantined = report.quarantined.len(),
            comparisons = report.comparisons,
            "sweep finished"
        );
        events.send(Event::Sweep(SweepEvent::Completed {
            summary: report.summary(total_frames),
        }));

        Ok(report)
    }

    fn step(&mut self, cursor: Cursor, run: &mut SweepRun<'_>) -> Result<Cursor, CurateError> {
        match cursor {
            Cursor::SelectAnchor { idx } => {
                if idx >= run.candidates.len() {
                    return Ok(Cursor::Finished);
                }
                run.anchors_visited += 1;
                run.events.send(Event::Sweep(SweepEvent::AnchorVisited {
                    position: run.anchors_visited,
                    remaining: run.candidates.len(),
                }));

                match self.loader.load(&run.candidates[idx])? {
                    PreprocessOutcome::Rejected(reason) => {
                        // The list shifted left; retry the same position.
                        run.remove(idx, QuarantineReason::Rejected(reason))?;
                        Ok(Cursor::SelectAnchor { idx })
                    }
                    PreprocessOutcome::Ready(anchor) => {
                        let pixels = anchor.pixel_count();
                        let min_region_area = (pixels as f64 * self.min_diff_area).floor() as u64;
                        Ok(Cursor::Compare {
                            idx,
                            jdx: idx + 1,
                            anchor,
                            min_region_area,
                        })
                    }
                }
            }
            Cursor::Compare {
                idx,
                jdx,
                anchor,
                min_region_area,
            } => {
                if jdx >= run.candidates.len() {
                    return Ok(Cursor::SelectAnchor { idx: idx + 1 });
                }

                let candidate = match self.loader.load(&run.candidates[jdx])? {
                    PreprocessOutcome::Ready(candidate) => candidate,
                    PreprocessOutcome::Rejected(reason) => {
                        run.remove(jdx, QuarantineReason::Rejected(reason))?;
                        return Ok(Cursor::Compare {
                            idx,
                            jdx,
                            anchor,
                            min_region_area,
                        });
                    }
                };

                let change = self.scorer.score(&anchor, &candidate, min_region_area)?;
                let score = change.normalized(anchor.pixel_count());
                run.comparisons += 1;
                tracing::debug!(
                    anchor = %run.candidates[idx].display(),
                    candidate = %run.candidates[jdx].display(),
                    score,
                    regions = change.regions.len(),
                    "scored pair"
                );

                if score < self.threshold {
                    let kept = run.candidates[jdx].clone();
                    run.remove(idx, QuarantineReason::NearDuplicate { of: kept, score })?;
                    // The next frame slid into `idx` and becomes the anchor.
                    return Ok(Cursor::SelectAnchor { idx });
                }

                Ok(Cursor::Compare {
                    idx,
                    jdx: jdx + 1,
                    anchor,
                    min_region_area,
                })
            }
            Cursor::Finished => Ok(Cursor::Finished),
        }
    }
}

/// Mutable state of one sweep run
struct SweepRun<'a> {
    candidates: Vec<PathBuf>,
    quarantined: Vec<QuarantinedFrame>,
    comparisons: usize,
    anchors_visited: usize,
    quarantine: &'a mut dyn Quarantine,
    events: &'a EventSender,
}

impl SweepRun<'_> {
    /// Take the frame at `position` out of the list and quarantine it
    fn remove(&mut self, position: usize, reason: QuarantineReason) -> Result<(), CurateError> {
        let path = self.candidates.remove(position);
        log_removal(&path, &reason);

        let destination = self.quarantine.quarantine(&path, &reason)?;
        self.events.send(Event::Sweep(SweepEvent::Quarantined {
            path: path.clone(),
            reason: reason.clone(),
        }));
        self.quarantined.push(QuarantinedFrame {
            path,
            destination,
            reason,
        });
        Ok(())
    }
}

fn log_removal(path: &Path, reason: &QuarantineReason) {
    match reason {
        QuarantineReason::Rejected(why) => tracing::warn!(
            "moving {} because it didn't meet minimal requirements: {}",
            path.display(),
            why
        ),
        QuarantineReason::NearDuplicate { of, score } => tracing::debug!(
            frame = %path.display(),
            kept = %of.display(),
            score,
            "near-duplicate"
        ),
    }
}
