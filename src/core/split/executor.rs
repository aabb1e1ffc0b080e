//! Executor for split plans.

use super::types::*;
use crate::core::relocate::{ensure_dir, move_file};
use crate::error::FilesystemError;
use crate::events::{Event, EventSender, SplitEvent};
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Instant;

/// Executes split plans
pub struct SplitExecutor;

impl SplitExecutor {
    /// Create camera folders and move every planned frame.
    ///
    /// A failed move stops the run; frames moved before it stay moved.
    pub fn execute(
        plan: SplitPlan,
        dry_run: bool,
        events: &EventSender,
    ) -> Result<SplitReport, FilesystemError> {
        let start = Instant::now();
        let mut created_dirs: HashSet<PathBuf> = HashSet::new();
        let mut folders_created = 0usize;

        events.send(Event::Split(SplitEvent::Started {
            total: plan.moves.len() + plan.skipped.len(),
        }));
        for skipped in &plan.skipped {
            events.send(Event::Split(SplitEvent::Skipped {
                path: skipped.path.clone(),
                message: skipped.message.clone(),
            }));
        }

        for planned in &plan.moves {
            if !dry_run {
                if let Some(parent) = planned.destination.parent() {
                    if !created_dirs.contains(parent) {
                        if ensure_dir(parent)? {
                            folders_created += 1;
                        }
                        created_dirs.insert(parent.to_path_buf());
                    }
                }
                move_file(&planned.source, &planned.destination)?;
            }

            tracing::debug!(
                from = %planned.source.display(),
                to = %planned.destination.display(),
                dry_run,
                "split frame"
            );
            events.send(Event::Split(SplitEvent::Moved {
                from: planned.source.clone(),
                to: planned.destination.clone(),
            }));
        }

        events.send(Event::Split(SplitEvent::Completed {
            moved: plan.moves.len(),
            skipped: plan.skipped.len(),
        }));

        Ok(SplitReport {
            moved: plan.moves,
            skipped: plan.skipped,
            folders_created,
            dry_run,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }
}
