use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::config::CompositeConfig;
use crate::error::{PassloomError, PassloomResult};
use crate::ffmpeg::blank_frame_command;
use crate::runner::{CommandRunner, RunError};
use crate::sequence::SequenceNaming;

/// What gap repair did for one pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FillReport {
    /// Frames written by copying the nearest earlier frame.
    pub duplicated: u64,
    /// Frames synthesized as blanks, when no earlier frame existed.
    pub synthesized: u64,
}

impl FillReport {
    pub fn filled(self) -> u64 {
        self.duplicated + self.synthesized
    }
}

/// Walk the frame range and plug every hole so ffmpeg sees an unbroken
/// sequence. A missing frame is replaced by a copy of the most recent frame
/// written before it (rendered or filled); a gap at the head of the range is
/// plugged with a synthesized blank, which later gaps may then copy.
///
/// Any repair that still fails after one retry aborts the run.
#[tracing::instrument(skip(cfg, naming, runner, existing))]
pub fn fill_missing_frames(
    cfg: &CompositeConfig,
    naming: &SequenceNaming,
    runner: &dyn CommandRunner,
    pass: &str,
    existing: &BTreeSet<u64>,
) -> PassloomResult<FillReport> {
    let mut report = FillReport::default();
    let mut prev: Option<PathBuf> = None;

    for index in cfg.range.iter() {
        let target = naming.frame_path(pass, index);
        if existing.contains(&index) {
            prev = Some(target);
            continue;
        }

        match prev.as_ref().filter(|path| path.exists()) {
            Some(source) => {
                duplicate_frame(source, &target)?;
                tracing::info!(
                    "filled missing frame {} from {}",
                    target.display(),
                    source.display()
                );
                report.duplicated += 1;
            }
            None => {
                synthesize_blank(cfg, runner, &target)?;
                tracing::info!("created blank frame {}", target.display());
                report.synthesized += 1;
            }
        }
        prev = Some(target);
    }
    Ok(report)
}

fn duplicate_frame(source: &Path, target: &Path) -> PassloomResult<()> {
    if let Err(first) = std::fs::copy(source, target) {
        tracing::warn!(
            "copy {} -> {} failed ({first}), retrying once",
            source.display(),
            target.display()
        );
        if let Err(second) = std::fs::copy(source, target) {
            return Err(PassloomError::fill(format!(
                "duplicating '{}' from '{}' failed after retry: {second}",
                target.display(),
                source.display()
            )));
        }
    }
    Ok(())
}

fn synthesize_blank(
    cfg: &CompositeConfig,
    runner: &dyn CommandRunner,
    target: &Path,
) -> PassloomResult<()> {
    let spec = blank_frame_command(target, cfg.resolution, cfg.framerate);
    match runner.run(&spec) {
        Ok(()) => Ok(()),
        // no retry for a missing tool
        Err(err @ RunError::NotFound { .. }) => Err(err.into()),
        Err(first) => {
            tracing::warn!(
                "blank frame synthesis for {} failed ({first}), retrying once",
                target.display()
            );
            match runner.run(&spec) {
                Ok(()) => Ok(()),
                Err(second) => Err(PassloomError::fill(format!(
                    "blank frame synthesis for '{}' failed after retry: {second}",
                    target.display()
                ))),
            }
        }
    }
}
