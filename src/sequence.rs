use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::Context as _;

use crate::config::CompositeConfig;
use crate::error::PassloomResult;

/// Owner of the on-disk naming convention
/// `<root>.<Pass>.<zero-padded-index>.<ext>`.
///
/// The pad width is fixed once per run, derived from the range's last index,
/// and applied uniformly to every filename of every pass.
#[derive(Clone, Debug)]
pub struct SequenceNaming {
    dir: PathBuf,
    root: String,
    ext: String,
    pad: usize,
}

impl SequenceNaming {
    pub fn new(cfg: &CompositeConfig) -> Self {
        Self {
            dir: cfg.dir.clone(),
            root: cfg.root.clone(),
            ext: cfg.ext.clone(),
            pad: cfg.range.pad_width(),
        }
    }

    pub fn pad_width(&self) -> usize {
        self.pad
    }

    /// Resolved location of one frame file.
    pub fn frame_path(&self, pass: &str, index: u64) -> PathBuf {
        self.dir.join(format!(
            "{}.{}.{:0width$}.{}",
            self.root,
            pass,
            index,
            self.ext,
            width = self.pad
        ))
    }

    /// printf-style pattern ffmpeg reads a whole pass sequence with.
    pub fn input_pattern(&self, pass: &str) -> PathBuf {
        self.dir
            .join(format!("{}.{}.%0{}d.{}", self.root, pass, self.pad, self.ext))
    }

    /// Cheap availability probe: does the first requested frame exist?
    ///
    /// Deliberately not a scan. Whether a pass rendered at all is decided by
    /// its first frame alone; use [`SequenceNaming::scan`] when the full
    /// index set matters.
    pub fn first_frame_exists(&self, pass: &str, start: u64) -> bool {
        self.frame_path(pass, start).exists()
    }

    /// Full scan: every frame index for which a file matching the convention
    /// exists, whatever its digit width. Files whose digit segment does not
    /// parse as an integer are skipped, not an error.
    pub fn scan(&self, pass: &str) -> PassloomResult<BTreeSet<u64>> {
        let prefix = format!("{}.{}.", self.root, pass);
        let suffix = format!(".{}", self.ext);
        let mut found = BTreeSet::new();

        let entries = std::fs::read_dir(&self.dir)
            .with_context(|| format!("read sequence directory '{}'", self.dir.display()))?;
        for entry in entries {
            let entry = entry
                .with_context(|| format!("read sequence directory '{}'", self.dir.display()))?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            let Some(rest) = name.strip_prefix(prefix.as_str()) else {
                continue;
            };
            let Some(digits) = rest.strip_suffix(suffix.as_str()) else {
                continue;
            };
            if let Ok(index) = digits.parse::<u64>() {
                found.insert(index);
            }
        }
        Ok(found)
    }
}
