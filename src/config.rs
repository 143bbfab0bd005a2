use std::path::PathBuf;
use std::time::Duration;

use crate::core::{FrameRange, PixelFormat, Resolution};
use crate::error::{PassloomError, PassloomResult};
use crate::passes::PassSpec;

/// Everything one composite run needs, assembled by the caller and passed to
/// each component explicitly. None of the components consult process-global
/// state.
#[derive(Clone, Debug)]
pub struct CompositeConfig {
    /// Directory holding the frame sequences.
    pub dir: PathBuf,
    /// Sequence root name; by convention the working directory's name.
    pub root: String,
    /// Frame file extension, without the leading dot.
    pub ext: String,
    pub range: FrameRange,
    pub framerate: u32,
    /// x265 constant rate factor (compression strength), 0..=51.
    pub crf: u8,
    pub pix_fmt: PixelFormat,
    /// Size of synthesized blank frames.
    pub resolution: Resolution,
    pub output: PathBuf,
    /// Declared passes in layering order; the first surviving one is the
    /// base layer.
    pub passes: Vec<PassSpec>,
    /// Optional wall-clock bound for the final encode invocation.
    pub encode_timeout: Option<Duration>,
}

impl CompositeConfig {
    pub fn validate(&self) -> PassloomResult<()> {
        if self.root.is_empty() {
            return Err(PassloomError::validation(
                "sequence root name must not be empty",
            ));
        }
        if self.ext.is_empty() || self.ext.starts_with('.') {
            return Err(PassloomError::validation(
                "frame extension must be non-empty, without the leading dot",
            ));
        }
        if self.framerate == 0 {
            return Err(PassloomError::validation("framerate must be non-zero"));
        }
        if self.crf > 51 {
            return Err(PassloomError::validation(format!(
                "crf must be within 0..=51, got {}",
                self.crf
            )));
        }
        if self.passes.is_empty() {
            return Err(PassloomError::validation(
                "at least one render pass must be declared",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::passes::default_passes;

    fn base_config() -> CompositeConfig {
        CompositeConfig {
            dir: PathBuf::from("."),
            root: "shot".to_string(),
            ext: "png".to_string(),
            range: FrameRange::new(1, 10).unwrap(),
            framerate: 120,
            crf: 0,
            pix_fmt: PixelFormat::Yuv420p10le,
            resolution: Resolution::new(1920, 1080).unwrap(),
            output: PathBuf::from("out.mp4"),
            passes: default_passes(),
            encode_timeout: None,
        }
    }

    #[test]
    fn validate_accepts_defaults() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn validate_catches_bad_values() {
        let mut cfg = base_config();
        cfg.ext = String::new();
        assert!(cfg.validate().is_err());

        let mut cfg = base_config();
        cfg.ext = ".png".to_string();
        assert!(cfg.validate().is_err());

        let mut cfg = base_config();
        cfg.framerate = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = base_config();
        cfg.crf = 52;
        assert!(cfg.validate().is_err());

        let mut cfg = base_config();
        cfg.passes.clear();
        assert!(cfg.validate().is_err());

        let mut cfg = base_config();
        cfg.root = String::new();
        assert!(cfg.validate().is_err());
    }
}
