use std::fmt;
use std::str::FromStr;

use crate::error::{PassloomError, PassloomResult};

/// Closed frame interval `[start, last]`, inclusive on both ends. One range
/// per run, shared by every pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameRange {
    pub start: u64,
    pub last: u64,
}

impl FrameRange {
    pub fn new(start: u64, last: u64) -> PassloomResult<Self> {
        if start > last {
            return Err(PassloomError::validation(format!(
                "frame range start {start} must be <= last {last}"
            )));
        }
        Ok(Self { start, last })
    }

    pub fn frame_count(self) -> u64 {
        (self.last - self.start).saturating_add(1)
    }

    pub fn contains(self, index: u64) -> bool {
        self.start <= index && index <= self.last
    }

    pub fn iter(self) -> std::ops::RangeInclusive<u64> {
        self.start..=self.last
    }

    /// Zero-pad width shared by every frame filename of a run: the decimal
    /// digit count of the last index.
    pub fn pad_width(self) -> usize {
        self.last.checked_ilog10().map_or(1, |d| d as usize + 1)
    }
}

/// Pixel dimensions of synthesized blank frames, parsed from a `WxH` string.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub fn new(width: u32, height: u32) -> PassloomResult<Self> {
        if width == 0 || height == 0 {
            return Err(PassloomError::validation(
                "resolution width/height must be non-zero",
            ));
        }
        Ok(Self { width, height })
    }
}

impl FromStr for Resolution {
    type Err = PassloomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || {
            PassloomError::validation(format!(
                "resolution must be WxH (e.g. 1920x1080), got '{s}'"
            ))
        };
        let (w, h) = s.trim().split_once('x').ok_or_else(invalid)?;
        let width = w.parse::<u32>().map_err(|_| invalid())?;
        let height = h.parse::<u32>().map_err(|_| invalid())?;
        Resolution::new(width, height)
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Output pixel formats the encoder accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelFormat {
    Yuv420p,
    Yuv422p,
    Yuv444p,
    Rgb24,
    Yuva420p,
    Yuv420p10le,
}

impl PixelFormat {
    pub const ALL: [PixelFormat; 6] = [
        PixelFormat::Yuv420p,
        PixelFormat::Yuv422p,
        PixelFormat::Yuv444p,
        PixelFormat::Rgb24,
        PixelFormat::Yuva420p,
        PixelFormat::Yuv420p10le,
    ];

    /// The token ffmpeg expects for `-pix_fmt`.
    pub fn token(self) -> &'static str {
        match self {
            PixelFormat::Yuv420p => "yuv420p",
            PixelFormat::Yuv422p => "yuv422p",
            PixelFormat::Yuv444p => "yuv444p",
            PixelFormat::Rgb24 => "rgb24",
            PixelFormat::Yuva420p => "yuva420p",
            PixelFormat::Yuv420p10le => "yuv420p10le",
        }
    }
}

impl FromStr for PixelFormat {
    type Err = PassloomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|fmt| fmt.token() == token)
            .ok_or_else(|| {
                PassloomError::validation(format!(
                    "unknown pixel format '{s}' (expected one of: {})",
                    Self::ALL.map(PixelFormat::token).join(", ")
                ))
            })
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_range_rejects_reversed_endpoints() {
        assert!(FrameRange::new(5, 4).is_err());
        assert!(FrameRange::new(4, 4).is_ok());
    }

    #[test]
    fn frame_range_counts_inclusively() {
        let r = FrameRange::new(2, 5).unwrap();
        assert_eq!(r.frame_count(), 4);
        assert!(r.contains(2));
        assert!(r.contains(5));
        assert!(!r.contains(6));
        assert_eq!(r.iter().collect::<Vec<_>>(), vec![2, 3, 4, 5]);

        let single = FrameRange::new(7, 7).unwrap();
        assert_eq!(single.frame_count(), 1);
    }

    #[test]
    fn frame_count_saturates_on_the_full_index_space() {
        let all = FrameRange::new(0, u64::MAX).unwrap();
        assert_eq!(all.frame_count(), u64::MAX);
    }

    #[test]
    fn pad_width_follows_last_index_digits() {
        assert_eq!(FrameRange::new(0, 0).unwrap().pad_width(), 1);
        assert_eq!(FrameRange::new(1, 9).unwrap().pad_width(), 1);
        assert_eq!(FrameRange::new(1, 10).unwrap().pad_width(), 2);
        assert_eq!(FrameRange::new(1481294, 1488519).unwrap().pad_width(), 7);
    }

    #[test]
    fn resolution_parses_wxh() {
        assert_eq!(
            "1920x1080".parse::<Resolution>().unwrap(),
            Resolution {
                width: 1920,
                height: 1080
            }
        );
        assert!("1920".parse::<Resolution>().is_err());
        assert!("0x1080".parse::<Resolution>().is_err());
        assert!("axb".parse::<Resolution>().is_err());
    }

    #[test]
    fn pixel_format_round_trips_tokens() {
        for fmt in PixelFormat::ALL {
            assert_eq!(fmt.token().parse::<PixelFormat>().unwrap(), fmt);
        }
        assert_eq!("YUV420P".parse::<PixelFormat>().unwrap(), PixelFormat::Yuv420p);
        assert!("yuv44p".parse::<PixelFormat>().is_err());
    }
}
