use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{PassloomError, PassloomResult};
use crate::sequence::SequenceNaming;

/// The pass every composite must contain; it anchors the blend chain.
pub const BASE_PASS: &str = "Unlit";

/// Blend modes accepted for pass compositing, the ffmpeg `blend=all_mode=`
/// vocabulary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlendMode {
    Normal,
    Addition,
    Multiply,
    Screen,
    Overlay,
    Darken,
    Lighten,
    HardLight,
    SoftLight,
    Difference,
    Exclusion,
}

impl BlendMode {
    pub const ALL: [BlendMode; 11] = [
        BlendMode::Normal,
        BlendMode::Addition,
        BlendMode::Multiply,
        BlendMode::Screen,
        BlendMode::Overlay,
        BlendMode::Darken,
        BlendMode::Lighten,
        BlendMode::HardLight,
        BlendMode::SoftLight,
        BlendMode::Difference,
        BlendMode::Exclusion,
    ];

    /// The token ffmpeg expects.
    pub fn token(self) -> &'static str {
        match self {
            BlendMode::Normal => "normal",
            BlendMode::Addition => "addition",
            BlendMode::Multiply => "multiply",
            BlendMode::Screen => "screen",
            BlendMode::Overlay => "overlay",
            BlendMode::Darken => "darken",
            BlendMode::Lighten => "lighten",
            BlendMode::HardLight => "hardlight",
            BlendMode::SoftLight => "softlight",
            BlendMode::Difference => "difference",
            BlendMode::Exclusion => "exclusion",
        }
    }
}

impl FromStr for BlendMode {
    type Err = PassloomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|mode| mode.token() == token)
            .ok_or_else(|| {
                PassloomError::validation(format!(
                    "unknown blend mode '{s}' (expected one of: {})",
                    Self::ALL.map(BlendMode::token).join(", ")
                ))
            })
    }
}

impl fmt::Display for BlendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// One declared render pass: the name its files carry (case-sensitive on
/// disk) plus the blend mode with which it lands on the accumulated
/// composite.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PassSpec {
    pub name: String,
    pub blend: BlendMode,
}

impl PassSpec {
    pub fn new(name: impl Into<String>, blend: BlendMode) -> Self {
        Self {
            name: name.into(),
            blend,
        }
    }
}

impl FromStr for PassSpec {
    type Err = PassloomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, blend) = s.split_once(':').ok_or_else(|| {
            PassloomError::validation(format!(
                "pass entry '{s}' must have the form 'Name:BlendMode'"
            ))
        })?;
        let name = name.trim();
        if name.is_empty() {
            return Err(PassloomError::validation(format!(
                "pass entry '{s}' has an empty pass name"
            )));
        }
        Ok(Self {
            name: name.to_string(),
            blend: blend.parse()?,
        })
    }
}

/// Parse a comma-separated `Name:BlendMode` list, preserving declaration
/// order.
pub fn parse_pass_list(s: &str) -> PassloomResult<Vec<PassSpec>> {
    s.split(',').map(|entry| entry.trim().parse()).collect()
}

/// The conventional five-pass stack used when none is declared.
pub fn default_passes() -> Vec<PassSpec> {
    vec![
        PassSpec::new("Unlit", BlendMode::Normal),
        PassSpec::new("LightingOnly", BlendMode::Multiply),
        PassSpec::new("DetailLightingOnly", BlendMode::Screen),
        PassSpec::new("PathTracer", BlendMode::Overlay),
        PassSpec::new("ReflectionsOnly", BlendMode::Screen),
    ]
}

/// Pass names are case-sensitive for file matching, but the mandatory base
/// pass is recognized case-insensitively.
pub fn is_base_pass(name: &str) -> bool {
    name.eq_ignore_ascii_case(BASE_PASS)
}

/// Decide which declared passes actually rendered, by probing each pass's
/// first requested frame. Emits one line per pass. Fatal when no surviving
/// pass is the base pass.
pub fn resolve_available(
    naming: &SequenceNaming,
    declared: &[PassSpec],
    start: u64,
) -> PassloomResult<BTreeMap<String, BlendMode>> {
    let mut available = BTreeMap::new();
    for pass in declared {
        if naming.first_frame_exists(&pass.name, start) {
            tracing::info!(
                "render pass '{}' is available with blend mode '{}'",
                pass.name,
                pass.blend
            );
            available.insert(pass.name.clone(), pass.blend);
        } else {
            tracing::info!(
                "render pass '{}' is missing ({}), skipping",
                pass.name,
                naming.frame_path(&pass.name, start).display()
            );
        }
    }

    if !available.keys().any(|name| is_base_pass(name)) {
        return Err(PassloomError::MissingBasePass(BASE_PASS.to_string()));
    }
    Ok(available)
}
