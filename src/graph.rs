use crate::core::PixelFormat;
use crate::error::{PassloomError, PassloomResult};
use crate::passes::{BlendMode, PassSpec};

/// One stage of the ffmpeg filter graph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GraphStep {
    /// Convert input `slot` to rgba and rebase its timestamps.
    Normalize { slot: usize, label: String },
    /// Blend `layer` onto the accumulated composite `acc`.
    Blend {
        acc: String,
        layer: String,
        mode: BlendMode,
        out: String,
    },
    /// Convert the accumulated composite to the output pixel format.
    Finalize {
        acc: String,
        pix_fmt: PixelFormat,
        label: String,
    },
}

/// The blend chain over the surviving passes, in declaration order. Input
/// slot numbers match the order inputs are handed to ffmpeg, which is the
/// survivor order, not the declared position of each pass.
#[derive(Clone, Debug)]
pub struct LayerGraph {
    steps: Vec<GraphStep>,
}

impl LayerGraph {
    pub fn build(survivors: &[PassSpec], pix_fmt: PixelFormat) -> PassloomResult<Self> {
        if survivors.is_empty() {
            return Err(PassloomError::validation(
                "cannot build a layer graph with zero passes",
            ));
        }

        let mut steps = Vec::with_capacity(survivors.len() * 2);
        let mut acc = String::from("base");
        steps.push(GraphStep::Normalize {
            slot: 0,
            label: acc.clone(),
        });
        for (slot, pass) in survivors.iter().enumerate().skip(1) {
            let layer = format!("layer_{slot}");
            steps.push(GraphStep::Normalize {
                slot,
                label: layer.clone(),
            });
            let out = format!("tmp_{slot}");
            steps.push(GraphStep::Blend {
                acc: acc.clone(),
                layer,
                mode: pass.blend,
                out: out.clone(),
            });
            acc = out;
        }
        steps.push(GraphStep::Finalize {
            acc,
            pix_fmt,
            label: String::from("final"),
        });
        Ok(Self { steps })
    }

    pub fn steps(&self) -> &[GraphStep] {
        &self.steps
    }

    /// Label of the stream the encoder should map.
    pub fn final_label(&self) -> &str {
        match self.steps.last() {
            Some(GraphStep::Finalize { label, .. }) => label,
            _ => "final",
        }
    }

    /// Render the graph as an ffmpeg `-filter_complex` argument.
    pub fn filter_complex(&self) -> String {
        let mut out = String::new();
        for step in &self.steps {
            if !out.is_empty() {
                out.push(';');
            }
            match step {
                GraphStep::Normalize { slot, label } => {
                    out.push_str(&format!(
                        "[{slot}:v]format=rgba,setpts=PTS-STARTPTS[{label}]"
                    ));
                }
                GraphStep::Blend {
                    acc,
                    layer,
                    mode,
                    out: blended,
                } => {
                    out.push_str(&format!("[{acc}][{layer}]blend=all_mode={mode}[{blended}]"));
                }
                GraphStep::Finalize {
                    acc,
                    pix_fmt,
                    label,
                } => {
                    out.push_str(&format!("[{acc}]format={pix_fmt}[{label}]"));
                }
            }
        }
        out
    }
}
