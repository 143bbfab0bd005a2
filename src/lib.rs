//! Passloom composites numbered render-pass image sequences into a single
//! video by driving ffmpeg: it probes which passes rendered, repairs missing
//! frames so every sequence is unbroken, then blends the passes into one
//! encode.

#![forbid(unsafe_code)]

pub mod config;
pub mod core;
pub mod error;
pub mod ffmpeg;
pub mod fill;
pub mod graph;
pub mod passes;
pub mod pipeline;
pub mod runner;
pub mod sequence;

pub use crate::config::CompositeConfig;
pub use crate::core::{FrameRange, PixelFormat, Resolution};
pub use crate::error::{PassloomError, PassloomResult};
pub use crate::fill::FillReport;
pub use crate::graph::{GraphStep, LayerGraph};
pub use crate::passes::{BASE_PASS, BlendMode, PassSpec};
pub use crate::pipeline::composite;
pub use crate::runner::{CommandRunner, CommandSpec, RunError, SystemRunner};
pub use crate::sequence::SequenceNaming;
