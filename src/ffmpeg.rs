use std::path::Path;

use crate::config::CompositeConfig;
use crate::core::Resolution;
use crate::graph::LayerGraph;
use crate::passes::PassSpec;
use crate::runner::CommandSpec;
use crate::sequence::SequenceNaming;

pub const FFMPEG: &str = "ffmpeg";

/// Build the invocation that synthesizes a single black frame at `target`,
/// used to plug gaps that have no earlier frame to copy from.
pub fn blank_frame_command(
    target: &Path,
    resolution: Resolution,
    framerate: u32,
) -> CommandSpec {
    CommandSpec::new(FFMPEG)
        .arg("-y")
        .args(["-f", "lavfi", "-i"])
        .arg(format!("color=black:s={resolution}:d=1/{framerate}"))
        .args(["-vframes", "1"])
        .arg(target.as_os_str())
}

/// Build the composite encode: one image-sequence input per surviving pass
/// in slot order, the blend graph, and the x265 output settings.
pub fn composite_command(
    cfg: &CompositeConfig,
    naming: &SequenceNaming,
    survivors: &[PassSpec],
    graph: &LayerGraph,
) -> CommandSpec {
    let mut spec = CommandSpec::new(FFMPEG).arg("-y");
    for pass in survivors {
        spec = spec
            .arg("-start_number")
            .arg(cfg.range.start.to_string())
            .arg("-framerate")
            .arg(cfg.framerate.to_string())
            .arg("-i")
            .arg(naming.input_pattern(&pass.name));
    }
    spec.arg("-filter_complex")
        .arg(graph.filter_complex())
        .arg("-map")
        .arg(format!("[{}]", graph.final_label()))
        .args(["-c:v", "libx265"])
        .arg("-crf")
        .arg(cfg.crf.to_string())
        .arg("-pix_fmt")
        .arg(cfg.pix_fmt.to_string())
        .arg(cfg.output.as_os_str())
        .timeout(cfg.encode_timeout)
}
