use crate::{
    config::CompositeConfig,
    error::PassloomResult,
    ffmpeg::composite_command,
    fill::fill_missing_frames,
    graph::LayerGraph,
    passes::resolve_available,
    runner::CommandRunner,
    sequence::SequenceNaming,
};

/// Run one composite end to end: decide which declared passes rendered,
/// repair their gaps, then blend and encode them into `cfg.output`.
pub fn composite(cfg: &CompositeConfig, runner: &dyn CommandRunner) -> PassloomResult<()> {
    cfg.validate()?;
    let naming = SequenceNaming::new(cfg);

    let available = resolve_available(&naming, &cfg.passes, cfg.range.start)?;
    let survivors: Vec<_> = cfg
        .passes
        .iter()
        .filter(|pass| available.contains_key(&pass.name))
        .cloned()
        .collect();

    for pass in &survivors {
        let existing = naming.scan(&pass.name)?;
        let present = existing
            .iter()
            .filter(|&&index| cfg.range.contains(index))
            .count() as u64;
        tracing::info!(
            "pass '{}': {} of {} frames present",
            pass.name,
            present,
            cfg.range.frame_count()
        );
        let report = fill_missing_frames(cfg, &naming, runner, &pass.name, &existing)?;
        if report.filled() > 0 {
            tracing::info!(
                "pass '{}': filled {} frames ({} duplicated, {} blank)",
                pass.name,
                report.filled(),
                report.duplicated,
                report.synthesized
            );
        }
    }

    let graph = LayerGraph::build(&survivors, cfg.pix_fmt)?;
    tracing::info!("filter graph: {}", graph.filter_complex());

    let encode = composite_command(cfg, &naming, &survivors, &graph);
    tracing::info!("running: {}", encode.command_line());
    runner.run(&encode)?;
    tracing::info!("composite video written to {}", cfg.output.display());
    Ok(())
}
