use std::sync::Arc;

use tracing::{info, warn};

use crate::color::resize;
use crate::engine::MedianFilter;
use crate::error::{PixmedError, Result};
use crate::io::sink::FrameSink;
use crate::io::source::FrameSource;

use super::config::FilterConfig;
use super::types::{NoOpReporter, PipelineStage, ProgressReporter, RunSummary};

/// Filter every input frame in order and write the results.
pub fn run_filter(config: &FilterConfig) -> Result<RunSummary> {
    run_filter_reported(config, Arc::new(NoOpReporter))
}

/// [`run_filter`] with a thread-safe progress reporter.
///
/// The output sink is created from the first written frame, so its
/// dimensions follow the (possibly resized) input.
pub fn run_filter_reported(
    config: &FilterConfig,
    reporter: Arc<dyn ProgressReporter>,
) -> Result<RunSummary> {
    config.validate()?;

    let source = FrameSource::open(&config.input)?;
    let available = source.frame_count();
    let total = config.max_frames.map_or(available, |max| max.min(available));
    if total == 0 {
        return Err(PixmedError::EmptySequence);
    }
    info!(
        source = source.kind(),
        total_frames = total,
        filter_length = config.filter_length,
        strategy = %config.strategy,
        "Opened input"
    );

    let mut filter = MedianFilter::with_strategy(config.filter_length, config.strategy)?;
    let warmup = config.warmup_frames();
    let mut sink: Option<FrameSink> = None;
    let mut summary = RunSummary {
        frames_read: 0,
        frames_written: 0,
        width: 0,
        height: 0,
    };

    reporter.begin_stage(PipelineStage::Filtering, Some(total));
    for (index, frame) in source.frames().take(total).enumerate() {
        let mut frame = frame?;
        if let Some(size) = config.resize {
            frame = resize(&frame, size)?;
        }
        let filtered = filter.process_frame(&frame)?;
        summary.frames_read += 1;
        summary.width = filtered.width();
        summary.height = filtered.height();

        if index >= warmup {
            if sink.is_none() {
                sink = Some(FrameSink::create(
                    &config.output,
                    filtered.width() as u32,
                    filtered.height() as u32,
                    config.image_format,
                )?);
            }
            if let Some(out) = sink.as_mut() {
                out.write(&filtered)?;
                summary.frames_written = out.frames_written();
            }
        }
        reporter.advance(index + 1);
    }
    reporter.finish_stage();

    reporter.begin_stage(PipelineStage::Writing, None);
    match sink {
        Some(out) => out.finish()?,
        None => warn!(
            warmup_frames = warmup,
            "Every frame fell inside the warm-up period, nothing written"
        ),
    }
    reporter.finish_stage();

    info!(
        frames_read = summary.frames_read,
        frames_written = summary.frames_written,
        output = %config.output.display(),
        "Filtering complete"
    );
    Ok(summary)
}
