mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use pixmed_core::engine::MedianStrategy;
use pixmed_core::error::PixmedError;
use pixmed_core::frame::VideoFrame;
use pixmed_core::io::image_io::{list_image_sequence, load_rgb_image, save_rgb_image};
use pixmed_core::io::ser::SerReader;
use pixmed_core::pipeline::config::{FilterConfig, ImageSequenceFormat, Size};
use pixmed_core::pipeline::{run_filter, run_filter_reported, PipelineStage, ProgressReporter};

use common::{build_ser_with_frames, gray, rgb_bytes, write_test_ser, SER_RGB};

/// 2x2 RGB SER alternating black and white, `n` frames.
fn black_white_ser(n: usize) -> tempfile::NamedTempFile {
    let frames: Vec<Vec<u8>> = (0..n)
        .map(|i| {
            let v = if i % 2 == 0 { 0 } else { 255 };
            rgb_bytes(&VideoFrame::solid(2, 2, gray(v)))
        })
        .collect();
    write_test_ser(&build_ser_with_frames(2, 2, SER_RGB, &frames))
}

#[derive(Default)]
struct RecordingReporter {
    stages: Mutex<Vec<PipelineStage>>,
    last_advance: AtomicUsize,
}

impl ProgressReporter for RecordingReporter {
    fn begin_stage(&self, stage: PipelineStage, _total_items: Option<usize>) {
        self.stages.lock().unwrap().push(stage);
    }

    fn advance(&self, items_done: usize) {
        self.last_advance.store(items_done, Ordering::SeqCst);
    }
}

#[test]
fn test_ser_to_ser() {
    let input = black_white_ser(6);
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("filtered.ser");

    let mut config = FilterConfig::new(input.path(), &output);
    config.filter_length = 5;
    let summary = run_filter(&config).unwrap();
    assert_eq!(summary.frames_read, 6);
    assert_eq!(summary.frames_written, 6);
    assert_eq!((summary.width, summary.height), (2, 2));

    let reader = SerReader::open(&output).unwrap();
    assert_eq!(reader.frame_count(), 6);
    let last = reader.read_frame(5).unwrap();
    assert!(last.data.iter().all(|px| *px == [0, 0, 0]));
}

#[test]
fn test_skip_warmup_drops_leading_frames() {
    let input = black_white_ser(6);
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("filtered.ser");

    let mut config = FilterConfig::new(input.path(), &output);
    config.filter_length = 4;
    config.skip_warmup = true;
    let summary = run_filter(&config).unwrap();
    assert_eq!(summary.frames_read, 6);
    assert_eq!(summary.frames_written, 3);
    assert_eq!(SerReader::open(&output).unwrap().frame_count(), 3);
}

#[test]
fn test_all_warmup_writes_nothing() {
    let input = black_white_ser(2);
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("never.ser");

    let mut config = FilterConfig::new(input.path(), &output);
    config.filter_length = 10;
    config.skip_warmup = true;
    let summary = run_filter(&config).unwrap();
    assert_eq!(summary.frames_written, 0);
    assert!(!output.exists());
}

#[test]
fn test_max_frames_and_reporter() {
    let input = black_white_ser(6);
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.ser");

    let mut config = FilterConfig::new(input.path(), &output);
    config.max_frames = Some(4);
    config.strategy = MedianStrategy::Partial;
    let reporter = Arc::new(RecordingReporter::default());
    let summary = run_filter_reported(&config, reporter.clone()).unwrap();

    assert_eq!(summary.frames_read, 4);
    assert_eq!(reporter.last_advance.load(Ordering::SeqCst), 4);
    assert_eq!(
        *reporter.stages.lock().unwrap(),
        vec![PipelineStage::Filtering, PipelineStage::Writing]
    );
}

#[test]
fn test_image_sequence_round_trip_with_resize() {
    let input_dir = tempfile::tempdir().unwrap();
    for (i, v) in [30u8, 60, 90].iter().enumerate() {
        let frame = VideoFrame::solid(8, 6, gray(*v));
        save_rgb_image(&frame, &input_dir.path().join(format!("in_{i:02}.png"))).unwrap();
    }
    std::fs::write(input_dir.path().join("notes.txt"), "not a frame").unwrap();

    let output_dir = tempfile::tempdir().unwrap();
    let output = output_dir.path().join("frames");
    let mut config = FilterConfig::new(input_dir.path(), &output);
    config.filter_length = 1;
    config.resize = Some(Size { width: 4, height: 3 });
    config.image_format = ImageSequenceFormat::Png;

    let summary = run_filter(&config).unwrap();
    assert_eq!(summary.frames_written, 3);
    assert_eq!((summary.width, summary.height), (4, 3));

    let written = list_image_sequence(&output).unwrap();
    assert_eq!(written.len(), 3);
    assert!(written[0].ends_with("frame_000000.png"));
    // A one-sample window passes every frame straight through.
    let last = load_rgb_image(&written[2]).unwrap();
    assert_eq!(last.width(), 4);
    assert!(last.data.iter().all(|px| *px == gray(90)));
}

#[test]
fn test_mismatched_image_sizes_fail() {
    let input_dir = tempfile::tempdir().unwrap();
    save_rgb_image(&VideoFrame::solid(4, 4, gray(1)), &input_dir.path().join("a.png")).unwrap();
    save_rgb_image(&VideoFrame::solid(2, 2, gray(1)), &input_dir.path().join("b.png")).unwrap();
    let output_dir = tempfile::tempdir().unwrap();

    let config = FilterConfig::new(input_dir.path(), output_dir.path().join("out"));
    assert!(matches!(
        run_filter(&config),
        Err(PixmedError::DimensionMismatch {
            expected: 16,
            actual: 4
        })
    ));
}

#[test]
fn test_empty_directory_is_empty_sequence() {
    let input_dir = tempfile::tempdir().unwrap();
    let config = FilterConfig::new(input_dir.path(), input_dir.path().join("out"));
    assert!(matches!(run_filter(&config), Err(PixmedError::EmptySequence)));
}

#[test]
fn test_invalid_config_rejected_before_io() {
    let mut config = FilterConfig::new("does-not-exist.ser", "out.ser");
    config.filter_length = 0;
    assert!(matches!(
        run_filter(&config),
        Err(PixmedError::InvalidConfiguration(_))
    ));
}
