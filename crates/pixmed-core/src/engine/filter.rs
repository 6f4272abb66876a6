use ndarray::Array2;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::color::to_luma;
use crate::consts::PARALLEL_PIXEL_THRESHOLD;
use crate::error::{PixmedError, Result};
use crate::frame::{LumaFrame, Rgb, VideoFrame};

use super::sample::Sample;
use super::selector::{update_window, MedianStrategy, SlotPolicy};
use super::store::{WindowLifecycle, WindowStore};

/// Temporal per-pixel median filter.
///
/// Frames must be fed in order: the output for frame *k* depends on every
/// frame delivered before it. The location count is fixed by [`initialize`]
/// or by the first frame, whichever comes first.
///
/// [`initialize`]: MedianFilter::initialize
#[derive(Clone, Debug)]
pub struct MedianFilter {
    filter_length: usize,
    strategy: MedianStrategy,
    windows: WindowLifecycle,
    replace_at_tail: bool,
    frames_processed: u64,
}

impl MedianFilter {
    /// Create a filter using [`MedianStrategy::Sorted`].
    pub fn new(filter_length: usize) -> Result<Self> {
        Self::with_strategy(filter_length, MedianStrategy::default())
    }

    pub fn with_strategy(filter_length: usize, strategy: MedianStrategy) -> Result<Self> {
        if filter_length == 0 {
            return Err(PixmedError::InvalidConfiguration(
                "filter length must be at least 1".into(),
            ));
        }
        Ok(Self {
            filter_length,
            strategy,
            windows: WindowLifecycle::Uninitialized,
            replace_at_tail: false,
            frames_processed: 0,
        })
    }

    /// Pre-size the window store. Repeating the call with the same count is
    /// a no-op; a different count fails.
    pub fn initialize(&mut self, location_count: usize) -> Result<()> {
        self.windows
            .initialize(location_count, self.filter_length)
            .map(|_| ())
    }

    pub fn filter_length(&self) -> usize {
        self.filter_length
    }

    pub fn strategy(&self) -> MedianStrategy {
        self.strategy
    }

    /// `None` until the store has been sized.
    pub fn location_count(&self) -> Option<usize> {
        self.windows.store().map(WindowStore::location_count)
    }

    pub fn replace_at_tail(&self) -> bool {
        self.replace_at_tail
    }

    pub fn frames_processed(&self) -> u64 {
        self.frames_processed
    }

    /// Current contents of one location's window, in slot order.
    pub fn window(&self, location: usize) -> Option<&[Sample]> {
        self.windows
            .store()
            .filter(|store| location < store.location_count())
            .map(|store| store.window(location))
    }

    /// Filter one frame, deriving brightness with [`to_luma`].
    pub fn process_frame(&mut self, frame: &VideoFrame) -> Result<VideoFrame> {
        let luma = to_luma(frame);
        self.process_frame_with_luma(frame, &luma)
    }

    /// Filter one frame using a caller-supplied brightness grid.
    ///
    /// On error no window and no filter state is modified.
    pub fn process_frame_with_luma(
        &mut self,
        frame: &VideoFrame,
        luma: &LumaFrame,
    ) -> Result<VideoFrame> {
        let (h, w) = frame.data.dim();
        let pixel_count = frame.pixel_count();

        if luma.data.dim() != (h, w) {
            return Err(PixmedError::DimensionMismatch {
                expected: pixel_count,
                actual: luma.data.len(),
            });
        }
        if let Some(expected) = self.location_count() {
            if expected != pixel_count {
                return Err(PixmedError::DimensionMismatch {
                    expected,
                    actual: pixel_count,
                });
            }
        }

        let filter_length = self.filter_length;
        let strategy = self.strategy;
        let policy = SlotPolicy::from_replace_at_tail(self.replace_at_tail);

        let first = !self.windows.is_ready();
        let store = self.windows.initialize(pixel_count, filter_length)?;
        if first {
            info!(
                width = w,
                height = h,
                filter_length,
                strategy = %strategy,
                "Median filter initialized"
            );
        }

        let incoming: Vec<Sample> = frame
            .data
            .iter()
            .zip(luma.data.iter())
            .map(|(&color, &brightness)| Sample::new(color, brightness))
            .collect();
        let mut medians: Vec<Rgb> = vec![[0; 3]; pixel_count];

        let windows = store.samples_mut();
        if pixel_count >= PARALLEL_PIXEL_THRESHOLD {
            windows
                .par_chunks_exact_mut(filter_length)
                .zip(incoming.par_iter())
                .zip(medians.par_iter_mut())
                .for_each(|((window, &sample), out)| {
                    *out = update_window(window, sample, policy, strategy).color;
                });
        } else {
            for ((window, &sample), out) in windows
                .chunks_exact_mut(filter_length)
                .zip(incoming.iter())
                .zip(medians.iter_mut())
            {
                *out = update_window(window, sample, policy, strategy).color;
            }
        }

        // Every location is updated before the flag flips.
        self.replace_at_tail = !self.replace_at_tail;
        self.frames_processed += 1;
        debug!(
            frame = self.frames_processed,
            replace_at_tail = self.replace_at_tail,
            "Frame filtered"
        );

        let mut out = VideoFrame::new(Array2::from_shape_vec((h, w), medians)?);
        out.metadata = frame.metadata.clone();
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_length_rejected() {
        assert!(matches!(
            MedianFilter::new(0),
            Err(PixmedError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_lazy_sizing_on_first_frame() {
        let mut filter = MedianFilter::new(3).unwrap();
        assert_eq!(filter.location_count(), None);
        filter.process_frame(&VideoFrame::solid(4, 2, [9, 9, 9])).unwrap();
        assert_eq!(filter.location_count(), Some(8));
        assert_eq!(filter.frames_processed(), 1);
        assert!(filter.replace_at_tail());
    }

    #[test]
    fn test_flag_alternates_per_frame() {
        let mut filter = MedianFilter::new(2).unwrap();
        let frame = VideoFrame::solid(2, 2, [1, 1, 1]);
        let mut seen = Vec::new();
        for _ in 0..4 {
            seen.push(filter.replace_at_tail());
            filter.process_frame(&frame).unwrap();
        }
        assert_eq!(seen, vec![false, true, false, true]);
    }

    #[test]
    fn test_luma_shape_must_match_frame() {
        let mut filter = MedianFilter::new(3).unwrap();
        let frame = VideoFrame::solid(2, 2, [1, 1, 1]);
        let luma = LumaFrame::new(Array2::zeros((2, 3)));
        assert!(matches!(
            filter.process_frame_with_luma(&frame, &luma),
            Err(PixmedError::DimensionMismatch { .. })
        ));
        assert_eq!(filter.location_count(), None);
    }

    #[test]
    fn test_window_out_of_range_is_none() {
        let mut filter = MedianFilter::new(3).unwrap();
        filter.initialize(4).unwrap();
        assert!(filter.window(3).is_some());
        assert!(filter.window(4).is_none());
    }
}
