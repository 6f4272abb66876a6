use tracing::debug;

use crate::error::{PixmedError, Result};

use super::sample::Sample;
use super::selector::{replace_slot, select_median, MedianStrategy, SlotPolicy};

/// Every location's window in one flat buffer.
///
/// Window `i` occupies `samples[i * filter_length..(i + 1) * filter_length]`.
#[derive(Clone, Debug)]
pub struct WindowStore {
    samples: Vec<Sample>,
    location_count: usize,
    filter_length: usize,
}

impl WindowStore {
    /// Allocate `location_count` windows, each filled with [`Sample::SENTINEL`].
    pub fn new(location_count: usize, filter_length: usize) -> Result<Self> {
        if filter_length == 0 {
            return Err(PixmedError::InvalidConfiguration(
                "filter length must be at least 1".into(),
            ));
        }
        if location_count == 0 {
            return Err(PixmedError::InvalidConfiguration(
                "location count must be at least 1".into(),
            ));
        }
        let total = location_count.checked_mul(filter_length).ok_or_else(|| {
            PixmedError::InvalidConfiguration(format!(
                "{location_count} locations x {filter_length} samples overflows"
            ))
        })?;

        Ok(Self {
            samples: vec![Sample::SENTINEL; total],
            location_count,
            filter_length,
        })
    }

    pub fn location_count(&self) -> usize {
        self.location_count
    }

    pub fn filter_length(&self) -> usize {
        self.filter_length
    }

    fn range(&self, location: usize) -> std::ops::Range<usize> {
        assert!(
            location < self.location_count,
            "location {location} out of range ({} locations)",
            self.location_count
        );
        let start = location * self.filter_length;
        start..start + self.filter_length
    }

    pub fn window(&self, location: usize) -> &[Sample] {
        &self.samples[self.range(location)]
    }

    pub fn window_mut(&mut self, location: usize) -> &mut [Sample] {
        let range = self.range(location);
        &mut self.samples[range]
    }

    /// The whole buffer; chunk it by `filter_length` to walk the windows.
    pub fn samples_mut(&mut self) -> &mut [Sample] {
        &mut self.samples
    }

    pub fn replace(
        &mut self,
        location: usize,
        sample: Sample,
        policy: SlotPolicy,
        strategy: MedianStrategy,
    ) {
        replace_slot(self.window_mut(location), sample, policy, strategy);
    }

    pub fn select_median(&mut self, location: usize, strategy: MedianStrategy) -> Sample {
        select_median(self.window_mut(location), strategy)
    }
}

/// `Uninitialized` until the first frame (or an explicit pre-size) fixes the
/// location count; `Ready` afterwards for the rest of the filter's life.
#[derive(Clone, Debug, Default)]
pub enum WindowLifecycle {
    #[default]
    Uninitialized,
    Ready(WindowStore),
}

impl WindowLifecycle {
    /// Move to `Ready`, or confirm the existing store has the same shape.
    pub fn initialize(
        &mut self,
        location_count: usize,
        filter_length: usize,
    ) -> Result<&mut WindowStore> {
        if let Self::Uninitialized = self {
            let store = WindowStore::new(location_count, filter_length)?;
            debug!(location_count, filter_length, "Allocated window store");
            *self = Self::Ready(store);
        }
        match self {
            Self::Ready(store) => {
                if store.location_count != location_count || store.filter_length != filter_length {
                    return Err(PixmedError::AlreadyInitializedMismatch {
                        current_locations: store.location_count,
                        current_length: store.filter_length,
                        requested_locations: location_count,
                        requested_length: filter_length,
                    });
                }
                Ok(store)
            }
            Self::Uninitialized => Err(PixmedError::InvalidConfiguration(
                "window store was not allocated".into(),
            )),
        }
    }

    pub fn store(&self) -> Option<&WindowStore> {
        match self {
            Self::Ready(store) => Some(store),
            Self::Uninitialized => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_fills_with_sentinels() {
        let store = WindowStore::new(4, 3).unwrap();
        for loc in 0..4 {
            assert_eq!(store.window(loc), &[Sample::SENTINEL; 3]);
        }
    }

    #[test]
    fn test_zero_length_rejected() {
        assert!(matches!(
            WindowStore::new(4, 0),
            Err(PixmedError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_windows_are_disjoint() {
        let mut store = WindowStore::new(3, 2).unwrap();
        let s = Sample::new([1, 2, 3], 2);
        store.replace(1, s, SlotPolicy::Tail, MedianStrategy::Partial);
        assert_eq!(store.window(0), &[Sample::SENTINEL; 2]);
        assert_eq!(store.window(1), &[Sample::SENTINEL, s]);
        assert_eq!(store.window(2), &[Sample::SENTINEL; 2]);
    }

    #[test]
    fn test_lifecycle_reinitialize() {
        let mut lifecycle = WindowLifecycle::default();
        assert!(!lifecycle.is_ready());
        let store = lifecycle.initialize(6, 5).unwrap();
        assert_eq!((store.location_count(), store.filter_length()), (6, 5));
        assert!(lifecycle.is_ready());
        let store = lifecycle.initialize(6, 5).unwrap();
        assert_eq!(store.window(5).len(), 5);
        assert!(matches!(
            lifecycle.initialize(6, 4),
            Err(PixmedError::AlreadyInitializedMismatch {
                current_length: 5,
                requested_length: 4,
                ..
            })
        ));
        assert!(matches!(
            lifecycle.initialize(7, 5),
            Err(PixmedError::AlreadyInitializedMismatch { .. })
        ));
    }
}
