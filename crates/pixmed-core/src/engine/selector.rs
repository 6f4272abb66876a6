use serde::{Deserialize, Serialize};

use super::sample::Sample;

/// Which ordinal slot of a window the next sample overwrites.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotPolicy {
    /// Ordinal position 0.
    Front,
    /// Ordinal position `filter_length - 1`.
    Tail,
}

impl SlotPolicy {
    pub fn from_replace_at_tail(replace_at_tail: bool) -> Self {
        if replace_at_tail {
            Self::Tail
        } else {
            Self::Front
        }
    }

    fn slot(self, len: usize) -> usize {
        match self {
            Self::Front => 0,
            Self::Tail => len - 1,
        }
    }
}

/// How a window is ordered between frames and how its median is found.
///
/// Neither strategy evicts the chronologically oldest sample. Overwriting
/// the front or tail slot evicts whichever sample currently sits there:
///
/// - `Sorted` keeps every window totally ordered by brightness, so the front
///   slot holds the darkest sample and the tail the brightest. Alternating
///   front/tail trims one extreme per frame. Replacing costs
///   O(filter_length) for the insertion shift; selection is a lookup.
/// - `Partial` runs `select_nth_unstable` each frame. Only the median slot is
///   placed; the front and tail slots hold unspecified members of the lower
///   and upper partitions. Replacing is O(1); selection is O(filter_length).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MedianStrategy {
    #[default]
    Sorted,
    Partial,
}

impl std::fmt::Display for MedianStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sorted => write!(f, "Sorted"),
            Self::Partial => write!(f, "Partial"),
        }
    }
}

/// Overwrite the slot chosen by `policy` with `sample`.
///
/// Under [`MedianStrategy::Sorted`] the new sample is then shifted into
/// brightness order, so the window stays sorted.
pub fn replace_slot(
    window: &mut [Sample],
    sample: Sample,
    policy: SlotPolicy,
    strategy: MedianStrategy,
) {
    let slot = policy.slot(window.len());
    window[slot] = sample;
    if strategy == MedianStrategy::Sorted {
        sift_into_place(window, slot);
    }
}

/// Sample at brightness rank `len / 2`.
///
/// Takes `&mut` because partial selection reorders the window in place.
pub fn select_median(window: &mut [Sample], strategy: MedianStrategy) -> Sample {
    let mid = window.len() / 2;
    match strategy {
        MedianStrategy::Sorted => {
            debug_assert!(window.windows(2).all(|p| p[0].brightness <= p[1].brightness));
            window[mid]
        }
        MedianStrategy::Partial => *window.select_nth_unstable_by_key(mid, |s| s.brightness).1,
    }
}

/// One location's work for one frame: replace, then select.
pub fn update_window(
    window: &mut [Sample],
    sample: Sample,
    policy: SlotPolicy,
    strategy: MedianStrategy,
) -> Sample {
    replace_slot(window, sample, policy, strategy);
    select_median(window, strategy)
}

// Only the entry at `idx` can be out of place.
fn sift_into_place(window: &mut [Sample], mut idx: usize) {
    while idx > 0 && window[idx - 1].brightness > window[idx].brightness {
        window.swap(idx - 1, idx);
        idx -= 1;
    }
    while idx + 1 < window.len() && window[idx + 1].brightness < window[idx].brightness {
        window.swap(idx, idx + 1);
        idx += 1;
    }
}
