//! Sliding-window temporal median engine.
//!
//! Every pixel location owns a window of the last `filter_length` samples.
//! Each frame one slot per window is overwritten and the sample at brightness
//! rank `filter_length / 2` becomes the output color for that location.

mod filter;
mod sample;
mod selector;
mod store;

pub use filter::MedianFilter;
pub use sample::Sample;
pub use selector::{replace_slot, select_median, update_window, MedianStrategy, SlotPolicy};
pub use store::{WindowLifecycle, WindowStore};
