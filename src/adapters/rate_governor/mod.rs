//! Rate governor adapters.

mod sliding_window;

pub use sliding_window::SlidingWindowGovernor;
