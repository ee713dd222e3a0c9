//! Input-side data handling: aligning the three series onto one timeline.

pub mod align;

pub use align::{align_series, AlignedSeries};
