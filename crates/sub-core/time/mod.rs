//! Position value types
//!
//! - [`TimeCode`]: clamped millisecond times
//! - [`FrameCount`]: non-negative frame numbers
//! - [`PositionTriple`]: show/hide/duration in either unit
//! - [`Framerate`] and [`Mode`]: how the two units relate in a document

pub mod framerate;
pub mod position;
pub mod timecode;

pub use framerate::{Framerate, Mode};
pub use position::{Column, PositionTriple};
pub use timecode::{FrameCount, TimeCode, MAX_MILLIS, MAX_SECONDS};
