//! # sub-core
//!
//! Position arithmetic for subtitle editing: clamped millisecond time codes,
//! frame counts, framerate presets and a [`Calculator`] that converts between
//! them for one framerate.
//!
//! ## Features
//!
//! - **Clamped values**: times live in `[00:00:00.000, 99:59:59.999]`, frames
//!   are never negative, durations never go below zero
//! - **Rounding containment**: seconds round to milliseconds, frames to whole
//!   frames, both through one code path
//! - **Serde**: optional serialization of all value types
//!
//! ## Quick Start
//!
//! ```rust
//! use sub_core::{Calculator, Framerate, TimeCode};
//!
//! let calc = Calculator::new(Framerate::Fps25);
//! let show: TimeCode = "00:00:01.000".parse()?;
//! let hide = calc.add_seconds_to_time(show, 2.5);
//! let (times, frames) = calc.expand_times(show, hide);
//! assert_eq!(times.duration.to_string(), "00:00:02.500");
//! assert_eq!(frames.show.get(), 25);
//! # Ok::<(), sub_core::CoreError>(())
//! ```

#![deny(unsafe_code)]

pub mod calculator;
pub mod errors;
pub mod time;

pub use calculator::{Calculator, Position};
pub use errors::{CoreError, Result};
pub use time::{Column, FrameCount, Framerate, Mode, PositionTriple, TimeCode};

/// Crate version for runtime compatibility checks
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
