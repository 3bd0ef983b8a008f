//! Framerate-parameterized position arithmetic
//!
//! All conversions go through seconds: times are rounded to whole
//! milliseconds, frames to whole frames. Results are clamped at zero and at
//! [`TimeCode::MAX`] rather than overflowing.
//!
//! # Example
//!
//! ```rust
//! use sub_core::{Calculator, Framerate, FrameCount, TimeCode};
//!
//! let calc = Calculator::new(Framerate::Fps25);
//! let show: TimeCode = "00:00:02.000".parse()?;
//! assert_eq!(calc.time_to_frame(show), FrameCount(50));
//! assert_eq!(calc.frame_to_time(FrameCount(75)).to_string(), "00:00:03.000");
//! # Ok::<(), sub_core::CoreError>(())
//! ```

use crate::time::{FrameCount, Framerate, PositionTriple, TimeCode};

/// Converts between times, frames and seconds for one framerate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calculator {
    framerate: Framerate,
    fps: f64,
}

impl Calculator {
    /// Create a calculator for `framerate`
    #[must_use]
    pub fn new(framerate: Framerate) -> Self {
        Self {
            framerate,
            fps: framerate.fps(),
        }
    }

    /// Current framerate
    #[must_use]
    pub const fn framerate(&self) -> Framerate {
        self.framerate
    }

    /// Current frames per second
    #[must_use]
    pub const fn fps(&self) -> f64 {
        self.fps
    }

    /// Switch framerate for all subsequent conversions
    ///
    /// Values computed earlier are not touched; callers that store derived
    /// positions have to recompute them.
    pub fn set_framerate(&mut self, framerate: Framerate) {
        self.framerate = framerate;
        self.fps = framerate.fps();
    }

    /// Time as seconds
    #[must_use]
    pub fn time_to_seconds(&self, time: TimeCode) -> f64 {
        time.as_seconds()
    }

    /// Seconds as time, rounded to milliseconds and clamped
    #[must_use]
    pub fn seconds_to_time(&self, seconds: f64) -> TimeCode {
        TimeCode::from_seconds(seconds)
    }

    /// `frame / fps`
    #[must_use]
    pub fn frame_to_seconds(&self, frame: FrameCount) -> f64 {
        f64::from(frame.get()) / self.fps
    }

    /// `round(seconds * fps)`, clamped at zero
    #[must_use]
    pub fn seconds_to_frame(&self, seconds: f64) -> FrameCount {
        if seconds.is_nan() || seconds <= 0.0 {
            return FrameCount::ZERO;
        }
        let frames = (seconds * self.fps).round();
        if frames >= f64::from(u32::MAX) {
            FrameCount(u32::MAX)
        } else {
            FrameCount(frames as u32)
        }
    }

    /// Time to frame through seconds
    #[must_use]
    pub fn time_to_frame(&self, time: TimeCode) -> FrameCount {
        self.seconds_to_frame(self.time_to_seconds(time))
    }

    /// Frame to time through seconds
    #[must_use]
    pub fn frame_to_time(&self, frame: FrameCount) -> TimeCode {
        self.seconds_to_time(self.frame_to_seconds(frame))
    }

    /// `max(0, hide - show)`
    #[must_use]
    pub fn get_time_duration(&self, show: TimeCode, hide: TimeCode) -> TimeCode {
        hide.saturating_sub(show)
    }

    /// `max(0, hide - show)`
    #[must_use]
    pub fn get_frame_duration(&self, show: FrameCount, hide: FrameCount) -> FrameCount {
        hide.saturating_sub(show)
    }

    /// Add signed seconds to a time, clamping to the valid range
    #[must_use]
    pub fn add_seconds_to_time(&self, time: TimeCode, seconds: f64) -> TimeCode {
        self.seconds_to_time(self.time_to_seconds(time) + seconds)
    }

    /// Add two times, clamping to the valid range
    #[must_use]
    pub fn add_times(&self, x: TimeCode, y: TimeCode) -> TimeCode {
        x.saturating_add(y)
    }

    /// Add signed seconds to a frame, clamping at zero
    #[must_use]
    pub fn add_seconds_to_frame(&self, frame: FrameCount, seconds: f64) -> FrameCount {
        self.seconds_to_frame(self.frame_to_seconds(frame) + seconds)
    }

    /// Add a signed number of frames, clamping at zero
    #[must_use]
    pub fn add_frames(&self, frame: FrameCount, delta: i64) -> FrameCount {
        frame.saturating_add_signed(delta)
    }

    /// Build a time triple with its duration derived
    #[must_use]
    pub fn time_triple(&self, show: TimeCode, hide: TimeCode) -> PositionTriple<TimeCode> {
        PositionTriple::new(show, hide, self.get_time_duration(show, hide))
    }

    /// Build a frame triple with its duration derived
    #[must_use]
    pub fn frame_triple(&self, show: FrameCount, hide: FrameCount) -> PositionTriple<FrameCount> {
        PositionTriple::new(show, hide, self.get_frame_duration(show, hide))
    }

    /// Derive both triples from a show/hide pair given as times
    #[must_use]
    pub fn expand_times(
        &self,
        show: TimeCode,
        hide: TimeCode,
    ) -> (PositionTriple<TimeCode>, PositionTriple<FrameCount>) {
        let frames = self.frame_triple(self.time_to_frame(show), self.time_to_frame(hide));
        (self.time_triple(show, hide), frames)
    }

    /// Derive both triples from a show/hide pair given as frames
    #[must_use]
    pub fn expand_frames(
        &self,
        show: FrameCount,
        hide: FrameCount,
    ) -> (PositionTriple<TimeCode>, PositionTriple<FrameCount>) {
        let times = self.time_triple(self.frame_to_time(show), self.frame_to_time(hide));
        (times, self.frame_triple(show, hide))
    }

    /// Derive both triples from a show/hide pair in either unit
    #[must_use]
    pub fn expand<P: Position>(
        &self,
        show: P,
        hide: P,
    ) -> (PositionTriple<TimeCode>, PositionTriple<FrameCount>) {
        P::expand(self, show, hide)
    }
}

/// A position unit a document can be native in
///
/// Lets callers derive both triples from a show/hide pair without caring
/// which unit the pair came in.
pub trait Position: Copy + Ord + core::fmt::Debug {
    /// Derive `(times, frames)` from a show/hide pair in this unit
    fn expand(
        calc: &Calculator,
        show: Self,
        hide: Self,
    ) -> (PositionTriple<TimeCode>, PositionTriple<FrameCount>);
}

impl Position for TimeCode {
    fn expand(
        calc: &Calculator,
        show: Self,
        hide: Self,
    ) -> (PositionTriple<TimeCode>, PositionTriple<FrameCount>) {
        calc.expand_times(show, hide)
    }
}

impl Position for FrameCount {
    fn expand(
        calc: &Calculator,
        show: Self,
        hide: Self,
    ) -> (PositionTriple<TimeCode>, PositionTriple<FrameCount>) {
        calc.expand_frames(show, hide)
    }
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new(Framerate::default())
    }
}
