//! Adaptive frame source
//!
//! A reactor source that fires a callback at a target frame rate. The next
//! interval is measured from when the previous frame actually fired, so time
//! spent inside the callback counts toward the interval. Frames that are
//! missed because the callback ran long are dropped, never replayed: at most
//! one frame is due at any time.

use glide_core::reactor::{priority, ControlFlow, Priority, Reactor, Readiness, Source, SourceId};
use glide_core::ReactorError;

/// Name reported by frame sources
pub const FRAME_SOURCE_NAME: &str = "frame timeout";

/// Frame pacing state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameTimer {
    interval_ms: u64,
    last_frame_ms: Option<u64>,
}

impl FrameTimer {
    /// `fps` below 1 is treated as 1
    pub fn new(fps: u32) -> Self {
        let fps = u64::from(fps.max(1));
        Self {
            interval_ms: (1000 / fps).max(1),
            last_frame_ms: None,
        }
    }

    /// Milliseconds between frames, never zero
    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    /// Time of the last fired frame, `None` before the timer is first polled
    pub fn last_frame_ms(&self) -> Option<u64> {
        self.last_frame_ms
    }

    /// Decide whether a frame is due at `now_ms`
    ///
    /// The first poll only establishes the baseline; the first frame fires one
    /// full interval later. A due frame moves the baseline to `now_ms`.
    pub fn prepare(&mut self, now_ms: u64) -> Readiness {
        let Some(last) = self.last_frame_ms else {
            self.last_frame_ms = Some(now_ms);
            return Readiness::wait(self.interval_ms);
        };

        let elapsed = now_ms.saturating_sub(last);
        if elapsed >= self.interval_ms {
            self.last_frame_ms = Some(now_ms);
            Readiness::ready(self.interval_ms)
        } else {
            Readiness::wait(self.interval_ms - elapsed)
        }
    }

    pub fn check(&mut self, now_ms: u64) -> bool {
        self.prepare(now_ms).ready
    }
}

/// Frame callback: return [`ControlFlow::Break`] to remove the source
pub type FrameCallback = Box<dyn FnMut() -> ControlFlow>;

/// Reactor source wrapping a [`FrameTimer`]
pub struct FrameSource {
    timer: FrameTimer,
    callback: FrameCallback,
}

impl FrameSource {
    pub fn new<F>(fps: u32, callback: F) -> Self
    where
        F: FnMut() -> ControlFlow + 'static,
    {
        Self {
            timer: FrameTimer::new(fps),
            callback: Box::new(callback),
        }
    }

    pub fn timer(&self) -> &FrameTimer {
        &self.timer
    }
}

impl Source for FrameSource {
    fn name(&self) -> &str {
        FRAME_SOURCE_NAME
    }

    fn prepare(&mut self, now_ms: u64) -> Readiness {
        self.timer.prepare(now_ms)
    }

    fn check(&mut self, now_ms: u64) -> bool {
        self.timer.check(now_ms)
    }

    fn dispatch(&mut self) -> ControlFlow {
        (self.callback)()
    }
}

/// Call `callback` `fps` times per second at the default priority
///
/// The callback keeps firing until it returns [`ControlFlow::Break`] or the
/// returned source is removed. The first call happens one interval after the
/// reactor first polls the source.
pub fn add_frame_source<F>(
    reactor: &dyn Reactor,
    fps: u32,
    callback: F,
) -> Result<SourceId, ReactorError>
where
    F: FnMut() -> ControlFlow + 'static,
{
    add_frame_source_full(reactor, priority::DEFAULT, fps, callback)
}

/// [`add_frame_source`] with an explicit priority
pub fn add_frame_source_full<F>(
    reactor: &dyn Reactor,
    priority: Priority,
    fps: u32,
    callback: F,
) -> Result<SourceId, ReactorError>
where
    F: FnMut() -> ControlFlow + 'static,
{
    let source = FrameSource::new(fps, callback);
    tracing::trace!(fps, interval_ms = source.timer().interval_ms(), "adding frame source");
    reactor.add_source(priority, Box::new(source))
}
