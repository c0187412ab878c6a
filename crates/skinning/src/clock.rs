use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

use log::debug;

pub const DEFAULT_LOOP_START: f32 = 0.5;
pub const DEFAULT_LOOP_END: f32 = 2.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClockError {
    /// start, end
    EmptyLoopWindow(f32, f32),
    BadPlaybackSpeed(f32),
}

impl Display for ClockError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ClockError::EmptyLoopWindow(start, end) => write!(
                f,
                "Loop window [{}, {}) is empty, start must be before end",
                start, end
            ),
            ClockError::BadPlaybackSpeed(speed) => write!(
                f,
                "Playback speed {} is not a finite non-negative number",
                speed
            ),
        }
    }
}

impl Error for ClockError {}

/// Time range `[start, end)` in seconds replayed by a looping clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoopWindow {
    start: f32,
    end: f32,
}

impl Default for LoopWindow {
    fn default() -> Self {
        Self {
            start: DEFAULT_LOOP_START,
            end: DEFAULT_LOOP_END,
        }
    }
}

impl LoopWindow {
    pub fn new(start: f32, end: f32) -> Result<Self, ClockError> {
        if start.is_finite() && end.is_finite() && start < end {
            Ok(Self { start, end })
        } else {
            Err(ClockError::EmptyLoopWindow(start, end))
        }
    }

    pub fn start(&self) -> f32 {
        self.start
    }

    pub fn end(&self) -> f32 {
        self.end
    }

    pub fn length(&self) -> f32 {
        self.end - self.start
    }

    /// Map `time` into the window.
    ///
    /// Before the window it holds at `start`, past `end` it replays the window
    /// from `start`, inside the window it passes through.
    pub fn apply(&self, time: f32) -> f32 {
        if time < self.start {
            self.start
        } else if time > self.end {
            self.start + (time - self.end) % self.length()
        } else {
            time
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClockMode {
    FreeRunning,
    BoundedLoop(LoopWindow),
}

/// Maps render time to the time an animation is sampled at.
///
/// The result is wrapped once more by each sampler's own duration during
/// evaluation. With a loop window longer than the animation, the replayed
/// range is itself wrapped by the animation duration.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationClock {
    window: LoopWindow,
    looping: bool,
    playback_speed: f32,
}

impl Default for AnimationClock {
    fn default() -> Self {
        Self {
            window: LoopWindow::default(),
            looping: true,
            playback_speed: 1.0,
        }
    }
}

impl AnimationClock {
    pub fn free_running() -> Self {
        Self {
            looping: false,
            ..Default::default()
        }
    }

    pub fn bounded(window: LoopWindow) -> Self {
        Self {
            window,
            ..Default::default()
        }
    }

    pub fn mode(&self) -> ClockMode {
        if self.looping {
            ClockMode::BoundedLoop(self.window)
        } else {
            ClockMode::FreeRunning
        }
    }

    pub fn loop_window(&self) -> &LoopWindow {
        &self.window
    }

    pub fn set_loop_window(&mut self, start: f32, end: f32) -> Result<(), ClockError> {
        self.window = LoopWindow::new(start, end)?;
        debug!("Loop window set to [{}, {})", start, end);
        Ok(())
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn enable_looping(&mut self, enable: bool) {
        self.looping = enable;
    }

    pub fn playback_speed(&self) -> f32 {
        self.playback_speed
    }

    pub fn set_playback_speed(&mut self, speed: f32) -> Result<(), ClockError> {
        if !speed.is_finite() || speed < 0.0 {
            return Err(ClockError::BadPlaybackSpeed(speed));
        }
        self.playback_speed = speed;
        Ok(())
    }

    /// Animation time for render time `time` in seconds.
    pub fn sample_time(&self, time: f32) -> f32 {
        let time = time * self.playback_speed;
        match self.mode() {
            ClockMode::FreeRunning => time,
            ClockMode::BoundedLoop(window) => window.apply(time),
        }
    }
}
