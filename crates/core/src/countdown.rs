//! Whole-second countdown used as the session clock.
//!
//! The countdown does not own a timer. Whoever drives it calls [`Countdown::tick`]
//! once per elapsed second; that keeps it deterministic under test.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownState {
    Idle,
    Running,
    Stopped,
}

/// Result of a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Not running; nothing happened.
    Idle,
    Running { remaining: u32 },
    /// Reached zero on this tick. Emitted exactly once.
    Expired,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    remaining: u32,
    low_time_threshold: u32,
    state: CountdownState,
}

impl Countdown {
    #[must_use]
    pub fn new(duration_secs: u32, low_time_threshold_secs: u32) -> Self {
        Self {
            remaining: duration_secs,
            low_time_threshold: low_time_threshold_secs,
            state: CountdownState::Idle,
        }
    }

    /// Begin counting down. Only an idle countdown can be started.
    pub fn start(&mut self) -> bool {
        if self.state != CountdownState::Idle {
            return false;
        }
        self.state = CountdownState::Running;
        true
    }

    /// Stop for good. There is no pause/resume.
    pub fn stop(&mut self) {
        self.state = CountdownState::Stopped;
    }

    pub fn tick(&mut self) -> Tick {
        if self.state != CountdownState::Running {
            return Tick::Idle;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.state = CountdownState::Stopped;
            return Tick::Expired;
        }
        Tick::Running {
            remaining: self.remaining,
        }
    }

    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    #[must_use]
    pub fn state(&self) -> CountdownState {
        self.state
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state == CountdownState::Running
    }

    #[must_use]
    pub fn is_low_time(&self) -> bool {
        self.is_running() && self.remaining <= self.low_time_threshold
    }
}

/// `MM:SS`, zero padded. Minutes are not wrapped into hours.
#[must_use]
pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
