use std::time::{Duration, Instant};

/// Seconds a test lasts unless overridden
pub const DEFAULT_COUNTDOWN_SECS: u64 = 60;

const TICK: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownState {
    /// Waiting for the first keystroke
    Idle,
    Running,
    /// Ran out of time
    Expired,
    /// Stopped early by a manual submission
    Halted,
}

/// Emitted by [`Countdown::poll`] when a scheduled tick fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownEvent {
    Tick { remaining: u64 },
    Expired,
}

/// One-second countdown driven by the UI event loop.
///
/// The pending tick is an explicit deadline rather than a timer thread: the
/// loop calls [`Countdown::poll`] whenever it wakes up and a due deadline
/// fires at most one tick per call. Halting or resetting drops the deadline.
#[derive(Debug, Clone)]
pub struct Countdown {
    total_secs: u64,
    remaining_secs: u64,
    state: CountdownState,
    started_at: Option<Instant>,
    next_tick: Option<Instant>,
}

impl Countdown {
    pub fn new(total_secs: u64) -> Self {
        Self {
            total_secs,
            remaining_secs: total_secs,
            state: CountdownState::Idle,
            started_at: None,
            next_tick: None,
        }
    }

    /// Start on the first keystroke. The second in progress is charged
    /// immediately, so a full run takes exactly `total_secs` of wall time.
    /// Returns false if the countdown was not idle.
    pub fn start(&mut self, now: Instant) -> bool {
        if self.state != CountdownState::Idle {
            return false;
        }
        self.state = CountdownState::Running;
        self.started_at = Some(now);
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        self.next_tick = Some(now + TICK);
        true
    }

    pub fn poll(&mut self, now: Instant) -> Option<CountdownEvent> {
        let deadline = self.next_tick?;
        if now < deadline {
            return None;
        }

        if self.remaining_secs == 0 {
            self.state = CountdownState::Expired;
            self.next_tick = None;
            return Some(CountdownEvent::Expired);
        }

        self.remaining_secs -= 1;
        self.next_tick = Some(deadline + TICK);
        Some(CountdownEvent::Tick {
            remaining: self.remaining_secs,
        })
    }

    /// Stop early on manual submission. Cancels the pending tick; an idle or
    /// finished countdown is left alone.
    pub fn halt(&mut self) {
        if self.state == CountdownState::Running {
            self.state = CountdownState::Halted;
        }
        self.next_tick = None;
    }

    pub fn reset(&mut self) {
        self.state = CountdownState::Idle;
        self.remaining_secs = self.total_secs;
        self.started_at = None;
        self.next_tick = None;
    }

    pub fn state(&self) -> CountdownState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == CountdownState::Running
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.state, CountdownState::Expired | CountdownState::Halted)
    }

    pub fn total_secs(&self) -> u64 {
        self.total_secs
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    /// Seconds used so far, `total - remaining`
    pub fn elapsed_secs(&self) -> u64 {
        self.total_secs - self.remaining_secs
    }

    pub fn started_at(&self) -> Option<Instant> {
        self.started_at
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.next_tick
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new(DEFAULT_COUNTDOWN_SECS)
    }
}
