//! Tick-advanced timers. Timed effects are plain records stepped by the
//! simulation so they can be inspected, reset, and tested without wall-clock waits.

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Countdown {
    remaining_ms: u32,
}

impl Countdown {
    pub fn new(duration_ms: u32) -> Self {
        Self { remaining_ms: duration_ms }
    }

    pub fn idle() -> Self {
        Self { remaining_ms: 0 }
    }

    pub fn restart(&mut self, duration_ms: u32) {
        self.remaining_ms = duration_ms;
    }

    pub fn clear(&mut self) {
        self.remaining_ms = 0;
    }

    pub fn is_running(&self) -> bool {
        self.remaining_ms > 0
    }

    pub fn remaining_ms(&self) -> u32 {
        self.remaining_ms
    }

    /// Returns true on the step that brings the countdown to zero.
    pub fn advance(&mut self, dt_ms: u32) -> bool {
        if self.remaining_ms == 0 {
            return false;
        }
        self.remaining_ms = self.remaining_ms.saturating_sub(dt_ms);
        self.remaining_ms == 0
    }
}

/// A phase that lasts a fixed time, e.g. a reload or a dodge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timed<P> {
    pub phase: P,
    pub elapsed_ms: u32,
    pub duration_ms: u32,
}

impl<P: Copy> Timed<P> {
    pub fn start(phase: P, duration_ms: u32) -> Self {
        Self { phase, elapsed_ms: 0, duration_ms }
    }

    pub fn is_complete(&self) -> bool {
        self.elapsed_ms >= self.duration_ms
    }

    pub fn progress(&self) -> f32 {
        if self.duration_ms == 0 {
            return 1.0;
        }
        (self.elapsed_ms as f32 / self.duration_ms as f32).min(1.0)
    }

    /// Returns true on the step that completes the phase.
    pub fn advance(&mut self, dt_ms: u32) -> bool {
        if self.is_complete() {
            return false;
        }
        self.elapsed_ms = self.elapsed_ms.saturating_add(dt_ms);
        self.is_complete()
    }
}
