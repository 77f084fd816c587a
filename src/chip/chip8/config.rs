/// Decides what drives the delay and sound timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerMode {
    /// The timers are decremented once every `n` completed cycles. A value of 0
    /// behaves like 1.
    Cycles(u8),

    /// The timers are left alone by `cycle` and are instead decremented at 60 Hz
    /// from the elapsed time the driver passes to `Chip8::advance_timers`.
    WallClock,
}

impl Default for TimerMode {
    fn default() -> Self {
        TimerMode::Cycles(1)
    }
}

/// Runtime configuration of a `Chip8`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Chip8Config {
    pub timer_mode: TimerMode,
}

impl Chip8Config {
    pub fn with_timer_mode(timer_mode: TimerMode) -> Self {
        Chip8Config { timer_mode }
    }

    /// Number of completed cycles between two timer decrements, or `None` if the
    /// timers are driven by the wall clock.
    pub(super) fn timer_resolution(&self) -> Option<u8> {
        match self.timer_mode {
            TimerMode::Cycles(n) => Some(n.max(1)),
            TimerMode::WallClock => None,
        }
    }
}
