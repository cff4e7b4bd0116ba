#![cfg_attr(not(test), no_std)]

//! Turns noisy, per-tick sensor samples into a handful of clean events.
//!
//! Each debouncer is a small owned state machine with a single `update`
//! call per polling tick and a `clear` to return it to its initial state.
//! Time is always passed in by the caller; nothing here reads a clock.

use core::fmt;

pub mod controller;
pub mod edge;
pub mod gesture;
pub mod link;
pub mod presence;
pub mod tap;
pub mod ticker;

/// Millisecond timestamp from the monotonic tick counter.
pub type Instant = fugit::TimerInstantU64<1000>;
/// Millisecond duration matching [`Instant`].
pub type Duration = fugit::TimerDurationU64<1000>;

/// Time elapsed from `since` to `now`, saturating at zero if the clock
/// appears to have run backwards.
pub(crate) fn elapsed(now: Instant, since: Instant) -> Duration {
    now.checked_duration_since(since)
        .unwrap_or(Duration::from_ticks(0))
}

/// Which sensor pipeline the IR input drives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Each new IR approach toggles the flashlight.
    Sensors,
    /// IR presence keeps hand-gesture recognition awake.
    Gestures,
}

/// Configuration for all debouncers and the polling loop
#[derive(Clone, Copy, Debug)]
pub struct CompanionConfig {
    pub mode: Mode,
    /// Minimum time between two IR toggles. Measured from the last toggle that fired.
    pub wave_cooldown: Duration,
    /// A second tap must start strictly within this window of the first to count as a double tap.
    pub double_tap_window: Duration,
    /// Number of consecutive identical frames required to confirm a gesture
    pub gesture_window: usize,
    /// How long gesture recognition stays awake after the IR sensor last saw something
    pub wake_hold: Duration,
    /// Polling period of the main loop
    pub tick_period: Duration,
}

impl CompanionConfig {
    const fn default() -> Self {
        Self {
            mode: Mode::Sensors,
            wave_cooldown: Duration::millis(1000),
            double_tap_window: Duration::millis(500),
            gesture_window: 8,
            wake_hold: Duration::millis(2000),
            tick_period: Duration::millis(10),
        }
    }

    /// Check every duration and window size is usable.
    ///
    /// The gesture window is only checked for being non-zero here; its upper
    /// bound depends on the history capacity chosen by the caller.
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_zero(self.wave_cooldown, "wave_cooldown")?;
        non_zero(self.double_tap_window, "double_tap_window")?;
        non_zero(self.wake_hold, "wake_hold")?;
        non_zero(self.tick_period, "tick_period")?;
        if self.gesture_window == 0 {
            return Err(ConfigError::ZeroWindow);
        }
        Ok(())
    }
}

pub const DEFAULT_CONFIG: CompanionConfig = CompanionConfig::default();

pub(crate) fn non_zero(duration: Duration, name: &'static str) -> Result<Duration, ConfigError> {
    if duration.ticks() == 0 {
        Err(ConfigError::ZeroDuration(name))
    } else {
        Ok(duration)
    }
}

/// Rejected configuration values. Only ever returned from constructors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// The named duration was zero
    ZeroDuration(&'static str),
    /// A debounce window of zero samples can never be satisfied
    ZeroWindow,
    /// The debounce window does not fit in the history buffer
    WindowTooLarge { window: usize, capacity: usize },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroDuration(name) => write!(f, "{} must be greater than zero", name),
            ConfigError::ZeroWindow => write!(f, "gesture window must hold at least one sample"),
            ConfigError::WindowTooLarge { window, capacity } => write!(
                f,
                "gesture window of {} samples exceeds history capacity {}",
                window, capacity
            ),
        }
    }
}
