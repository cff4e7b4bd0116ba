use crate::{elapsed, non_zero, ConfigError, Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tap {
    Single,
    Double,
}

/// Separates single taps from double taps on a touch input.
///
/// The first rising edge arms a pending single tap. A second rising edge
/// strictly inside the window confirms a double tap on that same tick. If
/// the window runs out first, the single tap is reported on the first tick
/// strictly past it. A single tap therefore always lags the touch by the full
/// window, while a double tap is immediate.
///
/// A rising edge that is not a double tap always restarts the window, even
/// when an expired single tap has not yet been reported.
#[derive(Clone, Debug)]
pub struct TapWindow {
    window: Duration,
    was_active: bool,
    /// Start of the window of a pending single tap
    pending: Option<Instant>,
}

impl TapWindow {
    pub fn new(window: Duration) -> Result<Self, ConfigError> {
        Ok(Self {
            window: non_zero(window, "double_tap_window")?,
            was_active: false,
            pending: None,
        })
    }

    /// Process one sample. At most one tap is returned per call.
    pub fn update(&mut self, is_active: bool, now: Instant) -> Option<Tap> {
        let rising_edge = is_active && !self.was_active;
        self.was_active = is_active;

        if rising_edge {
            match self.pending {
                Some(start) if elapsed(now, start) < self.window => {
                    self.pending = None;
                    return Some(Tap::Double);
                }
                _ => self.pending = Some(now),
            }
        }

        match self.pending {
            Some(start) if elapsed(now, start) > self.window => {
                self.pending = None;
                Some(Tap::Single)
            }
            _ => None,
        }
    }

    /// True while a first tap is waiting to learn whether a second follows
    pub fn pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn clear(&mut self) {
        self.was_active = false;
        self.pending = None;
    }
}
