use debounce::{Duration, Instant};
use embedded_hal::digital::v2::OutputPin;

/// Alternating on/off phase lengths, starting with on
pub type Pattern = &'static [Duration];

pub const BEEP: Pattern = &[Duration::millis(300)];
pub const DOUBLE_BEEP: Pattern = &[
    Duration::millis(150),
    Duration::millis(100),
    Duration::millis(150),
];

/// A buzzer on a plain output pin, played without blocking the polling loop.
///
/// `service` must be called every loop iteration; phase changes happen on
/// the first call at or after each phase end.
pub struct Buzzer<P> {
    pin: P,
    pattern: Pattern,
    phase: usize,
    phase_end: Option<Instant>,
}

impl<P: OutputPin> Buzzer<P> {
    pub fn new(mut pin: P) -> Self {
        pin.set_low().ok();
        Self {
            pin,
            pattern: &[],
            phase: 0,
            phase_end: None,
        }
    }

    /// Start a pattern, cutting off whatever was playing
    pub fn play(&mut self, pattern: Pattern, now: Instant) {
        self.pattern = pattern;
        self.phase = 0;
        self.enter_phase(now);
    }

    pub fn service(&mut self, now: Instant) {
        if let Some(end) = self.phase_end {
            if now >= end {
                self.phase += 1;
                self.enter_phase(now);
            }
        }
    }

    pub fn stop(&mut self) {
        self.pattern = &[];
        self.phase_end = None;
        self.pin.set_low().ok();
    }

    fn enter_phase(&mut self, now: Instant) {
        match self.pattern.get(self.phase) {
            Some(&length) => {
                if self.phase % 2 == 0 {
                    self.pin.set_high().ok();
                } else {
                    self.pin.set_low().ok();
                }
                self.phase_end = Some(now + length);
            }
            None => self.stop(),
        }
    }
}
