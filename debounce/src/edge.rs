use crate::{elapsed, non_zero, ConfigError, Duration, Instant};

/// Fires once on the rising edge of a presence signal, then stays quiet
/// until `cooldown` has passed since that fire.
///
/// Further edges inside the cooldown are ignored and do not extend it.
#[derive(Clone, Debug)]
pub struct EdgeCooldown {
    cooldown: Duration,
    was_active: bool,
    /// `None` until the first fire, which counts as an elapsed cooldown
    last_trigger: Option<Instant>,
}

impl EdgeCooldown {
    pub fn new(cooldown: Duration) -> Result<Self, ConfigError> {
        Ok(Self {
            cooldown: non_zero(cooldown, "cooldown")?,
            was_active: false,
            last_trigger: None,
        })
    }

    /// Process one sample. Returns true when the edge should be acted on.
    pub fn update(&mut self, is_active: bool, now: Instant) -> bool {
        // Forget the last fire once its cooldown is over, so an old timestamp
        // is never compared against a much later clock.
        if let Some(last) = self.last_trigger {
            if elapsed(now, last) > self.cooldown {
                self.last_trigger = None;
            }
        }

        let rising_edge = is_active && !self.was_active;
        let fire = rising_edge && self.last_trigger.is_none();
        if fire {
            self.last_trigger = Some(now);
        }

        self.was_active = is_active;
        fire
    }

    pub fn clear(&mut self) {
        self.was_active = false;
        self.last_trigger = None;
    }

    pub fn last_trigger(&self) -> Option<Instant> {
        self.last_trigger
    }
}

#[cfg(test)]
pub mod test {
    use super::*;

    fn at(ms: u64) -> Instant {
        Instant::from_ticks(ms)
    }

    fn run(debouncer: &mut EdgeCooldown, samples: &[(bool, u64)]) -> Vec<bool> {
        samples
            .iter()
            .map(|&(active, ms)| debouncer.update(active, at(ms)))
            .collect()
    }

    #[test]
    fn test_fires_on_rising_edges_outside_cooldown() {
        let mut edge = EdgeCooldown::new(Duration::millis(1000)).unwrap();

        let fired = run(
            &mut edge,
            &[(false, 0), (true, 1000), (true, 2000), (false, 3000), (true, 4000)],
        );
        assert_eq!(fired, [false, true, false, false, true]);
        assert_eq!(edge.last_trigger(), Some(at(4000)));
    }

    #[test]
    fn test_first_edge_fires_immediately() {
        let mut edge = EdgeCooldown::new(Duration::millis(1000)).unwrap();
        assert!(edge.update(true, at(0)), "Initial approach should not wait for a cooldown");
    }

    #[test]
    fn test_held_signal_fires_once() {
        let mut edge = EdgeCooldown::new(Duration::millis(100)).unwrap();
        let fired = (0..50).filter(|i| edge.update(true, at(i * 10))).count();
        assert_eq!(fired, 1);
    }

    #[test]
    fn test_edges_inside_cooldown_do_not_extend_it() {
        let mut edge = EdgeCooldown::new(Duration::millis(1000)).unwrap();

        let fired = run(
            &mut edge,
            &[
                (true, 0),
                (false, 300),
                (true, 600), // suppressed
                (false, 900),
                (true, 1001), // 1001ms after the fire at 0
            ],
        );
        assert_eq!(fired, [true, false, false, false, true]);
    }

    #[test]
    fn test_cooldown_boundary_is_strict() {
        let mut edge = EdgeCooldown::new(Duration::millis(500)).unwrap();
        assert!(edge.update(true, at(0)));
        edge.update(false, at(250));
        assert!(!edge.update(true, at(500)), "Fired with exactly the cooldown elapsed");
        edge.update(false, at(501));
        assert!(edge.update(true, at(502)));
    }

    #[test]
    fn test_wave_after_long_idle() {
        let mut edge = EdgeCooldown::new(Duration::millis(1000)).unwrap();
        assert!(edge.update(true, at(0)));
        edge.update(false, at(100));
        edge.update(false, at((1 << 31) + 990));
        assert!(edge.update(true, at((1 << 31) + 1000)), "Wave ignored after long idle");
    }

    #[test]
    fn test_wave_after_idle_past_32_bit_millis() {
        let mut edge = EdgeCooldown::new(Duration::millis(1000)).unwrap();
        assert!(edge.update(true, at(5)));
        // No samples at all in between
        assert!(!edge.update(false, at(u32::MAX as u64 + 10)));
        assert!(edge.update(true, at(u32::MAX as u64 + 20)));
        assert_eq!(edge.last_trigger(), Some(at(u32::MAX as u64 + 20)));
    }

    #[test]
    fn test_expired_trigger_forgotten_without_edges() {
        let mut edge = EdgeCooldown::new(Duration::millis(500)).unwrap();
        edge.update(true, at(0));
        edge.update(true, at(400));
        assert_eq!(edge.last_trigger(), Some(at(0)));
        edge.update(true, at(501));
        assert_eq!(edge.last_trigger(), None);
    }

    #[test]
    fn test_falling_edge_never_fires() {
        let mut edge = EdgeCooldown::new(Duration::millis(10)).unwrap();
        edge.update(true, at(0));
        assert!(!edge.update(false, at(1000)));
        assert!(!edge.update(false, at(2000)));
    }

    #[test]
    fn test_clear_matches_fresh_instance() {
        let samples = [(true, 0), (false, 100), (true, 200), (false, 1500), (true, 1600)];

        let mut fresh = EdgeCooldown::new(Duration::millis(1000)).unwrap();
        let expected = run(&mut fresh, &samples);

        let mut reused = EdgeCooldown::new(Duration::millis(1000)).unwrap();
        run(&mut reused, &[(true, 0), (true, 50)]);
        reused.clear();
        assert_eq!(run(&mut reused, &samples), expected);
    }

    #[test]
    fn test_zero_cooldown_rejected() {
        assert_eq!(
            EdgeCooldown::new(Duration::from_ticks(0)).unwrap_err(),
            ConfigError::ZeroDuration("cooldown")
        );
    }
}
