use crate::{elapsed, non_zero, ConfigError, Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Presence {
    Woke,
    Slept,
}

/// Keeps a consumer awake while a proximity sensor sees something, and for
/// `hold` after it last did.
///
/// Brief dropouts shorter than the hold never produce a sleep/wake pair.
#[derive(Clone, Debug)]
pub struct PresenceHold {
    hold: Duration,
    awake: bool,
    last_seen: Option<Instant>,
}

impl PresenceHold {
    pub fn new(hold: Duration) -> Result<Self, ConfigError> {
        Ok(Self {
            hold: non_zero(hold, "wake_hold")?,
            awake: false,
            last_seen: None,
        })
    }

    pub fn update(&mut self, detected: bool, now: Instant) -> Option<Presence> {
        if detected {
            self.last_seen = Some(now);
            if !self.awake {
                self.awake = true;
                return Some(Presence::Woke);
            }
            return None;
        }

        match self.last_seen {
            Some(seen) if self.awake && elapsed(now, seen) > self.hold => {
                self.awake = false;
                Some(Presence::Slept)
            }
            _ => None,
        }
    }

    pub fn is_awake(&self) -> bool {
        self.awake
    }

    pub fn clear(&mut self) {
        self.awake = false;
        self.last_seen = None;
    }
}

#[cfg(test)]
pub mod test {
    use super::*;

    fn at(ms: u64) -> Instant {
        Instant::from_ticks(ms)
    }

    #[test]
    fn test_wake_and_sleep() {
        let mut p = PresenceHold::new(Duration::millis(2000)).unwrap();
        assert!(!p.is_awake());
        assert_eq!(p.update(false, at(0)), None);

        assert_eq!(p.update(true, at(100)), Some(Presence::Woke));
        assert_eq!(p.update(true, at(200)), None);
        assert!(p.is_awake());

        assert_eq!(p.update(false, at(1000)), None);
        assert_eq!(p.update(false, at(2200)), None, "Slept with exactly the hold elapsed");
        assert_eq!(p.update(false, at(2201)), Some(Presence::Slept));
        assert!(!p.is_awake());
        assert_eq!(p.update(false, at(5000)), None);
    }

    #[test]
    fn test_dropout_shorter_than_hold() {
        let mut p = PresenceHold::new(Duration::millis(500)).unwrap();
        let mut events = Vec::new();
        for t in (0..3000).step_by(10) {
            // Sensor flickers off for 300ms every 600ms.
            let detected = t < 2000 && (t % 600) < 300;
            if let Some(e) = p.update(detected, at(t)) {
                events.push((t, e));
            }
        }
        assert_eq!(events, [(0, Presence::Woke), (2500, Presence::Slept)]);
    }

    #[test]
    fn test_clear_sleeps_silently() {
        let mut p = PresenceHold::new(Duration::millis(500)).unwrap();
        p.update(true, at(0));
        p.clear();
        assert!(!p.is_awake());
        assert_eq!(p.update(false, at(10_000)), None);
        assert_eq!(p.update(true, at(10_010)), Some(Presence::Woke));
    }
}
