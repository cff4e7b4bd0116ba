//! The per-tick core of the polling loop.
//!
//! [`Controller`] owns one debouncer per sensor. Each tick it samples the
//! board through [`Sensors`], feeds the samples through the debouncers and
//! hands every confirmed event to [`Actuators`] as exactly one [`Action`].
//! The loop itself (timing, hardware setup) lives with the firmware.

use log::{debug, info};

use crate::edge::EdgeCooldown;
use crate::gesture::GestureDebouncer;
use crate::link::Hand;
use crate::presence::{Presence, PresenceHold};
use crate::tap::{Tap, TapWindow};
use crate::{CompanionConfig, ConfigError, Instant, Mode};

/// Default capacity of the gesture history
pub const GESTURE_CAPACITY: usize = 16;

/// Raw signal sources, sampled once per tick.
///
/// Implementations report a failed read as "inactive" / no frame rather than
/// as a value that could be mistaken for a real reading.
pub trait Sensors {
    /// True while the IR sensor sees something in front of it
    fn proximity(&mut self) -> bool;
    /// True while the touch pad is being touched
    fn touch(&mut self) -> bool;
    /// Classification of the newest camera frame, if one arrived since the last call
    fn hand(&mut self) -> Option<Hand>;
}

/// Performs actions on the polling thread. Must not block.
pub trait Actuators {
    fn perform(&mut self, action: Action);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    ToggleFlashlight,
    FlashlightOn,
    /// Flashlight off, buzzer silenced
    AllOff,
    CapturePhoto,
    DoubleBeep,
    PauseVision,
    ResumeVision,
}

impl From<Tap> for Action {
    fn from(tap: Tap) -> Self {
        match tap {
            Tap::Single => Action::CapturePhoto,
            Tap::Double => Action::DoubleBeep,
        }
    }
}

/// Map a confirmed finger count to its action. Unmapped counts do nothing.
pub fn gesture_action(fingers: u8) -> Option<Action> {
    match fingers {
        0 => Some(Action::AllOff),
        1 => Some(Action::FlashlightOn),
        2 => Some(Action::CapturePhoto),
        _ => None,
    }
}

pub struct Controller<const N: usize = GESTURE_CAPACITY> {
    mode: Mode,
    wave: EdgeCooldown,
    taps: TapWindow,
    presence: PresenceHold,
    gestures: GestureDebouncer<u8, N>,
}

impl<const N: usize> Controller<N> {
    pub fn new(config: &CompanionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            mode: config.mode,
            wave: EdgeCooldown::new(config.wave_cooldown)?,
            taps: TapWindow::new(config.double_tap_window)?,
            presence: PresenceHold::new(config.wake_hold)?,
            gestures: GestureDebouncer::new(config.gesture_window)?,
        })
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Put the board in its idle state before the first tick.
    pub fn start<B: Actuators>(&mut self, board: &mut B) {
        info!("starting in {:?} mode", self.mode);
        if self.mode == Mode::Gestures {
            board.perform(Action::PauseVision);
        }
    }

    /// Run one polling cycle.
    pub fn tick<B: Sensors + Actuators>(&mut self, now: Instant, board: &mut B) {
        let touched = board.touch();
        if let Some(tap) = self.taps.update(touched, now) {
            info!("{:?} tap", tap);
            dispatch(board, Action::from(tap));
        }

        let near = board.proximity();
        match self.mode {
            Mode::Sensors => {
                if self.wave.update(near, now) {
                    info!("wave");
                    dispatch(board, Action::ToggleFlashlight);
                }
            }
            Mode::Gestures => self.track_gestures(near, now, board),
        }
    }

    fn track_gestures<B: Sensors + Actuators>(&mut self, near: bool, now: Instant, board: &mut B) {
        match self.presence.update(near, now) {
            Some(Presence::Woke) => {
                info!("hand near, watching for gestures");
                dispatch(board, Action::ResumeVision);
            }
            Some(Presence::Slept) => {
                info!("hand gone, gesture detection sleeping");
                self.gestures.clear();
                dispatch(board, Action::PauseVision);
            }
            None => {}
        }

        // Always drain the frame so a stale one is not picked up after waking.
        let frame = board.hand();
        if !self.presence.is_awake() {
            return;
        }

        match frame {
            Some(Hand::Fingers(count)) => {
                if let Some(fingers) = self.gestures.update(count) {
                    info!("gesture: {} finger(s)", fingers);
                    if let Some(action) = gesture_action(fingers) {
                        dispatch(board, action);
                    }
                }
            }
            Some(Hand::Absent) => self.gestures.clear(),
            None => {}
        }
    }

    /// Reset every debouncer to its initial state.
    pub fn clear(&mut self) {
        self.wave.clear();
        self.taps.clear();
        self.presence.clear();
        self.gestures.clear();
    }

    /// Leave the board dark and quiet, and forget all pending state.
    pub fn shutdown<B: Actuators>(&mut self, board: &mut B) {
        info!("shutting down");
        board.perform(Action::AllOff);
        if self.mode == Mode::Gestures {
            board.perform(Action::PauseVision);
        }
        self.clear();
    }
}

fn dispatch<B: Actuators>(board: &mut B, action: Action) {
    debug!("action {:?}", action);
    board.perform(action);
}
