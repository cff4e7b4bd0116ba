use debounce::controller::{Action, Actuators, Sensors};
use debounce::link::{self, Command, Hand, Inbound};
use debounce::Instant;
use embedded_hal::digital::v2::{InputPin, OutputPin};
use log::{info, warn};

use crate::buzzer::{Buzzer, BEEP, DOUBLE_BEEP};
use crate::serial::uart1;

/// Everything the controller can see and touch.
///
/// Pin read errors are reported as "inactive" so they can never look like a
/// touch or an approach.
pub struct Board<IR, TOUCH, LIGHT, BUZZ> {
    /// IR obstacle module, pulled low while something is in range
    ir: IR,
    /// Capacitive touch module, driven high while touched
    touch: TOUCH,
    flashlight: LIGHT,
    flashlight_on: bool,
    buzzer: Buzzer<BUZZ>,
    now: Instant,
    frame: Option<Hand>,
    shutdown_requested: bool,
}

impl<IR, TOUCH, LIGHT, BUZZ> Board<IR, TOUCH, LIGHT, BUZZ>
where
    IR: InputPin,
    TOUCH: InputPin,
    LIGHT: OutputPin,
    BUZZ: OutputPin,
{
    pub fn new(ir: IR, touch: TOUCH, mut flashlight: LIGHT, buzzer: BUZZ, now: Instant) -> Self {
        flashlight.set_low().ok();
        Self {
            ir,
            touch,
            flashlight,
            flashlight_on: false,
            buzzer: Buzzer::new(buzzer),
            now,
            frame: None,
            shutdown_requested: false,
        }
    }

    /// Advance time-driven outputs and take in anything received on the link.
    /// Called every loop iteration, ahead of the controller tick.
    pub fn service(&mut self, now: Instant) {
        self.now = now;
        self.buzzer.service(now);
        while let Some(byte) = uart1::read_byte() {
            self.receive(byte);
        }
    }

    pub fn shutdown_requested(&self) -> bool {
        self.shutdown_requested
    }

    pub fn beep(&mut self) {
        self.buzzer.play(BEEP, self.now);
    }

    fn receive(&mut self, byte: u8) {
        match link::decode(byte) {
            // Only the newest frame matters if several arrive within one tick.
            Ok(Some(Inbound::Frame(hand))) => self.frame = Some(hand),
            Ok(Some(Inbound::Shutdown)) => self.shutdown_requested = true,
            Ok(None) => {}
            Err(e) => warn!("{}", e),
        }
    }

    fn set_flashlight(&mut self, on: bool) {
        if on {
            self.flashlight.set_high().ok();
        } else {
            self.flashlight.set_low().ok();
        }
        if on != self.flashlight_on {
            info!("flashlight {}", if on { "on" } else { "off" });
        }
        self.flashlight_on = on;
    }

    fn send(&mut self, command: Command) {
        if !uart1::send(command.line()) {
            warn!("serial busy, dropped {:?}", command);
        }
    }
}

impl<IR, TOUCH, LIGHT, BUZZ> Sensors for Board<IR, TOUCH, LIGHT, BUZZ>
where
    IR: InputPin,
    TOUCH: InputPin,
    LIGHT: OutputPin,
    BUZZ: OutputPin,
{
    fn proximity(&mut self) -> bool {
        self.ir.is_low().unwrap_or(false)
    }

    fn touch(&mut self) -> bool {
        self.touch.is_high().unwrap_or(false)
    }

    fn hand(&mut self) -> Option<Hand> {
        self.frame.take()
    }
}

impl<IR, TOUCH, LIGHT, BUZZ> Actuators for Board<IR, TOUCH, LIGHT, BUZZ>
where
    IR: InputPin,
    TOUCH: InputPin,
    LIGHT: OutputPin,
    BUZZ: OutputPin,
{
    fn perform(&mut self, action: Action) {
        match action {
            Action::ToggleFlashlight => self.set_flashlight(!self.flashlight_on),
            Action::FlashlightOn => self.set_flashlight(true),
            Action::AllOff => {
                self.set_flashlight(false);
                self.buzzer.stop();
            }
            Action::CapturePhoto => self.send(Command::Capture),
            Action::DoubleBeep => self.buzzer.play(DOUBLE_BEEP, self.now),
            Action::PauseVision => self.send(Command::Pause),
            Action::ResumeVision => self.send(Command::Resume),
        }
    }
}
