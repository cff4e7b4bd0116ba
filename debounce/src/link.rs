//! Byte protocol on the serial link to the vision co-processor.
//!
//! The co-processor classifies camera frames and sends one byte per frame:
//! an ASCII digit with the number of raised fingers, or `-` when no hand is
//! in view. It can also ask the device to shut down with `q`.
//!
//! The same link carries our log output, one line per record starting with
//! `[`. Commands for the co-processor are sent as lines starting with `!`
//! so it can tell the two apart.

use core::fmt;

/// The most fingers a classification can report
pub const MAX_FINGERS: u8 = 5;

/// One frame's hand classification
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hand {
    /// No hand found in the frame
    Absent,
    /// A hand holding up this many fingers
    Fingers(u8),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Inbound {
    Frame(Hand),
    Shutdown,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkError {
    UnknownByte(u8),
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkError::UnknownByte(b) => write!(f, "unexpected byte 0x{:02x} on link", b),
        }
    }
}

/// Decode one received byte. Line endings and padding decode to `None`.
pub fn decode(byte: u8) -> Result<Option<Inbound>, LinkError> {
    match byte {
        b'0'..=b'9' if byte - b'0' <= MAX_FINGERS => {
            Ok(Some(Inbound::Frame(Hand::Fingers(byte - b'0'))))
        }
        b'-' => Ok(Some(Inbound::Frame(Hand::Absent))),
        b'q' => Ok(Some(Inbound::Shutdown)),
        b'\r' | b'\n' | b' ' => Ok(None),
        _ => Err(LinkError::UnknownByte(byte)),
    }
}

/// Requests sent to the co-processor
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Save a full resolution photo
    Capture,
    /// Stop classifying frames until resumed
    Pause,
    Resume,
}

impl Command {
    pub fn line(&self) -> &'static str {
        match self {
            Command::Capture => "!capture\r\n",
            Command::Pause => "!pause\r\n",
            Command::Resume => "!resume\r\n",
        }
    }
}

#[cfg(test)]
pub mod test {
    use super::*;

    #[test]
    fn test_decode() {
        assert_eq!(decode(b'0'), Ok(Some(Inbound::Frame(Hand::Fingers(0)))));
        assert_eq!(decode(b'5'), Ok(Some(Inbound::Frame(Hand::Fingers(5)))));
        assert_eq!(decode(b'-'), Ok(Some(Inbound::Frame(Hand::Absent))));
        assert_eq!(decode(b'q'), Ok(Some(Inbound::Shutdown)));
        assert_eq!(decode(b'\n'), Ok(None));
        assert_eq!(decode(b'\r'), Ok(None));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        // Six fingers cannot be a real reading; treat it like line noise.
        assert_eq!(decode(b'6'), Err(LinkError::UnknownByte(b'6')));
        assert_eq!(decode(0xff), Err(LinkError::UnknownByte(0xff)));
        assert_eq!(decode(b'x'), Err(LinkError::UnknownByte(b'x')));
    }

    #[test]
    fn test_commands_are_marked_lines() {
        for cmd in [Command::Capture, Command::Pause, Command::Resume] {
            let line = cmd.line();
            assert!(line.starts_with('!'));
            assert!(line.ends_with("\r\n"));
        }
    }
}
