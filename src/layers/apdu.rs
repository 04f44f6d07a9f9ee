use std::fmt;

use crate::classification::ErrorCode;

/// ISO 7816-4 status word (SW1 SW2) taken from the end of a card response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatusWord(u16);

impl StatusWord {
    /// Normal processing, no further qualification.
    pub const SUCCESS: Self = Self(0x9000);

    pub const fn new(sw1: u8, sw2: u8) -> Self {
        Self(u16::from_be_bytes([sw1, sw2]))
    }

    /// Trailer of `response`, or `None` if it is shorter than two bytes.
    pub fn from_response(response: &[u8]) -> Option<Self> {
        match response {
            [.., sw1, sw2] => Some(Self::new(*sw1, *sw2)),
            _ => None,
        }
    }

    pub fn sw1(self) -> u8 {
        self.0.to_be_bytes()[0]
    }

    pub fn sw2(self) -> u8 {
        self.0.to_be_bytes()[1]
    }

    pub fn is_success(self) -> bool {
        self == Self::SUCCESS
    }

    pub fn as_u16(self) -> u16 {
        self.0
    }
}

impl fmt::Display for StatusWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04X}", self.0)
    }
}

/// A successful trailer means the failure is not explained by the card.
/// Anything else, including a truncated response, is a card-side error.
pub fn classify_response(response: &[u8]) -> Option<ErrorCode> {
    match StatusWord::from_response(response) {
        Some(sw) if sw.is_success() => None,
        Some(sw) => {
            tracing::debug!(status_word = %sw, "card returned error status word");
            Some(ErrorCode::CardInternalError)
        }
        None => {
            tracing::debug!(len = response.len(), "card response too short for a status word");
            Some(ErrorCode::CardInternalError)
        }
    }
}
