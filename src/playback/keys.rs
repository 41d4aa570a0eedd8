/// Commands bound to keys during playback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyCommand {
    Quit,
    SpeedUp,
    SpeedDown,
}

impl KeyCommand {
    /// Map a raw key code; only the low byte is considered.
    pub fn from_key(code: i32) -> Option<Self> {
        match (code & 0xFF) as u8 {
            b'q' => Some(Self::Quit),
            b'+' | b'=' => Some(Self::SpeedUp),
            b'-' | b'_' => Some(Self::SpeedDown),
            _ => None,
        }
    }
}
