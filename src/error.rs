use core::fmt;

/// Why a completed (or aborted) frame was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    /// CRC over payload and trailer was not zero.
    CrcMismatch { residue: u16 },
    /// Fewer bytes than the CRC trailer. Only reported under
    /// [`ShortFramePolicy::Reject`](crate::ShortFramePolicy::Reject).
    TooShort { len: usize },
    /// An escape marker was followed by something other than
    /// `ESC_END`/`ESC_ESC`. Only reported under
    /// [`EscapePolicy::Strict`](crate::EscapePolicy::Strict).
    InvalidEscape { byte: u8 },
    /// The frame did not fit in the decoder buffer.
    BufferOverrun { capacity: usize },
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameError::CrcMismatch { residue } => {
                write!(f, "crc mismatch (residue {:#06x})", residue)
            }
            FrameError::TooShort { len } => {
                write!(f, "frame of {} byte(s) cannot hold a crc trailer", len)
            }
            FrameError::InvalidEscape { byte } => {
                write!(f, "escape marker followed by {:#04x}", byte)
            }
            FrameError::BufferOverrun { capacity } => {
                write!(f, "frame exceeds {} byte buffer", capacity)
            }
        }
    }
}

impl core::error::Error for FrameError {}

/// A fixed-capacity sink ran out of room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkFull {
    pub needed: usize,
    pub available: usize,
}

impl fmt::Display for SinkFull {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "sink full: needed {} byte(s), {} available",
            self.needed, self.available
        )
    }
}

impl core::error::Error for SinkFull {}
