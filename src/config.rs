/// Idle ticks before a partial frame is discarded, unless configured.
pub const DEFAULT_TIMEOUT_TICKS: u16 = 10;

/// How a byte following [`ESC`](crate::ESC) that is not a valid escape is
/// resolved.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum EscapePolicy {
    /// Store an [`ESC`](crate::ESC) in its place and carry on. The CRC check
    /// at the end of the frame is the only thing that catches it.
    #[default]
    Lenient,
    /// Mark the frame as corrupt. It completes with
    /// [`FrameError::InvalidEscape`](crate::FrameError::InvalidEscape) at the
    /// next terminator.
    Strict,
}

/// When [`Decoder::tick`](crate::Decoder::tick) advances the idle counter.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum TickPolicy {
    /// Every tick counts, even with no frame in progress. Idle decoders are
    /// reset every `timeout_limit` ticks.
    #[default]
    Always,
    /// Ticks only count while a frame is being received.
    WhileReceiving,
}

/// How frames shorter than the CRC trailer are judged.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ShortFramePolicy {
    /// Every terminator runs the CRC check, whatever the length. A zero
    /// residue is a success with an empty payload, so a bare
    /// [`END`](crate::END) or a lone `0x00` byte completes a frame.
    #[default]
    Accept,
    /// A bare [`END`](crate::END) is only a delimiter and changes no
    /// status. A frame too short to hold the trailer fails with
    /// [`FrameError::TooShort`](crate::FrameError::TooShort).
    Reject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderConfig {
    pub timeout_limit: u16,
    pub escape_policy: EscapePolicy,
    pub tick_policy: TickPolicy,
    pub short_frame_policy: ShortFramePolicy,
}

impl DecoderConfig {
    pub const fn new() -> DecoderConfig {
        DecoderConfig {
            timeout_limit: DEFAULT_TIMEOUT_TICKS,
            escape_policy: EscapePolicy::Lenient,
            tick_policy: TickPolicy::Always,
            short_frame_policy: ShortFramePolicy::Accept,
        }
    }

    pub const fn timeout_limit(mut self, ticks: u16) -> DecoderConfig {
        self.timeout_limit = ticks;
        self
    }

    pub const fn escape_policy(mut self, policy: EscapePolicy) -> DecoderConfig {
        self.escape_policy = policy;
        self
    }

    pub const fn tick_policy(mut self, policy: TickPolicy) -> DecoderConfig {
        self.tick_policy = policy;
        self
    }

    pub const fn short_frame_policy(mut self, policy: ShortFramePolicy) -> DecoderConfig {
        self.short_frame_policy = policy;
        self
    }
}

impl Default for DecoderConfig {
    fn default() -> Self {
        DecoderConfig::new()
    }
}
