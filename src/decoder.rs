use log::{debug, trace, warn};

use crate::{
    FrameHandler,
    checksum::{Crc16, XModem},
    config::{DecoderConfig, EscapePolicy, ShortFramePolicy, TickPolicy},
    encoder::CRC_LEN,
    error::FrameError,
    escape::{END, ESC, unescape},
};

/// Outcome of a [`Decoder::decode`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// No terminator was seen in the chunk.
    Decoding,
    /// The last terminator in the chunk closed a valid frame.
    Success,
    /// The last terminator in the chunk closed a rejected frame, or a frame
    /// was aborted for overrunning the buffer.
    FrameError(FrameError),
}

impl Status {
    pub fn is_success(&self) -> bool {
        matches!(self, Status::Success)
    }

    pub fn frame_error(&self) -> Option<FrameError> {
        match self {
            Status::FrameError(e) => Some(*e),
            _ => None,
        }
    }
}

/// Incremental frame decoder bound to a caller-owned buffer.
///
/// Frames may be split across any number of [`decode`](Decoder::decode)
/// calls. Escape state and the partial frame survive between calls. The
/// buffer must hold the largest expected payload plus [`CRC_LEN`] bytes.
#[derive(Debug)]
pub struct Decoder<'buf, C = XModem> {
    buffer: &'buf mut [u8],
    received: usize,
    last_frame_len: usize,
    receiving: bool,
    escape_pending: bool,
    // Set after an overrun; everything up to the next END is dropped.
    discarding: bool,
    corrupt: Option<FrameError>,
    timeout_count: u16,
    config: DecoderConfig,
    status: Status,
    last_status: Option<Status>,
    crc: C,
}

impl<'buf> Decoder<'buf, XModem> {
    pub fn new(buffer: &'buf mut [u8]) -> Decoder<'buf, XModem> {
        Decoder::with_config(buffer, DecoderConfig::default())
    }

    pub fn with_config(buffer: &'buf mut [u8], config: DecoderConfig) -> Decoder<'buf, XModem> {
        Decoder::with_crc(buffer, config, XModem)
    }
}

impl<'buf, C: Crc16> Decoder<'buf, C> {
    pub fn with_crc(buffer: &'buf mut [u8], config: DecoderConfig, crc: C) -> Decoder<'buf, C> {
        Decoder {
            buffer,
            received: 0,
            last_frame_len: 0,
            receiving: false,
            escape_pending: false,
            discarding: false,
            corrupt: None,
            timeout_count: 0,
            config,
            status: Status::Decoding,
            last_status: None,
            crc,
        }
    }

    /// Binds a new buffer and timeout limit, dropping all decoding state.
    pub fn init(&mut self, buffer: &'buf mut [u8], timeout_limit: u16) {
        self.buffer = buffer;
        self.config.timeout_limit = timeout_limit;
        self.reset();
    }

    /// Drops all decoding state, keeping the buffer and configuration.
    pub fn reset(&mut self) {
        self.received = 0;
        self.last_frame_len = 0;
        self.receiving = false;
        self.escape_pending = false;
        self.discarding = false;
        self.corrupt = None;
        self.timeout_count = 0;
        self.status = Status::Decoding;
        self.last_status = None;
    }

    /// Feeds a chunk of raw link bytes.
    ///
    /// `handler` is called synchronously, once per valid frame, before the
    /// next byte of `input` is looked at. The returned status reflects the
    /// last terminator in `input`, or [`Status::Decoding`] if there was none.
    pub fn decode<H>(&mut self, input: &[u8], handler: &mut H) -> Status
    where
        H: FrameHandler + ?Sized,
    {
        self.status = Status::Decoding;
        for &byte in input {
            match byte {
                END => self.end_frame(handler),
                ESC => self.mark_escape(),
                _ => self.accept(byte),
            }
        }
        self.status
    }

    /// Advances the idle counter. Returns `true` when the limit was reached
    /// and the decoder was reset, discarding any partial frame.
    pub fn tick(&mut self) -> bool {
        if self.config.tick_policy == TickPolicy::WhileReceiving && !self.receiving {
            return false;
        }
        self.timeout_count = self.timeout_count.saturating_add(1);
        if self.timeout_count < self.config.timeout_limit {
            return false;
        }
        if self.receiving {
            warn!(
                "timeout after {} ticks, discarding {} byte partial frame",
                self.timeout_count, self.received
            );
        } else {
            trace!("timeout after {} idle ticks", self.timeout_count);
        }
        self.reset();
        true
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// Outcome of the most recently completed frame, `None` until one has
    /// completed since the last reset.
    pub fn last_status(&self) -> Option<Status> {
        self.last_status
    }

    /// Payload plus trailer length of the most recently completed frame.
    pub fn last_frame_len(&self) -> usize {
        self.last_frame_len
    }

    /// Bytes buffered for the frame in progress.
    pub fn received(&self) -> usize {
        self.received
    }

    pub fn is_receiving(&self) -> bool {
        self.receiving
    }

    pub fn timeout_count(&self) -> u16 {
        self.timeout_count
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    fn mark_escape(&mut self) {
        if self.discarding {
            return;
        }
        if self.escape_pending {
            self.flag_invalid_escape(ESC);
        }
        self.escape_pending = true;
    }

    fn accept(&mut self, byte: u8) {
        if !self.receiving {
            self.timeout_count = 0;
            self.receiving = true;
        }
        if self.discarding {
            return;
        }
        let byte = if core::mem::take(&mut self.escape_pending) {
            match unescape(byte) {
                Some(b) => b,
                None => {
                    self.flag_invalid_escape(byte);
                    ESC
                }
            }
        } else {
            byte
        };
        if self.received == self.buffer.len() {
            self.overrun();
            return;
        }
        self.buffer[self.received] = byte;
        self.received += 1;
    }

    fn flag_invalid_escape(&mut self, byte: u8) {
        if self.config.escape_policy == EscapePolicy::Strict && self.corrupt.is_none() {
            self.corrupt = Some(FrameError::InvalidEscape { byte });
        }
    }

    fn overrun(&mut self) {
        let capacity = self.buffer.len();
        warn!("frame exceeds {} byte buffer, discarding until next END", capacity);
        self.received = 0;
        self.corrupt = None;
        self.discarding = true;
        self.status = Status::FrameError(FrameError::BufferOverrun { capacity });
        self.last_status = Some(self.status);
    }

    fn end_frame<H>(&mut self, handler: &mut H)
    where
        H: FrameHandler + ?Sized,
    {
        let len = self.received;
        let dangling_escape = core::mem::take(&mut self.escape_pending);
        self.received = 0;
        self.receiving = false;

        if core::mem::take(&mut self.discarding) {
            trace!("end of overrun frame");
            return;
        }
        if dangling_escape {
            self.flag_invalid_escape(END);
        }
        let corrupt = self.corrupt.take();
        let reject_short = self.config.short_frame_policy == ShortFramePolicy::Reject;
        if reject_short && len == 0 && corrupt.is_none() {
            trace!("idle END");
            return;
        }

        self.last_frame_len = len;
        let outcome = match corrupt {
            Some(e) => Err(e),
            None if reject_short && len < CRC_LEN => Err(FrameError::TooShort { len }),
            None => match self.crc.checksum(&self.buffer[..len]) {
                0 => Ok(()),
                residue => Err(FrameError::CrcMismatch { residue }),
            },
        };

        match outcome {
            Ok(()) => {
                let payload = len.saturating_sub(CRC_LEN);
                trace!("frame of {} byte(s)", payload);
                self.status = Status::Success;
                self.last_status = Some(self.status);
                handler.on_frame(&self.buffer[..payload]);
            }
            Err(e) => {
                debug!("rejected frame of {} byte(s): {}", len, e);
                self.status = Status::FrameError(e);
                self.last_status = Some(self.status);
            }
        }
    }
}
