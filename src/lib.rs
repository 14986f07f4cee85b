#![no_std]

//! SLIP-style framing with a CRC-16/XMODEM trailer for byte-oriented serial
//! links.
//!
//! A frame on the wire is the escaped payload, the escaped big-endian CRC of
//! the payload, and a raw [`END`] byte. The [`Decoder`] consumes arbitrarily
//! split chunks into a caller-owned buffer and never allocates. The
//! [`Encoder`] streams the frame to a [`Sink`] one or two bytes at a time.

mod checksum;
mod config;
mod decoder;
mod encoder;
mod error;
mod escape;
mod link;

use core::convert::Infallible;

pub use checksum::{Crc16, Crc16Digest, XModem};
pub use config::{DEFAULT_TIMEOUT_TICKS, DecoderConfig, EscapePolicy, ShortFramePolicy, TickPolicy};
pub use decoder::{Decoder, Status};
pub use encoder::{CRC_LEN, Encoder, encode_and_send, max_encoded_len};
pub use error::{FrameError, SinkFull};
pub use escape::{END, ESC, ESC_END, ESC_ESC, Escaped, escape, unescape};
pub use link::{FrameRx, FrameTx, IoSink};

/// Receives the payload of every frame that passes CRC validation.
///
/// The slice borrows the decoder buffer and is only valid for the call.
pub trait FrameHandler {
    fn on_frame(&mut self, payload: &[u8]);
}

impl<F> FrameHandler for F
where
    F: FnMut(&[u8]),
{
    fn on_frame(&mut self, payload: &[u8]) {
        self(payload)
    }
}

/// Handler that drops every payload. Useful when only the status matters.
#[derive(Debug, Default, Clone, Copy)]
pub struct Discard;

impl FrameHandler for Discard {
    fn on_frame(&mut self, _payload: &[u8]) {}
}

/// Keeps a copy of the most recent payload that fits in `N` bytes.
#[derive(Debug, Default)]
pub struct LatestFrame<const N: usize> {
    pub frame: Option<heapless::Vec<u8, N>>,
    /// Payloads dropped because they were longer than `N`.
    pub oversized: usize,
}

impl<const N: usize> LatestFrame<N> {
    pub fn new() -> LatestFrame<N> {
        LatestFrame {
            frame: None,
            oversized: 0,
        }
    }

    pub fn take(&mut self) -> Option<heapless::Vec<u8, N>> {
        self.frame.take()
    }
}

impl<const N: usize> FrameHandler for LatestFrame<N> {
    fn on_frame(&mut self, payload: &[u8]) {
        let mut v = heapless::Vec::<u8, N>::new();
        if v.extend_from_slice(payload).is_err() {
            self.oversized += 1;
            return;
        }
        self.frame = Some(v);
    }
}

/// Byte transport on the transmit side.
///
/// The encoder hands over one or two bytes per call and expects all of them
/// to be accepted before `send` returns.
pub trait Sink {
    type Error;

    fn send(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;
}

impl<F> Sink for F
where
    F: FnMut(&[u8]),
{
    type Error = Infallible;

    fn send(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        self(bytes);
        Ok(())
    }
}

impl<const N: usize> Sink for heapless::Vec<u8, N> {
    type Error = SinkFull;

    fn send(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        let available = N - self.len();
        self.extend_from_slice(bytes).map_err(|_| SinkFull {
            needed: bytes.len(),
            available,
        })
    }
}
