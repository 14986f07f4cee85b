use crate::{
    Sink,
    checksum::{Crc16, Crc16Digest, XModem},
    escape::{END, escape},
};

/// Size of the CRC trailer carried by every frame.
pub const CRC_LEN: usize = 2;

/// Worst-case wire length of a frame carrying `payload_len` bytes: every
/// payload and trailer byte escaped, plus the terminator.
pub const fn max_encoded_len(payload_len: usize) -> usize {
    2 * (payload_len + CRC_LEN) + 1
}

/// Stateless frame encoder. Bytes reach the sink as they are produced, the
/// frame is never assembled in memory.
#[derive(Debug, Default, Clone, Copy)]
pub struct Encoder<C = XModem> {
    crc: C,
}

impl Encoder<XModem> {
    pub const fn new() -> Encoder<XModem> {
        Encoder { crc: XModem }
    }
}

impl<C: Crc16> Encoder<C> {
    pub const fn with_crc(crc: C) -> Encoder<C> {
        Encoder { crc }
    }

    /// Escapes `payload`, appends the big-endian CRC and terminates the
    /// frame.
    pub fn encode<S>(&self, payload: &[u8], sink: &mut S) -> Result<(), S::Error>
    where
        S: Sink + ?Sized,
    {
        let mut digest = self.crc.digest();
        send_escaped(payload, sink)?;
        digest.update(payload);
        finish(digest.finalize(), sink)
    }

    /// Like [`encode`](Encoder::encode) with a little-endian command word in
    /// front of the payload. The CRC covers the command too, so the frame
    /// decodes to `command.to_le_bytes() ++ payload`.
    pub fn encode_command<S>(&self, command: u16, payload: &[u8], sink: &mut S) -> Result<(), S::Error>
    where
        S: Sink + ?Sized,
    {
        let command = command.to_le_bytes();
        let mut digest = self.crc.digest();
        send_escaped(&command, sink)?;
        digest.update(&command);
        send_escaped(payload, sink)?;
        digest.update(payload);
        finish(digest.finalize(), sink)
    }
}

fn send_escaped<S>(data: &[u8], sink: &mut S) -> Result<(), S::Error>
where
    S: Sink + ?Sized,
{
    for &b in data {
        sink.send(escape(b).as_slice())?;
    }
    Ok(())
}

fn finish<S>(crc: u16, sink: &mut S) -> Result<(), S::Error>
where
    S: Sink + ?Sized,
{
    send_escaped(&crc.to_be_bytes(), sink)?;
    sink.send(&[END])
}

/// Encodes `payload` as one CRC-16/XMODEM protected frame.
pub fn encode_and_send<S>(payload: &[u8], sink: &mut S) -> Result<(), S::Error>
where
    S: Sink + ?Sized,
{
    Encoder::new().encode(payload, sink)
}
