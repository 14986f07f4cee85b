use embedded_hal_nb::serial::{Read, Write};
use log::trace;

use crate::{
    FrameHandler, Sink,
    checksum::{Crc16, XModem},
    decoder::{Decoder, Status},
    encoder::Encoder,
};

/// [`Sink`] over any blocking `embedded_io::Write`.
#[derive(Debug)]
pub struct IoSink<W>(pub W);

impl<W: embedded_io::Write> Sink for IoSink<W> {
    type Error = W::Error;

    fn send(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        self.0.write_all(bytes)
    }
}

// Pushes each byte into a non-blocking serial port, spinning on WouldBlock.
struct NbSink<'a, Tx>(&'a mut Tx);

impl<Tx: Write> Sink for NbSink<'_, Tx> {
    type Error = Tx::Error;

    fn send(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        for &b in bytes {
            nb::block!(self.0.write(b))?;
        }
        Ok(())
    }
}

/// Transmit half of a serial link: encodes frames straight into `Tx`.
pub struct FrameTx<Tx: Write, C = XModem> {
    tx: Tx,
    encoder: Encoder<C>,
}

impl<Tx: Write> FrameTx<Tx, XModem> {
    pub fn new(tx: Tx) -> FrameTx<Tx, XModem> {
        FrameTx {
            tx,
            encoder: Encoder::new(),
        }
    }
}

impl<Tx: Write, C: Crc16> FrameTx<Tx, C> {
    pub fn with_encoder(tx: Tx, encoder: Encoder<C>) -> FrameTx<Tx, C> {
        FrameTx { tx, encoder }
    }

    pub fn send(&mut self, payload: &[u8]) -> Result<(), Tx::Error> {
        self.encoder.encode(payload, &mut NbSink(&mut self.tx))
    }

    pub fn send_command(&mut self, command: u16, payload: &[u8]) -> Result<(), Tx::Error> {
        self.encoder
            .encode_command(command, payload, &mut NbSink(&mut self.tx))
    }

    pub fn flush(&mut self) -> nb::Result<(), Tx::Error> {
        self.tx.flush()
    }

    pub fn release(self) -> Tx {
        self.tx
    }
}

/// Receive half of a serial link: drains `Rx` into a [`Decoder`].
pub struct FrameRx<'buf, Rx: Read, C = XModem> {
    rx: Rx,
    decoder: Decoder<'buf, C>,
}

impl<'buf, Rx: Read> FrameRx<'buf, Rx, XModem> {
    pub fn new(rx: Rx, buffer: &'buf mut [u8]) -> FrameRx<'buf, Rx, XModem> {
        FrameRx {
            rx,
            decoder: Decoder::new(buffer),
        }
    }
}

impl<'buf, Rx: Read, C: Crc16> FrameRx<'buf, Rx, C> {
    pub fn with_decoder(rx: Rx, decoder: Decoder<'buf, C>) -> FrameRx<'buf, Rx, C> {
        FrameRx { rx, decoder }
    }

    /// Reads until a frame completes or `Rx` would block.
    ///
    /// Returns the status of the completed frame, or `WouldBlock` when the
    /// port ran dry first. Bytes of a partial frame stay in the decoder.
    pub fn poll<H>(&mut self, handler: &mut H) -> nb::Result<Status, Rx::Error>
    where
        H: FrameHandler + ?Sized,
    {
        loop {
            let byte = self.rx.read()?;
            match self.decoder.decode(&[byte], handler) {
                Status::Decoding => {}
                status => {
                    trace!("poll completed frame: {:?}", status);
                    return Ok(status);
                }
            }
        }
    }

    /// Forwards a timeout tick to the decoder.
    pub fn tick(&mut self) -> bool {
        self.decoder.tick()
    }

    pub fn decoder(&self) -> &Decoder<'buf, C> {
        &self.decoder
    }

    pub fn decoder_mut(&mut self) -> &mut Decoder<'buf, C> {
        &mut self.decoder
    }

    pub fn release(self) -> (Rx, Decoder<'buf, C>) {
        (self.rx, self.decoder)
    }
}
