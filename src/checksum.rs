use crc::{CRC_16_XMODEM, Crc, Digest};

static XMODEM: Crc<u16> = Crc::<u16>::new(&CRC_16_XMODEM);

/// Incremental CRC-16 state.
pub trait Crc16Digest {
    fn update(&mut self, data: &[u8]);

    fn finalize(self) -> u16;
}

/// CRC-16 collaborator shared by the encoder and decoder.
///
/// Implementations must have the residue property: the CRC of
/// `data ++ crc(data).to_be_bytes()` is zero. The decoder relies on it to
/// validate a frame without locating the trailer.
pub trait Crc16 {
    type Digest: Crc16Digest;

    fn digest(&self) -> Self::Digest;

    fn checksum(&self, data: &[u8]) -> u16 {
        let mut d = self.digest();
        d.update(data);
        d.finalize()
    }
}

/// CRC-16/XMODEM: poly 0x1021, init 0, no reflection, no final xor.
#[derive(Debug, Default, Clone, Copy)]
pub struct XModem;

impl Crc16 for XModem {
    type Digest = Digest<'static, u16>;

    fn digest(&self) -> Self::Digest {
        XMODEM.digest()
    }

    fn checksum(&self, data: &[u8]) -> u16 {
        XMODEM.checksum(data)
    }
}

impl Crc16Digest for Digest<'static, u16> {
    fn update(&mut self, data: &[u8]) {
        Digest::<'static, u16>::update(self, data)
    }

    fn finalize(self) -> u16 {
        Digest::<'static, u16>::finalize(self)
    }
}

impl<C: Crc16> Crc16 for &C {
    type Digest = C::Digest;

    fn digest(&self) -> Self::Digest {
        (**self).digest()
    }

    fn checksum(&self, data: &[u8]) -> u16 {
        (**self).checksum(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xmodem_check_value() {
        assert_eq!(XModem.checksum(b"123456789"), 0x31C3);
        assert_eq!(XModem.checksum(&[]), 0);
    }

    #[test]
    fn digest_matches_one_shot() {
        let mut d = XModem.digest();
        d.update(b"1234");
        d.update(b"56789");
        assert_eq!(d.finalize(), 0x31C3);
    }

    #[test]
    fn trailer_gives_zero_residue() {
        let data = [0x01, 0xC0, 0xDB];
        let crc = XModem.checksum(&data);
        assert_eq!(crc, 0x5B72);
        let [hi, lo] = crc.to_be_bytes();
        assert_eq!(XModem.checksum(&[0x01, 0xC0, 0xDB, hi, lo]), 0);
    }
}
