/// Frame terminator.
pub const END: u8 = 0xC0;
/// Escape marker.
pub const ESC: u8 = 0xDB;
/// Follows [`ESC`] to stand for a literal [`END`].
pub const ESC_END: u8 = 0xDC;
/// Follows [`ESC`] to stand for a literal [`ESC`].
pub const ESC_ESC: u8 = 0xDD;

/// The one or two wire bytes a raw byte escapes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Escaped {
    bytes: [u8; 2],
    len: u8,
}

impl Escaped {
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// Always `false`.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }
}

impl AsRef<[u8]> for Escaped {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

pub const fn escape(byte: u8) -> Escaped {
    match byte {
        END => Escaped {
            bytes: [ESC, ESC_END],
            len: 2,
        },
        ESC => Escaped {
            bytes: [ESC, ESC_ESC],
            len: 2,
        },
        b => Escaped {
            bytes: [b, 0],
            len: 1,
        },
    }
}

/// Resolves the byte following an [`ESC`]. `None` when it is neither
/// [`ESC_END`] nor [`ESC_ESC`].
pub const fn unescape(byte: u8) -> Option<u8> {
    match byte {
        ESC_END => Some(END),
        ESC_ESC => Some(ESC),
        _ => None,
    }
}
