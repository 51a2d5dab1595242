//! Frame encoding: the bit-exact wire protocol.
//!
//! A frame is `SYNC_START + concat(8-bit encodings of each secret byte) +
//! SYNC_END`, with no separators between byte groups. Bits are represented
//! as ASCII `'0'`/`'1'` characters in a fixed-capacity buffer; the character
//! sequence IS the wire format, one character per dwell on the pin.
//!
//! Pure logic, no hardware dependencies, fully testable on host.

/// Start-of-frame sync pattern. Fixed, never derived from payload.
pub const SYNC_START: &str = "000101100";

/// End-of-frame sync pattern. Fixed, never derived from payload.
pub const SYNC_END: &str = "00001111";

/// Maximum secret length in bytes a frame can carry.
pub const MAX_SECRET_LEN: usize = 64;

/// Frame buffer capacity in bit characters.
pub const MAX_FRAME_BITS: usize = SYNC_START.len() + MAX_SECRET_LEN * 8 + SYNC_END.len();

/// Frame construction error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    /// Secret exceeds [`MAX_SECRET_LEN`] bytes.
    SecretTooLong,
    /// Bit buffer capacity exceeded.
    Overflow,
}

impl FrameError {
    /// Get error message.
    pub fn message(&self) -> &'static str {
        match self {
            Self::SecretTooLong => "secret too long",
            Self::Overflow => "frame buffer overflow",
        }
    }
}

impl core::fmt::Display for FrameError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.message())
    }
}

/// Encode one byte as 8 ASCII bit characters, MSB first, zero-padded.
///
/// A byte of value 0 still yields eight `'0'` characters.
#[inline]
pub fn encode_byte(byte: u8) -> [u8; 8] {
    let mut out = [b'0'; 8];
    let mut i = 0;
    while i < 8 {
        out[i] = b'0' + ((byte >> (7 - i)) & 1);
        i += 1;
    }
    out
}

/// One complete transmission unit: a fixed-capacity sequence of ASCII bit
/// characters.
///
/// Constructed fresh per trigger by [`build_frame`], discarded after send.
#[derive(Clone, Copy)]
pub struct BitFrame {
    bits: [u8; MAX_FRAME_BITS],
    len: usize,
}

impl BitFrame {
    /// Create an empty frame buffer.
    pub const fn empty() -> Self {
        Self {
            bits: [b'0'; MAX_FRAME_BITS],
            len: 0,
        }
    }

    /// Append a sequence of ASCII bit characters.
    pub fn push_bits(&mut self, bits: &[u8]) -> Result<(), FrameError> {
        if self.len + bits.len() > MAX_FRAME_BITS {
            return Err(FrameError::Overflow);
        }
        self.bits[self.len..self.len + bits.len()].copy_from_slice(bits);
        self.len += bits.len();
        Ok(())
    }

    /// The bit characters of this frame, in transmission order.
    #[inline]
    pub fn bits(&self) -> &[u8] {
        &self.bits[..self.len]
    }

    /// The frame as a `str` of `'0'`/`'1'` characters.
    #[inline]
    pub fn as_str(&self) -> &str {
        // Only ASCII '0'/'1' is ever pushed.
        core::str::from_utf8(self.bits()).unwrap_or("")
    }

    /// Number of bit characters in the frame.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if the frame holds no bits.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl PartialEq for BitFrame {
    fn eq(&self, other: &Self) -> bool {
        self.bits() == other.bits()
    }
}

impl Eq for BitFrame {}

impl core::fmt::Debug for BitFrame {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "BitFrame({})", self.as_str())
    }
}

/// Build one complete frame for the given secret.
///
/// `SYNC_START`, then each secret byte as 8 bits MSB-first, then `SYNC_END`.
/// Pure function of its input: identical secrets yield identical frames.
pub fn build_frame(secret: &str) -> Result<BitFrame, FrameError> {
    if secret.len() > MAX_SECRET_LEN {
        return Err(FrameError::SecretTooLong);
    }

    let mut frame = BitFrame::empty();
    frame.push_bits(SYNC_START.as_bytes())?;
    for &byte in secret.as_bytes() {
        frame.push_bits(&encode_byte(byte))?;
    }
    frame.push_bits(SYNC_END.as_bytes())?;
    Ok(frame)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_byte_zero_is_all_zeros() {
        assert_eq!(&encode_byte(0), b"00000000");
    }

    #[test]
    fn test_encode_byte_msb_first() {
        assert_eq!(&encode_byte(0x80), b"10000000");
        assert_eq!(&encode_byte(0x01), b"00000001");
        assert_eq!(&encode_byte(b'A'), b"01000001");
        assert_eq!(&encode_byte(0xFF), b"11111111");
    }

    #[test]
    fn test_build_frame_original_secret() {
        // 'F' = 0x46 = 01000110
        let frame = build_frame("F").unwrap();
        assert_eq!(frame.as_str(), "000101100010001100001111");
    }

    #[test]
    fn test_frame_no_separators_between_bytes() {
        let frame = build_frame("AB").unwrap();
        // 'A' then 'B', back to back
        let expected = format!("{}0100000101000010{}", SYNC_START, SYNC_END);
        assert_eq!(frame.as_str(), expected);
    }

    #[test]
    fn test_build_frame_secret_too_long() {
        let secret = "a".repeat(MAX_SECRET_LEN + 1);
        assert_eq!(build_frame(&secret), Err(FrameError::SecretTooLong));

        let at_limit = "a".repeat(MAX_SECRET_LEN);
        assert!(build_frame(&at_limit).is_ok());
    }

    #[test]
    fn test_push_bits_overflow() {
        let mut frame = BitFrame::empty();
        let chunk = [b'1'; MAX_FRAME_BITS];
        frame.push_bits(&chunk).unwrap();
        assert_eq!(frame.push_bits(b"0"), Err(FrameError::Overflow));
        // Length unchanged after failed push
        assert_eq!(frame.len(), MAX_FRAME_BITS);
    }
}
