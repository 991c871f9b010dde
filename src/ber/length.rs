//! BER length encoding and decoding.
//!
//! Length encoding follows X.690 Section 8.1.3:
//! - Short form: Single byte, bit 8=0, value 0-127
//! - Long form: Initial byte (bit 8=1, bits 7-1=count), followed by length bytes
//! - Indefinite form (0x80): Rejected
//!
//! The `*_len` helpers compute encoded sizes without encoding, so a message
//! can be sized exactly before its buffer is allocated.

use crate::error::{DecodeErrorKind, Error, Result};

/// Maximum length we'll accept (to prevent DoS).
///
/// 2MB is far larger than any realistic SNMP message.
pub const MAX_LENGTH: usize = 0x200000;

/// Encode a length value (returns bytes in reverse order for prepending).
///
/// Uses short form for lengths <= 127, long form otherwise.
pub fn encode_length(len: usize) -> ([u8; 5], usize) {
    let mut buf = [0u8; 5];

    if len <= 127 {
        buf[0] = len as u8;
        (buf, 1)
    } else if len <= 0xFF {
        buf[0] = len as u8;
        buf[1] = 0x81;
        (buf, 2)
    } else if len <= 0xFFFF {
        buf[0] = len as u8;
        buf[1] = (len >> 8) as u8;
        buf[2] = 0x82;
        (buf, 3)
    } else if len <= 0xFFFFFF {
        buf[0] = len as u8;
        buf[1] = (len >> 8) as u8;
        buf[2] = (len >> 16) as u8;
        buf[3] = 0x83;
        (buf, 4)
    } else {
        buf[0] = len as u8;
        buf[1] = (len >> 8) as u8;
        buf[2] = (len >> 16) as u8;
        buf[3] = (len >> 24) as u8;
        buf[4] = 0x84;
        (buf, 5)
    }
}

/// Decode a length from bytes, returning (length, bytes_consumed).
///
/// The `base_offset` parameter is used to report error offsets correctly
/// when this is called from within a decoder.
pub fn decode_length(data: &[u8], base_offset: usize) -> Result<(usize, usize)> {
    if data.is_empty() {
        return Err(Error::malformed(base_offset, DecodeErrorKind::TruncatedData));
    }

    let first = data[0];

    if first == 0x80 {
        return Err(Error::malformed(
            base_offset,
            DecodeErrorKind::IndefiniteLength,
        ));
    }

    if first & 0x80 == 0 {
        return Ok((first as usize, 1));
    }

    let num_octets = (first & 0x7F) as usize;

    if num_octets > 4 {
        return Err(Error::malformed(
            base_offset,
            DecodeErrorKind::LengthTooLong { octets: num_octets },
        ));
    }

    if data.len() < 1 + num_octets {
        return Err(Error::malformed(base_offset, DecodeErrorKind::TruncatedData));
    }

    let len = data[1..=num_octets]
        .iter()
        .fold(0usize, |acc, &b| (acc << 8) | b as usize);

    if len > MAX_LENGTH {
        return Err(Error::malformed(
            base_offset,
            DecodeErrorKind::LengthExceedsMax {
                length: len,
                max: MAX_LENGTH,
            },
        ));
    }

    Ok((len, 1 + num_octets))
}

/// Number of octets the BER length header for `len` occupies.
#[inline]
pub const fn length_encoded_len(len: usize) -> usize {
    if len <= 127 {
        1
    } else if len <= 0xFF {
        2
    } else if len <= 0xFFFF {
        3
    } else if len <= 0xFFFFFF {
        4
    } else {
        5
    }
}

/// Total size of a TLV with a single-byte tag and `content_len` content octets.
#[inline]
pub const fn tlv_len(content_len: usize) -> usize {
    1 + length_encoded_len(content_len) + content_len
}

/// Content octets of a minimally encoded signed INTEGER.
#[inline]
pub const fn integer_content_len(value: i32) -> usize {
    // Each extra octet is needed while the value doesn't fit in the
    // signed range of the octets counted so far.
    if value >= -0x80 && value <= 0x7F {
        1
    } else if value >= -0x8000 && value <= 0x7FFF {
        2
    } else if value >= -0x80_0000 && value <= 0x7F_FFFF {
        3
    } else {
        4
    }
}

/// Content octets of an unsigned 32-bit value (Counter32, Gauge32, TimeTicks).
#[inline]
pub const fn unsigned32_content_len(value: u32) -> usize {
    unsigned64_content_len(value as u64)
}

/// Content octets of an unsigned 64-bit value (Counter64).
///
/// Includes the leading zero octet needed when the top bit is set.
#[inline]
pub const fn unsigned64_content_len(value: u64) -> usize {
    if value == 0 {
        return 1;
    }
    let bits = 64 - value.leading_zeros() as usize;
    // One sign bit on top of the significant bits, rounded up to octets.
    bits / 8 + 1
}
