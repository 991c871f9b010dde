//! Hex helpers for datagram dumps and log output.

use std::fmt;

/// Encode bytes as a lowercase hex string.
///
/// ```
/// use snmp_mp::util::encode_hex;
///
/// assert_eq!(encode_hex(&[0xde, 0xad, 0xbe, 0xef]), "deadbeef");
/// ```
pub fn encode_hex(bytes: &[u8]) -> String {
    HexBytes(bytes).to_string()
}

/// Decode a hex string to bytes.
///
/// ASCII whitespace is ignored so that wrapped packet dumps can be pasted
/// as-is. An optional `0x` prefix is accepted.
///
/// ```
/// use snmp_mp::util::decode_hex;
///
/// assert_eq!(decode_hex("30 0a").unwrap(), vec![0x30, 0x0a]);
/// assert!(decode_hex("abc").is_err());
/// ```
pub fn decode_hex(s: &str) -> Result<Vec<u8>, HexError> {
    let s = s.trim();
    let s = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);

    let digits = s
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .map(|b| match b {
            b'0'..=b'9' => Ok(b - b'0'),
            b'a'..=b'f' => Ok(b - b'a' + 10),
            b'A'..=b'F' => Ok(b - b'A' + 10),
            _ => Err(HexError::InvalidChar(b as char)),
        })
        .collect::<Result<Vec<u8>, HexError>>()?;

    if !digits.len().is_multiple_of(2) {
        return Err(HexError::OddLength);
    }

    Ok(digits.chunks_exact(2).map(|p| (p[0] << 4) | p[1]).collect())
}

/// Error returned by [`decode_hex`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HexError {
    /// Input has an odd number of hex digits.
    OddLength,
    /// Input contains a character that is not a hex digit.
    InvalidChar(char),
}

impl fmt::Display for HexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OddLength => write!(f, "odd number of hex digits"),
            Self::InvalidChar(c) => write!(f, "invalid hex character {:?}", c),
        }
    }
}

impl std::error::Error for HexError {}

/// Lazy hex formatter, only formats when displayed.
///
/// Used in `tracing` fields so disabled levels cost nothing.
pub struct HexBytes<'a>(pub &'a [u8]);

impl fmt::Debug for HexBytes<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in self.0 {
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}

impl fmt::Display for HexBytes<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
