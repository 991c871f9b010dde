//! Object Identifier (OID) type.
//!
//! OIDs are stored as `SmallVec<[u32; 16]>` to avoid heap allocation for common OIDs.

use crate::ber::tlv_len;
use crate::error::{DecodeErrorKind, Error, OidErrorKind, Result};
use smallvec::SmallVec;
use std::fmt;

/// Maximum number of arcs (subidentifiers) allowed in an OID.
///
/// Per RFC 2578 Section 3.5: "there are at most 128 sub-identifiers in a value".
pub const MAX_OID_LEN: usize = 128;

/// Object Identifier.
///
/// Stored as a sequence of arc values (u32).
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Oid {
    arcs: SmallVec<[u32; 16]>,
}

impl Oid {
    /// Create an empty OID.
    pub fn empty() -> Self {
        Self {
            arcs: SmallVec::new(),
        }
    }

    /// Create an OID from arc values.
    ///
    /// ```
    /// use snmp_mp::oid::Oid;
    ///
    /// let oid = Oid::new([1, 3, 6, 1]);
    /// assert_eq!(oid.len(), 4);
    /// ```
    pub fn new(arcs: impl IntoIterator<Item = u32>) -> Self {
        Self {
            arcs: arcs.into_iter().collect(),
        }
    }

    /// Create an OID from a slice of arcs.
    pub fn from_slice(arcs: &[u32]) -> Self {
        Self {
            arcs: SmallVec::from_slice(arcs),
        }
    }

    /// Parse an OID from dotted string notation (e.g., "1.3.6.1.2.1.1.1.0").
    ///
    /// A single leading dot is accepted. Arc constraints are not checked
    /// here; call [`validate()`](Self::validate) for that.
    ///
    /// ```
    /// use snmp_mp::oid::Oid;
    ///
    /// let oid = Oid::parse("1.3.6.1.2.1.1.1.0").unwrap();
    /// assert_eq!(oid.arcs(), &[1, 3, 6, 1, 2, 1, 1, 1, 0]);
    /// assert!(Oid::parse("1.3.x").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let trimmed = s.strip_prefix('.').unwrap_or(s);
        if trimmed.is_empty() {
            return Err(Error::invalid_oid_with_input(OidErrorKind::Empty, s));
        }

        trimmed
            .split('.')
            .map(|part| {
                part.parse::<u32>()
                    .map_err(|_| Error::invalid_oid_with_input(OidErrorKind::InvalidArc, s))
            })
            .collect::<Result<SmallVec<_>>>()
            .map(|arcs| Self { arcs })
    }

    /// Get the arc values.
    pub fn arcs(&self) -> &[u32] {
        &self.arcs
    }

    /// Get the number of arcs.
    pub fn len(&self) -> usize {
        self.arcs.len()
    }

    /// Check if the OID is empty.
    pub fn is_empty(&self) -> bool {
        self.arcs.is_empty()
    }

    /// Last arc, if any. Table columns use it as the row index.
    pub fn last_arc(&self) -> Option<u32> {
        self.arcs.last().copied()
    }

    /// Check if this OID starts with another OID.
    ///
    /// ```
    /// use snmp_mp::oid;
    ///
    /// let level = oid!(1, 3, 6, 1, 2, 1, 43, 11, 1, 1, 9, 1, 1);
    /// assert!(level.starts_with(&oid!(1, 3, 6, 1, 2, 1, 43, 11, 1, 1, 9)));
    /// assert!(!level.starts_with(&oid!(1, 3, 6, 1, 2, 1, 43, 11, 1, 1, 8)));
    /// ```
    pub fn starts_with(&self, other: &Oid) -> bool {
        self.arcs.len() >= other.arcs.len() && self.arcs[..other.arcs.len()] == other.arcs[..]
    }

    /// Get the parent OID (all arcs except the last).
    pub fn parent(&self) -> Option<Oid> {
        self.arcs.split_last().map(|(_, rest)| Oid::from_slice(rest))
    }

    /// Create a child OID by appending an arc.
    pub fn child(&self, arc: u32) -> Oid {
        let mut arcs = self.arcs.clone();
        arcs.push(arc);
        Oid { arcs }
    }

    /// Validate OID arcs per X.690 Section 8.19.4.
    ///
    /// - arc1 must be 0, 1, or 2
    /// - arc2 must be <= 39 when arc1 is 0 or 1
    pub fn validate(&self) -> Result<()> {
        let Some(&arc1) = self.arcs.first() else {
            return Ok(());
        };

        if arc1 > 2 {
            return Err(Error::invalid_oid(OidErrorKind::InvalidFirstArc(arc1)));
        }

        if let Some(&arc2) = self.arcs.get(1)
            && arc1 < 2
            && arc2 >= 40
        {
            return Err(Error::invalid_oid(OidErrorKind::InvalidSecondArc {
                first: arc1,
                second: arc2,
            }));
        }

        Ok(())
    }

    /// Validate that the OID doesn't exceed the maximum arc count.
    pub fn validate_length(&self) -> Result<()> {
        if self.arcs.len() > MAX_OID_LEN {
            return Err(Error::invalid_oid(OidErrorKind::TooManyArcs {
                count: self.arcs.len(),
                max: MAX_OID_LEN,
            }));
        }
        Ok(())
    }

    /// Encode to BER content octets, returning a stack-allocated buffer.
    ///
    /// OID encoding (X.690 Section 8.19):
    /// - First two arcs encoded as (arc1 * 40) + arc2 using base-128
    /// - Remaining arcs encoded as base-128 variable length
    pub fn to_ber_smallvec(&self) -> SmallVec<[u8; 64]> {
        let mut bytes = SmallVec::new();
        for subid in self.subidentifiers() {
            encode_subidentifier(&mut bytes, subid);
        }
        bytes
    }

    /// Encode to BER content octets.
    pub fn to_ber(&self) -> Vec<u8> {
        self.to_ber_smallvec().to_vec()
    }

    /// Number of BER content octets, computed without encoding.
    pub fn ber_content_len(&self) -> usize {
        self.subidentifiers().map(subidentifier_len).sum()
    }

    /// Total BER size (tag + length + content), computed without encoding.
    pub fn ber_encoded_len(&self) -> usize {
        tlv_len(self.ber_content_len())
    }

    /// Subidentifiers as they appear on the wire (first two arcs folded).
    fn subidentifiers(&self) -> impl Iterator<Item = u32> + '_ {
        let first = match self.arcs.as_slice() {
            [] => None,
            [a] => Some(a.wrapping_mul(40)),
            [a, b, ..] => Some(a.wrapping_mul(40).wrapping_add(*b)),
        };
        first
            .into_iter()
            .chain(self.arcs.iter().skip(2).copied())
    }

    /// Decode from BER content octets.
    ///
    /// Enforces [`MAX_OID_LEN`]. Error offsets are relative to `data`.
    pub fn from_ber(data: &[u8]) -> Result<Self> {
        if data.is_empty() {
            return Ok(Self::empty());
        }

        let mut arcs = SmallVec::new();

        let (first_subid, consumed) = decode_subidentifier(data, 0)?;
        match first_subid {
            0..40 => arcs.extend([0, first_subid]),
            40..80 => arcs.extend([1, first_subid - 40]),
            _ => arcs.extend([2, first_subid - 80]),
        }

        let mut i = consumed;
        while i < data.len() {
            let (arc, bytes_consumed) = decode_subidentifier(&data[i..], i)?;
            arcs.push(arc);
            i += bytes_consumed;

            if arcs.len() > MAX_OID_LEN {
                return Err(Error::malformed(
                    i,
                    DecodeErrorKind::OidTooLong {
                        count: arcs.len(),
                        max: MAX_OID_LEN,
                    },
                ));
            }
        }

        Ok(Self { arcs })
    }
}

/// Number of base-128 octets for one subidentifier.
#[inline]
fn subidentifier_len(value: u32) -> usize {
    let bits = 32 - value.leading_zeros() as usize;
    bits.div_ceil(7).max(1)
}

/// Encode a subidentifier in base-128 variable length.
#[inline]
fn encode_subidentifier(bytes: &mut SmallVec<[u8; 64]>, value: u32) {
    let count = subidentifier_len(value);
    for i in (0..count).rev() {
        let mut byte = ((value >> (i * 7)) & 0x7F) as u8;
        if i > 0 {
            byte |= 0x80;
        }
        bytes.push(byte);
    }
}

/// Decode a subidentifier, returning (value, bytes_consumed).
fn decode_subidentifier(data: &[u8], base: usize) -> Result<(u32, usize)> {
    let mut value: u32 = 0;

    for (i, &byte) in data.iter().enumerate() {
        if value > (u32::MAX >> 7) {
            return Err(Error::malformed(base + i, DecodeErrorKind::IntegerOverflow));
        }
        value = (value << 7) | (byte & 0x7F) as u32;
        if byte & 0x80 == 0 {
            return Ok((value, i + 1));
        }
    }

    Err(Error::malformed(
        base + data.len(),
        DecodeErrorKind::TruncatedData,
    ))
}

impl fmt::Debug for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Oid({})", self)
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for arc in &self.arcs {
            if !first {
                write!(f, ".")?;
            }
            write!(f, "{}", arc)?;
            first = false;
        }
        Ok(())
    }
}

impl std::str::FromStr for Oid {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<&[u32]> for Oid {
    fn from(arcs: &[u32]) -> Self {
        Self::from_slice(arcs)
    }
}

impl<const N: usize> From<[u32; N]> for Oid {
    fn from(arcs: [u32; N]) -> Self {
        Self::new(arcs)
    }
}

impl PartialOrd for Oid {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Oid {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.arcs.cmp(&other.arcs)
    }
}

/// Macro to create an OID from literal arcs.
///
/// ```
/// use snmp_mp::oid;
///
/// let sys_descr = oid!(1, 3, 6, 1, 2, 1, 1, 1, 0);
/// assert_eq!(sys_descr.to_string(), "1.3.6.1.2.1.1.1.0");
/// ```
#[macro_export]
macro_rules! oid {
    ($($arc:expr),* $(,)?) => {
        $crate::oid::Oid::from_slice(&[$($arc),*])
    };
}
