//! Error types for snmp-mp.
//!
//! All errors are `#[non_exhaustive]` to allow adding new variants without breaking changes.
//!
//! Errors fall into three groups:
//!
//! - **Status conditions** ([`Error::UnsupportedSecurity`], [`Error::UnsupportedVersion`],
//!   [`Error::UnknownSecurityModel`]): recoverable, reported back as an
//!   [`MpStatus`] code. See [`Error::is_status`].
//! - **Wire failures** ([`Error::MalformedMessage`], [`Error::Io`]): abort the
//!   current encode/decode entirely, with no partial result.
//! - **Caller defects** ([`Error::ProtocolMisuse`]): fail fast and are never
//!   turned into a status code.

use std::net::SocketAddr;

use crate::mp::{MpModelId, PduHandle, StatusInformation};
use crate::security::{SecurityLevel, SecurityModelId};
use crate::version::Version;

/// Result type alias using the library's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// BER decode error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeErrorKind {
    /// Expected different tag.
    UnexpectedTag { expected: u8, actual: u8 },
    /// Message did not start with a SEQUENCE header.
    ExpectedSequence { actual: u8 },
    /// Data truncated unexpectedly.
    TruncatedData,
    /// Invalid BER length encoding.
    InvalidLength,
    /// Indefinite length not supported.
    IndefiniteLength,
    /// Integer value overflow.
    IntegerOverflow,
    /// Zero-length integer.
    ZeroLengthInteger,
    /// Unknown or unsupported SNMP version.
    UnknownVersion(i32),
    /// Unknown PDU type.
    UnknownPduType(u8),
    /// Constructed OCTET STRING not supported.
    ConstructedOctetString,
    /// NULL with non-zero length.
    InvalidNull,
    /// Invalid IP address length.
    InvalidIpAddressLength { length: usize },
    /// Length field too long.
    LengthTooLong { octets: usize },
    /// Length exceeds maximum.
    LengthExceedsMax { length: usize, max: usize },
    /// Integer64 too long.
    Integer64TooLong { length: usize },
    /// Empty message.
    EmptyMessage,
    /// TLV extends past end of data.
    TlvOverflow,
    /// Insufficient data for read.
    InsufficientData { needed: usize, available: usize },
    /// OID has more subidentifiers than allowed.
    OidTooLong { count: usize, max: usize },
    /// Bytes consumed by the message body differ from the declared SEQUENCE length.
    SequenceLengthMismatch { declared: usize, consumed: usize },
}

impl std::fmt::Display for DecodeErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnexpectedTag { expected, actual } => {
                write!(f, "expected tag 0x{:02X}, got 0x{:02X}", expected, actual)
            }
            Self::ExpectedSequence { actual } => {
                write!(
                    f,
                    "message must start with a SEQUENCE, got tag 0x{:02X}",
                    actual
                )
            }
            Self::TruncatedData => write!(f, "unexpected end of data"),
            Self::InvalidLength => write!(f, "invalid length encoding"),
            Self::IndefiniteLength => write!(f, "indefinite length encoding not supported"),
            Self::IntegerOverflow => write!(f, "integer overflow"),
            Self::ZeroLengthInteger => write!(f, "zero-length integer"),
            Self::UnknownVersion(v) => write!(f, "unknown SNMP version: {}", v),
            Self::UnknownPduType(t) => write!(f, "unknown PDU type: 0x{:02X}", t),
            Self::ConstructedOctetString => {
                write!(f, "constructed OCTET STRING (0x24) not supported")
            }
            Self::InvalidNull => write!(f, "NULL with non-zero length"),
            Self::InvalidIpAddressLength { length } => {
                write!(f, "IP address must be 4 bytes, got {}", length)
            }
            Self::LengthTooLong { octets } => {
                write!(f, "length encoding too long ({} octets)", octets)
            }
            Self::LengthExceedsMax { length, max } => {
                write!(f, "length {} exceeds maximum {}", length, max)
            }
            Self::Integer64TooLong { length } => {
                write!(f, "integer64 too long: {} bytes", length)
            }
            Self::EmptyMessage => write!(f, "empty message"),
            Self::TlvOverflow => write!(f, "TLV extends past end of data"),
            Self::InsufficientData { needed, available } => {
                write!(f, "need {} bytes but only {} remaining", needed, available)
            }
            Self::OidTooLong { count, max } => {
                write!(f, "OID has {} subidentifiers, exceeds maximum {}", count, max)
            }
            Self::SequenceLengthMismatch { declared, consumed } => {
                write!(
                    f,
                    "SEQUENCE declares {} content bytes but {} were consumed",
                    declared, consumed
                )
            }
        }
    }
}

/// OID validation error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OidErrorKind {
    /// Empty OID string.
    Empty,
    /// Invalid arc value.
    InvalidArc,
    /// First arc must be 0, 1, or 2.
    InvalidFirstArc(u32),
    /// Second arc too large for first arc value.
    InvalidSecondArc { first: u32, second: u32 },
    /// OID has too many arcs (exceeds MAX_OID_LEN).
    TooManyArcs { count: usize, max: usize },
}

impl std::fmt::Display for OidErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "empty OID"),
            Self::InvalidArc => write!(f, "invalid arc value"),
            Self::InvalidFirstArc(v) => write!(f, "first arc must be 0, 1, or 2, got {}", v),
            Self::InvalidSecondArc { first, second } => {
                write!(f, "second arc {} too large for first arc {}", second, first)
            }
            Self::TooManyArcs { count, max } => {
                write!(f, "OID has {} arcs, exceeds maximum {}", count, max)
            }
        }
    }
}

/// SNMP error status codes (RFC 3416).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorStatus {
    NoError,
    TooBig,
    NoSuchName,
    BadValue,
    ReadOnly,
    GenErr,
    NoAccess,
    WrongType,
    WrongLength,
    WrongEncoding,
    WrongValue,
    NoCreation,
    InconsistentValue,
    ResourceUnavailable,
    CommitFailed,
    UndoFailed,
    AuthorizationError,
    NotWritable,
    InconsistentName,
    /// Unknown/future error status code.
    Unknown(i32),
}

impl ErrorStatus {
    /// Create from raw status code.
    pub fn from_i32(value: i32) -> Self {
        match value {
            0 => Self::NoError,
            1 => Self::TooBig,
            2 => Self::NoSuchName,
            3 => Self::BadValue,
            4 => Self::ReadOnly,
            5 => Self::GenErr,
            6 => Self::NoAccess,
            7 => Self::WrongType,
            8 => Self::WrongLength,
            9 => Self::WrongEncoding,
            10 => Self::WrongValue,
            11 => Self::NoCreation,
            12 => Self::InconsistentValue,
            13 => Self::ResourceUnavailable,
            14 => Self::CommitFailed,
            15 => Self::UndoFailed,
            16 => Self::AuthorizationError,
            17 => Self::NotWritable,
            18 => Self::InconsistentName,
            other => Self::Unknown(other),
        }
    }

    /// Convert to raw status code.
    pub fn as_i32(&self) -> i32 {
        match self {
            Self::NoError => 0,
            Self::TooBig => 1,
            Self::NoSuchName => 2,
            Self::BadValue => 3,
            Self::ReadOnly => 4,
            Self::GenErr => 5,
            Self::NoAccess => 6,
            Self::WrongType => 7,
            Self::WrongLength => 8,
            Self::WrongEncoding => 9,
            Self::WrongValue => 10,
            Self::NoCreation => 11,
            Self::InconsistentValue => 12,
            Self::ResourceUnavailable => 13,
            Self::CommitFailed => 14,
            Self::UndoFailed => 15,
            Self::AuthorizationError => 16,
            Self::NotWritable => 17,
            Self::InconsistentName => 18,
            Self::Unknown(code) => *code,
        }
    }
}

impl std::fmt::Display for ErrorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoError => write!(f, "noError"),
            Self::TooBig => write!(f, "tooBig"),
            Self::NoSuchName => write!(f, "noSuchName"),
            Self::BadValue => write!(f, "badValue"),
            Self::ReadOnly => write!(f, "readOnly"),
            Self::GenErr => write!(f, "genErr"),
            Self::NoAccess => write!(f, "noAccess"),
            Self::WrongType => write!(f, "wrongType"),
            Self::WrongLength => write!(f, "wrongLength"),
            Self::WrongEncoding => write!(f, "wrongEncoding"),
            Self::WrongValue => write!(f, "wrongValue"),
            Self::NoCreation => write!(f, "noCreation"),
            Self::InconsistentValue => write!(f, "inconsistentValue"),
            Self::ResourceUnavailable => write!(f, "resourceUnavailable"),
            Self::CommitFailed => write!(f, "commitFailed"),
            Self::UndoFailed => write!(f, "undoFailed"),
            Self::AuthorizationError => write!(f, "authorizationError"),
            Self::NotWritable => write!(f, "notWritable"),
            Self::InconsistentName => write!(f, "inconsistentName"),
            Self::Unknown(code) => write!(f, "unknown({})", code),
        }
    }
}

/// Message processing status codes.
///
/// These are the status values a message processing model reports to its
/// dispatcher, numbered in the `-1400` block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum MpStatus {
    Ok,
    Error,
    UnsupportedSecurityModel,
    NotInTimeWindow,
    DoubledMessage,
    InvalidMessage,
    InvalidEngineId,
    NotInitialized,
    ParseError,
    UnknownMsgId,
    MatchError,
    CommunityError,
    WrongUserName,
    BuildError,
    UsmError,
    UnknownPduHandlers,
    /// Unknown/future status code.
    Unknown(i32),
}

impl MpStatus {
    /// Create from raw status code.
    pub fn from_i32(value: i32) -> Self {
        match value {
            0 => Self::Ok,
            -1400 => Self::Error,
            -1402 => Self::UnsupportedSecurityModel,
            -1403 => Self::NotInTimeWindow,
            -1404 => Self::DoubledMessage,
            -1405 => Self::InvalidMessage,
            -1406 => Self::InvalidEngineId,
            -1407 => Self::NotInitialized,
            -1408 => Self::ParseError,
            -1409 => Self::UnknownMsgId,
            -1410 => Self::MatchError,
            -1411 => Self::CommunityError,
            -1412 => Self::WrongUserName,
            -1413 => Self::BuildError,
            -1414 => Self::UsmError,
            -1415 => Self::UnknownPduHandlers,
            other => Self::Unknown(other),
        }
    }

    /// Convert to raw status code.
    pub fn as_i32(&self) -> i32 {
        match self {
            Self::Ok => 0,
            Self::Error => -1400,
            Self::UnsupportedSecurityModel => -1402,
            Self::NotInTimeWindow => -1403,
            Self::DoubledMessage => -1404,
            Self::InvalidMessage => -1405,
            Self::InvalidEngineId => -1406,
            Self::NotInitialized => -1407,
            Self::ParseError => -1408,
            Self::UnknownMsgId => -1409,
            Self::MatchError => -1410,
            Self::CommunityError => -1411,
            Self::WrongUserName => -1412,
            Self::BuildError => -1413,
            Self::UsmError => -1414,
            Self::UnknownPduHandlers => -1415,
            Self::Unknown(code) => *code,
        }
    }
}

impl std::fmt::Display for MpStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ok => write!(f, "ok"),
            Self::Error => write!(f, "error"),
            Self::UnsupportedSecurityModel => write!(f, "unsupportedSecurityModel"),
            Self::NotInTimeWindow => write!(f, "notInTimeWindow"),
            Self::DoubledMessage => write!(f, "doubledMessage"),
            Self::InvalidMessage => write!(f, "invalidMessage"),
            Self::InvalidEngineId => write!(f, "invalidEngineId"),
            Self::NotInitialized => write!(f, "notInitialized"),
            Self::ParseError => write!(f, "parseError"),
            Self::UnknownMsgId => write!(f, "unknownMsgId"),
            Self::MatchError => write!(f, "matchError"),
            Self::CommunityError => write!(f, "communityError"),
            Self::WrongUserName => write!(f, "wrongUserName"),
            Self::BuildError => write!(f, "buildError"),
            Self::UsmError => write!(f, "usmError"),
            Self::UnknownPduHandlers => write!(f, "unknownPduHandlers"),
            Self::Unknown(code) => write!(f, "unknown({})", code),
        }
    }
}

/// Library error type.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// I/O error reading or writing message data.
    #[error("I/O error{}: {source}", target.map(|t| format!(" communicating with {}", t)).unwrap_or_default())]
    Io {
        target: Option<SocketAddr>,
        #[source]
        source: std::io::Error,
    },

    /// Invalid OID format.
    #[error("invalid OID: {kind}")]
    InvalidOid {
        kind: OidErrorKind,
        input: Option<Box<str>>, // Only allocated when parsing string input
    },

    /// Wire data violates the expected tag/length structure.
    #[error("malformed message at offset {offset}: {kind}")]
    MalformedMessage {
        offset: usize,
        kind: DecodeErrorKind,
    },

    /// The (security model, security level, version) combination is not
    /// accepted by the message processing model.
    #[error(
        "unsupported security configuration: {security_model} at {security_level} for {version}"
    )]
    UnsupportedSecurity {
        version: Version,
        security_model: SecurityModelId,
        security_level: SecurityLevel,
    },

    /// The caller handed the engine something it can never process, such as
    /// a scoped PDU on a community-based version.
    #[error("protocol misuse: {reason}")]
    ProtocolMisuse { reason: &'static str },

    /// Message exceeds maximum size.
    #[error("message too large: {size} bytes exceeds maximum {max}")]
    MessageTooLarge { size: usize, max: usize },

    /// The security model registry has no handler for the requested model.
    #[error("no security model registered for {model}")]
    UnknownSecurityModel { model: SecurityModelId },

    /// No registered message processing model accepts this wire version.
    #[error("unsupported SNMP version {version}")]
    UnsupportedVersion {
        version: i32,
        status: StatusInformation,
    },

    /// No message processing model registered under this identifier.
    #[error("no message processing model registered for {model}")]
    UnknownModel { model: MpModelId },

    /// A request with this handle is already outstanding.
    #[error("request handle {handle} is already outstanding")]
    DuplicateHandle { handle: PduHandle },

    /// A response arrived for a handle with no outstanding request.
    #[error("no outstanding request for handle {handle}")]
    UnknownHandle { handle: PduHandle },
}

impl Error {
    /// Create a malformed message error.
    pub fn malformed(offset: usize, kind: DecodeErrorKind) -> Self {
        Self::MalformedMessage { offset, kind }
    }

    /// Create an invalid OID error from a kind (no input string).
    pub fn invalid_oid(kind: OidErrorKind) -> Self {
        Self::InvalidOid { kind, input: None }
    }

    /// Create an invalid OID error with the input string that failed.
    pub fn invalid_oid_with_input(kind: OidErrorKind, input: impl Into<Box<str>>) -> Self {
        Self::InvalidOid {
            kind,
            input: Some(input.into()),
        }
    }

    /// Get the target address if this error has one.
    pub fn target(&self) -> Option<SocketAddr> {
        match self {
            Self::Io { target, .. } => *target,
            _ => None,
        }
    }

    /// Returns `true` for recoverable conditions that are reported as a
    /// status code rather than aborting the caller.
    pub fn is_status(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedSecurity { .. }
                | Self::UnsupportedVersion { .. }
                | Self::UnknownSecurityModel { .. }
                | Self::UnknownHandle { .. }
        )
    }

    /// Map this error to the message processing status code it represents.
    ///
    /// Returns `None` for caller defects and I/O failures, which have no
    /// status code equivalent.
    pub fn mp_status(&self) -> Option<MpStatus> {
        match self {
            Self::UnsupportedSecurity { .. } | Self::UnknownSecurityModel { .. } => {
                Some(MpStatus::UnsupportedSecurityModel)
            }
            Self::MalformedMessage { .. } => Some(MpStatus::ParseError),
            Self::UnsupportedVersion { .. } => Some(MpStatus::InvalidMessage),
            Self::MessageTooLarge { .. } => Some(MpStatus::BuildError),
            Self::UnknownModel { .. } => Some(MpStatus::Error),
            Self::DuplicateHandle { .. } => Some(MpStatus::MatchError),
            Self::UnknownHandle { .. } => Some(MpStatus::UnknownMsgId),
            Self::ProtocolMisuse { .. } | Self::Io { .. } | Self::InvalidOid { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mp_status_codes() {
        assert_eq!(MpStatus::Ok.as_i32(), 0);
        assert_eq!(MpStatus::UnsupportedSecurityModel.as_i32(), -1402);
        assert_eq!(MpStatus::ParseError.as_i32(), -1408);
        assert_eq!(MpStatus::UnknownPduHandlers.as_i32(), -1415);

        for code in [0, -1400, -1402, -1403, -1404, -1405, -1408, -1411, -1415] {
            assert_eq!(MpStatus::from_i32(code).as_i32(), code);
        }
        assert_eq!(MpStatus::from_i32(-1401), MpStatus::Unknown(-1401));
    }

    #[test]
    fn test_unsupported_security_is_status() {
        let err = Error::UnsupportedSecurity {
            version: Version::V2c,
            security_model: SecurityModelId::USM,
            security_level: SecurityLevel::AuthPriv,
        };
        assert!(err.is_status());
        assert_eq!(err.mp_status(), Some(MpStatus::UnsupportedSecurityModel));
    }

    #[test]
    fn test_protocol_misuse_has_no_status() {
        let err = Error::ProtocolMisuse {
            reason: "scoped PDU",
        };
        assert!(!err.is_status());
        assert_eq!(err.mp_status(), None);
    }

    #[test]
    fn test_malformed_maps_to_parse_error() {
        let err = Error::malformed(3, DecodeErrorKind::TruncatedData);
        assert!(!err.is_status());
        assert_eq!(err.mp_status(), Some(MpStatus::ParseError));
        assert_eq!(
            err.to_string(),
            "malformed message at offset 3: unexpected end of data"
        );
    }

    #[test]
    fn test_error_status_roundtrip() {
        for code in 0..=18 {
            assert_eq!(ErrorStatus::from_i32(code).as_i32(), code);
        }
        assert_eq!(ErrorStatus::from_i32(99), ErrorStatus::Unknown(99));
        assert_eq!(ErrorStatus::TooBig.to_string(), "tooBig");
    }
}
