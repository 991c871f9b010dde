//! Message processing models.
//!
//! A message processing model turns a PDU plus addressing and security
//! parameters into a wire-exact datagram for one SNMP version, and decodes
//! inbound datagrams back into a PDU together with the
//! [`StateReference`] needed to answer it.
//!
//! Every version implements [`MessageProcessingModel`]. The community-based
//! versions are provided by [`CommunityMp`]; a
//! [`MessageDispatcher`](crate::dispatch::MessageDispatcher) routes between
//! registered models.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use snmp_mp::mp::{CommunityMp, MessageProcessingModel, OutgoingParams};
//! use snmp_mp::security::SecurityModels;
//! use snmp_mp::{Pdu, Version, oid};
//!
//! # fn main() -> snmp_mp::Result<()> {
//! let mp = CommunityMp::v2c(Arc::new(SecurityModels::community()));
//! let agent = "192.0.2.1:161".parse().unwrap();
//!
//! let pdu = Pdu::get_request(42, &[oid!(1, 3, 6, 1, 2, 1, 1, 1, 0)]);
//! let params = OutgoingParams::community(agent, Version::V2c, "public");
//! let datagram = mp.prepare_outgoing_message(&params, &pdu.into())?;
//!
//! let elements = mp.prepare_data_elements(datagram, agent)?;
//! assert_eq!(elements.pdu.request_id(), 42);
//! assert_eq!(&elements.security_name[..], b"public");
//! # Ok(())
//! # }
//! ```

mod community;
mod state;

pub use community::CommunityMp;
pub use state::{PduHandle, StateReference, StatusInformation};

use std::fmt;
use std::net::SocketAddr;

use bytes::Bytes;

use crate::ber::{Decoder, tag};
use crate::error::{DecodeErrorKind, Error, Result};
use crate::pdu::MessagePdu;
use crate::security::{SecurityLevel, SecurityModelId};
use crate::version::Version;

/// Default maximum message size: the largest UDP payload over IPv4.
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 65507;

/// Message processing model identifier (RFC 3411 SnmpMessageProcessingModel).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MpModelId {
    /// Community-based SNMPv1.
    V1 = 0,
    /// Community-based SNMPv2c.
    V2c = 1,
    /// User-based SNMPv2u (historic).
    V2u = 2,
    /// SNMPv3.
    V3 = 3,
}

impl MpModelId {
    /// Raw identifier.
    pub const fn as_i32(self) -> i32 {
        self as i32
    }

    /// Create from the raw identifier.
    pub const fn from_i32(value: i32) -> Option<Self> {
        match value {
            0 => Some(Self::V1),
            1 => Some(Self::V2c),
            2 => Some(Self::V2u),
            3 => Some(Self::V3),
            _ => None,
        }
    }
}

impl fmt::Display for MpModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V1 => write!(f, "MPv1"),
            Self::V2c => write!(f, "MPv2c"),
            Self::V2u => write!(f, "MPv2u"),
            Self::V3 => write!(f, "MPv3"),
        }
    }
}

/// Parameters for an outgoing message.
#[derive(Debug, Clone)]
pub struct OutgoingParams {
    /// Where the message will be sent.
    pub destination: SocketAddr,
    /// Largest datagram the caller can send.
    pub max_message_size: usize,
    /// Protocol version to encode.
    pub version: Version,
    /// Security model to apply.
    pub security_model: SecurityModelId,
    /// Security name (the community, for community-based versions).
    pub security_name: Bytes,
    /// Requested security level.
    pub security_level: SecurityLevel,
    /// Whether a response is expected.
    pub expect_response: bool,
    /// Handle correlating the response, if any.
    pub handle: Option<PduHandle>,
}

impl OutgoingParams {
    /// Parameters for a community-based request expecting a response.
    ///
    /// The security model follows the version: SNMPv1 for [`Version::V1`],
    /// SNMPv2c otherwise.
    pub fn community(
        destination: SocketAddr,
        version: Version,
        community: impl Into<Bytes>,
    ) -> Self {
        let security_model = match version {
            Version::V1 => SecurityModelId::SNMPV1,
            _ => SecurityModelId::SNMPV2C,
        };
        Self {
            destination,
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
            version,
            security_model,
            security_name: community.into(),
            security_level: SecurityLevel::NoAuthNoPriv,
            expect_response: true,
            handle: None,
        }
    }

    /// Set the correlation handle.
    pub fn with_handle(mut self, handle: PduHandle) -> Self {
        self.handle = Some(handle);
        self
    }

    /// Set the maximum message size.
    pub fn max_message_size(mut self, size: usize) -> Self {
        self.max_message_size = size;
        self
    }

    /// Set whether a response is expected.
    pub fn expect_response(mut self, expect: bool) -> Self {
        self.expect_response = expect;
        self
    }
}

/// Parameters for a response message.
///
/// Destination and handle come from the [`StateReference`].
#[derive(Debug, Clone)]
pub struct ResponseParams {
    /// Protocol version to encode.
    pub version: Version,
    /// Largest datagram the local side can send.
    pub max_message_size: usize,
    /// Security model to apply.
    pub security_model: SecurityModelId,
    /// Security name.
    pub security_name: Bytes,
    /// Security level.
    pub security_level: SecurityLevel,
    /// Largest response the requester accepts.
    pub max_response_size: usize,
}

/// Decoded contents of an inbound message.
#[derive(Debug)]
pub struct DataElements {
    /// Model that decoded the message.
    pub model: MpModelId,
    /// Protocol version on the wire.
    pub version: Version,
    /// Security model applied.
    pub security_model: SecurityModelId,
    /// Security name (community, for community-based versions).
    pub security_name: Bytes,
    /// Security level applied.
    pub security_level: SecurityLevel,
    /// The PDU.
    pub pdu: MessagePdu,
    /// Correlation handle.
    pub handle: PduHandle,
    /// Largest response the sender accepts.
    pub max_response_size: usize,
    /// Processing outcome.
    pub status: StatusInformation,
    /// State for building the response.
    pub state_reference: StateReference,
}

impl DataElements {
    /// Parameters for answering this message with the same version and security.
    pub fn response_params(&self) -> ResponseParams {
        ResponseParams {
            version: self.version,
            max_message_size: self.max_response_size,
            security_model: self.security_model,
            security_name: self.security_name.clone(),
            security_level: self.security_level,
            max_response_size: self.max_response_size,
        }
    }
}

/// The operation set every SNMP version implements.
///
/// Implementations must be usable from several threads at once. Stateful
/// versions keep per-exchange security state keyed by [`PduHandle`] and
/// evict it in [`release_state_reference`](Self::release_state_reference).
pub trait MessageProcessingModel: Send + Sync {
    /// This model's identifier.
    fn id(&self) -> MpModelId;

    /// Whether this model handles the given wire version number.
    fn is_version_supported(&self, version: i32) -> bool;

    /// Encode an outgoing message.
    ///
    /// Unsupported (security model, security level, version) combinations
    /// fail with [`Error::UnsupportedSecurity`] before any work is done. A
    /// PDU shape the version cannot carry fails with
    /// [`Error::ProtocolMisuse`].
    fn prepare_outgoing_message(&self, params: &OutgoingParams, pdu: &MessagePdu)
    -> Result<Bytes>;

    /// Encode a response to a previously decoded request.
    ///
    /// Always addressed to the request's origin, with the request's handle,
    /// and never expecting a response. The size limit is the smaller of the
    /// local and the requester's maximum.
    fn prepare_response_message(
        &self,
        params: &ResponseParams,
        pdu: &MessagePdu,
        state: StateReference,
    ) -> Result<Bytes> {
        let outgoing = OutgoingParams {
            destination: state.address(),
            max_message_size: params.max_message_size.min(params.max_response_size),
            version: params.version,
            security_model: params.security_model,
            security_name: params.security_name.clone(),
            security_level: params.security_level,
            expect_response: false,
            handle: Some(state.handle()),
        };
        self.prepare_outgoing_message(&outgoing, pdu)
    }

    /// Decode an inbound datagram received from `source`.
    fn prepare_data_elements(&self, data: Bytes, source: SocketAddr) -> Result<DataElements>;

    /// Discard any state kept for `handle`.
    fn release_state_reference(&self, handle: &PduHandle);
}

/// Read the outer message SEQUENCE header, returning the declared content length.
pub(crate) fn read_message_header(decoder: &mut Decoder) -> Result<usize> {
    match decoder.peek_tag() {
        None => Err(Error::malformed(
            decoder.absolute_offset(),
            DecodeErrorKind::EmptyMessage,
        )),
        Some(tag::universal::SEQUENCE) => {
            decoder.read_tag()?;
            decoder.read_length()
        }
        Some(actual) => {
            tracing::debug!(target: "snmp_mp::mp", { snmp.offset = decoder.absolute_offset(), tag = actual }, "message does not start with a SEQUENCE");
            Err(Error::malformed(
                decoder.absolute_offset(),
                DecodeErrorKind::ExpectedSequence { actual },
            ))
        }
    }
}

/// Read the wire version number without decoding the rest of the message.
///
/// Every SNMP version starts with `SEQUENCE { version INTEGER, ... }`.
pub fn peek_version(data: &Bytes) -> Result<i32> {
    let mut decoder = Decoder::new(data.clone());
    read_message_header(&mut decoder)?;
    decoder.read_integer()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_ids() {
        for id in [MpModelId::V1, MpModelId::V2c, MpModelId::V2u, MpModelId::V3] {
            assert_eq!(MpModelId::from_i32(id.as_i32()), Some(id));
        }
        assert_eq!(MpModelId::V2c.as_i32(), 1);
        assert_eq!(MpModelId::from_i32(4), None);
        assert_eq!(MpModelId::V3.to_string(), "MPv3");
    }

    #[test]
    fn test_peek_version() {
        let data = Bytes::from_static(&[0x30, 0x03, 0x02, 0x01, 0x03]);
        assert_eq!(peek_version(&data).unwrap(), 3);
    }

    #[test]
    fn test_peek_version_rejects_non_sequence() {
        let data = Bytes::from_static(&[0x02, 0x01, 0x01]);
        assert!(matches!(
            peek_version(&data),
            Err(Error::MalformedMessage {
                offset: 0,
                kind: DecodeErrorKind::ExpectedSequence { actual: 0x02 }
            })
        ));
        assert!(matches!(
            peek_version(&Bytes::new()),
            Err(Error::MalformedMessage {
                kind: DecodeErrorKind::EmptyMessage,
                ..
            })
        ));
    }

    #[test]
    fn test_community_params() {
        let dest: SocketAddr = "192.0.2.1:161".parse().unwrap();
        let params = OutgoingParams::community(dest, Version::V1, "private")
            .with_handle(PduHandle::new(3))
            .max_message_size(484);
        assert_eq!(params.security_model, SecurityModelId::SNMPV1);
        assert_eq!(params.security_level, SecurityLevel::NoAuthNoPriv);
        assert_eq!(params.max_message_size, 484);
        assert!(params.expect_response);
        assert_eq!(params.handle, Some(PduHandle::new(3)));
    }
}
