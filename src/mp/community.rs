//! Community-based message processing (SNMPv1 and SNMPv2c).
//!
//! ```text
//! Message ::= SEQUENCE {
//!     version      INTEGER,
//!     community    OCTET STRING,
//!     data         PDU
//! }
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;

use super::{
    DEFAULT_MAX_MESSAGE_SIZE, DataElements, MessageProcessingModel, MpModelId, OutgoingParams,
    PduHandle, StateReference, StatusInformation, read_message_header,
};
use crate::ber::{Decoder, EncodeBuf, integer_content_len, tlv_len};
use crate::error::{DecodeErrorKind, Error, Result};
use crate::pdu::{MessagePdu, Pdu};
use crate::security::{SecurityLevel, SecurityModelId, SecurityModels};
use crate::version::Version;

/// Message processing for one community-based version.
///
/// Accepts exactly `noAuthNoPriv` with the version's own community security
/// model, and only plain PDUs. The SNMPv1 instance also refuses PDU types and
/// values that SNMPv1 does not define. The SNMPv1 Trap-PDU (tag `0xA4`) is
/// not supported: decoding one fails with
/// [`DecodeErrorKind::UnknownPduType`]. Holds no per-exchange state, so
/// [`release_state_reference`](MessageProcessingModel::release_state_reference)
/// does nothing.
#[derive(Debug, Clone)]
pub struct CommunityMp {
    model: MpModelId,
    version: Version,
    security_model: SecurityModelId,
    registry: Arc<SecurityModels>,
    max_message_size: usize,
}

impl CommunityMp {
    /// SNMPv1 (MPv1, wire version 0, security model 1).
    pub fn v1(registry: Arc<SecurityModels>) -> Self {
        Self {
            model: MpModelId::V1,
            version: Version::V1,
            security_model: SecurityModelId::SNMPV1,
            registry,
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
        }
    }

    /// SNMPv2c (MPv2c, wire version 1, security model 2).
    pub fn v2c(registry: Arc<SecurityModels>) -> Self {
        Self {
            model: MpModelId::V2c,
            version: Version::V2c,
            security_model: SecurityModelId::SNMPV2C,
            registry,
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
        }
    }

    /// Set the local maximum message size (default 65507).
    ///
    /// Caps outgoing messages and is reported as the maximum response size
    /// of decoded messages.
    pub fn max_message_size(mut self, size: usize) -> Self {
        self.max_message_size = size;
        self
    }

    /// Protocol version handled by this instance.
    pub fn version(&self) -> Version {
        self.version
    }

    /// Security model accepted by this instance.
    pub fn security_model(&self) -> SecurityModelId {
        self.security_model
    }

    fn check_security(&self, params: &OutgoingParams) -> Result<()> {
        let supported = params.security_level == SecurityLevel::NoAuthNoPriv
            && params.security_model == self.security_model
            && self.is_version_supported(params.version.as_i32());
        if supported {
            return Ok(());
        }

        tracing::warn!(
            target: "snmp_mp::mp",
            {
                snmp.model = %self.model,
                snmp.version = %params.version,
                snmp.security_model = %params.security_model,
                snmp.security_level = %params.security_level,
            },
            "unsupported security configuration"
        );
        Err(Error::UnsupportedSecurity {
            version: params.version,
            security_model: params.security_model,
            security_level: params.security_level,
        })
    }

    fn plain_pdu<'a>(&self, pdu: &'a MessagePdu) -> Result<&'a Pdu> {
        let pdu = match pdu {
            MessagePdu::Plain(pdu) => pdu,
            MessagePdu::Scoped(scoped) => {
                return Err(self.misuse(
                    scoped.pdu.request_id,
                    "community-based versions cannot carry a scoped PDU",
                ));
            }
        };
        if self.version == Version::V1 {
            if !pdu.pdu_type.is_v1_compatible() {
                return Err(self.misuse(pdu.request_id, "PDU type not defined in SNMPv1"));
            }
            if !pdu.varbinds.iter().all(|vb| vb.value.is_v1_compatible()) {
                return Err(self.misuse(pdu.request_id, "value type not defined in SNMPv1"));
            }
        }
        Ok(pdu)
    }

    fn misuse(&self, request_id: i32, reason: &'static str) -> Error {
        tracing::error!(
            target: "snmp_mp::mp",
            { snmp.model = %self.model, snmp.request_id = request_id },
            "{}",
            reason
        );
        Error::ProtocolMisuse { reason }
    }
}

impl MessageProcessingModel for CommunityMp {
    fn id(&self) -> MpModelId {
        self.model
    }

    fn is_version_supported(&self, version: i32) -> bool {
        version == self.version.as_i32()
    }

    fn prepare_outgoing_message(
        &self,
        params: &OutgoingParams,
        pdu: &MessagePdu,
    ) -> Result<Bytes> {
        self.check_security(params)?;
        let pdu = self.plain_pdu(pdu)?;

        let version = self.version.as_i32();
        let content_len = tlv_len(integer_content_len(version))
            + tlv_len(params.security_name.len())
            + pdu.ber_encoded_len();
        let total_len = tlv_len(content_len);

        let max = params.max_message_size.min(self.max_message_size);
        if total_len > max {
            tracing::debug!(
                target: "snmp_mp::mp",
                {
                    snmp.destination = %params.destination,
                    snmp.request_id = pdu.request_id,
                    size = total_len,
                    max,
                },
                "message exceeds maximum size"
            );
            return Err(Error::MessageTooLarge {
                size: total_len,
                max,
            });
        }

        let mut buf = EncodeBuf::with_capacity(total_len);
        buf.push_sequence(|buf| {
            pdu.encode(buf);
            buf.push_octet_string(&params.security_name);
            buf.push_integer(version);
        });
        debug_assert_eq!(buf.len(), total_len);

        tracing::trace!(
            target: "snmp_mp::mp",
            {
                snmp.destination = %params.destination,
                snmp.version = %self.version,
                snmp.request_id = pdu.request_id,
                snmp.pdu_type = %pdu.pdu_type,
                snmp.bytes = total_len,
            },
            "encoded message"
        );
        Ok(buf.finish())
    }

    fn prepare_data_elements(&self, data: Bytes, source: SocketAddr) -> Result<DataElements> {
        let mut decoder = Decoder::new(data);
        let declared = read_message_header(&mut decoder)?;
        let start = decoder.offset();

        let version = decoder.read_integer()?;
        if !self.is_version_supported(version) {
            tracing::debug!(target: "snmp_mp::mp", { snmp.source = %source, snmp.version = version, snmp.model = %self.model }, "wire version not handled by this model");
            return Err(Error::malformed(
                start,
                DecodeErrorKind::UnknownVersion(version),
            ));
        }
        let community = decoder.read_octet_string()?;

        // No security fields on the wire: level and model are fixed.
        let security_level = SecurityLevel::NoAuthNoPriv;
        let security_model = self.security_model;

        // Decoded from the outer buffer so an understated SEQUENCE length
        // shows up as a mismatch below.
        let pdu_offset = decoder.offset();
        let pdu = Pdu::decode(&mut decoder)?;
        if self.version == Version::V1 && !pdu.pdu_type.is_v1_compatible() {
            tracing::debug!(target: "snmp_mp::mp", { snmp.source = %source, snmp.pdu_type = %pdu.pdu_type }, "PDU type not defined in SNMPv1");
            return Err(Error::malformed(
                pdu_offset,
                DecodeErrorKind::UnknownPduType(pdu.pdu_type.tag()),
            ));
        }

        let consumed = decoder.offset() - start;
        if consumed != declared {
            tracing::debug!(target: "snmp_mp::mp", { snmp.source = %source, declared, consumed }, "message length mismatch");
            return Err(Error::malformed(
                start,
                DecodeErrorKind::SequenceLengthMismatch { declared, consumed },
            ));
        }
        if !decoder.is_empty() {
            tracing::debug!(target: "snmp_mp::mp", { snmp.source = %source, trailing = decoder.remaining() }, "ignoring bytes after message");
        }

        let handler = self
            .registry
            .get(security_model)
            .ok_or(Error::UnknownSecurityModel {
                model: security_model,
            })?;

        let handle = PduHandle::new(pdu.request_id);
        let state_reference =
            StateReference::new(handle, source, self.model, handler, community.clone());

        tracing::debug!(
            target: "snmp_mp::mp",
            {
                snmp.source = %source,
                snmp.version = %self.version,
                snmp.request_id = pdu.request_id,
                snmp.pdu_type = %pdu.pdu_type,
            },
            "decoded message"
        );

        Ok(DataElements {
            model: self.model,
            version: self.version,
            security_model,
            security_name: community,
            security_level,
            pdu: MessagePdu::Plain(pdu),
            handle,
            max_response_size: self.max_message_size,
            status: StatusInformation::Success,
            state_reference,
        })
    }

    /// Does nothing: community-based processing keeps no per-exchange state.
    fn release_state_reference(&self, _handle: &PduHandle) {}
}
