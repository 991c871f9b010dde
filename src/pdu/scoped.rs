//! Context-scoped PDUs.

use bytes::Bytes;

use super::Pdu;
use crate::ber::{Decoder, EncodeBuf, tlv_len};
use crate::error::Result;

/// PDU with context engine ID and context name (RFC 3412 ScopedPDU).
///
/// Only valid for context-aware versions. Community-based message
/// processing rejects it.
#[derive(Debug, Clone, PartialEq)]
pub struct ScopedPdu {
    /// Context engine ID
    pub context_engine_id: Bytes,
    /// Context name
    pub context_name: Bytes,
    /// The inner PDU
    pub pdu: Pdu,
}

impl ScopedPdu {
    /// Create a new scoped PDU.
    pub fn new(
        context_engine_id: impl Into<Bytes>,
        context_name: impl Into<Bytes>,
        pdu: Pdu,
    ) -> Self {
        Self {
            context_engine_id: context_engine_id.into(),
            context_name: context_name.into(),
            pdu,
        }
    }

    /// Create with empty context (default context).
    pub fn with_empty_context(pdu: Pdu) -> Self {
        Self::new(Bytes::new(), Bytes::new(), pdu)
    }

    /// Encode to BER.
    pub fn encode(&self, buf: &mut EncodeBuf) {
        buf.push_sequence(|buf| {
            self.pdu.encode(buf);
            buf.push_octet_string(&self.context_name);
            buf.push_octet_string(&self.context_engine_id);
        });
    }

    /// Exact encoded size, computed without encoding.
    pub fn ber_encoded_len(&self) -> usize {
        tlv_len(
            tlv_len(self.context_engine_id.len())
                + tlv_len(self.context_name.len())
                + self.pdu.ber_encoded_len(),
        )
    }

    /// Decode from BER.
    pub fn decode(decoder: &mut Decoder) -> Result<Self> {
        let mut seq = decoder.read_sequence()?;
        let context_engine_id = seq.read_octet_string()?;
        let context_name = seq.read_octet_string()?;
        let pdu = Pdu::decode(&mut seq)?;

        Ok(Self {
            context_engine_id,
            context_name,
            pdu,
        })
    }
}

/// The PDU shapes a message processing model can be handed.
#[derive(Debug, Clone, PartialEq)]
pub enum MessagePdu {
    /// Plain PDU, as carried by community-based versions.
    Plain(Pdu),
    /// Context-scoped PDU, as carried by SNMPv3.
    Scoped(ScopedPdu),
}

impl MessagePdu {
    /// The inner PDU regardless of scoping.
    pub fn pdu(&self) -> &Pdu {
        match self {
            Self::Plain(pdu) => pdu,
            Self::Scoped(scoped) => &scoped.pdu,
        }
    }

    /// Consume and return the inner PDU.
    pub fn into_pdu(self) -> Pdu {
        match self {
            Self::Plain(pdu) => pdu,
            Self::Scoped(scoped) => scoped.pdu,
        }
    }

    /// Whether this carries context fields.
    pub fn is_scoped(&self) -> bool {
        matches!(self, Self::Scoped(_))
    }

    /// Request ID of the inner PDU.
    pub fn request_id(&self) -> i32 {
        self.pdu().request_id
    }
}

impl From<Pdu> for MessagePdu {
    fn from(pdu: Pdu) -> Self {
        Self::Plain(pdu)
    }
}

impl From<ScopedPdu> for MessagePdu {
    fn from(scoped: ScopedPdu) -> Self {
        Self::Scoped(scoped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oid;

    #[test]
    fn test_scoped_pdu_roundtrip() {
        let scoped = ScopedPdu::new(
            Bytes::from_static(&[0x80, 0x00, 0x1f, 0x88, 0x04]),
            Bytes::from_static(b"printer"),
            Pdu::get_request(5, &[oid!(1, 3, 6, 1, 2, 1, 43, 11, 1, 1, 9, 1, 1)]),
        );

        let mut buf = EncodeBuf::new();
        scoped.encode(&mut buf);
        let bytes = buf.finish();
        assert_eq!(bytes.len(), scoped.ber_encoded_len());

        let mut decoder = Decoder::new(bytes);
        assert_eq!(ScopedPdu::decode(&mut decoder).unwrap(), scoped);
    }

    #[test]
    fn test_message_pdu_accessors() {
        let pdu = Pdu::get_request(11, &[oid!(1, 3, 6, 1)]);
        let plain = MessagePdu::from(pdu.clone());
        assert!(!plain.is_scoped());
        assert_eq!(plain.request_id(), 11);

        let scoped = MessagePdu::from(ScopedPdu::with_empty_context(pdu.clone()));
        assert!(scoped.is_scoped());
        assert_eq!(scoped.pdu(), &pdu);
        assert_eq!(scoped.into_pdu(), pdu);
    }
}
