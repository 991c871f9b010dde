//! Per-exchange correlation state.

use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;

use super::MpModelId;
use crate::error::ErrorStatus;
use crate::oid::Oid;
use crate::security::SecurityModel;
use crate::util::HexBytes;

/// Correlation token for one outstanding exchange.
///
/// Equality and hashing are by transaction ID only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PduHandle {
    transaction_id: i32,
}

impl PduHandle {
    /// Wrap a transaction ID.
    pub const fn new(transaction_id: i32) -> Self {
        Self { transaction_id }
    }

    /// The transaction ID. For community-based versions this is the PDU request-id.
    pub const fn transaction_id(&self) -> i32 {
        self.transaction_id
    }
}

impl fmt::Display for PduHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.transaction_id)
    }
}

impl From<i32> for PduHandle {
    fn from(transaction_id: i32) -> Self {
        Self::new(transaction_id)
    }
}

/// Outcome of processing an inbound message.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StatusInformation {
    /// Processed successfully.
    #[default]
    Success,
    /// Processing failed; `counter` names the statistics object that was
    /// incremented and `value` is its new value.
    Failure { counter: Oid, value: u32 },
}

impl StatusInformation {
    /// Whether this is [`StatusInformation::Success`].
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

/// Everything needed to answer one inbound request.
///
/// Produced by [`prepare_data_elements`](super::MessageProcessingModel::prepare_data_elements)
/// and consumed by value when the response is built, so it cannot be used
/// twice. Not `Clone` for the same reason.
pub struct StateReference {
    handle: PduHandle,
    address: SocketAddr,
    model: MpModelId,
    security_model: Arc<dyn SecurityModel>,
    security_name: Bytes,
    status: ErrorStatus,
}

impl StateReference {
    pub(crate) fn new(
        handle: PduHandle,
        address: SocketAddr,
        model: MpModelId,
        security_model: Arc<dyn SecurityModel>,
        security_name: Bytes,
    ) -> Self {
        Self {
            handle,
            address,
            model,
            security_model,
            security_name,
            status: ErrorStatus::NoError,
        }
    }

    /// Handle of the request this state answers.
    pub fn handle(&self) -> PduHandle {
        self.handle
    }

    /// Transport address the request came from. Responses always go back here.
    pub fn address(&self) -> SocketAddr {
        self.address
    }

    /// Message processing model that decoded the request.
    pub fn model(&self) -> MpModelId {
        self.model
    }

    /// Security model handler resolved for the request.
    pub fn security_model(&self) -> &Arc<dyn SecurityModel> {
        &self.security_model
    }

    /// Security name (the community, for community-based versions).
    pub fn security_name(&self) -> &Bytes {
        &self.security_name
    }

    /// Status recorded while processing the request.
    pub fn status(&self) -> ErrorStatus {
        self.status
    }
}

impl fmt::Debug for StateReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateReference")
            .field("handle", &self.handle)
            .field("address", &self.address)
            .field("model", &self.model)
            .field("security_model", &self.security_model.id())
            .field("security_name", &HexBytes(&self.security_name))
            .field("status", &self.status)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::security::{CommunitySecurityModel, SecurityModelId};
    use std::collections::HashSet;

    #[test]
    fn test_handle_equality_by_transaction_id() {
        let mut set = HashSet::new();
        assert!(set.insert(PduHandle::new(42)));
        assert!(!set.insert(PduHandle::from(42)));
        assert!(set.insert(PduHandle::new(43)));
        assert_eq!(PduHandle::new(7).to_string(), "#7");
    }

    #[test]
    fn test_state_reference_accessors() {
        let addr: SocketAddr = "192.0.2.10:161".parse().unwrap();
        let state = StateReference::new(
            PduHandle::new(5),
            addr,
            MpModelId::V2c,
            Arc::new(CommunitySecurityModel::v2c()),
            Bytes::from_static(b"public"),
        );
        assert_eq!(state.handle().transaction_id(), 5);
        assert_eq!(state.address(), addr);
        assert_eq!(state.model(), MpModelId::V2c);
        assert_eq!(state.security_model().id(), SecurityModelId::SNMPV2C);
        assert_eq!(&state.security_name()[..], b"public");
        assert_eq!(state.status(), ErrorStatus::NoError);
        assert!(format!("{:?}", state).contains("7075626c6963"));
    }

    #[test]
    fn test_status_information() {
        assert!(StatusInformation::default().is_success());
        let failure = StatusInformation::Failure {
            counter: crate::oid!(1, 3, 6, 1, 2, 1, 11, 3, 0),
            value: 1,
        };
        assert!(!failure.is_success());
    }
}
