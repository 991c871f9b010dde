//! Message dispatcher.
//!
//! Routes datagrams between the application and the registered
//! [`MessageProcessingModel`]s:
//!
//! - outbound messages go to the model named by the caller, and requests
//!   expecting a response are recorded as outstanding under their
//!   [`PduHandle`];
//! - inbound datagrams are routed by peeking the version field, and
//!   responses are matched against the outstanding table.
//!
//! The dispatcher also keeps the two SNMP MP statistics counters that apply
//! before a model is chosen: `snmpInBadVersions` and `snmpInASNParseErrs`.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use snmp_mp::dispatch::{Incoming, MessageDispatcher};
//! use snmp_mp::mp::{MpModelId, OutgoingParams};
//! use snmp_mp::security::SecurityModels;
//! use snmp_mp::{Pdu, Version, oid};
//!
//! # fn main() -> snmp_mp::Result<()> {
//! let dispatcher = MessageDispatcher::builder()
//!     .community(Arc::new(SecurityModels::community()))
//!     .build();
//! let agent = "192.0.2.1:161".parse().unwrap();
//!
//! let handle = dispatcher.next_handle();
//! let pdu = Pdu::get_request(handle.transaction_id(), &[oid!(1, 3, 6, 1, 2, 1, 1, 3, 0)]);
//! let params = OutgoingParams::community(agent, Version::V2c, "public").with_handle(handle);
//! let _request = dispatcher.prepare_outgoing(MpModelId::V2c, &params, &pdu.clone().into())?;
//! assert_eq!(dispatcher.outstanding_len(), 1);
//!
//! // The agent's answer, encoded the same way.
//! let reply = dispatcher.prepare_outgoing(
//!     MpModelId::V2c,
//!     &params.clone().expect_response(false),
//!     &pdu.to_response().into(),
//! )?;
//! match dispatcher.process_incoming(reply, agent)? {
//!     Incoming::Response { request, .. } => assert_eq!(request.handle, handle),
//!     Incoming::Request(_) => unreachable!(),
//! }
//! assert_eq!(dispatcher.outstanding_len(), 0);
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicI32, AtomicU32, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bytes::Bytes;

use crate::error::{Error, Result};
use crate::mp::{
    CommunityMp, DataElements, MessageProcessingModel, MpModelId, OutgoingParams, PduHandle,
    ResponseParams, StateReference, StatusInformation, peek_version,
};
use crate::oid::Oid;
use crate::pdu::MessagePdu;
use crate::security::SecurityModels;

/// snmpInBadVersions.0 (SNMPv2-MIB).
pub const SNMP_IN_BAD_VERSIONS: &[u32] = &[1, 3, 6, 1, 2, 1, 11, 3, 0];

/// snmpInASNParseErrs.0 (SNMPv2-MIB).
pub const SNMP_IN_ASN_PARSE_ERRS: &[u32] = &[1, 3, 6, 1, 2, 1, 11, 6, 0];

/// A request waiting for its response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingRequest {
    /// Correlation handle.
    pub handle: PduHandle,
    /// Where the request was sent.
    pub destination: SocketAddr,
    /// Model that encoded the request.
    pub model: MpModelId,
}

/// Result of processing an inbound datagram.
#[derive(Debug)]
pub enum Incoming {
    /// A request or notification for the local application to answer.
    Request(DataElements),
    /// A response matched to an outstanding request, which is now removed.
    Response {
        elements: DataElements,
        request: PendingRequest,
    },
}

/// Routes messages between the application and message processing models.
///
/// Safe to share between threads.
pub struct MessageDispatcher {
    models: Vec<Arc<dyn MessageProcessingModel>>,
    outstanding: Mutex<HashMap<PduHandle, PendingRequest>>,
    next_transaction_id: AtomicI32,
    in_bad_versions: AtomicU32,
    in_asn_parse_errs: AtomicU32,
}

impl MessageDispatcher {
    /// Create a builder.
    pub fn builder() -> MessageDispatcherBuilder {
        MessageDispatcherBuilder::new()
    }

    /// Registered model for an identifier.
    pub fn model(&self, id: MpModelId) -> Option<&Arc<dyn MessageProcessingModel>> {
        self.models.iter().find(|m| m.id() == id)
    }

    fn require_model(&self, id: MpModelId) -> Result<&Arc<dyn MessageProcessingModel>> {
        self.model(id).ok_or(Error::UnknownModel { model: id })
    }

    fn outstanding(&self) -> MutexGuard<'_, HashMap<PduHandle, PendingRequest>> {
        self.outstanding
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Allocate a handle not used by any outstanding request.
    ///
    /// Transaction IDs increase monotonically and wrap within `1..=i32::MAX`.
    pub fn next_handle(&self) -> PduHandle {
        loop {
            let id = self
                .next_transaction_id
                .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |id| {
                    Some(if id >= i32::MAX { 1 } else { id + 1 })
                })
                .unwrap_or_else(|id| id);
            let handle = PduHandle::new(id);
            if !self.outstanding().contains_key(&handle) {
                return handle;
            }
            tracing::trace!(target: "snmp_mp::dispatch", { snmp.handle = %handle }, "skipping handle still outstanding");
        }
    }

    /// Encode an outgoing message with the given model.
    ///
    /// When `params.expect_response` is set the request is recorded as
    /// outstanding under the PDU's request-id, which is what the response
    /// will carry. A handle that is already outstanding fails with
    /// [`Error::DuplicateHandle`]. A `params.handle` that differs from the
    /// request-id can never be matched and fails with
    /// [`Error::ProtocolMisuse`].
    pub fn prepare_outgoing(
        &self,
        model: MpModelId,
        params: &OutgoingParams,
        pdu: &MessagePdu,
    ) -> Result<Bytes> {
        let mp = self.require_model(model)?;

        let handle = PduHandle::new(pdu.request_id());
        if let Some(given) = params.handle
            && given != handle
        {
            tracing::error!(target: "snmp_mp::dispatch", { snmp.handle = %given, snmp.request_id = pdu.request_id() }, "handle does not match PDU request-id");
            return Err(Error::ProtocolMisuse {
                reason: "request handle must equal the PDU request-id",
            });
        }

        if !params.expect_response {
            return mp.prepare_outgoing_message(params, pdu);
        }

        if self.outstanding().contains_key(&handle) {
            return Err(Error::DuplicateHandle { handle });
        }

        let bytes = mp.prepare_outgoing_message(params, pdu)?;

        match self.outstanding().entry(handle) {
            Entry::Occupied(_) => Err(Error::DuplicateHandle { handle }),
            Entry::Vacant(slot) => {
                slot.insert(PendingRequest {
                    handle,
                    destination: params.destination,
                    model,
                });
                tracing::trace!(target: "snmp_mp::dispatch", { snmp.handle = %handle, snmp.destination = %params.destination }, "request outstanding");
                Ok(bytes)
            }
        }
    }

    /// Encode a response with the model that decoded the request, then
    /// release the request's state.
    pub fn prepare_response(
        &self,
        params: &ResponseParams,
        pdu: &MessagePdu,
        state: StateReference,
    ) -> Result<Bytes> {
        let mp = self.require_model(state.model())?;
        let handle = state.handle();
        let result = mp.prepare_response_message(params, pdu, state);
        mp.release_state_reference(&handle);
        result
    }

    /// Decode an inbound datagram with the model for its wire version,
    /// without correlating it against outstanding requests.
    ///
    /// Keeps `snmpInBadVersions` and `snmpInASNParseErrs` up to date.
    pub fn prepare_data_elements(&self, data: Bytes, source: SocketAddr) -> Result<DataElements> {
        let version = peek_version(&data).inspect_err(|e| {
            let count = self.in_asn_parse_errs.fetch_add(1, Ordering::Relaxed) + 1;
            tracing::debug!(target: "snmp_mp::dispatch", { snmp.source = %source, error = %e, snmp_in_asn_parse_errs = count }, "unparseable message header");
        })?;

        let mp = self.model_for_version(version, source)?;
        mp.prepare_data_elements(data, source).inspect_err(|e| {
            if matches!(e, Error::MalformedMessage { .. }) {
                self.in_asn_parse_errs.fetch_add(1, Ordering::Relaxed);
            }
        })
    }

    fn model_for_version(
        &self,
        version: i32,
        source: SocketAddr,
    ) -> Result<&Arc<dyn MessageProcessingModel>> {
        self.models
            .iter()
            .find(|m| m.is_version_supported(version))
            .ok_or_else(|| {
                let value = self.in_bad_versions.fetch_add(1, Ordering::Relaxed) + 1;
                tracing::warn!(target: "snmp_mp::dispatch", { snmp.source = %source, snmp.version = version }, "no message processing model for version");
                Error::UnsupportedVersion {
                    version,
                    status: StatusInformation::Failure {
                        counter: Oid::from_slice(SNMP_IN_BAD_VERSIONS),
                        value,
                    },
                }
            })
    }

    /// Decode an inbound datagram and route it.
    ///
    /// Responses are matched against the outstanding table; a response with
    /// no outstanding request fails with [`Error::UnknownHandle`].
    pub fn process_incoming(&self, data: Bytes, source: SocketAddr) -> Result<Incoming> {
        let elements = self.prepare_data_elements(data, source)?;

        if !elements.pdu.pdu().is_response() {
            return Ok(Incoming::Request(elements));
        }

        let handle = elements.handle;
        if let Some(mp) = self.model(elements.model) {
            mp.release_state_reference(&handle);
        }
        let request = self.outstanding().remove(&handle);
        match request {
            Some(request) => {
                if request.destination != source {
                    tracing::debug!(target: "snmp_mp::dispatch", { snmp.handle = %handle, snmp.target = %request.destination, snmp.source = %source }, "response source differs from request target");
                }
                Ok(Incoming::Response { elements, request })
            }
            None => {
                tracing::debug!(target: "snmp_mp::dispatch", { snmp.handle = %handle, snmp.source = %source }, "response for unknown handle");
                Err(Error::UnknownHandle { handle })
            }
        }
    }

    /// Stop waiting for a response, e.g. after a timeout.
    pub fn cancel(&self, handle: &PduHandle) -> Option<PendingRequest> {
        let removed = self.outstanding().remove(handle);
        if let Some(request) = &removed
            && let Some(mp) = self.model(request.model)
        {
            mp.release_state_reference(handle);
        }
        removed
    }

    /// Number of outstanding requests.
    pub fn outstanding_len(&self) -> usize {
        self.outstanding().len()
    }

    /// Current value of snmpInBadVersions.
    pub fn in_bad_versions(&self) -> u32 {
        self.in_bad_versions.load(Ordering::Relaxed)
    }

    /// Current value of snmpInASNParseErrs.
    pub fn in_asn_parse_errs(&self) -> u32 {
        self.in_asn_parse_errs.load(Ordering::Relaxed)
    }
}

/// Builder for [`MessageDispatcher`].
pub struct MessageDispatcherBuilder {
    models: Vec<Arc<dyn MessageProcessingModel>>,
    initial_transaction_id: Option<i32>,
}

impl MessageDispatcherBuilder {
    /// Create a builder with no models.
    pub fn new() -> Self {
        Self {
            models: Vec::new(),
            initial_transaction_id: None,
        }
    }

    /// Register a model, replacing any earlier one with the same ID.
    pub fn model(mut self, model: Arc<dyn MessageProcessingModel>) -> Self {
        self.models.retain(|m| m.id() != model.id());
        self.models.push(model);
        self
    }

    /// Register SNMPv1 and SNMPv2c community models sharing `registry`.
    pub fn community(self, registry: Arc<SecurityModels>) -> Self {
        self.model(Arc::new(CommunityMp::v1(registry.clone())))
            .model(Arc::new(CommunityMp::v2c(registry)))
    }

    /// First transaction ID handed out by
    /// [`next_handle`](MessageDispatcher::next_handle).
    ///
    /// Values below 1 are raised to 1. Defaults to a time-derived value so
    /// that a quick restart does not reuse the previous run's IDs.
    pub fn initial_transaction_id(mut self, id: i32) -> Self {
        self.initial_transaction_id = Some(id);
        self
    }

    /// Build the dispatcher.
    pub fn build(self) -> MessageDispatcher {
        let initial = self
            .initial_transaction_id
            .unwrap_or_else(time_seeded_transaction_id)
            .max(1);

        tracing::debug!(
            target: "snmp_mp::dispatch",
            { models = self.models.len(), snmp.initial_transaction_id = initial },
            "message dispatcher built"
        );

        MessageDispatcher {
            models: self.models,
            outstanding: Mutex::new(HashMap::new()),
            next_transaction_id: AtomicI32::new(initial),
            in_bad_versions: AtomicU32::new(0),
            in_asn_parse_errs: AtomicU32::new(0),
        }
    }
}

impl Default for MessageDispatcherBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn time_seeded_transaction_id() -> i32 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as i32)
        .unwrap_or(1)
        .wrapping_abs()
}
