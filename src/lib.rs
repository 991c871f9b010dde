// The Error enum carries OIDs and socket addresses inline for diagnostics.
#![allow(clippy::result_large_err)]

//! # snmp-mp
//!
//! SNMP message processing for Rust.
//!
//! This crate sits between an SNMP application and its transport. It turns a
//! [`Pdu`] plus addressing and security parameters into a wire-exact
//! BER-encoded datagram, and decodes inbound datagrams back into a PDU
//! together with the state needed to answer them.
//!
//! ## Features
//!
//! - **Community-based engines**: SNMPv1 and SNMPv2c via [`CommunityMp`]
//! - **Pluggable security models**: [`SecurityModels`] registry injected at construction
//! - **Dispatch**: [`MessageDispatcher`] routes by wire version, allocates
//!   handles and tracks outstanding requests
//! - **Zero-copy decoding**: built on [`bytes::Bytes`]
//! - **Printer supplies**: merge Printer-MIB supply walks with [`supplies::Supplies`]
//!
//! ## Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use snmp_mp::{MessageDispatcher, MpModelId, OutgoingParams, Pdu, SecurityModels, Version, oid};
//! use snmp_mp::dispatch::Incoming;
//!
//! # fn main() -> snmp_mp::Result<()> {
//! let dispatcher = MessageDispatcher::builder()
//!     .community(Arc::new(SecurityModels::community()))
//!     .initial_transaction_id(100)
//!     .build();
//! let agent = "192.0.2.1:161".parse().unwrap();
//!
//! // Outbound: allocate a request-id and encode a GET.
//! let handle = dispatcher.next_handle();
//! let pdu = Pdu::get_request(handle.transaction_id(), &[oid!(1, 3, 6, 1, 2, 1, 1, 1, 0)]);
//! let params = OutgoingParams::community(agent, Version::V2c, "public");
//! let datagram = dispatcher.prepare_outgoing(MpModelId::V2c, &params, &pdu.into())?;
//!
//! // Inbound: the agent side decodes the same datagram as a request.
//! match dispatcher.process_incoming(datagram, "192.0.2.50:40000".parse().unwrap())? {
//!     Incoming::Request(elements) => assert_eq!(elements.pdu.request_id(), 100),
//!     Incoming::Response { .. } => unreachable!(),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Logging
//!
//! The library emits [`tracing`] events and never installs a subscriber.
//! Targets are `snmp_mp::ber`, `snmp_mp::mp`, `snmp_mp::dispatch` and
//! `snmp_mp::supplies`; fields use the `snmp.` prefix (`snmp.offset`,
//! `snmp.version`, `snmp.request_id`, `snmp.source`).
//!
//! ```bash
//! RUST_LOG=snmp_mp=debug cargo run --features cli --bin asnmp-decode -- 3026...
//! ```

pub mod ber;
pub mod dispatch;
pub mod error;
pub mod mp;
pub mod oid;
pub mod pdu;
pub mod prelude;
pub mod security;
pub mod supplies;
pub mod util;
pub mod value;
pub mod varbind;
pub mod version;

#[cfg(feature = "cli")]
pub mod cli;

// Re-exports for convenience
pub use dispatch::{MessageDispatcher, MessageDispatcherBuilder};
pub use error::{DecodeErrorKind, Error, ErrorStatus, MpStatus, OidErrorKind, Result};
pub use mp::{
    CommunityMp, DataElements, MessageProcessingModel, MpModelId, OutgoingParams, PduHandle,
    ResponseParams, StateReference, StatusInformation,
};
pub use oid::Oid;
pub use pdu::{MessagePdu, Pdu, PduType, ScopedPdu};
pub use security::{
    CommunitySecurityModel, SecurityLevel, SecurityModel, SecurityModelId, SecurityModels,
};
pub use value::Value;
pub use varbind::VarBind;
pub use version::Version;
