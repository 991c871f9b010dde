//! Prelude module for convenient imports.
//!
//! # Usage
//!
//! ```rust
//! use snmp_mp::prelude::*;
//! ```
//!
//! This imports:
//! - Core types: [`Oid`], [`Value`], [`VarBind`], [`Pdu`], [`MessagePdu`]
//! - Message processing: [`MessageProcessingModel`], [`CommunityMp`],
//!   [`MessageDispatcher`], [`OutgoingParams`]
//! - Security: [`SecurityModels`], [`SecurityLevel`]
//! - Error handling: [`Error`], [`Result`]
//! - The [`oid!`] macro for compile-time OID construction

pub use crate::dispatch::MessageDispatcher;
pub use crate::error::{Error, Result};
pub use crate::mp::{CommunityMp, MessageProcessingModel, MpModelId, OutgoingParams, PduHandle};
pub use crate::oid::Oid;
pub use crate::pdu::{MessagePdu, Pdu};
pub use crate::security::{SecurityLevel, SecurityModels};
pub use crate::value::Value;
pub use crate::varbind::VarBind;
pub use crate::version::Version;

#[doc(no_inline)]
pub use crate::oid;
