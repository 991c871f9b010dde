//! BER (Basic Encoding Rules) codec for SNMP.
//!
//! This module provides encoding and decoding of BER-encoded data as used in SNMP.
//! Decoding is permissive about non-minimal encodings, strict about
//! definite lengths and truncation.

mod decode;
mod encode;
mod length;
pub mod tag;

pub use decode::*;
pub use encode::*;
pub use length::*;
pub use tag::*;
