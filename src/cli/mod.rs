//! CLI utilities for snmp-mp.
//!
//! Argument parsing, output formatting, and OID hint resolution for the
//! `asnmp-*` CLI tools.
//!
//! This module is only available with the `cli` feature.

pub mod args;
pub mod hints;
pub mod output;
