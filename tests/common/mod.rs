//! Shared test utilities for snmp-mp integration tests.

// Not every test file uses every fixture
#![allow(dead_code)]
#![allow(unused_imports)]

mod fixtures;

pub use fixtures::*;
