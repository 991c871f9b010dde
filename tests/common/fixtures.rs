//! Common test fixtures and constants.

use std::net::SocketAddr;
use std::sync::Arc;

use snmp_mp::mp::{CommunityMp, OutgoingParams};
use snmp_mp::security::SecurityModels;
use snmp_mp::{MessageDispatcher, Oid, Pdu, Version, oid};

// =============================================================================
// Standard system MIB OIDs (1.3.6.1.2.1.1.*)
// =============================================================================

pub fn sys_descr() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 1, 1, 0)
}
pub fn sys_uptime() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 1, 3, 0)
}
pub fn sys_name() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 1, 5, 0)
}

// =============================================================================
// Communities and addresses
// =============================================================================

/// Read-only community
pub const COMMUNITY_RO: &[u8] = b"public";
/// Read-write community
pub const COMMUNITY_RW: &[u8] = b"private";

pub fn agent_addr() -> SocketAddr {
    "192.0.2.1:161".parse().unwrap()
}

pub fn manager_addr() -> SocketAddr {
    "198.51.100.7:40161".parse().unwrap()
}

// =============================================================================
// Engines
// =============================================================================

pub fn registry() -> Arc<SecurityModels> {
    Arc::new(SecurityModels::community())
}

pub fn v1() -> CommunityMp {
    CommunityMp::v1(registry())
}

pub fn v2c() -> CommunityMp {
    CommunityMp::v2c(registry())
}

pub fn dispatcher() -> MessageDispatcher {
    MessageDispatcher::builder()
        .community(registry())
        .initial_transaction_id(1000)
        .build()
}

pub fn community_params(version: Version, community: &'static [u8]) -> OutgoingParams {
    OutgoingParams::community(agent_addr(), version, community)
}

/// GetRequest for sysDescr.0
pub fn sys_descr_get(request_id: i32) -> Pdu {
    Pdu::get_request(request_id, &[sys_descr()])
}

/// v2c GetRequest, community "public", request-id 42, sysDescr.0 = NULL.
pub const V2C_GET_SYS_DESCR: &[u8] = &[
    0x30, 0x26, // message SEQUENCE
    0x02, 0x01, 0x01, // version: v2c
    0x04, 0x06, b'p', b'u', b'b', b'l', b'i', b'c', // community
    0xA0, 0x19, // GetRequest
    0x02, 0x01, 0x2A, // request-id 42
    0x02, 0x01, 0x00, // error-status
    0x02, 0x01, 0x00, // error-index
    0x30, 0x0E, 0x30, 0x0C, // varbind list, varbind
    0x06, 0x08, 0x2B, 0x06, 0x01, 0x02, 0x01, 0x01, 0x01, 0x00, // sysDescr.0
    0x05, 0x00, // NULL
];

// =============================================================================
// Logging
// =============================================================================

/// Route library logs to the test harness. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("snmp_mp=debug")),
        )
        .with_test_writer()
        .try_init();
}
