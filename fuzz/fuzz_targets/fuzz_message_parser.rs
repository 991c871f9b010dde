#![no_main]

use std::net::SocketAddr;
use std::sync::{Arc, OnceLock};

use bytes::Bytes;
use libfuzzer_sys::fuzz_target;

use snmp_mp::mp::{CommunityMp, MessageProcessingModel, peek_version};
use snmp_mp::security::SecurityModels;
use snmp_mp::MessageDispatcher;

fn dispatcher() -> &'static MessageDispatcher {
    static DISPATCHER: OnceLock<MessageDispatcher> = OnceLock::new();
    DISPATCHER.get_or_init(|| {
        MessageDispatcher::builder()
            .community(Arc::new(SecurityModels::community()))
            .build()
    })
}

fuzz_target!(|data: &[u8]| {
    let bytes = Bytes::copy_from_slice(data);
    let source = SocketAddr::from(([192, 0, 2, 1], 161));

    let _ = peek_version(&bytes);

    // Engines directly
    let registry = Arc::new(SecurityModels::community());
    let _ = CommunityMp::v1(registry.clone()).prepare_data_elements(bytes.clone(), source);
    let _ = CommunityMp::v2c(registry).prepare_data_elements(bytes.clone(), source);

    // Through the dispatcher, including response correlation
    let _ = dispatcher().process_incoming(bytes, source);
});
