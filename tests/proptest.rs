//! Property-based tests for snmp-mp.
//!
//! Message-level tests run every generated PDU through both community
//! engines. Codec-level tests check that the length pre-computation agrees
//! with what the encoder actually writes.

mod common;

use bytes::Bytes;
use common::*;
use proptest::prelude::*;
use snmp_mp::ber::{Decoder, EncodeBuf};
use snmp_mp::error::Error;
use snmp_mp::mp::{MessageProcessingModel, OutgoingParams};
use snmp_mp::oid::Oid;
use snmp_mp::pdu::{MessagePdu, Pdu, PduType};
use snmp_mp::value::Value;
use snmp_mp::varbind::VarBind;
use snmp_mp::{CommunityMp, Version};

// =============================================================================
// Arbitrary Implementations
// =============================================================================

/// Valid OIDs with at least two arcs, which round-trip through BER.
fn arb_oid() -> impl Strategy<Value = Oid> {
    (0u32..=2, prop::collection::vec(any::<u32>(), 1..=19)).prop_filter_map(
        "valid OID",
        |(arc1, rest)| {
            let arc2 = if arc1 < 2 {
                rest[0] % 40
            } else {
                rest[0] % (u32::MAX - 80)
            };

            let mut arcs = vec![arc1, arc2];
            arcs.extend_from_slice(&rest[1..]);

            let oid = Oid::from_slice(&arcs);
            oid.validate().is_ok().then_some(oid)
        },
    )
}

fn arb_bytes() -> impl Strategy<Value = Bytes> {
    prop::collection::vec(any::<u8>(), 0..=256).prop_map(Bytes::from)
}

/// Values SNMPv1 can carry.
fn arb_v1_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i32>().prop_map(Value::Integer),
        arb_bytes().prop_map(Value::OctetString),
        Just(Value::Null),
        arb_oid().prop_map(Value::ObjectIdentifier),
        any::<[u8; 4]>().prop_map(Value::IpAddress),
        any::<u32>().prop_map(Value::Counter32),
        any::<u32>().prop_map(Value::Gauge32),
        any::<u32>().prop_map(Value::TimeTicks),
        arb_bytes().prop_map(Value::Opaque),
    ]
}

fn arb_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i32>().prop_map(Value::Integer),
        arb_bytes().prop_map(Value::OctetString),
        Just(Value::Null),
        arb_oid().prop_map(Value::ObjectIdentifier),
        any::<[u8; 4]>().prop_map(Value::IpAddress),
        any::<u32>().prop_map(Value::Counter32),
        any::<u32>().prop_map(Value::Gauge32),
        any::<u32>().prop_map(Value::TimeTicks),
        arb_bytes().prop_map(Value::Opaque),
        any::<u64>().prop_map(Value::Counter64),
        Just(Value::NoSuchObject),
        Just(Value::NoSuchInstance),
        Just(Value::EndOfMibView),
    ]
}

fn arb_varbinds() -> impl Strategy<Value = Vec<VarBind>> {
    prop::collection::vec(
        (arb_oid(), arb_value()).prop_map(|(oid, value)| VarBind::new(oid, value)),
        0..=10,
    )
}

fn arb_v1_varbinds() -> impl Strategy<Value = Vec<VarBind>> {
    prop::collection::vec(
        (arb_oid(), arb_v1_value()).prop_map(|(oid, value)| VarBind::new(oid, value)),
        0..=10,
    )
}

fn arb_pdu_type() -> impl Strategy<Value = PduType> {
    prop_oneof![
        Just(PduType::GetRequest),
        Just(PduType::GetNextRequest),
        Just(PduType::Response),
        Just(PduType::SetRequest),
        Just(PduType::GetBulkRequest),
        Just(PduType::InformRequest),
        Just(PduType::TrapV2),
        Just(PduType::Report),
    ]
}

fn arb_v1_pdu_type() -> impl Strategy<Value = PduType> {
    prop_oneof![
        Just(PduType::GetRequest),
        Just(PduType::GetNextRequest),
        Just(PduType::Response),
        Just(PduType::SetRequest),
    ]
}

fn arb_pdu() -> impl Strategy<Value = Pdu> {
    build_pdu(arb_pdu_type(), arb_varbinds())
}

/// PDUs built only from SNMPv1 types and values.
fn arb_v1_pdu() -> impl Strategy<Value = Pdu> {
    build_pdu(arb_v1_pdu_type(), arb_v1_varbinds())
}

fn build_pdu(
    pdu_type: impl Strategy<Value = PduType>,
    varbinds: impl Strategy<Value = Vec<VarBind>>,
) -> impl Strategy<Value = Pdu> {
    (pdu_type, any::<i32>(), any::<i32>(), any::<i32>(), varbinds)
        .prop_map(
            |(pdu_type, request_id, error_status, error_index, varbinds)| Pdu {
                pdu_type,
                request_id,
                error_status,
                error_index,
                varbinds,
            },
        )
}

/// An engine with a PDU it accepts: v1 gets v1 shapes, v2c gets anything.
fn arb_exchange() -> impl Strategy<Value = (CommunityMp, Version, Pdu)> {
    prop_oneof![
        arb_v1_pdu().prop_map(|pdu| (v1(), Version::V1, pdu)),
        arb_pdu().prop_map(|pdu| (v2c(), Version::V2c, pdu)),
    ]
}

fn arb_community() -> impl Strategy<Value = Bytes> {
    prop::collection::vec(any::<u8>(), 0..=64).prop_map(Bytes::from)
}

// =============================================================================
// Message round-trips
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn message_round_trip(
        (mp, version, pdu) in arb_exchange(),
        community in arb_community(),
    ) {
        let params = OutgoingParams::community(agent_addr(), version, community.clone());
        let bytes = mp.prepare_outgoing_message(&params, &pdu.clone().into()).unwrap();
        let elements = mp.prepare_data_elements(bytes, manager_addr()).unwrap();

        prop_assert_eq!(elements.pdu, MessagePdu::Plain(pdu.clone()));
        prop_assert_eq!(elements.security_name, community);
        prop_assert_eq!(elements.version, version);
        prop_assert_eq!(elements.handle.transaction_id(), pdu.request_id);
        prop_assert_eq!(elements.state_reference.address(), manager_addr());
    }

    #[test]
    fn response_equals_outgoing_to_origin((mp, version, pdu) in arb_exchange()) {
        let params = community_params(version, COMMUNITY_RO);
        let bytes = mp.prepare_outgoing_message(&params, &pdu.clone().into()).unwrap();
        let elements = mp.prepare_data_elements(bytes, manager_addr()).unwrap();

        let reply: MessagePdu = pdu.to_response().into();
        let response_params = elements.response_params();
        let direct = mp.prepare_outgoing_message(
            &OutgoingParams {
                destination: manager_addr(),
                max_message_size: response_params.max_message_size,
                version: response_params.version,
                security_model: response_params.security_model,
                security_name: response_params.security_name.clone(),
                security_level: response_params.security_level,
                expect_response: false,
                handle: Some(elements.handle),
            },
            &reply,
        );
        let via_state = mp.prepare_response_message(&response_params, &reply, elements.state_reference);

        prop_assert_eq!(via_state.unwrap(), direct.unwrap());
    }

    #[test]
    fn any_truncation_is_rejected(
        (mp, version, pdu) in arb_exchange(),
        cut in any::<prop::sample::Index>(),
    ) {
        let params = community_params(version, COMMUNITY_RO);
        let bytes = mp.prepare_outgoing_message(&params, &pdu.into()).unwrap();
        let len = cut.index(bytes.len());
        let result = mp.prepare_data_elements(bytes.slice(..len), manager_addr());
        prop_assert!(
            matches!(result, Err(Error::MalformedMessage { .. })),
            "truncation to {} bytes not rejected",
            len
        );
    }

    #[test]
    fn arbitrary_bytes_never_panic(data in prop::collection::vec(any::<u8>(), 0..=512)) {
        let d = dispatcher();
        let _ = d.process_incoming(Bytes::from(data), manager_addr());
    }
}

// =============================================================================
// Length pre-computation
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    #[test]
    fn value_encoded_len_matches(value in arb_value()) {
        let mut buf = EncodeBuf::new();
        value.encode(&mut buf);
        prop_assert_eq!(value.ber_encoded_len(), buf.len());

        let bytes = buf.finish();
        let decoded = Value::decode(&mut Decoder::new(bytes)).unwrap();
        prop_assert_eq!(decoded, value);
    }

    #[test]
    fn pdu_encoded_len_matches(pdu in arb_pdu()) {
        let mut buf = EncodeBuf::new();
        pdu.encode(&mut buf);
        prop_assert_eq!(pdu.ber_encoded_len(), buf.len());
    }

    #[test]
    fn message_len_matches_buffer(pdu in arb_pdu(), community in arb_community()) {
        let mp = v2c();
        let params = OutgoingParams::community(agent_addr(), Version::V2c, community.clone());
        let bytes = mp.prepare_outgoing_message(&params, &pdu.clone().into()).unwrap();

        let content = 3 + tlv(community.len()) + pdu.ber_encoded_len();
        prop_assert_eq!(bytes.len(), tlv(content));
    }
}

fn tlv(content: usize) -> usize {
    snmp_mp::ber::tlv_len(content)
}
