//! Message processing behaviour of the community-based engines.

mod common;

use bytes::Bytes;
use common::*;
use snmp_mp::error::{DecodeErrorKind, Error, MpStatus};
use snmp_mp::mp::{MessageProcessingModel, MpModelId, OutgoingParams, PduHandle, ResponseParams};
use snmp_mp::pdu::{MessagePdu, ScopedPdu};
use snmp_mp::security::{SecurityLevel, SecurityModelId, SecurityModels};
use snmp_mp::{CommunityMp, Pdu, PduType, Value, VarBind, Version};
use std::sync::Arc;

// =============================================================================
// Wire format
// =============================================================================

#[test]
fn v2c_get_sys_descr_exact_bytes() {
    init_tracing();
    let mp = v2c();
    let params = community_params(Version::V2c, COMMUNITY_RO);

    let bytes = mp
        .prepare_outgoing_message(&params, &sys_descr_get(42).into())
        .unwrap();

    assert_eq!(&bytes[..], V2C_GET_SYS_DESCR);
}

#[test]
fn v2c_get_sys_descr_decodes() {
    let mp = v2c();
    let elements = mp
        .prepare_data_elements(Bytes::from_static(V2C_GET_SYS_DESCR), manager_addr())
        .unwrap();

    assert_eq!(elements.model, MpModelId::V2c);
    assert_eq!(elements.version, Version::V2c);
    assert_eq!(elements.security_model, SecurityModelId::SNMPV2C);
    assert_eq!(elements.security_level, SecurityLevel::NoAuthNoPriv);
    assert_eq!(&elements.security_name[..], COMMUNITY_RO);
    assert_eq!(elements.handle, PduHandle::new(42));
    assert!(elements.status.is_success());

    let pdu = elements.pdu.pdu();
    assert_eq!(pdu.pdu_type, PduType::GetRequest);
    assert_eq!(pdu.varbinds, vec![VarBind::null(sys_descr())]);

    let state = &elements.state_reference;
    assert_eq!(state.address(), manager_addr());
    assert_eq!(state.handle(), PduHandle::new(42));
    assert_eq!(state.security_model().id(), SecurityModelId::SNMPV2C);
    assert_eq!(&state.security_name()[..], COMMUNITY_RO);
}

#[test]
fn v1_and_v2c_differ_only_in_version_byte() {
    let v1_bytes = v1()
        .prepare_outgoing_message(
            &community_params(Version::V1, COMMUNITY_RO),
            &sys_descr_get(42).into(),
        )
        .unwrap();

    assert_eq!(v1_bytes.len(), V2C_GET_SYS_DESCR.len());
    assert_eq!(v1_bytes[4], 0x00);
    assert_eq!(&v1_bytes[5..], &V2C_GET_SYS_DESCR[5..]);
}

#[test]
fn round_trip_preserves_pdu_and_community() {
    let pdu = Pdu::set_request(
        7,
        vec![
            VarBind::new(sys_name(), Value::from("printer-3f")),
            VarBind::new(sys_uptime(), Value::TimeTicks(123_456)),
        ],
    );
    for (mp, version) in [(v1(), Version::V1), (v2c(), Version::V2c)] {
        let params = community_params(version, COMMUNITY_RW);
        let bytes = mp.prepare_outgoing_message(&params, &pdu.clone().into()).unwrap();
        let elements = mp.prepare_data_elements(bytes, agent_addr()).unwrap();

        assert_eq!(elements.pdu, MessagePdu::Plain(pdu.clone()));
        assert_eq!(&elements.security_name[..], COMMUNITY_RW);
        assert_eq!(elements.version, version);
    }
}

#[test]
fn max_response_size_is_engine_maximum() {
    let mp = CommunityMp::v2c(registry()).max_message_size(1472);
    let elements = mp
        .prepare_data_elements(Bytes::from_static(V2C_GET_SYS_DESCR), manager_addr())
        .unwrap();
    assert_eq!(elements.max_response_size, 1472);
}

// =============================================================================
// Security policy
// =============================================================================

#[test]
fn unsupported_security_level_rejected() {
    let mp = v2c();
    for level in [SecurityLevel::AuthNoPriv, SecurityLevel::AuthPriv] {
        let mut params = community_params(Version::V2c, COMMUNITY_RO);
        params.security_level = level;

        let err = mp
            .prepare_outgoing_message(&params, &sys_descr_get(1).into())
            .unwrap_err();
        assert!(
            matches!(err, Error::UnsupportedSecurity { security_level, .. } if security_level == level)
        );
        assert!(err.is_status());
        assert_eq!(err.mp_status(), Some(MpStatus::UnsupportedSecurityModel));
    }
}

#[test]
fn foreign_security_model_rejected() {
    let mp = v2c();
    for model in [SecurityModelId::SNMPV1, SecurityModelId::USM, SecurityModelId(99)] {
        let mut params = community_params(Version::V2c, COMMUNITY_RO);
        params.security_model = model;

        let err = mp
            .prepare_outgoing_message(&params, &sys_descr_get(1).into())
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedSecurity { security_model, .. } if security_model == model));
    }
}

#[test]
fn unsupported_version_rejected_as_security() {
    let err = v1()
        .prepare_outgoing_message(
            &OutgoingParams {
                security_model: SecurityModelId::SNMPV1,
                ..community_params(Version::V2c, COMMUNITY_RO)
            },
            &sys_descr_get(1).into(),
        )
        .unwrap_err();
    assert!(matches!(
        err,
        Error::UnsupportedSecurity {
            version: Version::V2c,
            ..
        }
    ));
}

#[test]
fn scoped_pdu_is_protocol_misuse() {
    let scoped = MessagePdu::Scoped(ScopedPdu::with_empty_context(sys_descr_get(1)));
    for (mp, version) in [(v1(), Version::V1), (v2c(), Version::V2c)] {
        let err = mp
            .prepare_outgoing_message(&community_params(version, COMMUNITY_RO), &scoped)
            .unwrap_err();
        assert!(matches!(err, Error::ProtocolMisuse { .. }));
        assert!(!err.is_status());
        assert_eq!(err.mp_status(), None);
    }
}

#[test]
fn v1_rejects_v2_only_pdu_types() {
    let mp = v1();
    let params = community_params(Version::V1, COMMUNITY_RO);
    let pdus = [
        Pdu::get_bulk(1, 0, 10, vec![VarBind::null(sys_descr())]),
        Pdu {
            pdu_type: PduType::InformRequest,
            ..sys_descr_get(2)
        },
        Pdu {
            pdu_type: PduType::TrapV2,
            ..sys_descr_get(3)
        },
        Pdu {
            pdu_type: PduType::Report,
            ..sys_descr_get(4)
        },
    ];
    for pdu in pdus {
        let err = mp.prepare_outgoing_message(&params, &pdu.into()).unwrap_err();
        assert!(matches!(err, Error::ProtocolMisuse { .. }), "{:?}", err);
        assert_eq!(err.mp_status(), None);
    }
}

#[test]
fn v1_rejects_v2_only_values() {
    let mp = v1();
    let params = community_params(Version::V1, COMMUNITY_RO);
    for value in [
        Value::Counter64(5),
        Value::NoSuchObject,
        Value::NoSuchInstance,
        Value::EndOfMibView,
    ] {
        let pdu = Pdu::response(1, vec![VarBind::new(sys_uptime(), value)]);
        let err = mp.prepare_outgoing_message(&params, &pdu.into()).unwrap_err();
        assert!(matches!(err, Error::ProtocolMisuse { .. }), "{:?}", err);
    }

    // The same bindings are fine over v2c.
    let pdu = Pdu::response(1, vec![VarBind::new(sys_uptime(), Value::Counter64(5))]);
    assert!(v2c()
        .prepare_outgoing_message(&community_params(Version::V2c, COMMUNITY_RO), &pdu.into())
        .is_ok());
}

#[test]
fn v1_decode_rejects_v2_only_pdu_type() {
    let bulk = Pdu::get_bulk(1, 0, 10, vec![VarBind::null(sys_descr())]);
    let mut wire = v2c()
        .prepare_outgoing_message(&community_params(Version::V2c, COMMUNITY_RO), &bulk.into())
        .unwrap()
        .to_vec();
    // Same message with wire version 0.
    wire[4] = 0x00;

    let err = v1().prepare_data_elements(wire.into(), manager_addr()).unwrap_err();
    assert!(matches!(
        err,
        Error::MalformedMessage {
            offset: 13,
            kind: DecodeErrorKind::UnknownPduType(0xA5)
        }
    ));
}

#[test]
fn v1_trap_pdu_not_supported() {
    let mut wire = vec![0x30, 0x0D, 0x02, 0x01, 0x00, 0x04, 0x06];
    wire.extend_from_slice(COMMUNITY_RO);
    wire.extend_from_slice(&[0xA4, 0x00]);

    let err = v1().prepare_data_elements(wire.into(), manager_addr()).unwrap_err();
    assert!(matches!(
        err,
        Error::MalformedMessage {
            offset: 13,
            kind: DecodeErrorKind::UnknownPduType(0xA4)
        }
    ));
}

// =============================================================================
// Malformed input
// =============================================================================

#[test]
fn truncated_last_byte_is_malformed() {
    let truncated = Bytes::copy_from_slice(&V2C_GET_SYS_DESCR[..V2C_GET_SYS_DESCR.len() - 1]);
    let err = v2c()
        .prepare_data_elements(truncated, manager_addr())
        .unwrap_err();
    assert!(matches!(err, Error::MalformedMessage { .. }), "{:?}", err);
    assert_eq!(err.mp_status(), Some(MpStatus::ParseError));
}

#[test]
fn understated_sequence_length_is_mismatch() {
    let mut data = V2C_GET_SYS_DESCR.to_vec();
    data[1] = 0x25;

    let err = v2c()
        .prepare_data_elements(data.into(), manager_addr())
        .unwrap_err();
    assert!(matches!(
        err,
        Error::MalformedMessage {
            offset: 2,
            kind: DecodeErrorKind::SequenceLengthMismatch {
                declared: 0x25,
                consumed: 0x26
            }
        }
    ));
}

#[test]
fn overstated_sequence_length_is_mismatch() {
    let mut data = V2C_GET_SYS_DESCR.to_vec();
    data[1] = 0x27;
    data.push(0x00);

    let err = v2c()
        .prepare_data_elements(data.into(), manager_addr())
        .unwrap_err();
    assert!(matches!(
        err,
        Error::MalformedMessage {
            kind: DecodeErrorKind::SequenceLengthMismatch {
                declared: 0x27,
                consumed: 0x26
            },
            ..
        }
    ));
}

#[test]
fn non_sequence_header_rejected() {
    let mut data = V2C_GET_SYS_DESCR.to_vec();
    data[0] = 0x31;
    let err = v2c()
        .prepare_data_elements(data.into(), manager_addr())
        .unwrap_err();
    assert!(matches!(
        err,
        Error::MalformedMessage {
            offset: 0,
            kind: DecodeErrorKind::ExpectedSequence { actual: 0x31 }
        }
    ));
}

#[test]
fn v1_engine_rejects_v2c_datagram() {
    let err = v1()
        .prepare_data_elements(Bytes::from_static(V2C_GET_SYS_DESCR), manager_addr())
        .unwrap_err();
    assert!(matches!(
        err,
        Error::MalformedMessage {
            kind: DecodeErrorKind::UnknownVersion(1),
            ..
        }
    ));
}

#[test]
fn empty_registry_fails_decode() {
    let mp = CommunityMp::v2c(Arc::new(SecurityModels::builder().build()));
    let err = mp
        .prepare_data_elements(Bytes::from_static(V2C_GET_SYS_DESCR), manager_addr())
        .unwrap_err();
    assert!(matches!(
        err,
        Error::UnknownSecurityModel {
            model: SecurityModelId::SNMPV2C
        }
    ));
}

// =============================================================================
// Responses and state
// =============================================================================

#[test]
fn response_matches_outgoing_with_state_address_and_handle() {
    let mp = v2c();
    let elements = mp
        .prepare_data_elements(Bytes::from_static(V2C_GET_SYS_DESCR), manager_addr())
        .unwrap();

    let response = elements
        .pdu
        .pdu()
        .to_response();
    let response = Pdu {
        varbinds: vec![VarBind::new(sys_descr(), Value::from("Laser printer"))],
        ..response
    };
    let params = elements.response_params();
    let handle = elements.state_reference.handle();
    let address = elements.state_reference.address();

    let expected = mp
        .prepare_outgoing_message(
            &OutgoingParams {
                destination: address,
                max_message_size: params.max_message_size,
                version: params.version,
                security_model: params.security_model,
                security_name: params.security_name.clone(),
                security_level: params.security_level,
                expect_response: false,
                handle: Some(handle),
            },
            &response.clone().into(),
        )
        .unwrap();

    let actual = mp
        .prepare_response_message(&params, &response.into(), elements.state_reference)
        .unwrap();

    assert_eq!(actual, expected);
}

#[test]
fn response_size_limited_by_requester() {
    let mp = v2c();
    let elements = mp
        .prepare_data_elements(Bytes::from_static(V2C_GET_SYS_DESCR), manager_addr())
        .unwrap();

    let big = Pdu::response(42, vec![VarBind::new(sys_descr(), Value::from("x".repeat(600)))]);
    let params = ResponseParams {
        max_response_size: 484,
        ..elements.response_params()
    };
    let err = mp
        .prepare_response_message(&params, &big.into(), elements.state_reference)
        .unwrap_err();
    assert!(matches!(err, Error::MessageTooLarge { max: 484, .. }));
}

#[test]
fn release_state_reference_is_idempotent() {
    let mp = v2c();
    let handle = PduHandle::new(42);
    mp.release_state_reference(&handle);
    mp.release_state_reference(&handle);

    // Engine still works the same afterwards.
    let bytes = mp
        .prepare_outgoing_message(
            &community_params(Version::V2c, COMMUNITY_RO),
            &sys_descr_get(42).into(),
        )
        .unwrap();
    assert_eq!(&bytes[..], V2C_GET_SYS_DESCR);
}

#[test]
fn engines_shared_across_threads() {
    let mp: Arc<dyn MessageProcessingModel> = Arc::new(v2c());
    std::thread::scope(|s| {
        for t in 0..4 {
            let mp = Arc::clone(&mp);
            s.spawn(move || {
                for i in 0..100 {
                    let id = t * 1000 + i;
                    let bytes = mp
                        .prepare_outgoing_message(
                            &community_params(Version::V2c, COMMUNITY_RO),
                            &sys_descr_get(id).into(),
                        )
                        .unwrap();
                    let elements = mp.prepare_data_elements(bytes, agent_addr()).unwrap();
                    assert_eq!(elements.handle.transaction_id(), id);
                }
            });
        }
    });
}
