#![no_main]

use bytes::Bytes;
use libfuzzer_sys::fuzz_target;

use snmp_mp::ber::Decoder;
use snmp_mp::pdu::{Pdu, ScopedPdu};
use snmp_mp::value::Value;
use snmp_mp::varbind::{VarBind, decode_varbind_list};

fuzz_target!(|data: &[u8]| {
    let bytes = Bytes::copy_from_slice(data);

    // BER primitives
    let mut decoder = Decoder::new(bytes.clone());
    let _ = decoder.read_integer();

    let mut decoder = Decoder::new(bytes.clone());
    let _ = decoder.read_octet_string();

    let mut decoder = Decoder::new(bytes.clone());
    let _ = decoder.read_oid();

    let mut decoder = Decoder::new(bytes.clone());
    let _ = decoder.read_sequence();

    // SMI values and bindings
    let _ = Value::decode(&mut Decoder::new(bytes.clone()));
    let _ = VarBind::decode(&mut Decoder::new(bytes.clone()));
    let _ = decode_varbind_list(&mut Decoder::new(bytes.clone()));

    // PDUs, decoded ones must re-encode to their declared length
    if let Ok(pdu) = Pdu::decode(&mut Decoder::new(bytes.clone())) {
        let mut buf = snmp_mp::ber::EncodeBuf::new();
        pdu.encode(&mut buf);
        assert_eq!(buf.len(), pdu.ber_encoded_len());
    }
    let _ = ScopedPdu::decode(&mut Decoder::new(bytes));
});
