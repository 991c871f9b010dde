#![no_main]

use libfuzzer_sys::fuzz_target;

use snmp_mp::oid::Oid;

fuzz_target!(|data: &[u8]| {
    // BER content octets; valid OIDs must re-encode identically
    if let Ok(oid) = Oid::from_ber(data) {
        assert_eq!(oid.ber_content_len(), oid.to_ber().len());
    }

    // Dotted string notation
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = Oid::parse(s);
    }
});
