#![no_main]

use libfuzzer_sys::fuzz_target;

use snmp_sim::oid::Oid;

fuzz_target!(|data: &[u8]| {
    // Anything that decodes must survive an encode/decode cycle
    if let Ok(oid) = Oid::from_ber(data) {
        let encoded = oid.to_ber().expect("decoded OID must be encodable");
        assert_eq!(Oid::from_ber(&encoded).ok(), Some(oid));
    }

    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(oid) = Oid::parse(s) {
            assert_eq!(Oid::parse(&oid.to_string()).ok(), Some(oid));
        }
    }
});
