#![no_main]

use bytes::Bytes;
use libfuzzer_sys::fuzz_target;

use snmp_sim::agent::handle_request;
use snmp_sim::message::CommunityMessage;
use snmp_sim::store::{DeviceDescription, build_store};

fuzz_target!(|data: &[u8]| {
    let bytes = Bytes::copy_from_slice(data);

    let _ = CommunityMessage::decode(bytes.clone());

    // A request that decodes must always produce an encodable response
    if data.len() < 8192 && CommunityMessage::decode_request(bytes).is_ok() {
        let (store, _) = build_store(&DeviceDescription::default(), &[]);
        assert!(handle_request(&store, data).is_ok());
    }
});
