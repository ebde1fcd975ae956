//! Request handling tests: raw request bytes in, raw response bytes out.

mod common;

use common::*;
use snmp_sim::agent::{MissingValue, Responder, handle_request};
use snmp_sim::message::CommunityMessage;
use snmp_sim::pdu::{Pdu, PduType};
use snmp_sim::store::{DeviceDescription, OidStore, build_store};
use snmp_sim::{Error, Value, VarBind, Version};

fn default_store() -> OidStore {
    build_store(&DeviceDescription::default(), &[]).0
}

/// GET sysDescr.0, SNMPv1, community "public", request-id 1.
const V1_GET_SYS_DESCR: &[u8] = &[
    0x30, 0x26, // SEQUENCE
    0x02, 0x01, 0x00, // version 0
    0x04, 0x06, b'p', b'u', b'b', b'l', b'i', b'c', // community
    0xA0, 0x19, // GetRequest
    0x02, 0x01, 0x01, // request-id 1
    0x02, 0x01, 0x00, // error-status
    0x02, 0x01, 0x00, // error-index
    0x30, 0x0E, // varbind list
    0x30, 0x0C, // varbind
    0x06, 0x08, 0x2B, 0x06, 0x01, 0x02, 0x01, 0x01, 0x01, 0x00, // 1.3.6.1.2.1.1.1.0
    0x05, 0x00, // NULL
];

#[test]
fn sys_descr_scenario() {
    let response = handle_request(&default_store(), V1_GET_SYS_DESCR).unwrap();
    let response = CommunityMessage::decode(response).unwrap();

    assert_eq!(response.version, Version::V1);
    assert_eq!(&response.community[..], b"public");
    assert_eq!(response.pdu.pdu_type, PduType::Response);
    assert_eq!(response.pdu.request_id, 1);
    assert_eq!(response.pdu.error_status, 0);
    assert_eq!(response.pdu.error_index, 0);
    assert_eq!(
        response.pdu.varbinds,
        vec![VarBind::new(sys_descr(), Value::from("Test System Description"))]
    );
}

#[test]
fn sys_descr_response_bytes() {
    let response = handle_request(&default_store(), V1_GET_SYS_DESCR).unwrap();

    let mut expected = vec![0x30, 0x3D, 0x02, 0x01, 0x00, 0x04, 0x06];
    expected.extend_from_slice(b"public");
    expected.extend_from_slice(&[0xA2, 0x30, 0x02, 0x01, 0x01, 0x02, 0x01, 0x00, 0x02, 0x01, 0x00]);
    expected.extend_from_slice(&[0x30, 0x25, 0x30, 0x23]);
    expected.extend_from_slice(&[0x06, 0x08, 0x2B, 0x06, 0x01, 0x02, 0x01, 0x01, 0x01, 0x00]);
    expected.extend_from_slice(&[0x04, 0x17]);
    expected.extend_from_slice(b"Test System Description");

    assert_eq!(&response[..], expected.as_slice());
}

#[test]
fn missing_oids_become_null_in_request_order() {
    let oids = [nonexistent_oid(), sys_name(), enterprise(5), sys_uptime()];
    let request = CommunityMessage::v2c("public", Pdu::get_request(99, &oids))
        .encode()
        .unwrap();

    let response = CommunityMessage::decode(handle_request(&default_store(), &request).unwrap()).unwrap();
    let varbinds = &response.pdu.varbinds;

    assert_eq!(varbinds.len(), oids.len());
    for (vb, oid) in varbinds.iter().zip(&oids) {
        assert_eq!(&vb.oid, oid);
    }
    assert_eq!(varbinds[0].value, Value::Null);
    assert_eq!(varbinds[1].value, Value::from("Test System Name"));
    assert_eq!(varbinds[2].value, Value::Null);
    assert_eq!(varbinds[3].value, Value::TimeTicks(123456));
}

#[test]
fn exception_policy_for_v2c() {
    let store = default_store();
    let responder = Responder::new(&store).missing_value(MissingValue::Exception);
    let request = CommunityMessage::v2c("public", Pdu::get_request(5, &[nonexistent_oid()]))
        .encode()
        .unwrap();

    let response = CommunityMessage::decode(responder.handle(request).unwrap()).unwrap();
    assert_eq!(response.pdu.varbinds[0].value, Value::NoSuchInstance);
}

#[test]
fn get_next_returns_successor() {
    let (store, _) = build_store(&two_port_device(), &[]);
    let request = CommunityMessage::v2c(
        "public",
        Pdu::get_next_request(7, &[sys_services(), if_number(), if_column(2, 2)]),
    )
    .encode()
    .unwrap();

    let response = CommunityMessage::decode(handle_request(&store, &request).unwrap()).unwrap();
    let varbinds = &response.pdu.varbinds;

    assert_eq!(varbinds[0], VarBind::new(if_number(), Value::Integer(2)));
    assert_eq!(varbinds[1], VarBind::new(if_column(1, 1), Value::Integer(1)));
    assert_eq!(varbinds[2], VarBind::new(if_column(3, 1), Value::Integer(6)));
}

#[test]
fn request_value_placeholders_are_ignored() {
    // Binding value is an INTEGER instead of NULL
    let mut request = V1_GET_SYS_DESCR.to_vec();
    let len = request.len();
    request[len - 2..].copy_from_slice(&[0x02, 0x00]);

    let response = CommunityMessage::decode(handle_request(&default_store(), &request).unwrap()).unwrap();
    assert_eq!(response.pdu.varbinds[0].value, Value::from("Test System Description"));
}

#[test]
fn malformed_requests_are_reported() {
    let store = default_store();

    // Truncated
    let err = handle_request(&store, &V1_GET_SYS_DESCR[..20]).unwrap_err();
    assert!(matches!(err, Error::MalformedPdu { .. }), "{err}");

    // Not a SEQUENCE at all
    assert!(handle_request(&store, &[0x04, 0x00]).unwrap_err().is_decode_error());

    // Empty datagram
    assert!(handle_request(&store, &[]).unwrap_err().is_decode_error());

    // Unknown version 3
    let mut v3 = V1_GET_SYS_DESCR.to_vec();
    v3[4] = 0x03;
    assert!(matches!(handle_request(&store, &v3), Err(Error::MalformedPdu { .. })));

    // Empty OID inside the binding
    let bad_oid: &[u8] = &[
        0x30, 0x1C, 0x02, 0x01, 0x00, 0x04, 0x06, b'p', b'u', b'b', b'l', b'i', b'c', 0xA0, 0x0F,
        0x02, 0x01, 0x01, 0x02, 0x01, 0x00, 0x02, 0x01, 0x00, 0x30, 0x04, 0x30, 0x02, 0x06, 0x00,
    ];
    assert!(handle_request(&store, bad_oid).unwrap_err().is_decode_error());
}

#[test]
fn extra_fields_inside_request_are_rejected() {
    let store = default_store();

    // INTEGER 7 after the NULL placeholder, inside the binding
    let mut in_binding = V1_GET_SYS_DESCR.to_vec();
    in_binding.extend_from_slice(&[0x02, 0x01, 0x07]);
    for at in [1, 14, 25, 27] {
        in_binding[at] += 3;
    }

    // INTEGER 7 after the binding list, inside the PDU
    let mut in_pdu = V1_GET_SYS_DESCR.to_vec();
    in_pdu.extend_from_slice(&[0x02, 0x01, 0x07]);
    in_pdu[1] += 3;
    in_pdu[14] += 3;

    // INTEGER 7 after the PDU, inside the outer SEQUENCE
    let mut in_message = V1_GET_SYS_DESCR.to_vec();
    in_message.extend_from_slice(&[0x02, 0x01, 0x07]);
    in_message[1] += 3;

    for request in [in_binding, in_pdu, in_message] {
        let err = handle_request(&store, &request).unwrap_err();
        assert!(matches!(err, Error::MalformedPdu { .. }), "{err}");
    }

    // Bytes after the outer SEQUENCE are still tolerated
    let mut after_message = V1_GET_SYS_DESCR.to_vec();
    after_message.extend_from_slice(&[0x02, 0x01, 0x07]);
    assert!(handle_request(&store, &after_message).is_ok());
}

#[test]
fn long_response_uses_long_form_lengths() {
    let customs = [custom_list("long.json", &[("1.3.6.1.4.1.99999.1.0", "string", "x".repeat(300).as_str())])];
    let (store, _) = build_store(&DeviceDescription::default(), &customs);

    let request = CommunityMessage::v2c("public", Pdu::get_request(1, &[enterprise(1)]))
        .encode()
        .unwrap();
    let response = handle_request(&store, &request).unwrap();

    assert_eq!(&response[..2], &[0x30, 0x82]);
    let decoded = CommunityMessage::decode(response).unwrap();
    assert_eq!(decoded.pdu.varbinds[0].value.as_bytes().map(<[u8]>::len), Some(300));
}
