//! SNMP value types.
//!
//! The `Value` enum covers the scalar kinds a simulated device can serve plus
//! the SNMPv2 exception markers used in responses.

use crate::ber::{Decoder, EncodeBuf, tag};
use crate::error::{DecodeErrorKind, Error, Result};
use crate::oid::Oid;
use bytes::Bytes;
use std::fmt::Write as _;

/// SNMP value.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Value {
    /// INTEGER (ASN.1 primitive, signed 32-bit)
    Integer(i32),

    /// OCTET STRING (arbitrary bytes)
    OctetString(Bytes),

    /// NULL, also the "no such instance" placeholder for unresolved OIDs
    Null,

    /// OBJECT IDENTIFIER
    ObjectIdentifier(Oid),

    /// IpAddress (4 bytes, network order)
    IpAddress([u8; 4]),

    /// Counter32 (unsigned 32-bit, wrapping)
    Counter32(u32),

    /// Gauge32 / Unsigned32 (unsigned 32-bit, non-wrapping)
    Gauge32(u32),

    /// TimeTicks (hundredths of a second)
    TimeTicks(u32),

    /// Counter64 (unsigned 64-bit, wrapping). SNMPv2c only.
    Counter64(u64),

    /// noSuchObject exception.
    NoSuchObject,

    /// noSuchInstance exception: the requested instance does not exist.
    NoSuchInstance,

    /// endOfMibView exception: nothing follows the requested OID.
    EndOfMibView,

    /// Unrecognized tag, kept verbatim.
    Unknown { tag: u8, data: Bytes },
}

impl Value {
    /// Try to get as i32.
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Value::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as u32 (Counter32, Gauge32 or TimeTicks).
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            Value::Counter32(v) | Value::Gauge32(v) | Value::TimeTicks(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as u64. Counter64 and the 32-bit unsigned kinds widen.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::Counter64(v) => Some(*v),
            Value::Counter32(v) | Value::Gauge32(v) | Value::TimeTicks(v) => Some(*v as u64),
            _ => None,
        }
    }

    /// Raw bytes of an OctetString.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::OctetString(data) => Some(data),
            _ => None,
        }
    }

    /// OctetString contents as UTF-8 text.
    ///
    /// # Examples
    ///
    /// ```
    /// use snmp_sim::Value;
    ///
    /// assert_eq!(Value::from("Test Location").as_str(), Some("Test Location"));
    /// assert_eq!(Value::Integer(1).as_str(), None);
    /// ```
    pub fn as_str(&self) -> Option<&str> {
        self.as_bytes().and_then(|b| std::str::from_utf8(b).ok())
    }

    pub fn as_oid(&self) -> Option<&Oid> {
        match self {
            Value::ObjectIdentifier(oid) => Some(oid),
            _ => None,
        }
    }

    pub fn as_ip(&self) -> Option<std::net::Ipv4Addr> {
        match self {
            Value::IpAddress(bytes) => Some(std::net::Ipv4Addr::from(*bytes)),
            _ => None,
        }
    }

    /// Check if this is an exception value.
    pub fn is_exception(&self) -> bool {
        matches!(
            self,
            Value::NoSuchObject | Value::NoSuchInstance | Value::EndOfMibView
        )
    }

    /// Encode to BER.
    pub fn encode(&self, buf: &mut EncodeBuf) {
        match self {
            Value::Integer(v) => buf.push_integer(*v),
            Value::OctetString(data) => buf.push_octet_string(data),
            Value::Null => buf.push_null(),
            Value::ObjectIdentifier(oid) => buf.push_oid(oid),
            Value::IpAddress(addr) => buf.push_ip_address(*addr),
            Value::Counter32(v) => buf.push_unsigned32(tag::application::COUNTER32, *v),
            Value::Gauge32(v) => buf.push_unsigned32(tag::application::GAUGE32, *v),
            Value::TimeTicks(v) => buf.push_unsigned32(tag::application::TIMETICKS, *v),
            Value::Counter64(v) => buf.push_counter64(*v),
            Value::NoSuchObject => buf.push_empty(tag::context::NO_SUCH_OBJECT),
            Value::NoSuchInstance => buf.push_empty(tag::context::NO_SUCH_INSTANCE),
            Value::EndOfMibView => buf.push_empty(tag::context::END_OF_MIB_VIEW),
            Value::Unknown { tag: t, data } => {
                buf.push_bytes(data);
                buf.push_length(data.len());
                buf.push_tag(*t);
            }
        }
    }

    /// Decode from BER.
    pub fn decode(decoder: &mut Decoder) -> Result<Self> {
        let tag_offset = decoder.offset();
        let tag = decoder.read_tag()?;
        let len = decoder.read_length()?;

        match tag {
            tag::universal::INTEGER => Ok(Value::Integer(decoder.read_integer_value(len)?)),
            tag::universal::OCTET_STRING => Ok(Value::OctetString(decoder.read_bytes(len)?)),
            tag::universal::NULL => {
                if len != 0 {
                    return Err(Error::malformed_pdu(
                        decoder.offset(),
                        DecodeErrorKind::InvalidNull,
                    ));
                }
                Ok(Value::Null)
            }
            tag::universal::OBJECT_IDENTIFIER => {
                Ok(Value::ObjectIdentifier(decoder.read_oid_value(len)?))
            }
            tag::application::IP_ADDRESS => {
                if len != 4 {
                    return Err(Error::malformed_pdu(
                        decoder.offset(),
                        DecodeErrorKind::InvalidIpAddressLength { length: len },
                    ));
                }
                let data = decoder.read_bytes(4)?;
                Ok(Value::IpAddress([data[0], data[1], data[2], data[3]]))
            }
            tag::application::COUNTER32 => {
                Ok(Value::Counter32(decoder.read_unsigned32_value(len)?))
            }
            tag::application::GAUGE32 => Ok(Value::Gauge32(decoder.read_unsigned32_value(len)?)),
            tag::application::TIMETICKS => {
                Ok(Value::TimeTicks(decoder.read_unsigned32_value(len)?))
            }
            tag::application::COUNTER64 => {
                Ok(Value::Counter64(decoder.read_unsigned64_value(len)?))
            }
            tag::context::NO_SUCH_OBJECT => {
                decoder.read_bytes(len)?;
                Ok(Value::NoSuchObject)
            }
            tag::context::NO_SUCH_INSTANCE => {
                decoder.read_bytes(len)?;
                Ok(Value::NoSuchInstance)
            }
            tag::context::END_OF_MIB_VIEW => {
                decoder.read_bytes(len)?;
                Ok(Value::EndOfMibView)
            }
            tag::universal::OCTET_STRING_CONSTRUCTED => Err(Error::malformed_pdu(
                tag_offset,
                DecodeErrorKind::ConstructedOctetString,
            )),
            _ => {
                let data = decoder.read_bytes(len)?;
                Ok(Value::Unknown { tag, data })
            }
        }
    }
}

fn write_hex(f: &mut std::fmt::Formatter<'_>, data: &[u8]) -> std::fmt::Result {
    let mut out = String::with_capacity(data.len() * 2);
    for byte in data {
        let _ = write!(out, "{:02x}", byte);
    }
    f.write_str(&out)
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Integer(v) => write!(f, "{}", v),
            Value::OctetString(data) => match std::str::from_utf8(data) {
                Ok(s) => write!(f, "{}", s),
                Err(_) => {
                    write!(f, "0x")?;
                    write_hex(f, data)
                }
            },
            Value::Null => write!(f, "NULL"),
            Value::ObjectIdentifier(oid) => write!(f, "{}", oid),
            Value::IpAddress(addr) => {
                write!(f, "{}.{}.{}.{}", addr[0], addr[1], addr[2], addr[3])
            }
            Value::Counter32(v) | Value::Gauge32(v) => write!(f, "{}", v),
            Value::TimeTicks(v) => {
                let secs = v / 100;
                let days = secs / 86400;
                let hours = (secs % 86400) / 3600;
                let mins = (secs % 3600) / 60;
                let s = secs % 60;
                write!(f, "{}d {}h {}m {}s", days, hours, mins, s)
            }
            Value::Counter64(v) => write!(f, "{}", v),
            Value::NoSuchObject => write!(f, "noSuchObject"),
            Value::NoSuchInstance => write!(f, "noSuchInstance"),
            Value::EndOfMibView => write!(f, "endOfMibView"),
            Value::Unknown { tag, data } => {
                write!(f, "Unknown(tag=0x{:02X}, data=0x", tag)?;
                write_hex(f, data)?;
                write!(f, ")")
            }
        }
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(v)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::OctetString(Bytes::copy_from_slice(s.as_bytes()))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::OctetString(Bytes::from(s))
    }
}

impl From<Oid> for Value {
    fn from(oid: Oid) -> Self {
        Value::ObjectIdentifier(oid)
    }
}

impl From<std::net::Ipv4Addr> for Value {
    fn from(addr: std::net::Ipv4Addr) -> Self {
        Value::IpAddress(addr.octets())
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::Counter64(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oid;

    fn roundtrip(value: Value) -> Value {
        let mut buf = EncodeBuf::new();
        value.encode(&mut buf);
        let bytes = buf.finish();
        let mut decoder = Decoder::new(bytes);
        Value::decode(&mut decoder).unwrap()
    }

    fn encoded(value: &Value) -> Vec<u8> {
        let mut buf = EncodeBuf::new();
        value.encode(&mut buf);
        buf.finish().to_vec()
    }

    #[test]
    fn test_integer_encoding_is_minimal() {
        assert_eq!(encoded(&Value::Integer(0)), vec![0x02, 0x01, 0x00]);
        assert_eq!(encoded(&Value::Integer(72)), vec![0x02, 0x01, 0x48]);
        assert_eq!(encoded(&Value::Integer(128)), vec![0x02, 0x02, 0x00, 0x80]);
        assert_eq!(encoded(&Value::Integer(-1)), vec![0x02, 0x01, 0xFF]);
        assert_eq!(encoded(&Value::Integer(-129)), vec![0x02, 0x02, 0xFF, 0x7F]);
    }

    #[test]
    fn test_integer_extremes() {
        assert_eq!(roundtrip(Value::Integer(i32::MIN)), Value::Integer(i32::MIN));
        assert_eq!(roundtrip(Value::Integer(i32::MAX)), Value::Integer(i32::MAX));
    }

    #[test]
    fn test_unsigned_gets_leading_zero() {
        // 123456 = 0x01E240, top bit clear
        assert_eq!(
            encoded(&Value::TimeTicks(123456)),
            vec![0x43, 0x03, 0x01, 0xE2, 0x40]
        );
        assert_eq!(
            encoded(&Value::Gauge32(u32::MAX)),
            vec![0x42, 0x05, 0x00, 0xFF, 0xFF, 0xFF, 0xFF]
        );
        assert_eq!(
            encoded(&Value::Counter64(u64::MAX)),
            vec![0x46, 0x09, 0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]
        );
    }

    #[test]
    fn test_octet_string() {
        assert_eq!(
            encoded(&Value::from("abc")),
            vec![0x04, 0x03, b'a', b'b', b'c']
        );
        assert_eq!(
            roundtrip(Value::OctetString(Bytes::new())),
            Value::OctetString(Bytes::new())
        );
    }

    #[test]
    fn test_long_octet_string_uses_long_form_length() {
        let text = "x".repeat(200);
        let bytes = encoded(&Value::from(text.as_str()));
        assert_eq!(&bytes[..3], &[0x04, 0x81, 200]);
        assert_eq!(roundtrip(Value::from(text.clone())), Value::from(text));
    }

    #[test]
    fn test_scalar_roundtrips() {
        for value in [
            Value::Null,
            Value::ObjectIdentifier(oid!(1, 3, 6, 1, 4, 1, 8072, 3, 2, 10)),
            Value::IpAddress([192, 168, 1, 1]),
            Value::Counter32(0),
            Value::Counter32(u32::MAX),
            Value::Gauge32(1_000_000_000),
            Value::TimeTicks(u32::MAX),
            Value::Counter64(0),
            Value::Counter64(10_000_000_000),
            Value::NoSuchObject,
            Value::NoSuchInstance,
            Value::EndOfMibView,
        ] {
            assert_eq!(roundtrip(value.clone()), value);
        }
    }

    #[test]
    fn test_exception_encoding() {
        assert_eq!(encoded(&Value::NoSuchInstance), vec![0x81, 0x00]);
        assert_eq!(encoded(&Value::EndOfMibView), vec![0x82, 0x00]);
        assert!(Value::NoSuchObject.is_exception());
        assert!(!Value::Null.is_exception());
    }

    #[test]
    fn test_unknown_tag_preserved() {
        let mut decoder = Decoder::from_slice(&[0x44, 0x02, 0xAB, 0xCD]);
        let value = Value::decode(&mut decoder).unwrap();
        assert_eq!(
            value,
            Value::Unknown {
                tag: 0x44,
                data: Bytes::from_static(&[0xAB, 0xCD])
            }
        );
        assert_eq!(encoded(&value), vec![0x44, 0x02, 0xAB, 0xCD]);
    }

    #[test]
    fn test_decode_rejects_invalid_forms() {
        let cases: &[&[u8]] = &[
            &[0x02, 0x00],                   // zero-length integer
            &[0x05, 0x01, 0x00],             // NULL with content
            &[0x40, 0x03, 10, 0, 0],         // short IpAddress
            &[0x24, 0x03, 0x04, 0x01, 0x41], // constructed OCTET STRING
            &[0x46, 0x0A, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
            &[0x02, 0x05, 0x01, 0x00, 0x00, 0x00, 0x00],
        ];
        for case in cases {
            let mut decoder = Decoder::from_slice(case);
            let err = Value::decode(&mut decoder).unwrap_err();
            assert!(
                matches!(err, Error::MalformedPdu { .. }),
                "{:02X?} gave {:?}",
                case,
                err
            );
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::from("Test Contact").to_string(), "Test Contact");
        assert_eq!(
            Value::OctetString(Bytes::from_static(&[0x00, 0x1A, 0xFF])).to_string(),
            "0x001aff"
        );
        assert_eq!(Value::IpAddress([10, 0, 0, 1]).to_string(), "10.0.0.1");
        // 123456 ticks = 1234 s = 20 m 34 s
        assert_eq!(Value::TimeTicks(123456).to_string(), "0d 0h 20m 34s");
        assert_eq!(Value::Null.to_string(), "NULL");
    }

    #[test]
    fn test_conversions() {
        assert_eq!(Value::from(42).as_i32(), Some(42));
        assert_eq!(Value::from(5_000_000_000u64).as_u64(), Some(5_000_000_000));
        assert_eq!(
            Value::from(std::net::Ipv4Addr::new(10, 1, 2, 3)),
            Value::IpAddress([10, 1, 2, 3])
        );
        assert_eq!(Value::Gauge32(7).as_u32(), Some(7));
        assert_eq!(
            Value::from(oid!(1, 3, 6, 1)).as_oid(),
            Some(&oid!(1, 3, 6, 1))
        );
    }
}
