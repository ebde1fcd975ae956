//! SNMP Protocol Data Units (PDUs).
//!
//! Only the GET family is modelled: the two request kinds the simulator
//! answers and the Response it sends back.

use crate::ber::{Decoder, EncodeBuf, tag};
use crate::error::{DecodeErrorKind, Error, Result};
use crate::oid::Oid;
use crate::varbind::{VarBind, decode_request_varbinds, decode_varbind_list, encode_varbind_list};

/// PDU type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PduType {
    GetRequest = tag::pdu::GET_REQUEST,
    GetNextRequest = tag::pdu::GET_NEXT_REQUEST,
    Response = tag::pdu::RESPONSE,
}

impl PduType {
    /// Create from tag byte.
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            tag::pdu::GET_REQUEST => Some(Self::GetRequest),
            tag::pdu::GET_NEXT_REQUEST => Some(Self::GetNextRequest),
            tag::pdu::RESPONSE => Some(Self::Response),
            _ => None,
        }
    }

    /// Get the tag byte.
    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Whether a manager sends this kind (as opposed to an agent).
    pub fn is_request(self) -> bool {
        !matches!(self, Self::Response)
    }
}

impl std::fmt::Display for PduType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GetRequest => write!(f, "GetRequest"),
            Self::GetNextRequest => write!(f, "GetNextRequest"),
            Self::Response => write!(f, "Response"),
        }
    }
}

/// PDU body shared by requests and responses.
#[derive(Debug, Clone, PartialEq)]
pub struct Pdu {
    /// PDU type
    pub pdu_type: PduType,
    /// Request ID for correlating requests and responses
    pub request_id: i32,
    /// Error status (always 0 in what the simulator sends)
    pub error_status: i32,
    /// Error index (always 0 in what the simulator sends)
    pub error_index: i32,
    /// Variable bindings
    pub varbinds: Vec<VarBind>,
}

impl Pdu {
    /// Create a new GET request PDU.
    pub fn get_request(request_id: i32, oids: &[Oid]) -> Self {
        Self::request(PduType::GetRequest, request_id, oids)
    }

    /// Create a new GETNEXT request PDU.
    pub fn get_next_request(request_id: i32, oids: &[Oid]) -> Self {
        Self::request(PduType::GetNextRequest, request_id, oids)
    }

    fn request(pdu_type: PduType, request_id: i32, oids: &[Oid]) -> Self {
        Self {
            pdu_type,
            request_id,
            error_status: 0,
            error_index: 0,
            varbinds: oids.iter().cloned().map(VarBind::null).collect(),
        }
    }

    /// Create a successful Response PDU.
    pub fn response(request_id: i32, varbinds: Vec<VarBind>) -> Self {
        Self {
            pdu_type: PduType::Response,
            request_id,
            error_status: 0,
            error_index: 0,
            varbinds,
        }
    }

    /// Encode to BER.
    ///
    /// OIDs are written as-is; use [`Pdu::validate`] first when they may be
    /// unencodable.
    pub fn encode(&self, buf: &mut EncodeBuf) {
        buf.push_constructed(self.pdu_type.tag(), |buf| {
            encode_varbind_list(buf, &self.varbinds);
            buf.push_integer(self.error_index);
            buf.push_integer(self.error_status);
            buf.push_integer(self.request_id);
        });
    }

    /// Check every binding can be encoded.
    pub fn validate(&self) -> Result<()> {
        self.varbinds.iter().try_for_each(VarBind::validate)
    }

    /// Decode from BER.
    ///
    /// Request bindings keep only their OID (value placeholders of any tag are
    /// skipped); Response bindings keep their decoded values.
    pub fn decode(decoder: &mut Decoder) -> Result<Self> {
        let tag_offset = decoder.offset();
        let tag = decoder.read_tag()?;
        let pdu_type = PduType::from_tag(tag).ok_or_else(|| {
            Error::malformed_pdu(tag_offset, DecodeErrorKind::UnknownPduType(tag))
        })?;

        let len = decoder.read_length()?;
        let mut pdu_decoder = decoder.sub_decoder(len)?;

        let request_id = pdu_decoder.read_integer()?;
        let error_status = pdu_decoder.read_integer()?;
        let error_index = pdu_decoder.read_integer()?;
        let varbinds = if pdu_type.is_request() {
            decode_request_varbinds(&mut pdu_decoder)?
        } else {
            decode_varbind_list(&mut pdu_decoder)?
        };
        pdu_decoder.expect_end()?;

        Ok(Pdu {
            pdu_type,
            request_id,
            error_status,
            error_index,
            varbinds,
        })
    }

    /// Check if this is an error response.
    pub fn is_error(&self) -> bool {
        self.error_status != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oid;
    use crate::value::Value;

    fn encode(pdu: &Pdu) -> bytes::Bytes {
        let mut buf = EncodeBuf::new();
        pdu.encode(&mut buf);
        buf.finish()
    }

    #[test]
    fn test_get_request_bytes() {
        let pdu = Pdu::get_request(1, &[oid!(1, 3, 6, 1, 2, 1, 1, 1, 0)]);
        assert_eq!(
            encode(&pdu).as_ref(),
            &[
                0xA0, 0x19, // GetRequest
                0x02, 0x01, 0x01, // request-id
                0x02, 0x01, 0x00, // error-status
                0x02, 0x01, 0x00, // error-index
                0x30, 0x0E, 0x30, 0x0C, 0x06, 0x08, 0x2B, 0x06, 0x01, 0x02, 0x01, 0x01, 0x01,
                0x00, 0x05, 0x00,
            ]
        );
    }

    #[test]
    fn test_response_roundtrip_keeps_values() {
        let pdu = Pdu::response(
            0x1234_5678,
            vec![
                VarBind::new(oid!(1, 3, 6, 1, 2, 1, 1, 3, 0), Value::TimeTicks(123456)),
                VarBind::new(oid!(1, 3, 6, 1, 2, 1, 1, 99, 0), Value::Null),
            ],
        );
        let mut decoder = Decoder::new(encode(&pdu));
        assert_eq!(Pdu::decode(&mut decoder).unwrap(), pdu);
    }

    #[test]
    fn test_request_values_are_dropped() {
        let mut pdu = Pdu::get_next_request(-5, &[oid!(1, 3, 6, 1)]);
        pdu.varbinds[0].value = Value::Integer(99);

        let mut decoder = Decoder::new(encode(&pdu));
        let decoded = Pdu::decode(&mut decoder).unwrap();
        assert_eq!(decoded.pdu_type, PduType::GetNextRequest);
        assert_eq!(decoded.request_id, -5);
        assert_eq!(decoded.varbinds, vec![VarBind::null(oid!(1, 3, 6, 1))]);
    }

    #[test]
    fn test_unsupported_pdu_tags_rejected() {
        // SetRequest (0xA3) and GetBulkRequest (0xA5) are not answered
        for tag in [0xA3, 0xA5, 0xA7, 0x30] {
            let data = [tag, 0x0B, 0x02, 0x01, 0x01, 0x02, 0x01, 0x00, 0x02, 0x01, 0x00, 0x30, 0x00];
            let mut decoder = Decoder::from_slice(&data);
            let err = Pdu::decode(&mut decoder).unwrap_err();
            assert!(matches!(
                err,
                Error::MalformedPdu {
                    offset: 0,
                    kind: DecodeErrorKind::UnknownPduType(t),
                } if t == tag
            ));
        }
    }

    #[test]
    fn test_pdu_length_overrun_rejected() {
        let data = [0xA0, 0x20, 0x02, 0x01, 0x01];
        let mut decoder = Decoder::from_slice(&data);
        assert!(matches!(
            Pdu::decode(&mut decoder).unwrap_err(),
            Error::MalformedPdu { .. }
        ));
    }
}
