//! Community-based SNMP message format (v1/v2c).
//!
//! `SEQUENCE { version INTEGER, community OCTET STRING, pdu PDU }`
//!
//! The version number is the only difference between the two: 0 for v1,
//! 1 for v2c.

use crate::ber::{Decoder, EncodeBuf};
use crate::error::{DecodeErrorKind, EncodeErrorKind, Error, Result};
use crate::pdu::Pdu;
use crate::varbind::VarBind;
use crate::version::Version;
use bytes::Bytes;

/// Largest payload a single UDP datagram over IPv4 can carry.
pub const MAX_MESSAGE_SIZE: usize = 65507;

/// Community-based SNMP message (v1/v2c).
#[derive(Debug, Clone, PartialEq)]
pub struct CommunityMessage {
    /// SNMP version (V1 or V2c)
    pub version: Version,
    /// Community string, echoed verbatim in responses
    pub community: Bytes,
    /// Protocol data unit
    pub pdu: Pdu,
}

impl CommunityMessage {
    /// Create a new community message.
    pub fn new(version: Version, community: impl Into<Bytes>, pdu: Pdu) -> Self {
        Self {
            version,
            community: community.into(),
            pdu,
        }
    }

    /// Create a V2c message.
    pub fn v2c(community: impl Into<Bytes>, pdu: Pdu) -> Self {
        Self::new(Version::V2c, community, pdu)
    }

    /// Create a V1 message.
    pub fn v1(community: impl Into<Bytes>, pdu: Pdu) -> Self {
        Self::new(Version::V1, community, pdu)
    }

    /// Build the Response to this message: version, community and request-id
    /// are echoed, error fields are zero.
    pub fn response(&self, varbinds: Vec<VarBind>) -> Self {
        Self {
            version: self.version,
            community: self.community.clone(),
            pdu: Pdu::response(self.pdu.request_id, varbinds),
        }
    }

    /// Encode to BER.
    ///
    /// Fails when an OID in the PDU cannot be encoded or the result would not
    /// fit in one datagram.
    pub fn encode(&self) -> Result<Bytes> {
        self.pdu.validate()?;

        let mut buf = EncodeBuf::new();
        buf.push_sequence(|buf| {
            self.pdu.encode(buf);
            buf.push_octet_string(&self.community);
            buf.push_integer(self.version.as_i32());
        });

        if buf.len() > MAX_MESSAGE_SIZE {
            return Err(Error::encode(EncodeErrorKind::MessageTooLarge {
                size: buf.len(),
                max: MAX_MESSAGE_SIZE,
            }));
        }
        Ok(buf.finish())
    }

    /// Decode from BER.
    ///
    /// Bytes after the outer SEQUENCE are ignored; anything left inside it,
    /// the PDU or a binding after the last expected field is malformed.
    pub fn decode(data: Bytes) -> Result<Self> {
        let mut decoder = Decoder::new(data);
        let mut seq = decoder.read_sequence()?;

        let version_offset = seq.offset();
        let version_num = seq.read_integer()?;
        let version = Version::from_i32(version_num).ok_or_else(|| {
            Error::malformed_pdu(version_offset, DecodeErrorKind::UnknownVersion(version_num))
        })?;

        let community = seq.read_octet_string()?;
        let pdu = Pdu::decode(&mut seq)?;
        seq.expect_end()?;

        Ok(CommunityMessage {
            version,
            community,
            pdu,
        })
    }

    /// Decode a message that must carry a request PDU.
    pub fn decode_request(data: Bytes) -> Result<Self> {
        let msg = Self::decode(data)?;
        if !msg.pdu.pdu_type.is_request() {
            return Err(Error::malformed_pdu(0, DecodeErrorKind::NotARequest));
        }
        Ok(msg)
    }

    /// Consume and return the PDU.
    pub fn into_pdu(self) -> Pdu {
        self.pdu
    }
}
