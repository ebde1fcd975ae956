//! Variable binding (VarBind) type.
//!
//! A VarBind pairs an OID with a value. In a request only the OID matters;
//! the value slot is conventionally NULL and is skipped whatever its tag.

use crate::ber::{Decoder, EncodeBuf};
use crate::error::{EncodeErrorKind, Error, Result};
use crate::oid::Oid;
use crate::value::Value;

/// Variable binding - an OID-value pair.
#[derive(Debug, Clone, PartialEq)]
pub struct VarBind {
    /// The object identifier.
    pub oid: Oid,
    /// The value.
    pub value: Value,
}

impl VarBind {
    /// Create a new VarBind.
    pub fn new(oid: Oid, value: Value) -> Self {
        Self { oid, value }
    }

    /// Create a VarBind with a NULL value.
    pub fn null(oid: Oid) -> Self {
        Self {
            oid,
            value: Value::Null,
        }
    }

    /// Check that every OID in this binding (name and value) can be encoded.
    pub fn validate(&self) -> Result<()> {
        self.oid
            .validate()
            .map_err(|kind| Error::encode(EncodeErrorKind::InvalidOid(kind)))?;
        if let Value::ObjectIdentifier(oid) = &self.value {
            oid.validate()
                .map_err(|kind| Error::encode(EncodeErrorKind::InvalidOid(kind)))?;
        }
        Ok(())
    }

    /// Encode to BER.
    pub fn encode(&self, buf: &mut EncodeBuf) {
        buf.push_sequence(|buf| {
            self.value.encode(buf);
            buf.push_oid(&self.oid);
        });
    }

    /// Decode from BER, keeping the typed value.
    pub fn decode(decoder: &mut Decoder) -> Result<Self> {
        let mut seq = decoder.read_sequence()?;
        let oid = seq.read_oid()?;
        let value = Value::decode(&mut seq)?;
        seq.expect_end()?;
        Ok(VarBind { oid, value })
    }

    /// Decode a request binding: the OID is read, the value TLV is skipped.
    pub fn decode_name(decoder: &mut Decoder) -> Result<Self> {
        let mut seq = decoder.read_sequence()?;
        let oid = seq.read_oid()?;
        seq.skip_tlv()?;
        seq.expect_end()?;
        Ok(VarBind::null(oid))
    }
}

impl std::fmt::Display for VarBind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} = {}", self.oid, self.value)
    }
}

/// Encode a list of VarBinds.
pub fn encode_varbind_list(buf: &mut EncodeBuf, varbinds: &[VarBind]) {
    buf.push_sequence(|buf| {
        // Reverse buffer: last binding goes in first
        for vb in varbinds.iter().rev() {
            vb.encode(buf);
        }
    });
}

/// Decode a list of VarBinds with their values.
pub fn decode_varbind_list(decoder: &mut Decoder) -> Result<Vec<VarBind>> {
    let mut seq = decoder.read_sequence()?;
    let mut varbinds = Vec::new();

    while !seq.is_empty() {
        varbinds.push(VarBind::decode(&mut seq)?);
    }

    Ok(varbinds)
}

/// Decode the binding list of a request, ignoring each value placeholder.
pub fn decode_request_varbinds(decoder: &mut Decoder) -> Result<Vec<VarBind>> {
    let mut seq = decoder.read_sequence()?;
    let mut varbinds = Vec::new();

    while !seq.is_empty() {
        varbinds.push(VarBind::decode_name(&mut seq)?);
    }

    Ok(varbinds)
}
