//! Request/response cycle over an immutable store snapshot.
//!
//! Nothing here touches a socket or logs: bytes in, bytes (or an error) out.

use bytes::Bytes;

use crate::error::Result;
use crate::message::CommunityMessage;
use crate::pdu::PduType;
use crate::store::OidStore;
use crate::value::Value;
use crate::varbind::VarBind;
use crate::version::Version;

/// What to put in a binding when the store has nothing for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingValue {
    /// NULL, the way the simulator has always answered unknown OIDs.
    #[default]
    Null,
    /// SNMPv2 exceptions: `noSuchInstance` for GET and `endOfMibView` for
    /// GETNEXT past the last OID. SNMPv1 requests still get NULL.
    Exception,
}

impl MissingValue {
    fn for_get(self, version: Version) -> Value {
        match (self, version) {
            (MissingValue::Exception, Version::V2c) => Value::NoSuchInstance,
            _ => Value::Null,
        }
    }

    fn for_get_next(self, version: Version) -> Value {
        match (self, version) {
            (MissingValue::Exception, Version::V2c) => Value::EndOfMibView,
            _ => Value::Null,
        }
    }
}

/// Answers requests from one store snapshot.
///
/// # Example
///
/// ```
/// use snmp_sim::agent::{MissingValue, Responder};
/// use snmp_sim::message::CommunityMessage;
/// use snmp_sim::pdu::Pdu;
/// use snmp_sim::store::{DeviceDescription, build_store};
/// use snmp_sim::{Value, oid};
///
/// let (store, _) = build_store(&DeviceDescription::default(), &[]);
/// let responder = Responder::new(&store).missing_value(MissingValue::Exception);
///
/// let request = CommunityMessage::v2c(
///     "public",
///     Pdu::get_request(7, &[oid!(1, 3, 6, 1, 2, 1, 1, 6, 0), oid!(1, 3, 6, 1, 2, 1, 1, 99, 0)]),
/// );
/// let response = responder.respond(&request);
///
/// assert_eq!(response.pdu.request_id, 7);
/// assert_eq!(response.pdu.varbinds[0].value, Value::from("Test Location"));
/// assert_eq!(response.pdu.varbinds[1].value, Value::NoSuchInstance);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Responder<'a> {
    store: &'a OidStore,
    missing: MissingValue,
}

impl<'a> Responder<'a> {
    /// Create a responder using the default [`MissingValue::Null`] policy.
    pub fn new(store: &'a OidStore) -> Self {
        Self {
            store,
            missing: MissingValue::default(),
        }
    }

    /// Set the policy for OIDs the store does not hold.
    pub fn missing_value(mut self, policy: MissingValue) -> Self {
        self.missing = policy;
        self
    }

    /// Build the Response for a decoded request.
    ///
    /// One binding per request binding, in request order. A message that is
    /// already a Response is echoed back as an empty-valued Response; callers
    /// decoding untrusted bytes should use [`CommunityMessage::decode_request`].
    pub fn respond(&self, request: &CommunityMessage) -> CommunityMessage {
        let version = request.version;
        let varbinds = request
            .pdu
            .varbinds
            .iter()
            .map(|vb| match request.pdu.pdu_type {
                PduType::GetNextRequest => self.resolve_next(vb, version),
                PduType::GetRequest | PduType::Response => self.resolve(vb, version),
            })
            .collect();
        request.response(varbinds)
    }

    fn resolve(&self, vb: &VarBind, version: Version) -> VarBind {
        let value = self
            .store
            .lookup(&vb.oid)
            .cloned()
            .unwrap_or_else(|| self.missing.for_get(version));
        VarBind::new(vb.oid.clone(), value)
    }

    fn resolve_next(&self, vb: &VarBind, version: Version) -> VarBind {
        match self.store.get_next(&vb.oid) {
            Some((next, value)) => VarBind::new(next.clone(), value.clone()),
            None => VarBind::new(vb.oid.clone(), self.missing.for_get_next(version)),
        }
    }

    /// Full cycle: decode a request datagram, resolve it, encode the Response.
    ///
    /// A decode failure means no response should be sent. An encode failure
    /// only concerns this request.
    pub fn handle(&self, request: Bytes) -> Result<Bytes> {
        let request = CommunityMessage::decode_request(request)?;
        self.respond(&request).encode()
    }
}

/// Answer one request datagram from `store` with the default NULL policy.
///
/// ```
/// use snmp_sim::agent::handle_request;
/// use snmp_sim::store::OidStore;
///
/// // Not SNMP at all: reported, nothing to send
/// let err = handle_request(&OidStore::empty(), b"\x06\x01\x00").unwrap_err();
/// assert!(err.is_decode_error());
/// ```
pub fn handle_request(store: &OidStore, request: &[u8]) -> Result<Bytes> {
    Responder::new(store).handle(Bytes::copy_from_slice(request))
}
