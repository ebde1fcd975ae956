//! Error types for snmp-sim.
//!
//! Decode and encode failures carry a small `Copy` kind describing what went
//! wrong, so callers can log precise diagnostics without the codec itself
//! emitting anything.

use std::path::PathBuf;

/// Result type alias using the library's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// BER decode error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeErrorKind {
    /// Expected different tag.
    UnexpectedTag { expected: u8, actual: u8 },
    /// Data truncated unexpectedly.
    TruncatedData,
    /// Invalid BER length encoding.
    InvalidLength,
    /// Indefinite length not supported.
    IndefiniteLength,
    /// Length field too long.
    LengthTooLong { octets: usize },
    /// Length exceeds maximum.
    LengthExceedsMax { length: usize, max: usize },
    /// Insufficient data for read.
    InsufficientData { needed: usize, available: usize },
    /// Zero-length integer.
    ZeroLengthInteger,
    /// Integer value does not fit the target type.
    IntegerOverflow,
    /// Integer64 too long.
    Integer64TooLong { length: usize },
    /// NULL with non-zero length.
    InvalidNull,
    /// Invalid IP address length.
    InvalidIpAddressLength { length: usize },
    /// Constructed OCTET STRING not supported.
    ConstructedOctetString,
    /// Unknown SNMP version.
    UnknownVersion(i32),
    /// Unknown or unsupported PDU type.
    UnknownPduType(u8),
    /// A Response PDU arrived where a request was expected.
    NotARequest,
    /// Bytes left over inside a constructed value after its last field.
    TrailingData { remaining: usize },
}

impl std::fmt::Display for DecodeErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnexpectedTag { expected, actual } => {
                write!(f, "expected tag 0x{:02X}, got 0x{:02X}", expected, actual)
            }
            Self::TruncatedData => write!(f, "unexpected end of data"),
            Self::InvalidLength => write!(f, "invalid length encoding"),
            Self::IndefiniteLength => write!(f, "indefinite length encoding not supported"),
            Self::LengthTooLong { octets } => {
                write!(f, "length encoding too long ({} octets)", octets)
            }
            Self::LengthExceedsMax { length, max } => {
                write!(f, "length {} exceeds maximum {}", length, max)
            }
            Self::InsufficientData { needed, available } => {
                write!(f, "need {} bytes but only {} remaining", needed, available)
            }
            Self::ZeroLengthInteger => write!(f, "zero-length integer"),
            Self::IntegerOverflow => write!(f, "integer overflow"),
            Self::Integer64TooLong { length } => {
                write!(f, "integer64 too long: {} bytes", length)
            }
            Self::InvalidNull => write!(f, "NULL with non-zero length"),
            Self::InvalidIpAddressLength { length } => {
                write!(f, "IP address must be 4 bytes, got {}", length)
            }
            Self::ConstructedOctetString => {
                write!(f, "constructed OCTET STRING (0x24) not supported")
            }
            Self::UnknownVersion(v) => write!(f, "unknown SNMP version: {}", v),
            Self::UnknownPduType(t) => write!(f, "unknown PDU type: 0x{:02X}", t),
            Self::NotARequest => write!(f, "PDU is not a request"),
            Self::TrailingData { remaining } => {
                write!(f, "{} unexpected bytes after last field", remaining)
            }
        }
    }
}

/// BER encode error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeErrorKind {
    /// An OID in the message cannot be BER encoded.
    InvalidOid(OidErrorKind),
    /// Encoded message does not fit in a single datagram.
    MessageTooLarge { size: usize, max: usize },
}

impl std::fmt::Display for EncodeErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidOid(kind) => write!(f, "unencodable OID: {}", kind),
            Self::MessageTooLarge { size, max } => {
                write!(f, "message too large: {} bytes exceeds maximum {}", size, max)
            }
        }
    }
}

/// OID validation error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OidErrorKind {
    /// Empty OID (no text, or no BER content).
    Empty,
    /// Non-numeric or empty arc in dotted text.
    InvalidArc,
    /// First arc must be 0, 1, or 2.
    InvalidFirstArc(u32),
    /// Second arc too large for first arc value.
    InvalidSecondArc { first: u32, second: u32 },
    /// OID has too many arcs.
    TooManyArcs { count: usize, max: usize },
    /// Subidentifier does not fit in 32 bits.
    SubidentifierOverflow,
    /// Last subidentifier has its continuation bit set.
    TruncatedSubidentifier,
}

impl std::fmt::Display for OidErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "empty OID"),
            Self::InvalidArc => write!(f, "invalid arc value"),
            Self::InvalidFirstArc(v) => write!(f, "first arc must be 0, 1, or 2, got {}", v),
            Self::InvalidSecondArc { first, second } => {
                write!(f, "second arc {} too large for first arc {}", second, first)
            }
            Self::TooManyArcs { count, max } => {
                write!(f, "OID has {} arcs, exceeds maximum {}", count, max)
            }
            Self::SubidentifierOverflow => write!(f, "subidentifier overflow"),
            Self::TruncatedSubidentifier => write!(f, "truncated subidentifier"),
        }
    }
}

/// Library error type.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The message does not follow the BER/SNMP grammar.
    #[error("malformed PDU at offset {offset}: {kind}")]
    MalformedPdu {
        offset: usize,
        kind: DecodeErrorKind,
    },

    /// An OID could not be decoded or parsed.
    #[error("malformed OID{}: {kind}", input.as_ref().map(|i| format!(" '{}'", i)).unwrap_or_default())]
    MalformedOid {
        kind: OidErrorKind,
        input: Option<Box<str>>, // Only allocated when parsing string input
    },

    /// A custom OID entry names a type outside the supported set.
    #[error("unsupported value type '{type_tag}'")]
    UnsupportedValueType { type_tag: Box<str> },

    /// A custom OID entry's text cannot be parsed as its declared type.
    #[error("cannot parse '{value}' as {type_tag}")]
    ValueParseFailure {
        type_tag: Box<str>,
        value: Box<str>,
    },

    /// A configuration entry has the wrong shape or clashes with another, such
    /// as a custom OID element without `type` or a repeated interface index.
    #[error("invalid entry: {reason}")]
    InvalidEntry { reason: Box<str> },

    /// BER encoding error.
    #[error("encode error: {kind}")]
    Encode { kind: EncodeErrorKind },

    /// I/O error reading configuration or using the socket.
    #[error("I/O error{}: {source}", path.as_ref().map(|p| format!(" on {}", p.display())).unwrap_or_default())]
    Io {
        path: Option<PathBuf>,
        #[source]
        source: std::io::Error,
    },

    /// A configuration file is not valid JSON for its schema.
    #[error("invalid configuration in {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    /// Create a malformed PDU error.
    pub fn malformed_pdu(offset: usize, kind: DecodeErrorKind) -> Self {
        Self::MalformedPdu { offset, kind }
    }

    /// Create an encode error.
    pub fn encode(kind: EncodeErrorKind) -> Self {
        Self::Encode { kind }
    }

    /// Create a malformed OID error from a kind (no input string).
    pub fn malformed_oid(kind: OidErrorKind) -> Self {
        Self::MalformedOid { kind, input: None }
    }

    /// Create a malformed OID error with the input string that failed.
    pub fn malformed_oid_with_input(kind: OidErrorKind, input: impl Into<Box<str>>) -> Self {
        Self::MalformedOid {
            kind,
            input: Some(input.into()),
        }
    }

    /// Create a value parse error.
    pub fn value_parse(type_tag: impl Into<Box<str>>, value: impl Into<Box<str>>) -> Self {
        Self::ValueParseFailure {
            type_tag: type_tag.into(),
            value: value.into(),
        }
    }

    /// Create an invalid entry error.
    pub fn invalid_entry(reason: impl Into<Box<str>>) -> Self {
        Self::InvalidEntry {
            reason: reason.into(),
        }
    }

    /// Create an I/O error, optionally tied to a file.
    pub fn io(path: Option<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path, source }
    }

    /// Whether this error came from decoding untrusted input.
    pub fn is_decode_error(&self) -> bool {
        matches!(self, Self::MalformedPdu { .. } | Self::MalformedOid { .. })
    }
}
