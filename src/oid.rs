//! Object Identifier (OID) type.
//!
//! OIDs are stored as `SmallVec<[u32; 16]>` to avoid heap allocation for common OIDs.

use crate::error::{Error, OidErrorKind, Result};
use smallvec::SmallVec;
use std::fmt;

/// Maximum number of arcs (subidentifiers) allowed in an OID.
///
/// Per RFC 2578 Section 3.5: "there are at most 128 sub-identifiers in a value".
pub const MAX_OID_LEN: usize = 128;

/// Object Identifier.
///
/// Stored as a sequence of arc values (u32). Immutable once built;
/// ordering is lexicographic over the arcs.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Oid {
    arcs: SmallVec<[u32; 16]>,
}

impl Oid {
    /// Create an OID from arc values.
    ///
    /// # Examples
    ///
    /// ```
    /// use snmp_sim::oid::Oid;
    ///
    /// let oid = Oid::new([1, 3, 6, 1, 2, 1]);
    /// assert_eq!(oid.arcs(), &[1, 3, 6, 1, 2, 1]);
    /// ```
    pub fn new(arcs: impl IntoIterator<Item = u32>) -> Self {
        Self {
            arcs: arcs.into_iter().collect(),
        }
    }

    /// Create an OID from a slice of arcs.
    pub fn from_slice(arcs: &[u32]) -> Self {
        Self {
            arcs: SmallVec::from_slice(arcs),
        }
    }

    /// Parse an OID from dotted string notation (e.g., "1.3.6.1.2.1.1.1.0").
    ///
    /// A single leading dot is accepted (`.1.3.6.1` as printed by net-snmp).
    /// Empty input, empty components and non-numeric components are rejected,
    /// as are OIDs whose first two arcs cannot be BER encoded.
    ///
    /// # Examples
    ///
    /// ```
    /// use snmp_sim::oid::Oid;
    ///
    /// let oid = Oid::parse("1.3.6.1.2.1.1.1.0").unwrap();
    /// assert_eq!(oid.to_string(), "1.3.6.1.2.1.1.1.0");
    ///
    /// assert_eq!(Oid::parse(".1.3.6.1").unwrap(), Oid::parse("1.3.6.1").unwrap());
    /// assert!(Oid::parse("1.3..6").is_err());
    /// assert!(Oid::parse("3.1").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let body = s.trim();
        let body = body.strip_prefix('.').unwrap_or(body);
        if body.is_empty() {
            return Err(Error::malformed_oid_with_input(OidErrorKind::Empty, s));
        }

        let mut arcs = SmallVec::new();
        for part in body.split('.') {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(Error::malformed_oid_with_input(OidErrorKind::InvalidArc, s));
            }
            let arc: u32 = part.parse().map_err(|_| {
                Error::malformed_oid_with_input(OidErrorKind::SubidentifierOverflow, s)
            })?;
            arcs.push(arc);
        }

        let oid = Self { arcs };
        oid.validate()
            .map_err(|kind| Error::malformed_oid_with_input(kind, s))?;
        Ok(oid)
    }

    /// Get the arc values.
    pub fn arcs(&self) -> &[u32] {
        &self.arcs
    }

    /// Get the number of arcs.
    pub fn len(&self) -> usize {
        self.arcs.len()
    }

    /// Check if the OID is empty.
    pub fn is_empty(&self) -> bool {
        self.arcs.is_empty()
    }

    /// Check if this OID starts with another OID.
    pub fn starts_with(&self, other: &Oid) -> bool {
        self.arcs.len() >= other.arcs.len() && self.arcs[..other.arcs.len()] == other.arcs[..]
    }

    /// Create a child OID by appending an arc.
    ///
    /// # Examples
    ///
    /// ```
    /// use snmp_sim::oid;
    ///
    /// let if_descr = oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 2);
    /// assert_eq!(if_descr.child(3).to_string(), "1.3.6.1.2.1.2.2.1.2.3");
    /// ```
    pub fn child(&self, arc: u32) -> Oid {
        let mut arcs = self.arcs.clone();
        arcs.push(arc);
        Oid { arcs }
    }

    /// Check that the OID can be BER encoded (X.690 Section 8.19.4).
    ///
    /// - at least two arcs, at most [`MAX_OID_LEN`]
    /// - arc1 must be 0, 1, or 2
    /// - arc2 must be <= 39 when arc1 is 0 or 1
    /// - `arc1 * 40 + arc2` must fit in 32 bits
    pub fn validate(&self) -> std::result::Result<(), OidErrorKind> {
        let (arc1, arc2) = match self.arcs[..] {
            [] => return Err(OidErrorKind::Empty),
            [_] => return Err(OidErrorKind::InvalidArc),
            [first, second, ..] => (first, second),
        };
        if self.arcs.len() > MAX_OID_LEN {
            return Err(OidErrorKind::TooManyArcs {
                count: self.arcs.len(),
                max: MAX_OID_LEN,
            });
        }
        if arc1 > 2 {
            return Err(OidErrorKind::InvalidFirstArc(arc1));
        }
        if arc1 < 2 && arc2 >= 40 {
            return Err(OidErrorKind::InvalidSecondArc {
                first: arc1,
                second: arc2,
            });
        }
        if (arc1 * 40).checked_add(arc2).is_none() {
            return Err(OidErrorKind::SubidentifierOverflow);
        }
        Ok(())
    }

    /// Encode to BER content octets, returning bytes in a stack-allocated buffer.
    ///
    /// OID encoding (X.690 Section 8.19):
    /// - First two arcs encoded as (arc1 * 40) + arc2 using base-128
    /// - Remaining arcs encoded as base-128 variable length
    ///
    /// Callers must have checked [`validate`](Self::validate); invalid OIDs
    /// encode to unspecified bytes.
    pub fn to_ber_smallvec(&self) -> SmallVec<[u8; 64]> {
        let mut bytes = SmallVec::new();

        if let [arc1, arc2, rest @ ..] = &self.arcs[..] {
            encode_subidentifier(&mut bytes, arc1.wrapping_mul(40).wrapping_add(*arc2));
            for &arc in rest {
                encode_subidentifier(&mut bytes, arc);
            }
        }

        bytes
    }

    /// Encode to BER content octets with validation.
    ///
    /// # Examples
    ///
    /// ```
    /// use snmp_sim::oid;
    ///
    /// assert_eq!(oid!(1, 3, 6, 1).to_ber().unwrap(), vec![0x2B, 0x06, 0x01]);
    /// assert!(oid!(3, 1).to_ber().is_err());
    /// ```
    pub fn to_ber(&self) -> Result<Vec<u8>> {
        self.validate().map_err(Error::malformed_oid)?;
        Ok(self.to_ber_smallvec().to_vec())
    }

    /// Decode from BER content octets.
    ///
    /// Empty content, a subidentifier wider than 32 bits, a dangling
    /// continuation byte and more than [`MAX_OID_LEN`] arcs are all
    /// [`Error::MalformedOid`].
    pub fn from_ber(data: &[u8]) -> Result<Self> {
        if data.is_empty() {
            return Err(Error::malformed_oid(OidErrorKind::Empty));
        }

        let mut arcs = SmallVec::new();

        // First subidentifier carries arc1*40 + arc2, possibly multi-byte when arc1=2
        let (first_subid, mut i) = decode_subidentifier(data).map_err(Error::malformed_oid)?;
        match first_subid {
            0..40 => arcs.extend([0, first_subid]),
            40..80 => arcs.extend([1, first_subid - 40]),
            _ => arcs.extend([2, first_subid - 80]),
        }

        while i < data.len() {
            let (arc, consumed) = decode_subidentifier(&data[i..]).map_err(Error::malformed_oid)?;
            arcs.push(arc);
            i += consumed;

            if arcs.len() > MAX_OID_LEN {
                return Err(Error::malformed_oid(OidErrorKind::TooManyArcs {
                    count: arcs.len(),
                    max: MAX_OID_LEN,
                }));
            }
        }

        Ok(Self { arcs })
    }
}

/// Encode a subidentifier in base-128, most significant group first.
#[inline]
fn encode_subidentifier(bytes: &mut SmallVec<[u8; 64]>, value: u32) {
    let groups = ((32 - value.leading_zeros()).max(1)).div_ceil(7);

    for i in (0..groups).rev() {
        let mut byte = ((value >> (i * 7)) & 0x7F) as u8;
        if i > 0 {
            byte |= 0x80; // Continuation bit
        }
        bytes.push(byte);
    }
}

/// Decode a subidentifier, returning (value, bytes_consumed).
fn decode_subidentifier(data: &[u8]) -> std::result::Result<(u32, usize), OidErrorKind> {
    let mut value: u32 = 0;

    for (i, &byte) in data.iter().enumerate() {
        // Another 7-bit group would push bits past 32
        if value > (u32::MAX >> 7) {
            return Err(OidErrorKind::SubidentifierOverflow);
        }
        value = (value << 7) | (byte & 0x7F) as u32;

        if byte & 0x80 == 0 {
            return Ok((value, i + 1));
        }
    }

    Err(OidErrorKind::TruncatedSubidentifier)
}

impl fmt::Debug for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Oid({})", self)
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for arc in &self.arcs {
            if !first {
                write!(f, ".")?;
            }
            write!(f, "{}", arc)?;
            first = false;
        }
        Ok(())
    }
}

impl std::str::FromStr for Oid {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl<const N: usize> From<[u32; N]> for Oid {
    fn from(arcs: [u32; N]) -> Self {
        Self::new(arcs)
    }
}

impl PartialOrd for Oid {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Oid {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.arcs.cmp(&other.arcs)
    }
}

/// Macro to create an OID from literal arcs.
///
/// # Examples
///
/// ```
/// use snmp_sim::oid;
///
/// let sys_descr = oid!(1, 3, 6, 1, 2, 1, 1, 1, 0);
/// assert_eq!(sys_descr.to_string(), "1.3.6.1.2.1.1.1.0");
/// ```
#[macro_export]
macro_rules! oid {
    ($($arc:expr),* $(,)?) => {
        $crate::oid::Oid::from_slice(&[$($arc),*])
    };
}
