//! BER (Basic Encoding Rules) codec for SNMP.
//!
//! Encoding and decoding of the X.690 tag-length-value subset that SNMP v1/v2c
//! messages use. Decoding is a strict recursive descent over the buffer: every
//! TLV must fit inside its parent.

mod decode;
mod encode;
mod length;
pub mod tag;

pub use decode::*;
pub use encode::*;
pub use length::*;
