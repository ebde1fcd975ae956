//! Prelude module for convenient imports.
//!
//! ```rust,no_run
//! use snmp_sim::prelude::*;
//! ```
//!
//! This imports:
//! - Agent types: [`Agent`], [`MissingValue`]
//! - Store types: [`OidStore`], [`SharedStore`], [`DeviceDescription`], [`CustomOidList`]
//! - Core types: [`Oid`], [`Value`], [`VarBind`], [`Version`]
//! - Error handling: [`Error`], [`Result`]
//! - The [`oid!`] macro for constant OIDs

pub use crate::agent::{Agent, MissingValue};
pub use crate::error::{Error, Result};
pub use crate::oid::Oid;
pub use crate::store::{CustomOidList, DeviceDescription, OidStore, SharedStore, build_store};
pub use crate::value::Value;
pub use crate::varbind::VarBind;
pub use crate::version::Version;

#[doc(no_inline)]
pub use crate::oid;
