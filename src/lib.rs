//! SNMP agent simulator.
//!
//! `snmp-sim` answers SNMPv1 and SNMPv2c GET and GETNEXT requests over UDP
//! from pre-configured value tables describing a simulated device.
//!
//! The crate is split into a pure core and the plumbing around it:
//!
//! - [`ber`], [`oid`], [`value`], [`varbind`], [`pdu`], [`message`]: BER codec
//!   for community-based SNMP messages
//! - [`store`]: the layered OID store (system, interface, custom)
//! - [`agent`]: the request/response cycle and the UDP agent loop
//! - [`config`]: JSON configuration, device and custom OID files
//!
//! # Quick start
//!
//! ```rust,no_run
//! use snmp_sim::agent::Agent;
//! use snmp_sim::store::{DeviceDescription, SharedStore, build_store};
//!
//! #[tokio::main]
//! async fn main() -> snmp_sim::Result<()> {
//!     let (store, report) = build_store(&DeviceDescription::default(), &[]);
//!     assert!(report.is_clean());
//!
//!     let agent = Agent::builder()
//!         .bind("127.0.0.1:16162".parse().unwrap())
//!         .community(b"public")
//!         .store(SharedStore::new(store))
//!         .build()
//!         .await?;
//!     agent.run().await
//! }
//! ```
//!
//! # Answering without a socket
//!
//! [`agent::handle_request`] runs one decode/resolve/encode cycle on raw bytes:
//!
//! ```
//! use snmp_sim::agent::handle_request;
//! use snmp_sim::message::CommunityMessage;
//! use snmp_sim::pdu::Pdu;
//! use snmp_sim::store::{DeviceDescription, build_store};
//! use snmp_sim::{Value, oid};
//!
//! let (store, _) = build_store(&DeviceDescription::default(), &[]);
//! let request = CommunityMessage::v1("public", Pdu::get_request(1, &[oid!(1, 3, 6, 1, 2, 1, 1, 1, 0)]))
//!     .encode()
//!     .unwrap();
//!
//! let response = CommunityMessage::decode(handle_request(&store, &request).unwrap()).unwrap();
//! assert_eq!(response.pdu.varbinds[0].value, Value::from("Test System Description"));
//! ```

pub mod agent;
pub mod ber;
pub mod config;
pub mod error;
pub mod message;
pub mod oid;
pub mod pdu;
pub mod prelude;
pub mod store;
pub mod util;
pub mod value;
pub mod varbind;
pub mod version;

#[cfg(feature = "cli")]
pub mod cli;

pub use error::{Error, Result};
pub use oid::Oid;
pub use value::Value;
pub use varbind::VarBind;
pub use version::Version;
