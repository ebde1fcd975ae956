//! SNMP agent simulator.
//!
//! The [`Agent`] owns the UDP socket and hands every datagram to a
//! [`Responder`] built over the current store snapshot. Each datagram is
//! handled on its own task; there is no state carried between requests.
//!
//! # Example
//!
//! ```rust,no_run
//! use snmp_sim::agent::{Agent, MissingValue};
//! use snmp_sim::store::{DeviceDescription, SharedStore, build_store};
//!
//! # async fn example() -> snmp_sim::Result<()> {
//! let (store, _report) = build_store(&DeviceDescription::default(), &[]);
//!
//! let agent = Agent::builder()
//!     .bind("0.0.0.0:16162".parse().unwrap())
//!     .community(b"public")
//!     .store(SharedStore::new(store))
//!     .missing_value(MissingValue::Exception)
//!     .build()
//!     .await?;
//!
//! agent.run().await
//! # }
//! ```

mod responder;

pub use responder::{MissingValue, Responder, handle_request};

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use bytes::Bytes;
use subtle::ConstantTimeEq;
use tokio::net::UdpSocket;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::instrument;

use crate::error::{Error, Result};
use crate::message::CommunityMessage;
use crate::store::{DeviceDescription, SharedStore, build_store};
use crate::util::{bind_udp_socket, hex_dump};

/// Default port, unprivileged so the simulator runs without root.
pub const DEFAULT_PORT: u16 = 16162;

/// Receive buffer for one datagram; anything larger is truncated by the kernel.
const RECV_BUFFER_LEN: usize = 65536;

/// Builder for [`Agent`].
///
/// Defaults:
/// - Bind address: `0.0.0.0:16162`
/// - No community (every community string is accepted)
/// - Store built from the default [`DeviceDescription`]
/// - [`MissingValue::Null`]
/// - Max concurrent requests: 1000
/// - Socket receive buffer: 1 MiB (requested from the kernel)
pub struct AgentBuilder {
    bind_addr: SocketAddr,
    community: Option<Vec<u8>>,
    store: Option<SharedStore>,
    missing_value: MissingValue,
    max_concurrent_requests: Option<usize>,
    recv_buffer_size: Option<usize>,
    cancel: Option<CancellationToken>,
}

impl AgentBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            community: None,
            store: None,
            missing_value: MissingValue::default(),
            max_concurrent_requests: Some(1000),
            recv_buffer_size: Some(1024 * 1024),
            cancel: None,
        }
    }

    /// Set the UDP bind address. Use port 0 to let the OS pick one.
    pub fn bind(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    /// Only answer requests carrying this community string.
    pub fn community(mut self, community: &[u8]) -> Self {
        self.community = Some(community.to_vec());
        self
    }

    /// Serve values from this store. Swapping its contents affects requests
    /// received afterwards.
    pub fn store(mut self, store: SharedStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Set the policy for OIDs the store does not hold.
    pub fn missing_value(mut self, policy: MissingValue) -> Self {
        self.missing_value = policy;
        self
    }

    /// Limit how many requests are processed at once. `None` is unbounded.
    pub fn max_concurrent_requests(mut self, limit: Option<usize>) -> Self {
        self.max_concurrent_requests = limit;
        self
    }

    /// Set the socket receive buffer size, `None` for the kernel default.
    pub fn recv_buffer_size(mut self, size: Option<usize>) -> Self {
        self.recv_buffer_size = size;
        self
    }

    /// Set a cancellation token for graceful shutdown.
    ///
    /// If not set, the agent creates its own token accessible via `Agent::cancel()`.
    pub fn cancel(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Bind the socket and build the agent.
    pub async fn build(self) -> Result<Agent> {
        let socket = bind_udp_socket(self.bind_addr, self.recv_buffer_size)
            .map_err(|e| Error::io(None, e))?;
        let local_addr = socket.local_addr().map_err(|e| Error::io(None, e))?;

        let store = self.store.unwrap_or_else(|| {
            let (store, _) = build_store(&DeviceDescription::default(), &[]);
            SharedStore::new(store)
        });

        Ok(Agent {
            inner: Arc::new(AgentInner {
                socket,
                local_addr,
                community: self.community,
                store,
                missing_value: self.missing_value,
                concurrency_limit: self
                    .max_concurrent_requests
                    .map(|n| Arc::new(Semaphore::new(n))),
                cancel: self.cancel.unwrap_or_default(),
                stats: AgentStats::default(),
            }),
        })
    }
}

impl Default for AgentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Request counters, readable while the agent runs.
#[derive(Debug, Default)]
pub struct AgentStats {
    answered: AtomicU64,
    malformed: AtomicU64,
    bad_community: AtomicU64,
    encode_failures: AtomicU64,
}

impl AgentStats {
    /// Requests a response was sent for.
    pub fn answered(&self) -> u64 {
        self.answered.load(Ordering::Relaxed)
    }

    /// Datagrams dropped because they did not decode as a request.
    pub fn malformed(&self) -> u64 {
        self.malformed.load(Ordering::Relaxed)
    }

    /// Requests dropped for carrying the wrong community.
    pub fn bad_community(&self) -> u64 {
        self.bad_community.load(Ordering::Relaxed)
    }

    /// Requests whose response could not be encoded.
    pub fn encode_failures(&self) -> u64 {
        self.encode_failures.load(Ordering::Relaxed)
    }
}

struct AgentInner {
    socket: UdpSocket,
    local_addr: SocketAddr,
    community: Option<Vec<u8>>,
    store: SharedStore,
    missing_value: MissingValue,
    concurrency_limit: Option<Arc<Semaphore>>,
    cancel: CancellationToken,
    stats: AgentStats,
}

/// UDP agent answering GET and GETNEXT from a [`SharedStore`].
///
/// Cheap to clone; clones share the socket, store and counters.
#[derive(Clone)]
pub struct Agent {
    inner: Arc<AgentInner>,
}

impl Agent {
    /// Create a builder for configuring the agent.
    pub fn builder() -> AgentBuilder {
        AgentBuilder::new()
    }

    /// Get the local address the agent is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.inner.local_addr
    }

    /// Get the cancellation token for this agent.
    ///
    /// Call `token.cancel()` to stop [`run`](Self::run).
    pub fn cancel(&self) -> CancellationToken {
        self.inner.cancel.clone()
    }

    /// The store requests are answered from.
    pub fn store(&self) -> &SharedStore {
        &self.inner.store
    }

    pub fn stats(&self) -> &AgentStats {
        &self.inner.stats
    }

    /// Receive and answer requests until the cancellation token fires.
    ///
    /// Receive errors are logged and the loop keeps listening.
    #[instrument(skip(self), fields(snmp.local_addr = %self.local_addr()))]
    pub async fn run(&self) -> Result<()> {
        let mut buf = vec![0u8; RECV_BUFFER_LEN];
        tracing::info!(target: "snmp_sim::agent", "agent listening");

        loop {
            let (len, source) = tokio::select! {
                result = self.inner.socket.recv_from(&mut buf) => match result {
                    Ok(received) => received,
                    Err(e) => {
                        tracing::warn!(target: "snmp_sim::agent", { error = %e }, "receive failed");
                        continue;
                    }
                },
                _ = self.inner.cancel.cancelled() => {
                    tracing::info!(target: "snmp_sim::agent", "agent shutdown requested");
                    return Ok(());
                }
            };

            let data = Bytes::copy_from_slice(&buf[..len]);
            let agent = self.clone();

            let permit = match &self.inner.concurrency_limit {
                Some(sem) => match sem.clone().acquire_owned().await {
                    Ok(permit) => Some(permit),
                    Err(_) => return Ok(()),
                },
                None => None,
            };

            tokio::spawn(async move {
                if let Some(response) = agent.handle_datagram(data, source) {
                    if let Err(e) = agent.inner.socket.send_to(&response, source).await {
                        tracing::warn!(target: "snmp_sim::agent", { snmp.source = %source, error = %e }, "failed to send response");
                    }
                }
                drop(permit);
            });
        }
    }

    /// Decode, check and answer one datagram. `None` means send nothing.
    fn handle_datagram(&self, data: Bytes, source: SocketAddr) -> Option<Bytes> {
        let stats = &self.inner.stats;
        tracing::trace!(target: "snmp_sim::agent", { snmp.source = %source, bytes = %hex_dump(&data) }, "datagram received");

        let request = match CommunityMessage::decode_request(data) {
            Ok(request) => request,
            Err(e) => {
                stats.malformed.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(target: "snmp_sim::agent", { snmp.source = %source, error = %e }, "dropping malformed request");
                return None;
            }
        };

        if !self.community_matches(&request.community) {
            stats.bad_community.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(target: "snmp_sim::agent", { snmp.source = %source, snmp.version = %request.version }, "community mismatch, dropping request");
            return None;
        }

        let store = self.inner.store.snapshot();
        let response = Responder::new(&store)
            .missing_value(self.inner.missing_value)
            .respond(&request);

        for vb in &response.pdu.varbinds {
            tracing::trace!(target: "snmp_sim::agent", { snmp.oid = %vb.oid, snmp.value = %vb.value }, "resolved");
        }

        match response.encode() {
            Ok(bytes) => {
                stats.answered.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(
                    target: "snmp_sim::agent",
                    {
                        snmp.source = %source,
                        snmp.version = %request.version,
                        snmp.pdu_type = %request.pdu.pdu_type,
                        snmp.request_id = request.pdu.request_id,
                        snmp.varbind_count = request.pdu.varbinds.len(),
                    },
                    "answering request"
                );
                Some(bytes)
            }
            Err(e) => {
                stats.encode_failures.fetch_add(1, Ordering::Relaxed);
                tracing::error!(target: "snmp_sim::agent", { snmp.source = %source, snmp.request_id = request.pdu.request_id, error = %e }, "failed to encode response");
                None
            }
        }
    }

    fn community_matches(&self, community: &[u8]) -> bool {
        match &self.inner.community {
            Some(expected) => bool::from(expected.as_slice().ct_eq(community)),
            None => true,
        }
    }
}
