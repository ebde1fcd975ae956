//! Socket setup and small helpers for the agent loop.

use std::io;
use std::net::{IpAddr, SocketAddr};

use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::UdpSocket;

/// Create and bind the agent's UDP socket.
///
/// IPv6 addresses are bound dual-stack (`IPV6_V6ONLY = false`) so `[::]`
/// also receives IPv4 requests. `SO_REUSEADDR` is set so the simulator can
/// be restarted on the same port straight away. The receive buffer size is a
/// request only; the kernel may cap it (`net.core.rmem_max` on Linux).
///
/// Must be called from within a tokio runtime.
pub(crate) fn bind_udp_socket(
    addr: SocketAddr,
    recv_buffer_size: Option<usize>,
) -> io::Result<UdpSocket> {
    let domain = Domain::for_address(addr);
    let socket = Socket::new(domain, Type::DGRAM, Some(Protocol::UDP))?;

    if addr.is_ipv6() {
        socket.set_only_v6(false)?;
    }
    socket.set_reuse_address(true)?;
    if let Some(size) = recv_buffer_size {
        // Capped, not refused, when too large
        let _ = socket.set_recv_buffer_size(size);
    }
    socket.set_nonblocking(true)?;
    socket.bind(&addr.into())?;

    UdpSocket::from_std(socket.into())
}

/// Combine a textual IP address and a port into a bind address.
///
/// ```
/// use snmp_sim::util::socket_addr;
///
/// assert_eq!(socket_addr("0.0.0.0", 16162).unwrap().to_string(), "0.0.0.0:16162");
/// assert_eq!(socket_addr("::", 161).unwrap().to_string(), "[::]:161");
/// assert!(socket_addr("localhost", 161).is_err());
/// ```
pub fn socket_addr(ip: &str, port: u16) -> io::Result<SocketAddr> {
    ip.trim()
        .parse::<IpAddr>()
        .map(|ip| SocketAddr::new(ip, port))
        .map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid IP address '{}'", ip),
            )
        })
}

/// Space separated uppercase hex, for trace-level packet dumps.
pub(crate) fn hex_dump(data: &[u8]) -> String {
    use std::fmt::Write;

    let mut out = String::with_capacity(data.len() * 3);
    for (i, byte) in data.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{:02X}", byte);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bind_ephemeral_port() {
        let socket = bind_udp_socket("127.0.0.1:0".parse().unwrap(), Some(256 * 1024)).unwrap();
        let local = socket.local_addr().unwrap();
        assert!(local.ip().is_loopback());
        assert_ne!(local.port(), 0);
    }

    #[test]
    fn test_hex_dump() {
        assert_eq!(hex_dump(&[0x30, 0x26, 0x02]), "30 26 02");
        assert_eq!(hex_dump(&[]), "");
    }
}
