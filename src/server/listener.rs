// Listener module
// Creates the TCP listener the accept loop runs on

use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::TcpListener;

/// Create a `TcpListener` bound to `addr` with `SO_REUSEADDR` enabled.
///
/// `SO_REUSEADDR` allows rebinding a port still in `TIME_WAIT` after a
/// quick process restart. A port held by a live process still fails to
/// bind, which surfaces as a fatal startup error.
pub fn bind_listener(addr: std::net::SocketAddr) -> std::io::Result<TcpListener> {
    let domain = if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;
    socket.set_reuse_address(true)?;

    // Non-blocking mode for async compatibility
    socket.set_nonblocking(true)?;

    socket.bind(&addr.into())?;
    socket.listen(128)?;

    let std_listener: std::net::TcpListener = socket.into();
    TcpListener::from_std(std_listener)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bind_on_ephemeral_port() {
        let listener = bind_listener("127.0.0.1:0".parse().unwrap()).expect("bind succeeds");
        let addr = listener.local_addr().expect("local addr");
        assert!(addr.port() > 0);
    }

    #[tokio::test]
    async fn test_bind_conflict_is_an_error() {
        let first = bind_listener("127.0.0.1:0".parse().unwrap()).expect("bind succeeds");
        let addr = first.local_addr().expect("local addr");
        // Second bind on the same live port must fail
        assert!(bind_listener(addr).is_err());
    }
}
