//! Socket Async Module
//!
//! The non-blocking socket wrapper used by TLS and transport layers. Every
//! operation makes at most one call into the network stack (plus the setup
//! calls of `create`) and turns transient conditions into successful
//! "nothing yet" results, so the caller can drive its own retry loop.
//!
//! ## Lifecycle
//!
//! 1. [`SocketAsync::create`] opens the socket and starts the connect.
//! 2. [`SocketAsync::is_create_complete`] is polled until it reports
//!    [`ConnectStatus::Connected`] or fails.
//! 3. [`SocketAsync::send`] and [`SocketAsync::receive`] move bytes, reporting
//!    [`Transfer::WouldBlock`] when nothing can move yet.
//! 4. [`SocketAsync::destroy`] releases the socket.

use std::net::{IpAddr, Ipv4Addr, SocketAddrV4};

use entities_socket_options::{SocketAsyncOptions, TlsioOptionBits};
use tracing::{debug, error, info};

use super::socket::{ConnectStatus, SocketAsyncHandle, SocketError, SocketType, Transfer};
use super::stack::{is_in_progress, is_would_block, NetworkStack};
#[cfg(unix)]
use super::stack::OsNetworkStack;

/// Non-blocking socket wrapper over a network stack
#[derive(Debug, Clone, Default)]
pub struct SocketAsync<S> {
    stack: S,
}

#[cfg(unix)]
impl SocketAsync<OsNetworkStack> {
    /// Create a wrapper over the operating system's sockets
    pub fn new() -> Self {
        Self::with_stack(OsNetworkStack)
    }
}

impl<S: NetworkStack> SocketAsync<S> {
    /// Create a wrapper over the given network stack
    pub fn with_stack(stack: S) -> Self {
        Self { stack }
    }

    /// Extended options this wrapper understands
    ///
    /// This wrapper has no TLS-level options, so the answer is always
    /// [`TlsioOptionBits::NONE`].
    pub fn get_option_caps(&self) -> TlsioOptionBits {
        TlsioOptionBits::NONE
    }

    /// Resolve `hostname` to an IPv4 address
    ///
    /// Returns the first IPv4 address found, or [`Ipv4Addr::UNSPECIFIED`] if
    /// the lookup fails or produces no IPv4 address. A failed lookup is
    /// usually lost connectivity, so it is logged at info level and never
    /// reported as an error.
    pub fn get_ipv4(&self, hostname: &str) -> Ipv4Addr {
        if hostname.is_empty() {
            info!("Failed getaddrinfo for empty hostname");
            return Ipv4Addr::UNSPECIFIED;
        }

        match self.stack.lookup_host(hostname) {
            Ok(addrs) => {
                let found = addrs.into_iter().find_map(|addr| match addr {
                    IpAddr::V4(v4) => Some(v4),
                    IpAddr::V6(_) => None,
                });
                match found {
                    Some(v4) => v4,
                    None => {
                        info!("Could not locate DNS entry for {}", hostname);
                        Ipv4Addr::UNSPECIFIED
                    }
                }
            }
            Err(e) => {
                info!("Failed getaddrinfo for {}: {}", hostname, e);
                Ipv4Addr::UNSPECIFIED
            }
        }
    }

    /// Create a non-blocking socket and start connecting it
    ///
    /// # Arguments
    ///
    /// * `ipv4` - Address of the target server
    /// * `port` - Port of the target server
    /// * `socket_type` - `Stream` for TCP, `Datagram` for UDP
    /// * `options` - Keep-alive options; ignored for UDP. `None` disables
    ///   keep-alive on TCP sockets.
    ///
    /// # Returns
    ///
    /// * `Ok(SocketAsyncHandle)` - Socket whose connect completed or is in progress
    /// * `Err(SocketError)` - Nothing was left open
    pub fn create(
        &self,
        ipv4: Ipv4Addr,
        port: u16,
        socket_type: SocketType,
        options: Option<&SocketAsyncOptions>,
    ) -> Result<SocketAsyncHandle<S::Socket>, SocketError> {
        let socket = self.stack.open(socket_type).map_err(|e| {
            error!("create socket failed: {}", e);
            SocketError::Open(e.to_string())
        })?;

        let remote = SocketAddrV4::new(ipv4, port);
        match self.configure_and_connect(&socket, remote, socket_type, options) {
            Ok(()) => Ok(SocketAsyncHandle::new(socket)),
            Err(err) => {
                error!("{}", err);
                self.stack.close(socket);
                Err(err)
            }
        }
    }

    fn configure_and_connect(
        &self,
        socket: &S::Socket,
        remote: SocketAddrV4,
        socket_type: SocketType,
        options: Option<&SocketAsyncOptions>,
    ) -> Result<(), SocketError> {
        // None of the options apply to UDP
        if !socket_type.is_udp() {
            self.apply_keep_alive(socket, options)?;
        }

        self.stack
            .set_nonblocking(socket)
            .map_err(|e| set_option_error("O_NONBLOCK", e))?;

        // Non-blocking connect needs an explicit bind to an ephemeral port
        self.stack
            .bind(socket, SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 0))
            .map_err(|e| SocketError::Bind(e.to_string()))?;

        match self.stack.connect(socket, remote) {
            Ok(()) => {
                debug!("connect to {} completed immediately", remote);
                Ok(())
            }
            Err(e) if is_in_progress(&e) => {
                debug!("connect to {} in progress", remote);
                Ok(())
            }
            Err(e) => Err(SocketError::Connect(e.to_string())),
        }
    }

    fn apply_keep_alive(
        &self,
        socket: &S::Socket,
        options: Option<&SocketAsyncOptions>,
    ) -> Result<(), SocketError> {
        let options = match options {
            Some(options) => options,
            None => {
                return self
                    .stack
                    .set_keep_alive(socket, false)
                    .map_err(|e| set_option_error("SO_KEEPALIVE", e));
            }
        };

        if !options.keep_alive_enabled() {
            // System defaults
            return Ok(());
        }

        self.stack
            .set_keep_alive(socket, true)
            .map_err(|e| set_option_error("SO_KEEPALIVE", e))?;
        self.stack
            .set_keep_alive_idle(socket, options.keep_idle)
            .map_err(|e| set_option_error("TCP_KEEPIDLE", e))?;
        self.stack
            .set_keep_alive_interval(socket, options.keep_interval)
            .map_err(|e| set_option_error("TCP_KEEPINTVL", e))?;
        self.stack
            .set_keep_alive_count(socket, options.keep_count)
            .map_err(|e| set_option_error("TCP_KEEPCNT", e))
    }

    /// Check whether the connect started by `create` has finished
    ///
    /// Never waits. A socket flagged in the error set, or one that became
    /// writable without ever getting a peer, is a failed connection. Neither
    /// check consumes socket state, so a failed connect keeps failing on
    /// every later poll.
    pub fn is_create_complete(
        &self,
        handle: &SocketAsyncHandle<S::Socket>,
    ) -> Result<ConnectStatus, SocketError> {
        let socket = handle.as_inner();
        let readiness = self.stack.poll_connect(socket).map_err(|e| {
            error!("Socket select failed: {} ({})", e, self.pending_error(socket));
            SocketError::Select(e.to_string())
        })?;

        if readiness.error {
            let pending = self.pending_error(socket);
            error!("Socket select errset non-empty: {}", pending);
            return Err(SocketError::ConnectionFailed(pending));
        }

        if !readiness.writable {
            return Ok(ConnectStatus::InProgress);
        }

        // Full stacks report a failed connect as writable; getpeername tells
        // the two apart without clearing SO_ERROR
        match self.stack.peer_addr(socket) {
            Ok(peer) => {
                debug!("connected to {}", peer);
                Ok(ConnectStatus::Connected)
            }
            Err(e) => {
                let reason = match self.stack.take_error(socket) {
                    Ok(Some(pending)) => pending.to_string(),
                    _ => e.to_string(),
                };
                error!("Socket connect failed after select: {}", reason);
                Err(SocketError::ConnectionFailed(reason))
            }
        }
    }

    fn pending_error(&self, socket: &S::Socket) -> String {
        match self.stack.take_error(socket) {
            Ok(Some(e)) | Err(e) => e.to_string(),
            Ok(None) => "no pending socket error".to_string(),
        }
    }

    /// Send bytes from `buffer`
    ///
    /// An empty buffer sends nothing and succeeds. A full send buffer yields
    /// [`Transfer::WouldBlock`]; a partial send is a normal result and the
    /// caller resubmits the rest.
    pub fn send(
        &self,
        handle: &SocketAsyncHandle<S::Socket>,
        buffer: &[u8],
    ) -> Result<Transfer, SocketError> {
        // Zero-length send is not defined the same way by every stack
        if buffer.is_empty() {
            return Ok(Transfer::Bytes(0));
        }

        match self.stack.send(handle.as_inner(), buffer) {
            Ok(sent) => Ok(Transfer::Bytes(sent)),
            Err(e) if is_would_block(&e) => Ok(Transfer::WouldBlock),
            Err(e) => {
                error!("Unexpected send error: {}", e);
                Err(SocketError::Send(e.to_string()))
            }
        }
    }

    /// Receive bytes into `buffer`
    ///
    /// An empty buffer is a caller error. No data available yields
    /// [`Transfer::WouldBlock`]; `Transfer::Bytes(0)` is passed through as the
    /// stack reports it (orderly close on TCP).
    pub fn receive(
        &self,
        handle: &SocketAsyncHandle<S::Socket>,
        buffer: &mut [u8],
    ) -> Result<Transfer, SocketError> {
        if buffer.is_empty() {
            error!("bad parameter: receive buffer is empty");
            return Err(SocketError::InvalidArgument("receive buffer is empty"));
        }

        match self.stack.recv(handle.as_inner(), buffer) {
            Ok(received) => Ok(Transfer::Bytes(received)),
            Err(e) if is_would_block(&e) => Ok(Transfer::WouldBlock),
            Err(e) => {
                error!("Unexpected recv error: {}", e);
                Err(SocketError::Receive(e.to_string()))
            }
        }
    }

    /// Release the socket
    pub fn destroy(&self, handle: SocketAsyncHandle<S::Socket>) {
        self.stack.close(handle.into_inner());
    }
}

fn set_option_error(option: &'static str, err: std::io::Error) -> SocketError {
    SocketError::SetOption {
        option,
        message: err.to_string(),
    }
}
