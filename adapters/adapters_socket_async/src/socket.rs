//! Socket Module
//!
//! Types shared by every socket wrapper operation: the transport selector,
//! the opaque socket handle, the structured progress results and the error
//! type.

use std::fmt;
#[cfg(unix)]
use std::os::unix::io::{AsRawFd, RawFd};
use socket2::Type;

/// Socket error types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SocketError {
    /// The caller passed an argument the operation cannot accept
    InvalidArgument(&'static str),
    /// The stack could not allocate a socket
    Open(String),
    /// A socket option could not be applied
    SetOption {
        /// Name of the option being applied
        option: &'static str,
        /// Underlying error text
        message: String,
    },
    /// Binding to the ephemeral local port failed
    Bind(String),
    /// Connect failed with something other than "in progress"
    Connect(String),
    /// The readiness wait itself failed
    Select(String),
    /// The connection attempt ended in an error
    ConnectionFailed(String),
    /// Unexpected transmit error
    Send(String),
    /// Unexpected receive error
    Receive(String),
}

impl fmt::Display for SocketError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SocketError::InvalidArgument(what) => write!(f, "bad parameter: {}", what),
            SocketError::Open(msg) => write!(f, "create socket failed: {}", msg),
            SocketError::SetOption { option, message } => {
                write!(f, "setsockopt {} failed: {}", option, message)
            }
            SocketError::Bind(msg) => write!(f, "bind socket failed: {}", msg),
            SocketError::Connect(msg) => write!(f, "Socket connect failed, not EINPROGRESS: {}", msg),
            SocketError::Select(msg) => write!(f, "Socket select failed: {}", msg),
            SocketError::ConnectionFailed(msg) => write!(f, "Socket connection failed: {}", msg),
            SocketError::Send(msg) => write!(f, "Unexpected send error: {}", msg),
            SocketError::Receive(msg) => write!(f, "Unexpected recv error: {}", msg),
        }
    }
}

impl std::error::Error for SocketError {}

/// Socket type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocketType {
    /// Stream socket (TCP)
    Stream,
    /// Datagram socket (UDP)
    Datagram,
}

impl SocketType {
    /// Pick the socket type from a UDP flag
    pub fn from_udp_flag(is_udp: bool) -> Self {
        if is_udp {
            SocketType::Datagram
        } else {
            SocketType::Stream
        }
    }

    /// Whether this is a datagram (UDP) socket
    pub fn is_udp(&self) -> bool {
        *self == SocketType::Datagram
    }
}

impl From<SocketType> for Type {
    fn from(ty: SocketType) -> Self {
        match ty {
            SocketType::Stream => Type::STREAM,
            SocketType::Datagram => Type::DGRAM,
        }
    }
}

/// Outcome of a single send or receive call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transfer {
    /// Nothing could move right now; try again later
    WouldBlock,
    /// This many bytes were moved (may be fewer than requested)
    Bytes(usize),
}

impl Transfer {
    /// Number of bytes moved, with `WouldBlock` counting as zero
    pub fn count(&self) -> usize {
        match self {
            Transfer::WouldBlock => 0,
            Transfer::Bytes(n) => *n,
        }
    }

    /// Whether the call hit a would-block condition
    pub fn is_would_block(&self) -> bool {
        matches!(self, Transfer::WouldBlock)
    }
}

/// Progress of a non-blocking connect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectStatus {
    /// Handshake still running; poll again later
    InProgress,
    /// Connection established
    Connected,
}

impl ConnectStatus {
    /// Whether the connection is established
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectStatus::Connected)
    }
}

/// Handle to a socket created by the wrapper
///
/// Owned by the caller until it is handed back to `destroy`, which consumes
/// it. The wrapped value is whatever the network stack uses to identify a
/// socket.
#[derive(Debug)]
pub struct SocketAsyncHandle<T>(T);

impl<T> SocketAsyncHandle<T> {
    pub(crate) fn new(socket: T) -> Self {
        Self(socket)
    }

    /// Get the stack-level socket
    pub fn as_inner(&self) -> &T {
        &self.0
    }

    pub(crate) fn into_inner(self) -> T {
        self.0
    }
}

#[cfg(unix)]
impl<T: AsRawFd> AsRawFd for SocketAsyncHandle<T> {
    fn as_raw_fd(&self) -> RawFd {
        self.0.as_raw_fd()
    }
}
