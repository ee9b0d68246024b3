//! Network Stack Module
//!
//! The seam between the socket wrapper and whatever actually implements
//! sockets. Each method maps onto a single primitive of the underlying stack
//! and reports failures as `io::Error`, so the wrapper can classify errno
//! values the same way for every stack.
//!
//! [`OsNetworkStack`] is the implementation backed by the operating system,
//! built on `socket2` with `libc::select` for the zero-timeout readiness check.

use std::io;
use std::net::{IpAddr, SocketAddrV4};

use super::socket::SocketType;

/// Readiness reported by a zero-timeout wait on a connecting socket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Readiness {
    /// Socket is in the write set
    pub writable: bool,
    /// Socket is in the error set
    pub error: bool,
}

/// Socket primitives provided by a network stack
#[cfg_attr(test, mockall::automock(type Socket = u32;))]
pub trait NetworkStack {
    /// Stack-level socket object
    type Socket;

    /// Allocate an IPv4 socket of the given type
    fn open(&self, socket_type: SocketType) -> io::Result<Self::Socket>;

    /// Turn `SO_KEEPALIVE` on or off
    fn set_keep_alive(&self, socket: &Self::Socket, enable: bool) -> io::Result<()>;

    /// Set `TCP_KEEPIDLE` in seconds
    fn set_keep_alive_idle(&self, socket: &Self::Socket, seconds: u32) -> io::Result<()>;

    /// Set `TCP_KEEPINTVL` in seconds
    fn set_keep_alive_interval(&self, socket: &Self::Socket, seconds: u32) -> io::Result<()>;

    /// Set `TCP_KEEPCNT`
    fn set_keep_alive_count(&self, socket: &Self::Socket, count: u32) -> io::Result<()>;

    /// Put the socket in non-blocking mode
    fn set_nonblocking(&self, socket: &Self::Socket) -> io::Result<()>;

    /// Bind to a local address
    fn bind(&self, socket: &Self::Socket, addr: SocketAddrV4) -> io::Result<()>;

    /// Start a connect to a remote address
    fn connect(&self, socket: &Self::Socket, addr: SocketAddrV4) -> io::Result<()>;

    /// Check write and error readiness without waiting
    fn poll_connect(&self, socket: &Self::Socket) -> io::Result<Readiness>;

    /// Address of the connected peer (`getpeername`)
    ///
    /// Fails with `NotConnected` when a connect attempt has ended in an error.
    fn peer_addr(&self, socket: &Self::Socket) -> io::Result<SocketAddrV4>;

    /// Fetch and clear the pending socket error (`SO_ERROR`)
    fn take_error(&self, socket: &Self::Socket) -> io::Result<Option<io::Error>>;

    /// Transmit once
    fn send(&self, socket: &Self::Socket, buf: &[u8]) -> io::Result<usize>;

    /// Receive once
    fn recv(&self, socket: &Self::Socket, buf: &mut [u8]) -> io::Result<usize>;

    /// Release the socket
    fn close(&self, socket: Self::Socket);

    /// Resolve a host name
    fn lookup_host(&self, hostname: &str) -> io::Result<Vec<IpAddr>>;
}

/// Whether an error means a non-blocking call could not complete yet
pub fn is_would_block(err: &io::Error) -> bool {
    // EAGAIN and EWOULDBLOCK both map here
    err.kind() == io::ErrorKind::WouldBlock
}

/// Whether a connect error means the handshake is still running
pub fn is_in_progress(err: &io::Error) -> bool {
    // Some stacks report a pending non-blocking connect as would-block
    is_einprogress(err) || is_would_block(err)
}

#[cfg(unix)]
fn is_einprogress(err: &io::Error) -> bool {
    err.raw_os_error() == Some(libc::EINPROGRESS)
}

#[cfg(not(unix))]
fn is_einprogress(_err: &io::Error) -> bool {
    false
}

#[cfg(unix)]
pub use os::OsNetworkStack;

#[cfg(unix)]
mod os {
    use std::io::{self, Read};
    use std::mem;
    use std::net::{IpAddr, SocketAddrV4, ToSocketAddrs};
    use std::os::unix::io::AsRawFd;
    use std::ptr;

    use socket2::{Domain, SockAddr, Socket, Type};

    use super::{NetworkStack, Readiness};
    use crate::socket::SocketType;

    #[cfg(any(target_os = "macos", target_os = "ios"))]
    const TCP_KEEPIDLE: libc::c_int = libc::TCP_KEEPALIVE;
    #[cfg(not(any(target_os = "macos", target_os = "ios")))]
    const TCP_KEEPIDLE: libc::c_int = libc::TCP_KEEPIDLE;

    /// Set a single `IPPROTO_TCP` integer option
    fn set_tcp_option(socket: &Socket, option: libc::c_int, value: u32) -> io::Result<()> {
        let value = libc::c_int::try_from(value).map_err(|_| {
            io::Error::new(io::ErrorKind::InvalidInput, "option value out of range")
        })?;

        // SAFETY: value outlives the call and the length matches its type
        let ret = unsafe {
            libc::setsockopt(
                socket.as_raw_fd(),
                libc::IPPROTO_TCP,
                option,
                &value as *const libc::c_int as *const libc::c_void,
                mem::size_of::<libc::c_int>() as libc::socklen_t,
            )
        };
        if ret != 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }

    /// Network stack backed by the operating system's sockets
    #[derive(Debug, Clone, Copy, Default)]
    pub struct OsNetworkStack;

    impl NetworkStack for OsNetworkStack {
        type Socket = Socket;

        fn open(&self, socket_type: SocketType) -> io::Result<Socket> {
            let ty: Type = socket_type.into();
            Socket::new(Domain::IPV4, ty, None)
        }

        fn set_keep_alive(&self, socket: &Socket, enable: bool) -> io::Result<()> {
            socket.set_keepalive(enable)
        }

        fn set_keep_alive_idle(&self, socket: &Socket, seconds: u32) -> io::Result<()> {
            set_tcp_option(socket, TCP_KEEPIDLE, seconds)
        }

        fn set_keep_alive_interval(&self, socket: &Socket, seconds: u32) -> io::Result<()> {
            set_tcp_option(socket, libc::TCP_KEEPINTVL, seconds)
        }

        fn set_keep_alive_count(&self, socket: &Socket, count: u32) -> io::Result<()> {
            set_tcp_option(socket, libc::TCP_KEEPCNT, count)
        }

        fn set_nonblocking(&self, socket: &Socket) -> io::Result<()> {
            socket.set_nonblocking(true)
        }

        fn bind(&self, socket: &Socket, addr: SocketAddrV4) -> io::Result<()> {
            socket.bind(&SockAddr::from(addr))
        }

        fn connect(&self, socket: &Socket, addr: SocketAddrV4) -> io::Result<()> {
            socket.connect(&SockAddr::from(addr))
        }

        fn poll_connect(&self, socket: &Socket) -> io::Result<Readiness> {
            let fd = socket.as_raw_fd();
            if fd < 0 || fd as usize >= libc::FD_SETSIZE as usize {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "descriptor out of range for select",
                ));
            }

            // SAFETY: fd is checked against FD_SETSIZE and both sets live on
            // this stack frame for the whole call.
            unsafe {
                let mut write_set: libc::fd_set = mem::zeroed();
                let mut error_set: libc::fd_set = mem::zeroed();
                libc::FD_ZERO(&mut write_set);
                libc::FD_ZERO(&mut error_set);
                libc::FD_SET(fd, &mut write_set);
                libc::FD_SET(fd, &mut error_set);

                let mut timeout = libc::timeval {
                    tv_sec: 0,
                    tv_usec: 0,
                };
                let ret = libc::select(
                    fd + 1,
                    ptr::null_mut(),
                    &mut write_set,
                    &mut error_set,
                    &mut timeout,
                );
                if ret < 0 {
                    return Err(io::Error::last_os_error());
                }

                Ok(Readiness {
                    writable: libc::FD_ISSET(fd, &write_set),
                    error: libc::FD_ISSET(fd, &error_set),
                })
            }
        }

        fn peer_addr(&self, socket: &Socket) -> io::Result<SocketAddrV4> {
            socket.peer_addr()?.as_socket_ipv4().ok_or_else(|| {
                io::Error::new(io::ErrorKind::InvalidData, "peer is not an IPv4 address")
            })
        }

        fn take_error(&self, socket: &Socket) -> io::Result<Option<io::Error>> {
            socket.take_error()
        }

        fn send(&self, socket: &Socket, buf: &[u8]) -> io::Result<usize> {
            socket.send(buf)
        }

        fn recv(&self, socket: &Socket, buf: &mut [u8]) -> io::Result<usize> {
            let mut reader: &Socket = socket;
            reader.read(buf)
        }

        fn close(&self, socket: Socket) {
            drop(socket);
        }

        fn lookup_host(&self, hostname: &str) -> io::Result<Vec<IpAddr>> {
            Ok((hostname, 0)
                .to_socket_addrs()?
                .map(|addr| addr.ip())
                .collect())
        }
    }

}
