//! Adapters Layer: Non-blocking Socket Wrapper
//!
//! Provides the small, uniform, non-blocking TCP/UDP socket API that TLS and
//! transport layers build on. The same calls behave identically whether the
//! sockets come from a full operating-system stack or from a lightweight
//! embedded stack.
//!
//! ## Overview
//!
//! The `adapters_socket_async` crate provides:
//! - **Socket creation**: non-blocking open, keep-alive setup, ephemeral bind and connect
//! - **Connect polling**: zero-timeout check for connect completion
//! - **Send / receive**: single calls that report would-block as a normal result
//! - **Name resolution**: IPv4 lookup that never fails loudly
//! - **Stack seam**: the [`NetworkStack`] trait, with [`OsNetworkStack`] on Unix
//!
//! ## Usage
//!
//! ```rust,no_run
//! use adapters_socket_async::{ConnectStatus, SocketAsync, SocketType, Transfer};
//!
//! let sockets = SocketAsync::new();
//! let ip = sockets.get_ipv4("example.com");
//! let handle = sockets.create(ip, 80, SocketType::Stream, None).unwrap();
//!
//! while sockets.is_create_complete(&handle).unwrap() == ConnectStatus::InProgress {
//!     // Do other work, then poll again
//! }
//!
//! let request = b"HEAD / HTTP/1.0\r\n\r\n";
//! let mut sent = 0;
//! while sent < request.len() {
//!     sent += sockets.send(&handle, &request[sent..]).unwrap().count();
//! }
//!
//! let mut buf = [0u8; 512];
//! if let Transfer::Bytes(n) = sockets.receive(&handle, &mut buf).unwrap() {
//!     println!("{}", String::from_utf8_lossy(&buf[..n]));
//! }
//!
//! sockets.destroy(handle);
//! ```
//!
//! ## Architecture
//!
//! This crate is part of the adapters layer in the CLEAN architecture implementation.
//! It depends on:
//! - `entities_socket_options`: Keep-alive options and option capability bits
//!
//! ## See Also
//!
//! - [`entities_socket_options`](../entities_socket_options/index.html): Options consumed by `create`

pub mod socket;
pub mod socket_async;
pub mod stack;

pub use entities_socket_options::{SocketAsyncOptions, TlsioOptionBits};
pub use socket::{ConnectStatus, SocketAsyncHandle, SocketError, SocketType, Transfer};
pub use socket_async::SocketAsync;
pub use stack::{is_in_progress, is_would_block, NetworkStack, Readiness};
#[cfg(unix)]
pub use stack::OsNetworkStack;
