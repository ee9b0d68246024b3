//! Entities Layer: Socket Options
//!
//! Plain data shared between the TLS/transport layer and the non-blocking
//! socket wrapper in `adapters_socket_async`.
//!
//! ## Modules
//!
//! - **[`options`](options/index.html)**: Caller-owned keep-alive configuration
//!   handed to socket creation.
//! - **[`option_bits`](option_bits/index.html)**: Capability bits a socket
//!   wrapper reports for the extended TLS options it understands.
//!
//! ## Usage
//!
//! ```rust
//! use entities_socket_options::{SocketAsyncOptions, TlsioOptionBits};
//!
//! // Probe after 30s idle, every 5s, give up after 3 missed probes
//! let options = SocketAsyncOptions::with_keep_alive(30, 5, 3);
//! assert!(options.keep_alive_enabled());
//!
//! let caps = TlsioOptionBits::TRUSTED_CERTS | TlsioOptionBits::X509_ECC_CERT;
//! assert!(caps.contains(TlsioOptionBits::TRUSTED_CERTS));
//! ```
//!
//! ## See Also
//!
//! - [`adapters_socket_async`](../adapters_socket_async/index.html): The socket wrapper consuming these types

pub mod option_bits;
pub mod options;

pub use option_bits::TlsioOptionBits;
pub use options::{SocketAsyncOptions, KEEP_ALIVE_SYSTEM_DEFAULT};
