//! Option Capability Bits
//!
//! Bitmask vocabulary used by socket and TLS adapters to advertise which
//! extended options they accept, so callers can query every adapter the
//! same way regardless of its feature set.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Set of supported extended options
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TlsioOptionBits(u32);

impl TlsioOptionBits {
    /// No extended options
    pub const NONE: TlsioOptionBits = TlsioOptionBits(0x00);
    /// Trusted certificate bundle
    pub const TRUSTED_CERTS: TlsioOptionBits = TlsioOptionBits(0x01);
    /// X.509 client certificate with RSA key
    pub const X509_RSA_CERT: TlsioOptionBits = TlsioOptionBits(0x02);
    /// X.509 client certificate with ECC key
    pub const X509_ECC_CERT: TlsioOptionBits = TlsioOptionBits(0x04);

    /// Build from raw bits
    pub fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Get the raw bits
    pub fn bits(&self) -> u32 {
        self.0
    }

    /// Whether every bit in `other` is also set here
    pub fn contains(&self, other: TlsioOptionBits) -> bool {
        self.0 & other.0 == other.0
    }

    /// Whether no bit is set
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl BitOr for TlsioOptionBits {
    type Output = TlsioOptionBits;

    fn bitor(self, rhs: TlsioOptionBits) -> TlsioOptionBits {
        TlsioOptionBits(self.0 | rhs.0)
    }
}

impl BitOrAssign for TlsioOptionBits {
    fn bitor_assign(&mut self, rhs: TlsioOptionBits) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for TlsioOptionBits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TlsioOptionBits({:#04x})", self.0)
    }
}
