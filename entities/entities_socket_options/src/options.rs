//! Socket Options Module
//!
//! Keep-alive configuration for TCP connections. The record is owned and
//! filled in by the caller; socket creation only reads it.

/// Keep-alive value meaning "leave the system keep-alive settings untouched"
pub const KEEP_ALIVE_SYSTEM_DEFAULT: i32 = -1;

/// Keep-alive options for a TCP socket
///
/// A negative `keep_alive` leaves the stack's keep-alive behavior as it is.
/// Any non-negative value turns keep-alive on and applies the three timers
/// below.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SocketAsyncOptions {
    /// Keep-alive switch (negative = system default, otherwise enabled)
    pub keep_alive: i32,
    /// Seconds of idle time before the first probe
    pub keep_idle: u32,
    /// Seconds between probes
    pub keep_interval: u32,
    /// Unanswered probes before the connection is dropped
    pub keep_count: u32,
}

impl SocketAsyncOptions {
    /// Options that leave keep-alive at the system defaults
    pub fn system_default() -> Self {
        Self {
            keep_alive: KEEP_ALIVE_SYSTEM_DEFAULT,
            keep_idle: 0,
            keep_interval: 0,
            keep_count: 0,
        }
    }

    /// Options that enable keep-alive with the given timers
    ///
    /// # Arguments
    ///
    /// * `idle` - Seconds of idle time before the first probe
    /// * `interval` - Seconds between probes
    /// * `count` - Unanswered probes before the connection is dropped
    pub fn with_keep_alive(idle: u32, interval: u32, count: u32) -> Self {
        Self {
            keep_alive: 1,
            keep_idle: idle,
            keep_interval: interval,
            keep_count: count,
        }
    }

    /// Whether these options ask for keep-alive to be configured
    pub fn keep_alive_enabled(&self) -> bool {
        self.keep_alive >= 0
    }
}

impl Default for SocketAsyncOptions {
    fn default() -> Self {
        Self::system_default()
    }
}
