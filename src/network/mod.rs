//! A network abstraction layer for embedded systems
//!
//! The update logic never touches sockets directly. It talks to byte streams
//! through the small set of traits below, and obtains those streams from a
//! platform-provided [`tls::SecureConnect`] implementation that performs the
//! TCP connect and TLS handshake against a pinned [`tls::TrustAnchor`].

#![allow(missing_docs)]
#![deny(unsafe_code)]

/// Common error types for network operations
pub mod error;

/// TLS seam: trust anchors, connect options and the owning session handle
pub mod tls;

/// Application-layer protocol clients
pub mod application;

/// Re-exports of common traits
pub mod prelude {
    pub use super::tls::SecureConnect;
    pub use super::{Close, Connection, Read, Write};
}

/// Byte-oriented input side of a connection
pub trait Read {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Read data from the connection
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

/// Byte-oriented output side of a connection
pub trait Write {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Write data to the connection
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error>;
    /// Flush the write buffer
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// Explicit teardown of a connection
pub trait Close {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Close the connection
    fn close(self) -> Result<(), Self::Error>;
}

/// A synchronous connection
pub trait Connection: Read + Write + Close {}
