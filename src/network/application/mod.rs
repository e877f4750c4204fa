//! # Application Layer Network Protocols
//!
//! Protocol clients that run over any [`Connection`](crate::network::Connection),
//! including a TLS [`Session`](crate::network::tls::Session).
//!
//! ## Usage Pattern
//!
//! 1. Open a connection using your transport layer
//! 2. Wrap it with the protocol client
//! 3. Use protocol-specific methods for communication
//!
//! ```rust,no_run
//! use libota::network::application::http::Client;
//! # use libota::network::Connection;
//! # struct MockConnection;
//! # impl Connection for MockConnection {}
//! # impl libota::network::Read for MockConnection {
//! #     type Error = ();
//! #     fn read(&mut self, _buf: &mut [u8]) -> Result<usize, Self::Error> { Ok(0) }
//! # }
//! # impl libota::network::Write for MockConnection {
//! #     type Error = ();
//! #     fn write(&mut self, _buf: &[u8]) -> Result<usize, Self::Error> { Ok(0) }
//! #     fn flush(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # impl libota::network::Close for MockConnection {
//! #     type Error = ();
//! #     fn close(self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//!
//! // 1. Open connection (implementation-specific)
//! let connection = MockConnection;
//!
//! // 2. Wrap with protocol client
//! let mut client = Client::new(connection);
//!
//! // 3. Use protocol methods
//! // let response = client.get("example.com", "/bin_version.txt")?;
//! ```

/// HTTP client implementation.
///
/// Provides a simple HTTP/1.1 client suitable for embedded systems,
/// issuing `GET` requests with custom headers.
pub mod http;
