//! HTTP/1.1 protocol implementation for embedded systems.
//!
//! This module provides a lightweight HTTP client implementation designed specifically
//! for embedded systems and `no_std` environments. It focuses on simplicity,
//! predictable memory usage, and compatibility with resource-constrained devices.
//!
//! # Features
//!
//! - Synchronous request/response model
//! - Fixed-size buffers for predictable memory usage
//! - `GET` requests with custom headers
//! - Bodies delimited by `Content-Length`, chunked transfer coding or connection close
//! - `https://` URL parsing for building requests
//!
//! # Usage
//!
//! The main entry point is the [`client::Client`] which works with any connection
//! type implementing the [`crate::network::Connection`] trait.
//!
//! ```rust,no_run
//! use libota::network::application::http::{Client, Url};
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
//! let url = Url::parse("https://example.com/bin_version.txt").unwrap();
//! let mut client = Client::new(MockConnection);
//! let target: heapless::String<128> = url.request_target(None).unwrap();
//!
//! // let response = client.get(url.host, target.as_str())?;
//! ```

/// HTTP client implementation and supporting types.
///
/// Contains the main [`Client`](client::Client) struct and all related types
/// for making HTTP requests and handling responses.
pub mod client;

/// `https://` URL parsing.
pub mod url;

pub use client::{Client, Header, Request, Response, STATUS_OK};
pub use url::Url;
