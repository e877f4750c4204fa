//! TLS seam between the update logic and the platform's TLS stack.
//!
//! The crate does not implement TLS. The platform supplies a [`SecureConnect`]
//! implementation that opens a TCP connection, performs the handshake and
//! validates the server chain against the [`TrustAnchor`] it is handed. What
//! comes back is wrapped in a [`Session`], which owns the connection and closes
//! it when dropped, so no exit path can leak the handle.

use crate::network::error::Error;
use crate::network::{Close, Connection, Read, Write};
use base64ct::{Base64, Encoding};

const PEM_BEGIN: &str = "-----BEGIN CERTIFICATE-----";
const PEM_END: &str = "-----END CERTIFICATE-----";

/// Default TCP connect timeout handed to the TLS stack.
pub const DEFAULT_CONNECT_TIMEOUT_MS: u32 = 10_000;
/// Default socket read timeout handed to the TLS stack.
pub const DEFAULT_READ_TIMEOUT_MS: u32 = 10_000;

/// A PEM-encoded root certificate used to validate server certificates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrustAnchor<'a> {
    pem: &'a str,
}

impl<'a> TrustAnchor<'a> {
    /// Wraps a PEM certificate after checking its armour.
    ///
    /// The text must contain a `BEGIN CERTIFICATE`/`END CERTIFICATE` pair with
    /// a non-empty body between them.
    pub fn from_pem(pem: &'a str) -> Result<Self, Error> {
        let body = pem_body(pem).ok_or(Error::TlsError)?;
        if body.trim().is_empty() {
            return Err(Error::TlsError);
        }
        Ok(Self { pem })
    }

    /// The certificate exactly as it was supplied, armour included.
    pub fn pem(&self) -> &'a str {
        self.pem
    }

    /// Decodes the certificate body into DER, for TLS stacks that take DER.
    ///
    /// Each PEM line is decoded on its own, so `out` is the only buffer needed.
    pub fn to_der<'o>(&self, out: &'o mut [u8]) -> Result<&'o [u8], Error> {
        let body = pem_body(self.pem).ok_or(Error::TlsError)?;
        let mut written = 0;

        for line in body.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if line.len() % 4 != 0 {
                return Err(Error::TlsError);
            }

            // A quantum carries at most two padding characters.
            let padding = line.bytes().rev().take_while(|b| *b == b'=').count();
            if padding > 2 {
                return Err(Error::TlsError);
            }
            let needed = line.len() / 4 * 3 - padding;
            if out.len() - written < needed {
                return Err(Error::BufferTooSmall);
            }

            let decoded = Base64::decode(line.as_bytes(), &mut out[written..])
                .map_err(|_| Error::TlsError)?;
            written += decoded.len();
        }

        if written == 0 {
            return Err(Error::TlsError);
        }
        Ok(&out[..written])
    }
}

/// Returns the text between the PEM armour lines.
fn pem_body(pem: &str) -> Option<&str> {
    let start = pem.find(PEM_BEGIN)? + PEM_BEGIN.len();
    let end = start + pem[start..].find(PEM_END)?;
    Some(&pem[start..end])
}

/// Timeouts the TLS stack must apply to the connection it opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TlsOptions {
    /// Upper bound for DNS, TCP connect and handshake, in milliseconds.
    pub connect_timeout_ms: u32,
    /// Upper bound for a single read, in milliseconds.
    pub read_timeout_ms: u32,
}

impl Default for TlsOptions {
    fn default() -> Self {
        Self {
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
            read_timeout_ms: DEFAULT_READ_TIMEOUT_MS,
        }
    }
}

/// Where to connect and what to trust.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint<'a> {
    /// Server host name, also used for SNI and certificate name checks.
    pub host: &'a str,
    /// Server TCP port.
    pub port: u16,
    /// Root certificate the server chain must validate against.
    pub trust_anchor: TrustAnchor<'a>,
    /// Connect and read timeouts.
    pub options: TlsOptions,
}

/// Opens TLS-verified connections.
///
/// Implemented by the platform on top of its TLS stack.
pub trait SecureConnect {
    /// The connection produced after a successful handshake.
    type Connection: Connection;
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Connect to `endpoint` and verify the server against its trust anchor.
    fn connect(&mut self, endpoint: &Endpoint<'_>) -> Result<Self::Connection, Self::Error>;
}

/// An open TLS connection that is closed when the handle goes away.
#[derive(Debug)]
pub struct Session<C: Connection> {
    inner: Option<C>,
}

impl<C: Connection> Session<C> {
    /// Opens a session through `connector`.
    ///
    /// Any connector failure (DNS, TCP, handshake, verification) is reported
    /// as [`Error::TlsError`].
    pub fn open<S>(connector: &mut S, endpoint: &Endpoint<'_>) -> Result<Self, Error>
    where
        S: SecureConnect<Connection = C>,
    {
        let connection = connector
            .connect(endpoint)
            .map_err(|_| Error::TlsError)?;
        debug!("TLS session open to {}:{}", endpoint.host, endpoint.port);
        Ok(Self {
            inner: Some(connection),
        })
    }

    /// Whether the underlying connection has not been released yet.
    pub fn is_open(&self) -> bool {
        self.inner.is_some()
    }

    fn release(&mut self) -> Result<(), Error> {
        if let Some(connection) = self.inner.take() {
            connection.close().map_err(|_| Error::ConnectionClosed)?;
            debug!("TLS session closed");
        }
        Ok(())
    }
}

impl<C: Connection> Read for Session<C> {
    type Error = Error;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        self.inner
            .as_mut()
            .ok_or(Error::NotOpen)?
            .read(buf)
            .map_err(|_| Error::ReadError)
    }
}

impl<C: Connection> Write for Session<C> {
    type Error = Error;

    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.inner
            .as_mut()
            .ok_or(Error::NotOpen)?
            .write(buf)
            .map_err(|_| Error::WriteError)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.inner
            .as_mut()
            .ok_or(Error::NotOpen)?
            .flush()
            .map_err(|_| Error::WriteError)
    }
}

impl<C: Connection> Close for Session<C> {
    type Error = Error;

    fn close(mut self) -> Result<(), Self::Error> {
        self.release()
    }
}

impl<C: Connection> Connection for Session<C> {}

impl<C: Connection> Drop for Session<C> {
    fn drop(&mut self) {
        if self.release().is_err() {
            debug!("TLS session close reported an error");
        }
    }
}
