use crate::network::error::Error;
use core::fmt::Write;
use heapless::String;

const HTTPS_SCHEME: &str = "https://";
const HTTPS_PORT: u16 = 443;

/// The parts of an `https://` URL needed to issue a request.
///
/// Borrowed from the original string; nothing is copied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Url<'a> {
    /// Host name, without port.
    pub host: &'a str,
    /// TCP port, 443 unless given explicitly.
    pub port: u16,
    /// Absolute path, `/` when the URL has none.
    pub path: &'a str,
    /// Query string without the leading `?`, if non-empty.
    pub query: Option<&'a str>,
}

impl<'a> Url<'a> {
    /// Parses `https://host[:port][/path][?query][#fragment]`.
    ///
    /// Other schemes and user-info are rejected. The fragment is dropped.
    pub fn parse(url: &'a str) -> Result<Self, Error> {
        let rest = url.strip_prefix(HTTPS_SCHEME).ok_or(Error::InvalidUrl)?;

        let (authority, tail) = match rest.find(['/', '?', '#']) {
            Some(i) => rest.split_at(i),
            None => (rest, ""),
        };

        let tail = match tail.split_once('#') {
            Some((before, _fragment)) => before,
            None => tail,
        };
        let (path, query) = match tail.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (tail, None),
        };
        let path = if path.is_empty() { "/" } else { path };
        let query = query.filter(|q| !q.is_empty());

        let (host, port) = match authority.rsplit_once(':') {
            Some((host, port)) => (
                host,
                port.parse::<u16>().map_err(|_| Error::InvalidUrl)?,
            ),
            None => (authority, HTTPS_PORT),
        };

        if host.is_empty() || host.contains(['@', ' ', '[', ']']) || port == 0 {
            return Err(Error::InvalidUrl);
        }

        Ok(Self {
            host,
            port,
            path,
            query,
        })
    }

    /// Builds the request-target (path and query) for the request line.
    ///
    /// With `nonce`, a cache-busting parameter is appended: `?<nonce>` when the
    /// URL has no query, `&<nonce>` when it does.
    pub fn request_target<const N: usize>(&self, nonce: Option<u32>) -> Result<String<N>, Error> {
        let mut target = String::new();
        target.push_str(self.path).map_err(|_| Error::BufferTooSmall)?;
        if let Some(query) = self.query {
            target.push('?').map_err(|_| Error::BufferTooSmall)?;
            target.push_str(query).map_err(|_| Error::BufferTooSmall)?;
        }
        if let Some(nonce) = nonce {
            let separator = if self.query.is_some() { '&' } else { '?' };
            write!(target, "{}{}", separator, nonce).map_err(|_| Error::BufferTooSmall)?;
        }
        Ok(target)
    }

    /// Value for the `Host` header: the host, plus the port when it is not 443.
    pub fn authority<const N: usize>(&self) -> Result<String<N>, Error> {
        let mut authority = String::new();
        authority.push_str(self.host).map_err(|_| Error::BufferTooSmall)?;
        if self.port != HTTPS_PORT {
            write!(authority, ":{}", self.port).map_err(|_| Error::BufferTooSmall)?;
        }
        Ok(authority)
    }
}
