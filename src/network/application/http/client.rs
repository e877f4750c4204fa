use crate::network::error::Error;
use crate::network::{Close, Connection};
use heapless::{String, Vec};

const MAX_HEADERS: usize = 16;
const MAX_HEADER_NAME_LEN: usize = 64;
const MAX_HEADER_VALUE_LEN: usize = 256;
const MAX_REQUEST_LEN: usize = 2048;
const MAX_RESPONSE_LEN: usize = 2048;

/// Status code of a successful request.
pub const STATUS_OK: u16 = 200;

const USER_AGENT: &str = concat!("libota/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct Header {
    pub name: String<MAX_HEADER_NAME_LEN>,
    pub value: String<MAX_HEADER_VALUE_LEN>,
}

impl Header {
    /// Builds a header, failing if either part exceeds its fixed capacity.
    pub fn new(name: &str, value: &str) -> Result<Self, Error> {
        Ok(Self {
            name: String::try_from(name).map_err(|_| Error::BufferTooSmall)?,
            value: String::try_from(value).map_err(|_| Error::BufferTooSmall)?,
        })
    }
}

/// A `GET` for `path` carrying `headers`.
#[derive(Debug)]
pub struct Request<'a> {
    pub path: &'a str,
    pub headers: Vec<Header, MAX_HEADERS>,
}

#[derive(Debug)]
pub struct Response {
    pub status_code: u16,
    pub headers: Vec<Header, MAX_HEADERS>,
    pub body: Vec<u8, MAX_RESPONSE_LEN>,
}

impl Response {
    /// Whether the status is `200 OK`.
    pub fn is_ok(&self) -> bool {
        self.status_code == STATUS_OK
    }

    /// Looks up a header value, ignoring name case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|header| header.name.eq_ignore_ascii_case(name))
            .map(|header| header.value.as_str())
    }
}

#[derive(Debug)]
pub struct Client<C: Connection> {
    connection: C,
}

impl<C: Connection> Client<C> {
    pub fn new(connection: C) -> Self {
        Self { connection }
    }

    /// Gives the connection back without closing it.
    pub fn into_inner(self) -> C {
        self.connection
    }

    /// Closes the underlying connection.
    pub fn close(self) -> Result<(), Error> {
        self.connection.close().map_err(|_| Error::ConnectionClosed)
    }

    /// Issues a one-shot `GET` for `target` on `host`.
    ///
    /// Sends `Connection: close` so a response without `Content-Length` is
    /// read until the server closes the stream.
    pub fn get(&mut self, host: &str, target: &str) -> Result<Response, Error> {
        let mut headers = Vec::new();
        headers
            .push(Header::new("Host", host)?)
            .map_err(|_| Error::BufferTooSmall)?;
        headers
            .push(Header::new("Connection", "close")?)
            .map_err(|_| Error::BufferTooSmall)?;

        self.request(&Request {
            path: target,
            headers,
        })
    }

    pub fn request(&mut self, request: &Request) -> Result<Response, Error> {
        // --- Build Request ---
        let mut request_buf: Vec<u8, MAX_REQUEST_LEN> = Vec::new();

        // Request line
        request_buf
            .extend_from_slice(b"GET ")
            .map_err(|_| Error::WriteError)?;
        request_buf
            .extend_from_slice(request.path.as_bytes())
            .map_err(|_| Error::WriteError)?;
        request_buf
            .extend_from_slice(b" HTTP/1.1\r\n")
            .map_err(|_| Error::WriteError)?;

        // Headers
        let mut has_user_agent = false;
        for header in &request.headers {
            if header.name.eq_ignore_ascii_case("User-Agent") {
                has_user_agent = true;
            }
            push_header(&mut request_buf, &header.name, &header.value)?;
        }

        if !has_user_agent {
            push_header(&mut request_buf, "User-Agent", USER_AGENT)?;
        }

        request_buf
            .extend_from_slice(b"\r\n")
            .map_err(|_| Error::WriteError)?;

        // --- Send Request ---
        self.write_all(&request_buf)?;
        self.connection.flush().map_err(|_| Error::WriteError)?;

        // --- Receive Response ---
        let mut response_buf = [0u8; MAX_RESPONSE_LEN];
        let mut total_read = 0;
        let header_end_pos = loop {
            if let Some(pos) = find_slice(&response_buf[..total_read], b"\r\n\r\n") {
                break pos;
            }
            if total_read >= response_buf.len() {
                // Headers alone do not fit.
                return Err(Error::ProtocolError);
            }
            match self.connection.read(&mut response_buf[total_read..]) {
                Ok(0) if total_read > 0 => return Err(Error::ProtocolError),
                Ok(0) => return Err(Error::ConnectionClosed),
                Ok(n) => total_read += n,
                Err(_) => return Err(Error::ReadError),
            }
        };

        // --- Parse Response ---
        let body_start = header_end_pos + 4;
        let header_data = &response_buf[..header_end_pos];

        let header_str = core::str::from_utf8(header_data).map_err(|_| Error::ProtocolError)?;
        let mut lines = header_str.lines();

        // Parse status line
        let status_line = lines.next().ok_or(Error::ProtocolError)?;
        let mut status_parts = status_line.splitn(3, ' ');
        let version = status_parts.next().ok_or(Error::ProtocolError)?;
        if !version.starts_with("HTTP/") {
            return Err(Error::ProtocolError);
        }
        let status_code_str = status_parts.next().ok_or(Error::ProtocolError)?;
        let status_code = status_code_str
            .parse::<u16>()
            .map_err(|_| Error::ProtocolError)?;

        // Parse headers
        let mut response_headers: Vec<Header, MAX_HEADERS> = Vec::new();
        let mut content_length: Option<usize> = None;
        let mut chunked = false;

        for line in lines {
            if line.is_empty() {
                continue;
            }
            let mut parts = line.splitn(2, ':');
            let name = parts.next().ok_or(Error::ProtocolError)?.trim();
            let value = parts.next().ok_or(Error::ProtocolError)?.trim();

            if name.eq_ignore_ascii_case("Content-Length") {
                content_length = Some(value.parse::<usize>().map_err(|_| Error::ProtocolError)?);
            } else if name.eq_ignore_ascii_case("Transfer-Encoding") {
                // Only the last coding decides the framing.
                chunked = value
                    .rsplit(',')
                    .next()
                    .is_some_and(|coding| coding.trim().eq_ignore_ascii_case("chunked"));
            }

            // Headers that do not fit are dropped; the framing is already captured.
            let header = match (String::try_from(name), String::try_from(value)) {
                (Ok(name), Ok(value)) => Header { name, value },
                _ => {
                    debug!("dropping oversized response header {}", name);
                    continue;
                }
            };
            if response_headers.push(header).is_err() {
                debug!("dropping response header {}: header list full", name);
            }
        }

        if chunked {
            // The raw chunk stream is decoded in place of the header block.
            response_buf.copy_within(body_start..total_read, 0);
            let body = self.read_chunked(&mut response_buf, total_read - body_start)?;
            return Ok(Response {
                status_code,
                headers: response_headers,
                body,
            });
        }

        let mut body: Vec<u8, MAX_RESPONSE_LEN> =
            Vec::from_slice(&response_buf[body_start..total_read]).map_err(|_| Error::ProtocolError)?;
        match content_length {
            Some(len) => {
                if len > body.capacity() {
                    return Err(Error::BufferTooSmall);
                }
                while body.len() < len {
                    let mut temp_buf = [0; 256];
                    let read_len = core::cmp::min(len - body.len(), temp_buf.len());
                    match self.connection.read(&mut temp_buf[..read_len]) {
                        Ok(0) => return Err(Error::ConnectionClosed), // Prematurely closed
                        Ok(n) => body
                            .extend_from_slice(&temp_buf[..n])
                            .map_err(|_| Error::ProtocolError)?,
                        Err(_) => return Err(Error::ReadError),
                    }
                }
                body.truncate(len);
            }
            None => {
                // Close-delimited body.
                let mut temp_buf = [0; 256];
                loop {
                    match self.connection.read(&mut temp_buf) {
                        Ok(0) => break,
                        Ok(n) => body
                            .extend_from_slice(&temp_buf[..n])
                            .map_err(|_| Error::BufferTooSmall)?,
                        Err(_) => return Err(Error::ReadError),
                    }
                }
            }
        }

        Ok(Response {
            status_code,
            headers: response_headers,
            body,
        })
    }

    /// Reads a `Transfer-Encoding: chunked` body. `raw[..filled]` holds the
    /// bytes already received after the header block.
    fn read_chunked(
        &mut self,
        raw: &mut [u8],
        mut filled: usize,
    ) -> Result<Vec<u8, MAX_RESPONSE_LEN>, Error> {
        let mut body = Vec::new();
        loop {
            if decode_chunked(&raw[..filled], &mut body)? {
                return Ok(body);
            }
            if filled >= raw.len() {
                return Err(Error::BufferTooSmall);
            }
            match self.connection.read(&mut raw[filled..]) {
                Ok(0) => return Err(Error::ConnectionClosed),
                Ok(n) => filled += n,
                Err(_) => return Err(Error::ReadError),
            }
        }
    }

    fn write_all(&mut self, mut buf: &[u8]) -> Result<(), Error> {
        while !buf.is_empty() {
            match self.connection.write(buf) {
                Ok(0) => return Err(Error::WriteError),
                Ok(n) => buf = &buf[n..],
                Err(_) => return Err(Error::WriteError),
            }
        }
        Ok(())
    }
}

fn push_header(buf: &mut Vec<u8, MAX_REQUEST_LEN>, name: &str, value: &str) -> Result<(), Error> {
    buf.extend_from_slice(name.as_bytes())
        .map_err(|_| Error::WriteError)?;
    buf.extend_from_slice(b": ").map_err(|_| Error::WriteError)?;
    buf.extend_from_slice(value.as_bytes())
        .map_err(|_| Error::WriteError)?;
    buf.extend_from_slice(b"\r\n").map_err(|_| Error::WriteError)
}

/// Decodes a chunked stream into `body`.
///
/// Returns `Ok(false)` while the stream is still incomplete and `Ok(true)` once
/// the last chunk and the trailer section have arrived.
fn decode_chunked<const N: usize>(raw: &[u8], body: &mut Vec<u8, N>) -> Result<bool, Error> {
    body.clear();
    let mut pos = 0;
    loop {
        let Some(line_len) = find_slice(&raw[pos..], b"\r\n") else {
            return Ok(false);
        };
        let line =
            core::str::from_utf8(&raw[pos..pos + line_len]).map_err(|_| Error::ProtocolError)?;
        // Chunk extensions follow a ';'.
        let size = line.split(';').next().unwrap_or_default().trim();
        if size.is_empty() || !size.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(Error::ProtocolError);
        }
        let size = usize::from_str_radix(size, 16).map_err(|_| Error::ProtocolError)?;
        pos += line_len + 2;

        if size == 0 {
            let trailer = &raw[pos..];
            return Ok(trailer.starts_with(b"\r\n") || find_slice(trailer, b"\r\n\r\n").is_some());
        }
        if size > body.capacity() - body.len() {
            return Err(Error::BufferTooSmall);
        }
        if raw.len() - pos < size + 2 {
            return Ok(false);
        }
        if &raw[pos + size..pos + size + 2] != b"\r\n" {
            return Err(Error::ProtocolError);
        }
        body.extend_from_slice(&raw[pos..pos + size])
            .map_err(|_| Error::BufferTooSmall)?;
        pos += size + 2;
    }
}

/// Finds the first occurrence of a slice in another slice and returns its starting position.
fn find_slice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
