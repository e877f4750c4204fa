//! Mock platform collaborators shared by the integration tests.

#![allow(dead_code)]

use libota::network::error::Error;
use libota::network::tls::{Endpoint, SecureConnect, TlsOptions};
use libota::network::{Close, Connection, Read, Write};
use libota::ota::{FirmwareFlasher, FlashRequest, RawFlasher, UpdateOutcome};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::sync::Once;

pub const ROOT_CA: &str = "-----BEGIN CERTIFICATE-----\n\
                           AAECAwQFBgcICQoLDA0ODxAREhMUFRYXGBkaGxwdHh8gISIjJCUmJygpKissLS4v\n\
                           MDEy\n\
                           -----END CERTIFICATE-----\n";

pub const VERSION_URL: &str = "https://fw.example.com/fw/bin_version.txt";
pub const FIRMWARE_URL: &str = "https://fw.example.com/fw/esp32_led_strip.bin";

// -------------------------
// Scripted connection
// -------------------------

/// Shared view of what happened on the wire, kept after the connection is gone.
#[derive(Debug, Default, Clone)]
pub struct Wire {
    written: Rc<RefCell<Vec<u8>>>,
    closes: Rc<Cell<usize>>,
}

impl Wire {
    pub fn written(&self) -> String {
        String::from_utf8_lossy(&self.written.borrow()).into_owned()
    }

    pub fn closes(&self) -> usize {
        self.closes.get()
    }
}

/// Replays a canned response, optionally in small pieces or failing mid-way.
#[derive(Debug)]
pub struct ScriptedConnection {
    incoming: Vec<u8>,
    pos: usize,
    chunk: usize,
    fail_after: Option<usize>,
    wire: Wire,
}

impl ScriptedConnection {
    pub fn new(incoming: &[u8]) -> Self {
        Self {
            incoming: incoming.to_vec(),
            pos: 0,
            chunk: usize::MAX,
            fail_after: None,
            wire: Wire::default(),
        }
    }

    /// Deliver at most `chunk` bytes per read.
    pub fn with_chunk(mut self, chunk: usize) -> Self {
        self.chunk = chunk.max(1);
        self
    }

    /// Fail every read once `bytes` have been delivered.
    pub fn failing_after(mut self, bytes: usize) -> Self {
        self.fail_after = Some(bytes);
        self
    }

    pub fn with_wire(mut self, wire: Wire) -> Self {
        self.wire = wire;
        self
    }

    pub fn wire(&self) -> Wire {
        self.wire.clone()
    }
}

impl Read for ScriptedConnection {
    type Error = Error;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        if let Some(limit) = self.fail_after {
            if self.pos >= limit {
                return Err(Error::ReadError);
            }
        }
        let remaining = self.incoming.len() - self.pos;
        let mut n = buf.len().min(remaining).min(self.chunk);
        if let Some(limit) = self.fail_after {
            n = n.min(limit - self.pos);
        }
        buf[..n].copy_from_slice(&self.incoming[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

impl Write for ScriptedConnection {
    type Error = Error;

    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.wire.written.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl Close for ScriptedConnection {
    type Error = Error;

    fn close(self) -> Result<(), Self::Error> {
        self.wire.closes.set(self.wire.closes.get() + 1);
        Ok(())
    }
}

impl Connection for ScriptedConnection {}

pub fn http_response(status: u16, reason: &str, body: &[u8]) -> Vec<u8> {
    let mut out = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\n\r\n",
        status,
        reason,
        body.len()
    )
    .into_bytes();
    out.extend_from_slice(body);
    out
}

pub fn close_delimited_response(status: u16, reason: &str, body: &[u8]) -> Vec<u8> {
    let mut out = format!("HTTP/1.1 {} {}\r\nConnection: close\r\n\r\n", status, reason).into_bytes();
    out.extend_from_slice(body);
    out
}

pub fn chunked_response(status: u16, reason: &str, chunks: &[&[u8]]) -> Vec<u8> {
    let mut out =
        format!("HTTP/1.1 {} {}\r\nTransfer-Encoding: chunked\r\n\r\n", status, reason).into_bytes();
    for chunk in chunks {
        out.extend_from_slice(format!("{:x}\r\n", chunk.len()).as_bytes());
        out.extend_from_slice(chunk);
        out.extend_from_slice(b"\r\n");
    }
    out.extend_from_slice(b"0\r\n\r\n");
    out
}

// -------------------------
// TLS connector mock
// -------------------------

#[derive(Debug, Clone)]
pub enum Script {
    Respond(Vec<u8>),
    RespondThenFail(Vec<u8>, usize),
    Refuse,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeenEndpoint {
    pub host: String,
    pub port: u16,
    pub options: TlsOptions,
    pub trust_anchor_pem: String,
}

#[derive(Debug, Default)]
pub struct MockConnector {
    scripts: VecDeque<Script>,
    pub endpoints: Vec<SeenEndpoint>,
    pub wire: Wire,
}

impl MockConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, status: u16, reason: &str, body: &str) -> Self {
        self.scripts
            .push_back(Script::Respond(http_response(status, reason, body.as_bytes())));
        self
    }

    pub fn script(mut self, script: Script) -> Self {
        self.scripts.push_back(script);
        self
    }
}

impl SecureConnect for MockConnector {
    type Connection = ScriptedConnection;
    type Error = Error;

    fn connect(&mut self, endpoint: &Endpoint<'_>) -> Result<Self::Connection, Self::Error> {
        self.endpoints.push(SeenEndpoint {
            host: endpoint.host.to_string(),
            port: endpoint.port,
            options: endpoint.options,
            trust_anchor_pem: endpoint.trust_anchor.pem().to_string(),
        });
        match self.scripts.pop_front().unwrap_or(Script::Refuse) {
            Script::Respond(bytes) => {
                Ok(ScriptedConnection::new(&bytes).with_chunk(97).with_wire(self.wire.clone()))
            }
            Script::RespondThenFail(bytes, after) => Ok(ScriptedConnection::new(&bytes)
                .failing_after(after)
                .with_wire(self.wire.clone())),
            Script::Refuse => Err(Error::ConnectionRefused),
        }
    }
}

// -------------------------
// Flasher mocks
// -------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeenFlash {
    pub url: String,
    pub host: String,
    pub port: u16,
    pub current_version: String,
    pub reboot_on_success: bool,
    pub trust_anchor_pem: String,
}

impl SeenFlash {
    fn from_request(request: &FlashRequest<'_>) -> Self {
        Self {
            url: request.url.to_string(),
            host: request.endpoint.host.to_string(),
            port: request.endpoint.port,
            current_version: request.current_version.to_string(),
            reboot_on_success: request.reboot_on_success,
            trust_anchor_pem: request.endpoint.trust_anchor.pem().to_string(),
        }
    }
}

#[derive(Debug)]
pub struct MockFlasher {
    outcome: UpdateOutcome,
    pub requests: Vec<SeenFlash>,
}

impl MockFlasher {
    pub fn new(outcome: UpdateOutcome) -> Self {
        Self {
            outcome,
            requests: Vec::new(),
        }
    }
}

impl FirmwareFlasher for MockFlasher {
    fn flash(&mut self, request: &FlashRequest<'_>) -> UpdateOutcome {
        self.requests.push(SeenFlash::from_request(request));
        self.outcome.clone()
    }
}

/// Vendor-style routine reporting through integer codes.
#[derive(Debug)]
pub struct MockRawFlasher {
    pub result: i32,
    pub error: i32,
    pub message: String,
    pub calls: usize,
}

impl RawFlasher for MockRawFlasher {
    fn update(&mut self, _request: &FlashRequest<'_>) -> i32 {
        self.calls += 1;
        self.result
    }

    fn last_error(&self) -> i32 {
        self.error
    }

    fn last_error_message(&self) -> &str {
        &self.message
    }
}

// -------------------------
// RNG
// -------------------------

/// Always yields the same word.
#[derive(Debug)]
pub struct FixedRng(pub u32);

impl rand_core::RngCore for FixedRng {
    fn next_u32(&mut self) -> u32 {
        self.0
    }

    fn next_u64(&mut self) -> u64 {
        self.0 as u64
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        dest.fill(self.0 as u8);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

// -------------------------
// Log capture
// -------------------------

struct CaptureLogger;

thread_local! {
    static RECORDS: RefCell<Vec<(log::Level, String)>> = const { RefCell::new(Vec::new()) };
}

impl log::Log for CaptureLogger {
    fn enabled(&self, _metadata: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        RECORDS.with(|records| {
            records
                .borrow_mut()
                .push((record.level(), record.args().to_string()))
        });
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger;
static INIT: Once = Once::new();

/// Installs the capturing logger and forgets anything this thread logged so far.
pub fn capture_logs() {
    INIT.call_once(|| {
        log::set_logger(&LOGGER).expect("logger already installed");
        log::set_max_level(log::LevelFilter::Trace);
    });
    RECORDS.with(|records| records.borrow_mut().clear());
}

/// Lines logged on this thread at `level` or more severe.
pub fn logged_at_least(level: log::Level) -> Vec<String> {
    RECORDS.with(|records| {
        records
            .borrow()
            .iter()
            .filter(|(l, _)| *l <= level)
            .map(|(_, line)| line.clone())
            .collect()
    })
}
