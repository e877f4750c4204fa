//! Update-cycle configuration.
//!
//! A [`Config`] can be built in code with [`Config::new`] or provisioned as
//! JSON and parsed with [`Config::from_json`]. All strings are borrowed from
//! the caller, so a configuration stored in flash needs no copies:
//!
//! ```json
//! {
//!   "version_url": "https://example.com/fw/bin_version.txt",
//!   "firmware_url": "https://example.com/fw/firmware.bin",
//!   "check_interval_ms": 60000
//! }
//! ```

use super::error::Error;
use crate::network::application::http::Url;
use crate::network::tls::{DEFAULT_CONNECT_TIMEOUT_MS, DEFAULT_READ_TIMEOUT_MS, TlsOptions};
use serde::Deserialize;

/// How often the remote version file is polled, in milliseconds.
pub const DEFAULT_CHECK_INTERVAL_MS: u32 = 60_000;

/// Settings for the periodic check-and-flash cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Config<'a> {
    /// `https://` URL of the plain-text file holding the published version.
    pub version_url: &'a str,
    /// `https://` URL of the firmware image handed to the flasher.
    pub firmware_url: &'a str,
    /// Identity of the running firmware; compiled-in version unless overridden.
    #[serde(default = "crate::version::firmware_version")]
    pub current_version: &'a str,
    /// Minimum time between two version checks.
    #[serde(default = "default_check_interval_ms")]
    pub check_interval_ms: u32,
    /// Connect and handshake timeout passed to the TLS stack.
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u32,
    /// Read timeout passed to the TLS stack.
    #[serde(default = "default_read_timeout_ms")]
    pub read_timeout_ms: u32,
    /// Append a random query parameter to the version URL to defeat caches.
    #[serde(default = "default_true")]
    pub cache_bust: bool,
    /// Ask the flasher to reboot into the new image once it is written.
    #[serde(default = "default_true")]
    pub reboot_on_success: bool,
}

fn default_check_interval_ms() -> u32 {
    DEFAULT_CHECK_INTERVAL_MS
}

fn default_connect_timeout_ms() -> u32 {
    DEFAULT_CONNECT_TIMEOUT_MS
}

fn default_read_timeout_ms() -> u32 {
    DEFAULT_READ_TIMEOUT_MS
}

fn default_true() -> bool {
    true
}

impl<'a> Config<'a> {
    /// A configuration with default timing for the two endpoints.
    pub fn new(version_url: &'a str, firmware_url: &'a str) -> Self {
        Self {
            version_url,
            firmware_url,
            current_version: crate::version::FIRMWARE_VERSION,
            check_interval_ms: DEFAULT_CHECK_INTERVAL_MS,
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
            read_timeout_ms: DEFAULT_READ_TIMEOUT_MS,
            cache_bust: true,
            reboot_on_success: true,
        }
    }

    /// Parses and validates a JSON configuration.
    ///
    /// Strings must not contain JSON escapes, since they are borrowed from `json`.
    pub fn from_json(json: &'a str) -> Result<Self, Error> {
        let (config, _) =
            serde_json_core::from_str::<Self>(json).map_err(|_| Error::InvalidConfig)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that both URLs are usable `https://` URLs, the interval is
    /// non-zero and the running version is not empty.
    pub fn validate(&self) -> Result<(), Error> {
        self.version_endpoint()?;
        self.firmware_endpoint()?;
        if self.check_interval_ms == 0 || self.current_version.trim().is_empty() {
            return Err(Error::InvalidConfig);
        }
        Ok(())
    }

    /// The parsed version URL.
    pub fn version_endpoint(&self) -> Result<Url<'a>, Error> {
        Url::parse(self.version_url).map_err(|_| Error::InvalidConfig)
    }

    /// The parsed firmware URL.
    pub fn firmware_endpoint(&self) -> Result<Url<'a>, Error> {
        Url::parse(self.firmware_url).map_err(|_| Error::InvalidConfig)
    }

    /// Timeouts to hand to the TLS stack.
    pub fn tls_options(&self) -> TlsOptions {
        TlsOptions {
            connect_timeout_ms: self.connect_timeout_ms,
            read_timeout_ms: self.read_timeout_ms,
        }
    }
}
