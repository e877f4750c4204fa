//! Remote version check.
//!
//! One check is one HTTPS round trip: open a verified session, `GET` the
//! version file with a cache-busting query, trim the body and compare it
//! byte-for-byte with the running version. Anything short of a `200 OK` is
//! reported as "up to date" so a flaky network never forces a flash.

use super::config::Config;
use super::error::Error;
use crate::network;
use crate::network::application::http::{Client, Response, Url};
use crate::network::tls::{Endpoint, SecureConnect, Session, TlsOptions, TrustAnchor};
use heapless::String;
use rand_core::RngCore;

/// Longest remote version kept in a [`CheckReport`].
pub const MAX_VERSION_LEN: usize = 64;

const MAX_TARGET_LEN: usize = 512;
const MAX_AUTHORITY_LEN: usize = 128;

/// Outcome of comparing the running version with the published one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Decision {
    /// The published version equals the running one, or it could not be fetched.
    UpToDate = 0,
    /// The published version differs from the running one.
    UpdateAvailable = 1,
}

impl Decision {
    /// Compares a raw payload with the running version.
    ///
    /// Surrounding ASCII whitespace is stripped from `remote`; everything else
    /// must match exactly. There is no case folding and no ordering, so an
    /// older or malformed remote version also counts as different.
    pub fn compare(current: &str, remote: &[u8]) -> Self {
        if remote.trim_ascii() == current.as_bytes() {
            Decision::UpToDate
        } else {
            Decision::UpdateAvailable
        }
    }

    /// Whether the updater should run.
    pub fn is_update_available(self) -> bool {
        self == Decision::UpdateAvailable
    }
}

impl From<Decision> for u8 {
    fn from(decision: Decision) -> Self {
        decision as u8
    }
}

/// Details of one version check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    /// HTTP status of the version request; `None` if no response arrived.
    pub status: Option<u16>,
    /// Trimmed published version, when it was received and fits.
    pub remote_version: Option<String<MAX_VERSION_LEN>>,
    /// The resulting decision.
    pub decision: Decision,
}

impl CheckReport {
    fn no_response() -> Self {
        Self {
            status: None,
            remote_version: None,
            decision: Decision::UpToDate,
        }
    }
}

/// Fetches the published version and compares it with the running one.
#[derive(Debug, Clone)]
pub struct VersionChecker<'a> {
    url: Url<'a>,
    current_version: &'a str,
    trust_anchor: TrustAnchor<'a>,
    options: TlsOptions,
    cache_bust: bool,
}

impl<'a> VersionChecker<'a> {
    /// A checker with default timeouts and cache busting on.
    pub fn new(url: Url<'a>, current_version: &'a str, trust_anchor: TrustAnchor<'a>) -> Self {
        Self {
            url,
            current_version,
            trust_anchor,
            options: TlsOptions::default(),
            cache_bust: true,
        }
    }

    /// Builds a checker from the version URL, running version, timeouts and
    /// cache-busting flag in `config`.
    pub fn from_config(config: &Config<'a>, trust_anchor: TrustAnchor<'a>) -> Result<Self, Error> {
        Ok(Self::new(config.version_endpoint()?, config.current_version, trust_anchor)
            .with_options(config.tls_options())
            .with_cache_bust(config.cache_bust))
    }

    /// Replaces the TLS timeouts.
    pub fn with_options(mut self, options: TlsOptions) -> Self {
        self.options = options;
        self
    }

    /// Turns the cache-busting query parameter on or off.
    pub fn with_cache_bust(mut self, cache_bust: bool) -> Self {
        self.cache_bust = cache_bust;
        self
    }

    /// The version this checker compares against.
    pub fn current_version(&self) -> &'a str {
        self.current_version
    }

    /// Runs one check and returns only the decision.
    pub fn check<S, R>(&self, connector: &mut S, rng: &mut R) -> Decision
    where
        S: SecureConnect,
        R: RngCore + ?Sized,
    {
        self.check_report(connector, rng).decision
    }

    /// Runs one check and returns what was observed along the way.
    pub fn check_report<S, R>(&self, connector: &mut S, rng: &mut R) -> CheckReport
    where
        S: SecureConnect,
        R: RngCore + ?Sized,
    {
        let response = match self.fetch(connector, rng) {
            Ok(response) => response,
            Err(error) => {
                warn!("version check failed: {}", error);
                return CheckReport::no_response();
            }
        };

        if !response.is_ok() {
            warn!(
                "error in downloading version file: HTTP {}",
                response.status_code
            );
            return CheckReport {
                status: Some(response.status_code),
                remote_version: None,
                decision: Decision::UpToDate,
            };
        }

        let remote = response.body.trim_ascii();
        let remote_str = core::str::from_utf8(remote).ok();
        let decision = Decision::compare(self.current_version, remote);
        match decision {
            Decision::UpToDate => {
                info!(
                    "device already on latest firmware version {}",
                    self.current_version
                );
            }
            Decision::UpdateAvailable => {
                info!(
                    "new firmware detected: {} (running {})",
                    remote_str.unwrap_or("<non-UTF-8 payload>"),
                    self.current_version
                );
            }
        }

        CheckReport {
            status: Some(response.status_code),
            remote_version: remote_str.and_then(|s| String::try_from(s).ok()),
            decision,
        }
    }

    fn fetch<S, R>(&self, connector: &mut S, rng: &mut R) -> Result<Response, network::error::Error>
    where
        S: SecureConnect,
        R: RngCore + ?Sized,
    {
        // Non-negative, fits an `i32`.
        let nonce = self.cache_bust.then(|| rng.next_u32() & 0x7FFF_FFFF);
        let target: String<MAX_TARGET_LEN> = self.url.request_target(nonce)?;
        let authority: String<MAX_AUTHORITY_LEN> = self.url.authority()?;
        debug!("GET https://{}{}", authority.as_str(), target.as_str());

        let endpoint = Endpoint {
            host: self.url.host,
            port: self.url.port,
            trust_anchor: self.trust_anchor,
            options: self.options,
        };
        let session = Session::open(connector, &endpoint)?;

        // Dropping the client on an early return closes the session.
        let mut client = Client::new(session);
        let response = client.get(&authority, &target)?;
        if client.close().is_err() {
            debug!("closing version session failed");
        }
        Ok(response)
    }
}
