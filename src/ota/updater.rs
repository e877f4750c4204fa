//! Hand-off to the platform's firmware flasher.
//!
//! Downloading the image, writing the update partition, switching the boot
//! slot and rebooting all belong to the platform. The updater only tells it
//! where the image lives and what to trust, then reports one of three
//! outcomes. There is no retry here; the next scheduled check is the retry.

use super::config::Config;
use super::error::Error;
use crate::network::application::http::Url;
use crate::network::tls::{Endpoint, TlsOptions, TrustAnchor};
use heapless::String;

/// Longest failure message kept in an [`UpdateOutcome`].
pub const MAX_MESSAGE_LEN: usize = 128;

/// Result of one flashing attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The flasher gave up; the running firmware is unchanged.
    Failed {
        /// Platform error code.
        code: i32,
        /// Platform error description, truncated to [`MAX_MESSAGE_LEN`].
        message: String<MAX_MESSAGE_LEN>,
    },
    /// The server had nothing newer to offer.
    NoUpdates,
    /// The image was written; the flasher takes care of the reboot.
    Updated,
}

impl UpdateOutcome {
    /// Vendor result code for a failed update.
    pub const RAW_FAILED: i32 = 0;
    /// Vendor result code for "no update available".
    pub const RAW_NO_UPDATES: i32 = 1;
    /// Vendor result code for a successful update.
    pub const RAW_OK: i32 = 2;

    /// A failure with `message` cut to fit at a character boundary.
    pub fn failed(code: i32, message: &str) -> Self {
        let mut end = message.len().min(MAX_MESSAGE_LEN);
        while !message.is_char_boundary(end) {
            end -= 1;
        }
        let mut text = String::new();
        // Cannot overflow: `end` is within capacity.
        let _ = text.push_str(&message[..end]);
        UpdateOutcome::Failed {
            code,
            message: text,
        }
    }

    /// Maps a vendor three-way result code.
    ///
    /// `error_code` and `message` are only used for [`Self::RAW_FAILED`]. Any
    /// other code is rejected rather than guessed at.
    pub fn from_raw(result: i32, error_code: i32, message: &str) -> Result<Self, Error> {
        match result {
            Self::RAW_FAILED => Ok(Self::failed(error_code, message)),
            Self::RAW_NO_UPDATES => Ok(UpdateOutcome::NoUpdates),
            Self::RAW_OK => Ok(UpdateOutcome::Updated),
            other => Err(Error::UnknownUpdateResult(other)),
        }
    }

    /// Whether a new image was installed.
    pub fn is_updated(&self) -> bool {
        *self == UpdateOutcome::Updated
    }
}

/// Everything the flasher needs for one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlashRequest<'a> {
    /// Full `https://` URL of the firmware image.
    pub url: &'a str,
    /// The same URL, parsed.
    pub location: Url<'a>,
    /// Host, port, trust anchor and timeouts for the download.
    pub endpoint: Endpoint<'a>,
    /// The firmware currently running, for servers that answer "no update".
    pub current_version: &'a str,
    /// Whether to reboot into the new image right after writing it.
    pub reboot_on_success: bool,
}

/// The platform's firmware update routine.
pub trait FirmwareFlasher {
    /// Downloads and installs the image described by `request`.
    fn flash(&mut self, request: &FlashRequest<'_>) -> UpdateOutcome;
}

/// A vendor flashing routine that reports through integer codes.
///
/// Wrap it in [`VendorFlasher`] to get a [`FirmwareFlasher`].
pub trait RawFlasher {
    /// Runs the update; returns one of the `UpdateOutcome::RAW_*` codes.
    fn update(&mut self, request: &FlashRequest<'_>) -> i32;
    /// Error code of the last failed update.
    fn last_error(&self) -> i32;
    /// Description of the last failed update.
    fn last_error_message(&self) -> &str;
}

/// Adapts a [`RawFlasher`] to [`FirmwareFlasher`].
///
/// An unrecognised result code is logged and reported as a failure carrying
/// that code.
#[derive(Debug)]
pub struct VendorFlasher<T> {
    inner: T,
}

impl<T: RawFlasher> VendorFlasher<T> {
    /// Wraps `inner`.
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    /// The wrapped routine.
    pub fn inner(&self) -> &T {
        &self.inner
    }

    /// Unwraps the routine.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T: RawFlasher> FirmwareFlasher for VendorFlasher<T> {
    fn flash(&mut self, request: &FlashRequest<'_>) -> UpdateOutcome {
        let result = self.inner.update(request);
        match UpdateOutcome::from_raw(
            result,
            self.inner.last_error(),
            self.inner.last_error_message(),
        ) {
            Ok(outcome) => outcome,
            Err(error) => {
                error!("{}", error);
                UpdateOutcome::failed(result, "unknown update result")
            }
        }
    }
}

/// Triggers the flasher for the configured firmware image.
#[derive(Debug, Clone)]
pub struct Updater<'a> {
    url: &'a str,
    location: Url<'a>,
    trust_anchor: TrustAnchor<'a>,
    options: TlsOptions,
    current_version: &'a str,
    reboot_on_success: bool,
}

impl<'a> Updater<'a> {
    /// An updater for the image at `firmware_url`.
    pub fn new(
        firmware_url: &'a str,
        current_version: &'a str,
        trust_anchor: TrustAnchor<'a>,
    ) -> Result<Self, Error> {
        Ok(Self {
            url: firmware_url,
            location: Url::parse(firmware_url)?,
            trust_anchor,
            options: TlsOptions::default(),
            current_version,
            reboot_on_success: true,
        })
    }

    /// Builds an updater from the firmware URL, timeouts and reboot flag in `config`.
    pub fn from_config(config: &Config<'a>, trust_anchor: TrustAnchor<'a>) -> Result<Self, Error> {
        config.firmware_endpoint()?;
        Ok(Self::new(config.firmware_url, config.current_version, trust_anchor)?
            .with_options(config.tls_options())
            .with_reboot_on_success(config.reboot_on_success))
    }

    /// Replaces the TLS timeouts.
    pub fn with_options(mut self, options: TlsOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets whether the flasher reboots right after a successful write.
    pub fn with_reboot_on_success(mut self, reboot: bool) -> Self {
        self.reboot_on_success = reboot;
        self
    }

    /// The firmware image URL.
    pub fn url(&self) -> &'a str {
        self.url
    }

    /// Runs one flashing attempt and logs its outcome.
    pub fn run<F: FirmwareFlasher + ?Sized>(&self, flasher: &mut F) -> UpdateOutcome {
        info!("starting firmware update from {}", self.url);

        let request = FlashRequest {
            url: self.url,
            location: self.location,
            endpoint: Endpoint {
                host: self.location.host,
                port: self.location.port,
                trust_anchor: self.trust_anchor,
                options: self.options,
            },
            current_version: self.current_version,
            reboot_on_success: self.reboot_on_success,
        };

        let outcome = flasher.flash(&request);
        match &outcome {
            UpdateOutcome::Failed { code, message } => {
                error!(
                    "firmware update failed: error ({}) {}",
                    code,
                    message.as_str()
                );
            }
            UpdateOutcome::NoUpdates => info!("firmware update: server reports no update"),
            UpdateOutcome::Updated => info!("firmware update written, handing over to the new image"),
        }
        outcome
    }
}
