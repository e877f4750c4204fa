#![deny(unsafe_code)]

//! # Over-the-Air (OTA) Update Agent
//!
//! Periodic check-and-flash: every interval the agent fetches a small text
//! file holding the latest published firmware version, compares it with the
//! version compiled into the running image and, when they differ, asks the
//! platform to download and flash the new binary.
//!
//! ## Design
//!
//! The cycle is split into three pieces, all driven from the caller's loop:
//!
//! * [`Scheduler`]: decides whether a check is due, given the current tick.
//! * [`VersionChecker`]: one HTTPS round trip to the version file, ending in a
//!   [`Decision`]. Network trouble of any kind yields "up to date".
//! * [`Updater`]: hands the firmware URL to a [`FirmwareFlasher`] and reports
//!   one of three [`UpdateOutcome`]s.
//!
//! [`OtaManager`] ties them together. TLS, flashing and timekeeping are
//! platform concerns reached through [`SecureConnect`](crate::network::tls::SecureConnect),
//! [`FirmwareFlasher`] and [`Clock`].
//!
//! ```rust,no_run
//! use libota::network::tls::TrustAnchor;
//! use libota::ota::{Config, OtaManager};
//! # use libota::network::tls::{Endpoint, SecureConnect};
//! # use libota::ota::{FirmwareFlasher, FlashRequest, UpdateOutcome};
//! # struct Tls;
//! # struct Conn;
//! # impl libota::network::Read for Conn {
//! #     type Error = ();
//! #     fn read(&mut self, _buf: &mut [u8]) -> Result<usize, Self::Error> { Ok(0) }
//! # }
//! # impl libota::network::Write for Conn {
//! #     type Error = ();
//! #     fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> { Ok(buf.len()) }
//! #     fn flush(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # impl libota::network::Close for Conn {
//! #     type Error = ();
//! #     fn close(self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # impl libota::network::Connection for Conn {}
//! # impl SecureConnect for Tls {
//! #     type Connection = Conn;
//! #     type Error = ();
//! #     fn connect(&mut self, _: &Endpoint<'_>) -> Result<Conn, ()> { Ok(Conn) }
//! # }
//! # struct Flasher;
//! # impl FirmwareFlasher for Flasher {
//! #     fn flash(&mut self, _: &FlashRequest<'_>) -> UpdateOutcome { UpdateOutcome::NoUpdates }
//! # }
//! # struct Rng;
//! # impl rand_core::RngCore for Rng {
//! #     fn next_u32(&mut self) -> u32 { 4 }
//! #     fn next_u64(&mut self) -> u64 { 4 }
//! #     fn fill_bytes(&mut self, dest: &mut [u8]) { dest.fill(4) }
//! #     fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> { dest.fill(4); Ok(()) }
//! # }
//! # const ROOT_CA: &str = "-----BEGIN CERTIFICATE-----\nMDEy\n-----END CERTIFICATE-----\n";
//! # fn millis() -> u32 { 0 }
//! let config = Config::new(
//!     "https://example.com/fw/bin_version.txt",
//!     "https://example.com/fw/firmware.bin",
//! );
//! let anchor = TrustAnchor::from_pem(ROOT_CA).unwrap();
//! let mut ota = OtaManager::new(&config, anchor, millis(), Tls, Flasher, Rng).unwrap();
//!
//! loop {
//!     ota.poll(millis());
//!     // ... rest of the idle loop
//! }
//! ```

/// Update-cycle configuration.
pub mod config;

/// Error types for the update cycle.
pub mod error;

/// Interval gate and tick sources.
pub mod scheduler;

/// Remote version check.
pub mod checker;

/// Hand-off to the platform's flasher.
pub mod updater;

/// The check-and-flash cycle.
pub mod manager;

pub use checker::{CheckReport, Decision, VersionChecker};
pub use config::{Config, DEFAULT_CHECK_INTERVAL_MS};
pub use error::Error;
pub use manager::{Cycle, OtaManager};
#[cfg(feature = "std")]
pub use scheduler::SystemClock;
pub use scheduler::{Clock, Scheduler};
pub use updater::{
    FirmwareFlasher, FlashRequest, RawFlasher, UpdateOutcome, Updater, VendorFlasher,
};
