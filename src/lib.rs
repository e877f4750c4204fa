//! # libota - periodic OTA firmware updates
//!
//! A small `no_std` library that keeps an embedded device on the latest
//! published firmware. From the device's idle loop it periodically polls a
//! remote text file for a version string, compares it with the version
//! compiled into the running image and, when they differ, hands the firmware
//! binary URL to the platform's flashing routine.
//!
//! ## Features
//!
//! ### Update cycle
//! - **Scheduler**: wraparound-safe interval gate driven by a millisecond tick
//! - **Version checker**: one HTTPS round trip with a cache-busting query,
//!   exact string comparison, fail-safe on any network error
//! - **Updater**: typed three-way outcome from the platform flasher
//!
//! ### Network
//! - Transport traits (`Read`, `Write`, `Close`, `Connection`)
//! - TLS seam with pinned root certificate and scoped sessions
//! - Fixed-buffer HTTP/1.1 client and `https://` URL parsing
//!
//! ## Usage
//!
//! Add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! libota = "0.1.0"
//! ```
//!
//! Then implement [`network::tls::SecureConnect`] on top of your TLS stack and
//! [`ota::FirmwareFlasher`] on top of your OTA partition driver, and call
//! [`ota::OtaManager::poll`] from the main loop. See the [`ota`] module for a
//! complete example.
//!
//! ## Platform Support
//!
//! This library is designed to work on:
//! - Embedded microcontrollers (ESP32, ARM Cortex-M, RISC-V, etc.)
//! - Linux-based devices
//! - Any platform supporting Rust's `core` library
//!
//! ## Optional Features
//!
//! - `std`: `std::error::Error` impls and an `Instant`-based clock
//! - `defmt`: send log output to `defmt` instead of the `log` facade

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(missing_docs)]
#![warn(missing_debug_implementations)]

#[macro_use]
mod fmt;

/// Network abstraction layer: transport traits, TLS seam and HTTP client.
pub mod network;

/// Periodic check-and-flash update cycle.
pub mod ota;

/// Identity of the running firmware.
pub mod version;

pub use version::FIRMWARE_VERSION;
