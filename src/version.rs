//! Identity of the running firmware.

/// Version string of the firmware this crate was compiled into.
///
/// Set `LIBOTA_FIRMWARE_VERSION` at build time to pin the identity published
/// in the remote version file (for example `1.3.2`); otherwise the package
/// version from `Cargo.toml` is used.
pub const FIRMWARE_VERSION: &str = match option_env!("LIBOTA_FIRMWARE_VERSION") {
    Some(version) => version,
    None => env!("CARGO_PKG_VERSION"),
};

/// Returns [`FIRMWARE_VERSION`].
///
/// Used as the serde default for [`Config::current_version`](crate::ota::Config).
pub const fn firmware_version() -> &'static str {
    FIRMWARE_VERSION
}
