//! Error types for the update cycle.

use crate::network;

/// Errors surfaced while setting up or interpreting an update cycle.
///
/// None of these abort a running device: the manager logs them and treats the
/// cycle as "no update".
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// The configuration is unusable (bad URL, zero interval, malformed JSON).
    InvalidConfig,
    /// The flashing routine returned a result code outside its documented set.
    UnknownUpdateResult(i32),
    /// A network-layer failure.
    Network(network::error::Error),
}

impl From<network::error::Error> for Error {
    fn from(error: network::error::Error) -> Self {
        Error::Network(error)
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::InvalidConfig => f.write_str("invalid OTA configuration"),
            Error::UnknownUpdateResult(code) => {
                write!(f, "unknown firmware update result {}", code)
            }
            Error::Network(error) => write!(f, "network: {}", error),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::InvalidConfig => defmt::write!(f, "InvalidConfig"),
            Error::UnknownUpdateResult(code) => defmt::write!(f, "UnknownUpdateResult({})", code),
            Error::Network(error) => defmt::write!(f, "Network({})", error),
        }
    }
}
