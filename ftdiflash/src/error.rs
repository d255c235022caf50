//! Error types for ftdiflash.

use std::io;
use thiserror::Error;

/// Result type for ftdiflash operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for ftdiflash operations.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error (file operations).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The D2XX driver reported a non-success status.
    #[cfg(feature = "ftdi")]
    #[error("Transport error: {0:?}")]
    Ftdi(libftd2xx::FtStatus),

    /// A USB transfer did not complete within the driver timeout.
    #[cfg(feature = "ftdi")]
    #[error("Transport timeout: {0}")]
    FtdiTimeout(#[from] libftd2xx::TimeoutError),

    /// Backend-agnostic transport failure.
    #[error("Transport error: {0}")]
    Transport(String),

    /// A command was attempted while the busy bit was set.
    ///
    /// The engine polls until busy clears before issuing the next command,
    /// so observing this mid-sequence indicates a protocol violation.
    #[error("Device is busy")]
    DeviceBusy,

    /// The write-enable latch did not read back as set after WREN.
    #[error("Write enable latch not set")]
    WriteEnableNotSet,

    /// The transport transferred a different byte count than requested.
    #[error("Data length mismatch: expected {expected} bytes, got {actual}")]
    LengthMismatch {
        /// Byte count requested from the transport.
        expected: usize,
        /// Byte count the transport reported transferring.
        actual: usize,
    },

    /// Requested operation exceeds the device capacity.
    #[error("Memory size exceeded: requested {requested} bytes, capacity is {capacity}")]
    SizeExceeded {
        /// Requested transfer size in bytes.
        requested: usize,
        /// Device capacity in bytes.
        capacity: usize,
    },

    /// A busy-wait loop exceeded the configured poll limit.
    ///
    /// Only reachable when a poll limit is configured in
    /// [`DeviceParams`](crate::DeviceParams); polling is unbounded by default.
    #[error("Device did not become ready within {polls} status polls")]
    PollLimitExceeded {
        /// Number of status polls performed before giving up.
        polls: u32,
    },
}

#[cfg(feature = "ftdi")]
impl From<libftd2xx::FtStatus> for Error {
    fn from(status: libftd2xx::FtStatus) -> Self {
        Self::Ftdi(status)
    }
}
