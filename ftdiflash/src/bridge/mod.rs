//! Bridge abstraction for USB-to-SPI transports.
//!
//! This module provides the narrow [`SpiBridge`] contract the protocol
//! engine depends on: chip-select-bracketed byte writes and reads. The
//! design separates transport from protocol logic, so the engine in
//! [`crate::flash`] can run against a simulated device in tests.
//!
//! ```text
//! +-------------------+     +-------------------+
//! |  Protocol Engine  |     |  Protocol Engine  |
//! |  (flash, program) |     |  (flash, program) |
//! +---------+---------+     +---------+---------+
//!           |                         |
//!           v                         v
//! +---------+---------+     +---------+---------+
//! |  SpiBridge trait  |     |  SpiBridge trait  |
//! +---------+---------+     +---------+---------+
//!           |                         |
//!           v                         v
//! +---------+---------+     +---------+---------+
//! |    MpsseBridge    |     |  Simulated flash  |
//! |    (libftd2xx)    |     |     (tests)       |
//! +-------------------+     +-------------------+
//!        Hardware                 Test suite
//! ```

#[cfg(feature = "ftdi")]
pub mod mpsse;

use crate::error::Result;

/// Chip-select behavior for one transfer.
///
/// A flash transaction is delimited by asserting chip select before its
/// first byte and releasing it after its last. Multi-phase commands (read
/// status, read ID, read data) assert on the command phase and release on
/// the data phase, keeping the line held in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsOptions {
    /// Assert chip select before the first byte.
    pub assert_start: bool,
    /// Release chip select after the last byte.
    pub release_end: bool,
}

impl CsOptions {
    /// Assert at the start and release at the end: one atomic transaction.
    #[must_use]
    pub fn bracketed() -> Self {
        Self {
            assert_start: true,
            release_end: true,
        }
    }

    /// Assert at the start and keep the line held afterwards.
    #[must_use]
    pub fn hold() -> Self {
        Self {
            assert_start: true,
            release_end: false,
        }
    }

    /// Continue a held transaction and release at the end.
    #[must_use]
    pub fn release() -> Self {
        Self {
            assert_start: false,
            release_end: true,
        }
    }
}

/// Narrow transport contract for SPI byte transfers.
///
/// Implementations perform blocking, chip-select-bracketed transfers and
/// report the number of bytes actually moved so the engine can detect
/// truncated transfers.
pub trait SpiBridge {
    /// Clock out `data`, returning the number of bytes transferred.
    fn write(&mut self, data: &[u8], cs: CsOptions) -> Result<usize>;

    /// Clock in `buf.len()` bytes, returning the number of bytes read.
    fn read(&mut self, buf: &mut [u8], cs: CsOptions) -> Result<usize>;

    /// Human-readable channel name for diagnostics.
    fn name(&self) -> &str;
}

/// Descriptor for one enumerable SPI channel.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ChannelInfo {
    /// Channel index as used by `open`.
    pub index: u32,
    /// USB device description string.
    pub description: String,
    /// USB serial number.
    pub serial_number: String,
    /// USB vendor ID.
    pub vendor_id: u16,
    /// USB product ID.
    pub product_id: u16,
    /// FTDI device type (e.g. "FT2232H").
    pub device_type: String,
}
