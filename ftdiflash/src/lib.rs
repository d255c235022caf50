//! # ftdiflash
//!
//! A library for programming SPI NOR flash memories over FTDI MPSSE
//! USB-to-SPI bridges.
//!
//! This crate provides the core functionality for erasing, writing, and
//! verifying a binary image on a classic JEDEC flash part, including:
//!
//! - JEDEC command encoding (status, write enable, ID, bulk erase, page
//!   program, read)
//! - The busy/write-enable polling discipline
//! - Chunking of large transfers into page-sized operations
//! - Optional bit-order reversal for reverse-wired boards
//! - Progress reporting through caller-supplied callbacks
//!
//! ## Architecture
//!
//! The protocol engine ([`Flash`]) is generic over the [`SpiBridge`]
//! transport trait, so it can be exercised against a simulated device
//! without hardware. The `ftdi` feature (default) provides the concrete
//! [`bridge::mpsse::MpsseBridge`] backend via the `libftd2xx` crate.
//!
//! ## Example
//!
//! ```rust,no_run
//! use ftdiflash::{DeviceParams, Flash, Verify};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let image = std::fs::read("firmware.bin")?;
//!
//!     #[cfg(feature = "ftdi")]
//!     {
//!         use ftdiflash::bridge::mpsse::MpsseBridge;
//!
//!         let params = DeviceParams::default();
//!         let bridge = MpsseBridge::open(0, &params)?;
//!         let mut flash = Flash::new(bridge, params);
//!
//!         let verdict = flash.program_and_verify(&image, |event| {
//!             println!("{event:?}");
//!         })?;
//!         assert_eq!(verdict, Verify::Success);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - `ftdi` (default): FTDI MPSSE bridge backend via the D2XX driver
//! - `serde`: serialization support for channel descriptors

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bridge;
pub mod device;
pub mod error;
pub mod flash;
pub mod program;
pub mod protocol;

pub use bridge::{ChannelInfo, CsOptions, SpiBridge};
pub use device::DeviceParams;
pub use error::{Error, Result};
pub use flash::Flash;
pub use program::{ERASED_BYTE, Progress, Verify};
pub use protocol::Status;
