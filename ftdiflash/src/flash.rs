//! Flash command protocol engine.
//!
//! [`Flash`] owns a bridge and issues JEDEC commands over it, enforcing the
//! device's busy/write-enable discipline:
//!
//! - a write-class command (page program, bulk erase) is only issued after
//!   a fresh status read shows the device ready, and after a write-enable
//!   command whose latch bit reads back as set;
//! - after any command that leaves the device busy, the engine polls the
//!   status register until the busy bit clears before returning.
//!
//! The engine is strictly synchronous and blocking. A bulk erase can hold
//! the calling thread for tens of seconds; polling is unbounded unless a
//! poll limit is configured in [`DeviceParams`].
//!
//! Whole-image operations (write, read back, verify) are built on top of
//! these page-level primitives in [`crate::program`].

use {
    crate::{
        bridge::{CsOptions, SpiBridge},
        device::DeviceParams,
        error::{Error, Result},
        program::Progress,
        protocol::{self, Status, opcodes},
    },
    log::{debug, info, trace},
    std::{thread, time::Duration},
};

/// Protocol engine for one JEDEC SPI NOR flash device.
///
/// Generic over the bridge type `B`, which must implement [`SpiBridge`].
/// The bridge is exclusively owned for the engine's lifetime; operations
/// must not be invoked concurrently against the same device.
pub struct Flash<B: SpiBridge> {
    bridge: B,
    params: DeviceParams,
    bit_swap: bool,
}

impl<B: SpiBridge> Flash<B> {
    /// Create an engine over an open bridge with the given parameters.
    pub fn new(bridge: B, params: DeviceParams) -> Self {
        Self {
            bridge,
            params,
            bit_swap: false,
        }
    }

    /// Enable bit-swap mode: reverse the bit order of every payload byte
    /// written to or read from the memory.
    ///
    /// Needed when the board wiring presents bits in reverse order on the
    /// bus. Command and address bytes are never swapped.
    #[must_use]
    pub fn with_bit_swap(mut self, bit_swap: bool) -> Self {
        self.bit_swap = bit_swap;
        self
    }

    /// Device parameters this engine was configured with.
    pub fn params(&self) -> &DeviceParams {
        &self.params
    }

    /// Get a reference to the underlying bridge.
    pub fn bridge(&self) -> &B {
        &self.bridge
    }

    /// Get a mutable reference to the underlying bridge.
    pub fn bridge_mut(&mut self) -> &mut B {
        &mut self.bridge
    }

    /// Consume the engine and return the underlying bridge.
    pub fn into_bridge(self) -> B {
        self.bridge
    }

    /// Read the status register.
    ///
    /// The register reflects live device state and is re-read on demand,
    /// never cached.
    pub fn read_status(&mut self) -> Result<Status> {
        self.bridge
            .write(&[opcodes::READ_STATUS], CsOptions::hold())?;

        let mut buf = [0u8; 1];
        self.bridge.read(&mut buf, CsOptions::release())?;
        trace!("Status register: {:#04x}", buf[0]);
        Ok(Status(buf[0]))
    }

    /// Set the device's write-enable latch.
    pub fn write_enable(&mut self) -> Result<()> {
        trace!("Write enable");
        self.bridge
            .write(&[opcodes::WRITE_ENABLE], CsOptions::bracketed())?;
        Ok(())
    }

    /// Clear the device's write-enable latch.
    pub fn write_disable(&mut self) -> Result<()> {
        trace!("Write disable");
        self.bridge
            .write(&[opcodes::WRITE_DISABLE], CsOptions::bracketed())?;
        Ok(())
    }

    /// Read the JEDEC ID.
    pub fn read_id(&mut self) -> Result<Vec<u8>> {
        self.bridge.write(&[opcodes::READ_ID], CsOptions::hold())?;

        let mut id = vec![0u8; self.params.id_len];
        self.bridge.read(&mut id, CsOptions::release())?;
        debug!(
            "JEDEC ID: {}",
            id.iter()
                .map(|b| format!("{b:02X}"))
                .collect::<Vec<_>>()
                .join(" ")
        );
        Ok(id)
    }

    /// Erase the entire device to the 0xFF sentinel value.
    ///
    /// Emits [`Progress::Erasing`] once the erase command has been accepted
    /// and again on every status poll while the device stays busy. Physical
    /// erase time is on the order of tens of seconds.
    pub fn bulk_erase<F>(&mut self, mut progress: F) -> Result<()>
    where
        F: FnMut(Progress),
    {
        self.ensure_ready()?;
        self.enable_write_checked()?;

        info!("Bulk erase started");
        self.bridge
            .write(&[opcodes::BULK_ERASE], CsOptions::bracketed())?;

        progress(Progress::Erasing);
        self.wait_while_busy(self.params.erase_poll_interval, || {
            progress(Progress::Erasing);
        })?;

        info!("Bulk erase complete");
        Ok(())
    }

    /// Program one page chunk at `addr`.
    ///
    /// `chunk` must not exceed the device page size; [`crate::program`]
    /// produces conforming chunks when splitting whole images.
    pub fn write_page(&mut self, addr: u32, chunk: &[u8]) -> Result<()> {
        debug_assert!(chunk.len() <= self.params.page_size);

        self.ensure_ready()?;
        self.enable_write_checked()?;

        let frame = protocol::page_program_frame(addr, chunk, self.bit_swap);
        trace!("Page program: {} bytes at {addr:#08x}", chunk.len());

        let transferred = self.bridge.write(&frame, CsOptions::bracketed())?;
        if transferred != frame.len() {
            return Err(Error::LengthMismatch {
                expected: frame.len(),
                actual: transferred,
            });
        }

        self.wait_while_busy(self.params.page_poll_interval, || {})
    }

    /// Read `buf.len()` bytes starting at `addr` into `buf`.
    ///
    /// `buf` must not exceed the device page size.
    pub fn read_page(&mut self, addr: u32, buf: &mut [u8]) -> Result<()> {
        debug_assert!(buf.len() <= self.params.page_size);

        self.ensure_ready()?;

        trace!("Read: {} bytes at {addr:#08x}", buf.len());
        self.bridge
            .write(&protocol::read_frame(addr), CsOptions::hold())?;

        let transferred = self.bridge.read(buf, CsOptions::release())?;
        if transferred != buf.len() {
            return Err(Error::LengthMismatch {
                expected: buf.len(),
                actual: transferred,
            });
        }

        if self.bit_swap {
            for byte in buf.iter_mut() {
                *byte = protocol::reverse_bits(*byte);
            }
        }
        Ok(())
    }

    /// Fail with [`Error::DeviceBusy`] unless a fresh status read shows the
    /// device ready to accept a new command.
    fn ensure_ready(&mut self) -> Result<()> {
        let status = self.read_status()?;
        if !status.ready() {
            return Err(Error::DeviceBusy);
        }
        Ok(())
    }

    /// Set the write-enable latch and confirm it actually took.
    ///
    /// The latch bit must read back as set before a program or erase opcode
    /// may be issued; a device that refuses the latch fails the whole
    /// operation with [`Error::WriteEnableNotSet`].
    fn enable_write_checked(&mut self) -> Result<()> {
        self.write_enable()?;

        let status = self.read_status()?;
        if !status.write_enabled() {
            return Err(Error::WriteEnableNotSet);
        }
        Ok(())
    }

    /// Sleep-and-poll until the device reports ready.
    ///
    /// `on_poll` runs once per poll that still finds the device busy.
    /// Unbounded unless `DeviceParams::poll_limit` is set.
    fn wait_while_busy<F>(&mut self, interval: Duration, mut on_poll: F) -> Result<()>
    where
        F: FnMut(),
    {
        let mut polls: u32 = 0;
        loop {
            if !interval.is_zero() {
                thread::sleep(interval);
            }

            let status = self.read_status()?;
            if status.ready() {
                return Ok(());
            }

            on_poll();
            polls += 1;
            if let Some(limit) = self.params.poll_limit {
                if polls >= limit {
                    return Err(Error::PollLimitExceeded { polls });
                }
            }
        }
    }
}
