//! FTDI MPSSE bridge implementation using the `libftd2xx` crate.
//!
//! Drives the MPSSE engine of FT2232H/FT4232H/FT232H parts in SPI mode 0
//! with chip select on ADBUS3, active low. Chip-select bracketing is done
//! by toggling the ADBUS3 GPIO around the clocked data, which is how the
//! vendor libMPSSE library implements its chip-select transfer options.
//!
//! ## Wiring
//!
//! | ADBUS pin | SPI signal |
//! |-----------|------------|
//! | ADBUS0    | SCK        |
//! | ADBUS1    | MOSI       |
//! | ADBUS2    | MISO       |
//! | ADBUS3    | CS#        |

use {
    crate::{
        bridge::{ChannelInfo, CsOptions, SpiBridge},
        device::DeviceParams,
        error::{Error, Result},
    },
    libftd2xx::{
        ClockDataIn, ClockDataOut, Ftdi, FtdiCommon, FtdiMpsse, MpsseCmdBuilder, MpsseSettings,
    },
    log::{debug, trace},
    std::time::Duration,
};

/// ADBUS direction mask: SCK, MOSI, CS# are outputs; MISO is an input.
const PIN_DIRECTION: u8 = 0x0B;

/// ADBUS state with CS# asserted (low), SCK idle low for mode 0.
const CS_ASSERTED: u8 = 0x00;

/// ADBUS state with CS# released (high).
const CS_RELEASED: u8 = 0x08;

/// Upper-byte GPIO mask: the target board exposes 4 GPIO lines.
const GPIO_MASK: u8 = 0x0F;

/// USB read/write timeout for MPSSE command exchanges.
const USB_TIMEOUT: Duration = Duration::from_secs(5);

/// SPI bridge over an FTDI MPSSE channel.
///
/// The underlying D2XX handle is exclusively owned by this bridge and
/// released exactly once, either via [`close`](MpsseBridge::close) or on
/// drop.
pub struct MpsseBridge {
    ft: Option<Ftdi>,
    name: String,
}

impl MpsseBridge {
    /// Open channel `index` and configure it for SPI mode 0.
    ///
    /// A handle that fails MPSSE initialization is closed before the error
    /// is returned, so no half-configured channel is ever leaked.
    pub fn open(index: u32, params: &DeviceParams) -> Result<Self> {
        #[allow(clippy::cast_possible_wrap)]
        let mut ft = Ftdi::with_index(index as i32)?;

        let name = match ft.device_info() {
            Ok(info) => format!("{} ({})", info.description, info.serial_number),
            Err(_) => format!("channel {index}"),
        };
        debug!("Opened FTDI channel {index}: {name}");

        let settings = MpsseSettings {
            reset: true,
            read_timeout: USB_TIMEOUT,
            write_timeout: USB_TIMEOUT,
            latency_timer: params.latency_timer,
            mask: PIN_DIRECTION,
            clock_frequency: Some(params.clock_hz),
            ..MpsseSettings::default()
        };

        if let Err(e) = ft.initialize_mpsse(&settings) {
            let _ = ft.close();
            return Err(e.into());
        }

        // Park the bus: CS# high, SCK low.
        let idle = MpsseCmdBuilder::new().set_gpio_lower(CS_RELEASED, PIN_DIRECTION);
        if let Err(e) = ft.write_all(idle.as_slice()) {
            let _ = ft.close();
            return Err(e.into());
        }

        debug!(
            "MPSSE initialized: {} Hz, latency {:?}",
            params.clock_hz, params.latency_timer
        );
        Ok(Self { ft: Some(ft), name })
    }

    /// Close the channel and release the D2XX handle.
    ///
    /// Subsequent transfers fail with a transport error. Calling `close`
    /// more than once is a no-op.
    pub fn close(&mut self) -> Result<()> {
        if let Some(mut ft) = self.ft.take() {
            debug!("Closing FTDI channel {}", self.name);
            ft.close()?;
        }
        Ok(())
    }

    /// Read the 4 board GPIO lines (upper ADBUS byte).
    pub fn gpio_read(&mut self) -> Result<u8> {
        let ft = self.handle()?;

        // Directions to inputs, then sample the port.
        let cmd = MpsseCmdBuilder::new()
            .set_gpio_upper(0x00, 0x00)
            .gpio_upper()
            .send_immediate();
        ft.write_all(cmd.as_slice())?;

        let mut buf = [0u8; 1];
        ft.read_all(&mut buf)?;
        trace!("GPIO read: {:#04x}", buf[0] & GPIO_MASK);
        Ok(buf[0] & GPIO_MASK)
    }

    /// Drive the 4 board GPIO lines (upper ADBUS byte).
    pub fn gpio_write(&mut self, value: u8) -> Result<()> {
        let ft = self.handle()?;
        trace!("GPIO write: {:#04x}", value & GPIO_MASK);

        let cmd = MpsseCmdBuilder::new().set_gpio_upper(value & GPIO_MASK, GPIO_MASK);
        ft.write_all(cmd.as_slice())?;
        Ok(())
    }

    fn handle(&mut self) -> Result<&mut Ftdi> {
        self.ft
            .as_mut()
            .ok_or_else(|| Error::Transport("channel is closed".into()))
    }
}

impl SpiBridge for MpsseBridge {
    fn write(&mut self, data: &[u8], cs: CsOptions) -> Result<usize> {
        let ft = self.handle()?;

        let mut cmd = MpsseCmdBuilder::new();
        if cs.assert_start {
            cmd = cmd.set_gpio_lower(CS_ASSERTED, PIN_DIRECTION);
        }
        if !data.is_empty() {
            // SPI mode 0: data out on the falling edge, MSB first.
            cmd = cmd.clock_data_out(ClockDataOut::MsbNeg, data);
        }
        if cs.release_end {
            cmd = cmd.set_gpio_lower(CS_RELEASED, PIN_DIRECTION);
        }

        ft.write_all(cmd.as_slice())?;
        Ok(data.len())
    }

    fn read(&mut self, buf: &mut [u8], cs: CsOptions) -> Result<usize> {
        let ft = self.handle()?;

        let mut cmd = MpsseCmdBuilder::new();
        if cs.assert_start {
            cmd = cmd.set_gpio_lower(CS_ASSERTED, PIN_DIRECTION);
        }
        if !buf.is_empty() {
            // SPI mode 0: data in on the rising edge, MSB first.
            cmd = cmd.clock_data_in(ClockDataIn::MsbPos, buf.len());
        }
        if cs.release_end {
            cmd = cmd.set_gpio_lower(CS_RELEASED, PIN_DIRECTION);
        }
        cmd = cmd.send_immediate();

        ft.write_all(cmd.as_slice())?;
        if !buf.is_empty() {
            ft.read_all(buf)?;
        }
        Ok(buf.len())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for MpsseBridge {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

/// Number of enumerable FTDI channels.
pub fn channel_count() -> Result<u32> {
    Ok(libftd2xx::num_devices()?)
}

/// List all enumerable FTDI channels.
#[allow(clippy::cast_possible_truncation)]
pub fn list_channels() -> Result<Vec<ChannelInfo>> {
    let devices = libftd2xx::list_devices()?;
    Ok(devices
        .into_iter()
        .enumerate()
        .map(|(index, dev)| ChannelInfo {
            index: index as u32,
            description: dev.description,
            serial_number: dev.serial_number,
            vendor_id: dev.vendor_id,
            product_id: dev.product_id,
            device_type: format!("{:?}", dev.device_type),
        })
        .collect())
}
