//! Device parameters for the target flash memory and SPI channel.
//!
//! All engine constants live here instead of process-wide statics so that
//! tests can run the protocol engine against alternate geometries (small
//! pages, tiny capacities) without touching real hardware.

use std::time::Duration;

/// Geometry and timing parameters for one flash device.
///
/// The defaults describe the original target part: a 4 MiB JEDEC NOR flash
/// programmed in 256-byte pages over a 10 MHz SPI clock.
#[derive(Debug, Clone)]
pub struct DeviceParams {
    /// Total capacity in bytes.
    pub capacity: usize,
    /// Page program / read chunk size in bytes.
    pub page_size: usize,
    /// Length of the JEDEC ID response in bytes.
    pub id_len: usize,
    /// SPI clock rate in Hz.
    pub clock_hz: u32,
    /// USB latency timer.
    pub latency_timer: Duration,
    /// Delay between status polls after a page program.
    pub page_poll_interval: Duration,
    /// Delay between status polls during a bulk erase.
    pub erase_poll_interval: Duration,
    /// Optional upper bound on status polls per busy-wait loop.
    ///
    /// `None` (the default) matches the physical device timing: the engine
    /// waits as long as the part stays busy. Bulk erase can take tens of
    /// seconds. Set a limit when running against simulated devices that
    /// might never clear the busy bit.
    pub poll_limit: Option<u32>,
}

impl Default for DeviceParams {
    fn default() -> Self {
        Self {
            capacity: 4 * 1024 * 1024,
            page_size: 256,
            id_len: 3,
            clock_hz: 10_000_000,
            latency_timer: Duration::from_millis(16),
            page_poll_interval: Duration::from_millis(1),
            erase_poll_interval: Duration::from_millis(500),
            poll_limit: None,
        }
    }
}

impl DeviceParams {
    /// Set the total capacity in bytes.
    #[must_use]
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Set the page size in bytes.
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set the SPI clock rate in Hz.
    #[must_use]
    pub fn with_clock_hz(mut self, clock_hz: u32) -> Self {
        self.clock_hz = clock_hz;
        self
    }

    /// Bound every busy-wait loop to at most `polls` status reads.
    #[must_use]
    pub fn with_poll_limit(mut self, polls: u32) -> Self {
        self.poll_limit = Some(polls);
        self
    }

    /// Disable poll delays entirely (useful for simulated devices in tests).
    #[must_use]
    pub fn without_poll_delays(mut self) -> Self {
        self.page_poll_interval = Duration::ZERO;
        self.erase_poll_interval = Duration::ZERO;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_params_match_target_part() {
        let params = DeviceParams::default();
        assert_eq!(params.capacity, 4_194_304);
        assert_eq!(params.page_size, 256);
        assert_eq!(params.id_len, 3);
        assert_eq!(params.clock_hz, 10_000_000);
        assert_eq!(params.latency_timer, Duration::from_millis(16));
        assert_eq!(params.page_poll_interval, Duration::from_millis(1));
        assert_eq!(params.erase_poll_interval, Duration::from_millis(500));
        assert!(params.poll_limit.is_none());
    }

    #[test]
    fn builder_setters() {
        let params = DeviceParams::default()
            .with_capacity(64)
            .with_page_size(4)
            .with_clock_hz(1_000_000)
            .with_poll_limit(100)
            .without_poll_delays();

        assert_eq!(params.capacity, 64);
        assert_eq!(params.page_size, 4);
        assert_eq!(params.clock_hz, 1_000_000);
        assert_eq!(params.poll_limit, Some(100));
        assert_eq!(params.page_poll_interval, Duration::ZERO);
    }
}
