//! Whole-image orchestration: program, read back, verify.
//!
//! These operations drive a full image over the page-level primitives in
//! [`crate::flash`], splitting arbitrarily large buffers into page-sized
//! chunks with advancing addresses. Any page failure aborts the whole
//! operation and propagates; there is no retry and no rollback of a
//! partially written chip.

use {
    crate::{
        bridge::SpiBridge,
        error::{Error, Result},
        flash::Flash,
    },
    log::{debug, info, warn},
};

/// Value every byte of an erased flash reads as.
pub const ERASED_BYTE: u8 = 0xFF;

/// Progress notification emitted during long-running operations.
///
/// Percentages are emitted only when the integer value changes, not on
/// every chunk. Progress is reporting only; it never drives control flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// A bulk erase is in flight; emitted once per status poll.
    Erasing,
    /// Programming reached `percent` of the image.
    Writing {
        /// Integer percentage of bytes written.
        percent: u8,
    },
    /// Read-back reached `percent` of the requested length.
    Reading {
        /// Integer percentage of bytes read.
        percent: u8,
    },
}

/// Outcome of a program-and-verify cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Verify {
    /// The read-back matched the image byte for byte.
    Success,
    /// The read-back differed from the image somewhere.
    Mismatch,
}

impl<B: SpiBridge> Flash<B> {
    /// Program `image` into flash starting at address 0.
    ///
    /// Fails with [`Error::SizeExceeded`] before any transport call if the
    /// image is larger than the device capacity.
    pub fn write_all<F>(&mut self, image: &[u8], mut progress: F) -> Result<()>
    where
        F: FnMut(Progress),
    {
        self.check_size(image.len())?;
        info!("Writing {} bytes", image.len());

        let page_size = self.params().page_size;
        let mut addr: u32 = 0;
        let mut written: usize = 0;
        let mut last_percent = u8::MAX;

        for chunk in image.chunks(page_size) {
            self.write_page(addr, chunk)?;

            #[allow(clippy::cast_possible_truncation)]
            {
                addr += chunk.len() as u32;
            }
            written += chunk.len();

            let percent = percent_of(written, image.len());
            if percent != last_percent {
                last_percent = percent;
                progress(Progress::Writing { percent });
            }
        }

        debug!("Write complete: {written} bytes in {} pages", image.len().div_ceil(page_size));
        Ok(())
    }

    /// Read `len` bytes starting at address 0 into one contiguous buffer.
    ///
    /// Fails with [`Error::SizeExceeded`] before any transport call if
    /// `len` is larger than the device capacity.
    pub fn read_all<F>(&mut self, len: usize, mut progress: F) -> Result<Vec<u8>>
    where
        F: FnMut(Progress),
    {
        self.check_size(len)?;
        info!("Reading {len} bytes");

        let page_size = self.params().page_size;
        let mut out = vec![0u8; len];
        let mut addr: u32 = 0;
        let mut read: usize = 0;
        let mut last_percent = u8::MAX;

        for chunk in out.chunks_mut(page_size) {
            self.read_page(addr, chunk)?;

            #[allow(clippy::cast_possible_truncation)]
            {
                addr += chunk.len() as u32;
            }
            read += chunk.len();

            let percent = percent_of(read, len);
            if percent != last_percent {
                last_percent = percent;
                progress(Progress::Reading { percent });
            }
        }

        debug!("Read complete: {read} bytes");
        Ok(out)
    }

    /// Whether the whole addressable capacity reads as erased (all 0xFF).
    ///
    /// Read failures propagate as errors rather than mapping to `false`,
    /// so "empty" is never conflated with "could not be determined".
    pub fn is_empty<F>(&mut self, progress: F) -> Result<bool>
    where
        F: FnMut(Progress),
    {
        let capacity = self.params().capacity;
        let contents = self.read_all(capacity, progress)?;
        Ok(contents.iter().all(|&b| b == ERASED_BYTE))
    }

    /// Full program-and-verify cycle: erase, write, read back, compare.
    ///
    /// The comparison is whole-buffer only; a [`Verify::Mismatch`] does not
    /// identify which bytes differ.
    pub fn program_and_verify<F>(&mut self, image: &[u8], mut progress: F) -> Result<Verify>
    where
        F: FnMut(Progress),
    {
        // Reject oversized images up front so the chip is not erased for a
        // write that can never start.
        self.check_size(image.len())?;

        self.bulk_erase(&mut progress)?;
        self.write_all(image, &mut progress)?;
        let readback = self.read_all(image.len(), &mut progress)?;

        if readback == image {
            info!("Verification passed: {} bytes", image.len());
            Ok(Verify::Success)
        } else {
            warn!("Verification failed: read-back differs from image");
            Ok(Verify::Mismatch)
        }
    }

    fn check_size(&self, requested: usize) -> Result<()> {
        let capacity = self.params().capacity;
        if requested > capacity {
            return Err(Error::SizeExceeded {
                requested,
                capacity,
            });
        }
        Ok(())
    }
}

/// Integer percentage of `done` out of `total` (100 for an empty total).
fn percent_of(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    #[allow(clippy::cast_possible_truncation)]
    {
        (done * 100 / total) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::percent_of;

    #[test]
    fn percent_rounds_down() {
        assert_eq!(percent_of(0, 10), 0);
        assert_eq!(percent_of(1, 3), 33);
        assert_eq!(percent_of(2, 3), 66);
        assert_eq!(percent_of(3, 3), 100);
        assert_eq!(percent_of(0, 0), 100);
    }
}
