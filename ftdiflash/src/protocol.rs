//! JEDEC SPI flash command encoding.
//!
//! This module is pure: it builds the byte frames the engine clocks out over
//! the bridge and decodes the status register it reads back. All I/O lives
//! in [`crate::flash`].
//!
//! ## Command set
//!
//! | Opcode | Command            | Frame                                  |
//! |--------|--------------------|----------------------------------------|
//! | 0x05   | Read status (RDSR) | opcode, then 1 byte in                 |
//! | 0x06   | Write enable       | opcode only                            |
//! | 0x04   | Write disable      | opcode only                            |
//! | 0x9F   | Read ID (RDID)     | opcode, then ID bytes in               |
//! | 0xC7   | Bulk erase         | opcode only                            |
//! | 0x02   | Page program       | opcode + 3 address bytes + payload     |
//! | 0x03   | Read data          | opcode + 3 address bytes, then data in |
//!
//! Addresses are always encoded as 3 bytes, most-significant first, which
//! bounds the addressable space to 16 MiB.

/// JEDEC opcodes understood by the target flash family.
pub mod opcodes {
    /// Write enable (WREN): set the write-enable latch.
    pub const WRITE_ENABLE: u8 = 0x06;
    /// Write disable (WRDI): clear the write-enable latch.
    pub const WRITE_DISABLE: u8 = 0x04;
    /// Read status register (RDSR).
    pub const READ_STATUS: u8 = 0x05;
    /// Read JEDEC ID (RDID).
    pub const READ_ID: u8 = 0x9F;
    /// Page program.
    pub const PAGE_PROGRAM: u8 = 0x02;
    /// Read data.
    pub const READ_DATA: u8 = 0x03;
    /// Bulk (chip) erase.
    pub const BULK_ERASE: u8 = 0xC7;
}

/// Snapshot of the 8-bit status register.
///
/// The register reflects live device state, so a `Status` is only meaningful
/// immediately after the read that produced it; the engine never caches one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Status(pub u8);

impl Status {
    /// Bit 0: an erase or program operation is in progress.
    pub const BUSY: u8 = 0x01;
    /// Bit 1: the write-enable latch is set.
    pub const WRITE_ENABLED: u8 = 0x02;

    /// Whether the device is executing an erase or program operation.
    #[must_use]
    pub fn busy(self) -> bool {
        self.0 & Self::BUSY != 0
    }

    /// Whether the write-enable latch is set.
    #[must_use]
    pub fn write_enabled(self) -> bool {
        self.0 & Self::WRITE_ENABLED != 0
    }

    /// Whether the device will accept a new write-class command.
    ///
    /// Ready means neither the busy bit nor a stale write-enable latch is
    /// set. A set latch at entry indicates an interrupted earlier sequence.
    #[must_use]
    pub fn ready(self) -> bool {
        self.0 & (Self::BUSY | Self::WRITE_ENABLED) == 0
    }

    /// Raw register value.
    #[must_use]
    pub fn bits(self) -> u8 {
        self.0
    }
}

/// Encode a flash address as 3 bytes, most-significant first.
///
/// Only the low 24 bits are representable; callers keep addresses below the
/// device capacity, which is itself far below the 16 MiB protocol ceiling.
#[must_use]
pub fn encode_addr(addr: u32) -> [u8; 3] {
    [(addr >> 16) as u8, (addr >> 8) as u8, addr as u8]
}

/// Reverse the bit order of a single byte (bit 7 becomes bit 0, etc.).
///
/// Used in bit-swap mode for boards wired with reversed bit order on the
/// bus. Applying it twice yields the original value.
#[must_use]
pub fn reverse_bits(value: u8) -> u8 {
    value.reverse_bits()
}

/// Build a page program frame: opcode, 3 address bytes, payload.
///
/// With `bit_swap` set, each payload byte is bit-reversed; the opcode and
/// address bytes are never swapped.
#[must_use]
pub fn page_program_frame(addr: u32, chunk: &[u8], bit_swap: bool) -> Vec<u8> {
    let mut frame = Vec::with_capacity(4 + chunk.len());
    frame.push(opcodes::PAGE_PROGRAM);
    frame.extend_from_slice(&encode_addr(addr));
    if bit_swap {
        frame.extend(chunk.iter().map(|&b| reverse_bits(b)));
    } else {
        frame.extend_from_slice(chunk);
    }
    frame
}

/// Build a read command frame: opcode plus 3 address bytes.
///
/// The data phase follows as a separate chip-select-held read.
#[must_use]
pub fn read_frame(addr: u32) -> [u8; 4] {
    let [a2, a1, a0] = encode_addr(addr);
    [opcodes::READ_DATA, a2, a1, a0]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_bits() {
        assert!(Status(0x01).busy());
        assert!(!Status(0x01).write_enabled());
        assert!(Status(0x02).write_enabled());
        assert!(!Status(0x02).busy());
        assert!(Status(0x03).busy());
        assert!(Status(0x03).write_enabled());
        assert_eq!(Status(0xA5).bits(), 0xA5);
    }

    #[test]
    fn status_ready_requires_both_bits_clear() {
        assert!(Status(0x00).ready());
        assert!(Status(0xFC).ready());
        assert!(!Status(0x01).ready());
        assert!(!Status(0x02).ready());
        assert!(!Status(0x03).ready());
    }

    #[test]
    fn addr_encoding_is_big_endian_24_bit() {
        assert_eq!(encode_addr(0), [0x00, 0x00, 0x00]);
        assert_eq!(encode_addr(0x000100), [0x00, 0x01, 0x00]);
        assert_eq!(encode_addr(0x123456), [0x12, 0x34, 0x56]);
        assert_eq!(encode_addr(0xFFFFFF), [0xFF, 0xFF, 0xFF]);
    }

    #[test]
    fn reverse_bits_involution() {
        for value in 0..=u8::MAX {
            assert_eq!(reverse_bits(reverse_bits(value)), value);
        }
    }

    #[test]
    fn reverse_bits_known_values() {
        assert_eq!(reverse_bits(0x00), 0x00);
        assert_eq!(reverse_bits(0xFF), 0xFF);
        assert_eq!(reverse_bits(0x01), 0x80);
        assert_eq!(reverse_bits(0x80), 0x01);
        assert_eq!(reverse_bits(0b1011_0010), 0b0100_1101);
    }

    #[test]
    fn page_program_frame_layout() {
        let frame = page_program_frame(0x012345, &[0xAA, 0xBB], false);
        assert_eq!(frame, vec![0x02, 0x01, 0x23, 0x45, 0xAA, 0xBB]);
    }

    #[test]
    fn page_program_frame_swaps_payload_only() {
        let frame = page_program_frame(0x010203, &[0x01, 0x80], true);
        // Opcode and address untouched, payload bit-reversed.
        assert_eq!(frame, vec![0x02, 0x01, 0x02, 0x03, 0x80, 0x01]);
    }

    #[test]
    fn read_frame_layout() {
        assert_eq!(read_frame(0xABCDEF), [0x03, 0xAB, 0xCD, 0xEF]);
    }

    #[test]
    fn opcode_values() {
        assert_eq!(opcodes::WRITE_ENABLE, 0x06);
        assert_eq!(opcodes::WRITE_DISABLE, 0x04);
        assert_eq!(opcodes::READ_STATUS, 0x05);
        assert_eq!(opcodes::READ_ID, 0x9F);
        assert_eq!(opcodes::PAGE_PROGRAM, 0x02);
        assert_eq!(opcodes::READ_DATA, 0x03);
        assert_eq!(opcodes::BULK_ERASE, 0xC7);
    }
}
