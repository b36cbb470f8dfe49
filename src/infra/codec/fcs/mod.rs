//! L2CAP Frame Check Sequence.
//!
//! The FCS is the 16-bit CRC with generator polynomial `x^16 + x^15 + x^2 + 1`,
//! processed LSB first with a zero initial value. That matches the
//! `CRC-16/ARC` catalogue entry, so the `crc` crate table is used as is.
//! The checksum covers the basic header, the control field, the optional SDU
//! length, and the payload; it is appended little-endian.
use crc::{Crc, CRC_16_ARC};

/// Number of trailing bytes taken by the FCS.
pub const FCS_LEN: usize = 2;

const L2CAP_FCS: Crc<u16> = Crc::<u16>::new(&CRC_16_ARC);

/// Compute the FCS over a complete frame prefix.
pub fn compute(bytes: &[u8]) -> u16 {
    L2CAP_FCS.checksum(bytes)
}

/// Split `frame` into `(covered, received_fcs)` and compare against the computed value.
///
/// Returns `Ok(covered)` on match, `Err((received, computed))` otherwise.
/// Callers guarantee `frame.len() >= FCS_LEN`.
pub fn verify(frame: &[u8]) -> Result<&[u8], (u16, u16)> {
    let (covered, trailer) = frame.split_at(frame.len() - FCS_LEN);
    let received = u16::from_le_bytes([trailer[0], trailer[1]]);
    let computed = compute(covered);
    if received == computed {
        Ok(covered)
    } else {
        Err((received, computed))
    }
}
