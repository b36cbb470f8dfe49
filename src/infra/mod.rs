//! Infrastructure shared by the protocol layer: bit-level encoding of the
//! enhanced control field and the CRC-16 frame check sequence.
pub mod codec;
