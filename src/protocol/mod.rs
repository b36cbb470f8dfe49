//! High-level components of the ERTM protocol: the frame codec, the per-channel
//! data controller, the host-facing traits, and the single-task channel driver.
pub mod channel;
pub mod ertm;
pub mod frame;
pub mod transport;
