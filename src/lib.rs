//! `l2cap-ertm` library: the Bluetooth L2CAP Enhanced Retransmission Mode
//! data controller for `no_std` targets. The crate exposes the frame codec
//! infrastructure (control field, FCS), the ERTM protocol engine, and the
//! collaborator traits used to plug it onto a link, a clock, and an upper layer.
#![no_std]

extern crate alloc;
//==================================================================================
/// Shared primitive types: channel identifiers and modulo-64 sequence numbers.
pub mod core;
/// Protocol errors, configuration errors, and channel close reasons.
pub mod error;
/// Low-level encoding helpers (frame check sequence, enhanced control field).
pub mod infra;
/// ERTM protocol implementation: frame codec, data controller, collaborator
/// traits, and the single-task channel driver.
pub mod protocol;
//==================================================================================
