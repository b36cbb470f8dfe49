//! Wire-level building blocks used by [`crate::protocol::frame`].
pub mod control;
pub mod fcs;
