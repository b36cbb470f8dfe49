//! Seams between the ERTM engine and its host: the link carrying raw PDUs, the
//! time source, the packet scheduler and the upper-layer SDU consumer.
pub mod traits;
