//! Default channel parameters.
//!
//! These are the values a peer typically proposes during configuration; the
//! negotiated result is what ends up in [`ErtmConfig`](super::config::ErtmConfig).

/// Largest transmit window of the standard (non-extended) ERTM control field.
pub const MAX_STANDARD_TX_WINDOW: u8 = 63;

/// Default transmit window, in I-frames.
pub const DEFAULT_TX_WINDOW: u8 = 10;

/// Default ceiling on retransmissions of a single I-frame or poll.
pub const DEFAULT_MAX_TRANSMIT: u8 = 20;

/// Default retransmission timeout (ms).
///
/// Runs while I-frames are outstanding in `XMIT`. On expiry the controller
/// polls the peer instead of blindly resending data.
pub const DEFAULT_RETRANSMISSION_TIMEOUT_MS: u64 = 2_000;

/// Default monitor timeout (ms).
///
/// Runs while a poll is outstanding in `WAIT_F`.
///
/// # Recommended Values
///
/// - **12 s**: Bluetooth Core default for BR/EDR links.
/// - Shorter values close dead channels sooner at the cost of spurious polls
///   on congested links.
pub const DEFAULT_MONITOR_TIMEOUT_MS: u64 = 12_000;

/// Default maximum PDU payload size (bytes).
pub const DEFAULT_MPS: u16 = 1_010;

/// Default capacity of the pending-frame queue (segments).
///
/// Bounds the memory a fast producer can pin while the peer is busy or the
/// window is closed. `submit` refuses an SDU that would not fit entirely.
pub const DEFAULT_MAX_PENDING_SEGMENTS: usize = 256;
