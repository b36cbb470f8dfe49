//! Error definitions shared across library modules.
//! Each type models a specific failure scenario (frame decoding, configuration,
//! SDU submission, channel teardown, driver I/O).
use crate::core::SeqNum;
use thiserror_no_std::Error;

//==================================================================================FRAME_ERROR
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Reasons a received PDU cannot be decoded. Such frames are dropped.
pub enum FrameError {
    /// Fewer bytes than the basic header plus control field (and FCS when enabled).
    #[error("Frame too short: {len} bytes")]
    TooShort { len: usize },
    /// Basic header length does not match the number of bytes received.
    #[error("Length mismatch -> header: {declared}, actual: {actual}")]
    LengthMismatch { declared: usize, actual: usize },
    /// Frame check sequence does not match the computed CRC.
    #[error("FCS mismatch -> received: {received:#06x}, computed: {computed:#06x}")]
    FcsMismatch { received: u16, computed: u16 },
    /// Supervisory frames never carry an information payload.
    #[error("S-frame carries {len} unexpected payload bytes")]
    SupervisoryPayload { len: usize },
    /// START I-frame is missing its 16-bit SDU length prefix.
    #[error("START I-frame without SDU length")]
    MissingSduLength,
    /// Payload larger than the 16-bit basic header length can describe.
    #[error("Payload too large to encode: {len} bytes")]
    PayloadTooLarge { len: usize },
}

//==================================================================================CONFIG_ERROR
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Rejected channel parameters.
pub enum ConfigError {
    /// Transmit windows must lie in `1..=63` (standard, non-extended window).
    #[error("Invalid tx window: {window}")]
    InvalidTxWindow { window: u8 },
    /// A zero retry ceiling would close the channel on the first loss.
    #[error("MaxTransmit must be at least 1")]
    InvalidMaxTransmit,
    /// PDUs must be able to carry at least one payload byte.
    #[error("Invalid maximum PDU payload size: {mps}")]
    InvalidMps { mps: u16 },
    /// Retransmission and monitor timeouts must be non-zero.
    #[error("Timeouts must be non-zero")]
    InvalidTimeout,
    /// The pending-frame queue needs room for at least one segment.
    #[error("Pending queue capacity must be at least 1")]
    InvalidPendingCapacity,
}

//==================================================================================SUBMIT_ERROR
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Preconditions that prevent an SDU from being accepted.
pub enum SubmitError {
    /// The channel has been closed; no further data is accepted.
    #[error("Channel closed")]
    ChannelClosed,
    /// The START length prefix is 16 bits wide.
    #[error("SDU too large: {len} bytes")]
    SduTooLarge { len: usize },
    /// Queuing the SDU would exceed the configured pending capacity.
    #[error("Pending queue full (capacity {capacity})")]
    PendingQueueFull { capacity: usize },
}

//==================================================================================SAR_VIOLATION
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Segmentation-and-reassembly ordering violations. Always fatal for the channel.
pub enum SarViolation {
    /// UNSEGMENTED or START received while a previous SDU is incomplete.
    #[error("New SDU started while reassembly in progress")]
    Interleaved,
    /// CONTINUATION or END received with no START in progress.
    #[error("Segment received without START")]
    MissingStart,
    /// Segments carry more bytes than the START length announced.
    #[error("SDU overrun: {excess} bytes beyond announced length")]
    Overrun { excess: usize },
    /// END received while bytes announced by START are still missing.
    #[error("SDU truncated: {missing} bytes missing at END")]
    Truncated { missing: usize },
}

//==================================================================================CLOSE_REASON
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Why a controller requested link-level disconnection of its channel.
pub enum CloseReason {
    /// Peer acknowledged a sequence number outside `[expected_ack_seq, next_tx_seq]`.
    #[error("Invalid ReqSeq {req_seq}")]
    InvalidReqSeq { req_seq: SeqNum },
    /// Final bit set while no poll was outstanding.
    #[error("Unexpected F-bit")]
    InvalidFBit,
    /// TxSeq outside the receive window.
    #[error("Invalid TxSeq {tx_seq}")]
    InvalidTxSeq { tx_seq: SeqNum },
    /// Reassembly ordering violation.
    #[error(transparent)]
    Segmentation(#[from] SarViolation),
    /// An I-frame reached MaxTransmit transmissions without acknowledgment.
    #[error("I-frame {tx_seq} exceeded MaxTransmit")]
    RetryExhausted { tx_seq: SeqNum },
    /// No F-bit response after MaxTransmit polls.
    #[error("Monitor timer exhausted MaxTransmit polls")]
    MonitorExhausted,
    /// Closed by the owner of the channel.
    #[error("Closed locally")]
    LocalShutdown,
}

//==================================================================================RUN_ERROR
#[derive(Debug, Error)]
/// Failures of the link underneath the channel driver.
pub enum ErtmRunError<E: core::fmt::Debug> {
    /// Link refused or failed to send a PDU.
    #[error("Link send error: {0:?}")]
    Send(E),
    /// Unable to receive PDUs from the link.
    #[error("Link receive error: {0:?}")]
    Receive(E),
}
