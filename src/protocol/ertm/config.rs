//! Negotiated channel parameters handed to the controller at bring-up.
use embassy_time::Duration;

use super::constants::{
    DEFAULT_MAX_PENDING_SEGMENTS, DEFAULT_MAX_TRANSMIT, DEFAULT_MONITOR_TIMEOUT_MS, DEFAULT_MPS,
    DEFAULT_RETRANSMISSION_TIMEOUT_MS, DEFAULT_TX_WINDOW, MAX_STANDARD_TX_WINDOW,
};
use crate::core::Cid;
use crate::error::ConfigError;
use crate::infra::codec::control::CONTROL_LEN;
use crate::infra::codec::fcs::FCS_LEN;
use crate::protocol::frame::SDU_LEN_FIELD;

//==================================================================================ERTM_CONFIG
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Immutable parameters of one ERTM channel.
pub struct ErtmConfig {
    /// CID the link demultiplexes to this channel.
    pub local_cid: Cid,
    /// CID written into outgoing PDUs.
    pub remote_cid: Cid,
    /// Receive window we advertised; bounds the TxSeq values we accept.
    pub local_tx_window: u8,
    /// Peer's receive window; bounds our unacknowledged I-frames.
    pub remote_tx_window: u8,
    /// Retransmissions allowed for one I-frame, and polls allowed per `WAIT_F`.
    pub max_transmit: u8,
    pub retransmission_timeout: Duration,
    pub monitor_timeout: Duration,
    pub fcs_enabled: bool,
    /// Largest information payload per PDU, SDU length prefix excluded.
    pub remote_mps: u16,
    /// Capacity of the pending-frame queue.
    pub max_pending_segments: usize,
}

impl ErtmConfig {
    /// Start from the default parameters for a channel pair.
    pub fn builder(local_cid: Cid, remote_cid: Cid) -> ErtmConfigBuilder {
        ErtmConfigBuilder::new(local_cid, remote_cid)
    }

    /// Check every parameter against the standard ERTM limits.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for window in [self.local_tx_window, self.remote_tx_window] {
            if !(1..=MAX_STANDARD_TX_WINDOW).contains(&window) {
                return Err(ConfigError::InvalidTxWindow { window });
            }
        }
        if self.max_transmit == 0 {
            return Err(ConfigError::InvalidMaxTransmit);
        }
        let overhead = CONTROL_LEN + SDU_LEN_FIELD + FCS_LEN;
        if self.remote_mps == 0 || self.remote_mps as usize + overhead > u16::MAX as usize {
            return Err(ConfigError::InvalidMps {
                mps: self.remote_mps,
            });
        }
        if self.retransmission_timeout.as_ticks() == 0 || self.monitor_timeout.as_ticks() == 0 {
            return Err(ConfigError::InvalidTimeout);
        }
        if self.max_pending_segments == 0 {
            return Err(ConfigError::InvalidPendingCapacity);
        }
        Ok(())
    }
}

//==================================================================================ERTM_CONFIG_BUILDER
#[derive(Debug)]
/// Fluent builder; `build` validates the result.
pub struct ErtmConfigBuilder {
    config: ErtmConfig,
}

impl ErtmConfigBuilder {
    pub fn new(local_cid: Cid, remote_cid: Cid) -> Self {
        Self {
            config: ErtmConfig {
                local_cid,
                remote_cid,
                local_tx_window: DEFAULT_TX_WINDOW,
                remote_tx_window: DEFAULT_TX_WINDOW,
                max_transmit: DEFAULT_MAX_TRANSMIT,
                retransmission_timeout: Duration::from_millis(DEFAULT_RETRANSMISSION_TIMEOUT_MS),
                monitor_timeout: Duration::from_millis(DEFAULT_MONITOR_TIMEOUT_MS),
                fcs_enabled: false,
                remote_mps: DEFAULT_MPS,
                max_pending_segments: DEFAULT_MAX_PENDING_SEGMENTS,
            },
        }
    }

    /// Use the same window in both directions.
    pub fn with_tx_window(mut self, window: u8) -> Self {
        self.config.local_tx_window = window;
        self.config.remote_tx_window = window;
        self
    }

    pub fn with_local_tx_window(mut self, window: u8) -> Self {
        self.config.local_tx_window = window;
        self
    }

    pub fn with_remote_tx_window(mut self, window: u8) -> Self {
        self.config.remote_tx_window = window;
        self
    }

    pub fn with_max_transmit(mut self, max_transmit: u8) -> Self {
        self.config.max_transmit = max_transmit;
        self
    }

    pub fn with_retransmission_timeout(mut self, timeout: Duration) -> Self {
        self.config.retransmission_timeout = timeout;
        self
    }

    pub fn with_monitor_timeout(mut self, timeout: Duration) -> Self {
        self.config.monitor_timeout = timeout;
        self
    }

    pub fn with_fcs(mut self, enabled: bool) -> Self {
        self.config.fcs_enabled = enabled;
        self
    }

    pub fn with_remote_mps(mut self, mps: u16) -> Self {
        self.config.remote_mps = mps;
        self
    }

    pub fn with_max_pending_segments(mut self, capacity: usize) -> Self {
        self.config.max_pending_segments = capacity;
        self
    }

    pub fn build(self) -> Result<ErtmConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOCAL: Cid = Cid(0x0040);
    const REMOTE: Cid = Cid(0x0041);

    #[test]
    fn defaults_are_valid() {
        let config = ErtmConfig::builder(LOCAL, REMOTE)
            .build()
            .expect("defaults must validate");
        assert_eq!(config.remote_tx_window, DEFAULT_TX_WINDOW);
        assert_eq!(config.remote_mps, DEFAULT_MPS);
        assert!(!config.fcs_enabled);
    }

    #[test]
    fn window_outside_standard_range_rejected() {
        let result = ErtmConfig::builder(LOCAL, REMOTE).with_tx_window(64).build();
        assert_eq!(result, Err(ConfigError::InvalidTxWindow { window: 64 }));

        let result = ErtmConfig::builder(LOCAL, REMOTE)
            .with_remote_tx_window(0)
            .build();
        assert_eq!(result, Err(ConfigError::InvalidTxWindow { window: 0 }));
    }

    #[test]
    fn zero_values_rejected() {
        let builder = || ErtmConfig::builder(LOCAL, REMOTE);
        assert_eq!(
            builder().with_max_transmit(0).build(),
            Err(ConfigError::InvalidMaxTransmit)
        );
        assert_eq!(
            builder().with_remote_mps(0).build(),
            Err(ConfigError::InvalidMps { mps: 0 })
        );
        assert_eq!(
            builder().with_monitor_timeout(Duration::from_ticks(0)).build(),
            Err(ConfigError::InvalidTimeout)
        );
        assert_eq!(
            builder().with_max_pending_segments(0).build(),
            Err(ConfigError::InvalidPendingCapacity)
        );
    }

    #[test]
    fn mps_must_leave_room_for_headers() {
        let result = ErtmConfig::builder(LOCAL, REMOTE)
            .with_remote_mps(u16::MAX)
            .build();
        assert_eq!(result, Err(ConfigError::InvalidMps { mps: u16::MAX }));
    }
}
