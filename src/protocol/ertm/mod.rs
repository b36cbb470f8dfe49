//! Enhanced Retransmission Mode data controller.
//!
//! [`ErtmController`] owns one channel's reliable-delivery state: it segments
//! submitted SDUs into I-frames, keeps unacknowledged frames for go-back-N
//! retransmission, polls the peer when acknowledgments stall, and reassembles
//! in-sequence I-frames into SDUs for the [`SduSink`].
//!
//! The controller is sans-IO. Every event carries the current [`Instant`], the
//! owner drains produced PDUs with [`next_packet`](ErtmController::next_packet)
//! after a [`Scheduler`] notification, and arms its own sleep from
//! [`poll_timeout`](ErtmController::poll_timeout).
//!
//! ```text
//!  submit ──► pending ──► unacked ──► outbound ──► next_packet()
//!                            ▲  acks (ReqSeq) │
//!  on_pdu ──► decode ──► S-frame / I-frame ───┘──► reassembler ──► SduSink
//! ```
pub mod config;
pub mod constants;
pub mod segmentation;
pub mod state;
pub mod timer;

mod receive;
mod transmit;

use alloc::collections::{BTreeMap, VecDeque};
use bytes::Bytes;
use embassy_time::Instant;

use crate::core::SeqNum;
use crate::error::{CloseReason, SubmitError};
use crate::protocol::frame::{Final, FrameCodec, Poll, Sar};
use crate::protocol::transport::traits::{scheduler::Scheduler, sdu_sink::SduSink};
use config::ErtmConfig;
use segmentation::{segment_count, Reassembler, Segments};
use state::{RxState, Sequencing, TxState};
use timer::{AlarmSlot, TimerKind};

//==================================================================================QUEUED_FRAMES
#[derive(Clone, Debug, PartialEq, Eq)]
/// I-frame content kept until acknowledged so it can be re-encoded with
/// fresh ReqSeq/F bits on retransmission.
pub(crate) struct UnackedFrame {
    pub sar: Sar,
    pub sdu_len: u16,
    pub payload: Bytes,
}

//==================================================================================CONTROLLER
pub struct ErtmController<S: Scheduler, U: SduSink> {
    config: ErtmConfig,
    codec: FrameCodec,
    scheduler: S,
    sink: U,

    tx_state: TxState,
    rx_state: RxState,
    seq: Sequencing,

    remote_busy: bool,
    local_busy: bool,
    rnr_sent: bool,
    rej_actioned: bool,
    srej_actioned: bool,
    srej_save_req_seq: SeqNum,
    /// Polls sent during the current `WAIT_F` episode.
    retry_count: u8,

    unacked: BTreeMap<SeqNum, UnackedFrame>,
    /// Retransmissions per outstanding TxSeq.
    retries: BTreeMap<SeqNum, u8>,
    pending: VecDeque<UnackedFrame>,
    outbound: VecDeque<Bytes>,
    reassembler: Reassembler,

    alarm: AlarmSlot,
    closed: Option<CloseReason>,
}

impl<S: Scheduler, U: SduSink> ErtmController<S, U> {
    /// Bring up a controller in `XMIT`/`RECV` with all sequence variables at 0.
    ///
    /// `config` is expected to come from
    /// [`ErtmConfigBuilder::build`](config::ErtmConfigBuilder::build).
    pub fn new(config: ErtmConfig, scheduler: S, sink: U) -> Self {
        Self {
            codec: FrameCodec::new(config.remote_cid, config.fcs_enabled),
            config,
            scheduler,
            sink,
            tx_state: TxState::Xmit,
            rx_state: RxState::Recv,
            seq: Sequencing::default(),
            remote_busy: false,
            local_busy: false,
            rnr_sent: false,
            rej_actioned: false,
            srej_actioned: false,
            srej_save_req_seq: SeqNum::ZERO,
            retry_count: 0,
            unacked: BTreeMap::new(),
            retries: BTreeMap::new(),
            pending: VecDeque::new(),
            outbound: VecDeque::new(),
            reassembler: Reassembler::new(),
            alarm: AlarmSlot::new(),
            closed: None,
        }
    }

    //==================================================================================UPPER_LAYER
    /// Queue an SDU for reliable delivery.
    ///
    /// The SDU is segmented to the peer's MPS; segments go out immediately while
    /// the remote window has room and the rest wait in the pending queue. The
    /// SDU is either accepted whole or refused whole.
    pub fn submit(&mut self, sdu: Bytes, now: Instant) -> Result<(), SubmitError> {
        if self.closed.is_some() {
            return Err(SubmitError::ChannelClosed);
        }
        if sdu.len() > u16::MAX as usize {
            return Err(SubmitError::SduTooLarge { len: sdu.len() });
        }

        let mps = self.config.remote_mps as usize;
        let segments = segment_count(sdu.len(), mps);
        let immediate = if self.can_send_new_frames() && self.pending.is_empty() {
            let room = self
                .config
                .remote_tx_window
                .saturating_sub(self.seq.unacked()) as usize;
            room.min(segments)
        } else {
            0
        };
        let capacity = self.config.max_pending_segments;
        if self.pending.len() + (segments - immediate) > capacity {
            #[cfg(feature = "defmt")]
            defmt::warn!(
                "[ertm] cid {}: SDU of {} segments refused, pending queue full",
                self.config.local_cid.value(),
                segments
            );
            return Err(SubmitError::PendingQueueFull { capacity });
        }

        for segment in Segments::new(sdu, mps) {
            self.pending.push_back(UnackedFrame {
                sar: segment.sar,
                sdu_len: segment.sdu_len,
                payload: segment.payload,
            });
        }
        self.send_pending_i_frames(now);
        Ok(())
    }

    /// Enter or leave the local-busy condition (upper layer cannot take SDUs).
    ///
    /// Entering sends RNR. Leaving after an RNR was sent polls the peer with
    /// RR(P=1) so it resumes transmission.
    pub fn set_local_busy(&mut self, busy: bool, now: Instant) {
        if self.closed.is_some() || busy == self.local_busy {
            return;
        }
        self.local_busy = busy;

        if busy {
            #[cfg(feature = "defmt")]
            defmt::debug!("[ertm] cid {}: local busy", self.config.local_cid.value());
            self.send_rr_or_rnr(Poll::NotSet, Final::NotSet);
            self.rnr_sent = true;
        } else if self.rnr_sent {
            #[cfg(feature = "defmt")]
            defmt::debug!("[ertm] cid {}: local busy cleared", self.config.local_cid.value());
            self.rnr_sent = false;
            if self.tx_state == TxState::Xmit {
                self.retry_count = 0;
                self.send_rr_or_rnr(Poll::Poll, Final::NotSet);
                self.alarm.stop_retransmission();
                self.alarm.start_monitor(now, self.config.monitor_timeout);
                self.tx_state = TxState::WaitF;
            } else {
                self.send_rr_or_rnr(Poll::NotSet, Final::NotSet);
            }
        }
    }

    //==================================================================================TIMERS
    /// Deadline of the armed timer, if any.
    pub fn poll_timeout(&self) -> Option<Instant> {
        if self.closed.is_some() {
            return None;
        }
        self.alarm.deadline()
    }

    /// Fire the armed timer if its deadline is at or before `now`.
    pub fn handle_timeout(&mut self, now: Instant) {
        if self.closed.is_some() {
            return;
        }
        match self.alarm.take_expired(now) {
            Some(TimerKind::Retransmission) => self.on_retransmission_timeout(now),
            Some(TimerKind::Monitor) => self.on_monitor_timeout(now),
            None => {}
        }
    }

    //==================================================================================LINK_SIDE
    /// Next PDU ready for the link, oldest first.
    pub fn next_packet(&mut self) -> Option<Bytes> {
        self.outbound.pop_front()
    }

    /// Tear the channel down at the owner's request. Nothing more is sent and the
    /// scheduler is not asked to disconnect.
    pub fn shutdown(&mut self) {
        if self.closed.is_none() {
            self.teardown(CloseReason::LocalShutdown);
        }
    }

    /// Close on a protocol error and ask the link layer to disconnect.
    pub(crate) fn close(&mut self, reason: CloseReason) {
        if self.closed.is_some() {
            return;
        }
        #[cfg(feature = "defmt")]
        defmt::warn!(
            "[ertm] cid {}: closing channel: {}",
            self.config.local_cid.value(),
            reason
        );
        self.teardown(reason);
        self.scheduler.on_close_requested(self.config.local_cid, reason);
    }

    fn teardown(&mut self, reason: CloseReason) {
        self.closed = Some(reason);
        self.alarm.cancel();
        self.unacked.clear();
        self.retries.clear();
        self.pending.clear();
        self.outbound.clear();
        self.reassembler.reset();
    }

    //==================================================================================INTROSPECTION
    pub fn config(&self) -> &ErtmConfig {
        &self.config
    }

    pub fn tx_state(&self) -> TxState {
        self.tx_state
    }

    pub fn rx_state(&self) -> RxState {
        self.rx_state
    }

    pub fn next_tx_seq(&self) -> SeqNum {
        self.seq.next_tx_seq
    }

    pub fn expected_ack_seq(&self) -> SeqNum {
        self.seq.expected_ack_seq
    }

    pub fn expected_tx_seq(&self) -> SeqNum {
        self.seq.expected_tx_seq
    }

    /// I-frames sent and not yet acknowledged.
    pub fn unacked_count(&self) -> usize {
        self.unacked.len()
    }

    /// Segments waiting for window space.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn is_remote_busy(&self) -> bool {
        self.remote_busy
    }

    pub fn is_local_busy(&self) -> bool {
        self.local_busy
    }

    pub fn armed_timer(&self) -> Option<TimerKind> {
        self.alarm.armed()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.is_some()
    }

    pub fn close_reason(&self) -> Option<CloseReason> {
        self.closed
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn sink(&self) -> &U {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut U {
        &mut self.sink
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
