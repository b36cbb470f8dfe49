//! Transmit side: I-frame emission, acknowledgment processing, go-back-N and
//! selective retransmission, and the two timer expiry paths.
use bytes::Bytes;
use embassy_time::Instant;

use super::state::TxState;
use super::{ErtmController, UnackedFrame};
use crate::core::SeqNum;
use crate::error::CloseReason;
use crate::protocol::frame::{Final, Poll, SupervisoryFrame, SupervisoryFunction};
use crate::protocol::transport::traits::{scheduler::Scheduler, sdu_sink::SduSink};

impl<S: Scheduler, U: SduSink> ErtmController<S, U> {
    //==================================================================================OUTPUT
    fn emit(&mut self, pdu: Bytes) {
        if self.closed.is_some() {
            return;
        }
        self.outbound.push_back(pdu);
        self.scheduler.on_packets_ready(self.config.local_cid, 1);
    }

    /// Encode an I-frame piggybacking the current receive acknowledgment.
    fn emit_i_frame(&mut self, tx_seq: SeqNum, f: Final, frame: &UnackedFrame) {
        match self.codec.encode_information(
            tx_seq,
            self.seq.expected_tx_seq,
            f,
            frame.sar,
            frame.sdu_len,
            &frame.payload,
        ) {
            Ok(pdu) => self.emit(pdu),
            Err(_e) => {
                #[cfg(feature = "defmt")]
                defmt::error!(
                    "[ertm] cid {}: cannot encode I-frame {}: {}",
                    self.config.local_cid.value(),
                    tx_seq,
                    _e
                );
            }
        }
    }

    pub(super) fn send_s_frame(&mut self, s: SupervisoryFunction, p: Poll, f: Final) {
        let pdu = self.codec.encode_supervisory(SupervisoryFrame {
            s,
            req_seq: self.seq.expected_tx_seq,
            p,
            f,
        });
        self.emit(pdu);
    }

    /// RNR while locally busy, RR otherwise.
    pub(super) fn send_rr_or_rnr(&mut self, p: Poll, f: Final) {
        let s = if self.local_busy {
            SupervisoryFunction::ReceiverNotReady
        } else {
            SupervisoryFunction::ReceiverReady
        };
        self.send_s_frame(s, p, f);
    }

    /// Acknowledge received I-frames, piggybacked on new I-frames when the
    /// window allows.
    pub(super) fn send_ack(&mut self, now: Instant) {
        if self.local_busy || self.send_pending_i_frames(now) == 0 {
            self.send_rr_or_rnr(Poll::NotSet, Final::NotSet);
        }
    }

    /// Answer a peer poll: the F-bit rides on the first pending I-frame, or on
    /// an RR/RNR when no I-frame can go out.
    pub(super) fn send_i_or_rr_or_rnr(&mut self, now: Instant) {
        if self.local_busy {
            self.send_rr_or_rnr(Poll::NotSet, Final::PollResponse);
            return;
        }
        if self.send_pending_with_final(Final::PollResponse, now) == 0 {
            self.send_rr_or_rnr(Poll::NotSet, Final::PollResponse);
        }
    }

    //==================================================================================NEW_I_FRAMES
    pub(super) fn can_send_new_frames(&self) -> bool {
        self.tx_state == TxState::Xmit
            && !self.remote_busy
            && !self.seq.rem_window_full(self.config.remote_tx_window)
    }

    pub(super) fn send_pending_i_frames(&mut self, now: Instant) -> usize {
        self.send_pending_with_final(Final::NotSet, now)
    }

    /// Move pending segments into the unacked table while the window allows.
    /// `first_f` is carried by the first frame sent only.
    fn send_pending_with_final(&mut self, first_f: Final, now: Instant) -> usize {
        let mut f = first_f;
        let mut sent = 0;
        while self.can_send_new_frames() {
            let Some(frame) = self.pending.pop_front() else {
                break;
            };
            let tx_seq = self.seq.next_tx_seq;
            self.emit_i_frame(tx_seq, f, &frame);
            f = Final::NotSet;

            self.unacked.insert(tx_seq, frame);
            self.retries.insert(tx_seq, 0);
            self.seq.next_tx_seq = tx_seq.next();
            self.alarm
                .start_retransmission(now, self.config.retransmission_timeout);
            sent += 1;
        }
        sent
    }

    //==================================================================================ACKNOWLEDGMENT
    /// Retire every I-frame before `req_seq`. Caller has validated `req_seq`.
    pub(super) fn process_req_seq(&mut self, req_seq: SeqNum, now: Instant) {
        let progressed = req_seq != self.seq.expected_ack_seq;
        for tx_seq in self.seq.expected_ack_seq.range_to(req_seq) {
            self.unacked.remove(&tx_seq);
            self.retries.remove(&tx_seq);
        }
        self.seq.expected_ack_seq = req_seq;

        if self.unacked.is_empty() {
            self.alarm.stop_retransmission();
        } else if progressed {
            self.alarm
                .restart_retransmission(now, self.config.retransmission_timeout);
        }
    }

    /// Complete an outstanding poll when `f` answers it.
    pub(super) fn pass_to_tx_f_bit(&mut self, f: Final, now: Instant) {
        if self.tx_state == TxState::WaitF && f == Final::PollResponse {
            self.alarm.stop_monitor();
            self.tx_state = TxState::Xmit;
            if !self.unacked.is_empty() {
                self.alarm
                    .start_retransmission(now, self.config.retransmission_timeout);
            }
        }
    }

    /// Feed a received ReqSeq and F-bit to the transmit side.
    pub(super) fn pass_to_tx(&mut self, req_seq: SeqNum, f: Final, now: Instant) {
        self.process_req_seq(req_seq, now);
        self.pass_to_tx_f_bit(f, now);
    }

    //==================================================================================RETRANSMISSION
    pub(super) fn retry_i_frames_less_than_max_transmit(&self, tx_seq: SeqNum) -> bool {
        self.retries.get(&tx_seq).copied().unwrap_or(0) < self.config.max_transmit
    }

    /// Count one more transmission of `tx_seq`, closing the channel when the
    /// ceiling is already reached. Returns `false` once closed.
    fn note_retransmission(&mut self, tx_seq: SeqNum) -> bool {
        if !self.retry_i_frames_less_than_max_transmit(tx_seq) {
            self.close(CloseReason::RetryExhausted { tx_seq });
            return false;
        }
        let count = self.retries.entry(tx_seq).or_insert(0);
        *count += 1;
        true
    }

    /// Go-back-N: resend every unacked frame from `req_seq` up to
    /// `next_tx_seq - 1`. A received poll makes the first resent frame carry F=1.
    pub(super) fn retransmit_i_frames(&mut self, req_seq: SeqNum, p: Poll, now: Instant) {
        let mut f = if p == Poll::Poll {
            Final::PollResponse
        } else {
            Final::NotSet
        };
        let mut resent = 0usize;
        for tx_seq in req_seq.range_to(self.seq.next_tx_seq) {
            let Some(frame) = self.unacked.get(&tx_seq).cloned() else {
                continue;
            };
            if !self.note_retransmission(tx_seq) {
                return;
            }
            self.emit_i_frame(tx_seq, f, &frame);
            f = Final::NotSet;
            resent += 1;
        }

        if resent > 0 {
            #[cfg(feature = "defmt")]
            defmt::debug!(
                "[ertm] cid {}: go-back-N resent {} frames from {}",
                self.config.local_cid.value(),
                resent,
                req_seq
            );
            self.alarm
                .restart_retransmission(now, self.config.retransmission_timeout);
        }
    }

    /// Selective retransmission of the single frame `req_seq`.
    pub(super) fn retransmit_requested_i_frame(&mut self, req_seq: SeqNum, p: Poll, now: Instant) {
        let Some(frame) = self.unacked.get(&req_seq).cloned() else {
            return;
        };
        if !self.note_retransmission(req_seq) {
            return;
        }
        let f = if p == Poll::Poll {
            Final::PollResponse
        } else {
            Final::NotSet
        };
        self.emit_i_frame(req_seq, f, &frame);
        self.alarm
            .restart_retransmission(now, self.config.retransmission_timeout);
    }

    //==================================================================================TIMER_EXPIRY
    /// No acknowledgment within the retransmission timeout: poll the peer
    /// instead of resending data blindly.
    pub(super) fn on_retransmission_timeout(&mut self, now: Instant) {
        if self.tx_state != TxState::Xmit || self.unacked.is_empty() {
            return;
        }
        #[cfg(feature = "defmt")]
        defmt::debug!(
            "[ertm] cid {}: retransmission timeout, polling peer",
            self.config.local_cid.value()
        );
        self.retry_count = 0;
        self.send_rr_or_rnr(Poll::Poll, Final::NotSet);
        self.alarm.start_monitor(now, self.config.monitor_timeout);
        self.tx_state = TxState::WaitF;
    }

    /// Poll unanswered: poll again until `max_transmit` re-polls were spent.
    pub(super) fn on_monitor_timeout(&mut self, now: Instant) {
        if self.tx_state != TxState::WaitF {
            return;
        }
        if self.retry_count >= self.config.max_transmit {
            self.close(CloseReason::MonitorExhausted);
            return;
        }
        self.retry_count += 1;
        #[cfg(feature = "defmt")]
        defmt::debug!(
            "[ertm] cid {}: monitor timeout, re-poll {}",
            self.config.local_cid.value(),
            self.retry_count
        );
        self.send_rr_or_rnr(Poll::Poll, Final::NotSet);
        self.alarm.start_monitor(now, self.config.monitor_timeout);
    }
}
