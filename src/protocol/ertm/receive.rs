//! Receive side: PDU decoding, I-frame sequencing and reassembly, and the
//! RR/RNR/REJ/SREJ handlers. Every handler validates ReqSeq and the F-bit
//! before touching any state; a failed guard closes the channel.
use bytes::Bytes;
use embassy_time::Instant;

use super::segmentation::Reassembly;
use super::state::{p_bit_outstanding, with_valid_f_bit, RxState, TxSeqClass};
use super::ErtmController;
use crate::core::SeqNum;
use crate::error::CloseReason;
use crate::protocol::frame::{
    Final, Frame, InformationFrame, Poll, Sar, SupervisoryFrame, SupervisoryFunction,
};
use crate::protocol::transport::traits::{scheduler::Scheduler, sdu_sink::SduSink};

impl<S: Scheduler, U: SduSink> ErtmController<S, U> {
    /// Process one PDU received from the link.
    ///
    /// Malformed PDUs (bad length, FCS mismatch, wrong CID) are dropped without
    /// any response; the sequence numbers of later frames drive recovery.
    pub fn on_pdu(&mut self, pdu: Bytes, now: Instant) {
        if self.closed.is_some() {
            return;
        }
        let (cid, frame) = match self.codec.decode(pdu) {
            Ok(decoded) => decoded,
            Err(_e) => {
                #[cfg(feature = "defmt")]
                defmt::warn!(
                    "[ertm] cid {}: dropping PDU: {}",
                    self.config.local_cid.value(),
                    _e
                );
                return;
            }
        };
        if cid != self.config.local_cid {
            #[cfg(feature = "defmt")]
            defmt::warn!(
                "[ertm] cid {}: dropping PDU for cid {}",
                self.config.local_cid.value(),
                cid.value()
            );
            return;
        }

        match frame {
            Frame::Information(i) => self.recv_i_frame(i, now),
            Frame::Supervisory(SupervisoryFrame { s, req_seq, p, f }) => match s {
                SupervisoryFunction::ReceiverReady => self.recv_rr(req_seq, p, f, now),
                SupervisoryFunction::ReceiverNotReady => self.recv_rnr(req_seq, p, f, now),
                SupervisoryFunction::Reject => self.recv_rej(req_seq, p, f, now),
                SupervisoryFunction::SelectiveReject => self.recv_srej(req_seq, p, f, now),
            },
        }
    }

    //==================================================================================GUARDS
    /// ReqSeq within `[expected_ack_seq, next_tx_seq]` and F-bit acceptable.
    fn guard_ack(&mut self, req_seq: SeqNum, f: Final) -> bool {
        if !self.seq.with_valid_req_seq(req_seq) {
            self.close(CloseReason::InvalidReqSeq { req_seq });
            return false;
        }
        self.guard_f_bit(f)
    }

    /// ReqSeq names an unacked frame, F-bit acceptable, retry budget left.
    fn guard_retransmission(&mut self, req_seq: SeqNum, f: Final) -> bool {
        if !self.seq.with_valid_req_seq_retrans(req_seq) {
            self.close(CloseReason::InvalidReqSeq { req_seq });
            return false;
        }
        if !self.guard_f_bit(f) {
            return false;
        }
        if !self.retry_i_frames_less_than_max_transmit(req_seq) {
            self.close(CloseReason::RetryExhausted { tx_seq: req_seq });
            return false;
        }
        true
    }

    fn guard_f_bit(&mut self, f: Final) -> bool {
        if !with_valid_f_bit(self.tx_state, f) {
            self.close(CloseReason::InvalidFBit);
            return false;
        }
        true
    }

    //==================================================================================I_FRAMES
    fn recv_i_frame(&mut self, frame: InformationFrame, now: Instant) {
        let InformationFrame {
            tx_seq,
            req_seq,
            f,
            sar,
            sdu_len,
            payload,
        } = frame;
        if !self.guard_ack(req_seq, f) {
            return;
        }

        let class = self
            .seq
            .classify_tx_seq(tx_seq, self.config.local_tx_window);
        match (self.rx_state, class) {
            (_, TxSeqClass::Invalid) => self.close(CloseReason::InvalidTxSeq { tx_seq }),

            // Not stored: the peer resends it after we leave local busy.
            (_, TxSeqClass::Expected) if self.local_busy => self.pass_to_tx(req_seq, f, now),

            (_, TxSeqClass::Expected) => {
                self.seq.expected_tx_seq = tx_seq.next();
                self.pass_to_tx(req_seq, f, now);
                if !self.reassemble(sar, sdu_len, payload) {
                    return;
                }
                if f == Final::PollResponse {
                    if self.rej_actioned {
                        self.rej_actioned = false;
                    } else {
                        self.retransmit_i_frames(req_seq, Poll::NotSet, now);
                    }
                }
                self.rx_state = RxState::Recv;
                self.send_ack(now);
            }

            (_, TxSeqClass::Duplicate) => {
                self.pass_to_tx(req_seq, f, now);
                self.send_ack(now);
            }

            (RxState::Recv, TxSeqClass::Unexpected) if !self.local_busy => {
                #[cfg(feature = "defmt")]
                defmt::debug!(
                    "[ertm] cid {}: TxSeq {} out of sequence, expected {}",
                    self.config.local_cid.value(),
                    tx_seq,
                    self.seq.expected_tx_seq
                );
                self.pass_to_tx(req_seq, f, now);
                self.send_s_frame(SupervisoryFunction::Reject, Poll::NotSet, Final::NotSet);
                self.rx_state = RxState::RejSent;
            }

            (_, TxSeqClass::Unexpected) => self.pass_to_tx(req_seq, f, now),
        }
    }

    /// Hand an in-sequence segment to the reassembler. Returns `false` once the
    /// channel is closed on a SAR violation.
    fn reassemble(&mut self, sar: Sar, sdu_len: Option<u16>, payload: Bytes) -> bool {
        match self.reassembler.push(sar, sdu_len, payload) {
            Ok(Reassembly::Complete(sdu)) => {
                #[cfg(feature = "defmt")]
                defmt::trace!(
                    "[ertm] cid {}: delivering SDU of {} bytes",
                    self.config.local_cid.value(),
                    sdu.len()
                );
                self.sink.deliver(sdu);
                true
            }
            Ok(Reassembly::Pending) => true,
            Err(violation) => {
                self.close(CloseReason::Segmentation(violation));
                false
            }
        }
    }

    //==================================================================================S_FRAMES
    fn recv_rr(&mut self, req_seq: SeqNum, p: Poll, f: Final, now: Instant) {
        if !self.guard_ack(req_seq, f) {
            return;
        }
        match (p, f) {
            (Poll::Poll, _) => {
                let was_busy = self.remote_busy;
                self.remote_busy = false;
                self.pass_to_tx(req_seq, f, now);
                // RNR stopped the timer; frames still unacked need it back.
                if was_busy && !self.unacked.is_empty() {
                    self.alarm
                        .start_retransmission(now, self.config.retransmission_timeout);
                }
                self.send_i_or_rr_or_rnr(now);
            }
            (Poll::NotSet, Final::PollResponse) => {
                self.remote_busy = false;
                self.pass_to_tx(req_seq, f, now);
                if self.rej_actioned {
                    self.rej_actioned = false;
                } else {
                    self.retransmit_i_frames(req_seq, Poll::NotSet, now);
                }
                self.send_pending_i_frames(now);
            }
            (Poll::NotSet, Final::NotSet) => {
                if self.remote_busy && !self.unacked.is_empty() {
                    self.alarm
                        .start_retransmission(now, self.config.retransmission_timeout);
                }
                self.remote_busy = false;
                self.pass_to_tx(req_seq, f, now);
                self.send_pending_i_frames(now);
            }
        }
    }

    fn recv_rnr(&mut self, req_seq: SeqNum, p: Poll, f: Final, now: Instant) {
        if !self.guard_ack(req_seq, f) {
            return;
        }
        #[cfg(feature = "defmt")]
        defmt::debug!("[ertm] cid {}: remote busy", self.config.local_cid.value());
        self.remote_busy = true;
        self.pass_to_tx(req_seq, f, now);
        // The peer sends RR when it recovers; nothing to time out on meanwhile.
        self.alarm.stop_retransmission();
        if p == Poll::Poll {
            self.send_rr_or_rnr(Poll::NotSet, Final::PollResponse);
        }
    }

    fn recv_rej(&mut self, req_seq: SeqNum, p: Poll, f: Final, now: Instant) {
        if !self.guard_retransmission(req_seq, f) {
            return;
        }
        let outstanding = p_bit_outstanding(self.tx_state);
        self.remote_busy = false;
        self.pass_to_tx(req_seq, f, now);

        if f == Final::PollResponse {
            if self.rej_actioned {
                self.rej_actioned = false;
            } else {
                self.retransmit_i_frames(req_seq, p, now);
            }
        } else {
            self.retransmit_i_frames(req_seq, p, now);
            if outstanding {
                self.rej_actioned = true;
            }
        }
        self.send_pending_i_frames(now);
    }

    fn recv_srej(&mut self, req_seq: SeqNum, p: Poll, f: Final, now: Instant) {
        if !self.guard_retransmission(req_seq, f) {
            return;
        }
        let outstanding = p_bit_outstanding(self.tx_state);
        self.remote_busy = false;

        match (p, f) {
            (Poll::Poll, _) => {
                self.pass_to_tx(req_seq, f, now);
                self.retransmit_requested_i_frame(req_seq, Poll::Poll, now);
                self.send_pending_i_frames(now);
                if outstanding {
                    self.srej_actioned = true;
                    self.srej_save_req_seq = req_seq;
                }
            }
            (Poll::NotSet, Final::NotSet) => {
                self.retransmit_requested_i_frame(req_seq, Poll::NotSet, now);
                if outstanding {
                    self.srej_actioned = true;
                    self.srej_save_req_seq = req_seq;
                }
            }
            (Poll::NotSet, Final::PollResponse) => {
                self.pass_to_tx_f_bit(f, now);
                if self.srej_actioned && self.srej_save_req_seq == req_seq {
                    self.srej_actioned = false;
                } else {
                    self.retransmit_requested_i_frame(req_seq, Poll::NotSet, now);
                }
            }
        }
    }
}
