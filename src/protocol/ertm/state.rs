//! Transmit/receive states and the guard predicates evaluated against the
//! channel's sequence variables before any event is acted on.
use crate::core::SeqNum;
use crate::protocol::frame::Final;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TxState {
    /// Normal transmission.
    #[default]
    Xmit,
    /// A poll (P=1) is outstanding; waiting for the matching F=1.
    WaitF,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RxState {
    /// In-sequence reception.
    #[default]
    Recv,
    /// A REJ was sent; further out-of-sequence frames are ignored until the
    /// expected one arrives.
    RejSent,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Position of a received TxSeq relative to the receive window.
pub enum TxSeqClass {
    Expected,
    /// Already received and acknowledged.
    Duplicate,
    /// Ahead of the expected frame but inside the window: a frame was lost.
    Unexpected,
    /// Outside every window; fatal.
    Invalid,
}

//==================================================================================SEQUENCE_VARIABLES
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Sequencing {
    /// TxSeq of the next new I-frame.
    pub next_tx_seq: SeqNum,
    /// Oldest TxSeq not yet acknowledged by the peer.
    pub expected_ack_seq: SeqNum,
    /// TxSeq we expect next from the peer; echoed as ReqSeq.
    pub expected_tx_seq: SeqNum,
}

impl Sequencing {
    /// I-frames sent and not yet acknowledged.
    pub fn unacked(&self) -> u8 {
        self.next_tx_seq.distance_from(self.expected_ack_seq)
    }

    pub fn with_expected_tx_seq(&self, tx_seq: SeqNum) -> bool {
        tx_seq == self.expected_tx_seq
    }

    pub fn with_duplicate_tx_seq(&self, tx_seq: SeqNum, local_tx_window: u8) -> bool {
        let behind = self.expected_tx_seq.distance_from(tx_seq);
        (1..=local_tx_window).contains(&behind)
    }

    pub fn with_unexpected_tx_seq(&self, tx_seq: SeqNum, local_tx_window: u8) -> bool {
        let ahead = tx_seq.distance_from(self.expected_tx_seq);
        ahead > 0 && ahead < local_tx_window
    }

    pub fn with_invalid_tx_seq(&self, tx_seq: SeqNum, local_tx_window: u8) -> bool {
        self.classify_tx_seq(tx_seq, local_tx_window) == TxSeqClass::Invalid
    }

    /// Windows above 32 make the duplicate and unexpected ranges overlap; the
    /// nearer reading wins, ties go to duplicate.
    pub fn classify_tx_seq(&self, tx_seq: SeqNum, local_tx_window: u8) -> TxSeqClass {
        if self.with_expected_tx_seq(tx_seq) {
            return TxSeqClass::Expected;
        }
        let duplicate = self.with_duplicate_tx_seq(tx_seq, local_tx_window);
        let unexpected = self.with_unexpected_tx_seq(tx_seq, local_tx_window);
        match (duplicate, unexpected) {
            (true, true) => {
                let ahead = tx_seq.distance_from(self.expected_tx_seq);
                let behind = self.expected_tx_seq.distance_from(tx_seq);
                if ahead < behind {
                    TxSeqClass::Unexpected
                } else {
                    TxSeqClass::Duplicate
                }
            }
            (true, false) => TxSeqClass::Duplicate,
            (false, true) => TxSeqClass::Unexpected,
            (false, false) => TxSeqClass::Invalid,
        }
    }

    /// `expected_ack_seq <= req_seq <= next_tx_seq`, modulo 64.
    pub fn with_valid_req_seq(&self, req_seq: SeqNum) -> bool {
        req_seq.distance_from(self.expected_ack_seq) <= self.unacked()
    }

    /// Like [`with_valid_req_seq`](Self::with_valid_req_seq) but `req_seq`
    /// must name a frame that was actually sent.
    pub fn with_valid_req_seq_retrans(&self, req_seq: SeqNum) -> bool {
        req_seq.distance_from(self.expected_ack_seq) < self.unacked()
    }

    pub fn rem_window_full(&self, remote_tx_window: u8) -> bool {
        self.unacked() >= remote_tx_window
    }
}

/// F=1 is only acceptable as the answer to our own outstanding poll.
pub fn with_valid_f_bit(tx_state: TxState, f: Final) -> bool {
    f == Final::NotSet || tx_state == TxState::WaitF
}

pub fn p_bit_outstanding(tx_state: TxState) -> bool {
    tx_state == TxState::WaitF
}
