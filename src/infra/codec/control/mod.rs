//! Packing and unpacking of the 16-bit enhanced control field carried by every
//! ERTM frame (Bluetooth Core, Vol 3 Part A §3.3.2).
//!
//! ```text
//! I-frame: | SAR:2 | ReqSeq:6 | F:1 | TxSeq:6 | 0 |
//! S-frame: | 00    | ReqSeq:6 | F:1 | 00 | P:1 | S:2 | 0 | 1 |
//!            bit 15                                       bit 0
//! ```

use crate::core::SeqNum;

/// Length in bytes of the enhanced control field.
pub const CONTROL_LEN: usize = 2;

const TYPE_BIT: u16 = 0x0001;
const TX_SEQ_SHIFT: u16 = 1;
const S_SHIFT: u16 = 2;
const P_BIT: u16 = 1 << 4;
const F_BIT: u16 = 1 << 7;
const REQ_SEQ_SHIFT: u16 = 8;
const SAR_SHIFT: u16 = 14;
const SEQ_FIELD: u16 = 0x3F;

//==================================================================================FIELD_ENUMS
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Frame family selected by bit 0.
pub enum FrameType {
    Information,
    Supervisory,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Segmentation-and-reassembly code of an I-frame.
pub enum Sar {
    Unsegmented,
    Start,
    End,
    Continuation,
}

impl Sar {
    const fn bits(self) -> u16 {
        match self {
            Sar::Unsegmented => 0b00,
            Sar::Start => 0b01,
            Sar::End => 0b10,
            Sar::Continuation => 0b11,
        }
    }

    const fn from_bits(bits: u16) -> Self {
        match bits & 0b11 {
            0b00 => Sar::Unsegmented,
            0b01 => Sar::Start,
            0b10 => Sar::End,
            _ => Sar::Continuation,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Supervisory function code of an S-frame.
pub enum SupervisoryFunction {
    /// RR: acknowledges up to ReqSeq and signals readiness.
    ReceiverReady,
    /// REJ: requests go-back-N retransmission from ReqSeq.
    Reject,
    /// RNR: acknowledges up to ReqSeq and signals local busy.
    ReceiverNotReady,
    /// SREJ: requests retransmission of the single frame ReqSeq.
    SelectiveReject,
}

impl SupervisoryFunction {
    const fn bits(self) -> u16 {
        match self {
            SupervisoryFunction::ReceiverReady => 0b00,
            SupervisoryFunction::Reject => 0b01,
            SupervisoryFunction::ReceiverNotReady => 0b10,
            SupervisoryFunction::SelectiveReject => 0b11,
        }
    }

    const fn from_bits(bits: u16) -> Self {
        match bits & 0b11 {
            0b00 => SupervisoryFunction::ReceiverReady,
            0b01 => SupervisoryFunction::Reject,
            0b10 => SupervisoryFunction::ReceiverNotReady,
            _ => SupervisoryFunction::SelectiveReject,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Poll bit: the sender requests an F-bit response.
pub enum Poll {
    #[default]
    NotSet,
    Poll,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Final bit: the frame answers an earlier poll.
pub enum Final {
    #[default]
    NotSet,
    PollResponse,
}

//==================================================================================ENHANCED_CONTROL
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Raw enhanced control field with typed accessors.
pub struct EnhancedControl(pub u16);

impl EnhancedControl {
    /// Pack an I-frame control field.
    pub fn information(tx_seq: SeqNum, req_seq: SeqNum, f: Final, sar: Sar) -> Self {
        let mut raw = (tx_seq.value() as u16) << TX_SEQ_SHIFT;
        raw |= (req_seq.value() as u16) << REQ_SEQ_SHIFT;
        raw |= sar.bits() << SAR_SHIFT;
        if f == Final::PollResponse {
            raw |= F_BIT;
        }
        Self(raw)
    }

    /// Pack an S-frame control field. Reserved bits are left at zero.
    pub fn supervisory(s: SupervisoryFunction, req_seq: SeqNum, p: Poll, f: Final) -> Self {
        let mut raw = TYPE_BIT;
        raw |= s.bits() << S_SHIFT;
        raw |= (req_seq.value() as u16) << REQ_SEQ_SHIFT;
        if p == Poll::Poll {
            raw |= P_BIT;
        }
        if f == Final::PollResponse {
            raw |= F_BIT;
        }
        Self(raw)
    }

    /// Read the field from its little-endian wire form.
    pub fn from_le_bytes(bytes: [u8; CONTROL_LEN]) -> Self {
        Self(u16::from_le_bytes(bytes))
    }

    /// Little-endian wire form.
    pub fn to_le_bytes(self) -> [u8; CONTROL_LEN] {
        self.0.to_le_bytes()
    }

    pub fn frame_type(&self) -> FrameType {
        if self.0 & TYPE_BIT == 0 {
            FrameType::Information
        } else {
            FrameType::Supervisory
        }
    }

    /// TxSeq, meaningful for I-frames only.
    pub fn tx_seq(&self) -> SeqNum {
        SeqNum::new(((self.0 >> TX_SEQ_SHIFT) & SEQ_FIELD) as u8)
    }

    pub fn req_seq(&self) -> SeqNum {
        SeqNum::new(((self.0 >> REQ_SEQ_SHIFT) & SEQ_FIELD) as u8)
    }

    pub fn final_bit(&self) -> Final {
        if self.0 & F_BIT != 0 {
            Final::PollResponse
        } else {
            Final::NotSet
        }
    }

    /// P-bit, meaningful for S-frames only (bit 4 belongs to TxSeq in I-frames).
    pub fn poll(&self) -> Poll {
        if self.frame_type() == FrameType::Supervisory && self.0 & P_BIT != 0 {
            Poll::Poll
        } else {
            Poll::NotSet
        }
    }

    /// SAR code, meaningful for I-frames only.
    pub fn sar(&self) -> Sar {
        Sar::from_bits(self.0 >> SAR_SHIFT)
    }

    /// Supervisory function, meaningful for S-frames only.
    pub fn supervisory_function(&self) -> SupervisoryFunction {
        SupervisoryFunction::from_bits(self.0 >> S_SHIFT)
    }
}
