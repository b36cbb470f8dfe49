//! ERTM frame codec: I-frames and S-frames over an L2CAP basic header, with or
//! without the trailing FCS.
//!
//! ```text
//! | length:u16 | cid:u16 | control:u16 | [sdu_len:u16, START only] | payload | [fcs:u16] |
//! ```
//!
//! `length` counts every byte after the basic header, FCS included. All fields
//! are little-endian.
use alloc::vec::Vec;
use bytes::Bytes;

use crate::core::{Cid, SeqNum};
use crate::error::FrameError;
use crate::infra::codec::control::{EnhancedControl, FrameType, CONTROL_LEN};
use crate::infra::codec::fcs::{self, FCS_LEN};

pub use crate::infra::codec::control::{Final, Poll, Sar, SupervisoryFunction};

/// Basic L2CAP header: payload length + channel identifier.
pub const BASIC_HEADER_LEN: usize = 4;
/// Width of the SDU length prefix carried by START I-frames.
pub const SDU_LEN_FIELD: usize = 2;

//==================================================================================FRAMES
#[derive(Clone, Debug, PartialEq, Eq)]
/// Information frame carrying one SDU segment.
pub struct InformationFrame {
    pub tx_seq: SeqNum,
    pub req_seq: SeqNum,
    pub f: Final,
    pub sar: Sar,
    /// Total SDU length; present only on `Sar::Start`.
    pub sdu_len: Option<u16>,
    pub payload: Bytes,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Supervisory frame (RR, RNR, REJ, SREJ).
pub struct SupervisoryFrame {
    pub s: SupervisoryFunction,
    pub req_seq: SeqNum,
    pub p: Poll,
    pub f: Final,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Decoded ERTM frame.
pub enum Frame {
    Information(InformationFrame),
    Supervisory(SupervisoryFrame),
}

impl Frame {
    /// ReqSeq carried by either frame family.
    pub fn req_seq(&self) -> SeqNum {
        match self {
            Frame::Information(i) => i.req_seq,
            Frame::Supervisory(s) => s.req_seq,
        }
    }
}

//==================================================================================CODEC
#[derive(Clone, Copy, Debug)]
/// Encoder/decoder bound to one channel's negotiated framing options.
pub struct FrameCodec {
    /// Destination CID written into outgoing basic headers.
    remote_cid: Cid,
    fcs_enabled: bool,
}

impl FrameCodec {
    pub fn new(remote_cid: Cid, fcs_enabled: bool) -> Self {
        Self {
            remote_cid,
            fcs_enabled,
        }
    }

    /// Encode an I-frame. `sdu_len` is written only when `sar` is `Start`.
    pub fn encode_information(
        &self,
        tx_seq: SeqNum,
        req_seq: SeqNum,
        f: Final,
        sar: Sar,
        sdu_len: u16,
        payload: &[u8],
    ) -> Result<Bytes, FrameError> {
        let control = EnhancedControl::information(tx_seq, req_seq, f, sar);
        let prefix_len = if sar == Sar::Start { SDU_LEN_FIELD } else { 0 };
        let body_len = CONTROL_LEN + prefix_len + payload.len() + self.fcs_len();
        let length =
            u16::try_from(body_len).map_err(|_| FrameError::PayloadTooLarge { len: payload.len() })?;

        let mut out = Vec::with_capacity(BASIC_HEADER_LEN + body_len);
        out.extend_from_slice(&length.to_le_bytes());
        out.extend_from_slice(&self.remote_cid.value().to_le_bytes());
        out.extend_from_slice(&control.to_le_bytes());
        if sar == Sar::Start {
            out.extend_from_slice(&sdu_len.to_le_bytes());
        }
        out.extend_from_slice(payload);
        self.append_fcs(&mut out);
        Ok(Bytes::from(out))
    }

    /// Encode an S-frame.
    pub fn encode_supervisory(&self, frame: SupervisoryFrame) -> Bytes {
        let control = EnhancedControl::supervisory(frame.s, frame.req_seq, frame.p, frame.f);
        let body_len = CONTROL_LEN + self.fcs_len();

        let mut out = Vec::with_capacity(BASIC_HEADER_LEN + body_len);
        out.extend_from_slice(&(body_len as u16).to_le_bytes());
        out.extend_from_slice(&self.remote_cid.value().to_le_bytes());
        out.extend_from_slice(&control.to_le_bytes());
        self.append_fcs(&mut out);
        Bytes::from(out)
    }

    /// Encode any decoded frame back to its wire form.
    pub fn encode(&self, frame: &Frame) -> Result<Bytes, FrameError> {
        match frame {
            Frame::Information(i) => self.encode_information(
                i.tx_seq,
                i.req_seq,
                i.f,
                i.sar,
                i.sdu_len.unwrap_or(0),
                &i.payload,
            ),
            Frame::Supervisory(s) => Ok(self.encode_supervisory(*s)),
        }
    }

    /// Decode a received PDU, returning the destination CID from its basic header.
    ///
    /// The payload of an I-frame is a zero-copy slice of `pdu`.
    pub fn decode(&self, pdu: Bytes) -> Result<(Cid, Frame), FrameError> {
        let min_len = BASIC_HEADER_LEN + CONTROL_LEN + self.fcs_len();
        if pdu.len() < min_len {
            return Err(FrameError::TooShort { len: pdu.len() });
        }

        let declared = u16::from_le_bytes([pdu[0], pdu[1]]) as usize;
        let actual = pdu.len() - BASIC_HEADER_LEN;
        if declared != actual {
            return Err(FrameError::LengthMismatch { declared, actual });
        }

        if self.fcs_enabled {
            fcs::verify(&pdu).map_err(|(received, computed)| FrameError::FcsMismatch {
                received,
                computed,
            })?;
        }

        let cid = Cid(u16::from_le_bytes([pdu[2], pdu[3]]));
        let control = EnhancedControl::from_le_bytes([pdu[4], pdu[5]]);
        let body_start = BASIC_HEADER_LEN + CONTROL_LEN;
        let body_end = pdu.len() - self.fcs_len();

        let frame = match control.frame_type() {
            FrameType::Supervisory => {
                if body_end > body_start {
                    return Err(FrameError::SupervisoryPayload {
                        len: body_end - body_start,
                    });
                }
                Frame::Supervisory(SupervisoryFrame {
                    s: control.supervisory_function(),
                    req_seq: control.req_seq(),
                    p: control.poll(),
                    f: control.final_bit(),
                })
            }
            FrameType::Information => {
                let sar = control.sar();
                let (sdu_len, payload_start) = if sar == Sar::Start {
                    if body_end - body_start < SDU_LEN_FIELD {
                        return Err(FrameError::MissingSduLength);
                    }
                    let len = u16::from_le_bytes([pdu[body_start], pdu[body_start + 1]]);
                    (Some(len), body_start + SDU_LEN_FIELD)
                } else {
                    (None, body_start)
                };
                Frame::Information(InformationFrame {
                    tx_seq: control.tx_seq(),
                    req_seq: control.req_seq(),
                    f: control.final_bit(),
                    sar,
                    sdu_len,
                    payload: pdu.slice(payload_start..body_end),
                })
            }
        };

        Ok((cid, frame))
    }

    fn fcs_len(&self) -> usize {
        if self.fcs_enabled {
            FCS_LEN
        } else {
            0
        }
    }

    fn append_fcs(&self, out: &mut Vec<u8>) {
        if self.fcs_enabled {
            let fcs = fcs::compute(out);
            out.extend_from_slice(&fcs.to_le_bytes());
        }
    }
}
