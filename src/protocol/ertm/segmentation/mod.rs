//! SDU segmentation into I-frame payloads and the matching receive-side
//! reassembly of segments back into SDUs.
use alloc::vec::Vec;
use bytes::Bytes;

use crate::error::SarViolation;
use crate::protocol::frame::Sar;

//==================================================================================SEGMENTER
#[derive(Clone, Debug, PartialEq, Eq)]
/// One I-frame worth of SDU data, not yet bound to a sequence number.
pub struct Segment {
    pub sar: Sar,
    /// Total SDU length; only written on the wire for `Sar::Start`.
    pub sdu_len: u16,
    pub payload: Bytes,
}

/// Number of segments an SDU of `len` bytes splits into.
pub fn segment_count(len: usize, mps: usize) -> usize {
    if len <= mps {
        1
    } else {
        len.div_ceil(mps)
    }
}

/// Lazy iterator slicing an SDU into segments of at most `mps` bytes.
///
/// Every segment is a zero-copy view into the original SDU.
#[derive(Debug)]
pub struct Segments {
    sdu: Bytes,
    mps: usize,
    offset: usize,
    done: bool,
}

impl Segments {
    /// `sdu` must not exceed `u16::MAX` bytes; `mps` must be non-zero.
    pub fn new(sdu: Bytes, mps: usize) -> Self {
        Self {
            sdu,
            mps: mps.max(1),
            offset: 0,
            done: false,
        }
    }
}

impl Iterator for Segments {
    type Item = Segment;

    fn next(&mut self) -> Option<Segment> {
        if self.done {
            return None;
        }

        let total = self.sdu.len();
        let sdu_len = total as u16;

        // Fits in one PDU (the empty SDU included).
        if self.offset == 0 && total <= self.mps {
            self.done = true;
            return Some(Segment {
                sar: Sar::Unsegmented,
                sdu_len,
                payload: self.sdu.clone(),
            });
        }

        let take = self.mps.min(total - self.offset);
        let end = self.offset + take;
        let sar = if self.offset == 0 {
            Sar::Start
        } else if end == total {
            Sar::End
        } else {
            Sar::Continuation
        };

        let payload = self.sdu.slice(self.offset..end);
        self.offset = end;
        self.done = end == total;

        Some(Segment {
            sar,
            sdu_len,
            payload,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            return (0, Some(0));
        }
        let remaining = if self.offset == 0 {
            segment_count(self.sdu.len(), self.mps)
        } else {
            (self.sdu.len() - self.offset).div_ceil(self.mps)
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Segments {}

//==================================================================================REASSEMBLER
#[derive(Debug, PartialEq, Eq)]
pub enum Reassembly {
    /// Segment absorbed; more are needed before the SDU is complete.
    Pending,
    /// The segment completed an SDU.
    Complete(Bytes),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum SarState {
    Idle,
    InProgress,
}

/// Receive-side SDU rebuilder. Segments must arrive in sequence order, which
/// the controller guarantees by only feeding expected I-frames.
#[derive(Debug)]
pub struct Reassembler {
    state: SarState,
    buffer: Vec<u8>,
    remaining: usize,
}

impl Default for Reassembler {
    fn default() -> Self {
        Self::new()
    }
}

impl Reassembler {
    pub const fn new() -> Self {
        Self {
            state: SarState::Idle,
            buffer: Vec::new(),
            remaining: 0,
        }
    }

    /// True while a START has been absorbed and its END is still missing.
    pub fn in_progress(&self) -> bool {
        self.state == SarState::InProgress
    }

    /// Drop any partial SDU.
    pub fn reset(&mut self) {
        self.state = SarState::Idle;
        self.buffer = Vec::new();
        self.remaining = 0;
    }

    /// Feed one in-sequence segment.
    ///
    /// On error the partial SDU is discarded and the reassembler is idle again.
    pub fn push(
        &mut self,
        sar: Sar,
        sdu_len: Option<u16>,
        payload: Bytes,
    ) -> Result<Reassembly, SarViolation> {
        let result = self.absorb(sar, sdu_len, payload);
        if result.is_err() {
            self.reset();
        }
        result
    }

    fn absorb(
        &mut self,
        sar: Sar,
        sdu_len: Option<u16>,
        payload: Bytes,
    ) -> Result<Reassembly, SarViolation> {
        match (self.state, sar) {
            (SarState::InProgress, Sar::Unsegmented | Sar::Start) => Err(SarViolation::Interleaved),
            (SarState::Idle, Sar::Continuation | Sar::End) => Err(SarViolation::MissingStart),

            (SarState::Idle, Sar::Unsegmented) => Ok(Reassembly::Complete(payload)),

            (SarState::Idle, Sar::Start) => {
                let total = sdu_len.unwrap_or(0) as usize;
                if payload.len() > total {
                    return Err(SarViolation::Overrun {
                        excess: payload.len() - total,
                    });
                }
                self.buffer = Vec::with_capacity(total);
                self.buffer.extend_from_slice(&payload);
                self.remaining = total - payload.len();
                self.state = SarState::InProgress;
                Ok(Reassembly::Pending)
            }

            (SarState::InProgress, Sar::Continuation | Sar::End) => {
                if payload.len() > self.remaining {
                    return Err(SarViolation::Overrun {
                        excess: payload.len() - self.remaining,
                    });
                }
                self.buffer.extend_from_slice(&payload);
                self.remaining -= payload.len();

                if sar == Sar::Continuation {
                    return Ok(Reassembly::Pending);
                }
                if self.remaining != 0 {
                    return Err(SarViolation::Truncated {
                        missing: self.remaining,
                    });
                }
                let sdu = core::mem::take(&mut self.buffer);
                self.reset();
                Ok(Reassembly::Complete(Bytes::from(sdu)))
            }
        }
    }
}
