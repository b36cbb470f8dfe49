//! Primitive types shared by the codec and the ERTM engine.
//!
//! Sequence numbers live in a 6-bit space: every constructor and every
//! arithmetic helper reduces modulo [`MAX_TX_WINDOW`], so two values can only
//! be compared through their distance, never through `<`/`>`.
use core::fmt;

/// Size of the standard ERTM sequence space (6-bit TxSeq/ReqSeq).
pub const MAX_TX_WINDOW: u8 = 64;

const SEQ_MASK: u8 = MAX_TX_WINDOW - 1;

//==================================================================================CID
/// L2CAP channel identifier assigned by the link layer during channel setup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Cid(pub u16);

impl Cid {
    /// Raw 16-bit value.
    pub const fn value(self) -> u16 {
        self.0
    }
}

impl fmt::Display for Cid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#06x}", self.0)
    }
}

//==================================================================================SEQ_NUM
/// TxSeq / ReqSeq value, always kept in `0..64`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SeqNum(u8);

impl SeqNum {
    pub const ZERO: SeqNum = SeqNum(0);

    /// Build a sequence number, discarding bits above the 6-bit window.
    pub const fn new(value: u8) -> Self {
        Self(value & SEQ_MASK)
    }

    /// Raw value in `0..64`.
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Successor modulo 64.
    pub const fn next(self) -> Self {
        Self::new(self.0.wrapping_add(1))
    }

    /// Advance by `count` positions modulo 64.
    pub const fn advance(self, count: u8) -> Self {
        Self::new(self.0.wrapping_add(count))
    }

    /// Step back by `count` positions modulo 64.
    pub const fn rewind(self, count: u8) -> Self {
        Self::new(self.0.wrapping_sub(count))
    }

    /// Forward distance from `earlier` to `self`, i.e. `(self - earlier) mod 64`.
    pub const fn distance_from(self, earlier: SeqNum) -> u8 {
        self.0.wrapping_sub(earlier.0) & SEQ_MASK
    }

    /// Iterate `self, self+1, ...` up to (excluding) `end`, wrapping at 64.
    pub fn range_to(self, end: SeqNum) -> SeqRange {
        SeqRange {
            next: self,
            remaining: end.distance_from(self),
        }
    }
}

impl From<u8> for SeqNum {
    fn from(value: u8) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for SeqNum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Half-open, wrapping range of sequence numbers produced by [`SeqNum::range_to`].
#[derive(Clone, Debug)]
pub struct SeqRange {
    next: SeqNum,
    remaining: u8,
}

impl Iterator for SeqRange {
    type Item = SeqNum;

    fn next(&mut self) -> Option<SeqNum> {
        if self.remaining == 0 {
            return None;
        }
        let current = self.next;
        self.next = current.next();
        self.remaining -= 1;
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining as usize, Some(self.remaining as usize))
    }
}

impl ExactSizeIterator for SeqRange {}
