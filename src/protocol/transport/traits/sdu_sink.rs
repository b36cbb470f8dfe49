//! Upper-layer consumer of reassembled SDUs, delivered in order.
use alloc::collections::VecDeque;
use alloc::vec::Vec;
use bytes::Bytes;

pub trait SduSink {
    fn deliver(&mut self, sdu: Bytes);
}

impl SduSink for Vec<Bytes> {
    fn deliver(&mut self, sdu: Bytes) {
        self.push(sdu);
    }
}

impl SduSink for VecDeque<Bytes> {
    fn deliver(&mut self, sdu: Bytes) {
        self.push_back(sdu);
    }
}

impl<U: SduSink + ?Sized> SduSink for &mut U {
    fn deliver(&mut self, sdu: Bytes) {
        (**self).deliver(sdu);
    }
}
