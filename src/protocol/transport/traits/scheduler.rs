//! Link-side collaborator of a controller: told when PDUs are ready to be pulled
//! and when the channel must be disconnected.
use crate::core::Cid;
use crate::error::CloseReason;

pub trait Scheduler {
    /// `count` more PDUs can be pulled with
    /// [`ErtmController::next_packet`](crate::protocol::ertm::ErtmController::next_packet).
    fn on_packets_ready(&mut self, cid: Cid, count: usize);

    /// The controller hit a fatal protocol error and asks the link layer to tear
    /// the channel down. Called at most once per controller.
    fn on_close_requested(&mut self, cid: Cid, reason: CloseReason) {
        let _ = (cid, reason);
    }
}

impl<S: Scheduler + ?Sized> Scheduler for &mut S {
    fn on_packets_ready(&mut self, cid: Cid, count: usize) {
        (**self).on_packets_ready(cid, count);
    }

    fn on_close_requested(&mut self, cid: Cid, reason: CloseReason) {
        (**self).on_close_requested(cid, reason);
    }
}
