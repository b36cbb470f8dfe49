//! Abstraction traits implemented by the host (link, timer, scheduler, SDU sink).
pub mod ertm_timer;
pub mod l2cap_link;
pub mod scheduler;
pub mod sdu_sink;
