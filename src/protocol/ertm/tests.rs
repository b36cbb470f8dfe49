//! State-machine tests for `ErtmController`, driven by a scripted peer that
//! encodes frames by hand and decodes everything the controller emits.
use super::config::ErtmConfigBuilder;
use super::*;
use crate::core::Cid;
use crate::error::SarViolation;
use crate::protocol::frame::{Frame, InformationFrame, SupervisoryFrame, SupervisoryFunction};
use alloc::vec;
use alloc::vec::Vec;

const LOCAL: Cid = Cid(0x0040);
const REMOTE: Cid = Cid(0x0041);

//==================================================================================HARNESS
#[derive(Debug, Default)]
struct RecordingScheduler {
    ready: usize,
    close_requests: Vec<CloseReason>,
}

impl Scheduler for RecordingScheduler {
    fn on_packets_ready(&mut self, cid: Cid, count: usize) {
        assert_eq!(cid, LOCAL);
        self.ready += count;
    }

    fn on_close_requested(&mut self, cid: Cid, reason: CloseReason) {
        assert_eq!(cid, LOCAL);
        self.close_requests.push(reason);
    }
}

type Controller = ErtmController<RecordingScheduler, Vec<Bytes>>;

fn builder() -> ErtmConfigBuilder {
    ErtmConfig::builder(LOCAL, REMOTE)
}

fn controller(builder: ErtmConfigBuilder) -> Controller {
    let config = builder.build().expect("valid test config");
    ErtmController::new(config, RecordingScheduler::default(), Vec::new())
}

fn ms(millis: u64) -> Instant {
    Instant::from_millis(millis)
}

/// Decode every PDU the controller queued since the last drain.
fn drain(c: &mut Controller) -> Vec<Frame> {
    let codec = FrameCodec::new(REMOTE, c.config().fcs_enabled);
    let mut frames = Vec::new();
    while let Some(pdu) = c.next_packet() {
        let (cid, frame) = codec.decode(pdu).expect("controller emits valid PDUs");
        assert_eq!(cid, REMOTE);
        frames.push(frame);
    }
    frames
}

/// Deliver a peer frame addressed to the controller.
fn feed(c: &mut Controller, frame: Frame, now: Instant) {
    let codec = FrameCodec::new(LOCAL, c.config().fcs_enabled);
    c.on_pdu(codec.encode(&frame).unwrap(), now);
}

fn info(tx: u8, req: u8, f: Final, sar: Sar, sdu_len: Option<u16>, payload: &'static [u8]) -> Frame {
    Frame::Information(InformationFrame {
        tx_seq: SeqNum::new(tx),
        req_seq: SeqNum::new(req),
        f,
        sar,
        sdu_len,
        payload: Bytes::from_static(payload),
    })
}

fn unseg(tx: u8, req: u8, payload: &'static [u8]) -> Frame {
    info(tx, req, Final::NotSet, Sar::Unsegmented, None, payload)
}

fn sup(s: SupervisoryFunction, req: u8, p: Poll, f: Final) -> Frame {
    Frame::Supervisory(SupervisoryFrame {
        s,
        req_seq: SeqNum::new(req),
        p,
        f,
    })
}

fn rr(req: u8) -> Frame {
    sup(SupervisoryFunction::ReceiverReady, req, Poll::NotSet, Final::NotSet)
}

fn rr_final(req: u8) -> Frame {
    sup(SupervisoryFunction::ReceiverReady, req, Poll::NotSet, Final::PollResponse)
}

fn rr_poll(req: u8) -> Frame {
    sup(SupervisoryFunction::ReceiverReady, req, Poll::Poll, Final::NotSet)
}

fn submit(c: &mut Controller, sdu: &'static [u8], now: Instant) {
    c.submit(Bytes::from_static(sdu), now).expect("submit accepted");
}

/// Fire the armed timer at its exact deadline.
fn expire(c: &mut Controller) -> Instant {
    let deadline = c.poll_timeout().expect("a timer is armed");
    c.handle_timeout(deadline);
    deadline
}

//==================================================================================TRANSMIT
#[test]
/// One short SDU goes out unsegmented; RR acknowledging it stops the timer.
fn test_simple_exchange() {
    let mut c = controller(builder().with_tx_window(63).with_max_transmit(3));
    submit(&mut c, b"hello", ms(0));

    assert_eq!(drain(&mut c), vec![unseg(0, 0, b"hello")]);
    assert_eq!(c.unacked_count(), 1);
    assert_eq!(c.armed_timer(), Some(TimerKind::Retransmission));
    assert_eq!(c.poll_timeout(), Some(ms(2_000)));
    assert_eq!(c.scheduler().ready, 1);

    feed(&mut c, rr(1), ms(10));
    assert_eq!(c.unacked_count(), 0);
    assert_eq!(c.armed_timer(), None);
    assert!(drain(&mut c).is_empty());
}

#[test]
/// SDU larger than the MPS: START carries the total length.
fn test_segmented_submit() {
    let mut c = controller(builder().with_remote_mps(4));
    submit(&mut c, b"ABCDEFGHI", ms(0));

    assert_eq!(
        drain(&mut c),
        vec![
            info(0, 0, Final::NotSet, Sar::Start, Some(9), b"ABCD"),
            info(1, 0, Final::NotSet, Sar::Continuation, None, b"EFGH"),
            info(2, 0, Final::NotSet, Sar::End, None, b"I"),
        ]
    );
}

#[test]
/// New I-frames stop at the remote window and resume as acks arrive.
fn test_window_bound() {
    let mut c = controller(builder().with_remote_tx_window(3));
    for sdu in [&b"a"[..], b"b", b"c", b"d", b"e"] {
        c.submit(Bytes::from_static(sdu), ms(0)).unwrap();
        assert!(c.unacked_count() <= 3);
    }
    assert_eq!(drain(&mut c).len(), 3);
    assert_eq!(c.unacked_count(), 3);
    assert_eq!(c.pending_count(), 2);

    feed(&mut c, rr(2), ms(5));
    assert_eq!(drain(&mut c), vec![unseg(3, 0, b"d"), unseg(4, 0, b"e")]);
    assert_eq!(c.unacked_count(), 3);
    assert_eq!(c.pending_count(), 0);
}

#[test]
/// Sequence numbers wrap past 63 without disturbing acknowledgment.
fn test_sequence_wraps() {
    let mut c = controller(builder());
    for i in 0..70u32 {
        submit(&mut c, b"w", ms(i as u64));
        let frames = drain(&mut c);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].req_seq(), SeqNum::ZERO);
        match &frames[0] {
            Frame::Information(i_frame) => assert_eq!(i_frame.tx_seq.value() as u32, i % 64),
            other => panic!("expected I-frame, got {other:?}"),
        }
        feed(&mut c, rr(((i + 1) % 64) as u8), ms(i as u64));
        assert_eq!(c.unacked_count(), 0);
    }
    assert_eq!(c.next_tx_seq(), SeqNum::new(70 % 64));
}

#[test]
/// An I-frame from the peer acknowledges ours and the ack rides on our next I-frame.
fn test_ack_piggybacked_on_pending_frame() {
    let mut c = controller(builder().with_remote_tx_window(1));
    submit(&mut c, b"x", ms(0));
    submit(&mut c, b"y", ms(0));
    assert_eq!(drain(&mut c), vec![unseg(0, 0, b"x")]);

    feed(&mut c, unseg(0, 1, b"a"), ms(5));
    assert_eq!(c.sink(), &vec![Bytes::from_static(b"a")]);
    assert_eq!(drain(&mut c), vec![unseg(1, 1, b"y")]);
}

#[test]
/// SDU refused whole when it cannot fit the pending queue.
fn test_submit_preconditions() {
    let mut c = controller(
        builder()
            .with_remote_tx_window(1)
            .with_remote_mps(4)
            .with_max_pending_segments(2),
    );

    let oversized = Bytes::from(vec![0u8; u16::MAX as usize + 1]);
    assert_eq!(
        c.submit(oversized, ms(0)),
        Err(SubmitError::SduTooLarge { len: 65_536 })
    );

    // 4 segments: 1 fits the window, 3 would need the 2-slot queue.
    assert_eq!(
        c.submit(Bytes::from_static(b"0123456789abcdef"), ms(0)),
        Err(SubmitError::PendingQueueFull { capacity: 2 })
    );
    assert_eq!(c.pending_count(), 0);
    assert!(c.next_packet().is_none());

    assert!(c.submit(Bytes::from_static(b"0123456789ab"), ms(0)).is_ok());
    assert_eq!(c.unacked_count(), 1);
    assert_eq!(c.pending_count(), 2);
}

//==================================================================================RECEIVE
#[test]
/// Segments from the peer are reassembled and delivered once.
fn test_reassembles_peer_segments() {
    let mut c = controller(builder());
    feed(&mut c, info(0, 0, Final::NotSet, Sar::Start, Some(9), b"ABCD"), ms(0));
    feed(&mut c, info(1, 0, Final::NotSet, Sar::Continuation, None, b"EFGH"), ms(0));
    assert!(c.sink().is_empty());
    feed(&mut c, info(2, 0, Final::NotSet, Sar::End, None, b"I"), ms(0));

    assert_eq!(c.sink(), &vec![Bytes::from_static(b"ABCDEFGHI")]);
    assert_eq!(drain(&mut c), vec![rr(1), rr(2), rr(3)]);
}

#[test]
/// Out-of-order frame triggers exactly one REJ; in-order frames recover.
fn test_out_of_order_triggers_reject() {
    let mut c = controller(builder());
    feed(&mut c, unseg(1, 0, b"b"), ms(0));
    assert_eq!(
        drain(&mut c),
        vec![sup(SupervisoryFunction::Reject, 0, Poll::NotSet, Final::NotSet)]
    );
    assert_eq!(c.rx_state(), RxState::RejSent);

    // Further out-of-sequence frames do not repeat the REJ.
    feed(&mut c, unseg(2, 0, b"c"), ms(1));
    assert!(drain(&mut c).is_empty());

    feed(&mut c, unseg(0, 0, b"a"), ms(2));
    assert_eq!(c.rx_state(), RxState::Recv);
    feed(&mut c, unseg(1, 0, b"b"), ms(3));

    assert_eq!(
        c.sink(),
        &vec![Bytes::from_static(b"a"), Bytes::from_static(b"b")]
    );
    assert_eq!(drain(&mut c), vec![rr(1), rr(2)]);
}

#[test]
/// With the widest window a frame just ahead is still out of order, not a
/// duplicate.
fn test_out_of_order_rejected_at_widest_window() {
    let mut c = controller(builder().with_tx_window(63));
    feed(&mut c, unseg(1, 0, b"b"), ms(0));
    assert_eq!(
        drain(&mut c),
        vec![sup(SupervisoryFunction::Reject, 0, Poll::NotSet, Final::NotSet)]
    );
    assert_eq!(c.rx_state(), RxState::RejSent);
    assert!(c.sink().is_empty());

    feed(&mut c, unseg(0, 0, b"a"), ms(1));
    feed(&mut c, unseg(1, 0, b"b"), ms(2));
    assert_eq!(c.rx_state(), RxState::Recv);
    assert_eq!(
        c.sink(),
        &vec![Bytes::from_static(b"a"), Bytes::from_static(b"b")]
    );
}

#[test]
/// A duplicate I-frame is re-acknowledged but never re-delivered.
fn test_duplicate_not_redelivered() {
    let mut c = controller(builder());
    feed(&mut c, unseg(0, 0, b"a"), ms(0));
    feed(&mut c, unseg(0, 0, b"a"), ms(1));

    assert_eq!(c.sink().len(), 1);
    assert_eq!(c.expected_tx_seq(), SeqNum::new(1));
    assert_eq!(drain(&mut c), vec![rr(1), rr(1)]);
}

#[test]
/// Malformed, corrupted and misaddressed PDUs are dropped without effect.
fn test_bad_pdus_dropped() {
    let mut c = controller(builder().with_fcs(true));
    submit(&mut c, b"hello", ms(0));
    drain(&mut c);

    let peer = FrameCodec::new(LOCAL, true);
    let mut corrupted = peer.encode(&rr(1)).unwrap().to_vec();
    let last = corrupted.len() - 1;
    corrupted[last] ^= 0xFF;
    c.on_pdu(Bytes::from(corrupted), ms(1));
    c.on_pdu(Bytes::from_static(&[0x01, 0x00]), ms(1));
    let stranger = FrameCodec::new(Cid(0x0099), true);
    c.on_pdu(stranger.encode(&rr(1)).unwrap(), ms(1));

    assert_eq!(c.unacked_count(), 1);
    assert!(!c.is_closed());
    assert!(drain(&mut c).is_empty());

    c.on_pdu(peer.encode(&rr(1)).unwrap(), ms(2));
    assert_eq!(c.unacked_count(), 0);
}

//==================================================================================POLL_FINAL
#[test]
/// RR with P=1 is answered with RR F=1.
fn test_poll_answered_with_final() {
    let mut c = controller(builder());
    feed(&mut c, rr_poll(0), ms(0));
    assert_eq!(drain(&mut c), vec![rr_final(0)]);
}

#[test]
/// A pending I-frame carries the F-bit instead of a bare RR.
fn test_poll_answered_with_pending_i_frame() {
    let mut c = controller(builder().with_remote_tx_window(1));
    submit(&mut c, b"a", ms(0));
    submit(&mut c, b"b", ms(0));
    drain(&mut c);

    feed(&mut c, rr_poll(1), ms(1));
    assert_eq!(
        drain(&mut c),
        vec![info(1, 0, Final::PollResponse, Sar::Unsegmented, None, b"b")]
    );
}

#[test]
/// Lost I-frame: the retransmission timer polls, RR F=1 triggers the resend.
fn test_lost_frame_recovered_by_poll() {
    let mut c = controller(builder());
    submit(&mut c, b"a", ms(0));
    drain(&mut c);

    assert_eq!(expire(&mut c), ms(2_000));
    assert_eq!(drain(&mut c), vec![rr_poll(0)]);
    assert_eq!(c.tx_state(), TxState::WaitF);
    assert_eq!(c.armed_timer(), Some(TimerKind::Monitor));
    assert_eq!(c.poll_timeout(), Some(ms(14_000)));

    feed(&mut c, rr_final(0), ms(2_100));
    assert_eq!(drain(&mut c), vec![unseg(0, 0, b"a")]);
    assert_eq!(c.tx_state(), TxState::Xmit);
    assert_eq!(c.armed_timer(), Some(TimerKind::Retransmission));
    assert_eq!(c.poll_timeout(), Some(ms(4_100)));
}

#[test]
/// With max_transmit=2 the monitor re-polls twice, then closes.
fn test_monitor_timeout_exhaustion() {
    let mut c = controller(builder().with_max_transmit(2));
    submit(&mut c, b"a", ms(0));
    drain(&mut c);

    expire(&mut c);
    assert_eq!(drain(&mut c), vec![rr_poll(0)]);

    for _ in 0..2 {
        expire(&mut c);
        assert_eq!(drain(&mut c), vec![rr_poll(0)]);
        assert_eq!(c.armed_timer(), Some(TimerKind::Monitor));
    }

    expire(&mut c);
    assert!(drain(&mut c).is_empty());
    assert_eq!(c.close_reason(), Some(CloseReason::MonitorExhausted));
    assert_eq!(
        c.scheduler().close_requests,
        vec![CloseReason::MonitorExhausted]
    );
    assert_eq!(c.poll_timeout(), None);
    assert_eq!(c.unacked_count(), 0);
}

#[test]
/// F=1 while no poll is outstanding closes the channel.
fn test_unsolicited_final_closes() {
    let mut c = controller(builder());
    feed(&mut c, rr_final(0), ms(0));
    assert_eq!(c.close_reason(), Some(CloseReason::InvalidFBit));
}

//==================================================================================RETRANSMISSION
#[test]
/// REJ resends every unacked frame from its ReqSeq on.
fn test_reject_go_back_n() {
    let mut c = controller(builder());
    for sdu in [&b"a"[..], b"b", b"c"] {
        c.submit(Bytes::from_static(sdu), ms(0)).unwrap();
    }
    drain(&mut c);

    feed(
        &mut c,
        sup(SupervisoryFunction::Reject, 1, Poll::NotSet, Final::NotSet),
        ms(10),
    );
    assert_eq!(drain(&mut c), vec![unseg(1, 0, b"b"), unseg(2, 0, b"c")]);
    assert_eq!(c.expected_ack_seq(), SeqNum::new(1));
    assert_eq!(c.unacked_count(), 2);
    assert_eq!(c.poll_timeout(), Some(ms(2_010)));
}

#[test]
/// REJ during WAIT_F is actioned once; the F=1 answer does not resend again.
fn test_reject_actioned_while_polling() {
    let mut c = controller(builder());
    submit(&mut c, b"a", ms(0));
    drain(&mut c);
    expire(&mut c);
    drain(&mut c);

    feed(
        &mut c,
        sup(SupervisoryFunction::Reject, 0, Poll::NotSet, Final::NotSet),
        ms(2_100),
    );
    assert_eq!(drain(&mut c), vec![unseg(0, 0, b"a")]);
    assert_eq!(c.tx_state(), TxState::WaitF);

    feed(&mut c, rr_final(0), ms(2_200));
    assert!(drain(&mut c).is_empty());
    assert_eq!(c.tx_state(), TxState::Xmit);
    assert_eq!(c.armed_timer(), Some(TimerKind::Retransmission));
}

#[test]
/// Retransmitting a frame beyond max_transmit closes the channel exactly once.
fn test_retry_ceiling() {
    let mut c = controller(builder().with_max_transmit(2));
    submit(&mut c, b"a", ms(0));
    drain(&mut c);

    let rej = || sup(SupervisoryFunction::Reject, 0, Poll::NotSet, Final::NotSet);
    feed(&mut c, rej(), ms(1));
    feed(&mut c, rej(), ms(2));
    assert_eq!(drain(&mut c).len(), 2);
    assert!(!c.is_closed());

    feed(&mut c, rej(), ms(3));
    feed(&mut c, rej(), ms(4));
    assert!(drain(&mut c).is_empty());
    assert_eq!(
        c.scheduler().close_requests,
        vec![CloseReason::RetryExhausted {
            tx_seq: SeqNum::ZERO
        }]
    );
}

#[test]
/// SREJ with P=1 resends only the requested frame, carrying F=1.
fn test_selective_reject_with_poll() {
    let mut c = controller(builder());
    for sdu in [&b"a"[..], b"b", b"c"] {
        c.submit(Bytes::from_static(sdu), ms(0)).unwrap();
    }
    drain(&mut c);

    feed(
        &mut c,
        sup(SupervisoryFunction::SelectiveReject, 1, Poll::Poll, Final::NotSet),
        ms(5),
    );
    assert_eq!(
        drain(&mut c),
        vec![info(1, 0, Final::PollResponse, Sar::Unsegmented, None, b"b")]
    );
    assert_eq!(c.unacked_count(), 2);
}

#[test]
/// A SREJ repeated as the F=1 answer to our poll is not resent twice.
fn test_duplicate_selective_reject() {
    let mut c = controller(builder());
    submit(&mut c, b"a", ms(0));
    drain(&mut c);
    expire(&mut c);
    drain(&mut c);

    feed(
        &mut c,
        sup(SupervisoryFunction::SelectiveReject, 0, Poll::NotSet, Final::NotSet),
        ms(2_100),
    );
    assert_eq!(drain(&mut c), vec![unseg(0, 0, b"a")]);

    feed(
        &mut c,
        sup(SupervisoryFunction::SelectiveReject, 0, Poll::NotSet, Final::PollResponse),
        ms(2_200),
    );
    assert!(drain(&mut c).is_empty());
    assert_eq!(c.tx_state(), TxState::Xmit);
}

//==================================================================================BUSY
#[test]
/// RNR halts new I-frames and the retransmission timer until RR.
fn test_remote_busy() {
    let mut c = controller(builder());
    submit(&mut c, b"a", ms(0));
    drain(&mut c);

    feed(
        &mut c,
        sup(SupervisoryFunction::ReceiverNotReady, 0, Poll::NotSet, Final::NotSet),
        ms(1),
    );
    assert!(c.is_remote_busy());
    assert_eq!(c.armed_timer(), None);

    submit(&mut c, b"b", ms(2));
    assert!(drain(&mut c).is_empty());
    assert_eq!(c.pending_count(), 1);

    feed(&mut c, rr(1), ms(3));
    assert!(!c.is_remote_busy());
    assert_eq!(drain(&mut c), vec![unseg(1, 0, b"b")]);
    assert_eq!(c.armed_timer(), Some(TimerKind::Retransmission));
}

#[test]
/// A poll that ends remote busy re-arms the timer for frames still unacked.
fn test_poll_after_remote_busy_rearms_timer() {
    let mut c = controller(builder());
    submit(&mut c, b"x", ms(0));
    drain(&mut c);

    feed(
        &mut c,
        sup(SupervisoryFunction::ReceiverNotReady, 0, Poll::NotSet, Final::NotSet),
        ms(1),
    );
    assert_eq!(c.armed_timer(), None);

    feed(&mut c, rr_poll(0), ms(2));
    assert!(!c.is_remote_busy());
    assert_eq!(c.unacked_count(), 1);
    assert_eq!(drain(&mut c), vec![rr_final(0)]);
    assert_eq!(c.armed_timer(), Some(TimerKind::Retransmission));

    // Expiry polls the peer, whose F=1 answer drives the resend.
    expire(&mut c);
    assert_eq!(drain(&mut c), vec![rr_poll(0)]);
    assert_eq!(c.tx_state(), TxState::WaitF);
}

#[test]
/// Local busy: RNR out, I-frames ignored; clearing polls the peer.
fn test_local_busy_cycle() {
    let mut c = controller(builder());
    c.set_local_busy(true, ms(0));
    assert_eq!(
        drain(&mut c),
        vec![sup(SupervisoryFunction::ReceiverNotReady, 0, Poll::NotSet, Final::NotSet)]
    );

    feed(&mut c, unseg(0, 0, b"a"), ms(1));
    assert!(c.sink().is_empty());
    assert_eq!(c.expected_tx_seq(), SeqNum::ZERO);
    assert!(drain(&mut c).is_empty());

    c.set_local_busy(false, ms(2));
    assert_eq!(drain(&mut c), vec![rr_poll(0)]);
    assert_eq!(c.tx_state(), TxState::WaitF);
    assert_eq!(c.armed_timer(), Some(TimerKind::Monitor));

    feed(
        &mut c,
        info(0, 0, Final::PollResponse, Sar::Unsegmented, None, b"a"),
        ms(3),
    );
    assert_eq!(c.sink(), &vec![Bytes::from_static(b"a")]);
    assert_eq!(c.tx_state(), TxState::Xmit);
    assert_eq!(c.armed_timer(), None);
    assert_eq!(drain(&mut c), vec![rr(1)]);
}

//==================================================================================CLOSE
#[test]
/// ReqSeq acknowledging a frame never sent closes the channel.
fn test_invalid_req_seq_closes() {
    let mut c = controller(builder());
    feed(&mut c, rr(5), ms(0));

    assert_eq!(
        c.close_reason(),
        Some(CloseReason::InvalidReqSeq {
            req_seq: SeqNum::new(5)
        })
    );
    assert_eq!(
        c.submit(Bytes::from_static(b"late"), ms(1)),
        Err(SubmitError::ChannelClosed)
    );
    feed(&mut c, rr(6), ms(2));
    assert_eq!(c.scheduler().close_requests.len(), 1);
}

#[test]
/// TxSeq outside the receive window closes the channel.
fn test_invalid_tx_seq_closes() {
    let mut c = controller(builder().with_local_tx_window(10));
    feed(&mut c, unseg(30, 0, b"x"), ms(0));
    assert_eq!(
        c.close_reason(),
        Some(CloseReason::InvalidTxSeq {
            tx_seq: SeqNum::new(30)
        })
    );
}

#[test]
/// CONTINUATION without START is a fatal SAR violation.
fn test_sar_violation_closes() {
    let mut c = controller(builder());
    feed(
        &mut c,
        info(0, 0, Final::NotSet, Sar::Continuation, None, b"x"),
        ms(0),
    );
    assert_eq!(
        c.close_reason(),
        Some(CloseReason::Segmentation(SarViolation::MissingStart))
    );
    assert!(c.sink().is_empty());
    assert!(drain(&mut c).is_empty());
}

#[test]
/// Owner shutdown discards queues without asking the link to disconnect.
fn test_shutdown() {
    let mut c = controller(builder().with_remote_tx_window(1));
    submit(&mut c, b"a", ms(0));
    submit(&mut c, b"b", ms(0));
    c.shutdown();

    assert_eq!(c.close_reason(), Some(CloseReason::LocalShutdown));
    assert!(c.scheduler().close_requests.is_empty());
    assert!(c.next_packet().is_none());
    assert_eq!(c.pending_count(), 0);
    assert_eq!(c.unacked_count(), 0);
    assert_eq!(c.armed_timer(), None);
}
