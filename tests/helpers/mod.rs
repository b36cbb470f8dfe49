//! Test doubles to simulate the ACL link and timer during integration tests.
use bytes::Bytes;
use embassy_time::Instant;
use l2cap_ertm::protocol::transport::traits::{ertm_timer::ErtmTimer, l2cap_link::L2capLink};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::time::{sleep, Duration};

#[allow(dead_code)]
/// In-memory link reproducing the `L2capLink` trait behavior. Sends whose
/// index satisfies `drop_when` are silently lost.
pub struct MockLink {
    tx: mpsc::UnboundedSender<Bytes>,
    rx: Arc<Mutex<mpsc::UnboundedReceiver<Bytes>>>,
    sent: usize,
    drop_when: fn(usize) -> bool,
}

#[allow(dead_code)]
impl MockLink {
    /// Construct a pair of interconnected links (DUT ↔ peer).
    pub fn create_pair() -> (Self, Self) {
        let (dut_tx, peer_rx) = mpsc::unbounded_channel();
        let (peer_tx, dut_rx) = mpsc::unbounded_channel();

        let dut_link = Self {
            tx: dut_tx,
            rx: Arc::new(Mutex::new(dut_rx)),
            sent: 0,
            drop_when: |_| false,
        };

        let peer_link = Self {
            tx: peer_tx,
            rx: Arc::new(Mutex::new(peer_rx)),
            sent: 0,
            drop_when: |_| false,
        };

        (dut_link, peer_link)
    }

    /// Lose outgoing PDUs selected by their send index.
    pub fn lossy(mut self, drop_when: fn(usize) -> bool) -> Self {
        self.drop_when = drop_when;
        self
    }
}

impl L2capLink for MockLink {
    type Error = ();

    async fn send<'a>(&'a mut self, pdu: &'a [u8]) -> Result<(), Self::Error> {
        let index = self.sent;
        self.sent += 1;
        if (self.drop_when)(index) {
            return Ok(());
        }
        self.tx.send(Bytes::copy_from_slice(pdu)).map_err(|_| ())?;
        Ok(())
    }

    async fn recv(&mut self) -> Result<Bytes, Self::Error> {
        let mut rx = self.rx.lock().await;
        rx.recv().await.ok_or(())
    }
}

#[allow(dead_code)]
/// Timer based on `tokio::time::sleep`, counting from its creation.
pub struct MockTimer {
    epoch: std::time::Instant,
}

#[allow(dead_code)]
impl MockTimer {
    pub fn new() -> Self {
        Self {
            epoch: std::time::Instant::now(),
        }
    }
}

impl ErtmTimer for MockTimer {
    fn now(&self) -> Instant {
        Instant::from_micros(self.epoch.elapsed().as_micros() as u64)
    }

    async fn wait_until(&mut self, deadline: Instant) {
        let now = self.now();
        if deadline > now {
            sleep(Duration::from_micros((deadline - now).as_micros())).await;
        }
    }
}
