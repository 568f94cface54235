/// Test doubles to simulate the CAN bus and timer during integration tests.
use prius_autolock::protocol::transport::{
    can_frame::CanFrame,
    can_id::CanId,
    traits::{can_bus::CanBus, poll_timer::PollTimer},
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TryRecvError};
use tokio::time::sleep;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(dead_code)]
pub enum MockBusError {
    /// Scripted transmission failure (NACK, arbitration loss...).
    Rejected,
    /// The other end of the pair was dropped.
    Closed,
}

#[allow(dead_code)]
/// In-memory CAN bus reproducing the `CanBus` trait behavior.
pub struct MockCanBus {
    tx: mpsc::UnboundedSender<CanFrame>,
    rx: mpsc::UnboundedReceiver<CanFrame>,
    /// Number of upcoming sends from the DUT side to reject.
    rejections: Arc<AtomicUsize>,
    reject_own_sends: bool,
}

#[allow(dead_code)]
impl MockCanBus {
    /// Construct a pair of interconnected buses (DUT ↔ host).
    pub fn create_pair() -> (Self, Self) {
        let (dut_tx, host_rx) = mpsc::unbounded_channel();
        let (host_tx, dut_rx) = mpsc::unbounded_channel();
        let rejections = Arc::new(AtomicUsize::new(0));

        let dut_bus = Self {
            tx: dut_tx,
            rx: dut_rx,
            rejections: rejections.clone(),
            reject_own_sends: true,
        };

        let host_bus = Self {
            tx: host_tx,
            rx: host_rx,
            rejections,
            reject_own_sends: false,
        };

        (dut_bus, host_bus)
    }

    /// Host side: queue a frame for the DUT.
    pub fn inject(&self, id: u32, payload: &[u8]) {
        let frame = CanFrame::new(CanId(id), payload).expect("test frame must be valid");
        self.tx.send(frame).expect("DUT side dropped");
    }

    /// Host side: make the next `count` DUT transmissions fail.
    pub fn reject_next_sends(&self, count: usize) {
        self.rejections.store(count, Ordering::SeqCst);
    }

    /// Host side: frame emitted by the DUT, if any.
    pub fn try_next_sent(&mut self) -> Option<CanFrame> {
        self.rx.try_recv().ok()
    }

    /// Host side: wait for the DUT to emit a frame.
    pub async fn next_sent(&mut self) -> Option<CanFrame> {
        self.rx.recv().await
    }

    /// Host side: every frame emitted by the DUT and not yet read.
    pub fn drain_sent(&mut self) -> Vec<CanFrame> {
        let mut frames = Vec::new();
        while let Ok(frame) = self.rx.try_recv() {
            frames.push(frame);
        }
        frames
    }
}

impl CanBus for MockCanBus {
    type Error = MockBusError;

    fn send(&mut self, frame: &CanFrame) -> Result<(), Self::Error> {
        if self.reject_own_sends {
            let pending = self.rejections.load(Ordering::SeqCst);
            if pending > 0 {
                self.rejections.store(pending - 1, Ordering::SeqCst);
                return Err(MockBusError::Rejected);
            }
        }
        self.tx.send(*frame).map_err(|_| MockBusError::Closed)
    }

    fn try_recv(&mut self) -> Result<Option<CanFrame>, Self::Error> {
        match self.rx.try_recv() {
            Ok(frame) => Ok(Some(frame)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(MockBusError::Closed),
        }
    }
}

#[allow(dead_code)]
#[derive(Clone, Default)]
/// Timer based on `tokio::time::sleep` that counts idle back-offs.
pub struct MockTimer {
    pub delays: Arc<AtomicUsize>,
}

impl PollTimer for MockTimer {
    async fn delay(&mut self, duration: embassy_time::Duration) {
        self.delays.fetch_add(1, Ordering::SeqCst);
        sleep(std::time::Duration::from_micros(duration.as_micros())).await;
    }
}
