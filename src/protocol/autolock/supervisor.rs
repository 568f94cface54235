//! Control loop built on top of [`AutoLock`].
//!
//! The runner owns the bus, the cached [`VehicleState`] and the state
//! machine. Each iteration polls at most one frame; when one arrives it is
//! classified, then the machine is stepped exactly once.
//!
//! Firmware may pass a pre-allocated [`embassy_sync::channel::Channel`] to
//! observe what the controller does (LED, console, telemetry). No allocation
//! is performed by the library and events are dropped rather than blocking
//! the loop when the channel is full.

use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll};

use embassy_sync::{
    blocking_mutex::raw::RawMutex,
    channel::{Channel, Receiver, Sender},
};
use embassy_time::Duration;

use crate::error::ExtractionError;
use crate::protocol::autolock::{AutoLock, StepOutcome};
use crate::protocol::ingress::VehicleState;
use crate::protocol::transport::can_id::CanId;
use crate::protocol::transport::traits::can_bus::CanBus;
use crate::protocol::transport::traits::poll_timer::PollTimer;

/// Status signals published by the runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LockEvent {
    /// A step that did something (armed, sent, retried, cancelled, gave up).
    Step(StepOutcome),
    /// A frame of interest was too short; the snapshot was not updated.
    MalformedFrame { id: CanId, error: ExtractionError },
    /// The transport reported a receive error.
    ReceiveFault,
}

/// Service assembling the runner and its optional event channel.
pub struct AutoLockService<'a, C: CanBus, M: RawMutex, const CAP: usize> {
    bus: C,
    event_channel: Option<&'a Channel<M, LockEvent, CAP>>,
}

impl<'a, C, M, const CAP: usize> AutoLockService<'a, C, M, CAP>
where
    C: CanBus,
    M: RawMutex,
{
    pub fn new(bus: C, event_channel: Option<&'a Channel<M, LockEvent, CAP>>) -> Self {
        Self { bus, event_channel }
    }

    /// Split into event receiver and runner.
    pub fn into_parts(self) -> AutoLockServiceParts<'a, C, M, CAP> {
        let events = self.event_channel.map(|channel| LockEvents {
            receiver: channel.receiver(),
        });
        AutoLockServiceParts {
            events,
            runner: AutoLockRunner {
                bus: self.bus,
                vehicle: VehicleState::new(),
                machine: AutoLock::new(),
                events: self.event_channel.map(|channel| channel.sender()),
            },
        }
    }
}

/// Bundle returned by [`AutoLockService::into_parts`].
pub struct AutoLockServiceParts<'a, C: CanBus, M: RawMutex, const CAP: usize> {
    pub events: Option<LockEvents<'a, M, CAP>>,
    pub runner: AutoLockRunner<'a, C, M, CAP>,
}

/// Receiver side of the event channel.
pub struct LockEvents<'a, M: RawMutex, const CAP: usize> {
    receiver: Receiver<'a, M, LockEvent, CAP>,
}

impl<'a, M: RawMutex, const CAP: usize> LockEvents<'a, M, CAP> {
    pub async fn recv(&mut self) -> LockEvent {
        self.receiver.receive().await
    }

    /// Next queued event, if any.
    pub fn try_recv(&mut self) -> Option<LockEvent> {
        self.receiver.try_receive().ok()
    }
}

/// Runner that drives the control loop.
pub struct AutoLockRunner<'a, C: CanBus, M: RawMutex, const CAP: usize> {
    bus: C,
    vehicle: VehicleState,
    machine: AutoLock,
    events: Option<Sender<'a, M, LockEvent, CAP>>,
}

impl<'a, C, M, const CAP: usize> AutoLockRunner<'a, C, M, CAP>
where
    C: CanBus,
    M: RawMutex,
{
    /// One control loop iteration.
    ///
    /// Returns `None` when no frame was available (or the receive failed);
    /// the machine is not stepped in that case. Otherwise returns the
    /// outcome of the single step run for the frame, relevant or not.
    pub fn poll_once(&mut self) -> Option<StepOutcome> {
        let frame = match self.bus.try_recv() {
            Ok(Some(frame)) => frame,
            Ok(None) => return None,
            Err(_err) => {
                #[cfg(feature = "defmt")]
                defmt::error!("Receive error: {}", defmt::Debug2Format(&_err));
                self.publish(LockEvent::ReceiveFault);
                return None;
            }
        };

        if let Err(error) = self.vehicle.apply(&frame) {
            #[cfg(feature = "defmt")]
            defmt::warn!("Dropping malformed frame {:#x}: {}", frame.id.raw(), error);
            self.publish(LockEvent::MalformedFrame {
                id: frame.id,
                error,
            });
        }

        let outcome = self.machine.step(&self.vehicle, &mut self.bus);
        if outcome.is_notable() {
            self.publish(LockEvent::Step(outcome));
        }
        Some(outcome)
    }

    /// Run the loop forever, sleeping `idle` whenever the bus had nothing.
    ///
    /// After each processed frame the task yields once to the executor, so
    /// a saturated bus cannot starve other tasks sharing it.
    pub async fn drive<T: PollTimer>(mut self, mut timer: T, idle: Duration) {
        loop {
            if self.poll_once().is_none() {
                timer.delay(idle).await;
            } else {
                YieldNow::default().await;
            }
        }
    }

    /// Current vehicle snapshot.
    pub fn vehicle(&self) -> &VehicleState {
        &self.vehicle
    }

    /// Current state machine.
    pub fn auto_lock(&self) -> &AutoLock {
        &self.machine
    }

    pub fn bus_mut(&mut self) -> &mut C {
        &mut self.bus
    }

    fn publish(&self, event: LockEvent) {
        if let Some(sender) = &self.events {
            if sender.try_send(event).is_err() {
                #[cfg(feature = "defmt")]
                defmt::trace!("Event channel full, dropping {}", event);
            }
        }
    }
}

/// Completes on its second poll, waking itself after the first.
#[derive(Default)]
struct YieldNow {
    yielded: bool,
}

impl Future for YieldNow {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.yielded {
            return Poll::Ready(());
        }
        self.yielded = true;
        cx.waker().wake_by_ref();
        Poll::Pending
    }
}
