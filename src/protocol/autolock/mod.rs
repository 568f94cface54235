//! Auto-lock decision state machine.
//!
//! ```text
//!                 speed > 1, a door unlocked, all closed
//!   Determining ───────────────────────────────────────────▶ Sending
//!        ▲                                                     │
//!        │  lock sent / speed < 1 / more than MAX_RETRY fails  │
//!        └─────────────────────────────────────────────────────┘
//!                      (send failure ≤ MAX_RETRY: stay in Sending)
//! ```
//!
//! The machine is stepped once per received frame, whatever its identifier,
//! so retries progress at the pace of bus traffic. Speed is re-checked before
//! every transmission attempt: once the car has slowed to a stop the pending
//! lock is dropped.
pub mod supervisor;

use crate::protocol::ingress::VehicleState;
use crate::protocol::messages::DoorCommand;
use crate::protocol::transport::traits::can_bus::CanBus;

/// Speed (mph) the vehicle must exceed before a lock is armed. Dropping below
/// it cancels a pending lock.
pub const LOCK_THRESHOLD_MPH: u8 = 1;

/// Consecutive transmit failures tolerated before the attempt is abandoned.
pub const MAX_RETRY: u8 = 10;

//==================================================================================CONTROLLER_STATE
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
/// Phase of the lock protocol. Discriminants are the raw tags used when the
/// state is exchanged as a byte.
pub enum ControllerState {
    /// Watching the vehicle state for lock-worthiness.
    #[default]
    Determining = 0x10,
    /// Lock command pending, (re)transmitted on every step.
    Sending = 0x20,
}

impl ControllerState {
    /// Map a raw tag to a state. Unknown tags fall back to `Determining`.
    pub fn from_raw(raw: u8) -> Self {
        Self::try_from(raw).unwrap_or(ControllerState::Determining)
    }

    /// Raw tag of this state.
    pub const fn raw(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for ControllerState {
    type Error = u8;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        match raw {
            0x10 => Ok(ControllerState::Determining),
            0x20 => Ok(ControllerState::Sending),
            other => Err(other),
        }
    }
}

//==================================================================================STEP_OUTCOME
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// What a single [`AutoLock::step`] did.
pub enum StepOutcome {
    /// Determining, conditions not met. Nothing sent.
    Idle,
    /// Conditions met, moved to `Sending`. The first attempt happens on the next step.
    Armed,
    /// Lock command accepted by the transport after `retries` failed attempts.
    LockSent { retries: u8 },
    /// Speed dropped below the threshold; pending lock dropped after `retries` failures.
    Cancelled { retries: u8 },
    /// Transmission failed; `retries` consecutive failures so far.
    RetryPending { retries: u8 },
    /// More than [`MAX_RETRY`] consecutive failures; back to `Determining`.
    RetriesExhausted,
}

impl StepOutcome {
    /// True when the step changed something worth reporting.
    pub fn is_notable(&self) -> bool {
        !matches!(self, StepOutcome::Idle)
    }

    /// True when the step issued a transmission attempt.
    pub fn attempted_send(&self) -> bool {
        matches!(
            self,
            StepOutcome::LockSent { .. }
                | StepOutcome::RetryPending { .. }
                | StepOutcome::RetriesExhausted
        )
    }
}

//==================================================================================AUTO_LOCK
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Lock protocol state: current phase and consecutive failure count.
pub struct AutoLock {
    state: ControllerState,
    retry_count: u8,
}

impl AutoLock {
    /// Fresh machine: `Determining`, no retries.
    pub const fn new() -> Self {
        Self {
            state: ControllerState::Determining,
            retry_count: 0,
        }
    }

    /// Rebuild a machine from raw values supplied from outside (debug
    /// console, shared memory, ...).
    ///
    /// An unknown tag, or a counter beyond [`MAX_RETRY`], is treated as
    /// corrupted and yields a fresh machine. A `Determining` tag always
    /// comes back with a zero counter.
    pub fn restore(raw_state: u8, retry_count: u8) -> Self {
        match ControllerState::try_from(raw_state) {
            Ok(ControllerState::Sending) if retry_count <= MAX_RETRY => Self {
                state: ControllerState::Sending,
                retry_count,
            },
            Ok(ControllerState::Sending) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("Retry counter {} out of range, resetting", retry_count);
                Self::new()
            }
            Ok(ControllerState::Determining) => Self::new(),
            Err(_unknown) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("Invalid controller state {:#x}, resetting", _unknown);
                Self::new()
            }
        }
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn retry_count(&self) -> u8 {
        self.retry_count
    }

    /// True when every lock precondition holds: moving faster than the
    /// threshold, at least one door unlocked, every door closed.
    pub fn is_lock_worthy(vehicle: &VehicleState) -> bool {
        vehicle.speed_mph > LOCK_THRESHOLD_MPH
            && vehicle.doors_locked_status != 0
            && vehicle.doors_closed_status == 0
    }

    /// Advance the machine by one step against the current snapshot.
    ///
    /// Only the `Sending` phase touches the bus, with at most one
    /// transmission per step.
    pub fn step<C: CanBus>(&mut self, vehicle: &VehicleState, bus: &mut C) -> StepOutcome {
        match self.state {
            ControllerState::Determining => {
                if Self::is_lock_worthy(vehicle) {
                    #[cfg(feature = "defmt")]
                    defmt::info!(
                        "Lock armed: speed={} mph, lock status={:#x}",
                        vehicle.speed_mph,
                        vehicle.doors_locked_status
                    );
                    self.state = ControllerState::Sending;
                    StepOutcome::Armed
                } else {
                    StepOutcome::Idle
                }
            }

            ControllerState::Sending => {
                if vehicle.speed_mph < LOCK_THRESHOLD_MPH {
                    let retries = self.retry_count;
                    self.reset();
                    #[cfg(feature = "defmt")]
                    defmt::info!("Speed lower than threshold, not locking");
                    return StepOutcome::Cancelled { retries };
                }

                match DoorCommand::LockAll.send(bus) {
                    Ok(()) => {
                        let retries = self.retry_count;
                        self.reset();
                        #[cfg(feature = "defmt")]
                        defmt::info!("Sent lock message after {} retries", retries);
                        StepOutcome::LockSent { retries }
                    }
                    Err(_err) => {
                        self.retry_count = self.retry_count.saturating_add(1);
                        if self.retry_count > MAX_RETRY {
                            self.reset();
                            #[cfg(feature = "defmt")]
                            defmt::warn!("Retry count exceeded, will re-evaluate");
                            StepOutcome::RetriesExhausted
                        } else {
                            #[cfg(feature = "defmt")]
                            defmt::warn!(
                                "Lock send failed ({}/{}): {}",
                                self.retry_count,
                                MAX_RETRY,
                                defmt::Debug2Format(&_err)
                            );
                            StepOutcome::RetryPending {
                                retries: self.retry_count,
                            }
                        }
                    }
                }
            }
        }
    }

    fn reset(&mut self) {
        self.state = ControllerState::Determining;
        self.retry_count = 0;
    }
}
