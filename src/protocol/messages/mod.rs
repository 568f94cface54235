//! Typed views over the frames the controller cares about, plus the constant
//! door commands it can emit.
//!
//! Layouts come from bus captures on a third generation Prius:
//!
//! ```text
//! 0x3CA  xx:xx:SS:..      SS = vehicle speed, km/h
//! 0x5B6  64:LL:OO         LL = lock status (0x00 all locked, 0xC5 all unlocked)
//!                         OO = door open bits (0x00 all closed)
//! 0x5B6  E4:C4:00         command: lock all doors
//! 0x5B6  E4:C5:00         command: unlock all doors
//! ```
use crate::error::{ExtractionError, SendLockError};
use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::can_id::CanId;
use crate::protocol::transport::traits::can_bus::CanBus;
use crate::protocol::transport::{DOOR_LOCKS_ID, VEHICLE_SPEED_ID};

//==================================================================================FRAME_DATA
/// Implemented by every message decoded from a single frame.
pub trait FrameData: Sized {
    /// Identifier the message is broadcast on.
    const ID: CanId;
    /// Minimum number of payload bytes needed to decode the message.
    const MIN_LEN: usize;

    /// Decode from a payload already known to carry at least `MIN_LEN` bytes.
    fn decode(payload: &[u8]) -> Self;

    /// Check identifier and length, then decode.
    fn from_frame(frame: &CanFrame) -> Result<Self, ExtractionError> {
        if frame.id != Self::ID {
            return Err(ExtractionError::UnexpectedIdentifier { id: frame.id.raw() });
        }
        let payload = frame.payload();
        if payload.len() < Self::MIN_LEN {
            return Err(ExtractionError::InvalidDataLen {
                expected: Self::MIN_LEN,
                actual: payload.len(),
            });
        }
        Ok(Self::decode(payload))
    }
}

//==================================================================================VEHICLE_SPEED
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Vehicle speed broadcast (`0x3CA`).
pub struct VehicleSpeed {
    /// Raw km/h byte as seen on the bus.
    pub kph: u8,
    /// Converted speed, rounded up to the next whole mph.
    pub mph: u8,
}

impl FrameData for VehicleSpeed {
    const ID: CanId = VEHICLE_SPEED_ID;
    const MIN_LEN: usize = 3;

    fn decode(payload: &[u8]) -> Self {
        let kph = payload[2];
        Self {
            kph,
            mph: kph_to_mph(kph),
        }
    }
}

/// `ceil(kph * 0.6214)` computed with integers.
///
/// Rounding up biases the result toward the faster side so the controller
/// never under-reports speed. The largest input gives 159, so the value
/// always fits a `u8`.
pub const fn kph_to_mph(kph: u8) -> u8 {
    ((kph as u32 * 6214 + 9999) / 10000) as u8
}

//==================================================================================DOOR_STATUS
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Door status broadcast (`0x5B6`).
pub struct DoorStatus {
    /// Byte 1. Zero once every door reports locked; any set bit means at
    /// least one door is still unlocked.
    pub locked_status: u8,
    /// Byte 2. Zero when all doors are closed.
    pub closed_status: u8,
}

impl FrameData for DoorStatus {
    const ID: CanId = DOOR_LOCKS_ID;
    const MIN_LEN: usize = 3;

    fn decode(payload: &[u8]) -> Self {
        Self {
            locked_status: payload[1],
            closed_status: payload[2],
        }
    }
}

impl DoorStatus {
    /// At least one door reports unlocked.
    pub fn any_unlocked(&self) -> bool {
        self.locked_status != 0
    }

    /// Every door is closed.
    pub fn all_closed(&self) -> bool {
        self.closed_status == 0
    }
}

//==================================================================================DOOR_COMMAND
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Commands accepted by the body ECU on `0x5B6`.
pub enum DoorCommand {
    LockAll,
    UnlockAll,
}

/// `E4:C4:00`, lock every door.
pub const LOCK_ALL_DOORS: CanFrame =
    CanFrame::standard(DOOR_LOCKS_ID, [0xE4, 0xC4, 0x00, 0, 0, 0, 0, 0], 3);

/// `E4:C5:00`, unlock every door.
pub const UNLOCK_ALL_DOORS: CanFrame =
    CanFrame::standard(DOOR_LOCKS_ID, [0xE4, 0xC5, 0x00, 0, 0, 0, 0, 0], 3);

impl DoorCommand {
    /// Constant frame for this command. Identical on every call.
    pub const fn frame(self) -> &'static CanFrame {
        match self {
            DoorCommand::LockAll => &LOCK_ALL_DOORS,
            DoorCommand::UnlockAll => &UNLOCK_ALL_DOORS,
        }
    }

    /// Single fire-and-forget transmission attempt.
    pub fn send<C: CanBus>(self, bus: &mut C) -> Result<(), SendLockError<C::Error>> {
        bus.send(self.frame()).map_err(SendLockError::Send)
    }
}
