//! Bus ingress classifier: picks the frames of interest out of the bus
//! traffic and folds them into the cached [`VehicleState`].
use crate::error::ExtractionError;
use crate::protocol::messages::{DoorStatus, FrameData, VehicleSpeed};
use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::{DOOR_LOCKS_ID, VEHICLE_SPEED_ID};

//==================================================================================VEHICLE_STATE
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Latest decoded vehicle signals, overwritten in place.
///
/// Fields are refreshed independently as their frames arrive, so speed and
/// door data may come from different instants.
pub struct VehicleState {
    /// Last decoded speed in mph.
    pub speed_mph: u8,
    /// Raw lock-status byte. Non-zero while at least one door is unlocked.
    pub doors_locked_status: u8,
    /// Raw door-open byte. Zero when every door is closed.
    pub doors_closed_status: u8,
}

impl VehicleState {
    pub const fn new() -> Self {
        Self {
            speed_mph: 0,
            doors_locked_status: 0,
            doors_closed_status: 0,
        }
    }

    /// Classify `frame` and update the matching fields.
    ///
    /// Unknown identifiers are ignored. Malformed frames of interest leave
    /// the snapshot untouched and return the extraction error.
    pub fn apply(&mut self, frame: &CanFrame) -> Result<Classified, ExtractionError> {
        let classified = classify(frame)?;
        match classified {
            Classified::VehicleSpeed(speed) => self.speed_mph = speed.mph,
            Classified::DoorStatus(doors) => {
                self.doors_locked_status = doors.locked_status;
                self.doors_closed_status = doors.closed_status;
            }
            Classified::Ignored => {}
        }
        Ok(classified)
    }
}

//==================================================================================CLASSIFIER
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Result of classifying one frame.
pub enum Classified {
    VehicleSpeed(VehicleSpeed),
    DoorStatus(DoorStatus),
    /// Any other identifier. Expected traffic, not a fault.
    Ignored,
}

/// Decode a frame by identifier. The extended flag is not inspected; remote
/// frames carry no payload and fail extraction.
pub fn classify(frame: &CanFrame) -> Result<Classified, ExtractionError> {
    match frame.id {
        DOOR_LOCKS_ID => DoorStatus::from_frame(frame).map(Classified::DoorStatus),
        VEHICLE_SPEED_ID => VehicleSpeed::from_frame(frame).map(Classified::VehicleSpeed),
        _ => Ok(Classified::Ignored),
    }
}

//==================================================================================TESTS
#[cfg(test)]
#[path = "tests.rs"]
mod tests;
