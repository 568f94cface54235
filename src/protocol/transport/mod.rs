//! CAN transport layer: frame representation, identifiers of interest, and
//! bus abstraction traits.
//!
//! ## Bus identifiers
//!
//! The controller only listens to two 11-bit identifiers broadcast by the
//! Prius body and powertrain ECUs. Everything else on the bus is filtered out
//! by the ingress classifier.

pub mod can_frame;
pub mod can_id;
pub mod nb_adapter;
pub mod traits;

use crate::protocol::transport::can_id::CanId;
use embassy_time::Duration;

/// Vehicle speed broadcast. Byte 2 carries the speed in km/h.
pub const VEHICLE_SPEED_ID: CanId = CanId(0x3CA);

/// Door status broadcast, also the destination for door commands.
///
/// Byte 1 reports the lock state (`0x00` once every door is locked),
/// byte 2 reports which doors are open (`0x00` when all are closed).
pub const DOOR_LOCKS_ID: CanId = CanId(0x5B6);

/// Back-off applied by the control loop when a poll returns no frame.
///
/// It only throttles empty polls. A state machine step is never triggered by
/// the delay itself, so retries stay paced by bus traffic.
pub const DEFAULT_IDLE_POLL_DELAY: Duration = Duration::from_millis(1);
