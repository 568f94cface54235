//! Unit tests for `CanId` range checks and `embedded-can` conversions.
use super::*;
use crate::protocol::transport::{DOOR_LOCKS_ID, VEHICLE_SPEED_ID};

#[test]
/// Both identifiers of interest are 11-bit standard identifiers.
fn test_bus_identifiers_are_standard() {
    assert!(VEHICLE_SPEED_ID.is_standard());
    assert!(DOOR_LOCKS_ID.is_standard());
    assert_eq!(VEHICLE_SPEED_ID.raw(), 0x3CA);
    assert_eq!(DOOR_LOCKS_ID.raw(), 0x5B6);
}

#[test]
fn test_range_limits() {
    assert!(CanId(0x7FF).is_standard());
    assert!(!CanId(0x800).is_standard());
    assert!(CanId(0x1FFF_FFFF).is_valid());
    assert!(!CanId(0x2000_0000).is_valid());
}

#[test]
/// Standard conversion refuses values wider than 11 bits.
fn test_to_embedded_standard() {
    let id = DOOR_LOCKS_ID.to_embedded(false).expect("0x5B6 fits 11 bits");
    assert_eq!(id, Id::Standard(StandardId::new(0x5B6).unwrap()));

    assert!(CanId(0x800).to_embedded(false).is_none());
    assert!(CanId(0x1_0000).to_embedded(false).is_none());
}

#[test]
fn test_to_embedded_extended() {
    let id = CanId(0x18EA_FF00).to_embedded(true).expect("fits 29 bits");
    assert_eq!(id, Id::Extended(ExtendedId::new(0x18EA_FF00).unwrap()));
    assert!(CanId(0x2000_0000).to_embedded(true).is_none());
}

#[test]
/// Identifiers coming back from a driver keep their numeric value.
fn test_from_embedded() {
    let sid = Id::Standard(StandardId::new(0x3CA).unwrap());
    assert_eq!(CanId::from(sid), VEHICLE_SPEED_ID);

    let eid = Id::Extended(ExtendedId::new(0x3CA).unwrap());
    assert_eq!(CanId::from(eid), VEHICLE_SPEED_ID);
}
