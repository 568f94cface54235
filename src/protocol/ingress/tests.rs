//! Unit tests for the ingress classifier.
use super::*;
use crate::protocol::transport::can_id::CanId;

fn frame(id: CanId, payload: &[u8]) -> CanFrame {
    CanFrame::new(id, payload).unwrap()
}

#[test]
fn test_initial_state_is_zeroed() {
    assert_eq!(VehicleState::new(), VehicleState::default());
    assert_eq!(VehicleState::new().speed_mph, 0);
}

#[test]
fn test_speed_frame_updates_speed_only() {
    let mut state = VehicleState {
        speed_mph: 0,
        doors_locked_status: 0xC5,
        doors_closed_status: 0x08,
    };
    let result = state.apply(&frame(VEHICLE_SPEED_ID, &[0, 0, 10]));
    assert!(matches!(result, Ok(Classified::VehicleSpeed(VehicleSpeed { mph: 7, .. }))));
    assert_eq!(state.speed_mph, 7);
    assert_eq!(state.doors_locked_status, 0xC5);
    assert_eq!(state.doors_closed_status, 0x08);
}

#[test]
fn test_door_frame_updates_door_fields_only() {
    let mut state = VehicleState {
        speed_mph: 20,
        ..VehicleState::new()
    };
    state
        .apply(&frame(DOOR_LOCKS_ID, &[0x64, 0xC5, 0x02]))
        .expect("valid door frame");
    assert_eq!(state.speed_mph, 20);
    assert_eq!(state.doors_locked_status, 0xC5);
    assert_eq!(state.doors_closed_status, 0x02);
}

#[test]
/// Unknown identifiers are filtered without error or state change.
fn test_unknown_identifier_ignored() {
    let mut state = VehicleState {
        speed_mph: 12,
        doors_locked_status: 1,
        doors_closed_status: 0,
    };
    let before = state;
    for id in [0x020, 0x3C8, 0x3CB, 0x5B2, 0x7FF] {
        let result = state.apply(&frame(CanId(id), &[0xFF; 8]));
        assert_eq!(result, Ok(Classified::Ignored));
    }
    assert_eq!(state, before);
}

#[test]
/// A short door frame is rejected and the snapshot keeps its previous values.
fn test_short_door_frame_skips_update() {
    let mut state = VehicleState {
        speed_mph: 5,
        doors_locked_status: 0xC5,
        doors_closed_status: 0,
    };
    let before = state;
    let result = state.apply(&frame(DOOR_LOCKS_ID, &[0x64, 0x00]));
    assert_eq!(
        result,
        Err(ExtractionError::InvalidDataLen {
            expected: 3,
            actual: 2
        })
    );
    assert_eq!(state, before);
}

#[test]
fn test_short_speed_frame_skips_update() {
    let mut state = VehicleState {
        speed_mph: 30,
        ..VehicleState::new()
    };
    assert!(state.apply(&frame(VEHICLE_SPEED_ID, &[0])).is_err());
    assert_eq!(state.speed_mph, 30);
}

#[test]
/// The extended flag does not affect classification.
fn test_extended_flag_not_inspected() {
    let mut f = frame(VEHICLE_SPEED_ID, &[0, 0, 100]);
    f.extended = true;
    assert!(matches!(classify(&f), Ok(Classified::VehicleSpeed(_))));
}

#[test]
/// A remote request for a frame of interest carries no data to decode.
fn test_remote_frame_skips_update() {
    let mut state = VehicleState {
        speed_mph: 40,
        doors_locked_status: 0xC5,
        ..VehicleState::new()
    };
    let mut speed = CanFrame::standard(VEHICLE_SPEED_ID, [0; 8], 8);
    speed.rtr = true;
    assert_eq!(
        state.apply(&speed),
        Err(ExtractionError::InvalidDataLen {
            expected: 3,
            actual: 0
        })
    );

    let mut doors = CanFrame::standard(DOOR_LOCKS_ID, [0; 8], 3);
    doors.rtr = true;
    assert!(state.apply(&doors).is_err());

    assert_eq!(state.speed_mph, 40);
    assert_eq!(state.doors_locked_status, 0xC5);
}

#[test]
/// Each field reflects its last-seen value, whatever traffic is interleaved.
fn test_last_value_wins_with_interleaving() {
    let mut state = VehicleState::new();
    let traffic = [
        frame(VEHICLE_SPEED_ID, &[0, 0, 40]),
        frame(CanId(0x3C8), &[1, 2, 3]),
        frame(DOOR_LOCKS_ID, &[0x64, 0xC5, 0x01]),
        frame(CanId(0x120), &[9; 8]),
        frame(VEHICLE_SPEED_ID, &[0, 0, 80]),
        frame(CanId(0x5B2), &[0; 3]),
        frame(DOOR_LOCKS_ID, &[0x64, 0x00, 0x00]),
        frame(CanId(0x3CB), &[]),
    ];
    for f in traffic.iter() {
        let _ = state.apply(f);
    }
    assert_eq!(
        state,
        VehicleState {
            speed_mph: 50,
            doors_locked_status: 0x00,
            doors_closed_status: 0x00,
        }
    );
}
