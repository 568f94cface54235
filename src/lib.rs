//! `prius-autolock` library: a `no_std` controller that watches a Prius CAN
//! bus for vehicle speed and door status and locks every door once the car
//! is moving with an unlocked door and all doors closed.
//!
//! The crate exposes the transport primitives (frames, identifiers, bus
//! traits), the message decoders, the ingress classifier and the auto-lock
//! state machine with its control loop.
#![no_std]
//==================================================================================
/// Payload extraction, frame construction and driver errors.
pub mod error;
/// Transport, messages, ingress classification and the auto-lock controller.
pub mod protocol;
//==================================================================================
