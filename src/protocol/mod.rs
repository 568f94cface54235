//! Controller components: CAN transport, message decoding, the ingress
//! classifier and the auto-lock state machine.
pub mod autolock;
pub mod ingress;
pub mod messages;
pub mod transport;
