//! Minimal abstraction for a non-blocking CAN bus. Allows the controller to
//! plug into various implementations (embedded HAL driver, SocketCAN, test
//! doubles, etc.).
use crate::protocol::transport::can_frame::CanFrame;

/// Contract to send and receive CAN frames without blocking.
pub trait CanBus {
    type Error: core::fmt::Debug;
    /// Emit a frame on the bus. Returns as soon as the driver accepted or
    /// refused the frame; `Ok` means the transmission was accepted.
    fn send(&mut self, frame: &CanFrame) -> Result<(), Self::Error>;
    /// Retrieve the next available frame, if any. `Ok(None)` means the
    /// receive queue is empty and is not an error.
    fn try_recv(&mut self) -> Result<Option<CanFrame>, Self::Error>;
}

impl<C: CanBus + ?Sized> CanBus for &mut C {
    type Error = C::Error;

    fn send(&mut self, frame: &CanFrame) -> Result<(), Self::Error> {
        (**self).send(frame)
    }

    fn try_recv(&mut self) -> Result<Option<CanFrame>, Self::Error> {
        (**self).try_recv()
    }
}
