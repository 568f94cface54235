//! Bridges any `embedded-can` non-blocking driver to the [`CanBus`] trait.
//!
//! HAL crates for STM32 (bxCAN, FDCAN), ESP32 (TWAI) or MCP2515 breakouts
//! expose `embedded_can::nb::Can`. The adapter maps its `nb` results onto the
//! poll semantics used by the controller:
//!
//! * `receive` → `WouldBlock` becomes `Ok(None)`.
//! * `transmit` → `WouldBlock` (all mailboxes busy) is reported as
//!   [`NbCanError::TxBusy`] so the caller counts it as a failed attempt
//!   instead of spinning on the driver.
use embedded_can::Frame;

use crate::error::NbCanError;
use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::can_id::CanId;
use crate::protocol::transport::traits::can_bus::CanBus;

/// Wrapper around an `embedded_can::nb::Can` driver.
pub struct NbCanBus<D> {
    driver: D,
}

impl<D> NbCanBus<D>
where
    D: embedded_can::nb::Can,
{
    pub fn new(driver: D) -> Self {
        Self { driver }
    }

    /// Access the wrapped driver (filters, mode changes, ...).
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    /// Give the driver back.
    pub fn release(self) -> D {
        self.driver
    }
}

impl<D> CanBus for NbCanBus<D>
where
    D: embedded_can::nb::Can,
{
    type Error = NbCanError<D::Error>;

    fn send(&mut self, frame: &CanFrame) -> Result<(), Self::Error> {
        let driver_frame = to_driver_frame::<D::Frame>(frame).ok_or(NbCanError::FrameConversion)?;
        match self.driver.transmit(&driver_frame) {
            Ok(_displaced) => {
                // A lower priority pending frame may have been evicted from its mailbox.
                #[cfg(feature = "defmt")]
                if _displaced.is_some() {
                    defmt::debug!("Transmit displaced a pending lower priority frame");
                }
                Ok(())
            }
            Err(nb::Error::WouldBlock) => Err(NbCanError::TxBusy),
            Err(nb::Error::Other(e)) => Err(NbCanError::Driver(e)),
        }
    }

    fn try_recv(&mut self) -> Result<Option<CanFrame>, Self::Error> {
        match self.driver.receive() {
            Ok(frame) => Ok(Some(from_driver_frame(&frame))),
            Err(nb::Error::WouldBlock) => Ok(None),
            Err(nb::Error::Other(e)) => Err(NbCanError::Driver(e)),
        }
    }
}

/// Copy a driver frame into a [`CanFrame`]. Remote frames keep their DLC
/// with an all-zero payload.
pub fn from_driver_frame<F: Frame>(frame: &F) -> CanFrame {
    let mut data = [0u8; 8];
    let bytes = frame.data();
    let copied = bytes.len().min(CanFrame::MAX_DATA_LEN);
    data[..copied].copy_from_slice(&bytes[..copied]);
    CanFrame {
        id: CanId::from(frame.id()),
        rtr: frame.is_remote_frame(),
        extended: frame.is_extended(),
        data,
        len: frame.dlc().min(CanFrame::MAX_DATA_LEN),
    }
}

/// Build the driver's frame type from a [`CanFrame`]. `None` when the driver
/// rejects the identifier or payload.
pub fn to_driver_frame<F: Frame>(frame: &CanFrame) -> Option<F> {
    let id = frame.id.to_embedded(frame.extended)?;
    if frame.rtr {
        F::new_remote(id, frame.len)
    } else {
        F::new(id, frame.payload())
    }
}
