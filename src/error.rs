//! Error definitions shared across library modules.
//! Each type models a specific failure scenario (payload extraction, frame
//! construction, driver transmission, etc.).
use thiserror_no_std::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Failures while extracting vehicle data from a raw CAN frame.
pub enum ExtractionError {
    /// The frame carries fewer bytes than its identifier requires.
    #[error("Invalid data length -> expected at least: {expected}, actual: {actual}")]
    InvalidDataLen { expected: usize, actual: usize },
    /// The decoder was handed a frame addressed to another identifier.
    #[error("Unexpected identifier {id:#X}")]
    UnexpectedIdentifier { id: u32 },
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Errors raised while building a [`CanFrame`](crate::protocol::transport::can_frame::CanFrame).
pub enum FrameBuildError {
    /// Identifier does not fit in 29 bits.
    #[error("Invalid identifier {id:#X}")]
    InvalidIdentifier { id: u32 },
    /// Classic CAN payloads are limited to eight bytes.
    #[error("Payload too long: {len} bytes")]
    PayloadTooLong { len: usize },
}

//==================================================================================NB_ADAPTER
#[derive(Debug, Error)]
/// Errors surfaced by the [`NbCanBus`](crate::protocol::transport::nb_adapter::NbCanBus) adapter.
pub enum NbCanError<E: core::fmt::Debug> {
    /// The driver reported a hardware or bus error.
    #[error("CAN driver error: {0:?}")]
    Driver(E),
    /// Every transmit mailbox is occupied; the frame was not queued.
    #[error("Transmit mailboxes full")]
    TxBusy,
    /// The driver frame type rejected the identifier or payload.
    #[error("Driver refused frame conversion")]
    FrameConversion,
}

//==================================================================================SEND_ERROR
#[derive(Debug, Error)]
/// Errors encountered when emitting a door command.
pub enum SendLockError<E: core::fmt::Debug> {
    /// CAN layer refused or failed to send the frame.
    #[error("CAN bus send error: {0:?}")]
    Send(E),
}
