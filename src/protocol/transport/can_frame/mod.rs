//! In-memory representation of a classic CAN frame.
use crate::error::FrameBuildError;
use crate::protocol::transport::can_id::CanId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Raw frame as read from (or written to) the CAN bus.
pub struct CanFrame {
    /// Identifier value.
    pub id: CanId,
    /// Remote transmission request flag. Remote frames expose no payload.
    pub rtr: bool,
    /// Extended (29-bit) identifier format flag. Recorded, never acted upon.
    pub extended: bool,
    /// Payload buffer. Bytes past `len` are zero.
    pub data: [u8; 8],
    /// Data Length Code, 0 to 8. For remote frames this is the requested
    /// length; no payload is carried.
    pub len: usize,
}

impl CanFrame {
    /// Maximum payload of a classic CAN frame.
    pub const MAX_DATA_LEN: usize = 8;

    /// Builds a standard or extended data frame depending on the identifier width.
    pub fn new(id: CanId, payload: &[u8]) -> Result<Self, FrameBuildError> {
        if !id.is_valid() {
            return Err(FrameBuildError::InvalidIdentifier { id: id.raw() });
        }
        if payload.len() > Self::MAX_DATA_LEN {
            return Err(FrameBuildError::PayloadTooLong { len: payload.len() });
        }
        let mut data = [0u8; 8];
        data[..payload.len()].copy_from_slice(payload);
        Ok(Self {
            id,
            rtr: false,
            extended: !id.is_standard(),
            data,
            len: payload.len(),
        })
    }

    /// Const constructor for standard data frames known at build time.
    ///
    /// `len` is clamped to eight bytes.
    ///
    /// # Panics
    ///
    /// When `id` does not fit 11 bits. In a `const` item this is a
    /// compile-time error.
    pub const fn standard(id: CanId, data: [u8; 8], len: usize) -> Self {
        assert!(id.is_standard(), "standard frame identifier exceeds 11 bits");
        Self {
            id,
            rtr: false,
            extended: false,
            data,
            len: if len > Self::MAX_DATA_LEN {
                Self::MAX_DATA_LEN
            } else {
                len
            },
        }
    }

    /// Valid payload bytes. Always empty for remote frames.
    #[inline]
    pub fn payload(&self) -> &[u8] {
        if self.rtr {
            return &[];
        }
        &self.data[..self.len.min(Self::MAX_DATA_LEN)]
    }
}

//==================================================================================EMBEDDED_CAN
impl embedded_can::Frame for CanFrame {
    fn new(id: impl Into<embedded_can::Id>, data: &[u8]) -> Option<Self> {
        let id = id.into();
        let mut frame = CanFrame::new(CanId::from(id), data).ok()?;
        frame.extended = matches!(id, embedded_can::Id::Extended(_));
        Some(frame)
    }

    fn new_remote(id: impl Into<embedded_can::Id>, dlc: usize) -> Option<Self> {
        if dlc > Self::MAX_DATA_LEN {
            return None;
        }
        let id = id.into();
        Some(Self {
            id: CanId::from(id),
            rtr: true,
            extended: matches!(id, embedded_can::Id::Extended(_)),
            data: [0; 8],
            len: dlc,
        })
    }

    fn is_extended(&self) -> bool {
        self.extended
    }

    fn is_remote_frame(&self) -> bool {
        self.rtr
    }

    /// Identifier in the flagged format, or the extended form when the
    /// value is too wide for a standard identifier.
    ///
    /// Constructors reject identifiers wider than 29 bits; one written
    /// directly into the public field trips a debug assertion and is
    /// truncated to its low 29 bits in release builds.
    fn id(&self) -> embedded_can::Id {
        debug_assert!(self.id.is_valid(), "CAN identifier exceeds 29 bits");
        let id = CanId(self.id.raw() & CanId::MAX_EXTENDED);
        match id.to_embedded(self.extended) {
            Some(id) => id,
            // Masked value always fits 29 bits.
            None => embedded_can::Id::Extended(
                embedded_can::ExtendedId::new(id.raw()).unwrap_or(embedded_can::ExtendedId::ZERO),
            ),
        }
    }

    fn dlc(&self) -> usize {
        self.len
    }

    fn data(&self) -> &[u8] {
        self.payload()
    }
}
