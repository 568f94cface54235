//! Raw CAN identifiers and their conversion to and from `embedded-can` types.
use embedded_can::{ExtendedId, Id, StandardId};

//==================================================================================CAN_ID
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Identifier as reported by the controller, stored inside a `u32`.
///
/// Whether the frame used the standard or extended format is carried by the
/// frame itself; matching is done on the numeric value only.
pub struct CanId(pub u32);

impl CanId {
    /// Largest 11-bit identifier.
    pub const MAX_STANDARD: u32 = 0x7FF;
    /// Largest 29-bit identifier.
    pub const MAX_EXTENDED: u32 = 0x1FFF_FFFF;

    /// Raw numeric value.
    pub const fn raw(&self) -> u32 {
        self.0
    }

    /// True when the value fits an 11-bit standard identifier.
    pub const fn is_standard(&self) -> bool {
        self.0 <= Self::MAX_STANDARD
    }

    /// True when the value fits a 29-bit extended identifier.
    pub const fn is_valid(&self) -> bool {
        self.0 <= Self::MAX_EXTENDED
    }

    /// Converts into an `embedded-can` identifier.
    ///
    /// `extended` selects the format; returns `None` when the value does not
    /// fit the requested width.
    pub fn to_embedded(self, extended: bool) -> Option<Id> {
        if extended {
            ExtendedId::new(self.0).map(Id::Extended)
        } else {
            u16::try_from(self.0)
                .ok()
                .and_then(StandardId::new)
                .map(Id::Standard)
        }
    }
}

impl From<Id> for CanId {
    fn from(id: Id) -> Self {
        match id {
            Id::Standard(sid) => CanId(sid.as_raw() as u32),
            Id::Extended(eid) => CanId(eid.as_raw()),
        }
    }
}

//==================================================================================TESTS
#[cfg(test)]
#[path = "tests.rs"]
mod tests;
