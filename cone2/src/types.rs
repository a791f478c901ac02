// cone2-rs/cone2/src/types.rs

use derive_more::Display;

use crate::constants::{COM_NO_CARD, COM_NONE};

/// Status reported by a vendor SDK call.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    #[display(fmt = "ok")]
    Ok,
    #[display(fmt = "timeout")]
    Timeout,
    /// Any other controller error code. These are all treated as failure.
    #[display(fmt = "error code {:#04x}", _0)]
    Code(i32),
}

impl Status {
    pub fn is_ok(&self) -> bool {
        matches!(self, Status::Ok)
    }
}

/// Physical SAM slots inside the C-One 2.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SamSlot {
    #[display(fmt = "1")]
    One,
    #[display(fmt = "2")]
    Two,
}

impl SamSlot {
    pub const ALL: [SamSlot; 2] = [SamSlot::One, SamSlot::Two];

    /// Slot identifier expected by the controller.
    pub fn id(&self) -> u8 {
        match self {
            SamSlot::One => 1,
            SamSlot::Two => 2,
        }
    }

    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(SamSlot::One),
            2 => Some(SamSlot::Two),
            _ => None,
        }
    }
}

/// Technology of a tag found during the hunt phase.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum CommunicationMode {
    IsoB,
    Innovatron,
    IsoA,
    Mifare,
    Ticket,
    Mv4k,
    Mv5k,
    Felica,
    Unknown,
}

impl CommunicationMode {
    /// Map the communication byte returned by a search.
    pub fn from_com(com: u8) -> Self {
        match com {
            0x01 => CommunicationMode::IsoB,
            0x02 => CommunicationMode::Innovatron,
            0x03 => CommunicationMode::IsoA,
            0x04 => CommunicationMode::Mifare,
            0x05 => CommunicationMode::Ticket,
            0x06 => CommunicationMode::Mv4k,
            0x07 => CommunicationMode::Mv5k,
            0x08 => CommunicationMode::Felica,
            _ => CommunicationMode::Unknown,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, CommunicationMode::Unknown)
    }
}

/// Tag discovered by a hunt-phase search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RfidTag {
    com: u8,
    atr: Vec<u8>,
}

impl RfidTag {
    pub fn new(com: u8, atr: Vec<u8>) -> Self {
        Self { com, atr }
    }

    /// Sentinel returned when a search found nothing.
    pub fn none() -> Self {
        Self {
            com: COM_NO_CARD,
            atr: Vec::new(),
        }
    }

    /// Raw communication byte as reported by the controller.
    pub fn com(&self) -> u8 {
        self.com
    }

    pub fn communication_mode(&self) -> CommunicationMode {
        CommunicationMode::from_com(self.com)
    }

    pub fn atr(&self) -> &[u8] {
        &self.atr
    }

    /// True for the sentinel values a search uses to report "no tag".
    pub fn is_empty(&self) -> bool {
        self.com == COM_NO_CARD || self.com == COM_NONE
    }
}
