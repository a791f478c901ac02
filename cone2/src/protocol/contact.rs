// cone2-rs/cone2/src/protocol/contact.rs

use std::str::FromStr;

use derive_more::Display;

use crate::constants::{SAM_PROT_HSP_INNOVATRON, SAM_PROT_ISO_7816_T0, SAM_PROT_ISO_7816_T1};
use crate::Error;

/// Protocols a SAM slot can be selected with.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ContactProtocol {
    #[display(fmt = "ISO_7816_3_T0")]
    Iso7816T0,
    #[display(fmt = "ISO_7816_3_T1")]
    Iso7816T1,
    #[display(fmt = "INNOVATRON_HIGH_SPEED_PROTOCOL")]
    InnovatronHighSpeed,
}

impl ContactProtocol {
    pub const ALL: [ContactProtocol; 3] = [
        ContactProtocol::Iso7816T0,
        ContactProtocol::Iso7816T1,
        ContactProtocol::InnovatronHighSpeed,
    ];

    /// Protocol code passed to the SAM select command.
    pub fn code(&self) -> u8 {
        match self {
            ContactProtocol::Iso7816T0 => SAM_PROT_ISO_7816_T0,
            ContactProtocol::Iso7816T1 => SAM_PROT_ISO_7816_T1,
            ContactProtocol::InnovatronHighSpeed => SAM_PROT_HSP_INNOVATRON,
        }
    }

    /// Exact-name lookup; no partial or case-insensitive matches.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| p.to_string() == name)
    }
}

impl FromStr for ContactProtocol {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| Error::UnsupportedProtocol(s.to_string()))
    }
}
