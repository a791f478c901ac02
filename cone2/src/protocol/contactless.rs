// cone2-rs/cone2/src/protocol/contactless.rs

use std::ops::{BitOr, BitOrAssign};
use std::str::FromStr;

use derive_more::Display;

use crate::constants::{
    HUNT_PHASE_TIMEOUT, PROTOCOL_ACTIVATED, PROTOCOL_DEACTIVATED, SEARCH_MASK_INNO,
    SEARCH_MASK_ISOA, SEARCH_MASK_ISOB, SEARCH_MASK_MIFARE, SEARCH_MASK_MV5K, SEARCH_MASK_TICK,
    SEARCH_RFU,
};
use crate::Error;

const PROTOCOL_COUNT: usize = 8;

/// Protocols the contactless reader can be asked to search for.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ContactlessProtocol {
    #[display(fmt = "ISO_14443")]
    Iso14443,
    #[display(fmt = "ISO_14443_A")]
    Iso14443A,
    #[display(fmt = "ISO_14443_B")]
    Iso14443B,
    #[display(fmt = "INNOVATRON_B_PRIME")]
    InnovatronBPrime,
    #[display(fmt = "TICKET_CTS_CTM")]
    TicketCtsCtm,
    #[display(fmt = "MIFARE")]
    Mifare,
    #[display(fmt = "FELICA")]
    Felica,
    #[display(fmt = "MV5000")]
    Mv5000,
}

impl ContactlessProtocol {
    pub const ALL: [ContactlessProtocol; PROTOCOL_COUNT] = [
        ContactlessProtocol::Iso14443,
        ContactlessProtocol::Iso14443A,
        ContactlessProtocol::Iso14443B,
        ContactlessProtocol::InnovatronBPrime,
        ContactlessProtocol::TicketCtsCtm,
        ContactlessProtocol::Mifare,
        ContactlessProtocol::Felica,
        ContactlessProtocol::Mv5000,
    ];

    /// Exact-name lookup; no partial or case-insensitive matches.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| p.to_string() == name)
    }

    /// Bits this protocol adds to the search mask when activated.
    ///
    /// FELICA is enumerated but the controller search is never asked for
    /// it, so it contributes nothing.
    pub fn search_mask(&self) -> SearchMask {
        match self {
            ContactlessProtocol::Iso14443 => SearchMask::ISOA | SearchMask::ISOB,
            ContactlessProtocol::Iso14443A => SearchMask::ISOA,
            ContactlessProtocol::Iso14443B => SearchMask::ISOB,
            ContactlessProtocol::InnovatronBPrime => SearchMask::INNO,
            ContactlessProtocol::TicketCtsCtm => SearchMask::TICK,
            ContactlessProtocol::Mifare => SearchMask::MIFARE,
            ContactlessProtocol::Felica => SearchMask::EMPTY,
            ContactlessProtocol::Mv5000 => SearchMask::MV5K,
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

impl FromStr for ContactlessProtocol {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| Error::UnsupportedProtocol(s.to_string()))
    }
}

/// Bitmask of technologies the controller should look for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct SearchMask(u32);

impl SearchMask {
    pub const EMPTY: Self = Self(0);
    pub const ISOB: Self = Self(SEARCH_MASK_ISOB);
    pub const ISOA: Self = Self(SEARCH_MASK_ISOA);
    pub const TICK: Self = Self(SEARCH_MASK_TICK);
    pub const INNO: Self = Self(SEARCH_MASK_INNO);
    pub const MIFARE: Self = Self(SEARCH_MASK_MIFARE);
    pub const MV5K: Self = Self(SEARCH_MASK_MV5K);

    pub const fn bits(&self) -> u32 {
        self.0
    }

    pub const fn contains(&self, other: SearchMask) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl BitOr for SearchMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for SearchMask {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Per-technology enable bytes of the controller's extended search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchTechnologies {
    pub cont: u8,
    pub isob: u8,
    pub isoa: u8,
    pub tick: u8,
    pub inno: u8,
    pub mifare: u8,
    pub mv4k: u8,
    pub mv5k: u8,
    pub mono: u8,
}

/// One hunt-phase search call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchRequest {
    pub technologies: SearchTechnologies,
    pub mask: SearchMask,
    pub rfu: u8,
    pub timeout: u8,
}

/// Hunt-phase configuration sent before every search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuntPhaseParameters {
    pub max_nb_card: u8,
    pub req: u8,
    pub nb_slot: u8,
    pub afi: u8,
    pub auto_select_div: u8,
    pub deselect: u8,
    pub select_appli: u8,
    pub select_data_len: u8,
    pub select_data: Vec<u8>,
    pub felica_afi: u16,
    pub felica_nb_slot: u8,
}

impl HuntPhaseParameters {
    /// The fixed sequence putting the controller in "no application
    /// selection" mode.
    pub fn no_application_selection() -> Self {
        Self {
            max_nb_card: 0x01,
            req: 0x01,
            nb_slot: 0x00,
            afi: 0x00,
            auto_select_div: 0x00,
            deselect: 0x00,
            select_appli: 0x01,
            select_data_len: 0x00,
            select_data: Vec::new(),
            felica_afi: 0x0000,
            felica_nb_slot: 0x00,
        }
    }
}

/// Activation flags of the contactless protocols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProtocolTable {
    active: [bool; PROTOCOL_COUNT],
}

impl ProtocolTable {
    /// All protocols deactivated.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn activate(&mut self, protocol: ContactlessProtocol) {
        self.active[protocol.index()] = true;
    }

    pub fn deactivate(&mut self, protocol: ContactlessProtocol) {
        self.active[protocol.index()] = false;
    }

    pub fn is_active(&self, protocol: ContactlessProtocol) -> bool {
        self.active[protocol.index()]
    }

    pub fn active_protocols(&self) -> impl Iterator<Item = ContactlessProtocol> + '_ {
        ContactlessProtocol::ALL
            .into_iter()
            .filter(move |p| self.is_active(*p))
    }

    fn flag(&self, protocol: ContactlessProtocol) -> u8 {
        if self.is_active(protocol) {
            PROTOCOL_ACTIVATED
        } else {
            PROTOCOL_DEACTIVATED
        }
    }

    /// Technology enable bytes. The generic ISO 14443 flag feeds both the
    /// A and B entries.
    pub fn search_technologies(&self) -> SearchTechnologies {
        use ContactlessProtocol::*;
        SearchTechnologies {
            cont: 0,
            isob: self.flag(Iso14443) | self.flag(Iso14443B),
            isoa: self.flag(Iso14443) | self.flag(Iso14443A),
            tick: self.flag(TicketCtsCtm),
            inno: self.flag(InnovatronBPrime),
            mifare: self.flag(Mifare),
            mv4k: 0,
            mv5k: self.flag(Mv5000),
            mono: 0,
        }
    }

    pub fn search_mask(&self) -> SearchMask {
        self.active_protocols()
            .fold(SearchMask::EMPTY, |mask, p| mask | p.search_mask())
    }

    /// Full search call for the current activation state.
    pub fn search_request(&self) -> SearchRequest {
        SearchRequest {
            technologies: self.search_technologies(),
            mask: self.search_mask(),
            rfu: SEARCH_RFU,
            timeout: HUNT_PHASE_TIMEOUT,
        }
    }
}
