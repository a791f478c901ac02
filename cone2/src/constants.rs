// cone2-rs/cone2/src/constants.rs
//! Vendor SDK constants and the fixed logical names used across the crate

/// SAM protocol code: ISO 7816-3 T=0
pub const SAM_PROT_ISO_7816_T0: u8 = 0x01;
/// SAM protocol code: ISO 7816-3 T=1
pub const SAM_PROT_ISO_7816_T1: u8 = 0x02;
/// SAM protocol code: Innovatron high speed protocol
pub const SAM_PROT_HSP_INNOVATRON: u8 = 0x00;

/// Hunt-phase search mask bits
pub const SEARCH_MASK_ISOB: u32 = 0x01;
pub const SEARCH_MASK_ISOA: u32 = 0x02;
pub const SEARCH_MASK_TICK: u32 = 0x04;
pub const SEARCH_MASK_INNO: u32 = 0x08;
pub const SEARCH_MASK_MIFARE: u32 = 0x10;
pub const SEARCH_MASK_MV4K: u32 = 0x20;
pub const SEARCH_MASK_MV5K: u32 = 0x40;
pub const SEARCH_MASK_MONO: u32 = 0x80;

/// Communication-mode byte reported by a search when no card answered
pub const COM_NO_CARD: u8 = 0x6F;
/// Communication-mode byte reported by a search that did not run at all
pub const COM_NONE: u8 = 0x00;

/// Per-call search timeout handed to the controller
pub const HUNT_PHASE_TIMEOUT: u8 = 0xFF;
/// Reserved search argument, always zero
pub const SEARCH_RFU: u8 = 0x00;

/// Value of an enabled entry in the search-technology struct
pub const PROTOCOL_ACTIVATED: u8 = 1;
/// Value of a disabled entry in the search-technology struct
pub const PROTOCOL_DEACTIVATED: u8 = 0;

/// Response buffer for SAM APDU exchanges
pub const SAM_APDU_BUFFER_LEN: usize = 260;
/// Response buffer for contactless APDU exchanges
pub const RF_APDU_BUFFER_LEN: usize = 256;
/// ATR buffer for SAM reset
pub const SAM_ATR_BUFFER_LEN: usize = 256;
/// ATR buffer for hunt-phase search
pub const RF_ATR_BUFFER_LEN: usize = 64;

/// Shortest valid APDU answer: SW1 SW2
pub const MIN_APDU_RESPONSE_LEN: usize = 2;

/// Base name of the contact (SAM) readers, suffixed with the slot id
pub const CONTACT_READER_NAME: &str = "Cone2ContactReader";
/// Name of the contactless reader
pub const CONTACTLESS_READER_NAME: &str = "Cone2ContactlessReader";
/// Name under which the readers are registered
pub const PLUGIN_NAME: &str = "Cone2Plugin";
