// fixtures.rs — provides commonly used test payloads and ATRs

/// ATR of a Calypso SAM C1.
pub const SAM_ATR_HEX: &str = "3B3F9600805A4880C1205017AEF8B0C7829000";

/// Hunt-phase ATR of an Innovatron B' card.
pub const B_PRIME_ATR_HEX: &str = "0A0B0C0D0E0F";

/// Hunt-phase ATR of an ISO 14443-B card (PUPI, application data, protocol info).
pub const ISO_B_ATR_HEX: &str = "5012345678000000007181";

pub fn sam_atr() -> Vec<u8> {
    hex::decode(SAM_ATR_HEX).unwrap()
}

pub fn b_prime_atr() -> Vec<u8> {
    hex::decode(B_PRIME_ATR_HEX).unwrap()
}

pub fn iso_b_atr() -> Vec<u8> {
    hex::decode(ISO_B_ATR_HEX).unwrap()
}

/// SELECT APPLICATION for a Calypso AID.
pub fn select_application_apdu() -> Vec<u8> {
    hex::decode("00A404000AA000000404012509010100").unwrap()
}

/// GET CHALLENGE sent to a SAM.
pub fn get_challenge_apdu() -> Vec<u8> {
    hex::decode("0084000008").unwrap()
}

pub fn sw_ok() -> Vec<u8> {
    vec![0x90, 0x00]
}

/// Eight challenge bytes followed by 9000.
pub fn challenge_response() -> Vec<u8> {
    hex::decode("0102030405060708").unwrap().into_iter().chain(sw_ok()).collect()
}
