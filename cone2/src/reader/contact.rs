// cone2-rs/cone2/src/reader/contact.rs

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, info, trace, warn};

use crate::constants::{
    CONTACT_READER_NAME, MIN_APDU_RESPONSE_LEN, SAM_APDU_BUFFER_LEN, SAM_ATR_BUFFER_LEN,
};
use crate::protocol::ContactProtocol;
use crate::reader::{truncated, ReaderSpi};
use crate::session::HardwareSession;
use crate::types::SamSlot;
use crate::utils::{bytes_to_hex, bytes_to_hex_spaced};
use crate::{Error, Result};

#[derive(Debug, Default)]
struct ContactState {
    protocol: Option<ContactProtocol>,
    // Channel is open iff present.
    atr: Option<Vec<u8>>,
}

/// Reader for one SAM slot.
///
/// A protocol must be activated before the channel can be opened; opening
/// selects the slot with that protocol and resets the SAM to read its ATR.
#[derive(Debug)]
pub struct ContactReader {
    name: String,
    slot: SamSlot,
    session: Arc<HardwareSession>,
    state: Mutex<ContactState>,
}

impl ContactReader {
    pub fn new(slot: SamSlot, session: Arc<HardwareSession>) -> Self {
        Self {
            name: format!("{}_{}", CONTACT_READER_NAME, slot),
            slot,
            session,
            state: Mutex::new(ContactState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, ContactState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn slot(&self) -> SamSlot {
        self.slot
    }

    pub fn current_protocol(&self) -> Option<ContactProtocol> {
        self.state().protocol
    }

    pub fn atr(&self) -> Option<Vec<u8>> {
        self.state().atr.clone()
    }

    fn active_protocol(&self) -> Result<ContactProtocol> {
        self.current_protocol().ok_or_else(|| {
            Error::ProtocolState(format!("{}: no protocol activated", self.name))
        })
    }
}

impl ReaderSpi for ContactReader {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_contactless(&self) -> bool {
        false
    }

    fn is_physical_channel_open(&self) -> bool {
        self.state().atr.is_some()
    }

    fn open_physical_channel(&self) -> Result<()> {
        let protocol = self.active_protocol()?;
        let slot = self.slot.id();
        debug!("{}: opening physical channel with {}", self.name, protocol);

        let atr = self.session.with_lock(|sdk| {
            let status = sdk.select_sam(slot, protocol.code());
            if !status.is_ok() {
                return Err(Error::status("SAM select", status));
            }

            let mut buf = [0u8; SAM_ATR_BUFFER_LEN];
            let mut len = 0usize;
            let status = sdk.reset_sam(slot, &mut buf, &mut len);
            if status.is_ok() {
                Ok(Some(truncated(&buf, len)))
            } else {
                warn!("{}: SAM reset failed: {}", self.name, status);
                Ok(None)
            }
        })?;

        if let Some(atr) = &atr {
            info!("{}: SAM ATR {}", self.name, bytes_to_hex(atr));
        }
        self.state().atr = atr;
        Ok(())
    }

    fn close_physical_channel(&self) {
        debug!("{}: closing physical channel", self.name);
        self.state().atr = None;
    }

    /// Re-selects the slot with the active protocol. Without one there is
    /// nothing to probe and the SAM counts as absent.
    fn check_card_presence(&self) -> Result<bool> {
        let Some(protocol) = self.current_protocol() else {
            return Ok(false);
        };
        let slot = self.slot.id();
        self.session
            .with_lock(|sdk| Ok(sdk.select_sam(slot, protocol.code()).is_ok()))
    }

    fn power_on_data(&self) -> Option<String> {
        self.state().atr.as_deref().map(bytes_to_hex)
    }

    fn activate_protocol(&self, name: &str) -> Result<()> {
        let protocol: ContactProtocol = name.parse()?;
        self.state().protocol = Some(protocol);
        debug!("{}: activated protocol {}", self.name, protocol);
        Ok(())
    }

    /// Only the active protocol can be deactivated. An open channel stays
    /// open.
    fn deactivate_protocol(&self, name: &str) -> Result<()> {
        let mut state = self.state();
        match state.protocol {
            None => Err(Error::ProtocolState(format!(
                "{}: cannot deactivate {}, no protocol is active",
                self.name, name
            ))),
            Some(active) if active.to_string() != name => Err(Error::ProtocolState(format!(
                "{}: cannot deactivate {}, active protocol is {}",
                self.name, name, active
            ))),
            Some(_) => {
                state.protocol = None;
                debug!("{}: deactivated protocol {}", self.name, name);
                Ok(())
            }
        }
    }

    fn is_protocol_supported(&self, name: &str) -> bool {
        ContactProtocol::from_name(name).is_some()
    }

    fn is_current_protocol(&self, name: &str) -> bool {
        self.current_protocol()
            .is_some_and(|p| p.to_string() == name)
    }

    fn transmit_apdu(&self, apdu: &[u8]) -> Result<Vec<u8>> {
        trace!("{} >> {}", self.name, bytes_to_hex_spaced(apdu));

        let response = self.session.with_lock(|sdk| {
            let mut out = [0u8; SAM_APDU_BUFFER_LEN];
            let mut len = 0usize;
            let status = sdk.iso_command_sam(apdu, &mut out, &mut len);
            if !status.is_ok() {
                return Err(Error::status("SAM ISO command", status));
            }
            let response = truncated(&out, len);
            if response.len() < MIN_APDU_RESPONSE_LEN {
                return Err(Error::ReaderIo(format!(
                    "incorrect APDU answer: {} byte(s)",
                    response.len()
                )));
            }
            Ok(response)
        })?;

        trace!("{} << {}", self.name, bytes_to_hex_spaced(&response));
        Ok(response)
    }
}
