// cone2-rs/cone2/src/reader/contactless.rs

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, trace, warn};

use crate::constants::{
    COM_NO_CARD, COM_NONE, CONTACTLESS_READER_NAME, MIN_APDU_RESPONSE_LEN, RF_APDU_BUFFER_LEN,
    RF_ATR_BUFFER_LEN,
};
use crate::protocol::{ContactlessProtocol, HuntPhaseParameters, ProtocolTable};
use crate::reader::{truncated, CardInsertionWait, ContactlessConfig, ReaderSpi};
use crate::session::HardwareSession;
use crate::types::{RfidTag, Status};
use crate::utils::{bytes_to_hex, bytes_to_hex_spaced};
use crate::{Error, Result};

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Reader for the RF field.
///
/// Card detection is a loop of hunt-phase searches over the activated
/// protocols. The channel itself is purely logical: a card becomes usable
/// as soon as a search discovers it.
#[derive(Debug)]
pub struct ContactlessReader {
    session: Arc<HardwareSession>,
    protocols: Mutex<ProtocolTable>,
    // Only ever a tag with a known communication mode.
    tag: Mutex<Option<RfidTag>>,
    config: Mutex<ContactlessConfig>,
    physical_channel_open: AtomicBool,
    card_discovered: AtomicBool,
    waiting_for_card: AtomicBool,
}

impl ContactlessReader {
    /// New reader with every protocol deactivated.
    pub fn new(session: Arc<HardwareSession>) -> Self {
        Self {
            session,
            protocols: Mutex::new(ProtocolTable::new()),
            tag: Mutex::new(None),
            config: Mutex::new(ContactlessConfig::default()),
            physical_channel_open: AtomicBool::new(false),
            card_discovered: AtomicBool::new(false),
            waiting_for_card: AtomicBool::new(false),
        }
    }

    /// Snapshot of the protocol activation table.
    pub fn protocols(&self) -> ProtocolTable {
        *lock(&self.protocols)
    }

    /// Tag found by the last successful search.
    pub fn rfid_tag(&self) -> Option<RfidTag> {
        lock(&self.tag).clone()
    }

    pub fn config(&self) -> ContactlessConfig {
        *lock(&self.config)
    }

    pub fn set_config(&self, config: ContactlessConfig) {
        *lock(&self.config) = config;
    }

    pub fn set_check_for_absence_timeout_ms(&self, timeout_ms: u64) {
        lock(&self.config).check_for_absence_timeout_ms = timeout_ms;
    }

    pub fn set_thread_wait_timeout_ms(&self, timeout_ms: u64) {
        lock(&self.config).thread_wait_timeout_ms = timeout_ms;
    }

    pub fn is_waiting_for_card(&self) -> bool {
        self.waiting_for_card.load(Ordering::SeqCst)
    }

    /// Alias of [`CardInsertionWait::stop_wait_for_card_insertion`].
    pub fn stop_card_detection(&self) {
        self.stop_wait_for_card_insertion();
    }

    fn forget_card(&self) {
        self.card_discovered.store(false, Ordering::SeqCst);
        *lock(&self.tag) = None;
    }

    /// Run a single hunt-phase search for the activated protocols.
    ///
    /// "No tag" is a normal outcome, reported as [`RfidTag::none`]. A tag
    /// with an unknown communication mode is returned as found but does
    /// not count as a discovered card. Neither case stores a tag; storing
    /// is left to the insertion wait.
    pub fn enter_hunt_phase(&self) -> Result<RfidTag> {
        let request = self.protocols().search_request();
        trace!("hunt phase, search mask {:#04x}", request.mask.bits());

        let tag = self.session.with_lock(|sdk| {
            let params = HuntPhaseParameters::no_application_selection();
            let status = sdk.enter_hunt_phase_parameters(&params);
            if !status.is_ok() {
                return Err(Error::status("hunt phase parameters", status));
            }

            let mut com = COM_NONE;
            let mut atr = [0u8; RF_ATR_BUFFER_LEN];
            let mut len = 0usize;
            let status = sdk.search_card(&request, &mut com, &mut atr, &mut len);
            if status == Status::Timeout || com == COM_NO_CARD || com == COM_NONE {
                return Ok(RfidTag::none());
            }
            if !status.is_ok() {
                return Err(Error::status("card search", status));
            }
            Ok(RfidTag::new(com, truncated(&atr, len)))
        })?;

        if tag.is_empty() {
            warn!("hunt phase ended without a tag");
            self.forget_card();
        } else if !tag.communication_mode().is_known() {
            debug!("ignoring tag with unknown communication byte {:#04x}", tag.com());
            self.forget_card();
        } else {
            debug!(
                "tag found: {} ATR {}",
                tag.communication_mode(),
                bytes_to_hex(tag.atr())
            );
        }
        Ok(tag)
    }
}

impl CardInsertionWait for ContactlessReader {
    fn wait_for_card_insertion(&self) -> Result<bool> {
        debug!("waiting for card insertion");
        self.waiting_for_card.store(true, Ordering::SeqCst);

        while self.waiting_for_card.load(Ordering::SeqCst) {
            let tag = match self.enter_hunt_phase() {
                Ok(tag) => tag,
                Err(e) => {
                    self.waiting_for_card.store(false, Ordering::SeqCst);
                    return Err(e);
                }
            };
            if tag.communication_mode().is_known() {
                *lock(&self.tag) = Some(tag);
                self.card_discovered.store(true, Ordering::SeqCst);
                self.waiting_for_card.store(false, Ordering::SeqCst);
                return Ok(true);
            }
        }

        debug!("card insertion wait stopped");
        Ok(false)
    }

    fn stop_wait_for_card_insertion(&self) {
        debug!("stopping card insertion wait");
        self.waiting_for_card.store(false, Ordering::SeqCst);
    }
}

impl ReaderSpi for ContactlessReader {
    fn name(&self) -> &str {
        CONTACTLESS_READER_NAME
    }

    fn is_contactless(&self) -> bool {
        true
    }

    fn is_physical_channel_open(&self) -> bool {
        self.physical_channel_open.load(Ordering::SeqCst)
    }

    fn open_physical_channel(&self) -> Result<()> {
        debug!("{}: opening physical channel", CONTACTLESS_READER_NAME);
        self.physical_channel_open.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn close_physical_channel(&self) {
        debug!("{}: closing physical channel", CONTACTLESS_READER_NAME);
        self.physical_channel_open.store(false, Ordering::SeqCst);
        self.forget_card();
    }

    /// Result of the last hunt; the field is not probed again.
    fn check_card_presence(&self) -> Result<bool> {
        Ok(self.card_discovered.load(Ordering::SeqCst))
    }

    fn power_on_data(&self) -> Option<String> {
        lock(&self.tag).as_ref().map(|t| bytes_to_hex(t.atr()))
    }

    fn activate_protocol(&self, name: &str) -> Result<()> {
        let protocol: ContactlessProtocol = name.parse()?;
        if protocol == ContactlessProtocol::Felica {
            warn!("{} is activated but is never part of the card search", protocol);
        }
        lock(&self.protocols).activate(protocol);
        debug!("{}: activated protocol {}", CONTACTLESS_READER_NAME, protocol);
        Ok(())
    }

    /// Unsupported names are ignored.
    fn deactivate_protocol(&self, name: &str) -> Result<()> {
        match ContactlessProtocol::from_name(name) {
            Some(protocol) => {
                lock(&self.protocols).deactivate(protocol);
                debug!("{}: deactivated protocol {}", CONTACTLESS_READER_NAME, protocol);
            }
            None => debug!("{}: ignoring deactivation of {}", CONTACTLESS_READER_NAME, name),
        }
        Ok(())
    }

    fn is_protocol_supported(&self, name: &str) -> bool {
        ContactlessProtocol::from_name(name).is_some()
    }

    fn is_current_protocol(&self, name: &str) -> bool {
        ContactlessProtocol::from_name(name).is_some_and(|p| lock(&self.protocols).is_active(p))
    }

    /// The controller prefixes RF answers with one byte that is not part
    /// of the APDU; it is stripped here.
    fn transmit_apdu(&self, apdu: &[u8]) -> Result<Vec<u8>> {
        trace!("{} >> {}", CONTACTLESS_READER_NAME, bytes_to_hex_spaced(apdu));

        let response = self.session.with_lock(|sdk| {
            let mut out = [0u8; RF_APDU_BUFFER_LEN];
            let mut len = 0usize;
            let status = sdk.iso_command(apdu, &mut out, &mut len);
            if !status.is_ok() {
                return Err(Error::status("RF ISO command", status));
            }
            let raw = truncated(&out, len);
            if raw.len() < MIN_APDU_RESPONSE_LEN {
                return Err(Error::ReaderIo(format!(
                    "incorrect APDU answer: {} byte(s)",
                    raw.len()
                )));
            }
            Ok(raw[1..].to_vec())
        })?;

        trace!("{} << {}", CONTACTLESS_READER_NAME, bytes_to_hex_spaced(&response));
        Ok(response)
    }

    fn on_unregister(&self) {
        self.stop_wait_for_card_insertion();
        self.session.teardown();
    }

    fn as_card_insertion_wait(&self) -> Option<&dyn CardInsertionWait> {
        Some(self)
    }
}
