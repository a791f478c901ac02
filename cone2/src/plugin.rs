// cone2-rs/cone2/src/plugin.rs
//! Plugin entry points: the factory and the directory of readers it
//! registers.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, info};

use crate::constants::PLUGIN_NAME;
use crate::reader::{ContactReader, ContactlessReader, ReaderSpi};
use crate::session::HardwareSession;
use crate::types::SamSlot;
use crate::utils::ms;
use crate::Result;

/// Period at which the caller's monitoring thread polls the reader list (ms)
pub const MONITORING_CYCLE_DURATION_MS: u64 = 1000;

/// The three readers of the C-One 2, keyed by name.
///
/// Every reader holds the same [`HardwareSession`], so their hardware
/// exchanges are serialized even though callers drive them independently.
#[derive(Debug)]
pub struct ReaderDirectory {
    session: Arc<HardwareSession>,
    contact_readers: [Arc<ContactReader>; 2],
    contactless_reader: Arc<ContactlessReader>,
}

impl ReaderDirectory {
    pub fn new(session: Arc<HardwareSession>) -> Self {
        let contact_readers =
            SamSlot::ALL.map(|slot| Arc::new(ContactReader::new(slot, session.clone())));
        let contactless_reader = Arc::new(ContactlessReader::new(session.clone()));
        debug!("reader directory populated");
        Self {
            session,
            contact_readers,
            contactless_reader,
        }
    }

    pub fn name(&self) -> &'static str {
        PLUGIN_NAME
    }

    pub fn session(&self) -> &Arc<HardwareSession> {
        &self.session
    }

    /// All readers: SAM 1, SAM 2, then the contactless reader.
    pub fn readers(&self) -> Vec<Arc<dyn ReaderSpi>> {
        let mut readers: Vec<Arc<dyn ReaderSpi>> = Vec::with_capacity(3);
        for r in &self.contact_readers {
            readers.push(r.clone());
        }
        readers.push(self.contactless_reader.clone());
        readers
    }

    pub fn reader_names(&self) -> Vec<String> {
        self.readers().iter().map(|r| r.name().to_string()).collect()
    }

    /// Exact-name lookup.
    pub fn reader(&self, name: &str) -> Option<Arc<dyn ReaderSpi>> {
        self.readers().into_iter().find(|r| r.name() == name)
    }

    pub fn contact_reader(&self, slot: SamSlot) -> &Arc<ContactReader> {
        match slot {
            SamSlot::One => &self.contact_readers[0],
            SamSlot::Two => &self.contact_readers[1],
        }
    }

    pub fn contactless_reader(&self) -> &Arc<ContactlessReader> {
        &self.contactless_reader
    }

    pub fn monitoring_cycle_duration(&self) -> Duration {
        ms(MONITORING_CYCLE_DURATION_MS)
    }

    /// Notify every reader that the plugin goes away. The contactless
    /// reader stops any pending wait and tears the session down.
    pub fn unregister(&self) {
        info!("unregistering {}", PLUGIN_NAME);
        for reader in self.readers() {
            reader.on_unregister();
        }
    }
}

/// Brings the hardware up and hands out the reader directory.
#[derive(Debug, Clone)]
pub struct Cone2PluginFactory {
    session: Arc<HardwareSession>,
}

impl Cone2PluginFactory {
    /// Initialize `session`. Initialization errors are returned as-is.
    pub fn init(session: Arc<HardwareSession>) -> Result<Self> {
        session.initialize()?;
        Ok(Self { session })
    }

    pub fn plugin_name(&self) -> &'static str {
        PLUGIN_NAME
    }

    /// A directory of fresh readers over the initialized session.
    pub fn plugin(&self) -> ReaderDirectory {
        ReaderDirectory::new(self.session.clone())
    }
}
