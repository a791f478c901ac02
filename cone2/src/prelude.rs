// cone2-rs/cone2/src/prelude.rs

pub use crate::plugin::{Cone2PluginFactory, ReaderDirectory};
pub use crate::protocol::{ContactProtocol, ContactlessProtocol};
pub use crate::reader::{
    CardInsertionWait, ContactReader, ContactlessConfig, ContactlessReader, ReaderSpi,
};
pub use crate::sdk::{AskSdk, PowerController, PowerEvent};
pub use crate::session::{HardwareSession, SessionBuilder, SessionConfig};
pub use crate::{CommunicationMode, Error, InitError, Result, RfidTag, SamSlot, Status};

#[cfg(feature = "async")]
pub use crate::async_detection::AsyncCardInsertion;

// Re-export small utilities for convenience
pub use crate::utils::{bytes_to_hex, bytes_to_hex_spaced, ms, parse_hex};
