// cone2-rs/cone2/src/reader/mod.rs
//! Logical readers exposed to the transaction layer.
//!
//! The C-One 2 presents three readers over one controller: one per SAM
//! slot and one for the RF field. All of them share a
//! [`HardwareSession`](crate::session::HardwareSession) and go through its
//! lock for every hardware exchange.

pub mod config;
pub mod contact;
pub mod contactless;

pub use config::ContactlessConfig;
pub use contact::ContactReader;
pub use contactless::ContactlessReader;

use crate::Result;

/// Operations every reader offers to the transaction layer.
///
/// Methods take `&self`; readers keep their own state behind interior
/// mutability so they can be shared between the directory and callers.
pub trait ReaderSpi: Send + Sync {
    /// Name the reader is registered under.
    fn name(&self) -> &str;

    fn is_contactless(&self) -> bool;

    fn is_physical_channel_open(&self) -> bool;

    fn open_physical_channel(&self) -> Result<()>;

    fn close_physical_channel(&self);

    /// Whether a card (or SAM) is currently present.
    fn check_card_presence(&self) -> Result<bool>;

    /// Uppercase hex of the last ATR, `None` when there is none.
    fn power_on_data(&self) -> Option<String>;

    fn activate_protocol(&self, name: &str) -> Result<()>;

    fn deactivate_protocol(&self, name: &str) -> Result<()>;

    fn is_protocol_supported(&self, name: &str) -> bool;

    fn is_current_protocol(&self, name: &str) -> bool;

    /// Send a command APDU and return the response APDU.
    fn transmit_apdu(&self, apdu: &[u8]) -> Result<Vec<u8>>;

    /// Called once when the owning plugin is unregistered.
    fn on_unregister(&self) {}

    /// Access to the blocking insertion wait for readers that support it.
    fn as_card_insertion_wait(&self) -> Option<&dyn CardInsertionWait> {
        None
    }
}

/// Blocking card-insertion wait with cooperative cancellation.
pub trait CardInsertionWait: Send + Sync {
    /// Block until a card is found (`Ok(true)`) or the wait is stopped
    /// (`Ok(false)`).
    fn wait_for_card_insertion(&self) -> Result<bool>;

    /// Ask a running wait to return. The hardware call in progress is not
    /// interrupted; the wait ends after it completes.
    fn stop_wait_for_card_insertion(&self);
}

/// Copy of `buf` cut to the length reported by the controller.
pub(crate) fn truncated(buf: &[u8], reported_len: usize) -> Vec<u8> {
    buf[..reported_len.min(buf.len())].to_vec()
}
