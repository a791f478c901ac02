// cone2-rs/cone2/src/async_detection.rs
//! Async wrapper around the blocking card-insertion wait.
//!
//! The hunt loop blocks on the controller, so it runs on tokio's blocking
//! pool. Cancellation still goes through
//! [`CardInsertionWait::stop_wait_for_card_insertion`]; dropping the future
//! does not stop the loop.

use std::sync::Arc;

use async_trait::async_trait;

use crate::reader::{CardInsertionWait, ContactlessReader};
use crate::{Error, Result};

#[async_trait]
pub trait AsyncCardInsertion {
    /// Resolves to `true` when a card was found, `false` when stopped.
    async fn wait_for_card_insertion_async(&self) -> Result<bool>;
}

#[async_trait]
impl AsyncCardInsertion for Arc<ContactlessReader> {
    async fn wait_for_card_insertion_async(&self) -> Result<bool> {
        let reader = Arc::clone(self);
        tokio::task::spawn_blocking(move || reader.wait_for_card_insertion())
            .await
            .map_err(|e| Error::ReaderIo(format!("card detection task failed: {e}")))?
    }
}
