// cone2-rs/cone2/src/lib.rs

//! cone2
//!
//! Reader driver layer for the smart-card readers of the Coppernic C-One 2:
//! two SAM slots and one contactless interface, all behind a single ASK
//! controller on a serial line.

pub mod constants;
pub mod error;
pub mod plugin;
pub mod prelude;
pub mod protocol;
pub mod reader;
pub mod sdk;
pub mod session;
pub mod test_support;
pub mod types;
pub mod utils;

#[cfg(feature = "async")]
pub mod async_detection;

// Re-export common types at crate root so `crate::Error`, `crate::Result`,
// and the value types in `types` are available for consumers and for
// convenient `prelude` re-exports.
pub use crate::error::*;
pub use crate::types::*;

pub use prelude::*;
