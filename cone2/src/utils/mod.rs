//! Small helpers shared across the crate: hex formatting and timeouts.

pub mod hex;
pub mod timeout;

pub use hex::*;
pub use timeout::*;
