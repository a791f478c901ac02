//! Contactless reader configuration

/// Default delay between two absence checks while a card is processed (ms)
pub const CHECK_FOR_ABSENCE_TIMEOUT_DEFAULT: u64 = 500;

/// Default wait granted to the detection thread before it is abandoned (ms)
pub const THREAD_WAIT_TIMEOUT_DEFAULT: u64 = 2000;

/// Timing knobs of the contactless reader consumed by the card observation
/// layer above it. Adjustable at runtime through the reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContactlessConfig {
    pub check_for_absence_timeout_ms: u64,
    pub thread_wait_timeout_ms: u64,
}

impl Default for ContactlessConfig {
    fn default() -> Self {
        Self {
            check_for_absence_timeout_ms: CHECK_FOR_ABSENCE_TIMEOUT_DEFAULT,
            thread_wait_timeout_ms: THREAD_WAIT_TIMEOUT_DEFAULT,
        }
    }
}

impl ContactlessConfig {
    pub fn with_check_for_absence_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.check_for_absence_timeout_ms = timeout_ms;
        self
    }

    pub fn with_thread_wait_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.thread_wait_timeout_ms = timeout_ms;
        self
    }
}
