// cone2-rs/cone2/src/session/builder.rs

use crate::sdk::{AskSdk, PowerController};
use crate::session::{HardwareSession, SessionConfig};
use crate::{Error, Result};

/// Helper to construct a HardwareSession with optional configuration.
#[derive(Default)]
pub struct SessionBuilder {
    sdk: Option<Box<dyn AskSdk>>,
    power: Option<Box<dyn PowerController>>,
    config: SessionConfig,
}

impl SessionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provide the vendor SDK instance (e.g. MockSdk)
    pub fn with_sdk(mut self, sdk: Box<dyn AskSdk>) -> Self {
        self.sdk = Some(sdk);
        self
    }

    /// Provide a power manager. Without one the peripheral is assumed to
    /// be powered already.
    pub fn with_power_controller(mut self, power: Box<dyn PowerController>) -> Self {
        self.power = Some(power);
        self
    }

    pub fn with_config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    /// Consume the builder and return an uninitialized session.
    /// Requires an SDK instance; otherwise returns SdkUnavailable.
    pub fn build(self) -> Result<HardwareSession> {
        match self.sdk {
            Some(sdk) => Ok(HardwareSession::new(sdk, self.power, self.config)),
            None => Err(Error::SdkUnavailable),
        }
    }
}
