//! Hardware session configuration

/// Serial port the ASK controller is wired to on the C-One 2
pub const ASK_READER_PORT: &str = "/dev/ttyHSL1";

/// Serial baud rate of the controller
pub const BAUD_RATE: u32 = 115_200;

/// Bound on the peripheral power-up wait (ms)
pub const POWER_UP_TIMEOUT_MS: u64 = 3000;

/// Parameters used when bringing up the hardware session.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SessionConfig {
    pub port: String,
    pub baud_rate: u32,
    pub hw_flow_control: bool,
    pub power_up_timeout_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            port: ASK_READER_PORT.to_string(),
            baud_rate: BAUD_RATE,
            hw_flow_control: false,
            power_up_timeout_ms: POWER_UP_TIMEOUT_MS,
        }
    }
}

impl SessionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_port(mut self, port: impl Into<String>) -> Self {
        self.port = port.into();
        self
    }

    pub fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    pub fn with_power_up_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.power_up_timeout_ms = timeout_ms;
        self
    }
}
