//! Test support helpers intended for use by unit and integration tests.
//!
//! These helpers centralize common MockSdk setup so tests across the crate
//! and the tests/ directory can reuse the same logic.
#![allow(dead_code)]

use std::sync::Arc;

use crate::sdk::{MockPower, MockSdk};
use crate::session::{HardwareSession, SessionBuilder, SessionConfig};
use crate::Result;

/// Session backed by a clone of `mock`, not yet initialized. Power-up is
/// immediate and bounded to 100 ms so failing tests fail fast.
#[doc(hidden)]
pub fn mock_session(mock: &MockSdk) -> Result<Arc<HardwareSession>> {
    let session = SessionBuilder::new()
        .with_sdk(Box::new(mock.clone()))
        .with_power_controller(Box::new(MockPower::immediate()))
        .with_config(SessionConfig::default().with_power_up_timeout_ms(100))
        .build()?;
    Ok(Arc::new(session))
}

/// Same as [`mock_session`] but already initialized, with the
/// initialization calls cleared from the mock's log.
#[doc(hidden)]
pub fn initialized_mock_session(mock: &MockSdk) -> Result<Arc<HardwareSession>> {
    let session = mock_session(mock)?;
    session.initialize()?;
    mock.clear_calls();
    Ok(session)
}
