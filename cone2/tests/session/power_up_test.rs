#[path = "../common/mod.rs"]
mod common;

use std::time::{Duration, Instant};

use cone2::prelude::*;
use cone2::sdk::{MockPower, MockSdk, PowerBehavior, SdkCall};

fn session(mock: &MockSdk, behavior: PowerBehavior, timeout_ms: u64) -> HardwareSession {
    common::helpers::init_logging();
    SessionBuilder::new()
        .with_sdk(Box::new(mock.clone()))
        .with_power_controller(Box::new(MockPower::new(behavior)))
        .with_config(SessionConfig::default().with_power_up_timeout_ms(timeout_ms))
        .build()
        .unwrap()
}

#[test]
fn delayed_power_up_within_deadline() {
    let mock = MockSdk::new();
    let s = session(&mock, PowerBehavior::Delayed(Duration::from_millis(30)), 1000);
    s.initialize().unwrap();
    assert!(s.is_initialized());
}

#[test]
fn power_up_past_deadline_times_out() {
    let mock = MockSdk::new();
    let s = session(&mock, PowerBehavior::Delayed(Duration::from_millis(500)), 50);

    let started = Instant::now();
    let err = s.initialize().unwrap_err();
    assert!(matches!(
        err,
        Error::Init(InitError::PowerUpTimeout { timeout_ms: 50 })
    ));
    assert!(started.elapsed() < Duration::from_millis(450));
    assert!(!s.is_initialized());
    assert_eq!(mock.count_calls(|c| matches!(c, SdkCall::Open { .. })), 0);
}

#[test]
fn silent_power_manager_times_out() {
    let mock = MockSdk::new();
    let s = session(&mock, PowerBehavior::Silent, 30);
    assert!(matches!(
        s.initialize(),
        Err(Error::Init(InitError::PowerUpTimeout { timeout_ms: 30 }))
    ));
}

#[test]
fn reported_failure_is_power_up_failed() {
    let mock = MockSdk::new();
    let s = session(&mock, PowerBehavior::Fail, 1000);
    let err = s.initialize().unwrap_err();
    assert!(matches!(err, Error::Init(InitError::PowerUpFailed)));
    assert!(err.to_string().contains("power-up"));
}
