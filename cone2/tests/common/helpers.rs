// helpers.rs — session and directory setup over MockSdk

use std::sync::Arc;

use cone2::plugin::ReaderDirectory;
use cone2::sdk::MockSdk;
use cone2::session::HardwareSession;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Initialized session over `mock`, with the init calls cleared.
pub fn session(mock: &MockSdk) -> anyhow::Result<Arc<HardwareSession>> {
    init_logging();
    Ok(cone2::test_support::initialized_mock_session(mock)?)
}

pub fn directory(mock: &MockSdk) -> anyhow::Result<ReaderDirectory> {
    Ok(ReaderDirectory::new(session(mock)?))
}
