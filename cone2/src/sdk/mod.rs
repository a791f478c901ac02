// cone2-rs/cone2/src/sdk/mod.rs

pub mod mock;
pub mod traits;

pub use mock::{MockPower, MockSdk, PowerBehavior, PowerCall, SdkCall};
pub use traits::{AskSdk, PowerCallback, PowerController, PowerEvent};
