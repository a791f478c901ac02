// cone2-rs/cone2/src/sdk/traits.rs

use crate::protocol::{HuntPhaseParameters, SearchRequest};
use crate::types::Status;

/// Command set of the ASK RFID/SAM controller, as exposed by the vendor
/// SDK. Keeps the serial transport and the command encoding away from the
/// reader logic.
///
/// Output buffers are caller-allocated. Implementations write at most
/// `buf.len()` bytes and report the length the controller announced, which
/// may differ from what fits; callers truncate.
pub trait AskSdk: Send {
    /// Open the serial port the controller is attached to.
    fn open(&mut self, port: &str, baud_rate: u32, hw_flow_control: bool) -> Status;

    /// Query the controller firmware version into `version`.
    fn version(&mut self, version: &mut String) -> Status;

    /// Select a SAM slot with the given protocol code.
    fn select_sam(&mut self, slot: u8, protocol: u8) -> Status;

    /// Reset the selected SAM and read its ATR.
    fn reset_sam(&mut self, slot: u8, atr: &mut [u8], atr_len: &mut usize) -> Status;

    /// Exchange an APDU with the selected SAM.
    fn iso_command_sam(&mut self, apdu: &[u8], out: &mut [u8], out_len: &mut usize) -> Status;

    /// Configure the next hunt phase.
    fn enter_hunt_phase_parameters(&mut self, params: &HuntPhaseParameters) -> Status;

    /// Run one bounded search for a card. `com` receives the communication
    /// mode byte of the tag found, if any.
    fn search_card(
        &mut self,
        request: &SearchRequest,
        com: &mut u8,
        atr: &mut [u8],
        atr_len: &mut usize,
    ) -> Status;

    /// Exchange an APDU with the tag found by the last search.
    fn iso_command(&mut self, apdu: &[u8], out: &mut [u8], out_len: &mut usize) -> Status;

    /// Close the port and release the SDK instance.
    fn destroy(&mut self);
}

/// Outcome delivered by the power manager once a power-up request settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerEvent {
    PoweredUp,
    Failed,
}

/// Completion callback for [`PowerController::power_on`]. It may be called
/// from any thread, at most once.
pub type PowerCallback = Box<dyn FnOnce(PowerEvent) + Send>;

/// Peripheral power management of the RFID module.
pub trait PowerController: Send {
    /// Ask for the peripheral to be powered. Completion is reported
    /// asynchronously through `done`.
    fn power_on(&mut self, done: PowerCallback);

    fn power_off(&mut self);

    /// Unregister listeners and release the power manager resources.
    fn release(&mut self);
}
