// cone2-rs/cone2/src/sdk/mock.rs

use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;

use crate::protocol::{HuntPhaseParameters, SearchRequest};
use crate::sdk::traits::{AskSdk, PowerCallback, PowerController, PowerEvent};
use crate::types::Status;

/// A call received by [`MockSdk`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SdkCall {
    Open {
        port: String,
        baud_rate: u32,
        hw_flow_control: bool,
    },
    Version,
    SelectSam {
        slot: u8,
        protocol: u8,
    },
    ResetSam {
        slot: u8,
    },
    IsoCommandSam(Vec<u8>),
    EnterHuntPhaseParameters(HuntPhaseParameters),
    SearchCard(SearchRequest),
    IsoCommand(Vec<u8>),
    Destroy,
}

/// Scripted answer to a buffer-returning call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockReply {
    pub status: Status,
    pub data: Vec<u8>,
    /// Length reported to the caller, independent of `data.len()`.
    pub reported_len: usize,
}

impl MockReply {
    pub fn new(status: Status, data: Vec<u8>) -> Self {
        let reported_len = data.len();
        Self {
            status,
            data,
            reported_len,
        }
    }

    fn timeout() -> Self {
        Self::new(Status::Timeout, Vec::new())
    }

    fn fill(&self, out: &mut [u8], out_len: &mut usize) -> Status {
        let n = self.data.len().min(out.len());
        out[..n].copy_from_slice(&self.data[..n]);
        *out_len = self.reported_len;
        self.status
    }
}

/// Scripted answer to a search call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockSearch {
    pub com: u8,
    pub reply: MockReply,
}

#[derive(Debug, Default)]
struct MockState {
    calls: Vec<SdkCall>,
    open_status: Status,
    version_status: Status,
    version: String,
    select_statuses: VecDeque<Status>,
    resets: VecDeque<MockReply>,
    sam_replies: VecDeque<MockReply>,
    searches: VecDeque<MockSearch>,
    rf_replies: VecDeque<MockReply>,
    call_delay: Option<Duration>,
    destroyed: bool,
}

/// Scriptable stand-in for the vendor SDK. Clones share the same state,
/// so a test can keep a handle after moving one into a session.
///
/// Calls with nothing queued behave like an absent card: select reports
/// Ok, everything else reports [`Status::Timeout`] with an empty buffer.
#[derive(Debug, Clone, Default)]
pub struct MockSdk {
    state: Arc<Mutex<MockState>>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl MockSdk {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record the call and hold it "in flight" for the configured delay.
    fn enter(&self, call: SdkCall) -> InFlight<'_> {
        let delay = {
            let mut state = self.state();
            state.calls.push(call);
            state.call_delay
        };
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if let Some(d) = delay {
            thread::sleep(d);
        }
        InFlight(&self.in_flight)
    }

    pub fn set_open_status(&self, status: Status) {
        self.state().open_status = status;
    }

    pub fn set_version(&self, status: Status, version: &str) {
        let mut state = self.state();
        state.version_status = status;
        state.version = version.to_string();
    }

    /// Keep every call busy for `delay`, to widen race windows in tests.
    pub fn set_call_delay(&self, delay: Duration) {
        self.state().call_delay = Some(delay);
    }

    pub fn push_select(&self, status: Status) {
        self.state().select_statuses.push_back(status);
    }

    pub fn push_reset(&self, status: Status, atr: Vec<u8>) {
        self.state().resets.push_back(MockReply::new(status, atr));
    }

    pub fn push_reset_with_len(&self, status: Status, atr: Vec<u8>, reported_len: usize) {
        self.state().resets.push_back(MockReply {
            status,
            data: atr,
            reported_len,
        });
    }

    pub fn push_sam_reply(&self, status: Status, data: Vec<u8>) {
        self.state().sam_replies.push_back(MockReply::new(status, data));
    }

    pub fn push_sam_reply_with_len(&self, status: Status, data: Vec<u8>, reported_len: usize) {
        self.state().sam_replies.push_back(MockReply {
            status,
            data,
            reported_len,
        });
    }

    pub fn push_search(&self, status: Status, com: u8, atr: Vec<u8>) {
        self.state().searches.push_back(MockSearch {
            com,
            reply: MockReply::new(status, atr),
        });
    }

    pub fn push_search_with_len(&self, status: Status, com: u8, atr: Vec<u8>, reported_len: usize) {
        self.state().searches.push_back(MockSearch {
            com,
            reply: MockReply {
                status,
                data: atr,
                reported_len,
            },
        });
    }

    pub fn push_rf_reply(&self, status: Status, data: Vec<u8>) {
        self.state().rf_replies.push_back(MockReply::new(status, data));
    }

    pub fn push_rf_reply_with_len(&self, status: Status, data: Vec<u8>, reported_len: usize) {
        self.state().rf_replies.push_back(MockReply {
            status,
            data,
            reported_len,
        });
    }

    /// Every call received so far, in order.
    pub fn calls(&self) -> Vec<SdkCall> {
        self.state().calls.clone()
    }

    pub fn count_calls(&self, pred: impl Fn(&SdkCall) -> bool) -> usize {
        self.state().calls.iter().filter(|c| pred(c)).count()
    }

    pub fn clear_calls(&self) {
        self.state().calls.clear();
    }

    /// Highest number of calls that were ever executing at the same time.
    pub fn max_concurrent_calls(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn is_destroyed(&self) -> bool {
        self.state().destroyed
    }
}

impl AskSdk for MockSdk {
    fn open(&mut self, port: &str, baud_rate: u32, hw_flow_control: bool) -> Status {
        let _busy = self.enter(SdkCall::Open {
            port: port.to_string(),
            baud_rate,
            hw_flow_control,
        });
        self.state().open_status
    }

    fn version(&mut self, version: &mut String) -> Status {
        let _busy = self.enter(SdkCall::Version);
        let state = self.state();
        if state.version_status.is_ok() {
            version.clear();
            version.push_str(&state.version);
        }
        state.version_status
    }

    fn select_sam(&mut self, slot: u8, protocol: u8) -> Status {
        let _busy = self.enter(SdkCall::SelectSam { slot, protocol });
        self.state().select_statuses.pop_front().unwrap_or(Status::Ok)
    }

    fn reset_sam(&mut self, slot: u8, atr: &mut [u8], atr_len: &mut usize) -> Status {
        let _busy = self.enter(SdkCall::ResetSam { slot });
        let reply = self
            .state()
            .resets
            .pop_front()
            .unwrap_or_else(MockReply::timeout);
        reply.fill(atr, atr_len)
    }

    fn iso_command_sam(&mut self, apdu: &[u8], out: &mut [u8], out_len: &mut usize) -> Status {
        let _busy = self.enter(SdkCall::IsoCommandSam(apdu.to_vec()));
        let reply = self
            .state()
            .sam_replies
            .pop_front()
            .unwrap_or_else(MockReply::timeout);
        reply.fill(out, out_len)
    }

    fn enter_hunt_phase_parameters(&mut self, params: &HuntPhaseParameters) -> Status {
        let _busy = self.enter(SdkCall::EnterHuntPhaseParameters(params.clone()));
        Status::Ok
    }

    fn search_card(
        &mut self,
        request: &SearchRequest,
        com: &mut u8,
        atr: &mut [u8],
        atr_len: &mut usize,
    ) -> Status {
        let _busy = self.enter(SdkCall::SearchCard(*request));
        match self.state().searches.pop_front() {
            Some(search) => {
                *com = search.com;
                search.reply.fill(atr, atr_len)
            }
            None => {
                *com = crate::constants::COM_NO_CARD;
                *atr_len = 0;
                Status::Timeout
            }
        }
    }

    fn iso_command(&mut self, apdu: &[u8], out: &mut [u8], out_len: &mut usize) -> Status {
        let _busy = self.enter(SdkCall::IsoCommand(apdu.to_vec()));
        let reply = self
            .state()
            .rf_replies
            .pop_front()
            .unwrap_or_else(MockReply::timeout);
        reply.fill(out, out_len)
    }

    fn destroy(&mut self) {
        let _busy = self.enter(SdkCall::Destroy);
        self.state().destroyed = true;
    }
}

/// How [`MockPower`] answers a power-up request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerBehavior {
    /// Report success before `power_on` returns.
    Immediate,
    /// Report success from another thread after the delay.
    Delayed(Duration),
    /// Report a failure.
    Fail,
    /// Never report anything.
    Silent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerCall {
    On,
    Off,
    Release,
}

/// Scriptable power manager. Clones share the recorded calls.
#[derive(Clone)]
pub struct MockPower {
    behavior: PowerBehavior,
    calls: Arc<Mutex<Vec<PowerCall>>>,
    parked: Arc<Mutex<Vec<PowerCallback>>>,
}

impl fmt::Debug for MockPower {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockPower")
            .field("behavior", &self.behavior)
            .field("calls", &self.calls())
            .finish()
    }
}

impl MockPower {
    pub fn new(behavior: PowerBehavior) -> Self {
        Self {
            behavior,
            calls: Arc::new(Mutex::new(Vec::new())),
            parked: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn immediate() -> Self {
        Self::new(PowerBehavior::Immediate)
    }

    pub fn calls(&self) -> Vec<PowerCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn record(&self, call: PowerCall) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }
}

impl PowerController for MockPower {
    fn power_on(&mut self, done: PowerCallback) {
        self.record(PowerCall::On);
        match self.behavior {
            PowerBehavior::Immediate => done(PowerEvent::PoweredUp),
            PowerBehavior::Fail => done(PowerEvent::Failed),
            PowerBehavior::Delayed(delay) => {
                thread::spawn(move || {
                    thread::sleep(delay);
                    done(PowerEvent::PoweredUp);
                });
            }
            // Keep the callback alive so the waiter sees silence, not a
            // dropped sender.
            PowerBehavior::Silent => self
                .parked
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(done),
        }
    }

    fn power_off(&mut self) {
        self.record(PowerCall::Off);
    }

    fn release(&mut self) {
        self.record(PowerCall::Release);
        self.parked
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
