// cone2-rs/cone2/src/session/mod.rs
//! Shared access to the single ASK controller.
//!
//! Both SAM slots and the RF interface sit behind one serial line, so every
//! logical reader funnels its commands through one [`HardwareSession`].
//! The session owns the SDK handle and a single coarse lock; a command is
//! only ever issued while holding it.

pub mod builder;
pub mod config;

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Mutex, MutexGuard, PoisonError};

use log::{debug, error, info, warn};

pub use builder::SessionBuilder;
pub use config::SessionConfig;

use crate::sdk::{AskSdk, PowerController, PowerEvent};
use crate::utils::ms;
use crate::{Error, InitError, Result};

struct SessionInner {
    sdk: Box<dyn AskSdk>,
    power: Option<Box<dyn PowerController>>,
    powered: bool,
    destroyed: bool,
}

/// Owner of the controller connection and of the lock serializing all
/// traffic on it.
pub struct HardwareSession {
    config: SessionConfig,
    inner: Mutex<SessionInner>,
    // Only written while `inner` is locked.
    initialized: AtomicBool,
}

/// Exclusive access to the controller. The session lock is held for the
/// lifetime of the handle and released when it is dropped.
pub struct SessionHandle<'a> {
    guard: MutexGuard<'a, SessionInner>,
}

impl Deref for SessionHandle<'_> {
    type Target = dyn AskSdk;

    fn deref(&self) -> &Self::Target {
        &*self.guard.sdk
    }
}

impl DerefMut for SessionHandle<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.guard.sdk
    }
}

impl HardwareSession {
    pub(crate) fn new(
        sdk: Box<dyn AskSdk>,
        power: Option<Box<dyn PowerController>>,
        config: SessionConfig,
    ) -> Self {
        Self {
            config,
            inner: Mutex::new(SessionInner {
                sdk,
                power,
                powered: false,
                destroyed: false,
            }),
            initialized: AtomicBool::new(false),
        }
    }

    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    // Poisoning is recovered, never propagated.
    fn lock(&self) -> MutexGuard<'_, SessionInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    /// Power the peripheral, open the serial port and check the firmware.
    ///
    /// Blocks for at most the configured power-up timeout while waiting for
    /// the power manager. Calling it again on an initialized session is a
    /// no-op.
    pub fn initialize(&self) -> Result<()> {
        let mut guard = self.lock();
        let inner = &mut *guard;

        if inner.destroyed {
            return Err(InitError::SessionDestroyed.into());
        }
        if self.is_initialized() {
            debug!("hardware session already initialized");
            return Ok(());
        }

        debug!("initializing hardware session on {}", self.config.port);

        if !inner.powered {
            if let Some(power) = inner.power.as_mut() {
                power_up(&mut **power, self.config.power_up_timeout_ms)?;
                inner.powered = true;
                debug!("RFID peripheral powered up");
            }
        }

        let status = inner.sdk.open(
            &self.config.port,
            self.config.baud_rate,
            self.config.hw_flow_control,
        );
        if !status.is_ok() {
            error!("opening {} failed: {}", self.config.port, status);
            return Err(InitError::PortOpenFailed { status }.into());
        }

        let mut version = String::new();
        let status = inner.sdk.version(&mut version);
        if status.is_ok() {
            info!("ASK controller firmware {}", version);
        } else {
            warn!("firmware version query failed: {}", status);
        }

        self.initialized.store(true, Ordering::SeqCst);
        info!("hardware session initialized");
        Ok(())
    }

    /// Lock the session and hand out the controller.
    pub fn handle(&self) -> Result<SessionHandle<'_>> {
        let guard = self.lock();
        if !self.is_initialized() {
            return Err(Error::NotInitialized);
        }
        Ok(SessionHandle { guard })
    }

    /// Run `op` against the controller while holding the session lock. The
    /// lock is released on every exit path, including errors and panics.
    pub fn with_lock<T>(&self, op: impl FnOnce(&mut dyn AskSdk) -> Result<T>) -> Result<T> {
        let mut handle = self.handle()?;
        op(&mut *handle)
    }

    /// Power the peripheral down and release the SDK. Safe to call on a
    /// session that never initialized.
    pub fn teardown(&self) {
        let mut guard = self.lock();
        let inner = &mut *guard;
        let initialized = self.is_initialized();

        if !initialized && !inner.powered {
            debug!("teardown requested on an idle session");
            return;
        }

        if let Some(power) = inner.power.as_mut() {
            if inner.powered {
                power.power_off();
            }
            power.release();
        }
        if initialized {
            inner.sdk.destroy();
        }

        inner.powered = false;
        inner.destroyed = true;
        self.initialized.store(false, Ordering::SeqCst);
        info!("hardware session torn down");
    }
}

/// Turn the callback-based power-up into a bounded blocking wait.
fn power_up(power: &mut dyn PowerController, timeout_ms: u64) -> Result<()> {
    let (tx, rx) = mpsc::channel();
    power.power_on(Box::new(move |event| {
        // The waiter may already have given up.
        let _ = tx.send(event);
    }));

    match rx.recv_timeout(ms(timeout_ms)) {
        Ok(PowerEvent::PoweredUp) => Ok(()),
        Ok(PowerEvent::Failed) | Err(RecvTimeoutError::Disconnected) => {
            error!("RFID peripheral power-up failed");
            Err(InitError::PowerUpFailed.into())
        }
        Err(RecvTimeoutError::Timeout) => {
            error!("RFID peripheral power-up timed out after {} ms", timeout_ms);
            Err(InitError::PowerUpTimeout { timeout_ms }.into())
        }
    }
}

impl fmt::Debug for HardwareSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HardwareSession")
            .field("config", &self.config)
            .field("initialized", &self.is_initialized())
            .finish_non_exhaustive()
    }
}
