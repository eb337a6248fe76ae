// nfc-relay/src/nfc/mock.rs

//! Mock radio capabilities for unit tests. They record calls and return
//! scripted results, and the emulator end is cloneable so a test can keep
//! driving exchanges after a worker takes ownership.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::nfc::{BlockHandler, CardEmulator, CardReader};
use crate::types::CardIdentity;
use crate::{Error, Result};

/// Scripted reader-side capability.
#[derive(Default)]
pub struct MockCardReader {
    detections: VecDeque<Option<CardIdentity>>,
    responses: VecDeque<Result<Vec<u8>>>,
    /// APDUs passed to `transceive`, in order.
    pub transceived: Vec<Vec<u8>>,
    /// Number of `detect_card` calls made.
    pub detect_calls: usize,
}

impl MockCardReader {
    /// Empty script: every detection misses, every transceive fails.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one detection outcome.
    pub fn push_detection(&mut self, identity: Option<CardIdentity>) {
        self.detections.push_back(identity);
    }

    /// Queue one transceive outcome.
    pub fn push_response(&mut self, response: Result<Vec<u8>>) {
        self.responses.push_back(response);
    }
}

impl CardReader for MockCardReader {
    fn detect_card(&mut self, _timeout: Duration) -> Result<Option<CardIdentity>> {
        self.detect_calls += 1;
        Ok(self.detections.pop_front().flatten())
    }

    fn transceive(&mut self, data: &[u8], _timeout: Duration) -> Result<Vec<u8>> {
        self.transceived.push(data.to_vec());
        self.responses
            .pop_front()
            .unwrap_or_else(|| Err(Error::HardwareTransceive("no scripted response".into())))
    }
}

#[derive(Default)]
struct MockEmulatorInner {
    identity: Option<CardIdentity>,
    handler: Option<Box<dyn BlockHandler>>,
}

/// Card-side capability whose exchanges are driven by the test itself.
#[derive(Clone, Default)]
pub struct MockCardEmulator {
    inner: Arc<Mutex<MockEmulatorInner>>,
}

impl MockCardEmulator {
    /// Fresh emulator with no running emulation.
    pub fn new() -> Self {
        Self::default()
    }

    /// True once a worker has started emulation.
    pub fn is_started(&self) -> bool {
        self.inner.lock().expect("emulator poisoned").handler.is_some()
    }

    /// Identity the worker started emulation with, if any.
    pub fn identity(&self) -> Option<CardIdentity> {
        self.inner.lock().expect("emulator poisoned").identity.clone()
    }

    /// Deliver one block from the "real reader" and return the emulated
    /// card's answer. Panics when emulation is not running.
    pub fn exchange(&self, rx_block: &[u8]) -> Option<Vec<u8>> {
        let mut inner = self.inner.lock().expect("emulator poisoned");
        let handler = inner
            .handler
            .as_mut()
            .expect("exchange before start_emulation");
        handler.handle_block(rx_block)
    }
}

impl CardEmulator for MockCardEmulator {
    fn start_emulation(
        &mut self,
        identity: &CardIdentity,
        handler: Box<dyn BlockHandler>,
    ) -> Result<()> {
        let mut inner = self.inner.lock().expect("emulator poisoned");
        inner.identity = Some(identity.clone());
        inner.handler = Some(handler);
        Ok(())
    }

    fn stop_emulation(&mut self) -> Result<()> {
        let mut inner = self.inner.lock().expect("emulator poisoned");
        inner.handler = None;
        Ok(())
    }
}
