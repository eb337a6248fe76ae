// nfc-relay/src/transport/mock.rs

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use crate::transport::traits::SerialLink;
use crate::{Error, Result};

/// In-memory serial link for unit tests. `pair()` returns two
/// cross-connected ends: bytes written to one end become readable on the
/// other, preserving byte order and arbitrary chunking like a real UART.
#[derive(Debug, Clone)]
pub struct MockSerialLink {
    tx: Arc<Mutex<VecDeque<u8>>>,
    rx: Arc<Mutex<VecDeque<u8>>>,
    broken: Arc<AtomicBool>,
}

impl MockSerialLink {
    /// Create both ends of a point-to-point link.
    pub fn pair() -> (MockSerialLink, MockSerialLink) {
        let a_to_b = Arc::new(Mutex::new(VecDeque::new()));
        let b_to_a = Arc::new(Mutex::new(VecDeque::new()));
        let broken = Arc::new(AtomicBool::new(false));
        let a = MockSerialLink {
            tx: Arc::clone(&a_to_b),
            rx: Arc::clone(&b_to_a),
            broken: Arc::clone(&broken),
        };
        let b = MockSerialLink {
            tx: b_to_a,
            rx: a_to_b,
            broken,
        };
        (a, b)
    }

    /// Simulate a failed wire; both ends start reporting transport errors.
    pub fn break_link(&self) {
        self.broken.store(true, Ordering::SeqCst);
    }

    /// Bytes currently queued toward the peer (for assertions).
    pub fn pending_tx(&self) -> usize {
        self.tx.lock().expect("mock queue poisoned").len()
    }
}

impl SerialLink for MockSerialLink {
    fn write_all(&mut self, data: &[u8]) -> Result<()> {
        if self.broken.load(Ordering::SeqCst) {
            return Err(Error::Transport("mock link broken".into()));
        }
        let mut q = self.tx.lock().expect("mock queue poisoned");
        q.extend(data.iter().copied());
        Ok(())
    }

    fn read(&mut self, buf: &mut [u8], timeout: Duration) -> Result<usize> {
        let deadline = Instant::now() + timeout;
        loop {
            if self.broken.load(Ordering::SeqCst) {
                return Err(Error::Transport("mock link broken".into()));
            }
            {
                let mut q = self.rx.lock().expect("mock queue poisoned");
                if !q.is_empty() {
                    let n = buf.len().min(q.len());
                    for slot in buf.iter_mut().take(n) {
                        *slot = q.pop_front().unwrap();
                    }
                    return Ok(n);
                }
            }
            if Instant::now() >= deadline {
                return Ok(0);
            }
            thread::sleep(Duration::from_millis(1));
        }
    }

    fn try_clone(&self) -> Result<Box<dyn SerialLink>> {
        Ok(Box::new(self.clone()))
    }
}
