// nfc-relay/src/transport/channel.rs

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use log::{debug, trace, warn};

use crate::protocol::{Packet, Reassembler};
use crate::transport::traits::SerialLink;
use crate::utils::timeout::ms;
use crate::{Error, Result};

/// How long one receive-thread read waits before rechecking the running flag.
const RX_POLL_MS: u64 = 20;

/// Read buffer for the receive thread; relay packets are small.
const RX_CHUNK: usize = 64;

/// Owns the physical serial link. A dedicated receive thread runs the
/// [`Reassembler`] over arriving bytes and queues completed packets; the
/// owning worker pops them with [`TransportChannel::try_take_packet`] and
/// writes outbound packets synchronously with [`TransportChannel::send`].
///
/// The inbound queue is the only resource shared between the receive
/// thread (producer) and the worker (consumer); the mpsc channel hands
/// whole packets across, so the consumer never observes a torn one.
pub struct TransportChannel {
    link: Box<dyn SerialLink>,
    inbound: Receiver<Packet>,
    running: Arc<AtomicBool>,
    failed: Arc<AtomicBool>,
    rx_thread: Option<JoinHandle<()>>,
}

impl TransportChannel {
    /// Take ownership of a link and start the byte-to-packet thread.
    pub fn open(link: Box<dyn SerialLink>) -> Result<Self> {
        let reader = link.try_clone()?;
        let (tx, rx) = mpsc::channel();
        let running = Arc::new(AtomicBool::new(true));
        let failed = Arc::new(AtomicBool::new(false));

        let thread_running = Arc::clone(&running);
        let thread_failed = Arc::clone(&failed);
        let rx_thread = thread::Builder::new()
            .name("relay-rx".into())
            .spawn(move || rx_loop(reader, tx, thread_running, thread_failed))
            .map_err(|e| Error::Transport(format!("failed to spawn rx thread: {e}")))?;

        Ok(Self {
            link,
            inbound: rx,
            running,
            failed,
            rx_thread: Some(rx_thread),
        })
    }

    /// Encode and synchronously write one packet to the wire.
    pub fn send(&mut self, packet: &Packet) -> Result<()> {
        if self.failed.load(Ordering::SeqCst) {
            return Err(Error::Transport("link receive side failed".into()));
        }
        let bytes = packet.encode()?;
        trace!("tx {:?} ({} bytes)", packet.packet_type, bytes.len());
        self.link.write_all(&bytes)
    }

    /// Non-blocking pop from the inbound queue. `Ok(None)` when empty;
    /// `Err(Transport)` once the underlying link has failed.
    pub fn try_take_packet(&mut self) -> Result<Option<Packet>> {
        match self.inbound.try_recv() {
            Ok(pkt) => Ok(Some(pkt)),
            Err(TryRecvError::Empty) => {
                if self.failed.load(Ordering::SeqCst) {
                    Err(Error::Transport("link receive side failed".into()))
                } else {
                    Ok(None)
                }
            }
            Err(TryRecvError::Disconnected) => {
                Err(Error::Transport("link receive side stopped".into()))
            }
        }
    }

    /// Stop and join the receive thread. Called from `Drop`; idempotent.
    pub fn shutdown(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.rx_thread.take() {
            if handle.join().is_err() {
                warn!("relay-rx thread panicked during shutdown");
            }
        }
    }
}

impl Drop for TransportChannel {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn rx_loop(
    mut link: Box<dyn SerialLink>,
    tx: Sender<Packet>,
    running: Arc<AtomicBool>,
    failed: Arc<AtomicBool>,
) {
    let mut reassembler = Reassembler::new();
    let mut buf = [0u8; RX_CHUNK];
    while running.load(Ordering::SeqCst) {
        let n = match link.read(&mut buf, ms(RX_POLL_MS)) {
            Ok(0) => continue,
            Ok(n) => n,
            Err(e) => {
                warn!("serial link failed: {e}");
                failed.store(true, Ordering::SeqCst);
                break;
            }
        };
        for packet in reassembler.feed(&buf[..n]) {
            trace!("rx {:?} ({} payload bytes)", packet.packet_type, packet.payload.len());
            if tx.send(packet).is_err() {
                // Consumer gone; channel is being torn down
                debug!("inbound queue closed, stopping rx thread");
                return;
            }
        }
    }
}
