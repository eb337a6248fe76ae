// nfc-relay/src/worker/reader.rs

//! Reader-side relay worker: finds the real card, ships its descriptor,
//! then answers each relayed APDU against the physical card.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::thread;

use log::{debug, info, warn};

use crate::link::RelayLink;
use crate::nfc::CardReader;
use crate::protocol::block::strip_leading_pcb;
use crate::protocol::{descriptor, PacketType};
use crate::types::Role;
use crate::utils::bytes_to_hex_spaced;
use crate::utils::timeout::{ms, CARD_POLL_TIMEOUT_MS, TRANSCEIVE_TIMEOUT_MS};
use crate::Result;
use crate::worker::{ReaderState, StatePublisher, WorkerHandle, WorkerState};

/// Reader-side worker. Owns its relay link and the real-reader capability
/// for the lifetime of the thread.
pub struct ReaderWorker<R: CardReader> {
    link: RelayLink,
    reader: R,
    state: ReaderState,
    publisher: StatePublisher,
    running: Arc<AtomicBool>,
}

impl<R: CardReader + 'static> ReaderWorker<R> {
    /// Spawn the worker thread. The returned receiver carries state-change
    /// notifications for a UI collaborator.
    pub fn spawn(link: RelayLink, reader: R) -> (WorkerHandle, Receiver<WorkerState>) {
        let (tx, rx) = mpsc::channel();
        let running = Arc::new(AtomicBool::new(true));
        let thread_running = Arc::clone(&running);

        let thread = thread::Builder::new()
            .name("relay-reader".into())
            .spawn(move || {
                let worker = ReaderWorker {
                    link,
                    reader,
                    state: ReaderState::WaitPong,
                    publisher: StatePublisher::new(tx),
                    running: thread_running,
                };
                worker.run();
            })
            .expect("failed to spawn reader worker thread");

        (WorkerHandle::new(running, thread), rx)
    }

    fn run(mut self) {
        info!("reader worker started");
        if let Err(e) = self.link.send_role_announcement(PacketType::Ping) {
            warn!("reader worker could not announce itself: {e}");
            self.running.store(false, Ordering::SeqCst);
            return;
        }
        self.publisher.publish(WorkerState::Reader(self.state));

        while self.running.load(Ordering::SeqCst) {
            let step = match self.state {
                ReaderState::WaitPong => self.step_wait_pong(),
                ReaderState::CardSearch => self.step_card_search(),
                ReaderState::CardFound => self.step_card_found(),
            };
            match step {
                Ok(()) => {}
                Err(e) if e.is_fatal() => {
                    warn!("reader worker stopping: {e}");
                    break;
                }
                Err(e) => debug!("reader worker: {e}"),
            }
        }
        self.running.store(false, Ordering::SeqCst);
        info!("reader worker stopped");
        // RelayLink drops here, tearing down the transport channel
    }

    fn set_state(&mut self, state: ReaderState) {
        self.state = state;
        self.publisher.publish(WorkerState::Reader(state));
    }

    fn step_wait_pong(&mut self) -> Result<()> {
        if self.link.wait_for_pong(Role::Card, Role::Reader)? {
            info!("peer confirmed as card side");
            self.set_state(ReaderState::CardSearch);
        }
        Ok(())
    }

    fn step_card_search(&mut self) -> Result<()> {
        // Hardware poll failures are retried indefinitely, never fatal
        match self.reader.detect_card(ms(CARD_POLL_TIMEOUT_MS)) {
            Ok(Some(identity)) => {
                info!("card found, uid {}", identity.uid.to_hex());
                let record = descriptor::serialize(&identity)?;
                self.link
                    .send_with_payload(PacketType::DeviceDescriptor, &record)?;
                self.set_state(ReaderState::CardFound);
            }
            Ok(None) => {}
            Err(e) => debug!("card poll failed: {e}"),
        }
        Ok(())
    }

    fn step_card_found(&mut self) -> Result<()> {
        let packet = match self.link.wait_for_packet(PacketType::ApduRequest)? {
            Some(p) => p,
            None => return Ok(()),
        };
        let apdu = strip_leading_pcb(&packet.payload);
        debug!("card <- [{}]", bytes_to_hex_spaced(apdu));
        match self.reader.transceive(apdu, ms(TRANSCEIVE_TIMEOUT_MS)) {
            Ok(answer) => {
                debug!("card -> [{}]", bytes_to_hex_spaced(&answer));
                self.link
                    .send_with_payload(PacketType::ApduResponse, &answer)
            }
            Err(e) => {
                // Reported to the peer per exchange; the worker stays up
                warn!("transceive failed: {e}");
                self.link.send_no_payload(PacketType::Error)
            }
        }
    }
}
