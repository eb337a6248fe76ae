// nfc-relay/src/worker/card.rs

//! Card-side relay worker: receives the peer's descriptor, emulates that
//! card toward the real reader, and bridges every reader-issued APDU
//! across the link while S(WTX) requests keep the reader from timing out.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, Mutex};
use std::thread;

use log::{debug, info, warn};

use crate::link::RelayLink;
use crate::nfc::{BlockHandler, CardEmulator};
use crate::protocol::block::{block_number, classify, i_block_response, wtx_request, BlockKind};
use crate::protocol::{descriptor, PacketType};
use crate::types::Role;
use crate::utils::timeout::{ms, LINK_POLL_INTERVAL_MS};
use crate::Result;
use crate::worker::{CardState, StatePublisher, WorkerHandle, WorkerState};

/// State shared between the worker thread and the radio's emulation
/// callback. One bounded exchange is in flight at a time; the buffers are
/// owned here and never shared across workers.
struct Emulation {
    state: CardState,
    /// APDU captured from the real reader, awaiting forwarding.
    pending_request: Option<Vec<u8>>,
    /// Answer received from the peer, awaiting delivery.
    pending_response: Option<Vec<u8>>,
    /// Block number of the I-block currently being serviced.
    reader_block_number: u8,
}

impl Emulation {
    fn new() -> Self {
        Self {
            state: CardState::WaitPong,
            pending_request: None,
            pending_response: None,
            reader_block_number: 0,
        }
    }
}

/// Handler invoked by the radio once per physical exchange. It runs under
/// a hard wall-clock budget, so it only touches the shared record and
/// answers immediately; serial I/O stays on the worker thread.
struct RelayBlockHandler {
    shared: Arc<Mutex<Emulation>>,
}

impl BlockHandler for RelayBlockHandler {
    fn handle_block(&mut self, rx_block: &[u8]) -> Option<Vec<u8>> {
        let pcb = match rx_block.first() {
            Some(&b) => b,
            None => {
                debug!("empty block from reader, ignoring");
                return None;
            }
        };
        let kind = classify(pcb);
        let mut em = match self.shared.lock() {
            Ok(guard) => guard,
            Err(_) => return None,
        };

        match (em.state, kind) {
            // A fresh APDU: capture it, buy time with a WTX request
            (CardState::WaitApduRequest, BlockKind::IBlock) => {
                em.reader_block_number = block_number(pcb);
                em.pending_request = Some(rx_block[1..].to_vec());
                em.state = CardState::WaitApduResponse;
                Some(wtx_request(em.reader_block_number))
            }
            // Keep stalling until the peer's answer arrives, matching the
            // reader's current block number
            (
                CardState::WaitApduResponse,
                BlockKind::SWtx | BlockKind::RNack | BlockKind::RAck,
            ) => Some(wtx_request(block_number(pcb))),
            // Answer buffered: deliver it on the WTX acknowledgment
            (CardState::GetApduResponse, BlockKind::SWtx) => {
                let apdu = em.pending_response.take().unwrap_or_default();
                em.state = CardState::WaitApduRequest;
                Some(i_block_response(em.reader_block_number, &apdu))
            }
            // R-blocks between the ack and delivery still get a stall
            (CardState::GetApduResponse, BlockKind::RNack | BlockKind::RAck) => {
                Some(wtx_request(block_number(pcb)))
            }
            // An I-block anywhere else would clobber the exchange in
            // flight; ignore it without touching the state
            (state, BlockKind::IBlock) => {
                warn!("unexpected I-block in state {state}, ignoring");
                None
            }
            (state, kind) => {
                debug!("ignoring {kind:?} block in state {state}");
                None
            }
        }
    }
}

/// Card-side worker. Owns its relay link and the emulation capability for
/// the lifetime of the thread.
pub struct CardWorker<E: CardEmulator> {
    link: RelayLink,
    emulator: E,
    shared: Arc<Mutex<Emulation>>,
    publisher: StatePublisher,
    running: Arc<AtomicBool>,
}

impl<E: CardEmulator + 'static> CardWorker<E> {
    /// Spawn the worker thread. The returned receiver carries state-change
    /// notifications for a UI collaborator.
    pub fn spawn(link: RelayLink, emulator: E) -> (WorkerHandle, Receiver<WorkerState>) {
        let (tx, rx) = mpsc::channel();
        let running = Arc::new(AtomicBool::new(true));
        let thread_running = Arc::clone(&running);

        let thread = thread::Builder::new()
            .name("relay-card".into())
            .spawn(move || {
                let worker = CardWorker {
                    link,
                    emulator,
                    shared: Arc::new(Mutex::new(Emulation::new())),
                    publisher: StatePublisher::new(tx),
                    running: thread_running,
                };
                worker.run();
            })
            .expect("failed to spawn card worker thread");

        (WorkerHandle::new(running, thread), rx)
    }

    fn run(mut self) {
        info!("card worker started");
        if let Err(e) = self.link.send_role_announcement(PacketType::Ping) {
            warn!("card worker could not announce itself: {e}");
            self.running.store(false, Ordering::SeqCst);
            return;
        }
        self.publish_current();

        while self.running.load(Ordering::SeqCst) {
            let state = self.current_state();
            let step = match state {
                CardState::WaitPong => self.step_wait_pong(),
                CardState::WaitDescriptor => self.step_wait_descriptor(),
                _ => self.step_interactive(),
            };
            match step {
                Ok(()) => {}
                Err(e) if e.is_fatal() => {
                    warn!("card worker stopping: {e}");
                    break;
                }
                Err(e) => debug!("card worker: {e}"),
            }
        }

        if let Err(e) = self.emulator.stop_emulation() {
            warn!("failed to stop emulation: {e}");
        }
        self.running.store(false, Ordering::SeqCst);
        info!("card worker stopped");
        // RelayLink drops here, tearing down the transport channel
    }

    fn current_state(&self) -> CardState {
        self.shared.lock().expect("emulation state poisoned").state
    }

    fn set_state(&mut self, state: CardState) {
        self.shared.lock().expect("emulation state poisoned").state = state;
        self.publisher.publish(WorkerState::Card(state));
    }

    fn publish_current(&mut self) {
        let state = self.current_state();
        self.publisher.publish(WorkerState::Card(state));
    }

    fn step_wait_pong(&mut self) -> Result<()> {
        if self.link.wait_for_pong(Role::Reader, Role::Card)? {
            info!("peer confirmed as reader side");
            self.set_state(CardState::WaitDescriptor);
        }
        Ok(())
    }

    fn step_wait_descriptor(&mut self) -> Result<()> {
        let packet = match self.link.wait_for_packet(PacketType::DeviceDescriptor)? {
            Some(p) => p,
            None => return Ok(()),
        };
        // A corrupt record is dropped whole; the state does not advance
        let identity = match descriptor::deserialize(&packet.payload) {
            Ok(identity) => identity,
            Err(e) => {
                warn!("corrupt descriptor dropped: {e}");
                return Ok(());
            }
        };
        info!("emulating card, uid {}", identity.uid.to_hex());
        let handler = RelayBlockHandler {
            shared: Arc::clone(&self.shared),
        };
        match self.emulator.start_emulation(&identity, Box::new(handler)) {
            Ok(()) => self.set_state(CardState::WaitApduRequest),
            Err(e) => warn!("could not start emulation: {e}"),
        }
        Ok(())
    }

    fn step_interactive(&mut self) -> Result<()> {
        // Forward an APDU the callback captured since the last pass
        let request = self
            .shared
            .lock()
            .expect("emulation state poisoned")
            .pending_request
            .take();
        if let Some(apdu) = request {
            self.link
                .send_with_payload(PacketType::ApduRequest, &apdu)?;
        }
        self.publish_current();

        if self.current_state() == CardState::WaitApduResponse {
            if let Some(packet) = self.link.wait_for_packet(PacketType::ApduResponse)? {
                let mut em = self.shared.lock().expect("emulation state poisoned");
                em.pending_response = Some(packet.payload);
                em.state = CardState::GetApduResponse;
                drop(em);
                self.publish_current();
            }
        } else {
            thread::sleep(ms(LINK_POLL_INTERVAL_MS));
        }
        Ok(())
    }
}
