// nfc-relay/src/link.rs

//! Role-handshake layer over the transport channel.
//!
//! Offers the workers three primitives: send a packet, wait for the ping/
//! pong role announcement, and wait for one packet of a given type. The
//! wait operations pop at most one packet per call and discard a mismatch
//! instead of requeueing it; the protocol relies on strict in-order,
//! one-packet-per-step peer behavior, so a stray retransmission can knock
//! the two sides out of lock-step; the workers keep at most one exchange
//! in flight to stay inside that contract.

use std::time::Instant;

use log::debug;

use crate::protocol::{Packet, PacketType};
use crate::transport::TransportChannel;
use crate::types::Role;
use crate::utils::timeout::{ms, LINK_POLL_INTERVAL_MS, WAIT_ATTEMPT_TIMEOUT_MS};
use crate::{Error, Result};

/// Relay link: a transport channel plus the local role.
pub struct RelayLink {
    channel: TransportChannel,
    role: Role,
}

impl RelayLink {
    /// Layer a link over an open channel.
    pub fn new(channel: TransportChannel, role: Role) -> Self {
        Self { channel, role }
    }

    /// The role this unit announced.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Send a Ping or Pong carrying the local role as its 1-byte payload.
    pub fn send_role_announcement(&mut self, packet_type: PacketType) -> Result<()> {
        if packet_type != PacketType::Ping && packet_type != PacketType::Pong {
            return Err(Error::ProtocolViolation(format!(
                "{:?} is not a role announcement",
                packet_type
            )));
        }
        self.send_with_payload(packet_type, &[self.role.to_byte()])
    }

    /// Pop one packet (waiting up to the attempt timeout for it to arrive)
    /// and evaluate it against the handshake:
    /// a Ping carrying `peer_role` is answered with a Pong carrying
    /// `self_role` and satisfies the handshake; a Pong carrying
    /// `peer_role` satisfies it directly. Anything else is discarded.
    pub fn wait_for_pong(&mut self, peer_role: Role, self_role: Role) -> Result<bool> {
        let packet = match self.pop_one()? {
            Some(p) => p,
            None => return Ok(false),
        };

        let announced = packet.payload.first().copied().and_then(Role::from_byte);
        match (packet.packet_type, announced) {
            (PacketType::Ping, Some(role)) if role == peer_role => {
                self.send_with_payload(PacketType::Pong, &[self_role.to_byte()])?;
                Ok(true)
            }
            (PacketType::Pong, Some(role)) if role == peer_role => Ok(true),
            _ => {
                debug!(
                    "discarding {:?} during handshake (announced role: {:?})",
                    packet.packet_type, announced
                );
                Ok(false)
            }
        }
    }

    /// Pop one packet (waiting up to the attempt timeout); return it when
    /// its type matches, otherwise discard it and return `None`. Callers
    /// retry in a loop until the target arrives or the worker is stopped.
    pub fn wait_for_packet(&mut self, target: PacketType) -> Result<Option<Packet>> {
        let packet = match self.pop_one()? {
            Some(p) => p,
            None => return Ok(None),
        };
        if packet.packet_type == target {
            Ok(Some(packet))
        } else {
            debug!(
                "discarding {:?} while waiting for {:?}",
                packet.packet_type, target
            );
            Ok(None)
        }
    }

    /// Send a packet with an empty payload.
    pub fn send_no_payload(&mut self, packet_type: PacketType) -> Result<()> {
        self.channel.send(&Packet::new(packet_type, Vec::new()))
    }

    /// Send a packet carrying `payload`.
    pub fn send_with_payload(&mut self, packet_type: PacketType, payload: &[u8]) -> Result<()> {
        self.channel
            .send(&Packet::new(packet_type, payload.to_vec()))
    }

    // Busy-poll the inbound queue with a bounded per-attempt timeout. Never
    // blocks the channel's own receive thread.
    fn pop_one(&mut self) -> Result<Option<Packet>> {
        let deadline = Instant::now() + ms(WAIT_ATTEMPT_TIMEOUT_MS);
        loop {
            if let Some(packet) = self.channel.try_take_packet()? {
                return Ok(Some(packet));
            }
            if Instant::now() >= deadline {
                return Ok(None);
            }
            std::thread::sleep(ms(LINK_POLL_INTERVAL_MS));
        }
    }
}
