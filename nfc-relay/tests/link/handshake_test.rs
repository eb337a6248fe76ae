#[path = "../common/mod.rs"]
mod common;

use nfc_relay::test_support::mock_link_pair;
use nfc_relay::{PacketType, RelayLink, Role};

const MAX_EXCHANGES: usize = 40;

fn settle(link: &mut RelayLink, peer: Role, me: Role) -> usize {
    for attempt in 0..MAX_EXCHANGES {
        if link.wait_for_pong(peer, me).unwrap() {
            return attempt + 1;
        }
    }
    panic!("handshake not satisfied within {MAX_EXCHANGES} exchanges");
}

#[test]
fn reader_initiates_card_answers() {
    common::init_logs();
    let (mut reader, mut card) = mock_link_pair().unwrap();

    reader.send_role_announcement(PacketType::Ping).unwrap();
    settle(&mut card, Role::Reader, Role::Card);
    settle(&mut reader, Role::Card, Role::Reader);
}

#[test]
fn card_initiates_reader_answers() {
    common::init_logs();
    let (mut reader, mut card) = mock_link_pair().unwrap();

    card.send_role_announcement(PacketType::Ping).unwrap();
    settle(&mut reader, Role::Card, Role::Reader);
    settle(&mut card, Role::Reader, Role::Card);
}

#[test]
fn both_initiate_both_settle() {
    common::init_logs();
    let (mut reader, mut card) = mock_link_pair().unwrap();

    reader.send_role_announcement(PacketType::Ping).unwrap();
    card.send_role_announcement(PacketType::Ping).unwrap();
    settle(&mut reader, Role::Card, Role::Reader);
    settle(&mut card, Role::Reader, Role::Card);
}
