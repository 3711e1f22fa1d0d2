//! Actor-level integration tests: real `table_actor` instances wired to
//! in-memory ledgers, driven over their mailbox the way the gateway does,
//! observed through the same `ServerEvent` JSON a websocket client would see.

use axum::extract::ws::Message as WsMessage;
use holdem_engine::Config;
use holdem_server::broadcast::Hub;
use holdem_server::chat::InMemoryChatSink;
use holdem_server::gateway::{ActionKind, ClientEvent, ServerEvent, TableEvent};
use holdem_server::ledger::{InMemorySeatLedger, InMemoryWalletLedger};
use holdem_server::table_actor::{self, ActorMsg, TableActorHandle};
use holdem_engine::InMemoryStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

fn spawn_table(table_id: &str) -> (TableActorHandle, Arc<InMemoryWalletLedger>) {
    let store = Arc::new(InMemoryStore::new());
    let seat_ledger = Arc::new(InMemorySeatLedger::new());
    let wallet = Arc::new(InMemoryWalletLedger::new());
    let chat = Arc::new(InMemoryChatSink::new());
    let hub = Arc::new(Hub::new());
    let handle = table_actor::spawn(table_id.to_string(), 6, Config::default(), store, seat_ledger, wallet.clone(), chat, hub);
    (handle, wallet)
}

fn subscribe(handle: &TableActorHandle, user_id: &str) -> mpsc::UnboundedReceiver<WsMessage> {
    let (tx, rx) = mpsc::unbounded_channel();
    handle.tx.send(ActorMsg::Subscribe { user_id: user_id.to_string(), tx }).unwrap();
    rx
}

fn sit(handle: &TableActorHandle, table_id: &str, user_id: &str, seat_no: u32, buy_in_amount: u64) {
    handle
        .tx
        .send(ActorMsg::Client {
            user_id: user_id.to_string(),
            event: ClientEvent::TableSit { table_id: table_id.to_string(), seat_no, buy_in_amount },
        })
        .unwrap();
}

async fn next_event(rx: &mut mpsc::UnboundedReceiver<WsMessage>) -> ServerEvent {
    let msg = rx.recv().await.expect("actor dropped the subscriber channel");
    let WsMessage::Text(text) = msg else { panic!("expected a text frame") };
    serde_json::from_str(&text).expect("server event deserializes")
}

async fn wait_for(rx: &mut mpsc::UnboundedReceiver<WsMessage>, pred: impl Fn(&ServerEvent) -> bool) -> ServerEvent {
    tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            let event = next_event(rx).await;
            if pred(&event) {
                return event;
            }
        }
    })
    .await
    .expect("expected event did not arrive in time")
}

#[tokio::test]
async fn two_players_sitting_starts_a_hand_and_deals_private_cards() {
    let (handle, wallet) = spawn_table("t1");
    wallet.deposit("alice", 10_000);
    wallet.deposit("bob", 10_000);
    let mut rx_alice = subscribe(&handle, "alice");
    let mut rx_bob = subscribe(&handle, "bob");

    sit(&handle, "t1", "alice", 1, 1000);
    sit(&handle, "t1", "bob", 2, 1000);

    let started = wait_for(&mut rx_alice, |e| {
        matches!(e, ServerEvent::TableEventMsg { event: TableEvent::HandStarted { .. }, .. })
    })
    .await;
    assert!(matches!(started, ServerEvent::TableEventMsg { event: TableEvent::HandStarted { .. }, .. }));

    let private = wait_for(&mut rx_bob, |e| matches!(e, ServerEvent::PrivateCards { .. })).await;
    match private {
        ServerEvent::PrivateCards { cards, .. } => assert_ne!(cards.0, cards.1),
        other => panic!("expected private cards, got {other:?}"),
    }
}

#[tokio::test]
async fn a_buy_in_below_the_table_minimum_is_rejected() {
    let (handle, wallet) = spawn_table("t1");
    wallet.deposit("alice", 10_000);
    let mut rx_alice = subscribe(&handle, "alice");

    sit(&handle, "t1", "alice", 1, 1); // far below buy_in_min (20x big blind)

    let err = wait_for(&mut rx_alice, |e| matches!(e, ServerEvent::TableEventMsg { event: TableEvent::Error { .. }, .. })).await;
    match err {
        ServerEvent::TableEventMsg { event: TableEvent::Error { message }, .. } => {
            assert!(message.to_lowercase().contains("buy"));
        }
        other => panic!("expected a buy-in error, got {other:?}"),
    }
}

#[tokio::test]
async fn a_fold_in_a_heads_up_hand_ends_it_without_a_showdown() {
    let (handle, wallet) = spawn_table("t1");
    wallet.deposit("alice", 10_000);
    wallet.deposit("bob", 10_000);
    let mut rx_alice = subscribe(&handle, "alice");

    // seat 1 (alice) is always the first hand's dealer: no prior dealer
    // pointer means the lowest occupied seat opens the button.
    sit(&handle, "t1", "alice", 1, 1000);
    sit(&handle, "t1", "bob", 2, 1000);
    wait_for(&mut rx_alice, |e| matches!(e, ServerEvent::TableEventMsg { event: TableEvent::HandStarted { .. }, .. })).await;

    // heads-up: the dealer (alice, seat 1) is the small blind and acts first preflop.
    handle
        .tx
        .send(ActorMsg::Client {
            user_id: "alice".to_string(),
            event: ClientEvent::TableAction { table_id: "t1".to_string(), action: ActionKind::Fold, amount: None },
        })
        .unwrap();

    let ended = wait_for(&mut rx_alice, |e| matches!(e, ServerEvent::TableEventMsg { event: TableEvent::HandEnded { .. }, .. })).await;
    assert!(matches!(ended, ServerEvent::TableEventMsg { event: TableEvent::HandEnded { .. }, .. }));
}

#[tokio::test]
async fn acting_out_of_turn_is_rejected_with_an_error_to_that_socket() {
    let (handle, wallet) = spawn_table("t1");
    wallet.deposit("alice", 10_000);
    wallet.deposit("bob", 10_000);
    let mut rx_bob = subscribe(&handle, "bob");

    sit(&handle, "t1", "alice", 1, 1000);
    sit(&handle, "t1", "bob", 2, 1000);
    wait_for(&mut rx_bob, |e| matches!(e, ServerEvent::TableEventMsg { event: TableEvent::HandStarted { .. }, .. })).await;

    // bob (the big blind) tries to act before alice, the first-to-act dealer.
    handle
        .tx
        .send(ActorMsg::Client {
            user_id: "bob".to_string(),
            event: ClientEvent::TableAction { table_id: "t1".to_string(), action: ActionKind::Check, amount: None },
        })
        .unwrap();

    let err = wait_for(&mut rx_bob, |e| matches!(e, ServerEvent::TableEventMsg { event: TableEvent::Error { .. }, .. })).await;
    match err {
        ServerEvent::TableEventMsg { event: TableEvent::Error { message }, .. } => {
            assert!(message.to_lowercase().contains("turn"));
        }
        other => panic!("expected a not-your-turn error, got {other:?}"),
    }
}

#[tokio::test]
async fn chat_messages_pass_through_without_touching_hand_state() {
    let (handle, wallet) = spawn_table("t1");
    wallet.deposit("alice", 10_000);
    let mut rx_alice = subscribe(&handle, "alice");

    handle
        .tx
        .send(ActorMsg::Client {
            user_id: "alice".to_string(),
            event: ClientEvent::ChatMessage { table_id: "t1".to_string(), text: "gl hf".to_string() },
        })
        .unwrap();
    let chat = wait_for(&mut rx_alice, |e| matches!(e, ServerEvent::TableEventMsg { event: TableEvent::Chat { .. }, .. })).await;
    match chat {
        ServerEvent::TableEventMsg { event: TableEvent::Chat { user_id, text }, .. } => {
            assert_eq!(user_id, "alice");
            assert_eq!(text, "gl hf");
        }
        other => panic!("expected a chat event, got {other:?}"),
    }

    handle
        .tx
        .send(ActorMsg::Client {
            user_id: "alice".to_string(),
            event: ClientEvent::ChatHistory { table_id: "t1".to_string() },
        })
        .unwrap();
    let history = wait_for(&mut rx_alice, |e| matches!(e, ServerEvent::TableEventMsg { event: TableEvent::ChatHistory { .. }, .. })).await;
    match history {
        ServerEvent::TableEventMsg { event: TableEvent::ChatHistory { messages }, .. } => {
            assert_eq!(messages.len(), 1);
            assert_eq!(messages[0].text, "gl hf");
        }
        other => panic!("expected chat history, got {other:?}"),
    }
}
