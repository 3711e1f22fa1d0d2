//! The narrow broadcast port named in spec.md §9: one function to emit to a
//! table room, one to emit to a user room. The engine never imports this;
//! only the gateway and the table actor do, keeping the cyclic
//! gateway/timer coupling the source had expressed as a plain interface
//! instead.

use axum::extract::ws::Message as WsMessage;
use std::collections::HashMap;
use std::sync::Mutex;
use tokio::sync::mpsc;

pub type ClientTx = mpsc::UnboundedSender<WsMessage>;

pub trait BroadcastPort: Send + Sync {
    fn emit_table(&self, table_id: &str, json: String);
    fn emit_user(&self, user_id: &str, json: String);
}

/// Subscriber registry backing [`BroadcastPort`], one `Vec<ClientTx>` per
/// room the way the teacher's `TableActor::subscribers` is, generalized to
/// both table rooms and per-user rooms.
#[derive(Default)]
pub struct Hub {
    tables: Mutex<HashMap<String, Vec<ClientTx>>>,
    users: Mutex<HashMap<String, Vec<ClientTx>>>,
}

impl Hub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn join_table(&self, table_id: &str, tx: ClientTx) {
        self.tables.lock().unwrap().entry(table_id.to_string()).or_default().push(tx);
    }

    pub fn join_user(&self, user_id: &str, tx: ClientTx) {
        self.users.lock().unwrap().entry(user_id.to_string()).or_default().push(tx);
    }
}

impl BroadcastPort for Hub {
    fn emit_table(&self, table_id: &str, json: String) {
        let mut rooms = self.tables.lock().unwrap();
        if let Some(subs) = rooms.get_mut(table_id) {
            subs.retain(|tx| tx.send(WsMessage::Text(json.clone())).is_ok());
        }
    }

    fn emit_user(&self, user_id: &str, json: String) {
        let mut rooms = self.users.lock().unwrap();
        if let Some(subs) = rooms.get_mut(user_id) {
            subs.retain(|tx| tx.send(WsMessage::Text(json.clone())).is_ok());
        }
    }
}
