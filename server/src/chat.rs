//! Chat is an external collaborator (spec.md §1): the engine never sees it,
//! and its persistence failures must never touch hand state (§7). This is
//! the narrow port the gateway forwards `table:chat:*` events through,
//! mirroring how `WalletLedger`/`SeatLedger` stand in for other
//! collaborators this crate doesn't own.

use std::collections::HashMap;
use std::sync::Mutex;

const HISTORY_LIMIT: usize = 50;

#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub user_id: String,
    pub text: String,
}

pub trait ChatSink: Send + Sync {
    /// Appends a message to `table_id`'s history. Failures here are a
    /// peripheral concern (spec.md §1) — callers log and swallow, never
    /// roll back a hand over it.
    fn post(&self, table_id: &str, message: ChatMessage);
    fn history(&self, table_id: &str) -> Vec<ChatMessage>;
}

/// A process-local stand-in for the durable chat log a real deployment
/// would back with its own store; keeps only the most recent
/// [`HISTORY_LIMIT`] messages per table.
#[derive(Default)]
pub struct InMemoryChatSink {
    tables: Mutex<HashMap<String, Vec<ChatMessage>>>,
}

impl InMemoryChatSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ChatSink for InMemoryChatSink {
    fn post(&self, table_id: &str, message: ChatMessage) {
        let mut tables = self.tables.lock().unwrap();
        let log = tables.entry(table_id.to_string()).or_default();
        log.push(message);
        let overflow = log.len().saturating_sub(HISTORY_LIMIT);
        if overflow > 0 {
            log.drain(0..overflow);
        }
    }

    fn history(&self, table_id: &str) -> Vec<ChatMessage> {
        self.tables.lock().unwrap().get(table_id).cloned().unwrap_or_default()
    }
}
