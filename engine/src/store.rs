//! The Runtime Store (spec.md §4.2). The shared KV technology itself is an
//! external collaborator (spec.md §1); this module owns the schema — key
//! layout, TTLs, the hand-start lock — behind a trait, with an in-memory
//! implementation for single-node deployments and tests. A Redis-backed
//! implementation of the same trait is a drop-in replacement.

use crate::cards::Card;
use crate::runtime::TableRuntime;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    #[error("backing store unavailable")]
    Unavailable,
}

const RUNTIME_TTL: Duration = Duration::from_secs(60 * 60);
const HAND_START_LOCK_TTL: Duration = Duration::from_secs(5);
const PUBLIC_STATE_TTL: Duration = Duration::from_secs(5);

pub trait RuntimeStore: Send + Sync {
    fn get_runtime(&self, table_id: &str) -> Result<Option<TableRuntime>, StoreError>;
    fn put_runtime(&self, runtime: &TableRuntime) -> Result<(), StoreError>;
    fn delete_runtime(&self, table_id: &str) -> Result<(), StoreError>;
    /// All `tableId`s with a live runtime blob, for boot-time recovery (spec.md §4.8).
    fn list_runtime_table_ids(&self) -> Result<Vec<String>, StoreError>;

    fn put_hole_cards(
        &self,
        table_id: &str,
        hand_id: &str,
        user_id: &str,
        cards: (Card, Card),
    ) -> Result<(), StoreError>;
    fn get_hole_cards(
        &self,
        table_id: &str,
        hand_id: &str,
        user_id: &str,
    ) -> Result<Option<(Card, Card)>, StoreError>;

    fn get_dealer(&self, table_id: &str) -> Result<Option<u32>, StoreError>;
    fn put_dealer(&self, table_id: &str, seat_no: u32) -> Result<(), StoreError>;

    /// Set-if-absent with a short expiry; held only for the duration of hand
    /// construction. Returns `true` if the lock was acquired.
    fn try_acquire_hand_start_lock(&self, table_id: &str) -> Result<bool, StoreError>;
    fn release_hand_start_lock(&self, table_id: &str) -> Result<(), StoreError>;
}

struct Entry<T> {
    value: T,
    expires_at: Instant,
}

impl<T> Entry<T> {
    fn fresh(value: T, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: Instant::now() + ttl,
        }
    }

    fn is_live(&self) -> bool {
        Instant::now() < self.expires_at
    }
}

#[derive(Default)]
struct Tables {
    runtimes: HashMap<String, Entry<TableRuntime>>,
    hole_cards: HashMap<(String, String, String), Entry<(Card, Card)>>,
    dealers: HashMap<String, u32>,
    hand_start_locks: HashMap<String, Instant>,
}

/// A single-process, in-memory `RuntimeStore`. Good enough for a
/// single-node deployment or tests; a clustered deployment swaps this for a
/// Redis-backed implementation of the same trait.
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            tables: Mutex::new(Tables::default()),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RuntimeStore for InMemoryStore {
    fn get_runtime(&self, table_id: &str) -> Result<Option<TableRuntime>, StoreError> {
        let t = self.tables.lock().map_err(|_| StoreError::Unavailable)?;
        Ok(t.runtimes
            .get(table_id)
            .filter(|e| e.is_live())
            .map(|e| e.value.clone()))
    }

    fn put_runtime(&self, runtime: &TableRuntime) -> Result<(), StoreError> {
        let mut t = self.tables.lock().map_err(|_| StoreError::Unavailable)?;
        t.runtimes.insert(
            runtime.table_id.clone(),
            Entry::fresh(runtime.clone(), RUNTIME_TTL),
        );
        Ok(())
    }

    fn delete_runtime(&self, table_id: &str) -> Result<(), StoreError> {
        let mut t = self.tables.lock().map_err(|_| StoreError::Unavailable)?;
        t.runtimes.remove(table_id);
        Ok(())
    }

    fn list_runtime_table_ids(&self) -> Result<Vec<String>, StoreError> {
        let t = self.tables.lock().map_err(|_| StoreError::Unavailable)?;
        Ok(t.runtimes
            .iter()
            .filter(|(_, e)| e.is_live())
            .map(|(k, _)| k.clone())
            .collect())
    }

    fn put_hole_cards(
        &self,
        table_id: &str,
        hand_id: &str,
        user_id: &str,
        cards: (Card, Card),
    ) -> Result<(), StoreError> {
        let mut t = self.tables.lock().map_err(|_| StoreError::Unavailable)?;
        t.hole_cards.insert(
            (table_id.to_string(), hand_id.to_string(), user_id.to_string()),
            Entry::fresh(cards, RUNTIME_TTL),
        );
        Ok(())
    }

    fn get_hole_cards(
        &self,
        table_id: &str,
        hand_id: &str,
        user_id: &str,
    ) -> Result<Option<(Card, Card)>, StoreError> {
        let t = self.tables.lock().map_err(|_| StoreError::Unavailable)?;
        let key = (table_id.to_string(), hand_id.to_string(), user_id.to_string());
        Ok(t.hole_cards.get(&key).filter(|e| e.is_live()).map(|e| e.value))
    }

    fn get_dealer(&self, table_id: &str) -> Result<Option<u32>, StoreError> {
        let t = self.tables.lock().map_err(|_| StoreError::Unavailable)?;
        Ok(t.dealers.get(table_id).copied())
    }

    fn put_dealer(&self, table_id: &str, seat_no: u32) -> Result<(), StoreError> {
        let mut t = self.tables.lock().map_err(|_| StoreError::Unavailable)?;
        t.dealers.insert(table_id.to_string(), seat_no);
        Ok(())
    }

    fn try_acquire_hand_start_lock(&self, table_id: &str) -> Result<bool, StoreError> {
        let mut t = self.tables.lock().map_err(|_| StoreError::Unavailable)?;
        let now = Instant::now();
        if let Some(expires_at) = t.hand_start_locks.get(table_id) {
            if *expires_at > now {
                return Ok(false);
            }
        }
        t.hand_start_locks
            .insert(table_id.to_string(), now + HAND_START_LOCK_TTL);
        Ok(true)
    }

    fn release_hand_start_lock(&self, table_id: &str) -> Result<(), StoreError> {
        let mut t = self.tables.lock().map_err(|_| StoreError::Unavailable)?;
        t.hand_start_locks.remove(table_id);
        Ok(())
    }
}

// `public_state:{tableId}` (spec.md §6) is a short-TTL read cache the gateway
// may populate for cheap polling paths; it carries no authority and is never
// consulted by the engine itself.
pub struct PublicStateCache {
    entries: Mutex<HashMap<String, Entry<String>>>,
}

impl PublicStateCache {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn put(&self, table_id: &str, json: String) {
        if let Ok(mut e) = self.entries.lock() {
            e.insert(table_id.to_string(), Entry::fresh(json, PUBLIC_STATE_TTL));
        }
    }

    pub fn get(&self, table_id: &str) -> Option<String> {
        self.entries
            .lock()
            .ok()?
            .get(table_id)
            .filter(|e| e.is_live())
            .map(|e| e.value.clone())
    }
}

impl Default for PublicStateCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::parse_card;

    #[test]
    fn hand_start_lock_is_mutually_exclusive_until_released() {
        let store = InMemoryStore::new();
        assert!(store.try_acquire_hand_start_lock("t1").unwrap());
        assert!(!store.try_acquire_hand_start_lock("t1").unwrap());
        store.release_hand_start_lock("t1").unwrap();
        assert!(store.try_acquire_hand_start_lock("t1").unwrap());
    }

    #[test]
    fn hole_cards_are_isolated_by_table_hand_and_user() {
        let store = InMemoryStore::new();
        let cards = (parse_card("As"), parse_card("Kd"));
        store.put_hole_cards("t1", "h1", "u1", cards).unwrap();
        assert_eq!(store.get_hole_cards("t1", "h1", "u1").unwrap(), Some(cards));
        assert_eq!(store.get_hole_cards("t1", "h1", "u2").unwrap(), None);
        assert_eq!(store.get_hole_cards("t1", "h2", "u1").unwrap(), None);
    }

    #[test]
    fn serializing_and_deserializing_a_runtime_round_trips() {
        let store = InMemoryStore::new();
        let runtime = crate::lifecycle::tests_support::sample_runtime();
        store.put_runtime(&runtime).unwrap();
        let back = store.get_runtime(&runtime.table_id).unwrap().unwrap();
        assert_eq!(back.hand_id, runtime.hand_id);
        assert_eq!(back.pot.total, runtime.pot.total);
        assert_eq!(back.players.len(), runtime.players.len());
    }
}
