//! In-process stand-ins for the durable seat store and wallet ledger
//! (spec.md §1's external collaborators). A real deployment swaps these for
//! Postgres-backed implementations of the same `holdem_engine` traits; nothing
//! else in the gateway changes.

use holdem_engine::{EngineError, SeatedPlayer};
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Default)]
pub struct InMemorySeatLedger {
    tables: Mutex<HashMap<String, HashMap<u32, SeatedPlayer>>>,
}

impl InMemorySeatLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seats `user_id` at `seat_no`, debiting nothing itself — callers run
    /// the wallet debit first and only seat on success.
    pub fn sit(&self, table_id: &str, seat_no: u32, user_id: &str, stack: u64) -> Result<(), EngineError> {
        let mut tables = self.tables.lock().unwrap();
        let table = tables.entry(table_id.to_string()).or_default();
        if table.contains_key(&seat_no) {
            return Err(EngineError::SeatTaken);
        }
        table.insert(seat_no, SeatedPlayer { seat_no, user_id: user_id.to_string(), stack });
        Ok(())
    }

    pub fn remove_seat(&self, table_id: &str, seat_no: u32) {
        if let Some(table) = self.tables.lock().unwrap().get_mut(table_id) {
            table.remove(&seat_no);
        }
    }

    /// Adds `amount` to the seat's stack, capped at `max_stack` (spec.md §6
    /// buy-in max, enforced again here for rebuys). Returns the seat's user.
    pub fn rebuy(&self, table_id: &str, user_id: &str, amount: u64, max_stack: u64) -> Result<(), EngineError> {
        let mut tables = self.tables.lock().unwrap();
        let table = tables.entry(table_id.to_string()).or_default();
        let seat = table
            .values_mut()
            .find(|s| s.user_id == user_id)
            .ok_or(EngineError::NotSeated)?;
        if seat.stack + amount > max_stack {
            return Err(EngineError::RebuyExceedsMax);
        }
        seat.stack += amount;
        Ok(())
    }
}

impl holdem_engine::SeatLedger for InMemorySeatLedger {
    fn seated_players(&self, table_id: &str) -> Result<Vec<SeatedPlayer>, EngineError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.get(table_id).map(|t| t.values().cloned().collect()).unwrap_or_default())
    }

    fn mark_playing(&self, _table_id: &str, _seat_nos: &[u32]) -> Result<(), EngineError> {
        // Seating status beyond "occupied" (e.g. a PLAYING flag in a
        // relational table) belongs to the durable store this stands in
        // for; the in-memory map has no extra state to flip.
        Ok(())
    }

    fn persist_stacks(&self, table_id: &str, stacks: &[(u32, u64)]) -> Result<(), EngineError> {
        let mut tables = self.tables.lock().unwrap();
        let table = tables.entry(table_id.to_string()).or_default();
        for &(seat_no, stack) in stacks {
            if let Some(seat) = table.get_mut(&seat_no) {
                seat.stack = stack;
            }
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryWalletLedger {
    balances: Mutex<HashMap<String, u64>>,
}

impl InMemoryWalletLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn deposit(&self, user_id: &str, amount: u64) {
        *self.balances.lock().unwrap().entry(user_id.to_string()).or_insert(0) += amount;
    }

    pub fn balance(&self, user_id: &str) -> u64 {
        self.balances.lock().unwrap().get(user_id).copied().unwrap_or(0)
    }
}

impl holdem_engine::WalletLedger for InMemoryWalletLedger {
    fn debit(&self, user_id: &str, amount: u64) -> Result<(), EngineError> {
        let mut balances = self.balances.lock().unwrap();
        let balance = balances.entry(user_id.to_string()).or_insert(0);
        if *balance < amount {
            return Err(EngineError::InsufficientFunds);
        }
        *balance -= amount;
        Ok(())
    }

    fn credit(&self, user_id: &str, amount: u64) -> Result<(), EngineError> {
        *self.balances.lock().unwrap().entry(user_id.to_string()).or_insert(0) += amount;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use holdem_engine::{SeatLedger, WalletLedger};

    #[test]
    fn sitting_twice_in_the_same_seat_is_rejected() {
        let ledger = InMemorySeatLedger::new();
        ledger.sit("t1", 1, "alice", 1000).unwrap();
        let err = ledger.sit("t1", 1, "bob", 1000).unwrap_err();
        assert_eq!(err, EngineError::SeatTaken);
    }

    #[test]
    fn rebuy_is_rejected_past_the_table_maximum() {
        let ledger = InMemorySeatLedger::new();
        ledger.sit("t1", 1, "alice", 900).unwrap();
        let err = ledger.rebuy("t1", "alice", 200, 1000).unwrap_err();
        assert_eq!(err, EngineError::RebuyExceedsMax);
    }

    #[test]
    fn wallet_debit_fails_on_insufficient_funds() {
        let wallet = InMemoryWalletLedger::new();
        wallet.deposit("alice", 50);
        let err = wallet.debit("alice", 100).unwrap_err();
        assert_eq!(err, EngineError::InsufficientFunds);
        assert_eq!(wallet.balance("alice"), 50);
    }

    #[test]
    fn seat_ledger_persists_stacks_written_by_the_betting_engine() {
        let ledger = InMemorySeatLedger::new();
        ledger.sit("t1", 1, "alice", 1000).unwrap();
        ledger.persist_stacks("t1", &[(1, 850)]).unwrap();
        let seated = ledger.seated_players("t1").unwrap();
        assert_eq!(seated[0].stack, 850);
    }
}
