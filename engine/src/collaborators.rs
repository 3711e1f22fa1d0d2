//! Narrow ports onto the external collaborators named in spec.md §1: the
//! wallet ledger and the relational seat/user store. The core never talks
//! to a database or a payment rail directly — it calls these traits, and a
//! real deployment wires in whatever implements them (Postgres, an
//! in-process ledger for tests, etc).

use crate::errors::EngineError;

/// A seat occupied at a table, as the durable store sees it — independent
/// of any in-progress hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatedPlayer {
    pub seat_no: u32,
    pub user_id: String,
    pub stack: u64,
}

/// The durable, relational view of who is sitting where with how many
/// chips behind. Hand Lifecycle reads this to decide whether a hand can
/// start, and Betting Engine writes `persist_stacks` back after every apply
/// (spec.md §4.4's "Persistence").
pub trait SeatLedger: Send + Sync {
    fn seated_players(&self, table_id: &str) -> Result<Vec<SeatedPlayer>, EngineError>;
    fn mark_playing(&self, table_id: &str, seat_nos: &[u32]) -> Result<(), EngineError>;
    fn persist_stacks(&self, table_id: &str, stacks: &[(u32, u64)]) -> Result<(), EngineError>;
}

/// Atomic debit/credit against a user's wallet, plus an append-only ledger
/// entry (buy-in, cash-out). Only Hand Lifecycle (buy-in) and away-kick /
/// leave flows (cash-out) touch this; betting chip movement inside a hand
/// stays entirely within the runtime blob until the hand ends.
pub trait WalletLedger: Send + Sync {
    fn debit(&self, user_id: &str, amount: u64) -> Result<(), EngineError>;
    fn credit(&self, user_id: &str, amount: u64) -> Result<(), EngineError>;
}
