//! Wire types for the Gateway Adapter (spec.md §4.9 / §6): client events
//! in, server events out. Tagged the way the teacher's `ClientAction` /
//! `ServerEvent` enums are, with `#[serde(tag = "type")]` so the JSON is a
//! sum of named shapes rather than an untyped blob.

use holdem_engine::{Card, Round};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientEvent {
    #[serde(rename = "table:join")]
    TableJoin { table_id: String },
    #[serde(rename = "table:sit")]
    TableSit { table_id: String, seat_no: u32, buy_in_amount: u64 },
    #[serde(rename = "table:leave")]
    TableLeave { table_id: String },
    #[serde(rename = "table:rebuy")]
    TableRebuy { table_id: String, amount: u64 },
    #[serde(rename = "table:sit_out")]
    TableSitOut { table_id: String },
    #[serde(rename = "table:sit_in")]
    TableSitIn { table_id: String },
    #[serde(rename = "table:action")]
    TableAction { table_id: String, action: ActionKind, amount: Option<u64> },
    #[serde(rename = "table:chat:message")]
    ChatMessage { table_id: String, text: String },
    #[serde(rename = "table:chat:history")]
    ChatHistory { table_id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ActionKind {
    Fold,
    Check,
    Call,
    Raise,
}

impl From<ActionKind> for holdem_engine::Action {
    fn from(k: ActionKind) -> Self {
        match k {
            ActionKind::Fold => holdem_engine::Action::Fold,
            ActionKind::Check => holdem_engine::Action::Check,
            ActionKind::Call => holdem_engine::Action::Call,
            ActionKind::Raise => holdem_engine::Action::Raise,
        }
    }
}

/// Public per-seat view: never a hole card, per spec.md §6's snapshot shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatView {
    pub seat_no: u32,
    pub user_id: Option<String>,
    pub stack: u64,
    pub bet: u64,
    pub has_folded: bool,
    pub is_all_in: bool,
    pub is_dealer: bool,
    pub is_turn: bool,
    pub is_sitting_out: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameView {
    pub hand_id: String,
    pub round: Round,
    pub board: Vec<Card>,
    pub pot_total: u64,
    pub current_bet: u64,
    pub min_raise: u64,
    pub turn_ends_at: Option<i64>,
    pub is_dealing_board: bool,
    pub auto_runout: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSnapshot {
    pub table_id: String,
    pub seats: Vec<SeatView>,
    pub game: Option<GameView>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TableEvent {
    StateSnapshot(TableSnapshot),
    HandStarted { hand_id: String },
    ShowdownReveal {
        hand_id: String,
        reveal: Vec<RevealView>,
        winners: Vec<WinnerView>,
    },
    HandEnded { hand_id: String },
    Error { message: String },
    LeavePending { table_id: String },
    Chat { user_id: String, text: String },
    ChatHistory { messages: Vec<ChatMessageView> },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessageView {
    pub user_id: String,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevealView {
    pub seat_no: u32,
    pub user_id: String,
    pub hole: (Card, Card),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WinnerView {
    pub seat_no: u32,
    pub user_id: String,
    pub payout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerEvent {
    #[serde(rename = "table:state")]
    TableState { table_id: String, snapshot: TableSnapshot },
    #[serde(rename = "table:event")]
    TableEventMsg { table_id: String, event: TableEvent },
    #[serde(rename = "table:private_cards")]
    PrivateCards { table_id: String, hand_id: String, cards: (Card, Card) },
}
