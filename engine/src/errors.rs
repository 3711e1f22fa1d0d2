use thiserror::Error;

/// Every named failure kind from spec.md §7, grouped by layer in the doc
/// comments but flattened into one enum the way the teacher's `GameError`
/// is: a `thiserror` enum surfaced verbatim to the gateway as an `ERROR`
/// event, never broadcast, never mutating state.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineError {
    // Validation
    #[error("invalid amount")]
    InvalidAmount,
    #[error("invalid raise")]
    InvalidRaise,
    #[error("raise too small")]
    RaiseTooSmall,
    #[error("cannot check, a bet is outstanding")]
    CannotCheck,
    #[error("buy-in below table minimum")]
    BuyinTooSmall,
    #[error("buy-in above table maximum")]
    BuyinTooLarge,
    #[error("rebuy would exceed the table maximum")]
    RebuyExceedsMax,

    // State
    #[error("it is not your turn")]
    NotYourTurn,
    #[error("you have already folded")]
    AlreadyFolded,
    #[error("the board is being dealt")]
    DealingBoard,
    #[error("no hand is running")]
    NoHandRunning,
    #[error("a hand is already in progress")]
    HandInProgress,
    #[error("insufficient stack")]
    InsufficientStack,

    // Resource
    #[error("seat not found")]
    SeatNotFound,
    #[error("seat already taken")]
    SeatTaken,
    #[error("you are not seated at this table")]
    NotSeated,
    #[error("wallet not found")]
    WalletNotFound,
    #[error("insufficient funds")]
    InsufficientFunds,
    #[error("table not found")]
    TableNotFound,
}
