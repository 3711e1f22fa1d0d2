pub mod betting;
pub mod cards;
pub mod clock;
pub mod collaborators;
pub mod config;
pub mod errors;
pub mod eval;
pub mod lifecycle;
pub mod pacing;
pub mod runtime;
pub mod showdown;
pub mod store;

pub use betting::{apply, Action, ApplyOutcome};
pub use cards::{Card, Deck, Rank, Suit};
pub use collaborators::{SeatLedger, SeatedPlayer, WalletLedger};
pub use config::Config;
pub use errors::EngineError;
pub use lifecycle::{start_hand, StartedHand};
pub use runtime::{Round, SeatRuntime, TableRuntime};
pub use showdown::{resolve as resolve_showdown, Reveal, ShowdownResult, Winner};
pub use store::{InMemoryStore, PublicStateCache, RuntimeStore, StoreError};
