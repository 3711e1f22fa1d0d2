//! Per-table tunables (spec.md §6's Configuration table). Constructed the
//! way the teacher's `RoomConfig` is: a plain struct with a `Default` impl,
//! optionally overridden per table at creation time.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub turn_time_ms: u64,
    pub away_timeouts_in_row: u32,
    pub street_pre_delay_ms: u64,
    pub board_card_interval_ms: u64,
    pub street_post_delay_ms: u64,
    pub win_by_fold_hold_ms: u64,
    pub showdown_hold_ms: u64,
    pub small_blind: u64,
    pub big_blind: u64,
}

impl Config {
    pub fn buy_in_min(&self) -> u64 {
        20 * self.big_blind
    }

    pub fn buy_in_max(&self) -> u64 {
        100 * self.big_blind
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            turn_time_ms: 15_000,
            away_timeouts_in_row: 2,
            street_pre_delay_ms: 250,
            board_card_interval_ms: 220,
            street_post_delay_ms: 350,
            win_by_fold_hold_ms: 1_500,
            showdown_hold_ms: 2_500,
            small_blind: 5,
            big_blind: 10,
        }
    }
}
