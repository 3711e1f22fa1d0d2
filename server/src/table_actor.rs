//! The per-table actor: a single-writer mailbox processed by one worker
//! task, generalizing the teacher's `TableActor` to drive `holdem_engine`
//! instead of duplicating betting logic inline. One logical timer lives per
//! table (spec.md §4.6/§9), armed with `tokio::time::sleep` and checked for
//! supersession by its `(handId, seat, turnEndsAt)` key on fire, instead of
//! a fixed-interval poll.

use crate::broadcast::{BroadcastPort, Hub};
use crate::chat::{ChatMessage, ChatSink};
use crate::gateway::{
    ActionKind, ChatMessageView, ClientEvent, GameView, RevealView, SeatView, ServerEvent, TableEvent,
    TableSnapshot, WinnerView,
};
use crate::ledger::{InMemorySeatLedger, InMemoryWalletLedger};
use holdem_engine::{
    betting, clock, lifecycle, pacing, showdown, Card, Config, EngineError, InMemoryStore, Round,
    RuntimeStore, SeatLedger, TableRuntime, WalletLedger,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::mpsc;
use tracing::{info, warn};

pub enum ActorMsg {
    Client { user_id: String, event: ClientEvent },
    Subscribe { user_id: String, tx: crate::broadcast::ClientTx },
    TimerFired(clock::TimerKey),
    PostHandHoldElapsed,
}

#[derive(Clone)]
pub struct TableActorHandle {
    pub tx: mpsc::UnboundedSender<ActorMsg>,
}

fn now_ms() -> i64 {
    SystemTime::now().duration_since(UNIX_EPOCH).expect("system clock before epoch").as_millis() as i64
}

/// Everything a table's async work needs, cheap to clone and share between
/// the actor's mailbox loop and the detached reveal/timer tasks it spawns.
#[derive(Clone)]
struct Ctx {
    table_id: String,
    seat_count: u32,
    config: Config,
    store: Arc<InMemoryStore>,
    seat_ledger: Arc<InMemorySeatLedger>,
    wallet: Arc<InMemoryWalletLedger>,
    chat: Arc<dyn ChatSink>,
    hub: Arc<Hub>,
    self_tx: mpsc::UnboundedSender<ActorMsg>,
}

#[allow(clippy::too_many_arguments)]
pub fn spawn(
    table_id: String,
    seat_count: u32,
    config: Config,
    store: Arc<InMemoryStore>,
    seat_ledger: Arc<InMemorySeatLedger>,
    wallet: Arc<InMemoryWalletLedger>,
    chat: Arc<dyn ChatSink>,
    hub: Arc<Hub>,
) -> TableActorHandle {
    let (tx, rx) = mpsc::unbounded_channel();
    let ctx = Ctx { table_id, seat_count, config, store, seat_ledger, wallet, chat, hub, self_tx: tx.clone() };
    let mut actor = TableActor { ctx, rx, strikes: HashMap::new(), pending_away_kicks: Vec::new() };
    tokio::spawn(async move { actor.run().await });
    TableActorHandle { tx }
}

/// Rebuilds an actor around an already-persisted runtime, for boot-time
/// recovery (spec.md §4.8). The timer is rearmed from the stored
/// `turnEndsAt` without restarting the hand.
#[allow(clippy::too_many_arguments)]
pub fn spawn_recovered(
    table_id: String,
    seat_count: u32,
    config: Config,
    store: Arc<InMemoryStore>,
    seat_ledger: Arc<InMemorySeatLedger>,
    wallet: Arc<InMemoryWalletLedger>,
    chat: Arc<dyn ChatSink>,
    hub: Arc<Hub>,
) -> TableActorHandle {
    let handle = spawn(table_id.clone(), seat_count, config, store.clone(), seat_ledger, wallet, chat, hub.clone());
    if let Ok(Some(runtime)) = store.get_runtime(&table_id) {
        broadcast_snapshot(&hub, &table_id, Some(&runtime), &[]);
        if let Some(key) = clock::TimerKey::from_runtime(&runtime) {
            arm_timer(handle.tx.clone(), key, clock::fire_delay_ms(&runtime, now_ms()));
        }
    }
    handle
}

fn arm_timer(tx: mpsc::UnboundedSender<ActorMsg>, key: clock::TimerKey, delay_ms: u64) {
    tokio::spawn(async move {
        tokio::time::sleep(std::time::Duration::from_millis(delay_ms)).await;
        let _ = tx.send(ActorMsg::TimerFired(key));
    });
}

fn emit_table_event(hub: &Hub, table_id: &str, event: TableEvent) {
    hub.emit_table(
        table_id,
        serde_json::to_string(&ServerEvent::TableEventMsg { table_id: table_id.to_string(), event })
            .unwrap_or_default(),
    );
}

fn build_snapshot(table_id: &str, runtime: Option<&TableRuntime>, empty_seats: &[u32]) -> TableSnapshot {
    let mut seats: Vec<SeatView> = Vec::new();
    if let Some(rt) = runtime {
        let mut seat_nos: Vec<u32> = rt.players.keys().copied().collect();
        seat_nos.sort_unstable();
        for seat_no in seat_nos {
            let s = &rt.players[&seat_no];
            seats.push(SeatView {
                seat_no,
                user_id: Some(s.user_id.clone()),
                stack: s.stack,
                bet: s.bet,
                has_folded: s.has_folded,
                is_all_in: s.is_all_in,
                is_dealer: seat_no == rt.dealer_seat,
                is_turn: rt.current_turn_seat == Some(seat_no),
                is_sitting_out: s.is_sitting_out,
            });
        }
    } else {
        for &seat_no in empty_seats {
            seats.push(SeatView {
                seat_no,
                user_id: None,
                stack: 0,
                bet: 0,
                has_folded: false,
                is_all_in: false,
                is_dealer: false,
                is_turn: false,
                is_sitting_out: false,
            });
        }
    }
    let game = runtime.map(|rt| GameView {
        hand_id: rt.hand_id.clone(),
        round: rt.round,
        board: rt.board.clone(),
        pot_total: rt.pot.total,
        current_bet: rt.current_bet,
        min_raise: rt.min_raise,
        turn_ends_at: rt.turn_ends_at,
        is_dealing_board: rt.is_dealing_board,
        auto_runout: rt.auto_runout,
    });
    TableSnapshot { table_id: table_id.to_string(), seats, game }
}

fn broadcast_snapshot(hub: &Hub, table_id: &str, runtime: Option<&TableRuntime>, empty_seats: &[u32]) {
    emit_table_event(hub, table_id, TableEvent::StateSnapshot(build_snapshot(table_id, runtime, empty_seats)));
}

/// Persists showdown payouts, broadcasts `SHOWDOWN_REVEAL` then `HAND_ENDED`,
/// flushes away-kicks, and schedules the next hand. Callable both from the
/// actor's mailbox loop and from the detached auto-runout task once it
/// reaches `SHOWDOWN`.
fn resolve_showdown(ctx: &Ctx, mut runtime: TableRuntime, pending_kicks: &mut Vec<u32>) {
    runtime.round = Round::Showdown;
    let mut hole_cards: HashMap<u32, (Card, Card)> = HashMap::new();
    for seat in runtime.contenders() {
        if let Ok(Some(cards)) = ctx.store.get_hole_cards(&ctx.table_id, &runtime.hand_id, &seat.user_id) {
            hole_cards.insert(seat.seat_no, cards);
        }
    }
    let result = showdown::resolve(&runtime, &hole_cards, ctx.seat_count);
    for winner in &result.winners {
        if let Some(seat) = runtime.seat_mut(winner.seat_no) {
            seat.stack += winner.payout;
        }
    }
    let stacks: Vec<(u32, u64)> = runtime.players.values().map(|s| (s.seat_no, s.stack)).collect();
    let _ = ctx.seat_ledger.persist_stacks(&ctx.table_id, &stacks);
    let hand_id = runtime.hand_id.clone();
    let _ = ctx.store.delete_runtime(&ctx.table_id);

    emit_table_event(
        &ctx.hub,
        &ctx.table_id,
        TableEvent::ShowdownReveal {
            hand_id: hand_id.clone(),
            reveal: result.reveal.iter().map(|r| RevealView { seat_no: r.seat_no, user_id: r.user_id.clone(), hole: r.hole }).collect(),
            winners: result.winners.iter().map(|w| WinnerView { seat_no: w.seat_no, user_id: w.user_id.clone(), payout: w.payout }).collect(),
        },
    );
    emit_table_event(&ctx.hub, &ctx.table_id, TableEvent::HandEnded { hand_id });
    flush_pending_away_kicks(ctx, pending_kicks);
    broadcast_snapshot(&ctx.hub, &ctx.table_id, None, &[]);
    schedule_next_hand(ctx, pacing::post_hand_hold_ms(&ctx.config, pacing::HandEndReason::Showdown));
}

fn schedule_next_hand(ctx: &Ctx, hold_ms: u64) {
    let tx = ctx.self_tx.clone();
    tokio::spawn(async move {
        tokio::time::sleep(std::time::Duration::from_millis(hold_ms)).await;
        let _ = tx.send(ActorMsg::PostHandHoldElapsed);
    });
}

fn flush_pending_away_kicks(ctx: &Ctx, pending_kicks: &mut Vec<u32>) {
    for seat_no in pending_kicks.drain(..) {
        if let Ok(seated) = ctx.seat_ledger.seated_players(&ctx.table_id) {
            if let Some(seat) = seated.iter().find(|s| s.seat_no == seat_no) {
                let _ = ctx.wallet.credit(&seat.user_id, seat.stack);
                ctx.seat_ledger.remove_seat(&ctx.table_id, seat_no);
                warn!(table_id = %ctx.table_id, seat_no, "seat_kicked_for_being_away");
            }
        }
    }
}

/// Deals the next street into `pending_board`, marks the runtime dealing,
/// and spawns the reveal sequence (spec.md §4.7): pre-delay, one card every
/// `BOARD_CARD_INTERVAL_MS`, post-delay. When `auto_runout` is set it keeps
/// looping street to street until `SHOWDOWN`, bounded by
/// `pacing::AUTO_RUNOUT_MAX_ITERATIONS`.
///
/// `pending_kicks` carries forward the actor's away-kick queue: a street
/// advance is a safe point (spec.md §4.6/§8 S4), so once the reveal settles
/// the kicks accumulated up to the handoff are flushed here rather than
/// waiting for hand end.
fn advance_street_and_reveal(ctx: Ctx, mut runtime: TableRuntime, auto_runout: bool, mut pending_kicks: Vec<u32>) {
    tokio::spawn(async move {
        let mut iterations = 0u32;
        loop {
            let (pending, remaining_deck) = runtime.deck.draw(runtime.round.cards_to_deal());
            runtime.pending_board = pending;
            runtime.deck = remaining_deck;
            runtime.is_dealing_board = true;
            runtime.auto_runout = auto_runout;
            let _ = ctx.store.put_runtime(&runtime);

            tokio::time::sleep(std::time::Duration::from_millis(ctx.config.street_pre_delay_ms)).await;
            while let Some(card) = pacing::reveal_next_card(&mut runtime) {
                let _ = card;
                let _ = ctx.store.put_runtime(&runtime);
                broadcast_snapshot(&ctx.hub, &ctx.table_id, Some(&runtime), &[]);
                tokio::time::sleep(std::time::Duration::from_millis(ctx.config.board_card_interval_ms)).await;
            }
            pacing::finish_reveal(&mut runtime, &ctx.config, ctx.seat_count, now_ms());
            let _ = ctx.store.put_runtime(&runtime);
            flush_pending_away_kicks(&ctx, &mut pending_kicks);
            broadcast_snapshot(&ctx.hub, &ctx.table_id, Some(&runtime), &[]);
            tokio::time::sleep(std::time::Duration::from_millis(ctx.config.street_post_delay_ms)).await;

            if !auto_runout {
                if let Some(key) = clock::TimerKey::from_runtime(&runtime) {
                    arm_timer(ctx.self_tx.clone(), key, clock::fire_delay_ms(&runtime, now_ms()));
                }
                return;
            }

            iterations += 1;
            runtime.round = runtime.round.next();
            betting::reset_for_new_round(&mut runtime);
            if runtime.round == Round::Showdown || !pacing::should_continue_auto_runout(&runtime, iterations) {
                resolve_showdown(&ctx, runtime, &mut pending_kicks);
                return;
            }
        }
    });
}

struct TableActor {
    ctx: Ctx,
    rx: mpsc::UnboundedReceiver<ActorMsg>,
    strikes: HashMap<u32, clock::StrikeCounter>,
    pending_away_kicks: Vec<u32>,
}

impl TableActor {
    async fn run(&mut self) {
        while let Some(msg) = self.rx.recv().await {
            match msg {
                ActorMsg::Subscribe { user_id, tx } => {
                    self.send_table_state(&tx);
                    self.ctx.hub.join_table(&self.ctx.table_id, tx.clone());
                    self.ctx.hub.join_user(&user_id, tx);
                }
                ActorMsg::Client { user_id, event } => self.handle_client_event(user_id, event),
                ActorMsg::TimerFired(key) => self.handle_timer_fired(key),
                ActorMsg::PostHandHoldElapsed => self.try_start_hand(),
            }
        }
    }

    fn handle_client_event(&mut self, user_id: String, event: ClientEvent) {
        match event {
            ClientEvent::TableJoin { .. } => self.emit_snapshot(),
            ClientEvent::TableSit { seat_no, buy_in_amount, .. } => self.handle_sit(user_id, seat_no, buy_in_amount),
            ClientEvent::TableLeave { .. } => self.handle_leave(user_id),
            ClientEvent::TableRebuy { amount, .. } => self.handle_rebuy(user_id, amount),
            ClientEvent::TableSitOut { .. } => self.set_sitting_out(&user_id, true),
            ClientEvent::TableSitIn { .. } => self.set_sitting_out(&user_id, false),
            ClientEvent::TableAction { action, amount, .. } => self.handle_action(&user_id, action, amount, false),
            ClientEvent::ChatMessage { text, .. } => self.handle_chat_message(user_id, text),
            ClientEvent::ChatHistory { .. } => self.handle_chat_history(&user_id),
        }
    }

    /// Chat is a peripheral feature (spec.md §1): it goes through the
    /// `ChatSink` port only, never touching runtime state, so a failure
    /// here can never roll back a hand.
    fn handle_chat_message(&mut self, user_id: String, text: String) {
        self.ctx.chat.post(&self.ctx.table_id, ChatMessage { user_id: user_id.clone(), text: text.clone() });
        emit_table_event(&self.ctx.hub, &self.ctx.table_id, TableEvent::Chat { user_id, text });
    }

    fn handle_chat_history(&mut self, user_id: &str) {
        let messages: Vec<ChatMessageView> = self
            .ctx
            .chat
            .history(&self.ctx.table_id)
            .into_iter()
            .map(|m| ChatMessageView { user_id: m.user_id, text: m.text })
            .collect();
        self.ctx.hub.emit_user(
            user_id,
            serde_json::to_string(&ServerEvent::TableEventMsg {
                table_id: self.ctx.table_id.clone(),
                event: TableEvent::ChatHistory { messages },
            })
            .unwrap_or_default(),
        );
    }

    fn handle_sit(&mut self, user_id: String, seat_no: u32, buy_in_amount: u64) {
        if buy_in_amount < self.ctx.config.buy_in_min() {
            self.emit_error(&user_id, EngineError::BuyinTooSmall);
            return;
        }
        if buy_in_amount > self.ctx.config.buy_in_max() {
            self.emit_error(&user_id, EngineError::BuyinTooLarge);
            return;
        }
        if let Err(e) = self.ctx.wallet.debit(&user_id, buy_in_amount) {
            self.emit_error(&user_id, e);
            return;
        }
        if let Err(e) = self.ctx.seat_ledger.sit(&self.ctx.table_id, seat_no, &user_id, buy_in_amount) {
            let _ = self.ctx.wallet.credit(&user_id, buy_in_amount);
            self.emit_error(&user_id, e);
            return;
        }
        info!(table_id = %self.ctx.table_id, user_id = %user_id, seat_no, buy_in_amount, "seat_taken");
        self.emit_snapshot();
        self.try_start_hand();
    }

    fn handle_leave(&mut self, user_id: String) {
        let runtime = self.ctx.store.get_runtime(&self.ctx.table_id).ok().flatten();
        let seat_in_hand = runtime.as_ref().and_then(|rt| rt.players.values().find(|s| s.user_id == user_id));
        if let Some(seat) = seat_in_hand.filter(|s| !s.has_folded) {
            self.pending_away_kicks.push(seat.seat_no);
            self.ctx.hub.emit_user(
                &user_id,
                serde_json::to_string(&ServerEvent::TableEventMsg {
                    table_id: self.ctx.table_id.clone(),
                    event: TableEvent::LeavePending { table_id: self.ctx.table_id.clone() },
                })
                .unwrap_or_default(),
            );
            return;
        }
        self.cash_out_seat_by_user(&user_id);
        self.emit_snapshot();
    }

    fn handle_rebuy(&mut self, user_id: String, amount: u64) {
        let runtime = self.ctx.store.get_runtime(&self.ctx.table_id).ok().flatten();
        let mid_hand_not_folded = runtime
            .as_ref()
            .and_then(|rt| rt.players.values().find(|s| s.user_id == user_id))
            .map(|s| !s.has_folded)
            .unwrap_or(false);
        if mid_hand_not_folded {
            self.emit_error(&user_id, EngineError::HandInProgress);
            return;
        }
        if let Err(e) = self.ctx.wallet.debit(&user_id, amount) {
            self.emit_error(&user_id, e);
            return;
        }
        if let Err(e) = self.ctx.seat_ledger.rebuy(&self.ctx.table_id, &user_id, amount, self.ctx.config.buy_in_max()) {
            let _ = self.ctx.wallet.credit(&user_id, amount);
            self.emit_error(&user_id, e);
            return;
        }
        self.emit_snapshot();
    }

    fn set_sitting_out(&mut self, user_id: &str, sitting_out: bool) {
        if let Ok(Some(mut runtime)) = self.ctx.store.get_runtime(&self.ctx.table_id) {
            if let Some(seat) = runtime.players.values_mut().find(|s| s.user_id == user_id) {
                seat.is_sitting_out = sitting_out;
            }
            let _ = self.ctx.store.put_runtime(&runtime);
        }
        self.emit_snapshot();
    }

    fn handle_action(&mut self, user_id: &str, action: ActionKind, amount: Option<u64>, timeout: bool) {
        let Ok(Some(mut runtime)) = self.ctx.store.get_runtime(&self.ctx.table_id) else {
            self.emit_error(user_id, EngineError::NoHandRunning);
            return;
        };
        let Some(seat_no) = runtime.players.values().find(|s| s.user_id == user_id).map(|s| s.seat_no) else {
            self.emit_error(user_id, EngineError::NotSeated);
            return;
        };

        let outcome = match holdem_engine::apply(&mut runtime, seat_no, action.into(), amount, self.ctx.seat_count, &self.ctx.config, now_ms()) {
            Ok(outcome) => outcome,
            Err(e) => {
                self.emit_error(user_id, e);
                return;
            }
        };

        if timeout {
            let trip = self.strikes.entry(seat_no).or_default().record_timeout(self.ctx.config.away_timeouts_in_row);
            if trip {
                self.pending_away_kicks.push(seat_no);
            }
        } else {
            self.strikes.entry(seat_no).or_default().record_manual_action();
        }

        let stacks: Vec<(u32, u64)> = runtime.players.values().map(|s| (s.seat_no, s.stack)).collect();
        let _ = self.ctx.seat_ledger.persist_stacks(&self.ctx.table_id, &stacks);

        match outcome {
            holdem_engine::ApplyOutcome::Continue { .. } => {
                let _ = self.ctx.store.put_runtime(&runtime);
                self.emit_snapshot();
                if let Some(key) = clock::TimerKey::from_runtime(&runtime) {
                    arm_timer(self.ctx.self_tx.clone(), key, clock::fire_delay_ms(&runtime, now_ms()));
                }
            }
            holdem_engine::ApplyOutcome::WonByFold { winner_seat } => {
                let stacks: Vec<(u32, u64)> = runtime.players.values().map(|s| (s.seat_no, s.stack)).collect();
                let _ = self.ctx.seat_ledger.persist_stacks(&self.ctx.table_id, &stacks);
                let hand_id = runtime.hand_id.clone();
                let _ = self.ctx.store.delete_runtime(&self.ctx.table_id);
                emit_table_event(&self.ctx.hub, &self.ctx.table_id, TableEvent::HandEnded { hand_id });
                info!(table_id = %self.ctx.table_id, winner_seat, "hand_ended_by_fold");
                flush_pending_away_kicks(&self.ctx, &mut self.pending_away_kicks);
                self.emit_snapshot();
                schedule_next_hand(&self.ctx, pacing::post_hand_hold_ms(&self.ctx.config, pacing::HandEndReason::WonByFold));
            }
            holdem_engine::ApplyOutcome::RoundSettled { next_round, auto_runout } => {
                if next_round == Round::Showdown {
                    resolve_showdown(&self.ctx, runtime, &mut self.pending_away_kicks);
                } else {
                    self.emit_snapshot();
                    advance_street_and_reveal(self.ctx.clone(), runtime, auto_runout, std::mem::take(&mut self.pending_away_kicks));
                }
            }
        }
    }

    fn try_start_hand(&mut self) {
        if self.ctx.store.get_runtime(&self.ctx.table_id).ok().flatten().is_some() {
            return;
        }
        let Ok(seated) = self.ctx.seat_ledger.seated_players(&self.ctx.table_id) else { return };
        if !self.ctx.store.try_acquire_hand_start_lock(&self.ctx.table_id).unwrap_or(false) {
            return;
        }
        let prior_dealer = self.ctx.store.get_dealer(&self.ctx.table_id).ok().flatten();
        let hand_id = format!("{}-{}", self.ctx.table_id, now_ms());
        let mut rng = rand::rng();
        let started = lifecycle::start_hand(&self.ctx.table_id, hand_id, &seated, prior_dealer, self.ctx.seat_count, &self.ctx.config, now_ms(), &mut rng);
        let _ = self.ctx.store.release_hand_start_lock(&self.ctx.table_id);

        let Some(started) = started else { return };
        let _ = self
            .ctx
            .seat_ledger
            .mark_playing(&self.ctx.table_id, &started.runtime.players.keys().copied().collect::<Vec<_>>());
        let _ = self.ctx.store.put_dealer(&self.ctx.table_id, started.runtime.dealer_seat);
        for (user_id, cards) in &started.hole_cards {
            let _ = self.ctx.store.put_hole_cards(&self.ctx.table_id, &started.runtime.hand_id, user_id, *cards);
            self.ctx.hub.emit_user(
                user_id,
                serde_json::to_string(&ServerEvent::PrivateCards {
                    table_id: self.ctx.table_id.clone(),
                    hand_id: started.runtime.hand_id.clone(),
                    cards: *cards,
                })
                .unwrap_or_default(),
            );
        }
        let hand_id = started.runtime.hand_id.clone();
        let _ = self.ctx.store.put_runtime(&started.runtime);
        emit_table_event(&self.ctx.hub, &self.ctx.table_id, TableEvent::HandStarted { hand_id });
        self.emit_snapshot();
        if let Some(key) = clock::TimerKey::from_runtime(&started.runtime) {
            arm_timer(self.ctx.self_tx.clone(), key, clock::fire_delay_ms(&started.runtime, now_ms()));
        }
    }

    fn handle_timer_fired(&mut self, key: clock::TimerKey) {
        let Ok(Some(runtime)) = self.ctx.store.get_runtime(&self.ctx.table_id) else { return };
        let Some(current_key) = clock::TimerKey::from_runtime(&runtime) else { return };
        if current_key != key {
            return; // superseded: a later reschedule already replaced this timer
        }
        let Some(seat_no) = runtime.current_turn_seat else { return };
        let seat = runtime.seat(seat_no).expect("current_turn_seat always points at a seat");
        let user_id = seat.user_id.clone();
        let sitting_out = seat.is_sitting_out;
        let action = match clock::default_action(&runtime, seat_no) {
            clock::DefaultAction::Check => ActionKind::Check,
            clock::DefaultAction::Fold => ActionKind::Fold,
        };
        self.handle_action(&user_id, action, None, !sitting_out);
    }

    fn cash_out_seat_by_user(&mut self, user_id: &str) {
        let Ok(seated) = self.ctx.seat_ledger.seated_players(&self.ctx.table_id) else { return };
        if let Some(seat) = seated.iter().find(|s| s.user_id == user_id) {
            let _ = self.ctx.wallet.credit(user_id, seat.stack);
            self.ctx.seat_ledger.remove_seat(&self.ctx.table_id, seat.seat_no);
        }
    }

    fn emit_error(&self, user_id: &str, err: EngineError) {
        self.ctx.hub.emit_user(
            user_id,
            serde_json::to_string(&ServerEvent::TableEventMsg {
                table_id: self.ctx.table_id.clone(),
                event: TableEvent::Error { message: err.to_string() },
            })
            .unwrap_or_default(),
        );
    }

    fn emit_snapshot(&self) {
        let runtime = self.ctx.store.get_runtime(&self.ctx.table_id).ok().flatten();
        let empty_seats: Vec<u32> = if runtime.is_none() {
            self.ctx
                .seat_ledger
                .seated_players(&self.ctx.table_id)
                .map(|v| v.iter().map(|s| s.seat_no).collect())
                .unwrap_or_default()
        } else {
            Vec::new()
        };
        broadcast_snapshot(&self.ctx.hub, &self.ctx.table_id, runtime.as_ref(), &empty_seats);
    }

    /// `table:state` (spec.md §6): the full snapshot sent once, directly to
    /// the just-joined socket, distinct from the `table:event
    /// STATE_SNAPSHOT` broadcasts every subsequent mutation sends to the
    /// whole room.
    fn send_table_state(&self, tx: &crate::broadcast::ClientTx) {
        let runtime = self.ctx.store.get_runtime(&self.ctx.table_id).ok().flatten();
        let empty_seats: Vec<u32> = if runtime.is_none() {
            self.ctx
                .seat_ledger
                .seated_players(&self.ctx.table_id)
                .map(|v| v.iter().map(|s| s.seat_no).collect())
                .unwrap_or_default()
        } else {
            Vec::new()
        };
        let snapshot = build_snapshot(&self.ctx.table_id, runtime.as_ref(), &empty_seats);
        let json = serde_json::to_string(&ServerEvent::TableState { table_id: self.ctx.table_id.clone(), snapshot })
            .unwrap_or_default();
        let _ = tx.send(axum::extract::ws::Message::Text(json));
    }
}
