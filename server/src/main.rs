use axum::{
    extract::ws::{Message as WsMessage, WebSocket, WebSocketUpgrade},
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
    Router,
};
use futures::{SinkExt, StreamExt};
use holdem_engine::{Config, InMemoryStore, RuntimeStore};
use holdem_server::broadcast::Hub;
use holdem_server::chat::{ChatSink, InMemoryChatSink};
use holdem_server::gateway::ClientEvent;
use holdem_server::ledger::{InMemorySeatLedger, InMemoryWalletLedger};
use holdem_server::table_actor::{self, ActorMsg, TableActorHandle};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tower_http::services::ServeDir;
use tracing::{info, warn, Level};
use tracing_subscriber::EnvFilter;

/// Fixed per-table capacity (spec.md's `seatNo (1..N)` is generic; every
/// table this gateway spawns uses the teacher's 6-max default).
const DEFAULT_SEAT_COUNT: u32 = 6;

/// Identity & session is an external collaborator (spec.md §1) this crate
/// doesn't implement; in place of verifying a bearer credential, the socket
/// trusts a `user_id` query parameter the way the teacher's gateway trusted
/// a client-supplied `client_msg_id`.
#[derive(Debug, Deserialize)]
struct ConnectParams {
    user_id: String,
}

struct AppState {
    store: Arc<InMemoryStore>,
    seat_ledger: Arc<InMemorySeatLedger>,
    wallet: Arc<InMemoryWalletLedger>,
    chat: Arc<dyn ChatSink>,
    hub: Arc<Hub>,
    config: Config,
    tables: Mutex<HashMap<String, TableActorHandle>>,
}

impl AppState {
    fn table_handle(self: &Arc<Self>, table_id: &str) -> TableActorHandle {
        let mut tables = self.tables.lock().unwrap();
        tables
            .entry(table_id.to_string())
            .or_insert_with(|| {
                info!(table_id, "table_spawned");
                table_actor::spawn(
                    table_id.to_string(),
                    DEFAULT_SEAT_COUNT,
                    self.config.clone(),
                    self.store.clone(),
                    self.seat_ledger.clone(),
                    self.wallet.clone(),
                    self.chat.clone(),
                    self.hub.clone(),
                )
            })
            .clone()
    }

    /// Rebuilds every table with a live runtime blob, for boot-time recovery
    /// (spec.md §4.8). This is the entire state a fresh process needs.
    fn recover(self: &Arc<Self>) {
        let Ok(table_ids) = self.store.list_runtime_table_ids() else {
            return;
        };
        for table_id in table_ids {
            info!(table_id = %table_id, "recovering_table");
            let handle = table_actor::spawn_recovered(
                table_id.clone(),
                DEFAULT_SEAT_COUNT,
                self.config.clone(),
                self.store.clone(),
                self.seat_ledger.clone(),
                self.wallet.clone(),
                self.chat.clone(),
                self.hub.clone(),
            );
            self.tables.lock().unwrap().insert(table_id, handle);
        }
    }
}

fn table_id_of(event: &ClientEvent) -> &str {
    match event {
        ClientEvent::TableJoin { table_id }
        | ClientEvent::TableSit { table_id, .. }
        | ClientEvent::TableLeave { table_id }
        | ClientEvent::TableRebuy { table_id, .. }
        | ClientEvent::TableSitOut { table_id }
        | ClientEvent::TableSitIn { table_id }
        | ClientEvent::TableAction { table_id, .. }
        | ClientEvent::ChatMessage { table_id, .. }
        | ClientEvent::ChatHistory { table_id } => table_id,
    }
}

async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<ConnectParams>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state, params.user_id))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, user_id: String) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let (client_tx, mut client_rx) = tokio::sync::mpsc::unbounded_channel::<WsMessage>();

    let writer = tokio::spawn(async move {
        while let Some(msg) = client_rx.recv().await {
            if ws_tx.send(msg).await.is_err() {
                break;
            }
        }
    });

    let mut joined_tables: HashSet<String> = HashSet::new();
    while let Some(Ok(WsMessage::Text(text))) = ws_rx.next().await {
        let event: ClientEvent = match serde_json::from_str(&text) {
            Ok(event) => event,
            Err(err) => {
                warn!(user_id = %user_id, %err, "malformed_client_event");
                continue;
            }
        };
        // The wallet ledger is an external collaborator (spec.md §1) this
        // crate doesn't implement; in its place the in-memory stand-in is
        // topped up here so a buy-in's debit has funds to draw from.
        match &event {
            ClientEvent::TableSit { buy_in_amount, .. } => state.wallet.deposit(&user_id, *buy_in_amount),
            ClientEvent::TableRebuy { amount, .. } => state.wallet.deposit(&user_id, *amount),
            _ => {}
        }

        let table_id = table_id_of(&event).to_string();
        let handle = state.table_handle(&table_id);
        if joined_tables.insert(table_id) {
            let _ = handle.tx.send(ActorMsg::Subscribe { user_id: user_id.clone(), tx: client_tx.clone() });
        }
        let _ = handle.tx.send(ActorMsg::Client { user_id: user_id.clone(), event });
    }

    // The socket dropped: enforce "one active table per player" (spec.md
    // §4.9) by cashing the user out of every table this connection joined.
    for table_id in joined_tables {
        if let Some(handle) = state.tables.lock().unwrap().get(&table_id) {
            let _ = handle.tx.send(ActorMsg::Client {
                user_id: user_id.clone(),
                event: ClientEvent::TableLeave { table_id },
            });
        }
    }

    let _ = writer.await;
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .init();

    let state = Arc::new(AppState {
        store: Arc::new(InMemoryStore::new()),
        seat_ledger: Arc::new(InMemorySeatLedger::new()),
        wallet: Arc::new(InMemoryWalletLedger::new()),
        chat: Arc::new(InMemoryChatSink::new()),
        hub: Arc::new(Hub::new()),
        config: Config::default(),
        tables: Mutex::new(HashMap::new()),
    });
    state.recover();

    let app = Router::new()
        .route("/ws", get(ws_handler))
        .nest_service("/", ServeDir::new("public"))
        .with_state(state);

    let addr: SocketAddr = "0.0.0.0:8080".parse().unwrap();
    info!(%addr, "starting server");
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
