//! A minimal demo client: sits one user at a table and prints every server
//! event it receives. Not part of the hand engine; useful for poking at a
//! running `holdem-server` by hand.

use futures::{SinkExt, StreamExt};
use tokio_tungstenite::connect_async;

#[tokio::main]
async fn main() {
    let table_id = std::env::args().nth(1).unwrap_or_else(|| "t1".to_string());
    let user_id = std::env::args().nth(2).unwrap_or_else(|| format!("u-{}", std::process::id()));
    let buy_in: u64 = std::env::args().nth(3).and_then(|s| s.parse().ok()).unwrap_or(1000);
    let host = std::env::var("HOLDEM_SERVER_URL").unwrap_or_else(|_| "ws://127.0.0.1:8080/ws".to_string());
    let url = format!("{host}?user_id={user_id}");

    let (mut ws, _resp) = connect_async(url.as_str()).await.expect("connect");

    let join = serde_json::json!({"type": "table:join", "table_id": table_id});
    ws.send(tokio_tungstenite::tungstenite::Message::Text(join.to_string())).await.unwrap();
    let sit = serde_json::json!({"type": "table:sit", "table_id": table_id, "seat_no": 1, "buy_in_amount": buy_in});
    ws.send(tokio_tungstenite::tungstenite::Message::Text(sit.to_string())).await.unwrap();

    while let Some(msg) = ws.next().await {
        match msg {
            Ok(frame) => println!("<- {}", frame),
            Err(err) => {
                eprintln!("connection closed: {err}");
                break;
            }
        }
    }
}
