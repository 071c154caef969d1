//! Test fixtures: an in-process server on an ephemeral port plus a small
//! WebSocket participant helper.

#![allow(dead_code)]

use std::{net::SocketAddr, time::Duration};

use chitchat_server::{ServerConfig, serve, ui::state::AppState};
use futures_util::{SinkExt, StreamExt};
use tokio::{
    net::{TcpListener, TcpStream},
    task::JoinHandle,
};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async, tungstenite::protocol::Message,
};

/// How long a test waits for a single pushed message
pub const RECV_TIMEOUT: Duration = Duration::from_secs(5);

pub struct TestServer {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a server without heartbeat
    pub async fn start() -> Self {
        Self::start_with(ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            heartbeat: None,
        })
        .await
    }

    pub async fn start_with(config: ServerConfig) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local addr");
        let state = AppState::in_memory(&config);

        let handle = tokio::spawn(async move {
            if let Err(e) = serve(listener, state, std::future::pending()).await {
                eprintln!("test server stopped: {e}");
            }
        });

        Self { addr, handle }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn ws_url(&self, client_id: &str) -> String {
        format!("ws://{}/ws?client_id={}", self.addr, client_id)
    }

    /// POST a ChatMessage to SendMessage and return the JSON response body
    pub async fn send_message(
        &self,
        sender: &str,
        text: &str,
        logical_time: i64,
    ) -> serde_json::Value {
        reqwest::Client::new()
            .post(format!("{}/api/messages", self.base_url()))
            .json(&serde_json::json!({
                "sender": sender,
                "text": text,
                "logical_time": logical_time,
                "kind": "chat",
            }))
            .send()
            .await
            .expect("Failed to send request")
            .json()
            .await
            .expect("Failed to parse JSON")
    }

    pub async fn participants(&self) -> serde_json::Value {
        reqwest::get(format!("{}/api/participants", self.base_url()))
            .await
            .expect("Failed to send request")
            .json()
            .await
            .expect("Failed to parse JSON")
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// One connected StreamMessages participant
pub struct Participant {
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl Participant {
    pub async fn connect(server: &TestServer, client_id: &str) -> Self {
        let (ws, _) = connect_async(server.ws_url(client_id))
            .await
            .expect("Failed to connect");
        Self { ws }
    }

    /// Next pushed ChatMessage; control frames are skipped
    pub async fn next_message(&mut self) -> serde_json::Value {
        tokio::time::timeout(RECV_TIMEOUT, async {
            loop {
                match self.ws.next().await {
                    Some(Ok(Message::Text(text))) => {
                        return serde_json::from_str(&text).expect("Failed to parse JSON");
                    }
                    Some(Ok(_)) => continue,
                    other => panic!("stream ended unexpectedly: {other:?}"),
                }
            }
        })
        .await
        .expect("Timed out waiting for a message")
    }

    /// Wait until the server ends this stream
    pub async fn expect_closed(&mut self) {
        tokio::time::timeout(RECV_TIMEOUT, async {
            loop {
                match self.ws.next().await {
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => return,
                    Some(Ok(_)) => continue,
                }
            }
        })
        .await
        .expect("Timed out waiting for the stream to close")
    }

    pub async fn close(mut self) {
        let _ = self.ws.close(None).await;
    }
}
