//! HTTP API integration tests.
//!
//! Tests for REST API endpoints (health check, participants, SendMessage).

mod fixtures;
use fixtures::{Participant, TestServer};

#[tokio::test]
async fn test_health_endpoint() {
    // テスト項目: /api/health エンドポイントが正常に動作する
    // given (前提条件):
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    // when (操作):
    let response = client
        .get(format!("{}/api/health", server.base_url()))
        .send()
        .await
        .expect("Failed to send request");

    // then (期待する結果):
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_participants_endpoint_empty() {
    // テスト項目: 接続前は参加者が空で論理時刻は 0
    // given (前提条件):
    let server = TestServer::start().await;

    // when (操作):
    let body = server.participants().await;

    // then (期待する結果):
    assert_eq!(body["logical_time"], 0);
    assert_eq!(body["participants"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_participants_endpoint_lists_connected_clients() {
    // テスト項目: 接続中の参加者が client_id 順に返される
    // given (前提条件):
    let server = TestServer::start().await;
    let mut bob = Participant::connect(&server, "bob").await;
    bob.next_message().await;
    let mut alice = Participant::connect(&server, "alice").await;
    alice.next_message().await;

    // when (操作):
    let body = server.participants().await;

    // then (期待する結果):
    assert_eq!(body["logical_time"], 2);
    let participants = body["participants"].as_array().unwrap();
    assert_eq!(participants.len(), 2);
    assert_eq!(participants[0]["client_id"], "alice");
    assert_eq!(participants[1]["client_id"], "bob");
    let connected_at = participants[0]["connected_at"].as_str().unwrap();
    assert!(connected_at.ends_with("+09:00"), "JST timestamp: {connected_at}");
}

#[tokio::test]
async fn test_send_message_accepted() {
    // テスト項目: 128 文字以内のメッセージは受理される
    // given (前提条件):
    let server = TestServer::start().await;

    // when (操作):
    let body = server.send_message("bob", "hello", 1).await;

    // then (期待する結果):
    assert_eq!(body["success"], true);
    assert!(body.get("error").is_none(), "error omitted on success");
}

#[tokio::test]
async fn test_send_message_rejects_oversized_text_in_band() {
    // テスト項目: 129 文字のメッセージは 200 + success:false で拒否される
    // given (前提条件):
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    // when (操作):
    let response = client
        .post(format!("{}/api/messages", server.base_url()))
        .json(&serde_json::json!({
            "sender": "bob",
            "text": "a".repeat(129),
            "logical_time": 1,
            "kind": "chat",
        }))
        .send()
        .await
        .expect("Failed to send request");

    // then (期待する結果):
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "message exceeds 128 characters");

    // 拒否されたメッセージは論理時刻を消費しない
    assert_eq!(server.participants().await["logical_time"], 0);
}

#[tokio::test]
async fn test_send_message_malformed_body_is_client_error() {
    // テスト項目: 不正な JSON はトランスポートエラー（4xx）になる
    // given (前提条件):
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    // when (操作):
    let response = client
        .post(format!("{}/api/messages", server.base_url()))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .expect("Failed to send request");

    // then (期待する結果):
    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_stream_with_empty_client_id_is_refused() {
    // テスト項目: 空の client_id では WebSocket 接続が 400 で拒否される
    // given (前提条件):
    let server = TestServer::start().await;

    // when (操作):
    let result = tokio_tungstenite::connect_async(server.ws_url("")).await;

    // then (期待する結果):
    match result {
        Err(tokio_tungstenite::tungstenite::Error::Http(response)) => {
            assert_eq!(response.status(), 400);
        }
        other => panic!("expected HTTP 400, got {:?}", other.map(|_| ())),
    }
}
