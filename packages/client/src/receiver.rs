//! Receive path: observe every pushed message and render it.

use std::{fmt::Display, sync::Arc};

use chitchat_server::{
    domain::{ClientId, LogicalClock, LogicalTime},
    infrastructure::dto::websocket::ChatMessage,
};
use futures_util::{Stream, StreamExt};
use tokio_tungstenite::tungstenite::Message;

/// Merge an inbound timestamp into the local clock; the result is the display time
pub fn observe_incoming(clock: &LogicalClock, message: &ChatMessage) -> LogicalTime {
    clock.observe(LogicalTime::new(message.logical_time))
}

/// `[Lamport=N] sender: text`
pub fn render(display_time: LogicalTime, message: &ChatMessage) -> String {
    format!(
        "[Lamport={}] {}: {}",
        display_time, message.sender, message.text
    )
}

/// Drain `stream` until it ends, handing each rendered line to `output`.
///
/// Returns the number of chat messages rendered.
pub async fn receive_loop<S, E, F>(
    client_id: ClientId,
    clock: Arc<LogicalClock>,
    mut stream: S,
    mut output: F,
) -> usize
where
    S: Stream<Item = Result<Message, E>> + Unpin,
    E: Display,
    F: FnMut(String),
{
    let mut received = 0;

    loop {
        let text = match stream.next().await {
            Some(Ok(Message::Text(text))) => text,
            Some(Ok(Message::Close(frame))) => {
                tracing::info!(
                    component = "Client",
                    event = "Shutdown",
                    client_id = %client_id,
                    lamport = clock.value().value(),
                    "stream closed by server: {:?}",
                    frame
                );
                break;
            }
            Some(Ok(_)) => continue,
            Some(Err(e)) => {
                tracing::info!(
                    component = "Client",
                    event = "Shutdown",
                    client_id = %client_id,
                    lamport = clock.value().value(),
                    "stream closed: {}",
                    e
                );
                break;
            }
            None => {
                tracing::info!(
                    component = "Client",
                    event = "Shutdown",
                    client_id = %client_id,
                    lamport = clock.value().value(),
                    "stream ended"
                );
                break;
            }
        };

        let message = match serde_json::from_str::<ChatMessage>(&text) {
            Ok(message) => message,
            Err(e) => {
                tracing::warn!("Failed to parse message: {}, text: {}", e, text.as_str());
                continue;
            }
        };

        let display_time = observe_incoming(&clock, &message);
        tracing::info!(
            component = "Client",
            event = "Receive",
            client_id = %client_id,
            lamport = display_time.value(),
            "type={:?} from={} text={:?}",
            message.kind,
            message.sender,
            message.text
        );
        output(render(display_time, &message));
        received += 1;
    }

    received
}

#[cfg(test)]
mod tests {
    use super::*;
    use chitchat_server::infrastructure::dto::websocket::MessageKind;
    use std::convert::Infallible;

    fn frame(sender: &str, text: &str, logical_time: i64, kind: MessageKind) -> Message {
        let message = ChatMessage {
            sender: sender.to_string(),
            text: text.to_string(),
            logical_time,
            kind,
        };
        Message::text(serde_json::to_string(&message).unwrap())
    }

    #[test]
    fn test_observe_incoming_moves_past_received_time() {
        // テスト項目: 受信時刻より大きい値が表示時刻になる
        // given (前提条件):
        let clock = LogicalClock::new();
        let message = ChatMessage::chat("Alice", "hi", LogicalTime::new(5));

        // when (操作):
        let display_time = observe_incoming(&clock, &message);

        // then (期待する結果):
        assert_eq!(display_time, LogicalTime::new(6));
    }

    #[test]
    fn test_render_format() {
        // テスト項目: 表示形式は [Lamport=N] sender: text
        // given (前提条件):
        let message = ChatMessage::chat("Bob", "hi", LogicalTime::new(3));

        // when (操作):
        let line = render(LogicalTime::new(4), &message);

        // then (期待する結果):
        assert_eq!(line, "[Lamport=4] Bob: hi");
    }

    #[tokio::test]
    async fn test_receive_loop_renders_until_stream_ends() {
        // テスト項目: ストリーム終了まで受信・表示し、制御フレームと不正 JSON は読み飛ばす
        // given (前提条件):
        let clock = Arc::new(LogicalClock::new());
        let frames = futures_util::stream::iter(vec![
            Ok::<_, Infallible>(frame(
                "Bob",
                "Participant Bob joined Chit Chat at logical time 1",
                1,
                MessageKind::Join,
            )),
            Ok(Message::Ping(Default::default())),
            Ok(Message::text("not json")),
            Ok(frame("Alice", "hello", 7, MessageKind::Chat)),
        ]);
        let mut lines = Vec::new();

        // when (操作):
        let received = receive_loop(
            ClientId::new("Bob".to_string()).unwrap(),
            clock.clone(),
            frames,
            |line| lines.push(line),
        )
        .await;

        // then (期待する結果):
        assert_eq!(received, 2);
        assert_eq!(
            lines,
            vec![
                "[Lamport=2] Bob: Participant Bob joined Chit Chat at logical time 1".to_string(),
                "[Lamport=8] Alice: hello".to_string(),
            ]
        );
        assert_eq!(clock.value(), LogicalTime::new(8));
    }

    #[tokio::test]
    async fn test_receive_loop_stops_on_close_frame() {
        // テスト項目: Close フレーム以降のメッセージは処理しない
        // given (前提条件):
        let clock = Arc::new(LogicalClock::new());
        let frames = futures_util::stream::iter(vec![
            Ok::<_, Infallible>(Message::Close(None)),
            Ok(frame("Alice", "late", 9, MessageKind::Chat)),
        ]);
        let mut lines = Vec::new();

        // when (操作):
        let received = receive_loop(
            ClientId::new("Bob".to_string()).unwrap(),
            clock.clone(),
            frames,
            |line| lines.push(line),
        )
        .await;

        // then (期待する結果):
        assert_eq!(received, 0);
        assert!(lines.is_empty());
        assert_eq!(clock.value(), LogicalTime::ZERO);
    }
}
