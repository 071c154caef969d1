//! UseCase: メッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - 検証 → 論理時刻の更新 (observe) → ブロードキャスト の順序
//!
//! ### なぜこのテストが必要か
//! - 拒否されたメッセージが論理時刻を消費しないことを保証する
//! - 受信したタイムスタンプより大きい時刻で上書きされることを保証する
//!
//! ### どのような状況を想定しているか
//! - 正常系：メッセージ送信とブロードキャスト
//! - 異常系：129 文字以上のメッセージ
//! - エッジケース：クライアントの時刻がサーバーより進んでいる／遅れている

use std::sync::Arc;

use crate::domain::{ChatMessage, LogicalClock, LogicalTime, MessageText};

use super::{broadcast::Broadcaster, error::SendMessageError};

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    clock: Arc<LogicalClock>,
    broadcaster: Broadcaster,
}

impl SendMessageUseCase {
    /// 新しい SendMessageUseCase を作成
    pub fn new(clock: Arc<LogicalClock>, broadcaster: Broadcaster) -> Self {
        Self { clock, broadcaster }
    }

    /// メッセージ送信を実行
    ///
    /// # Arguments
    ///
    /// * `sender` - 送信者の表示名
    /// * `text` - 本文（未検証）
    /// * `received` - クライアントが付与した論理時刻
    ///
    /// # Returns
    ///
    /// * `Ok(ChatMessage)` - サーバー時刻で上書きされ、ブロードキャスト済みのメッセージ
    /// * `Err(SendMessageError)` - 検証失敗（時計もレジストリも変化しない）
    pub async fn execute(
        &self,
        sender: String,
        text: String,
        received: LogicalTime,
    ) -> Result<ChatMessage, SendMessageError> {
        // 1. 検証（失敗時は論理時刻を消費しない）
        let text = match MessageText::new(text) {
            Ok(text) => text,
            Err(e) => {
                tracing::info!(
                    component = "Server",
                    event = "Rejected",
                    client_id = %sender,
                    lamport = self.clock.value().value(),
                    "{}",
                    e
                );
                return Err(e.into());
            }
        };

        // 2. 受信時刻をマージしてスタンプ
        let logical_time = self.clock.observe(received);
        let message = ChatMessage::chat(sender, text, logical_time);

        // 3. ブロードキャスト
        let report = self.broadcaster.broadcast(&message).await;
        tracing::info!(
            component = "Server",
            event = "Broadcast",
            client_id = %message.sender,
            lamport = logical_time.value(),
            recipients = report.delivered,
            "type=Chat text={:?}",
            message.text
        );

        Ok(message)
    }
}
