//! UseCase: 参加者切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectParticipantUseCase::execute() メソッド
//! - 登録解除 → tick → LEAVE ブロードキャスト
//!
//! ### なぜこのテストが必要か
//! - LEAVE が本人の最後のイベントより大きい論理時刻を持つことを保証
//! - 退出した本人には LEAVE が届かないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：参加者の切断と通知
//! - エッジケース：配送失敗で既に削除済みの参加者の切断
//! - エッジケース：新しい接続に置き換えられた古い接続の切断（LEAVE なし）

use std::sync::Arc;

use crate::domain::{
    ChatMessage, ClientId, ClientRegistry, ConnectionId, LogicalClock, LogicalTime,
    Unregistration,
};

use super::broadcast::Broadcaster;

/// 参加者切断のユースケース
pub struct DisconnectParticipantUseCase {
    registry: Arc<dyn ClientRegistry>,
    clock: Arc<LogicalClock>,
    broadcaster: Broadcaster,
}

impl DisconnectParticipantUseCase {
    /// 新しい DisconnectParticipantUseCase を作成
    pub fn new(
        registry: Arc<dyn ClientRegistry>,
        clock: Arc<LogicalClock>,
        broadcaster: Broadcaster,
    ) -> Self {
        Self {
            registry,
            clock,
            broadcaster,
        }
    }

    /// 参加者切断を実行
    ///
    /// # Returns
    ///
    /// * `Some(LogicalTime)` - ブロードキャストした LEAVE の論理時刻
    /// * `None` - この接続は新しい接続に置き換え済みのため LEAVE を出さなかった
    pub async fn execute(
        &self,
        client_id: &ClientId,
        connection_id: ConnectionId,
    ) -> Option<LogicalTime> {
        // 1. 自分の接続に限って登録解除
        match self
            .registry
            .unregister_connection(client_id, connection_id)
            .await
        {
            Unregistration::Superseded => {
                tracing::info!(
                    component = "Server",
                    event = "Superseded",
                    client_id = %client_id,
                    lamport = self.clock.value().value(),
                    "previous connection closed; identity still connected"
                );
                return None;
            }
            Unregistration::Removed | Unregistration::Absent => {}
        }

        // 2. LEAVE をスタンプして残りの参加者にブロードキャスト
        let left_at = self.clock.tick();
        let report = self
            .broadcaster
            .broadcast(&ChatMessage::leave(client_id, left_at))
            .await;
        tracing::info!(
            component = "Server",
            event = "Leave",
            client_id = %client_id,
            lamport = left_at.value(),
            recipients = report.delivered,
            "client disconnected"
        );

        Some(left_at)
    }
}
