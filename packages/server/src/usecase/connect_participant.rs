//! UseCase: 参加者接続処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectParticipantUseCase::execute() メソッド
//! - レジストリへの登録 → tick → JOIN ブロードキャスト
//!
//! ### なぜこのテストが必要か
//! - 参加者自身を含む全員に JOIN が届くことを保証
//! - 同一 ID の再接続で古い接続が閉じられることを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：最初の参加者、二人目の参加者
//! - エッジケース：同一 ID での再接続（後勝ち）

use std::sync::Arc;

use chitchat_shared::time::get_jst_timestamp;

use crate::domain::{
    ChatMessage, ClientId, ClientRegistry, ConnectionId, ConnectionIdFactory, LogicalClock,
    LogicalTime, OutboundSender, Participant, ParticipantEntry, Timestamp,
};

use super::broadcast::Broadcaster;

/// 登録済みの接続
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Connection {
    pub connection_id: ConnectionId,
    /// JOIN に付与された論理時刻
    pub joined_at: LogicalTime,
}

/// 参加者接続のユースケース
pub struct ConnectParticipantUseCase {
    registry: Arc<dyn ClientRegistry>,
    clock: Arc<LogicalClock>,
    broadcaster: Broadcaster,
}

impl ConnectParticipantUseCase {
    /// 新しい ConnectParticipantUseCase を作成
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

    /// 参加者接続を実行
    ///
    /// 同じ ID が既に登録されている場合は置き換え、古い接続の送信チャンネルを
    /// 破棄する（古いストリームはそれによって終了する）。
    ///
    /// # Arguments
    ///
    /// * `client_id` - 接続するクライアントの ID（Domain Model）
    /// * `sender` - このクライアントへの配送チャンネル
    pub async fn execute(&self, client_id: ClientId, sender: OutboundSender) -> Connection {
        // 1. レジストリに登録（後勝ち）
        let connection_id = ConnectionIdFactory::generate();
        let participant = Participant::new(client_id.clone(), Timestamp::new(get_jst_timestamp()));
        let replaced = self
            .registry
            .register(ParticipantEntry::new(participant, connection_id, sender))
            .await;

        if let Some(previous) = replaced {
            tracing::warn!(
                component = "Server",
                event = "Superseded",
                client_id = %client_id,
                lamport = self.clock.value().value(),
                "closing previous connection {}",
                previous.connection_id
            );
            drop(previous);
        }

        // 2. JOIN をスタンプしてブロードキャスト
        let joined_at = self.clock.tick();
        let report = self
            .broadcaster
            .broadcast(&ChatMessage::join(&client_id, joined_at))
            .await;
        tracing::info!(
            component = "Server",
            event = "Join",
            client_id = %client_id,
            lamport = joined_at.value(),
            recipients = report.delivered,
            "client connected"
        );

        Connection {
            connection_id,
            joined_at,
        }
    }
}
