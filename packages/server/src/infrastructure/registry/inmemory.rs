//! InMemory ClientRegistry 実装
//!
//! ドメイン層が定義する ClientRegistry trait の具体的な実装。
//! 単一の Mutex で保護された HashMap をレジストリとして使用します。
//! プロセス全体の static ではなくインスタンスとして所有されるため、
//! テストでは複数のサーバーを同一プロセス内に共存させられます。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ClientId, ClientRegistry, ConnectionId, Participant, ParticipantEntry, Unregistration,
};

/// インメモリ ClientRegistry 実装
#[derive(Default)]
pub struct InMemoryClientRegistry {
    /// 接続中のクライアント（client_id → 配送チャンネル）
    entries: Mutex<HashMap<ClientId, ParticipantEntry>>,
}

impl InMemoryClientRegistry {
    /// 新しい InMemoryClientRegistry を作成
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ClientRegistry for InMemoryClientRegistry {
    async fn register(&self, entry: ParticipantEntry) -> Option<ParticipantEntry> {
        let mut entries = self.entries.lock().await;
        entries.insert(entry.client_id().clone(), entry)
    }

    async fn unregister(&self, client_id: &ClientId) -> Option<ParticipantEntry> {
        let mut entries = self.entries.lock().await;
        entries.remove(client_id)
    }

    async fn unregister_connection(
        &self,
        client_id: &ClientId,
        connection_id: ConnectionId,
    ) -> Unregistration {
        let mut entries = self.entries.lock().await;
        match entries.get(client_id) {
            None => Unregistration::Absent,
            Some(entry) if entry.connection_id != connection_id => Unregistration::Superseded,
            Some(_) => {
                entries.remove(client_id);
                Unregistration::Removed
            }
        }
    }

    async fn snapshot(&self) -> Vec<ParticipantEntry> {
        let entries = self.entries.lock().await;
        entries.values().cloned().collect()
    }

    async fn participants(&self) -> Vec<Participant> {
        let entries = self.entries.lock().await;
        let mut participants: Vec<Participant> =
            entries.values().map(|e| e.participant.clone()).collect();

        // Sort by client_id for consistent ordering
        participants.sort_by(|a, b| a.id.cmp(&b.id));
        participants
    }

    async fn count(&self) -> usize {
        let entries = self.entries.lock().await;
        entries.len()
    }

    async fn contains(&self, client_id: &ClientId) -> bool {
        let entries = self.entries.lock().await;
        entries.contains_key(client_id)
    }
}
