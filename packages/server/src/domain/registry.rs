//! Registry of connected participants.
//!
//! The trait lives in the domain layer; the in-memory implementation lives in
//! `infrastructure::registry` and is injected into the use cases.

use async_trait::async_trait;

use super::{
    entity::{Participant, ParticipantEntry},
    value_object::{ClientId, ConnectionId},
};

/// Outcome of removing a specific connection from the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unregistration {
    /// The entry belonged to this connection and has been removed
    Removed,
    /// No entry for the identity (already evicted or never registered)
    Absent,
    /// The identity is registered to a newer connection, which was left alone
    Superseded,
}

/// Concurrency-safe mapping from participant identity to its delivery channel.
///
/// Every operation is atomic with respect to every other one; a snapshot
/// never observes a half-applied mutation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClientRegistry: Send + Sync {
    /// Insert or replace the entry for the entry's identity.
    ///
    /// Returns the replaced entry when the identity was already registered.
    async fn register(&self, entry: ParticipantEntry) -> Option<ParticipantEntry>;

    /// Remove the entry for `client_id`, whichever connection owns it.
    ///
    /// Absent identities are a no-op.
    async fn unregister(&self, client_id: &ClientId) -> Option<ParticipantEntry>;

    /// Remove the entry for `client_id` only if it belongs to `connection_id`.
    async fn unregister_connection(
        &self,
        client_id: &ClientId,
        connection_id: ConnectionId,
    ) -> Unregistration;

    /// Consistent copy of every entry; iteration order is unspecified.
    async fn snapshot(&self) -> Vec<ParticipantEntry>;

    /// Connected participants, sorted by client id
    async fn participants(&self) -> Vec<Participant>;

    async fn count(&self) -> usize;

    async fn contains(&self, client_id: &ClientId) -> bool;
}
