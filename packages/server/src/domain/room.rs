//! Room: a named broadcast group.
//!
//! ## Locking
//!
//! - `broadcast` holds the shared (read) lock for the fan-out pass, so broadcasts
//!   from different senders may run concurrently.
//! - `add_member` / `remove_member` take the exclusive (write) lock.
//! - Recipients that cannot accept a frame are collected during the pass and
//!   removed under the write lock afterwards, in the same `broadcast` call.
//!   Concurrent passes never see the member list change under them.

use tokio::sync::{RwLock, mpsc, mpsc::error::TrySendError};

use super::{ConnectionId, Frame, Message};

/// Capacity of every connection's outbound queue.
pub const OUTBOUND_QUEUE_CAPACITY: usize = 256;

/// Producer side of a connection's outbound queue.
pub type OutboundQueue = mpsc::Sender<Frame>;

/// A connection's membership in a room.
///
/// The member owns the only producer handle of the connection's outbound
/// queue. Dropping the member signals queue closure to the connection's
/// outbound loop, so it must never be cloned.
#[derive(Debug)]
pub struct Member {
    pub id: ConnectionId,
    /// Display name taken from the join message
    pub name: String,
    queue: OutboundQueue,
}

impl Member {
    pub fn new(id: ConnectionId, name: impl Into<String>, queue: OutboundQueue) -> Self {
        Self {
            id,
            name: name.into(),
            queue,
        }
    }
}

#[derive(Debug)]
pub struct Room {
    name: String,
    members: RwLock<Vec<Member>>,
}

impl Room {
    /// Create an empty room. Only the registry should call this.
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: RwLock::new(Vec::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub async fn add_member(&self, member: Member) {
        let mut members = self.members.write().await;
        tracing::debug!(
            room = %self.name,
            connection_id = %member.id,
            name = %member.name,
            "member added"
        );
        members.push(member);
    }

    /// Remove a member by identity. No-op if absent.
    ///
    /// Returns `true` if the room is empty afterwards.
    pub async fn remove_member(&self, id: ConnectionId) -> bool {
        let mut members = self.members.write().await;
        if let Some(pos) = members.iter().position(|m| m.id == id) {
            let member = members.remove(pos);
            tracing::debug!(
                room = %self.name,
                connection_id = %member.id,
                name = %member.name,
                "member removed"
            );
        }
        members.is_empty()
    }

    #[cfg(test)]
    pub(crate) async fn member_count(&self) -> usize {
        self.members.read().await.len()
    }

    /// Tell every other member that `joiner_name` joined.
    pub async fn announce_join(&self, joiner: ConnectionId, joiner_name: &str) {
        let notice = Message::join_notice(&self.name, joiner_name);
        let json = match notice.to_json() {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(room = %self.name, "Failed to serialize join notice: {}", e);
                return;
            }
        };

        self.broadcast(joiner, Frame::from(json)).await;
    }

    /// Deliver `payload` to every member except `sender`.
    ///
    /// Delivery is a non-blocking enqueue. A recipient whose queue is full (or
    /// already closed) is evicted from the room; the remaining recipients
    /// still get the payload.
    ///
    /// # Returns
    ///
    /// The number of recipients the payload was enqueued for.
    pub async fn broadcast(&self, sender: ConnectionId, payload: Frame) -> usize {
        let mut delivered = 0;
        let mut evicted = Vec::new();

        {
            let members = self.members.read().await;
            for member in members.iter().filter(|m| m.id != sender) {
                match member.queue.try_send(payload.clone()) {
                    Ok(()) => delivered += 1,
                    Err(TrySendError::Full(_)) => {
                        tracing::debug!(
                            room = %self.name,
                            connection_id = %member.id,
                            "outbound queue full, evicting member"
                        );
                        evicted.push(member.id);
                    }
                    Err(TrySendError::Closed(_)) => {
                        tracing::debug!(
                            room = %self.name,
                            connection_id = %member.id,
                            "outbound queue closed, evicting member"
                        );
                        evicted.push(member.id);
                    }
                }
            }
        }

        if !evicted.is_empty() {
            let mut members = self.members.write().await;
            // Dropping the evicted members drops their queue handles, which closes the queues.
            members.retain(|m| !evicted.contains(&m.id));
        }

        delivered
    }
}
