//! UseCase: 接続セッション
//!
//! One client connection moves through `Joining → Active → Closing → Closed`:
//!
//! 1. **Joining**: exactly one frame is read to learn the room and display name.
//!    It is not relayed; the room gets a join notice instead.
//! 2. **Active**: two loops run concurrently.
//!    - inbound: socket → room broadcast (this task)
//!    - outbound: bounded queue → socket (spawned task)
//! 3. **Closing**: when the inbound loop ends, the connection detaches from the
//!    registry and signals the outbound loop, which abandons any pending write,
//!    sends a close frame and ends.
//!
//! The outbound loop also ends on its own after a write failure, or when the
//! room evicts the connection for not draining its queue.

use std::{sync::Arc, time::Duration};

use tokio::{
    sync::{mpsc, oneshot},
    time::timeout,
};

use crate::domain::{
    ConnectionId, Frame, FrameReader, FrameWriter, Member, Message, OUTBOUND_QUEUE_CAPACITY,
    Registry, Room,
};

use super::error::JoinError;

/// How long a close frame may take before the socket is dropped without one.
const CLOSE_TIMEOUT: Duration = Duration::from_secs(1);

/// Drive one client connection from join to teardown.
///
/// Errors never escape: they are logged and end this connection only.
pub async fn run_session<R, W>(registry: Arc<Registry>, mut reader: R, mut writer: W)
where
    R: FrameReader,
    W: FrameWriter + 'static,
{
    let join = match read_join_message(&mut reader).await {
        Ok(join) => join,
        Err(e) => {
            tracing::warn!("Initial message read error: {}", e);
            writer.close().await;
            return;
        }
    };

    let id = ConnectionId::new();
    let (tx, rx) = mpsc::channel(OUTBOUND_QUEUE_CAPACITY);
    let room = registry
        .join(&join.room, Member::new(id, join.name.clone(), tx))
        .await;
    tracing::info!(
        connection_id = %id,
        room = %join.room,
        name = %join.name,
        "Client joined"
    );
    room.announce_join(id, &join.name).await;

    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let outbound = tokio::spawn(outbound_loop(id, rx, writer, shutdown_rx));

    inbound_loop(id, &mut reader, &room).await;

    registry.detach(room.name(), id).await;
    drop(reader);
    tracing::info!(connection_id = %id, room = %join.room, "Client disconnected");

    // The outbound task may already be gone (write failure or eviction).
    let _ = shutdown_tx.send(());
    if let Err(e) = outbound.await {
        tracing::error!(connection_id = %id, "Outbound task failed: {}", e);
    }
}

/// Read the mandatory first frame of a connection.
pub async fn read_join_message<R>(reader: &mut R) -> Result<Message, JoinError>
where
    R: FrameReader + ?Sized,
{
    let frame = reader.read_frame().await?.ok_or(JoinError::Closed)?;
    Ok(Message::parse(frame.as_str())?)
}

/// Relay frames read from the client to the rest of its room.
///
/// Frames that do not parse as a wire message are logged and dropped; the
/// loop keeps going. Returns when the peer closes or the read fails.
pub async fn inbound_loop<R>(id: ConnectionId, reader: &mut R, room: &Room)
where
    R: FrameReader + ?Sized,
{
    loop {
        let frame = match reader.read_frame().await {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                tracing::debug!(connection_id = %id, "Client closed the connection");
                break;
            }
            Err(e) => {
                tracing::warn!(connection_id = %id, "error: {}", e);
                break;
            }
        };

        let message = match Message::parse(frame.as_str()) {
            Ok(message) => message,
            Err(e) => {
                tracing::warn!(connection_id = %id, "Dropping malformed frame: {}", e);
                continue;
            }
        };

        tracing::info!(
            connection_id = %id,
            name = %message.name,
            room = %message.room,
            content = %message.content,
            "Received from client"
        );
        let delivered = room.broadcast(id, frame).await;
        tracing::debug!(connection_id = %id, delivered, "Relayed frame");
    }
}

/// Write queued frames to the client until the queue closes, a write fails,
/// or `shutdown` fires.
///
/// A closed queue or a shutdown gets a close frame; a failed write ends the
/// loop without touching the socket again. A shutdown also cancels a write
/// that is stuck on a peer that stopped reading.
pub async fn outbound_loop<W>(
    id: ConnectionId,
    mut rx: mpsc::Receiver<Frame>,
    mut writer: W,
    mut shutdown: oneshot::Receiver<()>,
) where
    W: FrameWriter,
{
    loop {
        let frame = tokio::select! {
            biased;
            _ = &mut shutdown => break,
            frame = rx.recv() => match frame {
                Some(frame) => frame,
                None => {
                    tracing::debug!(connection_id = %id, "Outbound queue closed");
                    break;
                }
            },
        };

        let written = tokio::select! {
            biased;
            _ = &mut shutdown => {
                tracing::debug!(connection_id = %id, "Shutdown while a write was pending");
                break;
            }
            written = writer.write_frame(frame) => written,
        };
        if let Err(e) = written {
            tracing::warn!(connection_id = %id, "Failed to write frame: {}", e);
            return;
        }
    }

    tracing::debug!(connection_id = %id, "Sending close frame");
    if timeout(CLOSE_TIMEOUT, writer.close()).await.is_err() {
        tracing::warn!(connection_id = %id, "Timed out closing the socket, dropping it");
    }
}
