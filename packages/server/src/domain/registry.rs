//! Registry: process-wide index from room name to Room.
//!
//! The registry is a pure name → Room index. It does not broadcast and cannot
//! enumerate rooms; fan-out is the Room's job.
//!
//! Lock order is always registry → room. The registry lock is held only for
//! the lookup/mutation, never across socket I/O.

use std::{collections::HashMap, sync::Arc};

use tokio::sync::Mutex;

use super::{ConnectionId, Member, Room};

#[derive(Debug, Default)]
pub struct Registry {
    rooms: Mutex<HashMap<String, Arc<Room>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the room called `name`, creating an empty one if absent.
    ///
    /// Concurrent calls with the same name always observe the same instance.
    pub async fn resolve_room(&self, name: &str) -> Arc<Room> {
        let mut rooms = self.rooms.lock().await;
        Self::resolve_locked(&mut rooms, name)
    }

    /// Resolve (or create) the room called `name` and add `member` to it.
    ///
    /// Both steps happen under the registry lock, so a concurrent `detach`
    /// cannot drop the room between resolution and insertion.
    pub async fn join(&self, name: &str, member: Member) -> Arc<Room> {
        let mut rooms = self.rooms.lock().await;
        let room = Self::resolve_locked(&mut rooms, name);
        room.add_member(member).await;
        room
    }

    /// Remove connection `id` from the room called `room_name`, and drop the
    /// room from the registry if that left it empty.
    pub async fn detach(&self, room_name: &str, id: ConnectionId) {
        let mut rooms = self.rooms.lock().await;
        let Some(room) = rooms.get(room_name).cloned() else {
            return;
        };

        if room.remove_member(id).await {
            rooms.remove(room_name);
            tracing::info!(room = %room_name, "Room is empty, removed from registry");
        }
    }

    fn resolve_locked(rooms: &mut HashMap<String, Arc<Room>>, name: &str) -> Arc<Room> {
        rooms
            .entry(name.to_string())
            .or_insert_with(|| {
                tracing::info!(room = %name, "Room created");
                Arc::new(Room::new(name))
            })
            .clone()
    }

    #[cfg(test)]
    pub(crate) async fn lookup(&self, name: &str) -> Option<Arc<Room>> {
        self.rooms.lock().await.get(name).cloned()
    }
}
