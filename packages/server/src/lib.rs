//! Room-based WebSocket message relay.
//!
//! Clients declare a room with their first message; every later message is
//! fanned out to the other members of that room. Slow consumers are evicted
//! instead of being allowed to stall the room.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;
pub mod error;
