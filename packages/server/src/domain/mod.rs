//! Domain layer
//!
//! ルーム・レジストリ・ワイヤーメッセージと、トランスポートの抽象化（trait）を定義します。
//! 具体的な WebSocket 実装は Infrastructure 層が提供します（依存性の逆転）。

pub mod connection_id;
pub mod message;
pub mod registry;
pub mod room;
pub mod transport;

pub use connection_id::ConnectionId;
pub use message::{Message, MessageType};
pub use registry::Registry;
pub use room::{Member, OUTBOUND_QUEUE_CAPACITY, OutboundQueue, Room};
pub use transport::{Frame, FrameReader, FrameWriter, TransportError};

#[cfg(test)]
pub use transport::{MockFrameReader, MockFrameWriter};
