//! UseCase layer
//!
//! 1 接続分のセッション（参加 → 中継 → 切断）を扱います。

mod error;
mod session;

pub use error::JoinError;
pub use session::{inbound_loop, outbound_loop, read_join_message, run_session};
