//! Transport trait 定義
//!
//! セッションが必要とする「1 クライアントへの順序付き双方向メッセージチャネル」の抽象化。
//! WebSocket による実装は Infrastructure 層が提供します。
//!
//! 読み込み側と書き込み側は別々のタスク（inbound / outbound ループ）が所有するため、
//! trait も 2 つに分かれています。

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

/// One text frame.
///
/// Cloning shares the underlying buffer, so fanning a frame out to a room
/// does not copy the payload per recipient.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Frame(Arc<str>);

impl Frame {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Frame {
    fn from(text: String) -> Self {
        Self(Arc::from(text))
    }
}

impl From<&str> for Frame {
    fn from(text: &str) -> Self {
        Self(Arc::from(text))
    }
}

/// Transport-level failures.
///
/// Never fatal to the process: the owning session logs them and tears the
/// connection down.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("read failed: {0}")]
    Read(String),

    #[error("write failed: {0}")]
    Write(String),

    /// The peer closed with a code other than normal closure or going away.
    #[error("unexpected close (code {code}): {reason}")]
    UnexpectedClose { code: u16, reason: String },
}

/// Inbound half of a client connection.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FrameReader: Send {
    /// Read the next text frame.
    ///
    /// * `Ok(Some(frame))` - a frame arrived
    /// * `Ok(None)` - the peer closed normally (or the stream ended)
    /// * `Err(_)` - read failure or abnormal close
    async fn read_frame(&mut self) -> Result<Option<Frame>, TransportError>;
}

/// Outbound half of a client connection.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FrameWriter: Send {
    /// Write one text frame.
    async fn write_frame(&mut self, frame: Frame) -> Result<(), TransportError>;

    /// Send a close frame and shut the sink. A no-op once already closed.
    async fn close(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_clone_shares_buffer() {
        // テスト項目: Frame の clone はバッファを共有する
        // given (前提条件):
        let frame = Frame::from("hello".to_string());

        // when (操作):
        let cloned = frame.clone();

        // then (期待する結果):
        assert_eq!(cloned, frame);
        assert!(std::ptr::eq(frame.as_str(), cloned.as_str()));
    }
}
