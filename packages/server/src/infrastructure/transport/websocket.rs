//! WebSocket を使った FrameReader / FrameWriter 実装
//!
//! ## 責務
//!
//! - WebSocket の制御フレーム（ping/pong/close）をドメインの読み書きに変換する
//! - 正常なクローズ（1000 / 1001、クローズフレームなしの切断）と異常なクローズを区別する
//!
//! axum の `WebSocket` は `split()` で送受信に分割し、受信側を inbound ループ、
//! 送信側を outbound ループがそれぞれ所有します。

use std::fmt::Display;

use async_trait::async_trait;
use axum::extract::ws::{CloseFrame, Message, close_code};
use futures_util::{Sink, SinkExt, Stream, StreamExt};

use crate::domain::{Frame, FrameReader, FrameWriter, TransportError};

/// Receiving half of a WebSocket.
pub struct WebSocketFrameReader<S> {
    stream: S,
}

impl<S> WebSocketFrameReader<S> {
    pub fn new(stream: S) -> Self {
        Self { stream }
    }
}

#[async_trait]
impl<S> FrameReader for WebSocketFrameReader<S>
where
    S: Stream<Item = Result<Message, axum::Error>> + Unpin + Send,
{
    async fn read_frame(&mut self) -> Result<Option<Frame>, TransportError> {
        while let Some(msg) = self.stream.next().await {
            let msg = msg.map_err(|e| TransportError::Read(e.to_string()))?;
            match msg {
                Message::Text(text) => return Ok(Some(Frame::from(text.as_str()))),
                Message::Binary(bytes) => match String::from_utf8(bytes.to_vec()) {
                    Ok(text) => return Ok(Some(Frame::from(text))),
                    Err(e) => {
                        tracing::warn!("Skipping binary frame that is not UTF-8: {}", e);
                    }
                },
                Message::Ping(_) | Message::Pong(_) => {
                    // axum answers pings itself
                    tracing::trace!("Received ping/pong");
                }
                Message::Close(frame) => return close_result(frame),
            }
        }

        // Stream ended without a close frame (abnormal closure, 1006)
        Ok(None)
    }
}

fn close_result(frame: Option<CloseFrame>) -> Result<Option<Frame>, TransportError> {
    match frame {
        None => Ok(None),
        Some(frame) if frame.code == close_code::NORMAL || frame.code == close_code::AWAY => {
            Ok(None)
        }
        Some(frame) => Err(TransportError::UnexpectedClose {
            code: frame.code,
            reason: frame.reason.as_str().to_string(),
        }),
    }
}

/// Sending half of a WebSocket.
pub struct WebSocketFrameWriter<S> {
    sink: S,
    closed: bool,
}

impl<S> WebSocketFrameWriter<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            closed: false,
        }
    }
}

#[async_trait]
impl<S> FrameWriter for WebSocketFrameWriter<S>
where
    S: Sink<Message> + Unpin + Send,
    S::Error: Display + Send,
{
    async fn write_frame(&mut self, frame: Frame) -> Result<(), TransportError> {
        if self.closed {
            return Err(TransportError::Write("socket already closed".to_string()));
        }
        self.sink
            .send(Message::Text(frame.as_str().into()))
            .await
            .map_err(|e| TransportError::Write(e.to_string()))
    }

    async fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;

        if let Err(e) = self.sink.send(Message::Close(None)).await {
            tracing::debug!("Failed to send close frame: {}", e);
        }
        if let Err(e) = self.sink.close().await {
            tracing::debug!("Failed to close socket: {}", e);
        }
    }
}
