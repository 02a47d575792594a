use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

const RECV_TIMEOUT: Duration = Duration::from_secs(2);

pub struct WebSocketClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl WebSocketClient {
    /// Connect, retrying until the server accepts or `timeout` passes.
    pub async fn connect_retry(
        url: &str,
        timeout: Duration,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let start = tokio::time::Instant::now();
        loop {
            match connect_async(url).await {
                Ok((stream, _)) => return Ok(Self { stream }),
                Err(err) => {
                    if start.elapsed() >= timeout {
                        return Err(Box::new(err));
                    }
                    tokio::time::sleep(Duration::from_millis(5)).await;
                }
            }
        }
    }

    pub async fn send_json(&mut self, value: &Value) -> Result<(), Box<dyn std::error::Error>> {
        self.stream.send(Message::Text(value.to_string().into())).await?;
        Ok(())
    }

    /// Next text frame as JSON; `None` if the server closed the socket.
    pub async fn recv_json(&mut self) -> Result<Option<Value>, Box<dyn std::error::Error>> {
        loop {
            let next = tokio::time::timeout(RECV_TIMEOUT, self.stream.next())
                .await
                .map_err(|_| "timeout waiting for message")?;
            match next {
                Some(Ok(Message::Text(text))) => return Ok(Some(serde_json::from_str(&text)?)),
                Some(Ok(Message::Ping(_) | Message::Pong(_))) => continue,
                Some(Ok(Message::Close(_))) | None => return Ok(None),
                Some(Ok(other)) => return Err(format!("unexpected frame: {other:?}").into()),
                Some(Err(e)) => return Err(e.into()),
            }
        }
    }

    /// Next message, which must be of `kind`.
    pub async fn expect(&mut self, kind: &str) -> Result<Value, Box<dyn std::error::Error>> {
        let msg = self
            .recv_json()
            .await?
            .ok_or_else(|| format!("socket closed while waiting for {kind}"))?;
        if msg["type"] != kind {
            return Err(format!("expected {kind}, got {msg}").into());
        }
        Ok(msg)
    }

    /// True if nothing arrives within `window`.
    pub async fn is_quiet(&mut self, window: Duration) -> bool {
        tokio::time::timeout(window, self.stream.next()).await.is_err()
    }

    pub async fn hello(&mut self) -> Result<Value, Box<dyn std::error::Error>> {
        self.send_json(&json!({"type": "hello", "protocol": 1})).await?;
        self.expect("hello_ack").await
    }

    pub async fn close(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.stream.close(None).await?;
        Ok(())
    }
}
