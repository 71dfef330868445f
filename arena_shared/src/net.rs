//! Wire protocol.
//!
//! Every message is a JSON object `{"event": <name>, "data": <payload>}`.
//! Over TCP each object travels in a frame prefixed by its length as a
//! big-endian `u32`.
//!
//! Delivery is best effort: nothing is acknowledged or retried, because each
//! `gameState` is superseded by the next one anyway.

use anyhow::Context;
use bytes::{BufMut, Bytes, BytesMut};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::{
    io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt},
    net::{
        tcp::{OwnedReadHalf, OwnedWriteHalf},
        TcpStream,
    },
};

use crate::world::{EntityId, WorldSnapshot};

/// Protocol version announced in `hello`.
pub const PROTOCOL_VERSION: u32 = 1;

/// Frames larger than this are treated as a broken stream.
pub const MAX_FRAME_LEN: usize = 16 * 1024 * 1024;

pub const EVENT_WELCOME: &str = "welcome";
pub const EVENT_GAME_STATE: &str = "gameState";

/// Client -> authority.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ClientEvent {
    /// Opens the session; answered by `welcome`.
    Hello { protocol: u32, name: String },
    /// One discrete fire input.
    PlayerShoot,
    /// Desired heading, sent every tick while the local ship exists.
    PlayerMove { rotation: f64 },
}

impl ClientEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ClientEvent::Hello { .. } => "hello",
            ClientEvent::PlayerShoot => "playerShoot",
            ClientEvent::PlayerMove { .. } => "playerMove",
        }
    }
}

/// Authority -> client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerEvent {
    /// Assigns this client its identity.
    Welcome { id: EntityId },
    /// Full world state; replaces whatever the client held.
    GameState(WorldSnapshot),
}

impl ServerEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ServerEvent::Welcome { .. } => EVENT_WELCOME,
            ServerEvent::GameState(_) => EVENT_GAME_STATE,
        }
    }
}

/// Writes one length-prefixed JSON frame.
pub async fn write_frame<W, T>(w: &mut W, msg: &T) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
    T: Serialize,
{
    let payload = serde_json::to_vec(msg).context("serialize msg")?;
    let mut buf = BytesMut::with_capacity(4 + payload.len());
    buf.put_u32(payload.len() as u32);
    buf.extend_from_slice(&payload);
    w.write_all(&buf).await.context("tcp write")?;
    Ok(())
}

/// Reads the payload of one frame without decoding it.
pub async fn read_frame<R>(r: &mut R) -> anyhow::Result<Bytes>
where
    R: AsyncRead + Unpin,
{
    let mut len_buf = [0u8; 4];
    r.read_exact(&mut len_buf).await.context("tcp read len")?;
    let len = u32::from_be_bytes(len_buf) as usize;
    anyhow::ensure!(len <= MAX_FRAME_LEN, "frame of {len} bytes exceeds limit");
    let mut payload = vec![0u8; len];
    r.read_exact(&mut payload)
        .await
        .context("tcp read payload")?;
    Ok(Bytes::from(payload))
}

/// Framed JSON connection over TCP.
#[derive(Debug)]
pub struct FramedConn {
    stream: TcpStream,
}

impl FramedConn {
    pub fn new(stream: TcpStream) -> Self {
        Self { stream }
    }

    pub async fn connect(addr: SocketAddr) -> anyhow::Result<Self> {
        let stream = TcpStream::connect(addr).await.context("tcp connect")?;
        stream.set_nodelay(true).context("set nodelay")?;
        Ok(Self::new(stream))
    }

    pub async fn send<T: Serialize>(&mut self, msg: &T) -> anyhow::Result<()> {
        write_frame(&mut self.stream, msg).await
    }

    pub async fn recv<T: DeserializeOwned>(&mut self) -> anyhow::Result<T> {
        let payload = read_frame(&mut self.stream).await?;
        decode(&payload)
    }

    /// Splits into halves that can live on separate tasks.
    pub fn into_split(self) -> (FrameReader, FrameWriter) {
        let (read, write) = self.stream.into_split();
        (FrameReader { half: read }, FrameWriter { half: write })
    }
}

/// Receiving half of a [`FramedConn`].
#[derive(Debug)]
pub struct FrameReader {
    half: OwnedReadHalf,
}

impl FrameReader {
    pub async fn recv_raw(&mut self) -> anyhow::Result<Bytes> {
        read_frame(&mut self.half).await
    }
}

/// Sending half of a [`FramedConn`].
#[derive(Debug)]
pub struct FrameWriter {
    half: OwnedWriteHalf,
}

impl FrameWriter {
    pub async fn send<T: Serialize>(&mut self, msg: &T) -> anyhow::Result<()> {
        write_frame(&mut self.half, msg).await
    }
}

pub fn decode<T: DeserializeOwned>(b: &[u8]) -> anyhow::Result<T> {
    serde_json::from_slice(b).context("deserialize")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn client_events_use_named_envelope() {
        let shoot = serde_json::to_value(ClientEvent::PlayerShoot).unwrap();
        assert_eq!(shoot, json!({ "event": "playerShoot" }));

        let mv = serde_json::to_value(ClientEvent::PlayerMove { rotation: 0.5 }).unwrap();
        assert_eq!(mv, json!({ "event": "playerMove", "data": { "rotation": 0.5 } }));
    }

    #[test]
    fn game_state_decodes_from_envelope() {
        let raw = br#"{"event":"gameState","data":{"players":{},"projectiles":[{"x":3,"y":4}],"obstacles":[]}}"#;
        let ev: ServerEvent = decode(raw).unwrap();
        assert_eq!(ev.name(), EVENT_GAME_STATE);
        match ev {
            ServerEvent::GameState(snap) => assert_eq!(snap.projectiles.len(), 1),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn frames_survive_a_byte_pipe() {
        let (mut a, mut b) = tokio::io::duplex(256);
        let msg = ServerEvent::Welcome {
            id: EntityId::new("p1"),
        };
        write_frame(&mut a, &msg).await.unwrap();
        let raw = read_frame(&mut b).await.unwrap();
        assert_eq!(decode::<ServerEvent>(&raw).unwrap(), msg);
    }

    #[tokio::test]
    async fn oversized_frame_is_rejected() {
        let (mut a, mut b) = tokio::io::duplex(16);
        a.write_all(&(MAX_FRAME_LEN as u32 + 1).to_be_bytes())
            .await
            .unwrap();
        assert!(read_frame(&mut b).await.is_err());
    }
}
