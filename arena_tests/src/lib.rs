//! Test harness shared by the integration tests.
//!
//! [`FakeAuthority`] plays the remote side of the protocol on an ephemeral
//! port: it answers the handshake, pushes snapshots, and hands back whatever
//! the client emits.

use std::{net::SocketAddr, time::Duration};

use anyhow::Context;
use arena_shared::{
    config::ClientConfig,
    net::{ClientEvent, FramedConn, ServerEvent, PROTOCOL_VERSION},
    world::{EntityId, WorldSnapshot},
};
use tokio::net::TcpListener;
use tracing::debug;

/// Upper bound on any single wait in these tests.
pub const WAIT: Duration = Duration::from_secs(5);

/// Installs a test-friendly subscriber once per process.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("info")
        .with_test_writer()
        .try_init();
}

pub struct FakeAuthority {
    listener: TcpListener,
}

impl FakeAuthority {
    /// Binds to an ephemeral localhost port and returns a client config
    /// pointing at it.
    pub async fn bind() -> anyhow::Result<(Self, ClientConfig)> {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .context("bind fake authority")?;
        let addr: SocketAddr = listener.local_addr()?;
        let cfg = ClientConfig {
            server_addr: addr.to_string(),
            jitter_seed: Some(11),
            player_name: "tester".into(),
            ..ClientConfig::default()
        };
        Ok((Self { listener }, cfg))
    }

    /// Accepts one client and completes the handshake, assigning `id`.
    pub async fn accept(&self, id: &str) -> anyhow::Result<AuthoritySession> {
        self.accept_with_early_state(id, None).await
    }

    /// Like [`FakeAuthority::accept`], but pushes `early` between `hello` and
    /// `welcome`, as an authority already broadcasting state might.
    pub async fn accept_with_early_state(
        &self,
        id: &str,
        early: Option<&WorldSnapshot>,
    ) -> anyhow::Result<AuthoritySession> {
        let (stream, peer) = self.listener.accept().await.context("accept")?;
        let mut conn = FramedConn::new(stream);
        match conn.recv::<ClientEvent>().await? {
            ClientEvent::Hello { protocol, name } => {
                anyhow::ensure!(protocol == PROTOCOL_VERSION, "protocol {protocol}");
                debug!(%peer, %name, "Fake authority accepted client");
            }
            other => anyhow::bail!("expected hello, got {other:?}"),
        }
        if let Some(snapshot) = early {
            conn.send(&ServerEvent::GameState(snapshot.clone())).await?;
        }
        conn.send(&ServerEvent::Welcome {
            id: EntityId::new(id),
        })
        .await?;
        Ok(AuthoritySession { conn })
    }
}

/// The authority's end of one client connection.
pub struct AuthoritySession {
    conn: FramedConn,
}

impl AuthoritySession {
    pub async fn send_state(&mut self, snapshot: &WorldSnapshot) -> anyhow::Result<()> {
        self.conn
            .send(&ServerEvent::GameState(snapshot.clone()))
            .await
    }

    /// Next event from the client, or an error after [`WAIT`].
    pub async fn recv(&mut self) -> anyhow::Result<ClientEvent> {
        tokio::time::timeout(WAIT, self.conn.recv())
            .await
            .context("timed out waiting for client event")?
    }

    /// Sends a raw frame body, bypassing serialization.
    pub async fn send_raw(&mut self, body: &serde_json::Value) -> anyhow::Result<()> {
        self.conn.send(body).await
    }
}
