//! Client wiring.
//!
//! Connects to the authority, resolves the local identity, routes inbound
//! `gameState` into the [`StateStore`], and builds the [`GameLoop`] around
//! host-provided capabilities.

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use arena_shared::{
    config::ClientConfig,
    net::{ServerEvent, EVENT_GAME_STATE},
    render::DrawSurface,
    world::LocalIdentity,
};
use tracing::info;

use crate::{
    channel::{MessageChannel, TcpChannel},
    game_loop::{GameLoop, Host},
    input::InputSource,
    renderer::Renderer,
    scheduler::FrameScheduler,
    status::StatusSink,
    store::StateStore,
};

/// Routes every inbound `gameState` into `store`.
pub fn route_game_state(channel: &dyn MessageChannel, store: Arc<StateStore>) {
    channel.on(
        EVENT_GAME_STATE,
        Box::new(move |event| {
            if let ServerEvent::GameState(snapshot) = event {
                store.put(snapshot.clone());
            }
        }),
    );
}

/// A connected session.
pub struct GameClient {
    pub identity: LocalIdentity,
    pub store: Arc<StateStore>,
    channel: Arc<TcpChannel>,
}

impl GameClient {
    /// Connects, completes the handshake, and starts receiving state.
    pub async fn connect(cfg: &ClientConfig) -> anyhow::Result<Self> {
        let addr: SocketAddr = cfg.server_addr.parse().context("parse server_addr")?;
        let (mut channel, identity) = TcpChannel::connect(addr, &cfg.player_name)
            .await
            .context("connect to authority")?;

        let store = Arc::new(StateStore::new());
        route_game_state(&channel, store.clone());
        channel.start();

        info!(id = %identity.id(), "Client session ready");
        Ok(Self {
            identity,
            store,
            channel: Arc::new(channel),
        })
    }

    pub fn channel(&self) -> Arc<dyn MessageChannel> {
        self.channel.clone()
    }

    pub fn is_connected(&self) -> bool {
        self.channel.is_connected()
    }

    /// Builds the frame loop for this session.
    pub fn game_loop<I, D, K, S>(&self, cfg: &ClientConfig, host: Host<I, D, K, S>) -> GameLoop<I, D, K, S>
    where
        I: InputSource,
        D: DrawSurface,
        K: StatusSink,
        S: FrameScheduler,
    {
        GameLoop::new(
            self.identity.clone(),
            self.store.clone(),
            self.channel(),
            Renderer::new(cfg.jitter_seed),
            host,
        )
    }
}
