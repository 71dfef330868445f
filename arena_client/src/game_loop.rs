//! Per-frame loop.
//!
//! One tick: drain input (forwarding fire intents), send the heading if the
//! local ship exists, paint, update the status line, then ask the scheduler
//! for the next tick.
//!
//! The snapshot `Arc` is read from the store once at the top of the tick and
//! used for every step, so a snapshot landing mid-tick shows up next tick.

use std::sync::Arc;

use arena_shared::{net::ClientEvent, render::DrawSurface, world::LocalIdentity};
use tracing::{info, trace};

use crate::{
    channel::MessageChannel,
    input::{InputCapture, InputSource},
    renderer::Renderer,
    scheduler::FrameScheduler,
    status::{self, StatusSink},
    store::StateStore,
};

/// Whether any snapshot has been seen yet. Never goes back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    AwaitingFirstState,
    Running,
}

/// Host-provided capabilities the loop drives.
pub struct Host<I, D, K, S> {
    pub input: I,
    pub surface: D,
    pub status: K,
    pub scheduler: S,
}

/// What one tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickReport {
    /// `playerShoot` events emitted.
    pub shots: usize,
    /// Whether `playerMove` was emitted.
    pub moved: bool,
    pub painted: bool,
    pub status_updated: bool,
}

pub struct GameLoop<I, D, K, S> {
    identity: LocalIdentity,
    store: Arc<StateStore>,
    channel: Arc<dyn MessageChannel>,
    input: InputCapture,
    renderer: Renderer,
    host: Host<I, D, K, S>,
    state: LoopState,
    ticks: u64,
}

impl<I, D, K, S> GameLoop<I, D, K, S>
where
    I: InputSource,
    D: DrawSurface,
    K: StatusSink,
    S: FrameScheduler,
{
    pub fn new(
        identity: LocalIdentity,
        store: Arc<StateStore>,
        channel: Arc<dyn MessageChannel>,
        renderer: Renderer,
        host: Host<I, D, K, S>,
    ) -> Self {
        Self {
            identity,
            store,
            channel,
            input: InputCapture::default(),
            renderer,
            host,
            state: LoopState::AwaitingFirstState,
            ticks: 0,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn identity(&self) -> &LocalIdentity {
        &self.identity
    }

    pub fn input(&self) -> &InputCapture {
        &self.input
    }

    pub fn host(&self) -> &Host<I, D, K, S> {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut Host<I, D, K, S> {
        &mut self.host
    }

    /// Runs one tick.
    pub fn tick(&mut self) -> TickReport {
        let snapshot = self.store.current();
        if self.state == LoopState::AwaitingFirstState && snapshot.is_some() {
            self.state = LoopState::Running;
            info!(id = %self.identity.id(), "First world state received");
        }

        let mut report = TickReport::default();

        for signal in self.host.input.drain() {
            if let Some(intent) = self.input.apply(signal) {
                self.channel.emit(intent);
                report.shots += 1;
            }
        }

        if let Some(me) = snapshot
            .as_deref()
            .and_then(|snap| snap.local_player(&self.identity))
        {
            let rotation = self.input.compute_aim_direction(me);
            self.channel.emit(ClientEvent::PlayerMove { rotation });
            report.moved = true;
        }

        report.painted = self
            .renderer
            .render(snapshot.as_deref(), &mut self.host.surface);

        if let Some(snap) = snapshot.as_deref() {
            report.status_updated = status::project_into(snap, &self.identity, &mut self.host.status);
        }

        self.host.scheduler.request_tick();
        self.ticks += 1;
        trace!(tick = self.ticks, ?report, "Tick");
        report
    }

    /// Ticks once, then keeps ticking for as long as the scheduler delivers.
    /// Returns the total tick count.
    pub async fn run(&mut self) -> u64 {
        self.tick();
        while self.host.scheduler.next_tick().await {
            self.tick();
        }
        self.ticks
    }
}
