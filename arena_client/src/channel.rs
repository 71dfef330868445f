//! Message channel to the remote authority.
//!
//! The core only needs two things from a transport: fire-and-forget `emit`
//! and name-keyed `on` registration. [`TcpChannel`] provides them over a
//! framed TCP stream; [`RecordingChannel`] provides them in memory.
//!
//! Reconnection and retry are not handled here. When the stream drops the
//! reader stops and the client keeps showing the last snapshot it got.

use std::{
    net::SocketAddr,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use anyhow::Context;
use arena_shared::{
    event::{EventDispatcher, Handler},
    net::{decode, ClientEvent, FrameReader, FramedConn, ServerEvent, PROTOCOL_VERSION},
    world::LocalIdentity,
};
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{debug, info, trace, warn};

/// How long the handshake may take before `connect` gives up.
pub const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(5);

/// Bidirectional event transport.
///
/// Handlers run on the transport's delivery task and must not call back into
/// `on` of the same channel.
pub trait MessageChannel: Send + Sync {
    /// Queues an event for the authority. Never blocks; best effort.
    fn emit(&self, event: ClientEvent);

    /// Registers `handler` for inbound events named `name`.
    fn on(&self, name: &'static str, handler: Handler);
}

/// Framed-JSON channel over TCP.
pub struct TcpChannel {
    outgoing: mpsc::UnboundedSender<ClientEvent>,
    dispatcher: Arc<Mutex<EventDispatcher>>,
    connected: Arc<AtomicBool>,
    reader: Option<FrameReader>,
    tasks: Vec<JoinHandle<()>>,
}

impl TcpChannel {
    /// Connects and performs the `hello`/`welcome` handshake.
    ///
    /// Outbound traffic flows immediately. Inbound events are not read until
    /// [`TcpChannel::start`] so handlers can be registered first.
    pub async fn connect(addr: SocketAddr, name: &str) -> anyhow::Result<(Self, LocalIdentity)> {
        Self::connect_within(addr, name, HANDSHAKE_TIMEOUT).await
    }

    /// [`TcpChannel::connect`] with an explicit handshake deadline.
    pub async fn connect_within(
        addr: SocketAddr,
        name: &str,
        handshake_timeout: Duration,
    ) -> anyhow::Result<(Self, LocalIdentity)> {
        info!(server = %addr, "Connecting to authority");
        let mut conn = FramedConn::connect(addr).await?;

        conn.send(&ClientEvent::Hello {
            protocol: PROTOCOL_VERSION,
            name: name.to_string(),
        })
        .await?;

        let identity = tokio::time::timeout(handshake_timeout, async {
            loop {
                match conn.recv::<ServerEvent>().await? {
                    ServerEvent::Welcome { id } => break Ok::<_, anyhow::Error>(id),
                    other => debug!(event = other.name(), "Ignoring event before welcome"),
                }
            }
        })
        .await
        .context("handshake timed out")??;

        info!(id = %identity, "Handshake complete");

        let (reader, mut writer) = conn.into_split();
        let (outgoing, mut rx) = mpsc::unbounded_channel::<ClientEvent>();
        let connected = Arc::new(AtomicBool::new(true));

        let writer_connected = connected.clone();
        let writer_task = tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                trace!(event = event.name(), "Sending");
                if let Err(e) = writer.send(&event).await {
                    warn!(error = %e, "Send failed, closing writer");
                    break;
                }
            }
            writer_connected.store(false, Ordering::Relaxed);
        });

        Ok((
            Self {
                outgoing,
                dispatcher: Arc::new(Mutex::new(EventDispatcher::default())),
                connected,
                reader: Some(reader),
                tasks: vec![writer_task],
            },
            LocalIdentity::new(identity),
        ))
    }

    /// Starts delivering inbound events to registered handlers. Calling it
    /// again has no effect.
    pub fn start(&mut self) {
        let Some(mut reader) = self.reader.take() else {
            return;
        };
        let dispatcher = self.dispatcher.clone();
        let connected = self.connected.clone();
        self.tasks.push(tokio::spawn(async move {
            loop {
                let payload = match reader.recv_raw().await {
                    Ok(p) => p,
                    Err(e) => {
                        info!(error = %e, "Connection to authority closed");
                        break;
                    }
                };
                match decode::<ServerEvent>(&payload) {
                    Ok(event) => {
                        let handled = dispatcher
                            .lock()
                            .unwrap_or_else(|e| e.into_inner())
                            .dispatch(&event);
                        trace!(event = event.name(), handled, "Received");
                    }
                    Err(e) => warn!(error = %e, len = payload.len(), "Dropping undecodable frame"),
                }
            }
            connected.store(false, Ordering::Relaxed);
        }));
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Relaxed)
    }
}

impl MessageChannel for TcpChannel {
    fn emit(&self, event: ClientEvent) {
        if self.outgoing.send(event).is_err() {
            trace!("Writer gone, dropping event");
        }
    }

    fn on(&self, name: &'static str, handler: Handler) {
        self.dispatcher
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .on(name, handler);
    }
}

impl Drop for TcpChannel {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}

/// In-memory channel: remembers what was emitted and lets the caller deliver
/// inbound events by hand.
#[derive(Default)]
pub struct RecordingChannel {
    emitted: Mutex<Vec<ClientEvent>>,
    dispatcher: Mutex<EventDispatcher>,
}

impl RecordingChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything emitted so far, oldest first.
    pub fn emitted(&self) -> Vec<ClientEvent> {
        self.emitted
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Drains the emitted list.
    pub fn take(&self) -> Vec<ClientEvent> {
        std::mem::take(&mut *self.emitted.lock().unwrap_or_else(|e| e.into_inner()))
    }

    /// Runs the handlers registered for `event`. Returns how many ran.
    pub fn deliver(&self, event: ServerEvent) -> usize {
        self.dispatcher
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .dispatch(&event)
    }
}

impl MessageChannel for RecordingChannel {
    fn emit(&self, event: ClientEvent) {
        self.emitted
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(event);
    }

    fn on(&self, name: &'static str, handler: Handler) {
        self.dispatcher
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .on(name, handler);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_shared::{
        net::EVENT_GAME_STATE,
        world::{EntityId, WorldSnapshot},
    };
    use tokio::net::TcpListener;

    #[test]
    fn recording_channel_keeps_order() {
        let ch = RecordingChannel::new();
        ch.emit(ClientEvent::PlayerShoot);
        ch.emit(ClientEvent::PlayerMove { rotation: 1.0 });
        assert_eq!(
            ch.take(),
            vec![ClientEvent::PlayerShoot, ClientEvent::PlayerMove { rotation: 1.0 }]
        );
        assert!(ch.emitted().is_empty());
    }

    #[tokio::test]
    async fn tcp_handshake_resolves_identity_and_relays_events() -> anyhow::Result<()> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let authority = tokio::spawn(async move {
            let (stream, _) = listener.accept().await?;
            let mut conn = FramedConn::new(stream);
            let hello: ClientEvent = conn.recv().await?;
            assert_eq!(hello.name(), "hello");
            conn.send(&ServerEvent::Welcome {
                id: EntityId::new("p-7"),
            })
            .await?;
            let shot: ClientEvent = conn.recv().await?;
            conn.send(&ServerEvent::GameState(WorldSnapshot::default()))
                .await?;
            Ok::<_, anyhow::Error>(shot)
        });

        let (mut channel, identity) = TcpChannel::connect(addr, "tester").await?;
        assert_eq!(identity.id(), &EntityId::new("p-7"));

        let (tx, mut rx) = mpsc::unbounded_channel();
        channel.on(
            EVENT_GAME_STATE,
            Box::new(move |ev| {
                let _ = tx.send(ev.clone());
            }),
        );
        channel.start();
        channel.emit(ClientEvent::PlayerShoot);

        assert_eq!(authority.await??, ClientEvent::PlayerShoot);
        let got = rx.recv().await.context("no gameState delivered")?;
        assert_eq!(got, ServerEvent::GameState(WorldSnapshot::default()));
        Ok(())
    }

    #[tokio::test]
    async fn silent_authority_times_out_handshake() -> anyhow::Result<()> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let authority = tokio::spawn(async move {
            let (stream, _) = listener.accept().await?;
            let mut conn = FramedConn::new(stream);
            let _hello: ClientEvent = conn.recv().await?;
            // Never answer; hold the socket until the client gives up.
            let _ = conn.recv::<ClientEvent>().await;
            Ok::<_, anyhow::Error>(())
        });

        let result = TcpChannel::connect_within(addr, "tester", Duration::from_millis(100)).await;
        let err = result.err().context("connect should fail")?;
        assert!(format!("{err:#}").contains("handshake timed out"));

        authority.await??;
        Ok(())
    }
}
