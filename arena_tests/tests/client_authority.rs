//! Socket-level tests: a real client session against a fake authority.

use std::time::Duration;

use arena_client::{
    input::{InputSignal, QueuedInput},
    scheduler::ManualScheduler,
    status::{StatusBoard, StatusField},
    GameClient, Host, LoopState,
};
use arena_shared::{
    net::ClientEvent,
    render::{NullSurface, RecordingSurface},
    world::{EntityId, PlayerState, WorldSnapshot},
};
use arena_tests::{init_tracing, FakeAuthority, WAIT};

fn me_at(x: f64, y: f64) -> WorldSnapshot {
    let me = PlayerState {
        id: EntityId::new("sock-1"),
        x,
        y,
        facing: 0.0,
        color: "cyan".into(),
        health: 100,
        score: 12,
    };
    WorldSnapshot {
        players: [(me.id.clone(), me)].into_iter().collect(),
        ..Default::default()
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn client_session_round_trip() -> anyhow::Result<()> {
    init_tracing();
    let (authority, cfg) = FakeAuthority::bind().await?;

    let server = tokio::spawn(async move {
        let mut session = authority.accept("sock-1").await?;
        session.send_state(&me_at(100.0, 100.0)).await?;
        let mut seen = Vec::new();
        while seen.len() < 2 {
            seen.push(session.recv().await?);
        }
        Ok::<_, anyhow::Error>(seen)
    });

    let client = GameClient::connect(&cfg).await?;
    assert_eq!(client.identity.id(), &EntityId::new("sock-1"));

    tokio::time::timeout(WAIT, async {
        while !client.store.has_received() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await?;

    let mut game = client.game_loop(
        &cfg,
        Host {
            input: QueuedInput::default(),
            surface: NullSurface {
                width: cfg.surface_width,
                height: cfg.surface_height,
            },
            status: StatusBoard::default(),
            scheduler: ManualScheduler::new(),
        },
    );
    game.host_mut().input.push(InputSignal::Fire);
    game.host_mut()
        .input
        .push(InputSignal::PointerMove { x: 150.0, y: 100.0 });

    let report = game.tick();
    assert_eq!(report.shots, 1);
    assert!(report.moved);
    assert_eq!(game.state(), LoopState::Running);
    assert_eq!(game.host().status.get(StatusField::Score), Some("Score: 12"));

    let seen = server.await??;
    assert_eq!(
        seen,
        vec![
            ClientEvent::PlayerShoot,
            ClientEvent::PlayerMove { rotation: 0.0 }
        ]
    );
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn undecodable_frame_is_skipped() -> anyhow::Result<()> {
    init_tracing();
    let (authority, cfg) = FakeAuthority::bind().await?;

    let server = tokio::spawn(async move {
        let mut session = authority.accept("sock-1").await?;
        session
            .send_raw(&serde_json::json!({ "event": "gameState", "data": { "players": 5 } }))
            .await?;
        session.send_state(&me_at(1.0, 2.0)).await?;
        // Hold the connection open until the client has read both frames.
        let _ = session.recv().await;
        Ok::<_, anyhow::Error>(())
    });

    let client = GameClient::connect(&cfg).await?;
    tokio::time::timeout(WAIT, async {
        while !client.store.has_received() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await?;

    assert_eq!(client.store.updates(), 1);
    let snap = client.store.current().expect("stored snapshot");
    assert_eq!(snap.players[&EntityId::new("sock-1")].y, 2.0);

    client.channel().emit(ClientEvent::PlayerShoot);
    server.await??;
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn dropped_connection_keeps_last_snapshot() -> anyhow::Result<()> {
    init_tracing();
    let (authority, cfg) = FakeAuthority::bind().await?;

    let server = tokio::spawn(async move {
        let mut session = authority.accept("sock-1").await?;
        session.send_state(&me_at(40.0, 60.0)).await?;
        drop(session);
        Ok::<_, anyhow::Error>(())
    });

    let client = GameClient::connect(&cfg).await?;
    server.await??;

    tokio::time::timeout(WAIT, async {
        while client.is_connected() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await?;

    assert_eq!(client.store.updates(), 1);
    let snap = client.store.current().expect("last snapshot retained");
    assert_eq!(snap.players[&EntityId::new("sock-1")].x, 40.0);

    let mut game = client.game_loop(
        &cfg,
        Host {
            input: QueuedInput::default(),
            surface: RecordingSurface::new(cfg.surface_width, cfg.surface_height),
            status: StatusBoard::default(),
            scheduler: ManualScheduler::new(),
        },
    );
    game.host_mut().input.push(InputSignal::Fire);
    let report = game.tick();
    assert!(report.painted);
    assert!(report.moved);
    assert_eq!(report.shots, 1);
    assert!(!game.host().surface.is_empty());

    // Emitting into a closed connection is dropped quietly.
    client.channel().emit(ClientEvent::PlayerShoot);
    let again = game.tick();
    assert!(again.painted);
    assert_eq!(client.store.updates(), 1);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn state_before_welcome_is_skipped_by_handshake() -> anyhow::Result<()> {
    init_tracing();
    let (authority, cfg) = FakeAuthority::bind().await?;

    let server = tokio::spawn(async move {
        let early = me_at(-1.0, -1.0);
        let mut session = authority
            .accept_with_early_state("sock-1", Some(&early))
            .await?;
        session.send_state(&me_at(5.0, 6.0)).await?;
        let _ = session.recv().await;
        Ok::<_, anyhow::Error>(())
    });

    let client = GameClient::connect(&cfg).await?;
    assert_eq!(client.identity.id(), &EntityId::new("sock-1"));

    tokio::time::timeout(WAIT, async {
        while !client.store.has_received() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await?;

    // Only the post-welcome state reaches the store.
    assert_eq!(client.store.updates(), 1);
    let snap = client.store.current().expect("stored snapshot");
    assert_eq!(snap.players[&EntityId::new("sock-1")].x, 5.0);

    client.channel().emit(ClientEvent::PlayerShoot);
    server.await??;
    Ok(())
}
