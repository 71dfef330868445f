//! Standalone client binary.
//!
//! Usage:
//!   cargo run -p arena_client -- [--config client.json] [--addr 127.0.0.1:40000]
//!       [--hz 60] [--width 800] [--height 600] [--seed 42] [--name Player]
//!
//! Connects to the authority and runs the frame loop headless. Input comes
//! from the console:
//!   key <name> down|up  - Press/release a key
//!   aim <x> <y>         - Move the pointer
//!   fire                - Shoot once
//!   status              - Show the status line
//!   quit                - Exit client

use std::env;
use std::io::{BufRead, Write};
use std::sync::{Arc, Mutex};

use anyhow::Context;
use arena_client::{
    console::{parse_line, ConsoleCommand},
    input::ChannelInput,
    scheduler::IntervalScheduler,
    status::StatusBoard,
    GameClient, Host,
};
use arena_shared::{config::ClientConfig, render::NullSurface};
use tokio::sync::oneshot;
use tracing::{info, warn};

fn parse_args() -> anyhow::Result<ClientConfig> {
    let args: Vec<String> = env::args().collect();

    let mut cfg = match args.iter().position(|a| a == "--config") {
        Some(i) if i + 1 < args.len() => {
            let text = std::fs::read_to_string(&args[i + 1])
                .with_context(|| format!("read config {}", args[i + 1]))?;
            ClientConfig::from_json_str(&text).context("parse config")?
        }
        _ => ClientConfig::default(),
    };

    let mut i = 1;
    while i < args.len() {
        let value = args.get(i + 1);
        match (args[i].as_str(), value) {
            ("--addr", Some(v)) => cfg.server_addr = v.clone(),
            ("--hz", Some(v)) => cfg.refresh_hz = v.parse().context("--hz")?,
            ("--width", Some(v)) => cfg.surface_width = v.parse().context("--width")?,
            ("--height", Some(v)) => cfg.surface_height = v.parse().context("--height")?,
            ("--seed", Some(v)) => cfg.jitter_seed = Some(v.parse().context("--seed")?),
            ("--name", Some(v)) => cfg.player_name = v.clone(),
            ("--config", Some(_)) => {}
            _ => {
                i += 1;
                continue;
            }
        }
        i += 2;
    }
    Ok(cfg)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cfg = parse_args()?;
    info!(
        server = %cfg.server_addr,
        refresh_hz = cfg.refresh_hz,
        width = cfg.surface_width,
        height = cfg.surface_height,
        "Starting client"
    );

    let client = GameClient::connect(&cfg).await.context("connect")?;

    let (input_tx, input) = ChannelInput::new();
    let status = Arc::new(Mutex::new(StatusBoard::default()));
    let (quit_tx, quit_rx) = oneshot::channel::<()>();

    // Console reader thread.
    {
        let status = status.clone();
        let store = client.store.clone();
        std::thread::spawn(move || {
            let stdin = std::io::stdin();
            let mut stdout = std::io::stdout();
            loop {
                print!("] ");
                let _ = stdout.flush();
                let mut line = String::new();
                match stdin.lock().read_line(&mut line) {
                    Ok(0) | Err(_) => break,
                    Ok(_) => {}
                }
                match parse_line(&line) {
                    Ok(Some(ConsoleCommand::Input(signal))) => {
                        if input_tx.send(signal).is_err() {
                            break;
                        }
                    }
                    Ok(Some(ConsoleCommand::Status)) => {
                        let line = status.lock().map(|b| b.line()).unwrap_or_default();
                        println!("{line}");
                        println!("Snapshots received: {}", store.updates());
                    }
                    Ok(Some(ConsoleCommand::Quit)) => break,
                    Ok(None) => {}
                    Err(e) => println!("Error: {e}"),
                }
            }
            let _ = quit_tx.send(());
        });
    }

    println!("Client connected. Type 'status' for info, 'quit' to exit.");
    println!();

    let mut game = client.game_loop(
        &cfg,
        Host {
            input,
            surface: NullSurface {
                width: cfg.surface_width,
                height: cfg.surface_height,
            },
            status,
            scheduler: IntervalScheduler::new(cfg.refresh_hz),
        },
    );

    tokio::select! {
        ticks = game.run() => warn!(ticks, "Frame scheduler stopped"),
        _ = quit_rx => info!("Quit requested"),
    }
    info!(ticks = game.ticks(), "Client stopped");

    if !client.is_connected() {
        info!("Authority connection was closed");
    }
    Ok(())
}
