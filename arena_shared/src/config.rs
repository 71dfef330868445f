//! Configuration.
//!
//! Loads client configuration from JSON strings (file IO left to the binary).

use serde::{Deserialize, Serialize};

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Authority address, e.g. `127.0.0.1:40000`.
    pub server_addr: String,
    /// Frames per second requested from the frame scheduler.
    #[serde(default = "default_refresh_hz")]
    pub refresh_hz: u32,
    #[serde(default = "default_surface_width")]
    pub surface_width: u32,
    #[serde(default = "default_surface_height")]
    pub surface_height: u32,
    /// Seed for the obstacle outline jitter. Drawn from entropy when unset.
    #[serde(default)]
    pub jitter_seed: Option<u64>,
    /// Name announced in the handshake.
    #[serde(default = "default_player_name")]
    pub player_name: String,
}

fn default_refresh_hz() -> u32 {
    60
}

fn default_surface_width() -> u32 {
    800
}

fn default_surface_height() -> u32 {
    600
}

fn default_player_name() -> String {
    "Player".to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_addr: "127.0.0.1:40000".to_string(),
            refresh_hz: default_refresh_hz(),
            surface_width: default_surface_width(),
            surface_height: default_surface_height(),
            jitter_seed: None,
            player_name: default_player_name(),
        }
    }
}

impl ClientConfig {
    /// Parses config from JSON.
    pub fn from_json_str(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_takes_defaults() {
        let cfg = ClientConfig::from_json_str(r#"{ "server_addr": "10.0.0.2:9000", "jitter_seed": 7 }"#)
            .unwrap();
        assert_eq!(cfg.server_addr, "10.0.0.2:9000");
        assert_eq!(cfg.refresh_hz, 60);
        assert_eq!((cfg.surface_width, cfg.surface_height), (800, 600));
        assert_eq!(cfg.jitter_seed, Some(7));
        assert_eq!(cfg.player_name, "Player");
    }
}
