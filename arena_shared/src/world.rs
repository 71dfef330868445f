//! World snapshot model.
//!
//! Everything here is produced by the remote authority. The client only ever
//! swaps whole snapshots, it never edits one in place.

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

use crate::math::Vec2;

/// Identity the authority assigns to a connected client and to its player.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct EntityId(pub String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The identity resolved for this client during the channel handshake.
///
/// Resolved once per connection and handed to every component that needs to
/// find "the local player"; nothing re-derives it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LocalIdentity(EntityId);

impl LocalIdentity {
    pub fn new(id: EntityId) -> Self {
        Self(id)
    }

    pub fn id(&self) -> &EntityId {
        &self.0
    }
}

/// One ship as the authority last saw it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    #[serde(default)]
    pub id: EntityId,
    pub x: f64,
    pub y: f64,
    /// Heading in radians.
    #[serde(rename = "rotation", alias = "facing", default)]
    pub facing: f64,
    /// CSS-style color value, painted as-is.
    pub color: String,
    /// Nominally 0..=100. Neither end is clamped here.
    pub health: i32,
    #[serde(default)]
    pub score: i64,
}

impl PlayerState {
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub x: f64,
    pub y: f64,
}

/// An asteroid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    #[serde(default)]
    pub rotation: f64,
}

/// Complete authoritative world state for one network tick.
///
/// `players` is ordered by id so that iterating a given snapshot always yields
/// the same sequence, which keeps paint order stable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct WorldSnapshot {
    #[serde(default, deserialize_with = "players_keyed")]
    pub players: BTreeMap<EntityId, PlayerState>,
    #[serde(default, alias = "bullets")]
    pub projectiles: Vec<Projectile>,
    #[serde(default, alias = "asteroids")]
    pub obstacles: Vec<Obstacle>,
}

impl WorldSnapshot {
    /// Looks up the local player. `None` is a normal state: not spawned yet,
    /// or removed by the authority.
    pub fn local_player(&self, identity: &LocalIdentity) -> Option<&PlayerState> {
        self.players.get(identity.id())
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }
}

/// Fills in `PlayerState::id` from the map key when the payload omits it.
fn players_keyed<'de, D>(de: D) -> Result<BTreeMap<EntityId, PlayerState>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let mut players = BTreeMap::<EntityId, PlayerState>::deserialize(de)?;
    for (key, player) in players.iter_mut() {
        if player.id.as_str().is_empty() {
            player.id = key.clone();
        }
    }
    Ok(players)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_authority_payload() {
        let json = r#"{
            "players": {
                "abc": { "x": 10, "y": 20, "rotation": 1.5, "color": "hsl(120, 70%, 50%)", "health": -20, "score": 3 }
            },
            "bullets": [ { "x": 1, "y": 2 } ],
            "asteroids": [ { "x": 5, "y": 6, "size": 30, "rotation": 0.25 } ]
        }"#;
        let snap: WorldSnapshot = serde_json::from_str(json).unwrap();
        let p = &snap.players[&EntityId::new("abc")];
        assert_eq!(p.id, EntityId::new("abc"));
        assert_eq!(p.facing, 1.5);
        assert_eq!(p.health, -20);
        assert_eq!(snap.projectiles, vec![Projectile { x: 1.0, y: 2.0 }]);
        assert_eq!(snap.obstacles[0].size, 30.0);
    }

    #[test]
    fn missing_sequences_are_empty() {
        let snap: WorldSnapshot = serde_json::from_str(r#"{ "players": {} }"#).unwrap();
        assert!(snap.projectiles.is_empty());
        assert!(snap.obstacles.is_empty());
    }

    #[test]
    fn local_player_absent_is_none() {
        let snap = WorldSnapshot::default();
        let me = LocalIdentity::new(EntityId::new("me"));
        assert!(snap.local_player(&me).is_none());
        assert_eq!(snap.player_count(), 0);
    }
}
