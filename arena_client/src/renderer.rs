//! Frame painter.
//!
//! Paints one frame from a snapshot: background, starfield, ships with health
//! bars and score labels, projectiles, then asteroids. Apart from the asteroid
//! outlines every call is a pure function of the snapshot and the surface
//! size.
//!
//! Asteroid outlines are re-jittered on every frame. That flicker is the
//! intended look. The jitter comes from a small non-cryptographic generator:
//! the same seed yields the same outlines within one build, which is what
//! headless runs and tests rely on. Sequences are not promised to match
//! across `rand` releases or target word sizes.

use std::f64::consts::TAU;

use arena_shared::{
    math::Vec2,
    render::DrawSurface,
    world::{Obstacle, PlayerState, WorldSnapshot},
};
use rand::{rngs::SmallRng, Rng, SeedableRng};

pub const BACKGROUND: &str = "#001122";
pub const STAR_COLOR: &str = "white";
pub const STAR_COUNT: u32 = 100;

pub const SHIP_OUTLINE: [Vec2; 4] = [
    Vec2::new(0.0, -15.0),
    Vec2::new(10.0, 10.0),
    Vec2::new(0.0, 5.0),
    Vec2::new(-10.0, 10.0),
];

pub const HEALTH_BAR_X: f64 = -15.0;
pub const HEALTH_BAR_Y: f64 = 15.0;
pub const HEALTH_BAR_WIDTH: f64 = 30.0;
pub const HEALTH_BAR_HEIGHT: f64 = 3.0;
pub const HEALTH_BAR_BACK: &str = "red";
pub const HEALTH_BAR_FRONT: &str = "green";

pub const LABEL_COLOR: &str = "white";
pub const LABEL_FONT: &str = "12px Arial";
pub const LABEL_OFFSET_Y: f64 = -25.0;

pub const PROJECTILE_COLOR: &str = "#ffff00";
pub const PROJECTILE_RADIUS: f64 = 2.0;

pub const OBSTACLE_COLOR: &str = "#888";
pub const OBSTACLE_LINE_WIDTH: f64 = 2.0;
pub const OBSTACLE_VERTICES: usize = 8;

/// Star `i` of the backdrop. Depends only on the surface size.
pub fn star_position(i: u32, width: u32, height: u32) -> (u32, u32) {
    ((i * 123) % width, (i * 321) % height)
}

/// Width of the foreground health bar. Not clamped: health above 100 draws
/// past the end of the background bar.
pub fn health_bar_width(health: i32) -> f64 {
    HEALTH_BAR_WIDTH * (f64::from(health) / 100.0)
}

/// Paints frames onto a [`DrawSurface`].
pub struct Renderer {
    jitter: SmallRng,
}

impl Renderer {
    /// `seed` fixes the asteroid jitter sequence; `None` draws from entropy.
    pub fn new(seed: Option<u64>) -> Self {
        let jitter = match seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        Self { jitter }
    }

    /// Paints one frame. Returns `false`, having touched nothing, when there
    /// is no snapshot yet.
    pub fn render(&mut self, snapshot: Option<&WorldSnapshot>, surface: &mut dyn DrawSurface) -> bool {
        let Some(snap) = snapshot else {
            return false;
        };

        let (w, h) = (surface.width(), surface.height());
        surface.fill_rect(0.0, 0.0, f64::from(w), f64::from(h), BACKGROUND);
        draw_stars(surface);

        for player in snap.players.values() {
            draw_ship(surface, player);
            surface.fill_text_centered(
                &format!("Score: {}", player.score),
                player.x,
                player.y + LABEL_OFFSET_Y,
                LABEL_COLOR,
                LABEL_FONT,
            );
        }

        for p in &snap.projectiles {
            surface.fill_disc(Vec2::new(p.x, p.y), PROJECTILE_RADIUS, PROJECTILE_COLOR);
        }

        for obstacle in &snap.obstacles {
            self.draw_obstacle(surface, obstacle);
        }

        true
    }

    fn draw_obstacle(&mut self, surface: &mut dyn DrawSurface, obstacle: &Obstacle) {
        let outline: Vec<Vec2> = (0..OBSTACLE_VERTICES)
            .map(|i| {
                let angle = i as f64 / OBSTACLE_VERTICES as f64 * TAU;
                let radius = obstacle.size * (0.8 + self.jitter.gen::<f64>() * 0.4);
                Vec2::from_polar(angle, radius)
            })
            .collect();

        surface.save();
        surface.translate(obstacle.x, obstacle.y);
        surface.rotate(obstacle.rotation);
        surface.stroke_path(&outline, OBSTACLE_COLOR, OBSTACLE_LINE_WIDTH);
        surface.restore();
    }
}

fn draw_stars(surface: &mut dyn DrawSurface) {
    let (w, h) = (surface.width(), surface.height());
    if w == 0 || h == 0 {
        return;
    }
    for i in 0..STAR_COUNT {
        let (x, y) = star_position(i, w, h);
        surface.fill_rect(f64::from(x), f64::from(y), 1.0, 1.0, STAR_COLOR);
    }
}

fn draw_ship(surface: &mut dyn DrawSurface, player: &PlayerState) {
    surface.save();
    surface.translate(player.x, player.y);
    surface.rotate(player.facing);

    surface.fill_path(&SHIP_OUTLINE, &player.color);

    surface.fill_rect(
        HEALTH_BAR_X,
        HEALTH_BAR_Y,
        HEALTH_BAR_WIDTH,
        HEALTH_BAR_HEIGHT,
        HEALTH_BAR_BACK,
    );
    surface.fill_rect(
        HEALTH_BAR_X,
        HEALTH_BAR_Y,
        health_bar_width(player.health),
        HEALTH_BAR_HEIGHT,
        HEALTH_BAR_FRONT,
    );

    surface.restore();
}
