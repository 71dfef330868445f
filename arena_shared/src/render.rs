//! Drawing abstraction.
//!
//! This crate does not depend on a graphics backend. The client paints
//! through [`DrawSurface`]; a canvas, a window, or a test recorder can sit
//! behind it. Coordinates are surface pixels with the origin at the top-left.

use crate::math::Vec2;

/// A 2D raster surface with a canvas-like transform stack.
pub trait DrawSurface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: &str);
    /// Fills the closed polygon through `points`.
    fn fill_path(&mut self, points: &[Vec2], color: &str);
    /// Strokes the closed polygon through `points`.
    fn stroke_path(&mut self, points: &[Vec2], color: &str, line_width: f64);
    fn fill_disc(&mut self, center: Vec2, radius: f64, color: &str);
    /// Draws `text` horizontally centred on `x` with its baseline at `y`.
    fn fill_text_centered(&mut self, text: &str, x: f64, y: f64, color: &str, font: &str);

    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, dx: f64, dy: f64);
    fn rotate(&mut self, angle: f64);
}

/// A surface that discards everything. Useful for headless runs.
#[derive(Debug, Clone, Copy)]
pub struct NullSurface {
    pub width: u32,
    pub height: u32,
}

impl DrawSurface for NullSurface {
    fn width(&self) -> u32 {
        self.width
    }
    fn height(&self) -> u32 {
        self.height
    }
    fn fill_rect(&mut self, _x: f64, _y: f64, _w: f64, _h: f64, _color: &str) {}
    fn fill_path(&mut self, _points: &[Vec2], _color: &str) {}
    fn stroke_path(&mut self, _points: &[Vec2], _color: &str, _line_width: f64) {}
    fn fill_disc(&mut self, _center: Vec2, _radius: f64, _color: &str) {}
    fn fill_text_centered(&mut self, _text: &str, _x: f64, _y: f64, _color: &str, _font: &str) {}
    fn save(&mut self) {}
    fn restore(&mut self) {}
    fn translate(&mut self, _dx: f64, _dy: f64) {}
    fn rotate(&mut self, _angle: f64) {}
}

/// One recorded drawing call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    FillRect {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        color: String,
    },
    FillPath {
        points: Vec<Vec2>,
        color: String,
    },
    StrokePath {
        points: Vec<Vec2>,
        color: String,
        line_width: f64,
    },
    FillDisc {
        center: Vec2,
        radius: f64,
        color: String,
    },
    Text {
        text: String,
        x: f64,
        y: f64,
        color: String,
        font: String,
    },
    Save,
    Restore,
    Translate {
        dx: f64,
        dy: f64,
    },
    Rotate {
        angle: f64,
    },
}

/// Records every call in order, without rasterising anything.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    commands: Vec<DrawCmd>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCmd] {
        &self.commands
    }

    /// Returns the recorded calls and starts a fresh recording.
    pub fn take(&mut self) -> Vec<DrawCmd> {
        std::mem::take(&mut self.commands)
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl DrawSurface for RecordingSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: &str) {
        self.commands.push(DrawCmd::FillRect {
            x,
            y,
            w,
            h,
            color: color.to_string(),
        });
    }

    fn fill_path(&mut self, points: &[Vec2], color: &str) {
        self.commands.push(DrawCmd::FillPath {
            points: points.to_vec(),
            color: color.to_string(),
        });
    }

    fn stroke_path(&mut self, points: &[Vec2], color: &str, line_width: f64) {
        self.commands.push(DrawCmd::StrokePath {
            points: points.to_vec(),
            color: color.to_string(),
            line_width,
        });
    }

    fn fill_disc(&mut self, center: Vec2, radius: f64, color: &str) {
        self.commands.push(DrawCmd::FillDisc {
            center,
            radius,
            color: color.to_string(),
        });
    }

    fn fill_text_centered(&mut self, text: &str, x: f64, y: f64, color: &str, font: &str) {
        self.commands.push(DrawCmd::Text {
            text: text.to_string(),
            x,
            y,
            color: color.to_string(),
            font: font.to_string(),
        });
    }

    fn save(&mut self) {
        self.commands.push(DrawCmd::Save);
    }

    fn restore(&mut self) {
        self.commands.push(DrawCmd::Restore);
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.commands.push(DrawCmd::Translate { dx, dy });
    }

    fn rotate(&mut self, angle: f64) {
        self.commands.push(DrawCmd::Rotate { angle });
    }
}
