//! Rendering interface.
//!
//! Rasterization is an external collaborator: the environment assembles a
//! [`Scene`] (ordered colored primitives in the screen frame) and hands it to
//! a [`FrameRenderer`] implementation whenever a frame observation or a
//! diagnostic capture is needed. The simulation core ships no rasterizer.

use std::io;
use std::path::Path;

use crate::geometry::Point;

/// RGB color with components in `0..=255`.
pub type Color = [f32; 3];

/// One rendered RGB8 frame.
#[derive(Clone, Debug, Default)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    /// Row-major RGB8 pixel data, `width * height * 3` bytes.
    pub data: Vec<u8>,
}

/// A draw primitive, painted in order.
#[derive(Clone, Debug)]
pub enum SceneItem {
    Polygon {
        points: Vec<Point>,
        color: Color,
    },
    Outline {
        points: Vec<Point>,
        color: Color,
        width: u32,
    },
    Polyline {
        points: Vec<Point>,
        color: Color,
        width: u32,
    },
}

/// Everything a renderer needs to draw one simulation state.
#[derive(Clone, Debug)]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    pub background: Color,
    pub items: Vec<SceneItem>,
}

impl Scene {
    #[must_use]
    pub const fn new(width: f64, height: f64, background: Color) -> Self {
        Self {
            width,
            height,
            background,
            items: Vec::new(),
        }
    }

    pub fn push_polygon(&mut self, points: Vec<Point>, color: Color) {
        self.items.push(SceneItem::Polygon { points, color });
    }

    pub fn push_outline(&mut self, points: Vec<Point>, color: Color, width: u32) {
        self.items.push(SceneItem::Outline {
            points,
            color,
            width,
        });
    }

    pub fn push_polyline(&mut self, points: Vec<Point>, color: Color, width: u32) {
        self.items.push(SceneItem::Polyline {
            points,
            color,
            width,
        });
    }
}

/// Turns scenes into frames and persists diagnostic captures.
pub trait FrameRenderer {
    /// Rasterizes the scene into an RGB8 frame.
    fn render(&mut self, scene: &Scene) -> Frame;

    /// Persists a rendered frame. Capture failures are diagnostic only; the
    /// environment logs them and keeps stepping.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error when the frame cannot be written.
    fn save(&mut self, frame: &Frame, path: &Path) -> io::Result<()>;
}
