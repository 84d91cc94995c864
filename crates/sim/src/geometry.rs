//! Minimal 2D geometry: points and simple polygons.
//!
//! Coordinates live in the level's screen frame (y grows downward). All
//! containment tests in the simulation go through [`Polygon::contains`].

/// A point in the screen coordinate frame.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// A simple polygon over an owned vertex list.
#[derive(Clone, Debug)]
pub struct Polygon {
    vertices: Vec<Point>,
}

impl Polygon {
    /// Creates a polygon from its vertices in order. Fewer than three
    /// vertices is a caller error; the geometry is not validated beyond that.
    #[must_use]
    pub fn new(vertices: Vec<Point>) -> Self {
        debug_assert!(vertices.len() >= 3, "polygon needs at least 3 vertices");
        Self { vertices }
    }

    #[must_use]
    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    /// Even-odd containment test.
    ///
    /// Casts a horizontal ray to the right of `p` and counts edge crossings.
    /// Each edge uses a half-open y interval so a ray through a shared vertex
    /// is not counted twice.
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        let n = self.vertices.len();
        let mut crossings = 0;
        for i in 0..n {
            let v0 = self.vertices[i];
            let v1 = self.vertices[(i + 1) % n];

            let (y_min, y_max) = if v0.y < v1.y {
                (v0.y, v1.y)
            } else {
                (v1.y, v0.y)
            };
            // Horizontal edges have an empty half-open interval and drop out.
            if p.y < y_min || p.y >= y_max {
                continue;
            }

            let t = (p.y - v0.y) / (v1.y - v0.y);
            let x_crossing = v0.x + t * (v1.x - v0.x);
            if x_crossing > p.x {
                crossings += 1;
            }
        }
        crossings % 2 == 1
    }

    /// Mean y coordinate of the vertices.
    #[must_use]
    pub fn mean_y(&self) -> f64 {
        self.vertices.iter().map(|v| v.y).sum::<f64>() / self.vertices.len() as f64
    }
}
