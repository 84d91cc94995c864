//! Needle kinematics.
//!
//! The needle is a kinematic body driven by heading-delta commands at a fixed
//! forward speed. Position uses the level's world frame (y grows upward); the
//! derived tip point is flipped into the screen frame, where all containment
//! tests happen.

use std::f64::consts::{FRAC_PI_2, PI};

use crate::angular_component;
use crate::geometry::Point;
use crate::scene::Color;

/// Forward speed in level units per step.
pub const SPEED: f64 = 30.0;

const TWO_PI: f64 = 2.0 * PI;
/// Body length as a fraction of the level diagonal.
const LENGTH_CONST: f64 = 0.08;
/// Back-edge half width as a fraction of the level diagonal.
const BACK_CONST: f64 = 0.01;

/// The needle: position, heading, and the trace of visited points.
#[derive(Debug)]
pub struct Needle {
    pub x: f64,
    pub y: f64,
    /// Heading in radians, kept within `(-2*PI, 2*PI)`. `w = 0` points along
    /// the negative x axis; the start pose `w = PI` faces right.
    pub w: f64,
    /// Deltas from the most recent [`advance`](Needle::advance).
    pub dx: f64,
    pub dy: f64,
    pub dw: f64,
    env_height: f64,
    scale: f64,
    tip: Point,
    corners: [Point; 3],
    trace: Vec<Point>,
    path_length: f64,
}

impl Needle {
    pub const COLOR: Color = [134.0, 200.0, 188.0];
    pub const THREAD_COLOR: Color = [167.0, 188.0, 214.0];

    /// Creates a needle at the fixed episode start pose.
    #[must_use]
    pub fn new(env_width: f64, env_height: f64) -> Self {
        let x = 96.0;
        let y = env_height - 108.0;
        let tip = Point::new(x, env_height - y);
        let mut needle = Self {
            x,
            y,
            w: PI,
            dx: 0.0,
            dy: 0.0,
            dw: 0.0,
            env_height,
            scale: env_width.hypot(env_height),
            tip,
            corners: [tip; 3],
            trace: vec![tip],
            path_length: 0.0,
        };
        needle.compute_corners();
        needle
    }

    /// Maps a heading-delta command to one step of motion `(dw, dx, dy)`.
    ///
    /// The command is clamped to `[-PI, PI]`; the linear deltas give constant
    /// forward speed along the commanded heading.
    #[must_use]
    pub fn action_to_motion(&self, command: f32) -> (f64, f64, f64) {
        let dw = f64::from(command).clamp(-PI, PI);
        let dx = (-self.w - dw + PI).cos() * SPEED;
        let dy = -(-self.w - dw + PI).sin() * SPEED;
        (dw, dx, dy)
    }

    /// Advances the needle by one action.
    ///
    /// Inside tissue the angular delta is halved and, if still above 0.01 in
    /// magnitude, snapped to a 0.02 step of the same sign: tissue resists
    /// turning. The translation keeps the undamped direction. Heading is
    /// wrapped back inside one full turn; the trace and path length grow
    /// whenever the position moved.
    pub fn advance(&mut self, action: &[f32], in_tissue: bool) {
        let (mut dw, dx, dy) = self.action_to_motion(angular_component(action));

        if in_tissue {
            dw *= 0.5;
            if dw.abs() > 0.01 {
                dw = 0.02 * dw.signum();
            }
        }

        self.w += dw;
        if self.w.abs() > TWO_PI {
            self.w -= self.w.signum() * TWO_PI;
        }

        let (old_x, old_y) = (self.x, self.y);
        self.x += dx;
        self.y -= dy;

        if self.x != old_x || self.y != old_y {
            self.trace.push(Point::new(self.x, self.env_height - self.y));
            self.path_length += dx.hypot(dy);
        }

        self.dx = dx;
        self.dy = dy;
        self.dw = dw;
        self.tip = Point::new(self.x, self.env_height - self.y);
        self.compute_corners();

        tracing::trace!(dx, dy, dw, "needle motion");
    }

    /// Triangular body corners in the screen frame, for drawing.
    fn compute_corners(&mut self) {
        let w = self.w;
        let x = self.x;
        let y = self.env_height - self.y;

        let length = LENGTH_CONST * self.scale;
        let lcosw = length * w.cos();
        let lsinw = length * w.sin();
        let back = BACK_CONST * self.scale;

        let top_w = w - FRAC_PI_2;
        let bot_w = w + FRAC_PI_2;

        self.corners = [
            Point::new(x, y),
            Point::new(x - back * top_w.cos() + lcosw, y - back * top_w.sin() + lsinw),
            Point::new(x - back * bot_w.cos() + lcosw, y - back * bot_w.sin() + lsinw),
        ];
    }

    /// Tip point in the screen frame; all containment tests use this.
    #[must_use]
    pub fn tip(&self) -> Point {
        self.tip
    }

    #[must_use]
    pub fn corners(&self) -> &[Point; 3] {
        &self.corners
    }

    /// Polyline of visited screen-frame points, including the start.
    #[must_use]
    pub fn trace(&self) -> &[Point] {
        &self.trace
    }

    #[must_use]
    pub fn path_length(&self) -> f64 {
        self.path_length
    }
}
