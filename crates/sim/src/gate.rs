//! Target gates and their pass/fail state machine.

use std::f64::consts::{FRAC_PI_2, PI};

use crate::geometry::{Point, Polygon};
use crate::level::GateSpec;
use crate::scene::Color;

/// Progress of a single gate through an episode.
///
/// `Passed` and `Failed` are terminal: once reached, no further
/// [`Gate::update_status`] call changes the status.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GateStatus {
    /// Not yet the active target.
    Unset,
    /// The gate the needle must pass next.
    Next,
    Passed,
    Failed,
}

impl GateStatus {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Passed | Self::Failed)
    }
}

/// A polygonal target region with fail sub-regions above and below.
#[derive(Debug)]
pub struct Gate {
    /// Center x in level units.
    pub x: f64,
    /// Center y in level units.
    pub y: f64,
    /// Normalized orientation in radians.
    pub w: f64,
    status: GateStatus,
    corners: [Point; 4],
    top: [Point; 4],
    bottom: [Point; 4],
    pass_box: Polygon,
    top_box: Polygon,
    bottom_box: Polygon,
    body_color: Color,
    top_color: Color,
    bottom_color: Color,
}

impl Gate {
    pub const COLOR_BODY: Color = [251.0, 216.0, 114.0];
    pub const COLOR_TOP: Color = [255.0, 50.0, 12.0];
    pub const COLOR_BOTTOM: Color = [255.0, 12.0, 150.0];
    pub const COLOR_PASSED: Color = [100.0, 175.0, 100.0];
    pub const COLOR_FAILED: Color = [175.0, 100.0, 100.0];

    /// Builds a gate from its raw level record, scaled to the level
    /// dimensions and geometrically normalized.
    ///
    /// Normalization: the orientation is negated and wrapped into
    /// `(0, 2*PI)`; if it exceeds `PI` the corner, top, and bottom arrays are
    /// cyclically rotated by two (swapping diagonal pairs) and `PI` is
    /// subtracted; `PI / 2` is then subtracted. Finally the top and bottom
    /// fail boxes are swapped if the top's mean y lies below the bottom's, so
    /// the "top" designation is independent of input ordering. Pass/fail
    /// detection depends on reproducing this exactly.
    #[must_use]
    pub fn new(spec: &GateSpec, env_width: f64, env_height: f64) -> Self {
        let x = env_width * spec.pos[0];
        let y = env_height * spec.pos[1];
        let mut w = -spec.pos[2];
        if w < 0.0 {
            w += 2.0 * PI;
        }

        let mut corners = points4(&spec.corners_x, &spec.corners_y);
        let mut top = points4(&spec.top_x, &spec.top_y);
        let mut bottom = points4(&spec.bottom_x, &spec.bottom_y);

        if w > PI {
            w -= PI;
            corners.rotate_left(2);
            top.rotate_left(2);
            bottom.rotate_left(2);
        }
        w -= FRAC_PI_2;

        if mean_y(&top) < mean_y(&bottom) {
            std::mem::swap(&mut top, &mut bottom);
        }

        Self {
            x,
            y,
            w,
            status: GateStatus::Unset,
            pass_box: Polygon::new(corners.to_vec()),
            top_box: Polygon::new(top.to_vec()),
            bottom_box: Polygon::new(bottom.to_vec()),
            corners,
            top,
            bottom,
            body_color: Self::COLOR_BODY,
            top_color: Self::COLOR_TOP,
            bottom_color: Self::COLOR_BOTTOM,
        }
    }

    /// Marks this gate as the current target.
    pub fn activate(&mut self) {
        self.status = GateStatus::Next;
    }

    /// Feeds the current needle tip through the state machine and returns the
    /// (possibly updated) status.
    ///
    /// The fail check takes priority: a tip straddling the pass box and a
    /// fail box counts as failed. Only the active (`Next`) gate can pass.
    /// Terminal states never change again.
    pub fn update_status(&mut self, tip: Point) -> GateStatus {
        if self.status != GateStatus::Passed
            && (self.top_box.contains(tip) || self.bottom_box.contains(tip))
        {
            self.status = GateStatus::Failed;
            self.recolor(Self::COLOR_FAILED);
        } else if self.status == GateStatus::Next && self.pass_box.contains(tip) {
            self.status = GateStatus::Passed;
            self.recolor(Self::COLOR_PASSED);
        }
        self.status
    }

    fn recolor(&mut self, color: Color) {
        self.body_color = color;
        self.top_color = color;
        self.bottom_color = color;
    }

    #[must_use]
    pub fn status(&self) -> GateStatus {
        self.status
    }

    #[must_use]
    pub fn corners(&self) -> &[Point; 4] {
        &self.corners
    }

    #[must_use]
    pub fn top(&self) -> &[Point; 4] {
        &self.top
    }

    #[must_use]
    pub fn bottom(&self) -> &[Point; 4] {
        &self.bottom
    }

    #[must_use]
    pub fn body_color(&self) -> Color {
        self.body_color
    }

    #[must_use]
    pub fn top_color(&self) -> Color {
        self.top_color
    }

    #[must_use]
    pub fn bottom_color(&self) -> Color {
        self.bottom_color
    }
}

fn points4(xs: &[f64; 4], ys: &[f64; 4]) -> [Point; 4] {
    [
        Point::new(xs[0], ys[0]),
        Point::new(xs[1], ys[1]),
        Point::new(xs[2], ys[2]),
        Point::new(xs[3], ys[3]),
    ]
}

fn mean_y(points: &[Point; 4]) -> f64 {
    points.iter().map(|p| p.y).sum::<f64>() / 4.0
}

#[cfg(test)]
mod tests {
    use super::*;

    // Axis-aligned gate: pass box y 60..156, top fail box y 20..60,
    // bottom fail box y 156..196, all spanning x 280..320.
    fn spec() -> GateSpec {
        GateSpec {
            pos: [0.46875, 0.225, -std::f64::consts::FRAC_PI_2],
            corners_x: [280.0, 320.0, 320.0, 280.0],
            corners_y: [60.0, 60.0, 156.0, 156.0],
            top_x: [280.0, 320.0, 320.0, 280.0],
            top_y: [20.0, 20.0, 60.0, 60.0],
            bottom_x: [280.0, 320.0, 320.0, 280.0],
            bottom_y: [156.0, 156.0, 196.0, 196.0],
        }
    }

    #[test]
    fn passes_through_pass_box() {
        let mut gate = Gate::new(&spec(), 640.0, 480.0);
        gate.activate();
        assert_eq!(gate.update_status(Point::new(300.0, 108.0)), GateStatus::Passed);
    }

    #[test]
    fn fail_takes_priority_and_is_terminal() {
        let mut gate = Gate::new(&spec(), 640.0, 480.0);
        gate.activate();
        // Inside a fail sub-region.
        assert_eq!(gate.update_status(Point::new(300.0, 40.0)), GateStatus::Failed);
        // Terminal: moving into the pass box afterwards changes nothing.
        assert_eq!(gate.update_status(Point::new(300.0, 108.0)), GateStatus::Failed);
    }

    #[test]
    fn passed_is_terminal() {
        let mut gate = Gate::new(&spec(), 640.0, 480.0);
        gate.activate();
        assert_eq!(gate.update_status(Point::new(300.0, 108.0)), GateStatus::Passed);
        // Even a fail-box hit cannot undo a pass.
        assert_eq!(gate.update_status(Point::new(300.0, 40.0)), GateStatus::Passed);
    }

    #[test]
    fn inactive_gate_cannot_pass() {
        let mut gate = Gate::new(&spec(), 640.0, 480.0);
        assert_eq!(gate.update_status(Point::new(300.0, 108.0)), GateStatus::Unset);
    }

    #[test]
    fn orientation_above_pi_rotates_polygons() {
        let mut s = spec();
        // Negated and wrapped this lands above PI, triggering the rotation.
        s.pos[2] = 2.0;
        let gate = Gate::new(&s, 640.0, 480.0);
        // -2.0 wrapped into (0, 2*PI), minus PI for the rotation, minus PI/2.
        let expected_w = 2.0 * PI - 2.0 - PI - FRAC_PI_2;
        assert!((gate.w - expected_w).abs() < 1e-12);
        // Corner array rotated by two positions.
        assert_eq!(gate.corners()[0], Point::new(320.0, 156.0));
        assert_eq!(gate.corners()[2], Point::new(280.0, 60.0));
    }

    #[test]
    fn top_designation_follows_mean_y() {
        let gate = Gate::new(&spec(), 640.0, 480.0);
        // The raw "top" box has the smaller mean y, so the roles swap.
        assert!(mean_y(gate.top()) > mean_y(gate.bottom()));
    }
}
