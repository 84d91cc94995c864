//! Tissue surfaces and the damage model.

use crate::angular_component;
use crate::geometry::{Point, Polygon};
use crate::level::SurfaceSpec;
use crate::scene::Color;

/// Turning harder than this inside tissue starts tearing it.
const DAMAGE_THRESHOLD: f64 = 0.02;

/// A polygonal tissue region.
///
/// Shallow surfaces accrue cosmetic damage when the needle turns inside them;
/// `deep` surfaces terminate the episode on contact. Damage is monotonically
/// non-decreasing within an episode and saturates at 100.
#[derive(Debug)]
pub struct Surface {
    polygon: Polygon,
    deep: bool,
    damage: f64,
    color: Color,
}

impl Surface {
    pub const COLOR_LIGHT: Color = [232.0, 146.0, 124.0];
    pub const COLOR_DEEP: Color = [207.0, 69.0, 32.0];

    /// Builds a surface from its level record. File y coordinates are flipped
    /// into the screen frame, matching the needle tip convention.
    #[must_use]
    pub fn new(spec: &SurfaceSpec, env_height: f64) -> Self {
        let vertices = spec
            .xs
            .iter()
            .zip(&spec.ys)
            .map(|(&x, &y)| Point::new(x, env_height - y))
            .collect();
        Self {
            polygon: Polygon::new(vertices),
            deep: spec.deep,
            damage: 0.0,
            color: if spec.deep {
                Self::COLOR_DEEP
            } else {
                Self::COLOR_LIGHT
            },
        }
    }

    /// Accrues damage for one step of the given action and returns the new
    /// damage added this step (zero below the turn threshold).
    ///
    /// The returned increment is uncapped; only the surface-local accumulator
    /// saturates at 100. The display color is re-interpolated from the damage
    /// fraction.
    pub fn apply_damage(&mut self, action: &[f32]) -> f64 {
        let dw = f64::from(angular_component(action));
        if dw.abs() <= DAMAGE_THRESHOLD {
            return 0.0;
        }
        let new_damage = (dw.abs() / 2.0 - 0.01) * 100.0;
        self.damage = (self.damage + new_damage).min(100.0);
        self.update_color();
        new_damage
    }

    fn update_color(&mut self) {
        let alpha = (self.damage / 100.0) as f32;
        let beta = 1.0 - alpha;
        for (c, (light, deep)) in self
            .color
            .iter_mut()
            .zip(Self::COLOR_LIGHT.iter().zip(Self::COLOR_DEEP))
        {
            *c = beta * light + alpha * deep;
        }
    }

    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        self.polygon.contains(p)
    }

    #[must_use]
    pub fn deep(&self) -> bool {
        self.deep
    }

    #[must_use]
    pub fn damage(&self) -> f64 {
        self.damage
    }

    #[must_use]
    pub fn color(&self) -> Color {
        self.color
    }

    #[must_use]
    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface(deep: bool) -> Surface {
        Surface::new(
            &SurfaceSpec {
                deep,
                xs: vec![0.0, 100.0, 100.0, 0.0],
                ys: vec![0.0, 0.0, 100.0, 100.0],
            },
            480.0,
        )
    }

    #[test]
    fn below_threshold_no_damage() {
        let mut s = surface(false);
        assert_eq!(s.apply_damage(&[0.02]), 0.0);
        assert_eq!(s.damage(), 0.0);
        assert_eq!(s.color(), Surface::COLOR_LIGHT);
    }

    #[test]
    fn damage_formula() {
        let mut s = surface(false);
        let added = s.apply_damage(&[0.5]);
        assert!((added - 24.0).abs() < 1e-9);
        assert!((s.damage() - 24.0).abs() < 1e-9);
    }

    #[test]
    fn two_dim_action_uses_angular_slot() {
        let mut s = surface(false);
        // Linear component alone must not tear tissue.
        assert_eq!(s.apply_damage(&[1.0, 0.0]), 0.0);
        let added = s.apply_damage(&[0.0, 0.5]);
        assert!((added - 24.0).abs() < 1e-9);
    }

    #[test]
    fn damage_saturates_at_100() {
        let mut s = surface(false);
        for _ in 0..10 {
            s.apply_damage(&[1.0]);
        }
        assert_eq!(s.damage(), 100.0);
        // Fully damaged tissue shows the deep reference color.
        assert_eq!(s.color(), Surface::COLOR_DEEP);
    }

    #[test]
    fn color_interpolates_halfway() {
        let mut s = surface(false);
        // One full-turn step adds (1/2 - 0.01) * 100 = 49 damage; top up to 50.
        s.apply_damage(&[1.0]);
        s.apply_damage(&[0.04]);
        let mid = s.color();
        for i in 0..3 {
            let expected = 0.5 * Surface::COLOR_LIGHT[i] + 0.5 * Surface::COLOR_DEEP[i];
            assert!((mid[i] - expected).abs() < 0.5);
        }
    }

    #[test]
    fn screen_frame_flip() {
        let s = surface(true);
        // File y 0..100 becomes screen y 380..480.
        assert!(s.contains(Point::new(50.0, 400.0)));
        assert!(!s.contains(Point::new(50.0, 50.0)));
    }
}
