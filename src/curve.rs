use glam::Vec2;

/// A piecewise-linear response curve over `[0, 1] × [0, 1]`.
///
/// Control points must be sorted along the X axis from left to right,
/// with the first point at `x = 0` and the last at `x = 1`. Evaluation
/// assumes at least two points.
#[derive(Clone, Debug, PartialEq)]
pub struct Curve {
    pub points: Vec<Vec2>,
}

impl Curve {
    pub fn from_points(points: Vec<Vec2>) -> Self {
        debug_assert!(points.len() >= 2);
        debug_assert!(points.windows(2).all(|w| w[0].x <= w[1].x));
        Self { points }
    }

    /// Evaluates the curve at `x` by linear interpolation between the
    /// two surrounding control points.
    ///
    /// Queries past the last control point return the last point's Y
    /// (clamped, not extrapolated).
    pub fn eval_at_x(&self, x: f32) -> f32 {
        for i in 1..self.points.len() {
            let p = self.points[i];
            if x <= p.x {
                let prev = self.points[i - 1];
                let t = (x - prev.x) / (p.x - prev.x);
                return prev.y + t * (p.y - prev.y);
            }
        }
        self.points[self.points.len() - 1].y
    }
}
