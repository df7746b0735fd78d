use crate::curve::Curve;
use glam::Vec2;

/// Tunable parameters for one growth run.
///
/// The defaults grow a birch-like form. All values are constant during a
/// run; change them between runs (or reset the plant) to explore other
/// shapes.
#[derive(Clone, Debug)]
pub struct GrowthParameters {
    /// Global seed mixed into every per-bud activation draw.
    pub random_seed: u32,
    /// Vigor granted per unit of accumulated plant length.
    pub vigor_scale: f32,
    /// Baseline added to the accumulated length before scaling, so a
    /// fresh plant has something to grow with.
    pub base_vigor: f32,
    /// Total accumulated length at which growth saturates and
    /// iterations report no more growth.
    pub max_total_length: f32,

    /// Maps bud maturity (see the weight fields) to apical control:
    /// 1 keeps all vigor at the apex, 0 splits it evenly among the apex
    /// and all active laterals.
    pub apical_control_curve: Curve,
    /// Weight of distance-from-root in the curve input.
    pub distance_weight: f32,
    /// Weight of the bud's own segment count in the curve input.
    pub length_weight: f32,
    /// Weight of branch order in the curve input.
    pub order_weight: f32,
    /// Overall scale applied to the weighted curve input.
    pub apical_input_scale: f32,

    /// Activation threshold for the per-bud random draw.
    pub activation_threshold: f32,
    /// Number of segments nearest the base whose laterals never
    /// activate.
    pub no_activation_zone: usize,

    /// Fraction of this iteration's vigor fed to each unexpanded leaf.
    pub leaf_growth_rate: f32,
    /// A lateral that grows past this many segments sheds its leaf.
    pub leaf_shed_segments: usize,
    /// A stem thicker than this sheds the leaf at its end.
    pub leaf_shed_width: f32,

    /// Pitch of a freshly spawned lateral away from its parent stem, in
    /// degrees.
    pub lateral_pitch_deg: f32,
    /// Sideways bias added to the growth direction each step to break
    /// symmetry.
    pub twist: f32,
    /// Downward pull applied to the growth direction each step.
    pub tropism: f32,

    /// Scale of the sqrt mapping from downstream length to stem width.
    pub width_scale: f32,
    /// Minimum stem width.
    pub width_base: f32,

    /// When set, a branch whose total lightness falls below
    /// `threshold × segment count` dies and is cleared. `None` matches
    /// the reference behavior of never pruning.
    pub prune_lightness_per_segment: Option<f32>,
}

impl Default for GrowthParameters {
    fn default() -> Self {
        Self {
            random_seed: 0,
            vigor_scale: 0.005,
            base_vigor: 10.0,
            max_total_length: 2000.0,
            apical_control_curve: Curve::from_points(vec![
                Vec2::new(0.0, 1.0),
                Vec2::new(1.0, 0.0),
            ]),
            distance_weight: 0.01,
            length_weight: 0.02,
            order_weight: 0.3,
            apical_input_scale: 1.0,
            activation_threshold: 0.5,
            no_activation_zone: 3,
            leaf_growth_rate: 0.5,
            leaf_shed_segments: 3,
            leaf_shed_width: 0.0015,
            lateral_pitch_deg: 60.0,
            twist: 0.1,
            tropism: 0.2,
            width_scale: 0.0003,
            width_base: 0.0001,
            prune_lightness_per_segment: None,
        }
    }
}
