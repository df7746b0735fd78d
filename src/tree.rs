use crate::types::BudId;
use glam::{IVec3, Quat, Vec3};

/// The root bud's index in every [`PlantTree`].
pub const ROOT: BudId = 0;

/// One discrete growth step of a stem.
///
/// A segment accumulates fractional growth in `step_scale` until it
/// completes (reaches 1), at which point a lateral bud is spawned at its
/// end and a fresh segment begins. Only the last segment of a bud may
/// lack a lateral child.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StemSegment {
    pub end_point: Vec3,
    /// End orientation; the local +Z axis points forward along the stem.
    pub end_rotation: Quat,
    /// Derived visual thickness, set by the light pass from downstream
    /// subtree length.
    pub width: f32,
    /// Lightness at the owning bud's tip when this segment was last
    /// visited by the light pass.
    pub end_total_lightness: f32,
    /// Fractional growth progress; may exceed 1 briefly before the
    /// segment is finalized.
    pub step_scale: f32,
    pub end_lateral: Option<BudId>,
}

/// A growth point. A bud that has grown is also the root of a branch —
/// the terminology "bud" persists after growth.
#[derive(Clone, Debug, PartialEq)]
pub struct Bud {
    /// Stable display id, assigned monotonically in spawn order.
    pub id: u32,
    pub base_point: Vec3,
    pub base_rotation: Quat,
    /// Where this bud's local light is measured, in voxel coordinates.
    /// May lie outside the grid for buds near the volume's edge.
    pub end_sample_point: IVec3,
    pub segments: Vec<StemSegment>,
    pub is_dead: bool,
    /// 0 = not a leaf; >0 = a partially or fully expanded leaf.
    pub leaf_growth: f32,
    /// 0 for the trunk, +1 per lateral generation.
    pub order: u32,
    /// Segment count accumulated along the path from the root; a
    /// continuous maturity signal.
    pub distance_from_root: f32,
    /// Valid only immediately after the most recent light pass.
    pub total_lightness: f32,
    /// Max lightness of any single bud in this subtree; same validity
    /// as `total_lightness`.
    pub max_lightness: f32,
    /// Yaw offset for the next lateral spawned from this bud,
    /// incremented by the golden angle per spawn.
    pub next_bud_angle_rad: f32,
}

impl Bud {
    fn new(
        id: u32,
        base_point: Vec3,
        base_rotation: Quat,
        order: u32,
        distance_from_root: f32,
        next_bud_angle_rad: f32,
    ) -> Self {
        Self {
            id,
            base_point,
            base_rotation,
            end_sample_point: IVec3::ZERO,
            segments: Vec::new(),
            is_dead: false,
            leaf_growth: 0.0,
            order,
            distance_from_root,
            total_lightness: 0.0,
            max_lightness: 0.0,
            next_bud_angle_rad,
        }
    }
}

/// The grown plant structure: an arena of buds indexed by [`BudId`].
///
/// The root lives at index [`ROOT`]; every other bud is reachable
/// exactly once as some segment's lateral child (a tree, not a DAG).
#[derive(Clone, Debug, PartialEq)]
pub struct PlantTree {
    pub buds: Vec<Bud>,
    next_id: u32,
}

impl PlantTree {
    pub fn new(root_point: Vec3, root_rotation: Quat) -> Self {
        let mut tree = Self {
            buds: Vec::new(),
            next_id: 0,
        };
        tree.push_bud(root_point, root_rotation, 0, 0.0, 0.0);
        tree
    }

    /// Allocates a new bud with the next display id and returns its
    /// arena index.
    pub fn push_bud(
        &mut self,
        base_point: Vec3,
        base_rotation: Quat,
        order: u32,
        distance_from_root: f32,
        next_bud_angle_rad: f32,
    ) -> BudId {
        let id = self.next_id;
        self.next_id += 1;
        let index: BudId = self.buds.len();
        self.buds.push(Bud::new(
            id,
            base_point,
            base_rotation,
            order,
            distance_from_root,
            next_bud_angle_rad,
        ));
        index
    }

    pub fn root(&self) -> &Bud {
        &self.buds[ROOT]
    }

    /// The current tip of a bud: its last segment's end, or its base if
    /// it has not grown yet.
    pub fn tip_of(&self, id: BudId) -> (Vec3, Quat) {
        let bud = &self.buds[id];
        match bud.segments.last() {
            Some(seg) => (seg.end_point, seg.end_rotation),
            None => (bud.base_point, bud.base_rotation),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Quat, Vec3};

    #[test]
    fn new_tree_has_a_single_root_with_id_zero() {
        let tree = PlantTree::new(Vec3::ZERO, Quat::IDENTITY);
        assert_eq!(tree.buds.len(), 1);
        assert_eq!(tree.root().id, 0);
        assert_eq!(tree.root().order, 0);
        assert_eq!(tree.root().distance_from_root, 0.0);
        assert!(tree.root().segments.is_empty());
    }

    #[test]
    fn push_bud_assigns_monotonic_ids() {
        let mut tree = PlantTree::new(Vec3::ZERO, Quat::IDENTITY);
        let a = tree.push_bud(Vec3::ZERO, Quat::IDENTITY, 1, 1.0, 0.0);
        let b = tree.push_bud(Vec3::ZERO, Quat::IDENTITY, 1, 2.0, 0.0);
        assert_eq!(tree.buds[a].id, 1);
        assert_eq!(tree.buds[b].id, 2);
        assert_eq!(a, 1);
        assert_eq!(b, 2);
    }

    #[test]
    fn tip_of_falls_back_to_the_base_before_growth() {
        let mut tree = PlantTree::new(Vec3::new(0.1, 0.2, 0.3), Quat::IDENTITY);
        assert_eq!(tree.tip_of(ROOT).0, Vec3::new(0.1, 0.2, 0.3));

        let end = Vec3::new(0.1, 0.2, 0.4);
        tree.buds[ROOT].segments.push(StemSegment {
            end_point: end,
            step_scale: 1.0,
            ..Default::default()
        });
        assert_eq!(tree.tip_of(ROOT).0, end);
    }
}
