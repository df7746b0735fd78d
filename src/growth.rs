//! The growth engine: light pass, vigor distribution and apical growth.
//!
//! One iteration runs two cooperating recursive passes over the tree:
//! 1. [`light_pass`] — bottom-up: samples per-bud lightness from the
//!    shadow volume, derives segment widths from downstream length and
//!    returns the plant's total accumulated length.
//! 2. [`bud_grow`] — top-down: distributes the iteration's vigor from
//!    the root toward individual buds, activating laterals and finally
//!    extending each apex via [`apical_growth`].

use crate::{
    config::GrowthParameters,
    random::random_float,
    shadow_volume::{SHADOW_VOLUME_DIM, ShadowVolume, world_to_voxel},
    tree::{Bud, PlantTree, StemSegment},
    types::BudId,
};
use glam::{Quat, Vec3};
use log::trace;

/// Angular increment between successively spawned lateral buds,
/// producing spiral (phyllotactic) branch placement. ≈137.5°.
pub const GOLDEN_ANGLE_RAD: f32 = 2.399_963_2;

/// Shortest-arc rotation taking `from` to `to` (both unit length), with
/// a caller-supplied axis for the degenerate 180° case.
fn shortest_arc(from: Vec3, to: Vec3, fallback_axis: Vec3) -> Quat {
    let k_cos_theta = from.dot(to);
    let k = (from.length_squared() * to.length_squared()).sqrt();
    if k_cos_theta == -k {
        Quat::from_xyzw(fallback_axis.x, fallback_axis.y, fallback_axis.z, 0.0)
    } else {
        let c = from.cross(to);
        Quat::from_xyzw(c.x, c.y, c.z, k_cos_theta + k).normalize()
    }
}

/// Re-caches where a bud's local light is measured: its tip, nudged
/// forward along the local +Z axis, mapped to voxel space.
fn update_sample_point(tree: &mut PlantTree, id: BudId) {
    let (tip_point, tip_rotation) = tree.tip_of(id);
    let sample = tip_point + tip_rotation * Vec3::new(0.0, 0.0, 1.5 / SHADOW_VOLUME_DIM as f32);
    tree.buds[id].end_sample_point = world_to_voxel(sample);
}

/// Post-order light and thickness pass.
///
/// For each segment from tip to base: recurses into the lateral child
/// first, folding the lateral's length into a running total and tracking
/// the max single-branch lightness, then derives the segment's width
/// from the downstream length (`sqrt(length) * width_scale +
/// width_base` — thicker near the base, where more subtree mass
/// accumulates) and adds the segment's own contribution.
///
/// Stores the bud's aggregate lightness values and returns the total
/// accumulated length so the parent can continue the same fold. Sample
/// points outside the grid read as fully shaded.
pub fn light_pass(
    tree: &mut PlantTree,
    shadow: &ShadowVolume,
    id: BudId,
    params: &GrowthParameters,
) -> f32 {
    let occupancy = shadow
        .occupancy_at(tree.buds[id].end_sample_point)
        .unwrap_or(u8::MAX);
    let mut total_lightness = (1.0 - occupancy as f32 / 255.0).max(0.0);
    let mut max_lightness = total_lightness;
    let mut total_length = 0.0;

    for i in (0..tree.buds[id].segments.len()).rev() {
        tree.buds[id].segments[i].end_total_lightness = total_lightness;

        if let Some(lateral) = tree.buds[id].segments[i].end_lateral {
            total_length += light_pass(tree, shadow, lateral, params);
            let lateral_bud = &tree.buds[lateral];
            max_lightness = max_lightness.max(lateral_bud.max_lightness);
            total_lightness += lateral_bud.total_lightness;
        }

        let segment = &mut tree.buds[id].segments[i];
        segment.width = total_length.sqrt() * params.width_scale + params.width_base;
        total_length += segment.step_scale;
    }

    let bud = &mut tree.buds[id];
    bud.total_lightness = total_lightness;
    bud.max_lightness = max_lightness;
    total_length
}

/// Apical control for a bud: a weighted combination of its distance from
/// the root, its own segment count and its branch order, clamped to
/// [0, 1] and mapped through the apical-control curve.
///
/// 1 keeps all vigor at the apex; 0 splits it evenly among the apex and
/// all active laterals.
pub fn apical_control_of(bud: &Bud, params: &GrowthParameters) -> f32 {
    let input = params.apical_input_scale
        * (params.distance_weight * bud.distance_from_root
            + params.length_weight * bud.segments.len() as f32
            + params.order_weight * bud.order as f32);
    params.apical_control_curve.eval_at_x(input.clamp(0.0, 1.0))
}

/// Splits vigor between a bud's apex and its active laterals.
///
/// Returns `(v_main, v_lateral)` such that
/// `v_main + active_laterals * v_lateral == vigor` and both parts are
/// non-negative. As apical control approaches 1, nearly all vigor goes
/// to the apex regardless of lateral count; at 0, vigor divides across
/// the laterals.
pub fn split_vigor(apical_control: f32, active_laterals: usize, vigor: f32) -> (f32, f32) {
    let n = active_laterals as f32;
    let denom = n + 2.0 * apical_control;
    let v_lateral = if denom > 0.0 {
        (2.0 - 2.0 * apical_control).clamp(0.0, 1.0) * vigor / denom
    } else {
        0.0
    };
    (vigor - v_lateral * n, v_lateral)
}

/// Picks which lateral buds activate this iteration.
///
/// Scans segments past the no-activation zone near the base (the last
/// segment never has a lateral to activate). A lateral activates when
/// its deterministic random draw, keyed by the global seed plus its bud
/// id, exceeds the activation threshold — and its stem direction is not
/// on the same side as the previously activated lateral's direction.
/// The alternation rule keeps active branches from clustering on one
/// side of the stem.
pub fn select_active_laterals(
    tree: &PlantTree,
    id: BudId,
    params: &GrowthParameters,
) -> Vec<BudId> {
    let mut active = Vec::new();
    let mut prev_active_dir = Vec3::new(0.0, 0.0, -1.0);

    let segment_count = tree.buds[id].segments.len();
    for i in params.no_activation_zone..segment_count.saturating_sub(1) {
        let Some(lateral) = tree.buds[id].segments[i].end_lateral else {
            continue;
        };
        let lateral_bud = &tree.buds[lateral];
        let lateral_dir = lateral_bud.base_rotation * Vec3::Z;
        let draw = random_float(params.random_seed.wrapping_add(lateral_bud.id), 0.0, 1.0);

        if draw > params.activation_threshold && lateral_dir.dot(prev_active_dir) < 0.0 {
            active.push(lateral);
            prev_active_dir = lateral_dir;
        }
    }
    active
}

/// Distributes `vigor` through this bud's subtree, top-down.
///
/// Feeds unexpanded leaves first, then splits the remainder between the
/// activated laterals and the apex according to apical control, recurses
/// into the laterals and finally extends this bud's own tip.
pub fn bud_grow(
    tree: &mut PlantTree,
    shadow: &mut ShadowVolume,
    id: BudId,
    vigor: f32,
    params: &GrowthParameters,
) {
    if tree.buds[id].is_dead {
        return;
    }

    // Optional low-light pruning; disabled by default to match the
    // reference behavior of never shedding branches.
    if let Some(threshold) = params.prune_lightness_per_segment {
        let bud = &mut tree.buds[id];
        if !bud.segments.is_empty() && bud.total_lightness < threshold * bud.segments.len() as f32
        {
            trace!("bud {} died of shading at order {}", bud.id, bud.order);
            bud.is_dead = true;
            bud.segments.clear();
            return;
        }
    }

    let vigor_after_leaf_growth = vigor;

    // Leaf bookkeeping. The last segment never has a lateral.
    let segment_count = tree.buds[id].segments.len();
    for i in 0..segment_count.saturating_sub(1) {
        let segment = &tree.buds[id].segments[i];
        let width = segment.width;
        let Some(lateral) = segment.end_lateral else {
            continue;
        };

        let lateral_bud = &mut tree.buds[lateral];
        if lateral_bud.segments.is_empty() {
            lateral_bud.leaf_growth = (lateral_bud.leaf_growth
                + params.leaf_growth_rate * vigor_after_leaf_growth)
                .min(1.0);
        }
        // Leaf death by maturity or by the stem thickening past it.
        if lateral_bud.segments.len() > params.leaf_shed_segments || width > params.leaf_shed_width
        {
            lateral_bud.leaf_growth = 0.0;
        }
    }

    let apical_control = apical_control_of(&tree.buds[id], params);
    let active = select_active_laterals(tree, id, params);
    let (v_main, v_lateral) = split_vigor(apical_control, active.len(), vigor_after_leaf_growth);

    for lateral in active {
        bud_grow(tree, shadow, lateral, v_lateral, params);
    }

    apical_growth(tree, shadow, id, v_main, params);
}

/// Finalizes a bud's last segment by spawning its lateral child at the
/// segment's end point, pitched away from the stem and yawed by the
/// bud's running golden-angle offset.
fn spawn_lateral(tree: &mut PlantTree, parent: BudId, params: &GrowthParameters) {
    let bud = &tree.buds[parent];
    let last_index = bud.segments.len() - 1;
    let last = &bud.segments[last_index];
    debug_assert!(last.end_lateral.is_none());

    let angle = bud.next_bud_angle_rad;
    let rotation = last.end_rotation
        * Quat::from_rotation_z(angle)
        * Quat::from_rotation_x(params.lateral_pitch_deg.to_radians());
    let base_point = last.end_point;
    let order = bud.order + 1;
    let distance = bud.distance_from_root + bud.segments.len() as f32;

    tree.buds[parent].next_bud_angle_rad = angle + GOLDEN_ANGLE_RAD;

    let child = tree.push_bud(
        base_point,
        rotation,
        order,
        distance,
        angle + 2.0 * GOLDEN_ANGLE_RAD,
    );
    update_sample_point(tree, child);
    tree.buds[parent].segments[last_index].end_lateral = Some(child);

    trace!(
        "bud {} spawned lateral {} at order {}",
        tree.buds[parent].id, tree.buds[child].id, order
    );
}

/// Extends a bud's own tip, consuming `vigor` in unit-scale chunks.
///
/// Each step steers toward the most open neighboring space (falling
/// back to the current forward direction), biased by a sideways twist
/// and a downward tropism, then advances the tip one voxel-scale step
/// and stamps the new occupancy footprint. Steps that land outside the
/// grid are dropped; the plant simply cannot grow there. A sub-unit
/// step never creates a bud's first segment, so sub-threshold vigor
/// produces no visible growth.
pub fn apical_growth(
    tree: &mut PlantTree,
    shadow: &mut ShadowVolume,
    id: BudId,
    vigor: f32,
    params: &GrowthParameters,
) {
    let mut remaining = vigor;
    while remaining > 0.0 {
        let step = remaining.min(1.0);
        remaining -= 1.0;

        let (tip_point, tip_rotation) = tree.tip_of(id);
        let old_dir = tip_rotation * Vec3::Z;

        let mut candidate = shadow.find_open_direction(tip_point).unwrap_or(old_dir);
        // Sideways twist to break symmetry.
        candidate += tip_rotation * Vec3::new(params.twist, 0.0, 0.0);

        let mut new_dir = old_dir.lerp(candidate, step);
        new_dir.z -= params.tropism * step;
        let new_dir = new_dir.normalize();

        let rotator = shortest_arc(old_dir, new_dir, Vec3::Z);
        let new_rotation = rotator * tip_rotation;
        let new_point = tip_point + new_dir * (step / SHADOW_VOLUME_DIM as f32);

        let voxel = world_to_voxel(new_point);
        if !shadow.contains(voxel) {
            continue;
        }

        let segments = &tree.buds[id].segments;
        if segments.is_empty() && step < 1.0 {
            // A bud needs a full unit of vigor to break out into its
            // first segment.
            continue;
        }
        let needs_new_segment = match segments.last() {
            None => true,
            Some(last) => last.step_scale + step > 1.0,
        };

        if needs_new_segment {
            if !tree.buds[id].segments.is_empty() {
                spawn_lateral(tree, id, params);
            }
            tree.buds[id].segments.push(StemSegment::default());
            shadow.stamp_pyramid(voxel);
        }

        if let Some(last) = tree.buds[id].segments.last_mut() {
            last.end_point = new_point;
            last.end_rotation = new_rotation;
            last.step_scale += step;
        }

        update_sample_point(tree, id);
    }
}
