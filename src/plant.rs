use crate::{
    config::GrowthParameters,
    growth::{bud_grow, light_pass},
    shadow_volume::{SHADOW_VOLUME_DIM, ShadowVolume, world_to_voxel},
    tree::{PlantTree, ROOT},
};
use glam::{Quat, Vec3};
use log::{debug, trace};

/// A full simulation instance: the grown tree, its shadow volume and an
/// iteration counter.
///
/// One growth iteration is one atomic call; the tree and volume are
/// exclusively owned and mutated in place. Hosts read the tree and
/// query lightness between iterations to build geometry.
#[derive(Clone, Debug, PartialEq)]
pub struct Plant {
    tree: PlantTree,
    shadow: ShadowVolume,
    age: u32,
}

impl Plant {
    /// A fresh plant: zeroed shadow volume and a single root bud near
    /// the grid's inner corner, pointing up.
    pub fn new() -> Self {
        let base = Vec3::splat(0.5 / SHADOW_VOLUME_DIM as f32);
        Self {
            tree: PlantTree::new(base, Quat::IDENTITY),
            shadow: ShadowVolume::new(),
            age: 0,
        }
    }

    /// Discards the whole tree and occupancy field and starts over.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Runs one growth iteration.
    ///
    /// The light pass first folds the tree into a total accumulated
    /// length; once that exceeds the configured maximum, growth has
    /// saturated and this returns `false` (the caller should stop
    /// iterating). Otherwise the plant earns vigor proportional to its
    /// size and distributes it through the tree, growing new segments
    /// and buds.
    pub fn do_growth_iteration(&mut self, params: &GrowthParameters) -> bool {
        let total_length =
            params.base_vigor + light_pass(&mut self.tree, &self.shadow, ROOT, params);
        if total_length > params.max_total_length {
            debug!(
                "growth saturated at length {total_length:.1} after {} iterations",
                self.age
            );
            return false;
        }

        let vigor = params.vigor_scale * total_length;
        trace!(
            "iteration {}: total length {total_length:.2}, vigor {vigor:.3}",
            self.age
        );
        bud_grow(&mut self.tree, &mut self.shadow, ROOT, vigor, params);
        self.age += 1;
        true
    }

    /// Lightness at a world-space point, for vertex coloring.
    ///
    /// ### Panics
    /// Panics if `p` maps outside the shadow volume — querying geometry
    /// outside the simulated domain is a caller bug.
    pub fn lightness_at_point(&self, p: Vec3) -> f32 {
        let voxel = world_to_voxel(p);
        let Some(occupancy) = self.shadow.occupancy_at(voxel) else {
            panic!("lightness query outside the shadow volume: {p}");
        };
        (1.0 - 2.0 * occupancy as f32 / 255.0).max(0.0)
    }

    /// Read access to the bud tree, for mesh generation.
    pub fn tree(&self) -> &PlantTree {
        &self.tree
    }

    /// Read access to the occupancy field.
    pub fn shadow(&self) -> &ShadowVolume {
        &self.shadow
    }

    /// Number of growth iterations performed since init/reset.
    pub fn age(&self) -> u32 {
        self.age
    }
}

impl Default for Plant {
    fn default() -> Self {
        Self::new()
    }
}
