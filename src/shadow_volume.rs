use glam::{IVec3, Vec3};

/// Side length of the cubic shadow volume, in voxels.
///
/// The grid covers world X,Y ∈ [-0.5, 0.5) and Z ∈ [0, 1), a unit-ish
/// cell around the plant's base.
pub const SHADOW_VOLUME_DIM: i32 = 64;

/// Maps a world-space point to shadow-volume voxel coordinates.
///
/// The result may lie outside the grid; callers are expected to check
/// with [`ShadowVolume::contains`] rather than rely on silent clamping.
pub fn world_to_voxel(p: Vec3) -> IVec3 {
    IVec3::new(
        ((p.x + 0.5) * SHADOW_VOLUME_DIM as f32).floor() as i32,
        ((p.y + 0.5) * SHADOW_VOLUME_DIM as f32).floor() as i32,
        (p.z * SHADOW_VOLUME_DIM as f32).floor() as i32,
    )
}

/// A fixed-resolution 3-D grid of saturating occupancy counters.
///
/// Each voxel stores how much shade has accumulated at that location;
/// higher values mean "more shaded / more occupied", so occupancy is an
/// inverse proxy for light availability. Counters saturate at 255 and
/// never wrap, and they are only ever incremented during a simulation
/// run.
#[derive(Clone, Debug, PartialEq)]
pub struct ShadowVolume {
    voxels: Vec<u8>,
}

impl ShadowVolume {
    pub fn new() -> Self {
        let dim = SHADOW_VOLUME_DIM as usize;
        Self {
            voxels: vec![0; dim * dim * dim],
        }
    }

    fn index(v: IVec3) -> usize {
        (v.z * SHADOW_VOLUME_DIM * SHADOW_VOLUME_DIM + v.y * SHADOW_VOLUME_DIM + v.x) as usize
    }

    pub fn contains(&self, v: IVec3) -> bool {
        v.cmpge(IVec3::ZERO).all() && v.cmplt(IVec3::splat(SHADOW_VOLUME_DIM)).all()
    }

    /// Checked occupancy read; `None` if `v` lies outside the grid.
    pub fn occupancy_at(&self, v: IVec3) -> Option<u8> {
        if self.contains(v) {
            Some(self.voxels[Self::index(v)])
        } else {
            None
        }
    }

    /// Adds `amount` to the voxel's counter, saturating at 255.
    ///
    /// `v` must be inside the grid.
    pub fn increment(&mut self, v: IVec3, amount: u8) {
        debug_assert!(self.contains(v));
        let val = &mut self.voxels[Self::index(v)];
        *val = val.saturating_add(amount);
    }

    /// Increments every voxel of an axis-aligned rectangle at one
    /// z-layer, after clamping the rectangle (and z) to grid bounds.
    pub fn stamp_clamped_square(
        &mut self,
        min_x: i32,
        max_x: i32,
        min_y: i32,
        max_y: i32,
        z: i32,
        amount: u8,
    ) {
        let min_x = min_x.clamp(0, SHADOW_VOLUME_DIM - 1);
        let max_x = max_x.clamp(0, SHADOW_VOLUME_DIM - 1);
        let min_y = min_y.clamp(0, SHADOW_VOLUME_DIM - 1);
        let max_y = max_y.clamp(0, SHADOW_VOLUME_DIM - 1);
        let z = z.clamp(0, SHADOW_VOLUME_DIM - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                self.increment(IVec3::new(x, y, z), amount);
            }
        }
    }

    /// Paints the decaying occupancy footprint of a new growth point:
    /// four concentric squares of increasing radius and decreasing
    /// amount on the z-layers behind `v`, approximating a cone of shade
    /// cast downward under the tip.
    pub fn stamp_pyramid(&mut self, v: IVec3) {
        self.stamp_clamped_square(v.x - 1, v.x + 1, v.y - 1, v.y + 1, v.z, 8);
        self.stamp_clamped_square(v.x - 1, v.x + 1, v.y - 1, v.y + 1, v.z - 1, 6);
        self.stamp_clamped_square(v.x - 2, v.x + 2, v.y - 2, v.y + 2, v.z - 2, 3);
        self.stamp_clamped_square(v.x - 3, v.x + 3, v.y - 3, v.y + 3, v.z - 3, 2);
    }

    /// Finds the most open direction around `p` by weighting the 26
    /// neighbor offsets of its voxel with `1 - occupancy / 255`.
    ///
    /// Returns `None` when every neighbor is fully occluded or the
    /// weighted directions cancel out (a fully symmetric neighborhood);
    /// the caller falls back to its current forward direction.
    pub fn find_open_direction(&self, p: Vec3) -> Option<Vec3> {
        let center = world_to_voxel(p);
        let min = (center - IVec3::ONE).max(IVec3::ZERO);
        let max = (center + IVec3::ONE).min(IVec3::splat(SHADOW_VOLUME_DIM - 1));

        let mut dir = Vec3::ZERO;
        let mut total_weight = 0.0_f32;

        for z in min.z..=max.z {
            for y in min.y..=max.y {
                for x in min.x..=max.x {
                    let offset = IVec3::new(x, y, z) - center;
                    if offset == IVec3::ZERO {
                        continue;
                    }
                    let occupancy = self.voxels[Self::index(IVec3::new(x, y, z))];
                    let weight = 1.0 - occupancy as f32 / 255.0;
                    dir += offset.as_vec3() * weight;
                    total_weight += weight;
                }
            }
        }

        if total_weight == 0.0 {
            return None;
        }
        dir /= total_weight;

        let len = dir.length();
        if len == 0.0 {
            return None;
        }
        Some(dir / len)
    }

    /// Read-only access to the raw voxel data, laid out z-major
    /// (`z * S² + y * S + x`). Useful for hosts that visualize the
    /// field.
    pub fn voxels(&self) -> &[u8] {
        &self.voxels
    }
}

impl Default for ShadowVolume {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{IVec3, Vec3};

    #[test]
    fn world_to_voxel_maps_the_unit_cell() {
        // World origin sits in the middle of the grid on X/Y and at the
        // bottom on Z.
        assert_eq!(world_to_voxel(Vec3::ZERO), IVec3::new(32, 32, 0));
        // A point near the plant's base maps just inside the corner.
        let base = Vec3::splat(0.5 / SHADOW_VOLUME_DIM as f32);
        assert_eq!(world_to_voxel(base), IVec3::new(32, 32, 0));
        // Points outside the cell map to out-of-range voxels; no clamping.
        assert_eq!(world_to_voxel(Vec3::new(-0.6, 0.0, 0.5)).x, -7);
        assert_eq!(world_to_voxel(Vec3::new(0.0, 0.0, 1.5)).z, 96);
    }

    #[test]
    fn contains_accepts_grid_voxels_only() {
        let vol = ShadowVolume::new();
        assert!(vol.contains(IVec3::ZERO));
        assert!(vol.contains(IVec3::splat(SHADOW_VOLUME_DIM - 1)));
        assert!(!vol.contains(IVec3::new(-1, 0, 0)));
        assert!(!vol.contains(IVec3::new(0, SHADOW_VOLUME_DIM, 0)));
    }

    #[test]
    fn increment_saturates_at_255() {
        let mut vol = ShadowVolume::new();
        let v = IVec3::new(10, 10, 10);
        vol.increment(v, 250);
        vol.increment(v, 250);
        assert_eq!(vol.occupancy_at(v), Some(255));
        vol.increment(v, 1);
        assert_eq!(vol.occupancy_at(v), Some(255));
    }

    #[test]
    fn stamp_square_clamps_to_grid_bounds() {
        let mut vol = ShadowVolume::new();
        vol.stamp_clamped_square(-2, 0, -2, 0, 0, 5);
        assert_eq!(vol.occupancy_at(IVec3::new(0, 0, 0)), Some(5));
        assert_eq!(vol.occupancy_at(IVec3::new(1, 0, 0)), Some(0));
        assert_eq!(vol.occupancy_at(IVec3::new(0, 1, 0)), Some(0));
    }

    #[test]
    fn stamp_pyramid_paints_decaying_layers_behind_the_tip() {
        let mut vol = ShadowVolume::new();
        let v = IVec3::new(32, 32, 10);
        vol.stamp_pyramid(v);

        // Layer at the tip: radius-1 square of 8.
        assert_eq!(vol.occupancy_at(IVec3::new(32, 32, 10)), Some(8));
        assert_eq!(vol.occupancy_at(IVec3::new(33, 33, 10)), Some(8));
        assert_eq!(vol.occupancy_at(IVec3::new(34, 32, 10)), Some(0));
        // One layer down: radius-1 square of 6.
        assert_eq!(vol.occupancy_at(IVec3::new(31, 31, 9)), Some(6));
        // Two layers down: radius-2 square of 3.
        assert_eq!(vol.occupancy_at(IVec3::new(34, 34, 8)), Some(3));
        assert_eq!(vol.occupancy_at(IVec3::new(35, 32, 8)), Some(0));
        // Three layers down: radius-3 square of 2.
        assert_eq!(vol.occupancy_at(IVec3::new(35, 32, 7)), Some(2));
        // Nothing above the tip.
        assert_eq!(vol.occupancy_at(IVec3::new(32, 32, 11)), Some(0));
    }

    #[test]
    fn open_direction_is_none_in_a_symmetric_neighborhood() {
        let vol = ShadowVolume::new();
        // An empty interior neighborhood is fully symmetric: the
        // weighted offsets cancel out.
        assert_eq!(vol.find_open_direction(Vec3::new(0.0, 0.0, 0.5)), None);
    }

    #[test]
    fn open_direction_is_none_when_fully_occluded() {
        let mut vol = ShadowVolume::new();
        let center = world_to_voxel(Vec3::new(0.0, 0.0, 0.5));
        for z in -1..=1 {
            for y in -1..=1 {
                for x in -1..=1 {
                    vol.increment(center + IVec3::new(x, y, z), 255);
                }
            }
        }
        assert_eq!(vol.find_open_direction(Vec3::new(0.0, 0.0, 0.5)), None);
    }

    #[test]
    fn open_direction_points_away_from_occupied_voxels() {
        let mut vol = ShadowVolume::new();
        let center = world_to_voxel(Vec3::new(0.0, 0.0, 0.5));
        // Wall of shade on the +X side of the neighborhood.
        for z in -1..=1 {
            for y in -1..=1 {
                vol.increment(center + IVec3::new(1, y, z), 255);
            }
        }
        let dir = vol
            .find_open_direction(Vec3::new(0.0, 0.0, 0.5))
            .expect("asymmetric neighborhood should yield a direction");
        assert!(dir.x < 0.0);
        assert!((dir.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn open_direction_at_grid_corner_points_inward() {
        let vol = ShadowVolume::new();
        // The clamped neighborhood of the corner voxel only has inward
        // neighbors, so the average direction points into the grid.
        let corner = Vec3::new(-0.5 + 0.001, -0.5 + 0.001, 0.001);
        let dir = vol.find_open_direction(corner).expect("corner is open");
        assert!(dir.x > 0.0 && dir.y > 0.0 && dir.z > 0.0);
    }
}
