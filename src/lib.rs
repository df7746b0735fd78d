//! Core 3-D procedural plant growth simulation library.
//!
//! A plant is grown iteratively toward unoccupied space: a voxelized
//! occupancy ("shadow") field models competition for light, and a
//! resource-allocation pass mimics apical dominance by deciding how much
//! growth vigor each bud receives per iteration.
//!
//! Main components:
//! - [`curve`] — piecewise-linear response curves.
//! - [`random`] — stateless deterministic random draws.
//! - [`shadow_volume`] — the saturating 3-D occupancy grid.
//! - [`tree`] — buds, stem segments and the arena-backed plant tree.
//! - [`growth`] — light pass, vigor distribution and apical growth.
//! - [`plant`] — the simulation facade (init / iterate / light query).
//! - [`config`] — global configuration for the growth algorithm.
//! - [`types`] — shared type aliases and IDs.

pub mod config;
pub mod curve;
pub mod growth;
pub mod plant;
pub mod random;
pub mod shadow_volume;
pub mod tree;
pub mod types;
