/// Identifier for a bud in a [`crate::tree::PlantTree`].
///
/// This is an index into `PlantTree::buds`, and is only meaningful within
/// the lifetime of a given `PlantTree` instance.
pub type BudId = usize;
