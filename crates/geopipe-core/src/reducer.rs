use crate::action::ActionEntry;
use crate::features::FeatureCollection;
use crate::registry::{Accumulator, HandlerRegistry};

/// Fold `actions` left to right over `initial`.
///
/// Always starts from `initial` and an empty outcome map: nothing from a
/// previous fold is reused, since any action may depend on the geometry
/// produced by the ones before it.
pub fn fold(
    registry: &HandlerRegistry,
    initial: &FeatureCollection,
    actions: &[ActionEntry],
) -> Accumulator {
    actions
        .iter()
        .fold(Accumulator::new(initial.clone()), |acc, entry| {
            registry.apply(acc, entry)
        })
}
