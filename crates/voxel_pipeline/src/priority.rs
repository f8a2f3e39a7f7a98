//! Distance-based ordering of pending work.

use glam::IVec3;

use crate::coords::BlockCoord;

/// Reorder `items` by ascending squared distance of their block
/// coordinate to `reference`. The closest item ends up first.
///
/// Unstable sort: ties break arbitrarily. O(n log n), stateless, and
/// idempotent for a fixed reference point, so the workers can call it
/// again at every synchronization boundary with an updated reference.
///
/// This is a cheap heuristic, not a scheduler: there is no aging term,
/// so a block that stays far from the reference point can be starved
/// indefinitely while closer work keeps arriving. If fairness matters,
/// layer aging on the key rather than changing this contract.
pub fn reorder_by_distance<T>(items: &mut [T], reference: IVec3, coord: impl Fn(&T) -> BlockCoord) {
  items.sort_unstable_by_key(|item| coord(item).distance_sq(reference));
}

#[cfg(test)]
#[path = "priority_test.rs"]
mod priority_test;
