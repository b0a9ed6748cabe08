//! Greedy heuristic: repeatedly take the picture that covers the most.
//!
//! Its answer is feasible whenever full cover is possible and seeds the exact
//! and exhaustive searches with an upper bound.

use log::debug;

use crate::bitset::BitSet;
use crate::coverage::Coverage;
use crate::search::{Limits, Selection};

/// Runs the greedy heuristic.
///
/// Stops when nothing more can be covered or the cover target of `limits`
/// is reached. Ties between equally valuable pictures go to the lowest index.
pub(crate) fn solve<C: Coverage>(coverage: &C, limits: &Limits) -> Selection {
    let target = limits.cover_target(coverage.required_total());
    let picture_count = coverage.picture_count();

    let mut need = coverage.root_need();
    let mut used = BitSet::new(picture_count);
    let mut pictures = Vec::new();
    let mut covered = 0u64;

    while pictures.len() < picture_count {
        if target.is_some_and(|target| covered >= target) {
            break;
        }

        let mut best: Option<(usize, u64)> = None;
        for picture in (0..picture_count).filter(|&p| !used.contains(p)) {
            let value = coverage.marginal_value(picture, &need);
            if best.map_or(true, |(_, best_value)| value > best_value) {
                best = Some((picture, value));
            }
        }

        let Some((picture, value)) = best.filter(|&(_, value)| value > 0) else {
            break;
        };

        used.insert(picture);
        pictures.push(picture);
        coverage.subtract(picture, &mut need);
        covered += value;
        debug!("greedy: picked picture {} (+{}, total {})", picture, value, covered);
    }

    let goal = coverage.is_satisfied(&need) || target.is_some_and(|target| covered >= target);
    Selection {
        pictures,
        covered,
        goal,
    }
}
