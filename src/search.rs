//! Bookkeeping shared by the exact and exhaustive solvers.
//!
//! Holds the incumbent (best selection so far), the current path, the
//! picture-usage flags and the stop/prune rules every search node applies.

use std::time::Instant;

use log::debug;

use crate::bitset::BitSet;
use crate::coverage::Coverage;

/// Early-acceptance and depth bounds for one solve.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Limits {
    /// Maximum number of pictures in a selection.
    pub size: Option<usize>,
    /// Fraction of the required total that counts as good enough.
    pub cover: Option<f64>,
}

impl Limits {
    /// Converts the cover fraction into an amount in original-image units.
    pub fn cover_target(&self, required_total: u64) -> Option<u64> {
        self.cover
            .map(|fraction| (fraction * required_total as f64).ceil() as u64)
    }
}

/// A set of chosen pictures and what it achieves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Selection {
    /// Picture indices in the order they were chosen.
    pub pictures: Vec<usize>,
    /// Achieved cover in original-image units.
    pub covered: u64,
    /// Everything coverable is covered, or the cover target was reached.
    pub goal: bool,
}

/// Best selection found so far, plus the sequence of improvements.
#[derive(Debug, Default)]
pub(crate) struct Incumbent {
    best: Option<Selection>,
    history: Vec<(usize, u64)>,
}

impl Incumbent {
    pub fn best(&self) -> Option<&Selection> {
        self.best.as_ref()
    }

    /// Applies the replacement order: a selection reaching the goal beats one
    /// that does not; among goal-reaching selections fewer pictures win;
    /// otherwise more cover wins.
    pub fn improves(&self, size: usize, covered: u64, goal: bool) -> bool {
        let Some(best) = &self.best else {
            return true;
        };
        if goal != best.goal {
            return goal;
        }
        if goal {
            size < best.pictures.len()
        } else {
            covered > best.covered
        }
    }

    pub fn replace(&mut self, selection: Selection) {
        self.history
            .push((selection.pictures.len(), selection.covered));
        self.best = Some(selection);
    }

    /// Number of times the incumbent was replaced.
    pub fn improvements(&self) -> usize {
        self.history.len()
    }

    #[cfg(test)]
    pub fn history(&self) -> &[(usize, u64)] {
        &self.history
    }

    pub fn into_best(self) -> Option<Selection> {
        self.best
    }
}

/// Mutable state of one branch-and-bound run.
pub(crate) struct Search<'a, C: Coverage> {
    pub coverage: &'a C,
    limits: Limits,
    target: Option<u64>,
    pub incumbent: Incumbent,
    used: BitSet,
    path: Vec<usize>,
    pub nodes: u64,
    pub started: Instant,
}

impl<'a, C: Coverage> Search<'a, C> {
    /// Starts a search with `seed` (normally the greedy answer) as incumbent.
    pub fn new(coverage: &'a C, limits: Limits, seed: Selection) -> Self {
        let mut incumbent = Incumbent::default();
        incumbent.replace(seed);
        Self {
            coverage,
            limits,
            target: limits.cover_target(coverage.required_total()),
            incumbent,
            used: BitSet::new(coverage.picture_count()),
            path: Vec::new(),
            nodes: 0,
            started: Instant::now(),
        }
    }

    /// Number of pictures on the current path.
    #[inline]
    pub fn depth(&self) -> usize {
        self.path.len()
    }

    #[inline]
    pub fn is_used(&self, picture: usize) -> bool {
        self.used.contains(picture)
    }

    pub fn push(&mut self, picture: usize) {
        self.used.insert(picture);
        self.path.push(picture);
    }

    pub fn pop(&mut self) {
        if let Some(picture) = self.path.pop() {
            self.used.remove(picture);
        }
    }

    fn reaches_target(&self, covered: u64) -> bool {
        self.target.is_some_and(|target| covered >= target)
    }

    /// Offers the current path to the incumbent.
    pub fn consider(&mut self, covered: u64, full: bool) {
        let goal = full || self.reaches_target(covered);
        if self.incumbent.improves(self.depth(), covered, goal) {
            debug!(
                "incumbent: {} pictures, cover {} (goal: {})",
                self.depth(),
                covered,
                goal
            );
            self.incumbent.replace(Selection {
                pictures: self.path.clone(),
                covered,
                goal,
            });
        }
    }

    /// Decides whether the current node ends its branch.
    ///
    /// Complete covers, reached cover targets and the size limit end the
    /// branch and are offered to the incumbent. A node as deep as a
    /// goal-reaching incumbent can not beat it and is dropped.
    pub fn should_stop(&mut self, covered: u64, need: &C::Need) -> bool {
        let depth = self.depth();
        let full = self.coverage.is_satisfied(need);
        if full
            || self.reaches_target(covered)
            || self.limits.size.is_some_and(|size| depth >= size)
        {
            self.consider(covered, full);
            return true;
        }
        self.incumbent
            .best()
            .is_some_and(|best| best.goal && depth >= best.pictures.len())
    }

    /// Returns true once no remaining sibling of the current node's children
    /// can beat the incumbent.
    pub fn siblings_exhausted(&self) -> bool {
        self.incumbent
            .best()
            .is_some_and(|best| best.goal && best.pictures.len() <= self.depth() + 1)
    }

    pub fn into_selection(self) -> Option<Selection> {
        self.incumbent.into_best()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selection(pictures: &[usize], covered: u64, goal: bool) -> Selection {
        Selection {
            pictures: pictures.to_vec(),
            covered,
            goal,
        }
    }

    #[test]
    fn test_first_selection_always_improves() {
        let incumbent = Incumbent::default();
        assert!(incumbent.improves(7, 0, false));
    }

    #[test]
    fn test_goal_beats_partial_regardless_of_size() {
        let mut incumbent = Incumbent::default();
        incumbent.replace(selection(&[0], 90, false));
        assert!(incumbent.improves(5, 100, true));

        incumbent.replace(selection(&[0, 1, 2, 3, 4], 100, true));
        assert!(!incumbent.improves(1, 99, false));
    }

    #[test]
    fn test_goal_selections_compare_by_size() {
        let mut incumbent = Incumbent::default();
        incumbent.replace(selection(&[0, 1, 2], 100, true));
        assert!(incumbent.improves(2, 80, true));
        assert!(!incumbent.improves(3, 100, true));
        assert!(!incumbent.improves(4, 100, true));
    }

    #[test]
    fn test_partial_selections_compare_by_cover() {
        let mut incumbent = Incumbent::default();
        incumbent.replace(selection(&[0, 1], 50, false));
        assert!(incumbent.improves(3, 51, false));
        assert!(!incumbent.improves(1, 50, false));
        assert_eq!(incumbent.improvements(), 1);
    }

    #[test]
    fn test_cover_target_rounds_up() {
        let limits = Limits {
            size: None,
            cover: Some(0.5),
        };
        assert_eq!(limits.cover_target(7), Some(4));
        assert_eq!(Limits::default().cover_target(7), None);
    }
}
