//! Coverage algebra shared by every solver.
//!
//! A [`Coverage`] owns the processed pictures of one problem and knows how to
//! score, subtract and query them against a "still needed" state. The
//! solvers are generic over this trait and never look at the color mode
//! themselves: binary problems use [`BinaryCoverage`] (bit-packed, compacted)
//! and weighted problems use [`WeightedCoverage`] (per-element amounts).

use crate::bitset::BitSet;

/// Processed pictures together with the operations the solvers need.
///
/// All amounts are expressed in original-image units, so covers from either
/// mode can be compared against [`Coverage::required_total`].
pub trait Coverage {
    /// Remaining-need state threaded through a search branch.
    type Need: Clone;

    fn picture_count(&self) -> usize;

    /// Number of processed elements.
    fn element_count(&self) -> usize;

    /// Total amount the caller asked to be covered, including amounts that no
    /// picture can supply.
    fn required_total(&self) -> u64;

    /// Returns true if `picture` contributes anything to `element`.
    fn covers(&self, picture: usize, element: usize) -> bool;

    /// A need with nothing left to cover.
    fn satisfied(&self) -> Self::Need;

    /// Amount `picture` would add if chosen against `need`.
    fn marginal_value(&self, picture: usize, need: &Self::Need) -> u64;

    /// Marks one element as covered, or restores its full coverable need.
    fn mark_element(&self, need: &mut Self::Need, element: usize, covered: bool);

    /// Removes the contribution of `picture` from `need`.
    fn subtract(&self, picture: usize, need: &mut Self::Need);

    /// Amount still needed at `element` (0 or 1 in binary mode).
    fn still_needed(&self, need: &Self::Need, element: usize) -> u64;

    fn is_satisfied(&self, need: &Self::Need) -> bool {
        (0..self.element_count()).all(|element| self.still_needed(need, element) == 0)
    }

    /// The need at the root of a search: every element uncovered.
    ///
    /// Only the amount the pictures can jointly supply is needed, so every
    /// element with a positive need always has some unused picture covering it.
    fn root_need(&self) -> Self::Need {
        let mut need = self.satisfied();
        for element in 0..self.element_count() {
            self.mark_element(&mut need, element, false);
        }
        need
    }
}

/// Compacted, bit-packed binary problem.
#[derive(Debug, Clone)]
pub struct BinaryCoverage {
    /// One packed bit set per picture over processed elements.
    pub(crate) pictures: Vec<BitSet>,
    /// Number of original elements each processed element stands for.
    pub(crate) weights: Vec<u64>,
    pub(crate) required_total: u64,
}

impl Coverage for BinaryCoverage {
    type Need = BitSet;

    fn picture_count(&self) -> usize {
        self.pictures.len()
    }

    fn element_count(&self) -> usize {
        self.weights.len()
    }

    fn required_total(&self) -> u64 {
        self.required_total
    }

    #[inline]
    fn covers(&self, picture: usize, element: usize) -> bool {
        self.pictures[picture].contains(element)
    }

    fn satisfied(&self) -> BitSet {
        BitSet::new(self.weights.len())
    }

    #[inline]
    fn marginal_value(&self, picture: usize, need: &BitSet) -> u64 {
        self.pictures[picture]
            .ones_in_common(need)
            .map(|element| self.weights[element])
            .sum()
    }

    fn mark_element(&self, need: &mut BitSet, element: usize, covered: bool) {
        if covered {
            need.remove(element);
        } else {
            need.insert(element);
        }
    }

    #[inline]
    fn subtract(&self, picture: usize, need: &mut BitSet) {
        need.and_not(&self.pictures[picture]);
    }

    #[inline]
    fn still_needed(&self, need: &BitSet, element: usize) -> u64 {
        u64::from(need.contains(element))
    }

    fn is_satisfied(&self, need: &BitSet) -> bool {
        need.is_clear()
    }
}

/// Weighted problem: pictures keep their per-element amounts.
#[derive(Debug, Clone)]
pub struct WeightedCoverage {
    pub(crate) pictures: Vec<Vec<u32>>,
    /// Per-element need at the root: the requirement capped at what all
    /// pictures together can supply.
    pub(crate) coverable: Vec<u32>,
    pub(crate) required_total: u64,
}

impl Coverage for WeightedCoverage {
    type Need = Vec<u32>;

    fn picture_count(&self) -> usize {
        self.pictures.len()
    }

    fn element_count(&self) -> usize {
        self.coverable.len()
    }

    fn required_total(&self) -> u64 {
        self.required_total
    }

    #[inline]
    fn covers(&self, picture: usize, element: usize) -> bool {
        self.pictures[picture][element] > 0
    }

    fn satisfied(&self) -> Vec<u32> {
        vec![0; self.coverable.len()]
    }

    #[inline]
    fn marginal_value(&self, picture: usize, need: &Vec<u32>) -> u64 {
        self.pictures[picture]
            .iter()
            .zip(need)
            .map(|(&amount, &needed)| u64::from(amount.min(needed)))
            .sum()
    }

    fn mark_element(&self, need: &mut Vec<u32>, element: usize, covered: bool) {
        need[element] = if covered { 0 } else { self.coverable[element] };
    }

    #[inline]
    fn subtract(&self, picture: usize, need: &mut Vec<u32>) {
        for (needed, &amount) in need.iter_mut().zip(&self.pictures[picture]) {
            *needed = needed.saturating_sub(amount);
        }
    }

    #[inline]
    fn still_needed(&self, need: &Vec<u32>, element: usize) -> u64 {
        u64::from(need[element])
    }

    fn is_satisfied(&self, need: &Vec<u32>) -> bool {
        need.iter().all(|&needed| needed == 0)
    }
}
