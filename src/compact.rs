//! Turns raw pictures into the processed form the solvers work on.
//!
//! Binary problems are shrunk and zipped: original elements with the same
//! coverage signature (the set of pictures covering them) are merged into one
//! processed element, elements nobody covers or nobody requires are dropped,
//! and each picture is packed into a bit set over the processed elements.
//! Weighted problems keep their amounts and only get a coverable need.

use log::debug;
use rustc_hash::FxHashMap;

use crate::bitset::BitSet;
use crate::coverage::{BinaryCoverage, WeightedCoverage};

/// Shrinks and packs binary pictures.
///
/// `required` is a 0/1 mask over original elements; `None` requires every
/// element. All slices must have length `image_size`.
pub fn shrink(
    image_size: usize,
    pictures: &[Vec<u32>],
    required: Option<&[u32]>,
) -> BinaryCoverage {
    let picture_count = pictures.len();

    let mut signature_index: FxHashMap<BitSet, usize> = FxHashMap::default();
    let mut signatures: Vec<BitSet> = Vec::new();
    let mut weights: Vec<u64> = Vec::new();
    let mut required_total = 0u64;
    let mut uncoverable = 0usize;

    for element in 0..image_size {
        if required.is_some_and(|mask| mask[element] == 0) {
            continue;
        }
        required_total += 1;

        let mut signature = BitSet::new(picture_count);
        for (picture_index, picture) in pictures.iter().enumerate() {
            if picture[element] != 0 {
                signature.insert(picture_index);
            }
        }
        if signature.is_clear() {
            uncoverable += 1;
            continue;
        }

        // elements with identical signatures are interchangeable for the search
        if let Some(&processed) = signature_index.get(&signature) {
            weights[processed] += 1;
        } else {
            signature_index.insert(signature.clone(), signatures.len());
            signatures.push(signature);
            weights.push(1);
        }
    }

    let processed_size = signatures.len();
    let mut packed = vec![BitSet::new(processed_size); picture_count];
    for (processed, signature) in signatures.iter().enumerate() {
        for picture_index in signature.ones() {
            packed[picture_index].insert(processed);
        }
    }

    debug!(
        "shrink: {} original elements -> {} processed ({} required, {} uncoverable)",
        image_size, processed_size, required_total, uncoverable
    );

    BinaryCoverage {
        pictures: packed,
        weights,
        required_total,
    }
}

/// Prepares weighted pictures.
///
/// Without an explicit requirement every element must be covered up to
/// `max_value`. The root need of each element is capped at the sum of what
/// all pictures supply there.
pub fn prepare_weighted(
    image_size: usize,
    max_value: u32,
    pictures: &[Vec<u32>],
    required: Option<&[u32]>,
) -> WeightedCoverage {
    let required = match required {
        Some(amounts) => amounts.to_vec(),
        None => vec![max_value; image_size],
    };
    let required_total = required.iter().map(|&amount| u64::from(amount)).sum();

    let coverable: Vec<u32> = required
        .iter()
        .enumerate()
        .map(|(element, &amount)| {
            let supply: u64 = pictures
                .iter()
                .map(|picture| u64::from(picture[element]))
                .sum();
            // the cap is at most `amount`, so it fits back into u32
            supply.min(u64::from(amount)) as u32
        })
        .collect();

    debug!(
        "weighted: {} elements, {} required, {} coverable",
        image_size,
        required_total,
        coverable.iter().map(|&amount| u64::from(amount)).sum::<u64>()
    );

    WeightedCoverage {
        pictures: pictures.to_vec(),
        coverable,
        required_total,
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::coverage::Coverage;

    #[test]
    fn test_identical_signatures_merge() {
        let pictures = vec![vec![1, 1, 0, 0], vec![0, 0, 1, 1], vec![1, 0, 0, 1]];
        let coverage = shrink(4, &pictures, None);

        // signatures: e0={0,2}, e1={0}, e2={1}, e3={1,2}: nothing merges
        assert_eq!(coverage.element_count(), 4);

        // without the diagonal picture, each half shares one signature
        let pictures = vec![vec![1, 1, 0, 0], vec![0, 0, 1, 1]];
        let coverage = shrink(4, &pictures, None);
        assert_eq!(coverage.element_count(), 2);
        assert_eq!(coverage.weights, vec![2, 2]);
        assert_eq!(coverage.required_total(), 4);
        assert!(coverage.covers(0, 0));
        assert!(!coverage.covers(0, 1));
    }

    #[test]
    fn test_uncoverable_and_excluded_elements_dropped() {
        let pictures = vec![vec![1, 0, 0, 1], vec![1, 0, 0, 0]];
        let mask = [1, 1, 1, 0];
        let coverage = shrink(4, &pictures, Some(&mask[..]));

        // element 3 is excluded, elements 1 and 2 are uncoverable
        assert_eq!(coverage.element_count(), 1);
        assert_eq!(coverage.required_total(), 3);
        assert_eq!(coverage.marginal_value(0, &coverage.root_need()), 1);
    }

    #[test]
    fn test_packed_pictures_span_words() {
        // enough distinct signatures to need more than one word
        let elements = 150;
        let pictures: Vec<Vec<u32>> = (0..8)
            .map(|p| (0..elements).map(|e| u32::from((e >> p) & 1 == 1)).collect())
            .collect();
        let coverage = shrink(elements, &pictures, None);

        // element 0 has no picture; 1..=149 map onto 149 distinct signatures
        assert_eq!(coverage.element_count(), 149);
        assert_eq!(coverage.required_total(), 150);
        let total: u64 = coverage.weights.iter().sum();
        assert_eq!(total, 149);
    }

    #[test]
    fn test_weighted_default_requirement_and_cap() {
        let pictures = vec![vec![10, 0], vec![0, 5]];
        let coverage = prepare_weighted(2, 255, &pictures, None);
        assert_eq!(coverage.required_total(), 510);
        assert_eq!(coverage.coverable, vec![10, 5]);

        let required = [10, 10];
        let coverage = prepare_weighted(2, 255, &pictures, Some(&required[..]));
        assert_eq!(coverage.required_total(), 20);
        assert_eq!(coverage.root_need(), vec![10, 5]);
    }
}
