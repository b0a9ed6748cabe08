//! Exact branch-and-bound search.
//!
//! Every node branches on its split element: the still-needed element seen by
//! the fewest pictures. Some chosen picture has to cover it, so only the
//! pictures covering it become children, which keeps the branching factor
//! small. Children are tried in order of descending selection rank and
//! branches are pruned against the incumbent.

use log::info;

use crate::coverage::Coverage;
use crate::error::{Error, Result};
use crate::search::{Limits, Search, Selection};

/// Static per-picture and per-element scores used to order the search.
#[derive(Debug)]
struct Ranking {
    /// Selection rank per picture: sum of `1 / visibility` over its elements.
    rank: Vec<f64>,
    /// Pictures covering each element, in increasing index order.
    covering: Vec<Vec<usize>>,
    /// Sum of the selection ranks of the pictures covering each element.
    total_rank: Vec<f64>,
}

impl Ranking {
    fn new<C: Coverage>(coverage: &C) -> Self {
        let element_count = coverage.element_count();
        let picture_count = coverage.picture_count();

        let covering: Vec<Vec<usize>> = (0..element_count)
            .map(|element| {
                (0..picture_count)
                    .filter(|&picture| coverage.covers(picture, element))
                    .collect()
            })
            .collect();

        let mut rank = vec![0.0; picture_count];
        for pictures in &covering {
            let share = 1.0 / pictures.len() as f64;
            for &picture in pictures {
                rank[picture] += share;
            }
        }

        let total_rank = covering
            .iter()
            .map(|pictures| pictures.iter().map(|&picture| rank[picture]).sum())
            .collect();

        Self {
            rank,
            covering,
            total_rank,
        }
    }

    /// Visibility-set size of an element.
    #[inline]
    fn visibility(&self, element: usize) -> usize {
        self.covering[element].len()
    }

    /// Picks the still-needed element with the smallest visibility set,
    /// breaking ties by the largest total selection rank, then lowest index.
    fn split_element<C: Coverage>(&self, coverage: &C, need: &C::Need) -> Option<usize> {
        let mut split: Option<usize> = None;
        for element in 0..coverage.element_count() {
            if coverage.still_needed(need, element) == 0 {
                continue;
            }
            let better = match split {
                None => true,
                Some(current) => {
                    let (visibility, current_visibility) =
                        (self.visibility(element), self.visibility(current));
                    visibility < current_visibility
                        || (visibility == current_visibility
                            && self.total_rank[element] > self.total_rank[current])
                }
            };
            if better {
                split = Some(element);
            }
        }
        split
    }
}

/// One child of a search node.
#[derive(Debug, Clone, Copy)]
struct Branch {
    /// Number of pictures on the path including this one.
    size: usize,
    /// Cumulative cover after adding `picture`.
    covered: u64,
    picture: usize,
    rank: f64,
}

/// Runs the exact search, seeded with the greedy answer.
///
/// Returns the best selection found; with a size limit this may be the seed
/// itself when no smaller selection exists within the limit.
pub(crate) fn solve<C: Coverage>(
    coverage: &C,
    limits: Limits,
    seed: Selection,
) -> Result<Selection> {
    let ranking = Ranking::new(coverage);
    let mut search = Search::new(coverage, limits, seed);

    explore(&mut search, &ranking, 0, coverage.root_need())?;

    info!(
        "exact: {} nodes, {} incumbent improvements in {:.2?}",
        search.nodes,
        search.incumbent.improvements(),
        search.started.elapsed()
    );
    search
        .into_selection()
        .ok_or_else(|| Error::Internal("exact search finished without an incumbent".into()))
}

fn explore<C: Coverage>(
    search: &mut Search<'_, C>,
    ranking: &Ranking,
    covered: u64,
    need: C::Need,
) -> Result<()> {
    search.nodes += 1;
    if search.should_stop(covered, &need) {
        return Ok(());
    }

    let coverage = search.coverage;
    let split = ranking.split_element(coverage, &need).ok_or_else(|| {
        Error::Internal("unsatisfied need without any still-needed element".into())
    })?;

    let depth = search.depth();
    let mut children: Vec<Branch> = ranking.covering[split]
        .iter()
        .filter(|&&picture| !search.is_used(picture))
        .map(|&picture| Branch {
            size: depth + 1,
            covered: covered + coverage.marginal_value(picture, &need),
            picture,
            rank: ranking.rank[picture],
        })
        .collect();

    if children.is_empty() {
        return Err(Error::Internal(format!(
            "element {split} still needs cover but every picture covering it is used"
        )));
    }

    // stable: equal ranks keep increasing picture order
    children.sort_by(|a, b| b.rank.total_cmp(&a.rank));

    for child in children {
        debug_assert_eq!(child.size, search.depth() + 1);
        let mut child_need = need.clone();
        coverage.subtract(child.picture, &mut child_need);

        search.push(child.picture);
        let result = explore(search, ranking, child.covered, child_need);
        search.pop();
        result?;

        if search.siblings_exhausted() {
            break;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::compact::{prepare_weighted, shrink};
    use crate::greedy;

    fn pictures(rows: &[&[u32]]) -> Vec<Vec<u32>> {
        rows.iter().map(|row| row.to_vec()).collect()
    }

    fn run<C: Coverage>(coverage: &C, limits: Limits) -> Selection {
        let seed = greedy::solve(coverage, &limits);
        solve(coverage, limits, seed).unwrap()
    }

    #[test]
    fn test_selection_rank_favours_unique_pictures() {
        // element 2 is only seen by picture 1
        let raw = pictures(&[&[1, 1, 0], &[1, 0, 1], &[0, 1, 0]]);
        let coverage = shrink(3, &raw, None);
        let ranking = Ranking::new(&coverage);

        assert_eq!(ranking.visibility(2), 1);
        assert!((ranking.rank[0] - 1.0).abs() < 1e-9);
        assert!((ranking.rank[1] - 1.5).abs() < 1e-9);
        assert!((ranking.rank[2] - 0.5).abs() < 1e-9);

        let split = ranking.split_element(&coverage, &coverage.root_need());
        assert_eq!(split, Some(2));
    }

    #[test]
    fn test_exact_beats_greedy() {
        // greedy takes the wide middle picture and then needs two more;
        // the two halves cover everything on their own
        let raw = pictures(&[
            &[1, 1, 1, 0, 0, 0],
            &[0, 0, 0, 1, 1, 1],
            &[0, 1, 1, 1, 1, 0],
        ]);
        let coverage = shrink(6, &raw, None);
        let seed = greedy::solve(&coverage, &Limits::default());
        assert_eq!(seed.pictures.len(), 3);

        let selection = solve(&coverage, Limits::default(), seed).unwrap();
        assert_eq!(selection.pictures.len(), 2);
        assert_eq!(selection.covered, 6);
        let mut chosen = selection.pictures.clone();
        chosen.sort();
        assert_eq!(chosen, vec![0, 1]);
    }

    #[test]
    fn test_exact_four_element_scenario() {
        let raw = pictures(&[&[1, 1, 0, 0], &[0, 0, 1, 1], &[1, 0, 0, 1]]);
        let coverage = shrink(4, &raw, None);
        let selection = run(&coverage, Limits::default());

        assert_eq!(selection.pictures.len(), 2);
        assert_eq!(selection.covered, 4);
        assert!(selection.goal);
    }

    #[test]
    fn test_exact_weighted_infeasible_reports_best_partial() {
        let raw = pictures(&[&[10, 0], &[0, 5]]);
        let required = [10, 10];
        let coverage = prepare_weighted(2, 255, &raw, Some(&required[..]));
        let selection = run(&coverage, Limits::default());

        assert_eq!(selection.covered, 15);
        assert_eq!(selection.pictures.len(), 2);
    }

    #[test]
    fn test_size_limit_keeps_greedy_safety_net() {
        let raw = pictures(&[&[1, 1, 0, 0], &[0, 0, 1, 1], &[1, 0, 0, 1]]);
        let coverage = shrink(4, &raw, None);
        let limits = Limits {
            size: Some(1),
            cover: None,
        };
        let selection = run(&coverage, limits);

        // nothing of size 1 covers everything, the greedy pair survives
        assert_eq!(selection.pictures.len(), 2);
        assert!(selection.goal);
    }

    #[test]
    fn test_incumbents_improve_monotonically() {
        let raw: Vec<Vec<u32>> = (0..12)
            .map(|p| (0..16).map(|e| u32::from((e * 7 + p * 5) % 12 < 4)).collect())
            .collect();
        let coverage = shrink(16, &raw, None);
        let seed = greedy::solve(&coverage, &Limits::default());
        let mut search = Search::new(&coverage, Limits::default(), seed);
        let ranking = Ranking::new(&coverage);
        explore(&mut search, &ranking, 0, coverage.root_need()).unwrap();

        let history = search.incumbent.history();
        assert!(!history.is_empty());
        for pair in history.windows(2) {
            let ((size_before, cover_before), (size_after, cover_after)) = (pair[0], pair[1]);
            assert!(cover_after >= cover_before);
            assert!(size_after <= size_before);
        }
    }
}
