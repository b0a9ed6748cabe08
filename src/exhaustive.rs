//! Bounded exhaustive enumeration in increasing picture order.
//!
//! Each combination is visited once: a child only adds pictures with a higher
//! index than its parent's last one. Pruning uses the same incumbent rules as
//! the exact search, and a cover limit below one makes any combination that
//! reaches it an acceptable answer.

use std::time::Instant;

use log::info;

use crate::coverage::Coverage;
use crate::search::{Limits, Search, Selection};

/// Number of visited combinations between two progress reports.
const PROGRESS_INTERVAL: u64 = 1 << 20;

/// Runs the exhaustive search, seeded with the greedy answer.
pub(crate) fn solve<C: Coverage>(coverage: &C, limits: Limits, seed: Selection) -> Selection {
    let mut search = Search::new(coverage, limits, seed.clone());
    let mut progress = Progress::default();

    explore(&mut search, &mut progress, 0, 0, coverage.root_need());

    info!(
        "exhaustive: {} combinations, {} incumbent improvements in {:.2?}",
        search.nodes,
        search.incumbent.improvements(),
        search.started.elapsed()
    );
    // the seed was installed as first incumbent, so one always exists
    search.into_selection().unwrap_or(seed)
}

/// Periodic progress reporting.
#[derive(Default)]
struct Progress {
    last_report: Option<Instant>,
}

impl Progress {
    fn tick<C: Coverage>(&mut self, search: &Search<'_, C>) {
        if search.nodes % PROGRESS_INTERVAL != 0 {
            return;
        }
        let since_last = self.last_report.map(|last| last.elapsed());
        info!(
            "exhaustive: {} combinations examined, {:.1?} elapsed (last interval {:.1?}), best size {}",
            search.nodes,
            search.started.elapsed(),
            since_last.unwrap_or_default(),
            search
                .incumbent
                .best()
                .map_or(0, |best| best.pictures.len())
        );
        self.last_report = Some(Instant::now());
    }
}

fn explore<C: Coverage>(
    search: &mut Search<'_, C>,
    progress: &mut Progress,
    first: usize,
    covered: u64,
    need: C::Need,
) {
    search.nodes += 1;
    progress.tick(search);
    if search.should_stop(covered, &need) {
        return;
    }

    let coverage = search.coverage;
    let mut expanded = false;
    for picture in first..coverage.picture_count() {
        let value = coverage.marginal_value(picture, &need);
        if value == 0 {
            continue;
        }
        expanded = true;

        let mut child_need = need.clone();
        coverage.subtract(picture, &mut child_need);

        search.push(picture);
        explore(search, progress, picture + 1, covered + value, child_need);
        search.pop();

        if search.siblings_exhausted() {
            break;
        }
    }

    if !expanded {
        // nothing left to add along this branch
        search.consider(covered, false);
    }
}
