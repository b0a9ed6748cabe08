//! Calculator lifecycle: configuration, processing and solving.
//!
//! A [`Calculator`] starts in the configuring phase, where pictures and the
//! required cover are copied in. The first solve call freezes it: the raw
//! pictures are processed once (shrunk and packed in binary mode) and every
//! later solve reuses that state. A failure inside a computation releases
//! everything the calculator owns and leaves it usable only for dropping.

use std::fmt;

use log::{debug, error, info};

use crate::compact::{prepare_weighted, shrink};
use crate::coverage::{BinaryCoverage, Coverage, WeightedCoverage};
use crate::error::{Error, Result};
use crate::search::Limits;
use crate::solution::Cover;
use crate::{exact, exhaustive, greedy};

/// Coverage semantics of a calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    /// Elements are either covered or not; values are 0 or 1.
    Binary,
    /// Elements need an accumulated amount in `0..=max_value`.
    Weighted { max_value: u32 },
}

impl ColorMode {
    /// Maximum gray value used when none is configured.
    pub const DEFAULT_MAX_VALUE: u32 = 255;

    /// Weighted mode with the default maximum gray value.
    pub fn weighted() -> Self {
        ColorMode::Weighted {
            max_value: Self::DEFAULT_MAX_VALUE,
        }
    }
}

/// Lifecycle phase of a calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Pictures and the required cover may still be added.
    Configuring,
    /// Configuration is frozen; solves run against processed pictures.
    Computing,
    /// A computation failed and all owned state was released.
    Aborted,
}

/// Processed pictures, one variant per color mode.
#[derive(Debug)]
enum Processed {
    Binary(BinaryCoverage),
    Weighted(WeightedCoverage),
}

/// Everything a calculator owns; dropped as a whole on abort.
#[derive(Debug, Default)]
struct Store {
    pictures: Vec<Vec<u32>>,
    required: Option<Vec<u32>>,
    processed: Option<Processed>,
}

#[derive(Debug, Clone, Copy)]
enum Strategy {
    Greedy,
    Exact { size_limit: Option<usize> },
    Exhaustive {
        cover_limit: Option<f64>,
        size_limit: Option<usize>,
    },
}

impl Strategy {
    fn limits(&self) -> Limits {
        match *self {
            Strategy::Greedy => Limits::default(),
            Strategy::Exact { size_limit } => Limits {
                size: size_limit,
                cover: None,
            },
            Strategy::Exhaustive {
                cover_limit,
                size_limit,
            } => Limits {
                size: size_limit,
                cover: cover_limit,
            },
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Greedy => write!(f, "greedy"),
            Strategy::Exact { .. } => write!(f, "exact"),
            Strategy::Exhaustive { .. } => write!(f, "exhaustive"),
        }
    }
}

/// Set-cover calculator for one image and its candidate pictures.
#[derive(Debug)]
pub struct Calculator {
    max_pictures: usize,
    image_size: usize,
    mode: ColorMode,
    phase: Phase,
    store: Store,
}

impl Calculator {
    /// Creates a calculator accepting up to `max_pictures` pictures of
    /// `image_size` elements each.
    pub fn new(max_pictures: usize, image_size: usize, mode: ColorMode) -> Self {
        debug!(
            "new calculator: {} pictures max, {} elements, {:?}",
            max_pictures, image_size, mode
        );
        Self {
            max_pictures,
            image_size,
            mode,
            phase: Phase::Configuring,
            store: Store::default(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn mode(&self) -> ColorMode {
        self.mode
    }

    pub fn image_size(&self) -> usize {
        self.image_size
    }

    pub fn max_pictures(&self) -> usize {
        self.max_pictures
    }

    pub fn picture_count(&self) -> usize {
        self.store.pictures.len()
    }

    /// Number of processed elements, once the calculator is computing.
    ///
    /// Binary problems usually shrink below the image size; weighted problems
    /// keep every element.
    pub fn processed_size(&self) -> Option<usize> {
        match self.store.processed.as_ref()? {
            Processed::Binary(coverage) => Some(coverage.element_count()),
            Processed::Weighted(coverage) => Some(coverage.element_count()),
        }
    }

    /// Sets the required cover: a 0/1 mask in binary mode, per-element
    /// amounts in weighted mode. May be called at most once.
    pub fn set_required_cover(&mut self, values: &[u32]) -> Result<()> {
        self.ensure_configuring()?;
        if self.store.required.is_some() {
            return Err(Error::RequiredCoverAlreadySet);
        }
        self.validate_values(values)?;
        self.store.required = Some(values.to_vec());
        Ok(())
    }

    /// Adds a copy of one picture.
    pub fn add_picture(&mut self, values: &[u32]) -> Result<()> {
        self.ensure_configuring()?;
        if self.store.pictures.len() >= self.max_pictures {
            return Err(Error::PictureLimit {
                max: self.max_pictures,
            });
        }
        self.validate_values(values)?;
        self.store.pictures.push(values.to_vec());
        Ok(())
    }

    /// Picks pictures greedily by largest marginal cover.
    pub fn greedy(&mut self) -> Result<Cover> {
        self.solve(Strategy::Greedy)
    }

    /// Finds a smallest full cover by branch-and-bound, or the best cover
    /// within `size_limit` pictures.
    pub fn exact(&mut self, size_limit: Option<usize>) -> Result<Cover> {
        self.solve(Strategy::Exact { size_limit })
    }

    /// Enumerates picture combinations in index order.
    ///
    /// With `cover_limit` in (0, 1), the smallest combination reaching that
    /// fraction of the required cover is accepted.
    pub fn exhaustive(
        &mut self,
        cover_limit: Option<f64>,
        size_limit: Option<usize>,
    ) -> Result<Cover> {
        self.solve(Strategy::Exhaustive {
            cover_limit,
            size_limit,
        })
    }

    /// Scores a selection directly against the raw pictures, bypassing the
    /// processed representation.
    pub fn evaluate(&self, pictures: &[usize]) -> Result<Cover> {
        if self.phase == Phase::Aborted {
            return Err(Error::Unusable);
        }
        let count = self.store.pictures.len();
        if let Some(&index) = pictures.iter().find(|&&index| index >= count) {
            return Err(Error::UnknownPicture { index, count });
        }

        let selected: Vec<&[u32]> = pictures
            .iter()
            .map(|&index| self.store.pictures[index].as_slice())
            .collect();
        let required_at = |element: usize| -> u32 {
            match (&self.store.required, self.mode) {
                (Some(required), _) => required[element],
                (None, ColorMode::Binary) => 1,
                (None, ColorMode::Weighted { max_value }) => max_value,
            }
        };

        let mut covered = 0u64;
        let mut required = 0u64;
        for element in 0..self.image_size {
            let needed = u64::from(required_at(element));
            let supplied: u64 = selected
                .iter()
                .map(|picture| u64::from(picture[element]))
                .sum();
            required += needed;
            covered += supplied.min(needed);
        }

        Ok(Cover {
            pictures: pictures.to_vec(),
            covered,
            required,
        })
    }

    /// Releases the calculator and everything it owns.
    pub fn free(self) {}

    fn ensure_configuring(&self) -> Result<()> {
        match self.phase {
            Phase::Configuring => Ok(()),
            Phase::Computing => Err(Error::ComputePhase),
            Phase::Aborted => Err(Error::Unusable),
        }
    }

    fn validate_values(&self, values: &[u32]) -> Result<()> {
        if values.len() != self.image_size {
            return Err(Error::LengthMismatch {
                expected: self.image_size,
                actual: values.len(),
            });
        }
        let max = match self.mode {
            ColorMode::Binary => 1,
            ColorMode::Weighted { max_value } => max_value,
        };
        match values.iter().position(|&value| value > max) {
            None => Ok(()),
            Some(element) if self.mode == ColorMode::Binary => Err(Error::NonBinaryValue {
                element,
                value: values[element],
            }),
            Some(element) => Err(Error::ValueOutOfRange {
                element,
                value: values[element],
                max,
            }),
        }
    }

    /// Checks solve arguments before anything is frozen.
    fn validate_strategy(&self, strategy: Strategy) -> Result<()> {
        if self.store.pictures.is_empty() {
            return Err(Error::NoPictures);
        }
        let limits = strategy.limits();
        if let Some(fraction) = limits.cover {
            if !(fraction > 0.0 && fraction < 1.0) {
                return Err(Error::InvalidCoverLimit(fraction));
            }
        }
        if limits.size == Some(0) {
            return Err(Error::InvalidSizeLimit);
        }
        Ok(())
    }

    fn solve(&mut self, strategy: Strategy) -> Result<Cover> {
        if self.phase == Phase::Aborted {
            return Err(Error::Unusable);
        }
        self.validate_strategy(strategy).inspect_err(|err| {
            error!("{} rejected: {}", strategy, err);
        })?;

        if self.phase == Phase::Configuring {
            self.phase = Phase::Computing;
            self.store.processed = Some(self.process());
        }

        match self.compute(strategy) {
            Ok(cover) => {
                info!(
                    "{}: {} pictures, cover {}/{} ({:.3})",
                    strategy,
                    cover.size(),
                    cover.covered,
                    cover.required,
                    cover.fraction()
                );
                Ok(cover)
            }
            Err(err) => {
                error!("{} aborted: {}", strategy, err);
                self.abort();
                Err(err)
            }
        }
    }

    fn process(&self) -> Processed {
        let required = self.store.required.as_deref();
        match self.mode {
            ColorMode::Binary => Processed::Binary(shrink(
                self.image_size,
                &self.store.pictures,
                required,
            )),
            ColorMode::Weighted { max_value } => Processed::Weighted(prepare_weighted(
                self.image_size,
                max_value,
                &self.store.pictures,
                required,
            )),
        }
    }

    fn compute(&self, strategy: Strategy) -> Result<Cover> {
        let processed = self
            .store
            .processed
            .as_ref()
            .ok_or_else(|| Error::Internal("solve called without processed pictures".into()))?;
        match processed {
            Processed::Binary(coverage) => run(coverage, strategy),
            Processed::Weighted(coverage) => run(coverage, strategy),
        }
    }

    /// Drops all owned state in one step.
    fn abort(&mut self) {
        self.store = Store::default();
        self.phase = Phase::Aborted;
    }
}

/// Runs one strategy against processed pictures; greedy always goes first.
fn run<C: Coverage>(coverage: &C, strategy: Strategy) -> Result<Cover> {
    let limits = strategy.limits();
    let seed = greedy::solve(coverage, &limits);
    let selection = match strategy {
        Strategy::Greedy => seed,
        Strategy::Exact { .. } => exact::solve(coverage, limits, seed)?,
        Strategy::Exhaustive { .. } => exhaustive::solve(coverage, limits, seed),
    };
    Ok(Cover {
        pictures: selection.pictures,
        covered: selection.covered,
        required: coverage.required_total(),
    })
}
