//! Set-Cover Calculator Library
//!
//! Given an image (elements that need coverage) and a catalog of pictures
//! (candidate covering sets), finds a small selection of pictures whose union
//! covers the image. Elements are either binary (covered or not) or weighted
//! (each picture contributes a partial amount).
//!
//! Three strategies share one coverage algebra: a greedy heuristic, an exact
//! branch-and-bound search and a bounded exhaustive enumeration.
//!
//! ```
//! use setcover::{Calculator, ColorMode};
//!
//! let mut calculator = Calculator::new(3, 4, ColorMode::Binary);
//! calculator.add_picture(&[1, 1, 0, 0]).unwrap();
//! calculator.add_picture(&[0, 0, 1, 1]).unwrap();
//! calculator.add_picture(&[1, 0, 0, 1]).unwrap();
//!
//! let cover = calculator.exact(None).unwrap();
//! assert_eq!(cover.size(), 2);
//! assert_eq!(cover.fraction(), 1.0);
//! ```

pub mod bitset;
pub mod calculator;
pub mod compact;
pub mod coverage;
pub mod error;
pub mod persistence;
pub mod solution;

mod exact;
mod exhaustive;
mod greedy;
mod search;

pub use calculator::{Calculator, ColorMode, Phase};
pub use error::{Error, Result};
pub use solution::Cover;
