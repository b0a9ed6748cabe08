//! Result of a solve call.

use std::fmt;

/// A selection of pictures and how much of the required cover it achieves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cover {
    /// Picture indices in the order they were selected.
    pub pictures: Vec<usize>,
    /// Achieved cover in original-image units.
    pub covered: u64,
    /// Required cover in original-image units.
    pub required: u64,
}

impl Cover {
    /// Number of selected pictures.
    pub fn size(&self) -> usize {
        self.pictures.len()
    }

    /// Fraction of the required cover achieved.
    ///
    /// An empty requirement counts as fully covered.
    pub fn fraction(&self) -> f64 {
        if self.required == 0 {
            1.0
        } else {
            self.covered as f64 / self.required as f64
        }
    }

    pub fn is_complete(&self) -> bool {
        self.covered >= self.required
    }
}

impl fmt::Display for Cover {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} pictures cover {}/{} ({:.1}%)",
            self.size(),
            self.covered,
            self.required,
            self.fraction() * 100.0
        )?;
        let indices: Vec<String> = self.pictures.iter().map(ToString::to_string).collect();
        write!(f, "pictures: {}", indices.join(" "))
    }
}
