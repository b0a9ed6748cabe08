//! Fixed-length bit set packed into machine words.
//!
//! Used for compactor signatures, packed pictures, the binary "still needs
//! cover" state and picture-usage flags. The word width follows the target
//! platform, so set operations run a whole `usize` at a time.

type Word = usize;

/// Number of bits per storage word.
const WORD_BITS: usize = Word::BITS as usize;

/// A bit set of fixed length backed by a vector of words.
///
/// Bits beyond `len` in the last word are always clear, so two sets of the
/// same length compare and hash by content.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BitSet {
    words: Vec<Word>,
    len: usize,
}

impl BitSet {
    /// Creates a bit set of `len` bits, all clear.
    pub fn new(len: usize) -> Self {
        Self {
            words: vec![0; len.div_ceil(WORD_BITS)],
            len,
        }
    }

    /// Creates a bit set of `len` bits, all set.
    pub fn full(len: usize) -> Self {
        let mut set = Self {
            words: vec![Word::MAX; len.div_ceil(WORD_BITS)],
            len,
        };
        let tail = len % WORD_BITS;
        if tail != 0 {
            if let Some(last) = set.words.last_mut() {
                *last = (1 << tail) - 1;
            }
        }
        set
    }

    /// Returns the number of bits (set or clear) in this set.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the set holds zero bits.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline(always)]
    fn word_and_mask(index: usize) -> (usize, Word) {
        (index / WORD_BITS, 1 << (index % WORD_BITS))
    }

    /// Returns true if the bit at `index` is set.
    #[inline]
    pub fn contains(&self, index: usize) -> bool {
        debug_assert!(index < self.len, "bit {index} out of range {}", self.len);
        let (word, mask) = Self::word_and_mask(index);
        self.words[word] & mask != 0
    }

    /// Sets the bit at `index`.
    #[inline]
    pub fn insert(&mut self, index: usize) {
        debug_assert!(index < self.len, "bit {index} out of range {}", self.len);
        let (word, mask) = Self::word_and_mask(index);
        self.words[word] |= mask;
    }

    /// Clears the bit at `index`.
    #[inline]
    pub fn remove(&mut self, index: usize) {
        debug_assert!(index < self.len, "bit {index} out of range {}", self.len);
        let (word, mask) = Self::word_and_mask(index);
        self.words[word] &= !mask;
    }

    /// Clears every bit that is set in `other` (`self &= !other`).
    #[inline]
    pub fn and_not(&mut self, other: &BitSet) {
        debug_assert_eq!(self.len, other.len);
        for (word, &other_word) in self.words.iter_mut().zip(&other.words) {
            *word &= !other_word;
        }
    }

    /// Returns the number of set bits.
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Returns true if no bit is set.
    #[inline]
    pub fn is_clear(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// Iterates over the indices of set bits in increasing order.
    pub fn ones(&self) -> impl Iterator<Item = usize> + '_ {
        Ones::new(self.words.iter().copied())
    }

    /// Iterates over the indices set in both `self` and `other`.
    pub fn ones_in_common<'a>(
        &'a self,
        other: &'a BitSet,
    ) -> impl Iterator<Item = usize> + 'a {
        debug_assert_eq!(self.len, other.len);
        Ones::new(self.words.iter().zip(&other.words).map(|(a, b)| a & b))
    }
}

/// Iterator over set bit indices, fed one word at a time.
struct Ones<I> {
    words: I,
    current: Word,
    base: usize,
}

impl<I: Iterator<Item = Word>> Ones<I> {
    fn new(mut words: I) -> Self {
        let current = words.next().unwrap_or(0);
        Self {
            words,
            current,
            base: 0,
        }
    }
}

impl<I: Iterator<Item = Word>> Iterator for Ones<I> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        while self.current == 0 {
            self.current = self.words.next()?;
            self.base += WORD_BITS;
        }
        let bit = self.current.trailing_zeros() as usize;
        // clear the lowest set bit
        self.current &= self.current - 1;
        Some(self.base + bit)
    }
}
