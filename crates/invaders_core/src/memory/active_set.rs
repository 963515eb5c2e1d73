//! # Active Set
//!
//! Fixed-length bitset of active flags.

/// Fixed-length set of active flags, one bit per slot.
///
/// The length is fixed at construction. Slots are never removed; they only
/// flip between active and inactive, so indices stay valid forever.
///
/// # Example
///
/// ```rust,ignore
/// let mut set = ActiveSet::all_active(5);
/// set.set(4, false);
/// assert_eq!(set.last(), Some(3));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActiveSet {
    /// Packed flags, bit `i % 64` of word `i / 64`.
    words: Box<[u64]>,
    /// Number of slots.
    len: usize,
}

impl ActiveSet {
    /// Creates a set of `len` slots, all active.
    #[must_use]
    pub fn all_active(len: usize) -> Self {
        let mut set = Self::all_inactive(len);
        set.fill(true);
        set
    }

    /// Creates a set of `len` slots, all inactive.
    #[must_use]
    pub fn all_inactive(len: usize) -> Self {
        Self {
            words: vec![0u64; len.div_ceil(64)].into_boxed_slice(),
            len,
        }
    }

    /// Number of slots (active or not).
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the set has no slots at all.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns whether slot `index` is active.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[inline]
    #[must_use]
    pub fn is_active(&self, index: usize) -> bool {
        assert!(index < self.len, "slot {index} out of bounds ({})", self.len);
        self.words[index / 64] & (1u64 << (index % 64)) != 0
    }

    /// Sets slot `index` and returns its previous value.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn set(&mut self, index: usize, active: bool) -> bool {
        let was = self.is_active(index);
        let mask = 1u64 << (index % 64);
        if active {
            self.words[index / 64] |= mask;
        } else {
            self.words[index / 64] &= !mask;
        }
        was
    }

    /// Sets every slot to `active`.
    pub fn fill(&mut self, active: bool) {
        let fill = if active { u64::MAX } else { 0 };
        self.words.iter_mut().for_each(|w| *w = fill);
        // Keep bits past `len` clear so counts stay exact
        let tail = self.len % 64;
        if active && tail != 0 {
            if let Some(last) = self.words.last_mut() {
                *last &= (1u64 << tail) - 1;
            }
        }
    }

    /// Number of active slots.
    #[must_use]
    pub fn count(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Returns true if any slot is active.
    #[must_use]
    pub fn any(&self) -> bool {
        self.words.iter().any(|&w| w != 0)
    }

    /// Lowest active index.
    #[must_use]
    pub fn first(&self) -> Option<usize> {
        self.words
            .iter()
            .enumerate()
            .find(|(_, &w)| w != 0)
            .map(|(i, w)| i * 64 + w.trailing_zeros() as usize)
    }

    /// Highest active index.
    #[must_use]
    pub fn last(&self) -> Option<usize> {
        self.words
            .iter()
            .enumerate()
            .rev()
            .find(|(_, &w)| w != 0)
            .map(|(i, w)| i * 64 + 63 - w.leading_zeros() as usize)
    }

    /// Iterates over active indices in ascending order.
    pub fn iter_active(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len).filter(move |&i| self.is_active(i))
    }
}
