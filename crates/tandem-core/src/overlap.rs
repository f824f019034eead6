//! The [`OverlapMask`] bitset marking entities that participate in coupling.

/// Per-entity flag array defining the overlap region.
///
/// Owned by the server-side partition logic and shared read-only by
/// every field whose data lives on the same entity set. An entity
/// outside the mask is never transmitted and never overwritten by a
/// receive. Immutable after construction.
///
/// Implemented as a dense bitset, one `u64` word per 64 entities.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OverlapMask {
    entity_count: usize,
    bits: Vec<u64>,
}

impl OverlapMask {
    const BITS_PER_WORD: usize = 64;

    /// Mark entities for which `pred(index)` returns true.
    pub fn from_predicate(entity_count: usize, pred: impl Fn(usize) -> bool) -> Self {
        let words = entity_count.div_ceil(Self::BITS_PER_WORD);
        let mut bits = vec![0u64; words];
        for entity in 0..entity_count {
            if pred(entity) {
                bits[entity / Self::BITS_PER_WORD] |= 1u64 << (entity % Self::BITS_PER_WORD);
            }
        }
        Self { entity_count, bits }
    }

    /// Build a mask from a per-entity flag slice.
    pub fn from_flags(flags: &[bool]) -> Self {
        Self::from_predicate(flags.len(), |i| flags[i])
    }

    /// Mask with every entity in overlap.
    pub fn all(entity_count: usize) -> Self {
        Self::from_predicate(entity_count, |_| true)
    }

    /// Mask with no entity in overlap. Legal: such a field exchanges nothing.
    pub fn none(entity_count: usize) -> Self {
        Self::from_predicate(entity_count, |_| false)
    }

    /// Total number of entities the mask covers, marked or not.
    pub fn entity_count(&self) -> usize {
        self.entity_count
    }

    /// Number of entities in overlap. This is the transfer buffer length
    /// for every field sharing this mask.
    pub fn marked_count(&self) -> usize {
        self.bits.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Whether `entity` is in overlap. Out-of-range indices are never marked.
    pub fn contains(&self, entity: usize) -> bool {
        if entity >= self.entity_count {
            return false;
        }
        let word = entity / Self::BITS_PER_WORD;
        let bit = entity % Self::BITS_PER_WORD;
        (self.bits[word] & (1u64 << bit)) != 0
    }

    /// Iterate marked entity indices in ascending order.
    ///
    /// This order defines the layout of every transfer buffer built
    /// against the mask; it is stable for the lifetime of the mask.
    pub fn iter_marked(&self) -> MarkedIter<'_> {
        MarkedIter {
            bits: &self.bits,
            word_idx: 0,
            bit_idx: 0,
        }
    }
}

/// Iterator over marked entities of an [`OverlapMask`], ascending.
pub struct MarkedIter<'a> {
    bits: &'a [u64],
    word_idx: usize,
    bit_idx: usize,
}

impl Iterator for MarkedIter<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        while self.word_idx < self.bits.len() {
            let word = self.bits[self.word_idx];
            while self.bit_idx < 64 {
                let bit = self.bit_idx;
                self.bit_idx += 1;
                if word & (1u64 << bit) != 0 {
                    return Some(self.word_idx * 64 + bit);
                }
            }
            self.word_idx += 1;
            self.bit_idx = 0;
        }
        None
    }
}
