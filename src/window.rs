use crate::block::{BlockVector, IndexSpace};
use ark_ec::{CurveGroup, Group};
use ark_ff::{BigInteger, PrimeField, Zero};
use ark_std::vec::Vec;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Window widths by expected exponentiation count.
///
/// Each row is the smallest count at which the width applies; widths never
/// decrease. Any component that reconstructs tables for the same keys must
/// use this same schedule.
const WINDOW_SCHEDULE: &[(usize, usize)] = &[
    (1, 1),
    (5, 2),
    (18, 3),
    (35, 4),
    (104, 7),
    (1_046, 10),
    (24_479, 14),
    (1_034_770, 24),
];

/// The window width used for `exp_count` expected exponentiations.
pub fn window_bits(exp_count: usize) -> usize {
    let mut bits = 1;
    for &(count, width) in WINDOW_SCHEDULE {
        if exp_count >= count {
            bits = width;
        } else {
            break;
        }
    }
    bits
}

/// The window axis of a table: a width together with an [`IndexSpace`] over
/// the windows covering the scalar bit length.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct WindowSpace {
    bits: usize,
    index: IndexSpace,
}

impl WindowSpace {
    /// Splits the window axis into `num_blocks` contiguous blocks.
    pub fn block_partition(mut self, num_blocks: usize) -> Self {
        self.index = self.index.block_partition(num_blocks);
        self
    }

    /// The window width.
    pub fn window_bits(&self) -> usize {
        self.bits
    }

    /// Total number of windows.
    pub fn num_windows(&self) -> usize {
        self.index.len()
    }

    /// Number of blocks the window axis is split into.
    pub fn num_blocks(&self) -> usize {
        self.index.num_blocks()
    }
}

/// Precomputed fixed-base exponentiation table for the group generator.
///
/// `rows[w][d]` holds `d·2^{bits·w}·G`, so an exponentiation is one table
/// lookup and one addition per window. A table built from a partitioned
/// [`WindowSpace`] covers only that block's windows; summing the partial
/// results over all blocks of any partitioning reproduces the monolithic
/// result. Partial tables are expensive to build, so when combined with a
/// partitioned scalar vector the window axis must be the outer loop.
pub struct WindowTable<G: CurveGroup> {
    bits: usize,
    first_window: usize,
    rows: Vec<Vec<G::Affine>>,
}

impl<G: CurveGroup> WindowTable<G> {
    fn num_windows(bits: usize) -> usize {
        let scalar_bits = <G::ScalarField as PrimeField>::MODULUS_BIT_SIZE as usize;
        (scalar_bits + bits - 1) / bits
    }

    /// The window axis for a table sized for `exp_count` exponentiations.
    pub fn space(exp_count: usize) -> WindowSpace {
        let bits = window_bits(exp_count);
        WindowSpace {
            bits,
            index: IndexSpace::new(Self::num_windows(bits)),
        }
    }

    /// Builds the full table sized for `exp_count` exponentiations.
    pub fn new(exp_count: usize) -> Self {
        Self::new_partial(&Self::space(exp_count), 0)
    }

    /// Builds only the rows for `block` of the (possibly partitioned) space.
    pub fn new_partial(space: &WindowSpace, block: usize) -> Self {
        let bits = space.bits;
        let windows = space.index.block_range(block);
        let first_window = windows.start;
        let row_len = 1usize << bits;

        let mut base = G::generator();
        for _ in 0..bits * first_window {
            base.double_in_place();
        }

        let mut flat = Vec::with_capacity(windows.len() * row_len);
        for _ in windows {
            let mut entry = G::zero();
            for _ in 0..row_len {
                flat.push(entry);
                entry += &base;
            }
            // After `row_len` additions `entry` is `2^bits` times `base`.
            base = entry;
        }

        let flat = G::normalize_batch(&flat);
        let rows = flat.chunks(row_len).map(|row| row.to_vec()).collect();
        Self {
            bits,
            first_window,
            rows,
        }
    }

    /// This table's (partial) contribution to `scalar·G`.
    pub fn exp(&self, scalar: &G::ScalarField) -> G {
        let bits_le = scalar.into_bigint().to_bits_le();
        let mut acc = G::zero();
        for (w, row) in self.rows.iter().enumerate() {
            let lo = (self.first_window + w) * self.bits;
            let mut digit = 0usize;
            for b in (lo..lo + self.bits).rev() {
                digit <<= 1;
                digit |= bits_le.get(b).copied().unwrap_or(false) as usize;
            }
            if digit != 0 {
                acc += row[digit];
            }
        }
        acc
    }

    /// [`exp`](Self::exp) applied to every scalar.
    pub fn batch_exp(&self, scalars: &[G::ScalarField]) -> Vec<G> {
        cfg_iter!(scalars).map(|s| self.exp(s)).collect()
    }

    /// [`batch_exp`](Self::batch_exp) over one block of a partitioned scalar
    /// vector, keeping the block's position for later write-back.
    pub fn batch_exp_block(&self, scalars: &BlockVector<G::ScalarField>) -> BlockVector<G> {
        BlockVector::from_data(
            scalars.space(),
            scalars.block(),
            self.batch_exp(scalars.as_slice()),
        )
    }
}
