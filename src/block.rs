use ark_std::vec::Vec;
use core::ops::{AddAssign, Range};

/// A 1-D index space, either whole or split into contiguous blocks.
///
/// Partitioning chops `[0, len)` into `num_blocks` chunks of equal size (the
/// last chunk may be short). Every global index maps to exactly one
/// `(block, local)` pair, so work items over disjoint blocks can run
/// independently and their partial results add commutatively.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct IndexSpace {
    len: usize,
    num_blocks: usize,
}

impl IndexSpace {
    /// The whole (unpartitioned) space over `[0, len)`.
    pub fn new(len: usize) -> Self {
        Self { len, num_blocks: 1 }
    }

    /// Splits the space into `num_blocks` contiguous chunks.
    ///
    /// `num_blocks` is clamped to `[1, len]` so every block is non-empty.
    pub fn block_partition(mut self, num_blocks: usize) -> Self {
        self.num_blocks = num_blocks.clamp(1, self.len.max(1));
        self
    }

    /// Total number of indices.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the space is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of blocks; `1` for a whole space.
    pub fn num_blocks(&self) -> usize {
        self.num_blocks
    }

    /// Size of every block except possibly the last.
    pub fn chunk_size(&self) -> usize {
        if self.len == 0 {
            0
        } else {
            (self.len + self.num_blocks - 1) / self.num_blocks
        }
    }

    /// Global index range covered by `block`.
    pub fn block_range(&self, block: usize) -> Range<usize> {
        assert!(block < self.num_blocks, "block index out of range");
        let chunk = self.chunk_size();
        let start = (block * chunk).min(self.len);
        let end = ((block + 1) * chunk).min(self.len);
        start..end
    }

    /// Maps a global index to its `(block, local)` pair.
    pub fn locate(&self, global: usize) -> (usize, usize) {
        assert!(global < self.len, "global index out of range");
        let chunk = self.chunk_size();
        (global / chunk, global % chunk)
    }
}

/// One block's slice of a global vector.
///
/// A `BlockVector` remembers which block of which space it covers, so partial
/// results computed per block can be accumulated and written back
/// ([`emplace`](BlockVector::emplace)) into the full vector.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BlockVector<T> {
    space: IndexSpace,
    block: usize,
    data: Vec<T>,
}

impl<T> BlockVector<T> {
    /// The block's slice copied out of the full vector `full`.
    pub fn from_slice(space: IndexSpace, block: usize, full: &[T]) -> Self
    where
        T: Clone,
    {
        assert_eq!(full.len(), space.len(), "full vector does not fit the space");
        let data = full[space.block_range(block)].to_vec();
        Self { space, block, data }
    }

    /// A zero-initialised block, for accumulating partial results.
    pub fn zeroed(space: IndexSpace, block: usize) -> Self
    where
        T: Default + Clone,
    {
        let data = ark_std::vec![T::default(); space.block_range(block).len()];
        Self { space, block, data }
    }

    /// Wraps data already laid out for `block`.
    pub fn from_data(space: IndexSpace, block: usize, data: Vec<T>) -> Self {
        assert_eq!(data.len(), space.block_range(block).len());
        Self { space, block, data }
    }

    /// Global index range this block covers.
    pub fn range(&self) -> Range<usize> {
        self.space.block_range(self.block)
    }

    /// The space this block belongs to.
    pub fn space(&self) -> IndexSpace {
        self.space
    }

    /// Which block of the space this is.
    pub fn block(&self) -> usize {
        self.block
    }

    /// The block's local entries.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Writes the block back into the full vector.
    pub fn emplace(&self, full: &mut [T])
    where
        T: Clone,
    {
        assert_eq!(full.len(), self.space.len());
        full[self.range()].clone_from_slice(&self.data);
    }
}

impl<'a, T: AddAssign<&'a T>> AddAssign<&'a BlockVector<T>> for BlockVector<T> {
    fn add_assign(&mut self, other: &'a BlockVector<T>) {
        assert_eq!(self.space, other.space);
        assert_eq!(self.block, other.block);
        for (a, b) in self.data.iter_mut().zip(&other.data) {
            *a += b;
        }
    }
}
