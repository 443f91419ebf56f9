use ark_serialize::{
    CanonicalDeserialize, CanonicalSerialize, Compress, SerializationError, Valid, Validate,
};
use ark_std::io::{Read, Write};
use ark_std::vec::Vec;

/// A vector keyed by index, storing only the entries that are present.
///
/// Query vectors become sparse once the public-input slots are folded into
/// the input-consistency query, so absent keys are the common case;
/// [`get_by_index`](SparseVector::get_by_index) returns the neutral element
/// for them. Indices are kept strictly increasing and serialized as `u64`,
/// keeping the encoding independent of the platform word size.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SparseVector<T> {
    indices: Vec<u64>,
    values: Vec<T>,
}

impl<T> SparseVector<T> {
    /// An empty vector with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            indices: Vec::with_capacity(capacity),
            values: Vec::with_capacity(capacity),
        }
    }

    /// Appends an entry; `index` must exceed every index already present.
    pub fn push(&mut self, index: usize, value: T) {
        debug_assert!(self.indices.last().map_or(true, |&last| last < index as u64));
        self.indices.push(index as u64);
        self.values.push(value);
    }

    /// Number of entries present.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Whether no entry is present.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// The entry at `index`, or the neutral element if absent.
    pub fn get_by_index(&self, index: usize) -> T
    where
        T: Clone + Default,
    {
        match self.indices.binary_search(&(index as u64)) {
            Ok(pos) => self.values[pos].clone(),
            Err(_) => T::default(),
        }
    }

    /// Whether an entry is present at `index`.
    pub fn contains_index(&self, index: usize) -> bool {
        self.indices.binary_search(&(index as u64)).is_ok()
    }

    /// Iterates over `(index, value)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> {
        self.indices
            .iter()
            .map(|&i| i as usize)
            .zip(self.values.iter())
    }
}

impl<T> FromIterator<(usize, T)> for SparseVector<T> {
    fn from_iter<I: IntoIterator<Item = (usize, T)>>(iter: I) -> Self {
        let mut v = Self::with_capacity(0);
        for (index, value) in iter {
            v.push(index, value);
        }
        v
    }
}

impl<T: CanonicalSerialize> CanonicalSerialize for SparseVector<T> {
    fn serialize_with_mode<W: Write>(
        &self,
        mut writer: W,
        compress: Compress,
    ) -> Result<(), SerializationError> {
        self.indices.serialize_with_mode(&mut writer, compress)?;
        self.values.serialize_with_mode(&mut writer, compress)
    }

    fn serialized_size(&self, compress: Compress) -> usize {
        self.indices.serialized_size(compress) + self.values.serialized_size(compress)
    }
}

impl<T: Valid> Valid for SparseVector<T> {
    fn check(&self) -> Result<(), SerializationError> {
        self.values.check()
    }
}

impl<T: CanonicalDeserialize> CanonicalDeserialize for SparseVector<T> {
    fn deserialize_with_mode<R: Read>(
        mut reader: R,
        compress: Compress,
        validate: Validate,
    ) -> Result<Self, SerializationError> {
        let indices = Vec::<u64>::deserialize_with_mode(&mut reader, compress, validate)?;
        let values = Vec::<T>::deserialize_with_mode(&mut reader, compress, validate)?;
        if indices.len() != values.len() || indices.windows(2).any(|w| w[0] >= w[1]) {
            return Err(SerializationError::InvalidData);
        }
        Ok(Self { indices, values })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bls12_381::Fr;
    use ark_ff::{UniformRand, Zero};
    use ark_std::test_rng;

    #[test]
    fn absent_keys_yield_the_neutral_element() {
        let mut v = SparseVector::with_capacity(2);
        v.push(3, Fr::from(7u64));
        v.push(9, Fr::from(11u64));
        assert_eq!(v.get_by_index(3), Fr::from(7u64));
        assert_eq!(v.get_by_index(9), Fr::from(11u64));
        assert_eq!(v.get_by_index(0), Fr::zero());
        assert_eq!(v.get_by_index(4), Fr::zero());
        assert!(v.contains_index(3));
        assert!(!v.contains_index(4));
    }

    #[test]
    fn serialization_round_trips() {
        let rng = &mut test_rng();
        let v: SparseVector<Fr> = (0..20)
            .filter(|i| i % 3 != 0)
            .map(|i| (i, Fr::rand(rng)))
            .collect();

        let mut bytes = Vec::new();
        v.serialize_compressed(&mut bytes).unwrap();
        assert_eq!(bytes.len(), v.serialized_size(Compress::Yes));
        let back = SparseVector::<Fr>::deserialize_compressed(&mut bytes.as_slice()).unwrap();
        assert_eq!(v, back);
    }

    #[test]
    fn rejects_unsorted_indices() {
        let v = SparseVector {
            indices: ark_std::vec![4u64, 2],
            values: ark_std::vec![Fr::zero(), Fr::zero()],
        };
        let mut bytes = Vec::new();
        v.serialize_compressed(&mut bytes).unwrap();
        assert!(SparseVector::<Fr>::deserialize_compressed(&mut bytes.as_slice()).is_err());
    }
}
