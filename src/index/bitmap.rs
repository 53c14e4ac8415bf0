//! Bitmap secondary index for a single column.

use crate::index::bit_vector::BitVector;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Maps each distinct value of a column to the set of global positions holding
/// that value.
///
/// `size` is the logical record count the index covers. Individual vectors may
/// be shorter than `size` when the index was grown through [`update_size`]
/// without touching them; the missing tail reads as zero.
///
/// [`update_size`]: BitmapIndex::update_size
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BitmapIndex {
    entries: BTreeMap<String, BitVector>,
    size: usize,
}

impl BitmapIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `value` as present at `position`. Only the vector for `value` is
    /// touched; `size` grows to cover `position`.
    pub fn insert(&mut self, value: &str, position: usize) {
        let size = self.size;
        let bits = self
            .entries
            .entry(value.to_string())
            .or_insert_with(|| BitVector::zeros(size));
        bits.set(position);
        if position >= self.size {
            self.size = position + 1;
        }
    }

    /// Grows `size` to `new_size`; never shrinks.
    pub fn update_size(&mut self, new_size: usize) {
        if new_size > self.size {
            self.size = new_size;
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// `size` characters of `'1'`/`'0'` for `value`. Unknown values give an
    /// all-zero string.
    pub fn get_bit_string(&self, value: &str) -> String {
        match self.entries.get(value) {
            Some(bits) => bits.to_bit_string(self.size),
            None => "0".repeat(self.size),
        }
    }

    /// The vector for `value`, exactly `size` bits long.
    pub fn bits(&self, value: &str) -> BitVector {
        match self.entries.get(value) {
            Some(bits) => {
                let mut bits = bits.clone();
                bits.resize(self.size);
                bits
            }
            None => BitVector::zeros(self.size),
        }
    }

    /// Distinct values in sorted order.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn distinct_count(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_bit_string() {
        let mut index = BitmapIndex::new();
        index.insert("CS", 0);
        index.insert("BI", 1);
        index.insert("CS", 2);

        assert_eq!(index.size(), 3);
        assert_eq!(index.get_bit_string("CS"), "101");
        assert_eq!(index.get_bit_string("BI"), "010");
    }

    #[test]
    fn test_unknown_value_is_all_zero() {
        let mut index = BitmapIndex::new();
        index.insert("CS", 0);
        index.insert("CS", 1);

        assert_eq!(index.get_bit_string("MATH"), "00");
        assert_eq!(index.bits("MATH").count_ones(), 0);
        assert_eq!(index.bits("MATH").len(), 2);
    }

    #[test]
    fn test_empty_index() {
        let index = BitmapIndex::new();
        assert_eq!(index.size(), 0);
        assert_eq!(index.get_bit_string("anything"), "");
    }

    #[test]
    fn test_update_size_is_monotonic() {
        let mut index = BitmapIndex::new();
        index.update_size(5);
        index.update_size(3);
        assert_eq!(index.size(), 5);
    }

    #[test]
    fn test_update_size_pads_short_vectors() {
        let mut index = BitmapIndex::new();
        index.insert("a", 0);
        index.update_size(4);
        index.insert("b", 3);

        // "a" was never grown, its tail reads as zero
        assert_eq!(index.get_bit_string("a"), "1000");
        assert_eq!(index.get_bit_string("b"), "0001");
        assert_eq!(index.bits("a").len(), 4);
    }

    #[test]
    fn test_insert_beyond_size_grows_size() {
        let mut index = BitmapIndex::new();
        index.insert("x", 6);
        assert_eq!(index.size(), 7);
        assert_eq!(index.get_bit_string("x"), "0000001");
    }

    #[test]
    fn test_values_are_sorted() {
        let mut index = BitmapIndex::new();
        index.insert("b", 0);
        index.insert("a", 1);
        index.insert("b", 2);

        assert_eq!(index.values().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(index.distinct_count(), 2);
        assert_eq!(index.get_bit_string("c"), "0".repeat(index.size()));
    }
}
