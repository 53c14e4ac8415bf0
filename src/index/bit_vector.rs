//! Growable bit vector backed by 64-bit words.

use serde::{Deserialize, Serialize};

const WORD_BITS: usize = 64;

/// A bit vector with a logical length. Bits at or beyond `len` are always zero,
/// and reading past `len` yields `false`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BitVector {
    words: Vec<u64>,
    len: usize,
}

impl BitVector {
    pub fn new() -> Self {
        Self::default()
    }

    /// `len` cleared bits.
    pub fn zeros(len: usize) -> Self {
        Self {
            words: vec![0; words_for(len)],
            len,
        }
    }

    /// `len` set bits.
    pub fn ones(len: usize) -> Self {
        let mut bits = Self {
            words: vec![u64::MAX; words_for(len)],
            len,
        };
        bits.clear_tail();
        bits
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn get(&self, position: usize) -> bool {
        if position >= self.len {
            return false;
        }
        self.words[position / WORD_BITS] & (1 << (position % WORD_BITS)) != 0
    }

    /// Sets the bit at `position`, growing the vector if needed.
    pub fn set(&mut self, position: usize) {
        if position >= self.len {
            self.resize(position + 1);
        }
        self.words[position / WORD_BITS] |= 1 << (position % WORD_BITS);
    }

    /// Grows or shrinks to `len` bits. New bits are zero.
    pub fn resize(&mut self, len: usize) {
        self.words.resize(words_for(len), 0);
        self.len = len;
        self.clear_tail();
    }

    /// In-place AND. Bits of `self` beyond `other.len()` are cleared.
    pub fn and_assign(&mut self, other: &BitVector) {
        for (i, word) in self.words.iter_mut().enumerate() {
            *word &= other.words.get(i).copied().unwrap_or(0);
        }
    }

    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Positions of all set bits in ascending order.
    pub fn iter_ones(&self) -> impl Iterator<Item = usize> + '_ {
        self.words.iter().enumerate().flat_map(|(i, &word)| {
            let mut remaining = word;
            std::iter::from_fn(move || {
                if remaining == 0 {
                    return None;
                }
                let bit = remaining.trailing_zeros() as usize;
                remaining &= remaining - 1;
                Some(i * WORD_BITS + bit)
            })
        })
    }

    /// `'1'`/`'0'` rendering of the first `len` bits; positions past the
    /// stored length render as `'0'`.
    pub fn to_bit_string(&self, len: usize) -> String {
        (0..len).map(|i| if self.get(i) { '1' } else { '0' }).collect()
    }

    /// Parses a `'1'`/`'0'` string. Any character other than `'1'` is a clear bit.
    #[cfg(test)]
    pub fn from_bit_string(s: &str) -> Self {
        let mut bits = Self::zeros(s.chars().count());
        for (i, c) in s.chars().enumerate() {
            if c == '1' {
                bits.set(i);
            }
        }
        bits
    }

    fn clear_tail(&mut self) {
        let used = self.len % WORD_BITS;
        if used != 0 {
            if let Some(last) = self.words.last_mut() {
                *last &= (1u64 << used) - 1;
            }
        }
    }
}

fn words_for(len: usize) -> usize {
    len.div_ceil(WORD_BITS)
}
