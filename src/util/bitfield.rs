//! Fixed-width fields packed into an array of 32-bit words
//!
//! Field `index` of width `width` lives at bit `index * width` of the
//! array. Widths must divide the word size so that a field never straddles
//! two words.

use crate::config::WORD_BITS;

/// Location of a packed field inside a word array
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPos {
    /// Index of the word holding the field
    pub word: usize,
    /// Offset of the field's least significant bit in that word
    pub shift: u32,
    /// Unshifted mask of the field
    pub mask: u32,
}

impl FieldPos {
    /// Extracts the field value from `word`
    #[inline]
    pub const fn extract(&self, word: u32) -> u32 {
        (word >> self.shift) & self.mask
    }

    /// Returns `word` with the field replaced by `value` (extra bits dropped)
    #[inline]
    pub const fn insert(&self, word: u32, value: u32) -> u32 {
        (word & !(self.mask << self.shift)) | ((value & self.mask) << self.shift)
    }
}

/// Locates field `index` of `width` bits
///
/// `width` must be non-zero and divide [`WORD_BITS`].
#[inline]
pub const fn locate(index: usize, width: usize) -> FieldPos {
    debug_assert!(width > 0 && WORD_BITS % width == 0);
    let bit = index * width;
    let mask = if width >= WORD_BITS {
        u32::MAX
    } else {
        (1u32 << width) - 1
    };
    FieldPos {
        word: bit / WORD_BITS,
        shift: (bit % WORD_BITS) as u32,
        mask,
    }
}

/// Reads field `index` of `width` bits, `None` if it lies beyond `words`
pub fn get_field(words: &[u32], index: usize, width: usize) -> Option<u32> {
    let pos = locate(index, width);
    words.get(pos.word).map(|w| pos.extract(*w))
}

/// Writes field `index` of `width` bits; returns `false` if it lies beyond `words`
pub fn set_field(words: &mut [u32], index: usize, width: usize, value: u32) -> bool {
    let pos = locate(index, width);
    match words.get_mut(pos.word) {
        Some(w) => {
            *w = pos.insert(*w, value);
            true
        }
        None => false,
    }
}
