//! The translation text that annotations point into.
//!
//! Annotation offsets come from a browser-based labeling UI and therefore
//! count UTF-16 code units, while Rust strings are indexed by UTF-8 bytes.
//! [`TextBuffer`] owns the text and translates between the two.

use std::fmt;
use std::ops::Range;

/// Why a `[start, end)` code-unit range cannot be mapped onto the text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OffsetError {
    /// `start` is greater than `end`.
    Reversed { start: usize, end: usize },
    /// An offset lies beyond the end of the text.
    OutOfBounds { offset: usize, len: usize },
    /// An offset points between the two halves of a surrogate pair.
    SplitsSurrogate { offset: usize },
}

impl fmt::Display for OffsetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OffsetError::Reversed { start, end } => {
                write!(f, "start {} is after end {}", start, end)
            }
            OffsetError::OutOfBounds { offset, len } => {
                write!(f, "offset {} is beyond text length {}", offset, len)
            }
            OffsetError::SplitsSurrogate { offset } => {
                write!(f, "offset {} splits a surrogate pair", offset)
            }
        }
    }
}

/// An immutable text with a UTF-16 code-unit to byte offset table.
#[derive(Clone, Debug, Default)]
pub struct TextBuffer {
    text: String,
    /// Byte offset for every code-unit position `0..=len_units`; `None` for
    /// positions inside a surrogate pair.
    byte_at: Vec<Option<usize>>,
}

impl TextBuffer {
    /// Creates a buffer over the given text.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let mut byte_at = Vec::with_capacity(text.len() + 1);

        for (byte, ch) in text.char_indices() {
            byte_at.push(Some(byte));
            if ch.len_utf16() == 2 {
                byte_at.push(None);
            }
        }
        byte_at.push(Some(text.len()));

        Self { text, byte_at }
    }

    /// Returns the whole text.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Length of the text in UTF-16 code units.
    pub fn len_units(&self) -> usize {
        self.byte_at.len() - 1
    }

    /// Returns true if the text is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Maps a code-unit offset to a byte offset.
    pub fn byte_offset(&self, unit: usize) -> Result<usize, OffsetError> {
        match self.byte_at.get(unit) {
            Some(Some(byte)) => Ok(*byte),
            Some(None) => Err(OffsetError::SplitsSurrogate { offset: unit }),
            None => Err(OffsetError::OutOfBounds {
                offset: unit,
                len: self.len_units(),
            }),
        }
    }

    /// Maps a code-unit range to a byte range.
    pub fn byte_range(&self, start: usize, end: usize) -> Result<Range<usize>, OffsetError> {
        if start > end {
            return Err(OffsetError::Reversed { start, end });
        }
        Ok(self.byte_offset(start)?..self.byte_offset(end)?)
    }

    /// Returns the text between two code-unit offsets.
    pub fn slice_units(&self, start: usize, end: usize) -> Result<&str, OffsetError> {
        let range = self.byte_range(start, end)?;
        Ok(&self.text[range])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_offsets_match_bytes() {
        let buffer = TextBuffer::new("The cat sat.");
        assert_eq!(buffer.len_units(), 12);
        assert_eq!(buffer.slice_units(4, 7), Ok("cat"));
    }

    #[test]
    fn multibyte_text_uses_code_units() {
        // 'é' is two UTF-8 bytes but one UTF-16 unit.
        let buffer = TextBuffer::new("café au lait");
        assert_eq!(buffer.len_units(), 12);
        assert_eq!(buffer.slice_units(0, 4), Ok("café"));
        assert_eq!(buffer.byte_offset(5), Ok(6));
    }

    #[test]
    fn astral_characters_take_two_units() {
        let buffer = TextBuffer::new("a😀b");
        assert_eq!(buffer.len_units(), 4);
        assert_eq!(buffer.slice_units(1, 3), Ok("😀"));
        assert_eq!(buffer.slice_units(3, 4), Ok("b"));
        assert_eq!(
            buffer.byte_offset(2),
            Err(OffsetError::SplitsSurrogate { offset: 2 })
        );
    }

    #[test]
    fn rejects_reversed_and_out_of_range() {
        let buffer = TextBuffer::new("abc");
        assert_eq!(
            buffer.byte_range(2, 1),
            Err(OffsetError::Reversed { start: 2, end: 1 })
        );
        assert_eq!(
            buffer.byte_range(1, 9),
            Err(OffsetError::OutOfBounds { offset: 9, len: 3 })
        );
    }

    #[test]
    fn empty_buffer_has_single_position() {
        let buffer = TextBuffer::new("");
        assert!(buffer.is_empty());
        assert_eq!(buffer.len_units(), 0);
        assert_eq!(buffer.byte_range(0, 0), Ok(0..0));
    }
}
