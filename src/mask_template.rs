//!
//! Mask templates.
//!
//! A template is a fixed sequence of positions. Each position is
//! either a literal separator that never changes, or a slot that
//! holds a single digit or the placeholder marker.
//!
//! ```
//! use rat_mask::MaskTemplate;
//!
//! let cpf = MaskTemplate::parse("___.___.___-__").expect("valid");
//! assert_eq!(cpf.len(), 14);
//! assert_eq!(cpf.slot_count(), 11);
//! ```
//!
//! Positions are counted in chars. A template must not contain
//! anything that renders as more than one char per position,
//! which rules out combining marks and the like.
//!

use crate::MaskError;
use std::fmt;
use std::fmt::{Debug, Formatter};
use std::ops::Range;
use unicode_segmentation::UnicodeSegmentation;

/// Default marker for an empty slot.
pub const PLACEHOLDER: char = '_';

/// One position of a mask template.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum MaskPart {
    /// Fixed separator.
    Literal(char),
    /// Holds a digit or the placeholder.
    Slot,
}

impl Debug for MaskPart {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            MaskPart::Literal(c) => write!(f, "\\{}", c),
            MaskPart::Slot => write!(f, "9"),
        }
    }
}

impl MaskPart {
    #[inline]
    pub fn is_slot(&self) -> bool {
        *self == MaskPart::Slot
    }

    #[inline]
    pub fn is_literal(&self) -> bool {
        matches!(self, MaskPart::Literal(_))
    }
}

/// Parsed mask template. Immutable once created.
#[derive(Clone, PartialEq, Eq)]
pub struct MaskTemplate {
    pattern: Box<str>,
    placeholder: char,
    parts: Box<[MaskPart]>,
    // position of each slot, ascending
    slots: Box<[usize]>,
}

impl Debug for MaskTemplate {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Mask {:?} ({} slots)", self.pattern, self.slots.len())
    }
}

impl MaskTemplate {
    /// Parse a template using `_` as the placeholder.
    ///
    /// Every `_` becomes a slot, everything else a literal.
    pub fn parse(pattern: &str) -> Result<Self, MaskError> {
        Self::parse_with(pattern, PLACEHOLDER)
    }

    /// Parse a template with a custom placeholder char.
    pub fn parse_with(pattern: &str, placeholder: char) -> Result<Self, MaskError> {
        let mut parts = Vec::new();
        for g in pattern.graphemes(true) {
            let mut chars = g.chars();
            let (Some(c), None) = (chars.next(), chars.next()) else {
                return Err(MaskError::InvalidTemplate(format!(
                    "{:?}: {:?} is not a single char",
                    pattern, g
                )));
            };
            if c == placeholder {
                parts.push(MaskPart::Slot);
            } else {
                parts.push(MaskPart::Literal(c));
            }
        }
        Self::from_parts(parts, placeholder)
    }

    /// Create a template from its positions.
    ///
    /// Fails if there is no slot, if the placeholder is a digit or
    /// if a literal is a digit, a control char or the placeholder.
    pub fn from_parts(
        parts: impl IntoIterator<Item = MaskPart>,
        placeholder: char,
    ) -> Result<Self, MaskError> {
        if placeholder.is_ascii_digit() || placeholder.is_control() {
            return Err(MaskError::InvalidTemplate(format!(
                "placeholder {:?} not usable",
                placeholder
            )));
        }

        let parts = parts.into_iter().collect::<Vec<_>>();

        let mut pattern = String::new();
        let mut slots = Vec::new();
        for (pos, part) in parts.iter().enumerate() {
            match *part {
                MaskPart::Slot => {
                    slots.push(pos);
                    pattern.push(placeholder);
                }
                MaskPart::Literal(c) => {
                    if c == placeholder || c.is_ascii_digit() || c.is_control() {
                        return Err(MaskError::InvalidTemplate(format!(
                            "literal {:?} at {} not usable",
                            c, pos
                        )));
                    }
                    pattern.push(c);
                }
            }
        }
        if slots.is_empty() {
            return Err(MaskError::InvalidTemplate(format!(
                "{:?} has no slot",
                pattern
            )));
        }

        Ok(Self {
            pattern: pattern.into(),
            placeholder,
            parts: parts.into(),
            slots: slots.into(),
        })
    }

    /// The template with all slots empty.
    #[inline]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Marker for an empty slot.
    #[inline]
    pub fn placeholder(&self) -> char {
        self.placeholder
    }

    /// Number of positions.
    #[inline]
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Never true for a valid template.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Number of slot positions.
    #[inline]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn parts(&self) -> &[MaskPart] {
        &self.parts
    }

    #[inline]
    pub fn part(&self, pos: usize) -> Option<MaskPart> {
        self.parts.get(pos).copied()
    }

    #[inline]
    pub fn is_slot(&self, pos: usize) -> bool {
        matches!(self.parts.get(pos), Some(MaskPart::Slot))
    }

    /// Literal positions and their chars.
    pub fn literals(&self) -> impl Iterator<Item = (usize, char)> + '_ {
        self.parts.iter().enumerate().filter_map(|(pos, p)| match p {
            MaskPart::Literal(c) => Some((pos, *c)),
            MaskPart::Slot => None,
        })
    }

    /// Position of the n-th slot.
    #[inline]
    pub fn slot_pos(&self, slot: usize) -> Option<usize> {
        self.slots.get(slot).copied()
    }

    /// Number of slots strictly before the position.
    /// For a slot position this is its slot index.
    #[inline]
    pub fn slots_before(&self, pos: usize) -> usize {
        self.slots.partition_point(|&p| p < pos)
    }

    /// First slot position at or after pos.
    #[inline]
    pub fn next_slot(&self, pos: usize) -> Option<usize> {
        self.slot_pos(self.slots_before(pos))
    }

    /// Last slot position before pos.
    #[inline]
    pub fn prev_slot(&self, pos: usize) -> Option<usize> {
        match self.slots_before(pos) {
            0 => None,
            n => self.slot_pos(n - 1),
        }
    }

    /// Slot indices covered by a range of positions.
    #[inline]
    pub fn slot_range(&self, range: Range<usize>) -> Range<usize> {
        self.slots_before(range.start)..self.slots_before(range.end)
    }

    /// Skips literals starting at pos. Stops at the next slot or
    /// at the end of the template.
    pub fn skip_literals(&self, mut pos: usize) -> usize {
        while pos < self.parts.len() && self.parts[pos].is_literal() {
            pos += 1;
        }
        pos
    }
}
