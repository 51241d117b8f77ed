//!
//! Free-text mode of the field.
//!
//! Used when no mask is set. Text is edited as a plain single line.
//! An optional [RegexGate] can veto input: whenever the current text
//! with the new input appended contains a match, the input is
//! refused.
//!

use crate::{MaskError, upos_type};
use log::debug;
use regex_cursor::engines::dfa::{Regex, find_iter};
use regex_cursor::{Input, RopeyCursor};
use ropey::Rope;
use std::cmp::{max, min};
use std::fmt::{Debug, Formatter};
use std::ops::Range;
use std::rc::Rc;
use unicode_segmentation::UnicodeSegmentation;

/// Blacklist filter for free-text input.
#[derive(Clone)]
pub struct RegexGate {
    pattern: Box<str>,
    re: Rc<Regex>,
}

impl Debug for RegexGate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegexGate")
            .field("pattern", &self.pattern)
            .finish()
    }
}

impl RegexGate {
    /// Compile the pattern.
    pub fn new(pattern: &str) -> Result<Self, MaskError> {
        let re = Regex::new(pattern).map_err(|e| MaskError::InvalidRegex(e.to_string()))?;
        Ok(Self {
            pattern: pattern.into(),
            re: Rc::new(re),
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Would the text with the incoming input appended contain
    /// a match?
    pub fn rejects(&self, current: &Rope, incoming: &str) -> bool {
        let mut candidate = current.clone();
        candidate.insert(candidate.len_chars(), incoming);

        let cursor = RopeyCursor::new(candidate.byte_slice(..));
        let input = Input::new(cursor);
        let rejected = find_iter(&self.re, input).next().is_some();
        if rejected {
            debug!("regex {:?} rejects {:?}", self.pattern, incoming);
        }
        rejected
    }
}

/// Plain single-line text with cursor and selection.
///
/// Positions are chars, movement and deletion go by grapheme.
#[derive(Debug, Default, Clone)]
pub struct FreeTextCore {
    text: Rope,
    cursor: upos_type,
    anchor: upos_type,
}

impl FreeTextCore {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn rope(&self) -> &Rope {
        &self.text
    }

    #[inline]
    pub fn text(&self) -> String {
        self.text.to_string()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.text.len_chars() == 0
    }

    /// Length in chars.
    #[inline]
    pub fn len(&self) -> upos_type {
        self.text.len_chars() as upos_type
    }

    /// Replace the text. Line breaks are dropped.
    /// The cursor goes to the end.
    pub fn set_text(&mut self, s: &str) {
        let s = single_line(s);
        self.text = Rope::from_str(&s);
        self.cursor = self.len();
        self.anchor = self.cursor;
    }

    pub fn clear(&mut self) -> bool {
        if self.is_empty() {
            return false;
        }
        self.text = Rope::new();
        self.cursor = 0;
        self.anchor = 0;
        true
    }

    #[inline]
    pub fn cursor(&self) -> upos_type {
        self.cursor
    }

    #[inline]
    pub fn anchor(&self) -> upos_type {
        self.anchor
    }

    pub fn set_cursor(&mut self, cursor: upos_type, extend_selection: bool) -> bool {
        let old = (self.cursor, self.anchor);
        self.cursor = min(cursor, self.len());
        if !extend_selection {
            self.anchor = self.cursor;
        }
        old != (self.cursor, self.anchor)
    }

    #[inline]
    pub fn has_selection(&self) -> bool {
        self.cursor != self.anchor
    }

    #[inline]
    pub fn selection(&self) -> Range<upos_type> {
        min(self.cursor, self.anchor)..max(self.cursor, self.anchor)
    }

    pub fn set_selection(&mut self, anchor: upos_type, cursor: upos_type) -> bool {
        let old = (self.cursor, self.anchor);
        self.anchor = min(anchor, self.len());
        self.cursor = min(cursor, self.len());
        old != (self.cursor, self.anchor)
    }

    pub fn select_all(&mut self) -> bool {
        self.set_selection(0, self.len())
    }

    pub fn selected_text(&self) -> String {
        let sel = self.selection();
        self.text
            .slice(sel.start as usize..sel.end as usize)
            .to_string()
    }

    /// Insert at the cursor, replacing the selection.
    pub fn insert_str(&mut self, s: &str) -> bool {
        let s = single_line(s);
        let removed = self.remove_selection();
        if s.is_empty() {
            return removed;
        }

        let pos = self.cursor as usize;
        self.text.insert(pos, &s);
        self.cursor += s.chars().count() as upos_type;
        self.anchor = self.cursor;
        true
    }

    /// Delete the selection.
    pub fn remove_selection(&mut self) -> bool {
        if !self.has_selection() {
            return false;
        }
        let sel = self.selection();
        self.text.remove(sel.start as usize..sel.end as usize);
        self.cursor = sel.start;
        self.anchor = sel.start;
        true
    }

    /// Backspace.
    pub fn remove_prev(&mut self) -> bool {
        if self.has_selection() {
            return self.remove_selection();
        }
        let prev = self.prev_boundary(self.cursor);
        if prev == self.cursor {
            return false;
        }
        self.text.remove(prev as usize..self.cursor as usize);
        self.cursor = prev;
        self.anchor = prev;
        true
    }

    /// Delete.
    pub fn remove_next(&mut self) -> bool {
        if self.has_selection() {
            return self.remove_selection();
        }
        let next = self.next_boundary(self.cursor);
        if next == self.cursor {
            return false;
        }
        self.text.remove(self.cursor as usize..next as usize);
        true
    }

    pub fn move_right(&mut self, extend_selection: bool) -> bool {
        let c = if !extend_selection && self.has_selection() {
            self.selection().end
        } else {
            self.next_boundary(self.cursor)
        };
        self.set_cursor(c, extend_selection)
    }

    pub fn move_left(&mut self, extend_selection: bool) -> bool {
        let c = if !extend_selection && self.has_selection() {
            self.selection().start
        } else {
            self.prev_boundary(self.cursor)
        };
        self.set_cursor(c, extend_selection)
    }

    pub fn move_to_line_start(&mut self, extend_selection: bool) -> bool {
        self.set_cursor(0, extend_selection)
    }

    pub fn move_to_line_end(&mut self, extend_selection: bool) -> bool {
        self.set_cursor(self.len(), extend_selection)
    }

    // char positions where graphemes start, plus the end.
    fn boundaries(&self) -> Vec<upos_type> {
        let text = self.text.to_string();
        let mut bounds = Vec::new();
        let mut pos = 0;
        for g in text.graphemes(true) {
            bounds.push(pos);
            pos += g.chars().count() as upos_type;
        }
        bounds.push(pos);
        bounds
    }

    fn next_boundary(&self, pos: upos_type) -> upos_type {
        self.boundaries()
            .into_iter()
            .find(|v| *v > pos)
            .unwrap_or(self.len())
    }

    fn prev_boundary(&self, pos: upos_type) -> upos_type {
        self.boundaries()
            .into_iter()
            .rev()
            .find(|v| *v < pos)
            .unwrap_or(0)
    }
}

fn single_line(s: &str) -> String {
    s.chars().filter(|c| *c != '\n' && *c != '\r').collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate() {
        let gate = RegexGate::new("[0-9]").expect("valid");
        let text = Rope::from_str("abc");
        assert!(!gate.rejects(&text, "d"));
        assert!(gate.rejects(&text, "1"));
        assert!(gate.rejects(&Rope::from_str("a1"), "b"));

        assert!(matches!(
            RegexGate::new("(unclosed"),
            Err(MaskError::InvalidRegex(_))
        ));
    }

    #[test]
    fn test_edit() {
        let mut t = FreeTextCore::new();
        assert!(t.insert_str("hello"));
        assert_eq!(t.cursor(), 5);
        assert!(t.move_left(true));
        assert!(t.move_left(true));
        assert_eq!(t.selected_text(), "lo");
        assert!(t.insert_str("p!"));
        assert_eq!(t.text(), "help!");
        assert!(t.remove_prev());
        assert_eq!(t.text(), "help");
        assert!(t.move_to_line_start(false));
        assert!(t.remove_next());
        assert_eq!(t.text(), "elp");
        assert!(!t.remove_prev());
    }

    #[test]
    fn test_graphemes() {
        let mut t = FreeTextCore::new();
        t.set_text("ae\u{301}x");
        assert_eq!(t.len(), 4);
        t.set_cursor(1, false);
        assert!(t.move_right(false));
        assert_eq!(t.cursor(), 3);
        assert!(t.remove_prev());
        assert_eq!(t.text(), "ax");
        assert_eq!(t.cursor(), 1);
    }

    #[test]
    fn test_single_line() {
        let mut t = FreeTextCore::new();
        t.insert_str("a\r\nb");
        assert_eq!(t.text(), "ab");
    }
}
