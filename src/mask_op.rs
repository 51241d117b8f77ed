//!
//! The editing engine.
//!
//! Every operation takes the template, the current text and the
//! caret and returns either the complete new text and caret or a
//! [Rejection]. Nothing is modified in place.
//!
//! All operations work on the digit content of the slots. The
//! digits are spliced and the text is rebuilt with [normalize],
//! which puts the literals back at their template positions.
//! This keeps the filled slots packed to the left: there is never
//! a placeholder between two digits.
//!

use crate::MaskError;
use crate::mask_template::{MaskPart, MaskTemplate};
use log::{debug, trace};
use std::cmp::{max, min};
use std::ops::Range;

/// Caret position and selection length, both in chars.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Caret {
    pub index: usize,
    pub selection: usize,
}

impl Caret {
    pub const fn new(index: usize, selection: usize) -> Self {
        Self { index, selection }
    }

    /// Caret without selection.
    pub const fn at(index: usize) -> Self {
        Self {
            index,
            selection: 0,
        }
    }

    /// Clamp to `[0, len]` and the selection to `[0, len - index]`.
    pub fn clamp(self, len: usize) -> Self {
        let index = min(self.index, len);
        Self {
            index,
            selection: min(self.selection, len - index),
        }
    }

    #[inline]
    pub fn has_selection(&self) -> bool {
        self.selection > 0
    }

    /// Selected positions.
    #[inline]
    pub fn range(&self) -> Range<usize> {
        self.index..self.index + self.selection
    }
}

/// Backspace or Delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteDirection {
    /// Remove before the caret.
    Backward,
    /// Remove at the caret.
    Forward,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditKind {
    /// Single key.
    Insert(char),
    Delete(DeleteDirection),
    /// Clipboard text. Only the digits are used.
    Paste(String),
}

/// One user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditRequest {
    pub kind: EditKind,
    pub caret: Caret,
}

impl EditRequest {
    pub fn insert(c: char, caret: Caret) -> Self {
        Self {
            kind: EditKind::Insert(c),
            caret,
        }
    }

    pub fn delete(direction: DeleteDirection, caret: Caret) -> Self {
        Self {
            kind: EditKind::Delete(direction),
            caret,
        }
    }

    pub fn paste(text: impl Into<String>, caret: Caret) -> Self {
        Self {
            kind: EditKind::Paste(text.into()),
            caret,
        }
    }
}

/// Reason for ignoring an edit.
///
/// These happen all the time near the boundaries of the mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// No empty slot left, or the caret is past the last slot.
    MaskFull,
    /// The input contains no digit.
    EmptyExtraction,
    /// No slot in the range to delete.
    NothingToDelete,
}

/// New text and caret after an edit. The selection is always cleared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edited {
    pub text: String,
    pub caret: usize,
}

/// Result of an edit.
#[allow(variant_size_differences)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditResult {
    Applied(Edited),
    Rejected(Rejection),
}

impl EditResult {
    #[inline]
    pub fn is_applied(&self) -> bool {
        matches!(self, EditResult::Applied(_))
    }

    #[inline]
    pub fn edited(self) -> Option<Edited> {
        match self {
            EditResult::Applied(v) => Some(v),
            EditResult::Rejected(_) => None,
        }
    }

    #[inline]
    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            EditResult::Applied(_) => None,
            EditResult::Rejected(r) => Some(*r),
        }
    }
}

/// Empty text for the template and the caret at 0.
pub fn reset(template: &MaskTemplate) -> Edited {
    Edited {
        text: template.pattern().to_string(),
        caret: 0,
    }
}

/// Build the text for the template from the slot content.
///
/// Only the digits of the content are used. They fill the slots
/// from the left, surplus digits are dropped and the remaining
/// slots get the placeholder. Literals are always taken from the
/// template.
pub fn normalize<I>(content: I, template: &MaskTemplate) -> String
where
    I: IntoIterator<Item = char>,
{
    let mut digits = content.into_iter().filter(|c| c.is_ascii_digit()).fuse();

    let mut buf = String::with_capacity(template.pattern().len());
    for part in template.parts() {
        match part {
            MaskPart::Literal(c) => buf.push(*c),
            MaskPart::Slot => buf.push(digits.next().unwrap_or(template.placeholder())),
        }
    }
    buf
}

/// Digits of the text.
pub fn digits_only(text: &str) -> String {
    text.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Digits in the slots of the text, left to right.
pub fn slot_digits(template: &MaskTemplate, text: &str) -> String {
    filled(template, text).into_iter().collect()
}

fn filled(template: &MaskTemplate, text: &str) -> Vec<char> {
    text.chars()
        .zip(template.parts())
        .filter(|(c, p)| p.is_slot() && c.is_ascii_digit())
        .map(|(c, _)| c)
        .collect()
}

/// Text for the clipboard. Empty slots are copied as spaces.
pub fn copy_text(template: &MaskTemplate, text: &str, range: Range<usize>) -> String {
    text.chars()
        .skip(range.start)
        .take(range.end.saturating_sub(range.start))
        .map(|c| if c == template.placeholder() { ' ' } else { c })
        .collect()
}

/// Checks that the text could have been produced by editing.
///
/// Length and literals must match the template, slots must hold a digit
/// or the placeholder, and no digit may follow an empty slot.
pub fn check_text(template: &MaskTemplate, text: &str) -> Result<(), MaskError> {
    let len = text.chars().count();
    if len != template.len() {
        return Err(MaskError::InvalidText(format!(
            "{:?}: length {} expected {}",
            text,
            len,
            template.len()
        )));
    }

    let mut empty_seen = false;
    for (pos, (c, part)) in text.chars().zip(template.parts()).enumerate() {
        match part {
            MaskPart::Literal(l) => {
                if c != *l {
                    return Err(MaskError::InvalidText(format!(
                        "{:?}: {:?} at {} expected {:?}",
                        text, c, pos, l
                    )));
                }
            }
            MaskPart::Slot => {
                if c == template.placeholder() {
                    empty_seen = true;
                } else if c.is_ascii_digit() {
                    if empty_seen {
                        return Err(MaskError::InvalidText(format!(
                            "{:?}: digit at {} after an empty slot",
                            text, pos
                        )));
                    }
                } else {
                    return Err(MaskError::InvalidText(format!(
                        "{:?}: {:?} at {} is not a digit",
                        text, c, pos
                    )));
                }
            }
        }
    }
    Ok(())
}

/// Replace the digits of the given slots with insert.
///
/// Slot indices beyond the filled digits are clamped to the end
/// of the digits. Returns the new text and the index of the last
/// inserted digit.
fn splice(
    template: &MaskTemplate,
    digits: &[char],
    slots: Range<usize>,
    insert: &[char],
) -> (String, Option<usize>) {
    let lo = min(slots.start, digits.len());
    let hi = min(slots.end, digits.len()).max(lo);

    let content = digits[..lo]
        .iter()
        .chain(insert)
        .chain(&digits[hi..])
        .copied();
    let text = normalize(content, template);

    let last = if insert.is_empty() {
        None
    } else {
        Some(lo + insert.len() - 1)
    };
    (text, last)
}

/// Position right after the slot. End of the template if there is no such slot.
fn after_slot(template: &MaskTemplate, slot: Option<usize>) -> usize {
    slot.and_then(|v| template.slot_pos(v))
        .map(|v| v + 1)
        .unwrap_or(template.len())
}

/// Type a single digit.
///
/// Without selection the digit goes to the first slot at or after
/// the caret, or to the first empty slot if that is further left.
/// Digits from there on shift right. The caret ends up after the
/// digit and any literals following it.
///
/// With selection the selected digits are replaced by the single
/// digit. The caret ends up right after it.
pub fn apply_digit(template: &MaskTemplate, text: &str, caret: Caret, digit: char) -> EditResult {
    if !digit.is_ascii_digit() {
        debug!("apply_digit: {:?} is not a digit", digit);
        return EditResult::Rejected(Rejection::EmptyExtraction);
    }

    let caret = caret.clamp(template.len());
    let digits = filled(template, text);
    let selected = template.slot_range(caret.range());

    if selected.is_empty() {
        let Some(pos) = template.next_slot(caret.index) else {
            debug!("apply_digit: no slot after {}", caret.index);
            return EditResult::Rejected(Rejection::MaskFull);
        };
        if digits.len() >= template.slot_count() {
            debug!("apply_digit: mask full");
            return EditResult::Rejected(Rejection::MaskFull);
        }

        let slot = template.slots_before(pos);
        let (text, last) = splice(template, &digits, slot..slot, &[digit]);
        let caret = template.skip_literals(after_slot(template, last));
        trace!("apply_digit {:?} -> {:?} {}", digit, text, caret);
        EditResult::Applied(Edited { text, caret })
    } else {
        let (text, last) = splice(template, &digits, selected, &[digit]);
        let caret = after_slot(template, last);
        trace!("apply_digit {:?} -> {:?} {}", digit, text, caret);
        EditResult::Applied(Edited { text, caret })
    }
}

/// Remove digits.
///
/// Without selection this removes the slot before the caret
/// (Backward) or at the caret (Forward). Literals in between are
/// skipped. The caret ends up at the position of the removed slot.
///
/// With selection all selected slots are removed and the caret
/// goes to the start of the selection.
///
/// Digits to the right move left to close the gap.
pub fn apply_deletion(
    template: &MaskTemplate,
    text: &str,
    caret: Caret,
    direction: DeleteDirection,
) -> EditResult {
    let caret = caret.clamp(template.len());
    let digits = filled(template, text);

    if caret.has_selection() {
        let selected = template.slot_range(caret.range());
        if selected.is_empty() {
            debug!("apply_deletion: no slot in {:?}", caret.range());
            return EditResult::Rejected(Rejection::NothingToDelete);
        }

        let (text, _) = splice(template, &digits, selected, &[]);
        trace!("apply_deletion -> {:?} {}", text, caret.index);
        EditResult::Applied(Edited {
            text,
            caret: caret.index,
        })
    } else {
        let pos = match direction {
            DeleteDirection::Backward => template.prev_slot(caret.index),
            DeleteDirection::Forward => template.next_slot(caret.index),
        };
        let Some(pos) = pos else {
            debug!("apply_deletion: no slot {:?} of {}", direction, caret.index);
            return EditResult::Rejected(Rejection::NothingToDelete);
        };

        let slot = template.slots_before(pos);
        let (text, _) = splice(template, &digits, slot..slot + 1, &[]);
        trace!("apply_deletion -> {:?} {}", text, pos);
        EditResult::Applied(Edited { text, caret: pos })
    }
}

/// Paste the digits of the clipboard text.
///
/// Without selection the digits are inserted like typed, as many as
/// there are slots from the caret to the end, but no more than the
/// empty slots. Existing digits shift right. The caret ends up right
/// after the last pasted digit, but never moves left.
///
/// With selection the selected slots are overwritten one by one.
/// Selected slots that get no digit are removed, surplus digits are
/// dropped. The caret ends up right after the last pasted digit.
pub fn apply_paste(template: &MaskTemplate, text: &str, caret: Caret, clip: &str) -> EditResult {
    let mut paste = digits_only(clip).chars().collect::<Vec<_>>();
    if paste.is_empty() {
        debug!("apply_paste: no digits in {:?}", clip);
        return EditResult::Rejected(Rejection::EmptyExtraction);
    }
    paste.truncate(template.slot_count());

    let caret = caret.clamp(template.len());
    let digits = filled(template, text);
    let selected = template.slot_range(caret.range());

    if selected.is_empty() {
        let Some(pos) = template.next_slot(caret.index) else {
            debug!("apply_paste: no slot after {}", caret.index);
            return EditResult::Rejected(Rejection::MaskFull);
        };
        if digits.len() >= template.slot_count() {
            debug!("apply_paste: mask full");
            return EditResult::Rejected(Rejection::MaskFull);
        }

        // room is counted from the caret, or from the first empty slot
        // if that is further right.
        let slot = template.slots_before(pos);
        paste.truncate(template.slot_count() - max(slot, digits.len()));

        let (text, last) = splice(template, &digits, slot..slot, &paste);
        let caret = max(after_slot(template, last), caret.index);
        trace!("apply_paste {:?} -> {:?} {}", clip, text, caret);
        EditResult::Applied(Edited { text, caret })
    } else {
        paste.truncate(selected.len());

        let (text, last) = splice(template, &digits, selected, &paste);
        let caret = after_slot(template, last);
        trace!("apply_paste {:?} -> {:?} {}", clip, text, caret);
        EditResult::Applied(Edited { text, caret })
    }
}

/// Caret position after skipping the next slot, without editing.
///
/// Used for the space key. None if there is no slot left.
pub fn skip_slot(template: &MaskTemplate, index: usize) -> Option<usize> {
    template
        .next_slot(index)
        .map(|pos| template.skip_literals(pos + 1))
}

/// Dispatch an edit request.
pub fn apply(template: &MaskTemplate, text: &str, request: &EditRequest) -> EditResult {
    match &request.kind {
        EditKind::Insert(c) => apply_digit(template, text, request.caret, *c),
        EditKind::Delete(direction) => apply_deletion(template, text, request.caret, *direction),
        EditKind::Paste(clip) => apply_paste(template, text, request.caret, clip),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> MaskTemplate {
        MaskTemplate::parse("__/__/____").expect("valid")
    }

    #[test]
    fn test_normalize() {
        let t = date();
        assert_eq!(normalize("".chars(), &t), "__/__/____");
        assert_eq!(normalize("0101".chars(), &t), "01/01/____");
        assert_eq!(normalize("01_0_1".chars(), &t), "01/01/____");
        assert_eq!(normalize("01/01/2024".chars(), &t), "01/01/2024");
        assert_eq!(normalize("0101202499".chars(), &t), "01/01/2024");
    }

    #[test]
    fn test_splice() {
        let t = date();
        let digits = ['1', '2', '3'];
        assert_eq!(
            splice(&t, &digits, 1..1, &['9']),
            ("19/23/____".to_string(), Some(1))
        );
        assert_eq!(
            splice(&t, &digits, 7..7, &['9']),
            ("12/39/____".to_string(), Some(3))
        );
        assert_eq!(
            splice(&t, &digits, 0..2, &[]),
            ("3_/__/____".to_string(), None)
        );
        assert_eq!(
            splice(&t, &digits, 2..6, &['4', '5']),
            ("12/45/____".to_string(), Some(3))
        );
    }

    #[test]
    fn test_caret() {
        assert_eq!(Caret::new(5, 10).clamp(10), Caret::new(5, 5));
        assert_eq!(Caret::new(15, 10).clamp(10), Caret::new(10, 0));
        assert_eq!(Caret::new(2, 3).range(), 2..5);
        assert!(!Caret::at(3).has_selection());
    }

    #[test]
    fn test_check_text() {
        let t = date();
        assert!(check_text(&t, "__/__/____").is_ok());
        assert!(check_text(&t, "12/3_/____").is_ok());
        assert!(check_text(&t, "12/_3/____").is_err());
        assert!(check_text(&t, "12-34/____").is_err());
        assert!(check_text(&t, "1a/__/____").is_err());
        assert!(check_text(&t, "12/34/").is_err());
    }

    #[test]
    fn test_copy_text() {
        let t = date();
        assert_eq!(copy_text(&t, "12/3_/____", 0..5), "12/3 ");
        assert_eq!(copy_text(&t, "12/3_/____", 3..3), "");
    }
}
