use crate::event::TextOutcome;
use crate::mask_op::{
    Caret, DeleteDirection, EditRequest, EditResult, check_text, copy_text, normalize, reset,
    skip_slot, slot_digits,
};
use crate::mask_template::MaskTemplate;
use crate::{MaskError, upos_type};
use log::debug;
use std::cmp::{max, min};
use std::ops::Range;

/// Editing core for a masked field.
///
/// Holds the current text, the caret and the selection anchor, and
/// threads them through the functions of [crate::mask_op].
#[derive(Debug, Clone)]
pub struct MaskedCore {
    template: MaskTemplate,
    text: String,
    cursor: upos_type,
    anchor: upos_type,
}

impl MaskedCore {
    /// New core with empty slots.
    pub fn new(template: MaskTemplate) -> Self {
        let init = reset(&template);
        Self {
            template,
            text: init.text,
            cursor: init.caret as upos_type,
            anchor: init.caret as upos_type,
        }
    }

    /// Changes the template.
    /// Resets the value to the empty template.
    pub fn set_template(&mut self, template: MaskTemplate) {
        self.template = template;
        self.clear();
    }

    #[inline]
    pub fn template(&self) -> &MaskTemplate {
        &self.template
    }

    /// The empty template.
    #[inline]
    pub fn mask(&self) -> &str {
        self.template.pattern()
    }
}

impl MaskedCore {
    /// Set the cursor position.
    /// The value is capped to the text length.
    ///
    /// Returns true, if the cursor actually changed.
    pub fn set_cursor(&mut self, cursor: upos_type, extend_selection: bool) -> bool {
        let old = (self.cursor, self.anchor);

        self.cursor = min(cursor, self.len());
        if !extend_selection {
            self.anchor = self.cursor;
        }

        old != (self.cursor, self.anchor)
    }

    /// Place the cursor at the first empty slot, or at the end
    /// if all slots are filled.
    pub fn set_default_cursor(&mut self) {
        let filled = slot_digits(&self.template, &self.text).len();
        let pos = self
            .template
            .slot_pos(filled)
            .unwrap_or(self.template.len());
        self.set_cursor(pos as upos_type, false);
    }

    /// Cursor position in chars.
    #[inline]
    pub fn cursor(&self) -> upos_type {
        self.cursor
    }

    /// Selection anchor
    #[inline]
    pub fn anchor(&self) -> upos_type {
        self.anchor
    }

    /// Any text selection.
    #[inline]
    pub fn has_selection(&self) -> bool {
        self.anchor != self.cursor
    }

    /// Select text.
    #[inline]
    pub fn set_selection(&mut self, anchor: upos_type, cursor: upos_type) -> bool {
        let old = (self.cursor, self.anchor);
        self.anchor = min(anchor, self.len());
        self.cursor = min(cursor, self.len());
        old != (self.cursor, self.anchor)
    }

    /// Select all text.
    #[inline]
    pub fn select_all(&mut self) -> bool {
        self.set_selection(0, self.len())
    }

    /// Selection as range.
    #[inline]
    pub fn selection(&self) -> Range<upos_type> {
        min(self.cursor, self.anchor)..max(self.cursor, self.anchor)
    }

    /// Caret as used by the engine.
    #[inline]
    pub fn caret(&self) -> Caret {
        let sel = self.selection();
        Caret::new(sel.start as usize, (sel.end - sel.start) as usize)
    }

    /// Selected text for the clipboard. Empty slots are
    /// replaced with spaces.
    pub fn selected_text(&self) -> String {
        let sel = self.selection();
        copy_text(
            &self.template,
            &self.text,
            sel.start as usize..sel.end as usize,
        )
    }
}

impl MaskedCore {
    /// No digit entered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.text == self.template.pattern()
    }

    /// All slots filled.
    #[inline]
    pub fn is_complete(&self) -> bool {
        !self.text.contains(self.template.placeholder())
    }

    /// Current text including literals and placeholders.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The entered digits.
    #[inline]
    pub fn digits(&self) -> String {
        slot_digits(&self.template, &self.text)
    }

    /// Length in chars. Always the template length.
    #[inline]
    pub fn len(&self) -> upos_type {
        self.template.len() as upos_type
    }

    /// Reset to the empty template. The cursor goes to 0.
    pub fn clear(&mut self) {
        let init = reset(&self.template);
        self.text = init.text;
        self.cursor = init.caret as upos_type;
        self.anchor = init.caret as upos_type;
    }

    /// Sets the value.
    ///
    /// An empty string clears the value. Anything else must conform to
    /// the template exactly, as produced by editing.
    pub fn set_text(&mut self, s: &str) -> Result<(), MaskError> {
        if s.is_empty() {
            self.clear();
            return Ok(());
        }
        check_text(&self.template, s)?;
        self.text = s.to_string();
        self.set_default_cursor();
        Ok(())
    }

    /// Sets the value from the digits of s. Everything else is
    /// ignored. Surplus digits are dropped.
    pub fn set_digits(&mut self, s: &str) {
        self.text = normalize(s.chars(), &self.template);
        self.set_default_cursor();
    }
}

impl MaskedCore {
    /// Apply an edit. The caret of the request is used, not the
    /// current cursor.
    ///
    /// TextChanged if the text changed, Changed if only the cursor
    /// moved. Rejected edits are Unchanged.
    pub fn apply(&mut self, request: &EditRequest) -> TextOutcome {
        match crate::mask_op::apply(&self.template, &self.text, request) {
            EditResult::Applied(edited) => {
                let caret = edited.caret as upos_type;
                let text_changed = edited.text != self.text;
                let moved = caret != self.cursor || caret != self.anchor;
                self.text = edited.text;
                self.cursor = caret;
                self.anchor = caret;
                if text_changed {
                    TextOutcome::TextChanged
                } else {
                    moved.into()
                }
            }
            EditResult::Rejected(r) => {
                debug!("rejected {:?}: {:?}", request.kind, r);
                TextOutcome::Unchanged
            }
        }
    }

    /// Type a digit at the cursor, replacing the selection.
    pub fn insert_char(&mut self, c: char) -> TextOutcome {
        self.apply(&EditRequest::insert(c, self.caret()))
    }

    /// Backspace. Removes the selection if any.
    pub fn remove_prev(&mut self) -> TextOutcome {
        self.apply(&EditRequest::delete(
            DeleteDirection::Backward,
            self.caret(),
        ))
    }

    /// Delete. Removes the selection if any.
    pub fn remove_next(&mut self) -> TextOutcome {
        self.apply(&EditRequest::delete(DeleteDirection::Forward, self.caret()))
    }

    /// Paste the digits of the text at the cursor, replacing
    /// the selection.
    pub fn paste(&mut self, text: &str) -> TextOutcome {
        self.apply(&EditRequest::paste(text, self.caret()))
    }

    /// Move past the next slot without editing.
    pub fn skip_slot(&mut self) -> bool {
        let from = self.selection().end as usize;
        match skip_slot(&self.template, from) {
            Some(pos) => self.set_cursor(pos as upos_type, false),
            None => false,
        }
    }
}

impl MaskedCore {
    /// Move to the next char.
    pub fn move_right(&mut self, extend_selection: bool) -> bool {
        let c = if !extend_selection && self.has_selection() {
            self.selection().end
        } else {
            min(self.cursor + 1, self.len())
        };
        self.set_cursor(c, extend_selection)
    }

    /// Move to the previous char.
    pub fn move_left(&mut self, extend_selection: bool) -> bool {
        let c = if !extend_selection && self.has_selection() {
            self.selection().start
        } else {
            self.cursor.saturating_sub(1)
        };
        self.set_cursor(c, extend_selection)
    }

    /// Start of line
    pub fn move_to_line_start(&mut self, extend_selection: bool) -> bool {
        self.set_cursor(0, extend_selection)
    }

    /// End of line
    pub fn move_to_line_end(&mut self, extend_selection: bool) -> bool {
        self.set_cursor(self.len(), extend_selection)
    }
}
