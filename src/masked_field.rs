//!
//! State of a single input field, either masked or free-text.
//!
//! With a mask set, the field accepts digits only. Backspace and
//! Delete remove digits, Space skips a slot and pasted text
//! contributes its digits. Other keys are swallowed, with the
//! exception of Tab, BackTab, Enter and Esc which are left to the
//! host.
//!
//! Without a mask the field is a plain single-line input. A regex
//! can be set to veto input. A placeholder text can be set that is
//! displayed while the field is empty.
//!
//! A mask and a placeholder text exclude each other.
//!
//! ```
//! use rat_mask::MaskId;
//! use rat_mask::masked_field::MaskedFieldState;
//!
//! let mut state = MaskedFieldState::new()
//!     .with_mask(MaskId::Date)
//!     .expect("registered");
//! state.paste_str("24.12.2024");
//! assert_eq!(state.text(), "24/12/2024");
//! ```
//!
//! Keys are processed with [handle_events] or the [HandleEvent]
//! impl, and only if the field has the focus.
//!

use crate::clipboard::{Clipboard, default_clipboard};
use crate::event::TextOutcome;
use crate::free_text::{FreeTextCore, RegexGate};
use crate::masked_core::MaskedCore;
use crate::registry::{MaskId, MaskRegistry};
use crate::{MaskError, upos_type};
use log::{debug, warn};
use rat_event::{HandleEvent, Regular, ct_event};
use ratatui_crossterm::crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind};
use std::ops::Range;
use std::rc::Rc;

/// Field state.
#[derive(Debug, Clone)]
pub struct MaskedFieldState {
    registry: Rc<MaskRegistry>,
    mask_id: MaskId,
    /// Active when a mask is set.
    masked: Option<MaskedCore>,
    /// Active without a mask.
    free: FreeTextCore,
    placeholder: Option<String>,
    gate: Option<RegexGate>,
    clip: Option<Box<dyn Clipboard>>,
    focused: bool,
}

impl Default for MaskedFieldState {
    fn default() -> Self {
        Self {
            registry: Rc::new(MaskRegistry::builtin()),
            mask_id: Default::default(),
            masked: None,
            free: Default::default(),
            placeholder: None,
            gate: None,
            clip: Some(default_clipboard()),
            focused: false,
        }
    }
}

impl MaskedFieldState {
    /// Free-text field with the builtin registry and the
    /// default clipboard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different registry. Call this before setting a mask.
    pub fn with_registry(mut self, registry: Rc<MaskRegistry>) -> Self {
        self.set_registry(registry);
        self
    }

    pub fn with_mask(mut self, id: MaskId) -> Result<Self, MaskError> {
        self.set_mask(id)?;
        Ok(self)
    }

    pub fn with_placeholder(mut self, placeholder: &str) -> Result<Self, MaskError> {
        self.set_placeholder(placeholder)?;
        Ok(self)
    }

    pub fn with_regex(mut self, pattern: &str) -> Result<Self, MaskError> {
        self.set_regex(pattern)?;
        Ok(self)
    }

    pub fn with_clipboard(mut self, clip: impl Clipboard + 'static) -> Self {
        self.clip = Some(Box::new(clip));
        self
    }
}

impl MaskedFieldState {
    /// Replace the registry.
    ///
    /// The field goes back to free-text mode, as the mask id
    /// may mean something else now.
    pub fn set_registry(&mut self, registry: Rc<MaskRegistry>) {
        self.registry = registry;
        self.mask_id = MaskId::None;
        self.masked = None;
    }

    pub fn registry(&self) -> &Rc<MaskRegistry> {
        &self.registry
    }

    /// Set the mask.
    ///
    /// The value is reset to the empty template.
    /// [MaskId::None] removes the mask and switches to free-text mode.
    ///
    /// Fails if a placeholder text is set or if the id is not
    /// registered. The field is unchanged in that case.
    pub fn set_mask(&mut self, id: MaskId) -> Result<(), MaskError> {
        if id == MaskId::None {
            self.mask_id = MaskId::None;
            self.masked = None;
            self.free.clear();
            return Ok(());
        }
        if self.placeholder.is_some() {
            warn!("mask {} conflicts with the placeholder text", id);
            return Err(MaskError::ConflictingConfiguration);
        }

        let template = match self.registry.lookup(id) {
            Ok(v) => v.clone(),
            Err(e) => {
                warn!("mask {} not registered", id);
                return Err(e);
            }
        };
        debug!("set mask {} {:?}", id, template);
        self.mask_id = id;
        self.masked = Some(MaskedCore::new(template));
        Ok(())
    }

    #[inline]
    pub fn mask_id(&self) -> MaskId {
        self.mask_id
    }

    #[inline]
    pub fn is_masked(&self) -> bool {
        self.masked.is_some()
    }

    /// Set the text displayed while the field is empty.
    /// An empty string removes it.
    ///
    /// Fails if a mask is set.
    pub fn set_placeholder(&mut self, placeholder: &str) -> Result<(), MaskError> {
        if placeholder.is_empty() {
            self.placeholder = None;
            return Ok(());
        }
        if self.is_masked() {
            warn!("placeholder text conflicts with mask {}", self.mask_id);
            return Err(MaskError::ConflictingConfiguration);
        }
        self.placeholder = Some(placeholder.to_string());
        Ok(())
    }

    pub fn placeholder(&self) -> Option<&str> {
        self.placeholder.as_deref()
    }

    /// Set the regex that vetoes free-text input.
    /// An empty pattern removes it.
    pub fn set_regex(&mut self, pattern: &str) -> Result<(), MaskError> {
        if pattern.is_empty() {
            self.gate = None;
            return Ok(());
        }
        match RegexGate::new(pattern) {
            Ok(v) => {
                self.gate = Some(v);
                Ok(())
            }
            Err(e) => {
                warn!("regex {:?}: {}", pattern, e);
                Err(e)
            }
        }
    }

    pub fn regex(&self) -> Option<&str> {
        self.gate.as_ref().map(|v| v.pattern())
    }

    /// Clipboard used. None disables the clipboard.
    pub fn set_clipboard(&mut self, clip: Option<impl Clipboard + 'static>) {
        match clip {
            None => self.clip = None,
            Some(v) => self.clip = Some(Box::new(v)),
        }
    }

    pub fn clipboard(&self) -> Option<&dyn Clipboard> {
        self.clip.as_deref()
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    #[inline]
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Core of the masked mode.
    pub fn masked_core(&self) -> Option<&MaskedCore> {
        self.masked.as_ref()
    }

    /// Core of the free-text mode.
    pub fn free_core(&self) -> &FreeTextCore {
        &self.free
    }
}

impl MaskedFieldState {
    /// Current value. Empty slots show the placeholder char.
    pub fn text(&self) -> String {
        match &self.masked {
            Some(core) => core.text().to_string(),
            None => self.free.text(),
        }
    }

    /// Text to render. This is the placeholder text for an
    /// empty free-text field.
    pub fn display_text(&self) -> String {
        match (&self.masked, &self.placeholder) {
            (None, Some(placeholder)) if self.free.is_empty() => placeholder.clone(),
            _ => self.text(),
        }
    }

    /// Set the value.
    ///
    /// For a masked field the text must conform to the template,
    /// and an empty string resets it. The regex is not applied.
    pub fn set_text(&mut self, s: &str) -> Result<(), MaskError> {
        match &mut self.masked {
            Some(core) => core.set_text(s),
            None => {
                self.free.set_text(s);
                Ok(())
            }
        }
    }

    /// Digits of the masked value. The plain text otherwise.
    pub fn value(&self) -> String {
        match &self.masked {
            Some(core) => core.digits(),
            None => self.free.text(),
        }
    }

    /// All slots filled. Always true in free-text mode.
    pub fn is_complete(&self) -> bool {
        match &self.masked {
            Some(core) => core.is_complete(),
            None => true,
        }
    }

    pub fn is_empty(&self) -> bool {
        match &self.masked {
            Some(core) => core.is_empty(),
            None => self.free.is_empty(),
        }
    }

    /// Reset to the empty template or the empty string.
    pub fn clear(&mut self) -> bool {
        match &mut self.masked {
            Some(core) => {
                let was_empty = core.is_empty() && core.cursor() == 0;
                core.clear();
                !was_empty
            }
            None => self.free.clear(),
        }
    }

    pub fn cursor(&self) -> upos_type {
        match &self.masked {
            Some(core) => core.cursor(),
            None => self.free.cursor(),
        }
    }

    pub fn set_cursor(&mut self, cursor: upos_type, extend_selection: bool) -> bool {
        match &mut self.masked {
            Some(core) => core.set_cursor(cursor, extend_selection),
            None => self.free.set_cursor(cursor, extend_selection),
        }
    }

    pub fn selection(&self) -> Range<upos_type> {
        match &self.masked {
            Some(core) => core.selection(),
            None => self.free.selection(),
        }
    }

    pub fn set_selection(&mut self, anchor: upos_type, cursor: upos_type) -> bool {
        match &mut self.masked {
            Some(core) => core.set_selection(anchor, cursor),
            None => self.free.set_selection(anchor, cursor),
        }
    }

    pub fn has_selection(&self) -> bool {
        match &self.masked {
            Some(core) => core.has_selection(),
            None => self.free.has_selection(),
        }
    }

    pub fn select_all(&mut self) -> bool {
        match &mut self.masked {
            Some(core) => core.select_all(),
            None => self.free.select_all(),
        }
    }

    /// Selection as copied to the clipboard. Empty slots
    /// become spaces.
    pub fn selected_text(&self) -> String {
        match &self.masked {
            Some(core) => core.selected_text(),
            None => self.free.selected_text(),
        }
    }
}

impl MaskedFieldState {
    /// Typed char.
    ///
    /// Masked: digits are inserted, Space skips to the next slot,
    /// everything else is ignored.
    /// Free-text: inserted unless the regex vetoes it.
    pub fn insert_char(&mut self, c: char) -> TextOutcome {
        match &mut self.masked {
            Some(core) => {
                if c == ' ' {
                    core.skip_slot().into()
                } else {
                    core.insert_char(c)
                }
            }
            None => tc(self.insert_free(&c.to_string())),
        }
    }

    /// Pasted text.
    ///
    /// Masked: only the digits are used.
    /// Free-text: inserted unless the regex vetoes it.
    pub fn paste_str(&mut self, s: &str) -> TextOutcome {
        match &mut self.masked {
            Some(core) => core.paste(s),
            None => tc(self.insert_free(s)),
        }
    }

    fn insert_free(&mut self, s: &str) -> bool {
        if let Some(gate) = &self.gate {
            if gate.rejects(self.free.rope(), s) {
                return false;
            }
        }
        self.free.insert_str(s)
    }

    /// Backspace
    ///
    /// Over an empty slot this only moves the cursor.
    pub fn delete_prev_char(&mut self) -> TextOutcome {
        match &mut self.masked {
            Some(core) => core.remove_prev(),
            None => tc(self.free.remove_prev()),
        }
    }

    /// Delete
    pub fn delete_next_char(&mut self) -> TextOutcome {
        match &mut self.masked {
            Some(core) => core.remove_next(),
            None => tc(self.free.remove_next()),
        }
    }

    pub fn move_left(&mut self, extend_selection: bool) -> bool {
        match &mut self.masked {
            Some(core) => core.move_left(extend_selection),
            None => self.free.move_left(extend_selection),
        }
    }

    pub fn move_right(&mut self, extend_selection: bool) -> bool {
        match &mut self.masked {
            Some(core) => core.move_right(extend_selection),
            None => self.free.move_right(extend_selection),
        }
    }

    pub fn move_to_line_start(&mut self, extend_selection: bool) -> bool {
        match &mut self.masked {
            Some(core) => core.move_to_line_start(extend_selection),
            None => self.free.move_to_line_start(extend_selection),
        }
    }

    pub fn move_to_line_end(&mut self, extend_selection: bool) -> bool {
        match &mut self.masked {
            Some(core) => core.move_to_line_end(extend_selection),
            None => self.free.move_to_line_end(extend_selection),
        }
    }
}

impl MaskedFieldState {
    /// Copy the selection to the clipboard.
    pub fn copy_to_clip(&mut self) -> bool {
        let Some(clip) = &self.clip else {
            return false;
        };
        if !self.has_selection() {
            return false;
        }

        match clip.set_string(&self.selected_text()) {
            Ok(_) => true,
            Err(e) => {
                warn!("copy: {}", e);
                false
            }
        }
    }

    /// Copy the selection to the clipboard and remove it.
    ///
    /// A masked selection without any slot can't be removed and
    /// is not copied either.
    pub fn cut_to_clip(&mut self) -> TextOutcome {
        if let Some(core) = &self.masked {
            let sel = core.selection();
            let slots = core
                .template()
                .slot_range(sel.start as usize..sel.end as usize);
            if slots.is_empty() {
                return TextOutcome::Unchanged;
            }
        }
        if !self.copy_to_clip() {
            return TextOutcome::Unchanged;
        }
        self.delete_prev_char()
    }

    /// Paste from the clipboard.
    pub fn paste_from_clip(&mut self) -> TextOutcome {
        let Some(clip) = &self.clip else {
            return TextOutcome::Unchanged;
        };

        match clip.get_string() {
            Ok(text) => self.paste_str(&text),
            Err(e) => {
                warn!("paste: {}", e);
                TextOutcome::Unchanged
            }
        }
    }
}

impl HandleEvent<Event, Regular, TextOutcome> for MaskedFieldState {
    fn handle(&mut self, event: &Event, _keymap: Regular) -> TextOutcome {
        if !self.is_focused() {
            return TextOutcome::Continue;
        }

        match event {
            ct_event!(key press c) | ct_event!(key press SHIFT-c) => self.insert_char(*c),
            ct_event!(keycode press Backspace) => self.delete_prev_char(),
            ct_event!(keycode press Delete) => self.delete_next_char(),
            ct_event!(key press CONTROL-'a') => self.select_all().into(),
            ct_event!(key press CONTROL-'c') => self.copy_to_clip().into(),
            ct_event!(key press CONTROL-'x') => self.cut_to_clip(),
            ct_event!(key press CONTROL-'v') => self.paste_from_clip(),
            ct_event!(paste v) => self.paste_str(v),
            // no undo
            ct_event!(key press CONTROL-'z') | ct_event!(key press CONTROL_SHIFT-'Z') => {
                TextOutcome::Unchanged
            }

            ct_event!(keycode press Left) => self.move_left(false).into(),
            ct_event!(keycode press Right) => self.move_right(false).into(),
            ct_event!(keycode press Home) => self.move_to_line_start(false).into(),
            ct_event!(keycode press End) => self.move_to_line_end(false).into(),
            ct_event!(keycode press SHIFT-Left) => self.move_left(true).into(),
            ct_event!(keycode press SHIFT-Right) => self.move_right(true).into(),
            ct_event!(keycode press SHIFT-Home) => self.move_to_line_start(true).into(),
            ct_event!(keycode press SHIFT-End) => self.move_to_line_end(true).into(),

            Event::Key(KeyEvent {
                code: KeyCode::Tab | KeyCode::BackTab | KeyCode::Enter | KeyCode::Esc,
                ..
            }) => TextOutcome::Continue,
            Event::Key(KeyEvent {
                kind: KeyEventKind::Release,
                ..
            }) => TextOutcome::Unchanged,
            Event::Key(_) if self.is_masked() => TextOutcome::Unchanged,

            _ => TextOutcome::Continue,
        }
    }
}

// small helper ...
fn tc(r: bool) -> TextOutcome {
    if r {
        TextOutcome::TextChanged
    } else {
        TextOutcome::Unchanged
    }
}

/// Handle all events.
/// Keys are only processed if focus is true.
pub fn handle_events(state: &mut MaskedFieldState, focus: bool, event: &Event) -> TextOutcome {
    state.set_focused(focus);
    state.handle(event, Regular)
}
