//!
//! Clipboard access for the masked field.
//!
//! The field only talks to the [Clipboard] trait. Connect it to a
//! system clipboard crate of your choice, or use the
//! [LocalClipboard] that copies within the application.
//!
//! Each thread has a default clipboard. Fields created without an
//! explicit clipboard use it, and [set_default_clipboard] swaps the
//! implementation for all of them at once.
//!

use crate::MaskError;
use dyn_clone::{DynClone, clone_box};
use std::cell::RefCell;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::rc::Rc;

#[derive(Debug)]
pub struct ClipboardError;

impl Display for ClipboardError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl Error for ClipboardError {}

impl From<ClipboardError> for MaskError {
    fn from(_value: ClipboardError) -> Self {
        MaskError::Clipboard
    }
}

/// Access some clipboard.
pub trait Clipboard: DynClone + Debug {
    /// Get text from the clipboard.
    fn get_string(&self) -> Result<String, ClipboardError>;

    /// Set text to the clipboard.
    fn set_string(&self, s: &str) -> Result<(), ClipboardError>;
}

thread_local! {
    static DEFAULT_CLIPBOARD: SharedClipboard = SharedClipboard::default();
}

/// Handle to the default clipboard of this thread.
pub fn default_clipboard() -> Box<dyn Clipboard> {
    Box::new(DEFAULT_CLIPBOARD.with(|v| v.clone()))
}

/// Replace the default clipboard of this thread.
///
/// Handles obtained earlier with [default_clipboard] use the
/// new clipboard too.
pub fn set_default_clipboard(clipboard: impl Clipboard + 'static) {
    DEFAULT_CLIPBOARD.with(|v| v.replace(clipboard));
}

/// Clipboard behind a shared slot that can be replaced later.
#[derive(Debug, Clone)]
struct SharedClipboard {
    clip: Rc<RefCell<Box<dyn Clipboard>>>,
}

impl Default for SharedClipboard {
    fn default() -> Self {
        Self {
            clip: Rc::new(RefCell::new(Box::new(LocalClipboard::new()))),
        }
    }
}

impl SharedClipboard {
    fn replace(&self, clipboard: impl Clipboard + 'static) {
        *self.clip.borrow_mut() = Box::new(clipboard);
    }
}

impl Clipboard for SharedClipboard {
    fn get_string(&self) -> Result<String, ClipboardError> {
        let clip = self.clip.try_borrow().map_err(|_| ClipboardError)?;
        clip.get_string()
    }

    fn set_string(&self, s: &str) -> Result<(), ClipboardError> {
        let clip = self.clip.try_borrow().map_err(|_| ClipboardError)?;
        clip.set_string(s)
    }
}

/// Local clipboard.
///
/// Clones share the same text.
#[derive(Debug, Default, Clone)]
pub struct LocalClipboard {
    text: Rc<RefCell<String>>,
}

impl LocalClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clipboard for LocalClipboard {
    fn get_string(&self) -> Result<String, ClipboardError> {
        match self.text.try_borrow() {
            Ok(v) => Ok(v.clone()),
            Err(_) => Err(ClipboardError),
        }
    }

    fn set_string(&self, s: &str) -> Result<(), ClipboardError> {
        match self.text.try_borrow_mut() {
            Ok(mut v) => {
                *v = s.to_string();
                Ok(())
            }
            Err(_) => Err(ClipboardError),
        }
    }
}

impl Clone for Box<dyn Clipboard> {
    fn clone(&self) -> Self {
        clone_box(self.as_ref())
    }
}
