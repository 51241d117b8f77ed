#![doc = include_str!("../readme.md")]
#![allow(clippy::uninlined_format_args)]
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod clipboard;
pub mod free_text;
pub mod mask_op;
pub mod mask_template;
pub mod masked_core;
pub mod masked_field;
pub mod registry;

pub use mask_template::{MaskPart, MaskTemplate, PLACEHOLDER};
pub use registry::{MaskId, MaskRegistry};

pub mod event {
    //!
    //! Event-handler traits and the outcome of masked editing.
    //!

    pub use rat_event::*;

    /// Result of event handling.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
    pub enum TextOutcome {
        /// The given event has not been used at all.
        Continue,
        /// The event has been recognized, but the result was nil.
        /// Further processing for this event may stop.
        ///
        /// Rejected edits (mask full, nothing to paste) and
        /// suppressed keys end up here.
        Unchanged,
        /// The event has been recognized and there is some change
        /// due to it. Only the caret or the selection moved.
        Changed,
        /// Text content has changed.
        TextChanged,
    }

    impl ConsumedEvent for TextOutcome {
        fn is_consumed(&self) -> bool {
            *self != TextOutcome::Continue
        }
    }

    // Navigation results.
    impl From<bool> for TextOutcome {
        fn from(value: bool) -> Self {
            if value {
                TextOutcome::Changed
            } else {
                TextOutcome::Unchanged
            }
        }
    }

    impl From<Outcome> for TextOutcome {
        fn from(value: Outcome) -> Self {
            match value {
                Outcome::Continue => TextOutcome::Continue,
                Outcome::Unchanged => TextOutcome::Unchanged,
                Outcome::Changed => TextOutcome::Changed,
            }
        }
    }

    impl From<TextOutcome> for Outcome {
        fn from(value: TextOutcome) -> Self {
            match value {
                TextOutcome::Continue => Outcome::Continue,
                TextOutcome::Unchanged => Outcome::Unchanged,
                TextOutcome::Changed => Outcome::Changed,
                TextOutcome::TextChanged => Outcome::Changed,
            }
        }
    }
}

pub mod core {
    //!
    //! Core structs for masked editing.
    //! Used to implement the field adapter.
    //!

    pub use crate::mask_op::{
        Caret, DeleteDirection, EditKind, EditRequest, EditResult, Edited, Rejection,
    };
    pub use crate::masked_core::MaskedCore;
}

/// Configuration errors.
///
/// Rejected edits are not errors, see [mask_op::Rejection].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaskError {
    /// The mask id is not registered.
    UnknownTemplate(MaskId),
    /// A free-text placeholder and a mask were requested for the
    /// same field.
    ConflictingConfiguration,
    /// The template string doesn't describe a usable mask.
    InvalidTemplate(String),
    /// Text doesn't conform to the active template.
    InvalidText(String),
    /// The free-text filter pattern doesn't compile.
    InvalidRegex(String),
    /// Clipboard error occurred.
    Clipboard,
}

impl Display for MaskError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl Error for MaskError {}

/// Column type.
#[allow(non_camel_case_types)]
pub type upos_type = u32;
