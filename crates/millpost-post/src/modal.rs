//! Modal output state
//!
//! G-code words are modal: once `X10` or `F800` has been sent the controller
//! keeps it until it changes. These types remember what was last emitted and
//! return `None` when a word would only repeat it. Comparison is done on the
//! formatted text, so two values that round to the same output are equal.

use crate::format::NumberFormat;

/// Modal output variable for one word letter (X, Y, Z, F, S, P)
#[derive(Debug, Clone)]
pub struct Variable {
    prefix: char,
    format: NumberFormat,
    force: bool,
    last: Option<String>,
}

impl Variable {
    /// Suppressing variable
    pub fn new(prefix: char, format: NumberFormat) -> Self {
        Self {
            prefix,
            format,
            force: false,
            last: None,
        }
    }

    /// Variable that emits on every call
    pub fn forced(prefix: char, format: NumberFormat) -> Self {
        Self {
            force: true,
            ..Self::new(prefix, format)
        }
    }

    /// Format `value`, or `None` when it equals the last emitted value
    pub fn format(&mut self, value: f64) -> Option<String> {
        let text = self.format.format(value);
        if !self.force && self.last.as_deref() == Some(text.as_str()) {
            return None;
        }
        let word = format!("{}{}", self.prefix, text);
        self.last = Some(text);
        Some(word)
    }

    /// Forget the last value so the next `format` emits
    pub fn reset(&mut self) {
        self.last = None;
    }
}

/// Output variable compared against a caller-supplied reference
///
/// Used for arc centre offsets, which are relative to the arc start and so
/// have no meaningful "previous value". The word is suppressed only when it
/// equals the reference (and the variable is not forced).
#[derive(Debug, Clone)]
pub struct ReferenceVariable {
    prefix: char,
    format: NumberFormat,
    force: bool,
}

impl ReferenceVariable {
    /// Reference variable suppressed when equal to its reference
    pub fn new(prefix: char, format: NumberFormat) -> Self {
        Self {
            prefix,
            format,
            force: false,
        }
    }

    /// Reference variable that always emits
    pub fn forced(prefix: char, format: NumberFormat) -> Self {
        Self {
            force: true,
            ..Self::new(prefix, format)
        }
    }

    /// Format `value` unless it equals `reference`
    pub fn format(&self, value: f64, reference: f64) -> Option<String> {
        let text = self.format.format(value);
        if !self.force && text == self.format.format(reference) {
            return None;
        }
        Some(format!("{}{}", self.prefix, text))
    }
}

/// Mutually exclusive command group (motion, distance mode, units, plane)
#[derive(Debug, Clone)]
pub struct ModalGroup {
    letter: char,
    active: Option<u8>,
}

impl ModalGroup {
    /// Group of `letter` codes (G for all groups used here)
    pub fn new(letter: char) -> Self {
        Self {
            letter,
            active: None,
        }
    }

    /// Emit `code` if it is not the active code of this group
    pub fn format(&mut self, code: u8) -> Option<String> {
        if self.active == Some(code) {
            return None;
        }
        self.active = Some(code);
        Some(format!("{}{}", self.letter, code))
    }

    /// Forget the active code so the next `format` emits
    pub fn reset(&mut self) {
        self.active = None;
    }
}
