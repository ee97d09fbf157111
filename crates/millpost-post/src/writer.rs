//! Block writer
//!
//! Joins words into output lines and numbers them. Suppressed words arrive as
//! `None` and are dropped; a block whose words are all suppressed is not
//! written at all. Comment lines are never numbered.
//!
//! Output is plain ASCII, one block per line. Comment text is reduced to
//! printable ASCII on a single line so it cannot close the comment early or
//! spill onto a line of its own.

use millpost_settings::OutputSettings;

/// Wrap a literal word for [`BlockWriter::block`]
pub fn word(text: impl Into<String>) -> Option<String> {
    Some(text.into())
}

/// N-word counter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceCounter {
    next: u64,
    increment: u64,
}

impl SequenceCounter {
    /// Counter starting at `start`
    pub fn new(start: u32, increment: u32) -> Self {
        Self {
            next: u64::from(start),
            increment: u64::from(increment.max(1)),
        }
    }

    /// Take the next sequence number
    pub fn advance(&mut self) -> u64 {
        let current = self.next;
        self.next += self.increment;
        current
    }
}

/// Line-oriented G-code output buffer
#[derive(Debug, Clone)]
pub struct BlockWriter {
    separator: &'static str,
    sequence: Option<SequenceCounter>,
    lines: Vec<String>,
}

impl BlockWriter {
    /// Writer configured from output settings
    pub fn new(settings: &OutputSettings) -> Self {
        Self {
            separator: if settings.separate_words { " " } else { "" },
            sequence: settings.sequence_numbers.then(|| {
                SequenceCounter::new(settings.sequence_start, settings.sequence_increment)
            }),
            lines: Vec::new(),
        }
    }

    /// Write one block, returns false if every word was suppressed
    pub fn block<I>(&mut self, words: I) -> bool
    where
        I: IntoIterator<Item = Option<String>>,
    {
        let words: Vec<String> = words.into_iter().flatten().collect();
        if words.is_empty() {
            return false;
        }

        let mut line = String::new();
        if let Some(sequence) = self.sequence.as_mut() {
            line.push_str(&format!("N{}", sequence.advance()));
            line.push_str(self.separator);
        }
        line.push_str(&words.join(self.separator));
        self.lines.push(line);
        true
    }

    /// Write a parenthesised comment line
    pub fn comment(&mut self, text: &str) {
        let cleaned = comment_text(text);
        if !cleaned.is_empty() {
            self.lines.push(format!("({})", cleaned));
        }
    }

    /// Lines written so far
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Program text, one line per block, newline terminated
    pub fn program(&self) -> String {
        let mut text = self.lines.join("\n");
        if !text.is_empty() {
            text.push('\n');
        }
        text
    }
}

/// Printable ASCII comment body: control characters become spaces, other
/// non-ASCII characters and parentheses are dropped, whitespace runs collapse
fn comment_text(text: &str) -> String {
    let printable: String = text
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .filter(|c| c.is_ascii() && !matches!(c, '(' | ')'))
        .collect();
    printable.split_whitespace().collect::<Vec<_>>().join(" ")
}
