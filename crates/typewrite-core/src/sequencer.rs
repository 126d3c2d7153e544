//! Lazy, pull-based walk over progressive and regressive prefixes of a list
//! of strings.
//!
//! ```rust
//! use typewrite_core::{Marker, Sequencer, SequencerOptions};
//!
//! let strings = vec!["ab".to_string()];
//! let markers: Vec<Marker> = Sequencer::new(&strings, SequencerOptions::default()).collect();
//! assert_eq!(markers, vec![
//!     Marker::Fragment { text: "a".into(), index: 0 },
//!     Marker::Fragment { text: "ab".into(), index: 0 },
//!     Marker::EndOfString { index: 0 },
//! ]);
//! ```
//!
//! Prefixes step by extended grapheme cluster, so combining marks and emoji
//! sequences appear whole.

use unicode_segmentation::UnicodeSegmentation;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Marker {
    /// Current visible prefix of the string at `index`.
    Fragment { text: String, index: usize },
    /// The string at `index` is fully typed.
    EndOfString { index: usize },
    /// The string at `index` has been rewound to empty.
    EndOfRewind { index: usize },
}

impl Marker {
    pub fn index(&self) -> usize {
        match self {
            Marker::Fragment { index, .. }
            | Marker::EndOfString { index }
            | Marker::EndOfRewind { index } => *index,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SequencerOptions {
    pub rewind_on_finish: bool,
    /// Out-of-range values start at 0.
    pub start_at_index: Option<usize>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Growing(usize),
    Shrinking(usize),
}

/// Finite, non-restartable marker source. Build a new one to loop or to jump.
#[derive(Clone, Debug)]
pub struct Sequencer {
    strings: Vec<String>,
    rewind_on_finish: bool,
    index: usize,
    /// Byte offset of every grapheme boundary in the current string,
    /// `0` and `len` included.
    boundaries: Vec<usize>,
    phase: Phase,
}

impl Sequencer {
    pub fn new(strings: &[String], options: SequencerOptions) -> Self {
        let index = match options.start_at_index {
            Some(i) if i < strings.len() => i,
            Some(i) => {
                log::debug!("start index {i} out of range for {} string(s); using 0", strings.len());
                0
            }
            None => 0,
        };
        let mut seq = Self {
            strings: strings.to_vec(),
            rewind_on_finish: options.rewind_on_finish,
            index,
            boundaries: Vec::new(),
            phase: Phase::Growing(0),
        };
        seq.load_current();
        seq
    }

    /// Index of the string currently being walked. Equals the string count
    /// once exhausted.
    pub fn index(&self) -> usize {
        self.index
    }

    /// True once every string has been walked; `next` will return `None`.
    pub fn is_exhausted(&self) -> bool {
        self.index >= self.strings.len()
    }

    fn load_current(&mut self) {
        self.boundaries.clear();
        if let Some(s) = self.strings.get(self.index) {
            self.boundaries
                .extend(s.grapheme_indices(true).map(|(i, _)| i));
            self.boundaries.push(s.len());
        }
        self.phase = Phase::Growing(0);
    }

    fn prefix(&self, graphemes: usize) -> String {
        let end = self.boundaries.get(graphemes).copied().unwrap_or(0);
        self.strings[self.index][..end].to_string()
    }

    fn grapheme_count(&self) -> usize {
        self.boundaries.len().saturating_sub(1)
    }

    fn advance(&mut self) {
        self.index += 1;
        self.load_current();
    }
}

impl Iterator for Sequencer {
    type Item = Marker;

    fn next(&mut self) -> Option<Marker> {
        if self.is_exhausted() {
            return None;
        }
        let index = self.index;
        match self.phase {
            Phase::Growing(shown) if shown < self.grapheme_count() => {
                self.phase = Phase::Growing(shown + 1);
                Some(Marker::Fragment {
                    text: self.prefix(shown + 1),
                    index,
                })
            }
            Phase::Growing(shown) => {
                if self.rewind_on_finish {
                    self.phase = Phase::Shrinking(shown);
                } else {
                    self.advance();
                }
                Some(Marker::EndOfString { index })
            }
            Phase::Shrinking(shown) if shown > 0 => {
                self.phase = Phase::Shrinking(shown - 1);
                Some(Marker::Fragment {
                    text: self.prefix(shown - 1),
                    index,
                })
            }
            Phase::Shrinking(_) => {
                self.advance();
                Some(Marker::EndOfRewind { index })
            }
        }
    }
}
