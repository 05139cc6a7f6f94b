use std::fmt;
use std::sync::Arc;

/// An immutable, shared biological sequence.
///
/// Positions are 1-based throughout this crate, following the convention
/// of variant notation. Cloning is cheap: all clones share one underlying
/// symbol buffer, so any number of haplotypes and variations can be bound
/// to the same reference without copying it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sequence {
    symbols: Arc<Vec<char>>,
}

impl Sequence {
    pub fn new(text: &str) -> Self {
        Self {
            symbols: Arc::new(text.chars().collect()),
        }
    }

    pub fn from_symbols(symbols: Vec<char>) -> Self {
        Self {
            symbols: Arc::new(symbols),
        }
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// The symbol at 1-based position `pos`, or `None` if out of range.
    pub fn get(&self, pos: usize) -> Option<char> {
        if pos == 0 {
            None
        } else {
            self.symbols.get(pos - 1).copied()
        }
    }

    /// The inclusive 1-based slice `[start, stop]`, or `None` if the
    /// bounds are out of range or reversed.
    pub fn slice(&self, start: usize, stop: usize) -> Option<Vec<char>> {
        if start == 0 || stop < start || stop > self.len() {
            None
        } else {
            Some(self.symbols[start - 1..stop].to_vec())
        }
    }

    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }

    /// `true` if `other` is usable as the same reference as `self`.
    ///
    /// Handles sharing one buffer compare by pointer; otherwise the
    /// symbol contents decide.
    pub fn same_reference(&self, other: &Sequence) -> bool {
        Arc::ptr_eq(&self.symbols, &other.symbols) || self.symbols == other.symbols
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self.symbols.iter() {
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

impl From<&str> for Sequence {
    fn from(text: &str) -> Self {
        Sequence::new(text)
    }
}
