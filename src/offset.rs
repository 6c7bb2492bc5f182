//! Byte offsets with unresolved variable-size terms.

use std::fmt;

/// Offset of a field inside a message: a fixed byte count followed by the size
/// tokens of every variable-size field before it. Terms are never evaluated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolicOffset {
    pub fixed: u128,
    pub terms: Vec<String>,
}

impl SymbolicOffset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by a fixed number of bytes. `None` on overflow.
    pub fn add_fixed(&mut self, bytes: u128) -> Option<()> {
        self.fixed = self.fixed.checked_add(bytes)?;
        Some(())
    }

    /// Advance past a field whose size is the expression `term`.
    pub fn add_term(&mut self, term: &str) {
        self.terms.push(term.to_string());
    }

    pub fn is_fixed(&self) -> bool {
        self.terms.is_empty()
    }
}

/// `16`, or `16+len+num*2` once variable-size fields were seen.
impl fmt::Display for SymbolicOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fixed)?;
        for term in &self.terms {
            write!(f, "+{}", term)?;
        }
        Ok(())
    }
}
