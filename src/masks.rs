//! Named bitmask constants and evaluation of `A|B|3` type expressions.

use crate::error::ExtractError;
use std::collections::HashMap;

/// Mask name to value, filled from `* 0x<hex> (<NAME>): ...` lines.
#[derive(Debug, Clone, Default)]
pub struct MaskTable {
    masks: HashMap<String, u128>,
}

impl MaskTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `name` with the hexadecimal digits `hex` (no `0x` prefix).
    pub fn declare(&mut self, line: usize, name: &str, hex: &str) -> Result<u128, ExtractError> {
        if self.masks.contains_key(name) {
            return Err(ExtractError::DuplicateMask {
                line,
                name: name.to_string(),
            });
        }
        let value = u128::from_str_radix(hex, 16).map_err(|_| ExtractError::NumberOutOfRange {
            line,
            text: format!("0x{}", hex),
        })?;
        self.masks.insert(name.to_string(), value);
        Ok(value)
    }

    /// Value of the mask called `name`.
    pub fn get(&self, name: &str) -> Option<u128> {
        self.masks.get(name).copied()
    }

    /// Number of masks declared so far.
    pub fn len(&self) -> usize {
        self.masks.len()
    }

    /// True until the first mask is declared.
    pub fn is_empty(&self) -> bool {
        self.masks.is_empty()
    }

    /// Sum the `|`-separated tokens of `expr`: mask names by their value, decimal integers as-is.
    pub fn evaluate(&self, line: usize, expr: &str) -> Result<u128, ExtractError> {
        let mut total: u128 = 0;
        for token in expr.split('|') {
            let value = match self.get(token) {
                Some(v) => v,
                None => parse_decimal(token)
                    .ok_or_else(|| ExtractError::UnknownMask {
                        line,
                        token: token.to_string(),
                        expr: expr.to_string(),
                    })?
                    .map_err(|_| ExtractError::NumberOutOfRange {
                        line,
                        text: token.to_string(),
                    })?,
            };
            total = total
                .checked_add(value)
                .ok_or_else(|| ExtractError::NumberOutOfRange {
                    line,
                    text: expr.to_string(),
                })?;
        }
        Ok(total)
    }
}

/// `None` if `s` is not a run of ASCII digits, `Some(Err)` if the digits overflow `u128`.
pub(crate) fn parse_decimal(s: &str) -> Option<Result<u128, std::num::ParseIntError>> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(s.parse())
}

/// A fixed field size: decimal digits with at most one leading `+`.
/// Negative sizes stay symbolic so the fixed offset never shrinks.
pub(crate) fn parse_size(s: &str) -> Option<Result<u128, std::num::ParseIntError>> {
    parse_decimal(s.strip_prefix('+').unwrap_or(s))
}
