//! Errors raised while extracting layouts. Every one of them ends the run.

/// Fatal extraction error; `line` is the 1-based input line number.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    #[error("{line}: duplicate mask name {name}")]
    DuplicateMask { line: usize, name: String },
    #[error("{line}: found message {found} while already in message {open}")]
    NestedMessage { line: usize, open: String, found: String },
    #[error("{line}: unknown mask {token} in type {expr}")]
    UnknownMask { line: usize, token: String, expr: String },
    #[error("{line}: message {message} field {field} offset {offset} not aligned on {alignment} boundary")]
    Misaligned {
        line: usize,
        message: String,
        field: String,
        offset: u128,
        alignment: u64,
    },
    #[error("{line}: number out of range: {text}")]
    NumberOutOfRange { line: usize, text: String },
}
