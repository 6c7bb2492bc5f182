//! # specformats — message layouts from protocol specifications
//!
//! Extracts binary message layouts from protocol specification documents
//! written in a line-oriented markdown dialect, and renders them as CSV.
//!
//! ## Document format
//!
//! Only four line shapes are recognized; everything else is prose.
//!
//! - **Mask**: `* 0x<hex> (<NAME>): <description>` declares a named constant.
//! - **Type header**: ``1. type: <expr> (`<message>`)`` opens a message;
//!   `<expr>` combines masks and integers with `|`.
//! - **Data marker**: `2. data:` starts the field list of the open message.
//! - **Field**: `    * [<size>:<name>]` (indented). The size is a byte count or
//!   an expression such as `len` or `num_keys*33`.
//!
//! A message ends at the first line that is not a field.
//!
//! ## Example
//!
//! ```text
//! 1. type: 17 (`error`)
//! 2. data:
//!    * [8:channel-id]
//!    * [4:len]
//!    * [len:data]
//! ```
//!
//! With field output this gives `error,0,channel-id,8`, `error,8,len,4` and
//! `error,12,data,len`. With alignment checking every field offset must be a
//! multiple of the alignment inferred by [`align::guess_alignment`].
//!
//! ## Usage
//!
//! The `extract_formats` binary wraps [`Extractor`]; see `tests/integration.rs`
//! for library use.

pub mod align;
pub mod error;
pub mod extract;
pub mod line;
pub mod masks;
pub mod offset;
pub mod record;

pub use align::guess_alignment;
pub use error::ExtractError;
pub use extract::{extract, Extractor, Options, State, Stats};
pub use line::{classify, Line};
pub use masks::MaskTable;
pub use offset::SymbolicOffset;
pub use record::{FieldRecord, Record, TypeRecord};
