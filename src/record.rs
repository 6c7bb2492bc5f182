//! Output records and their CSV rendering.

use crate::offset::SymbolicOffset;
use std::fmt;

/// `message_name,type_value,resolved_value`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRecord {
    pub message: String,
    /// Type expression as written, e.g. `PERM|NODE|2`.
    pub value: String,
    pub resolved: u128,
}

/// `message_name,offset,field_name,size`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRecord {
    pub message: String,
    /// Offset before this field.
    pub offset: SymbolicOffset,
    pub field: String,
    /// Size token as written: a byte count or an expression like `num*2`.
    pub size: String,
    pub alignment: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    Type(TypeRecord),
    Field(FieldRecord),
}

impl fmt::Display for TypeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.message, self.value, self.resolved)
    }
}

impl fmt::Display for FieldRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.message, self.offset, self.field, self.size)
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Record::Type(t) => t.fmt(f),
            Record::Field(fr) => fr.fmt(f),
        }
    }
}
