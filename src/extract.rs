//! Layout extraction: a single pass over the lines of a specification document.
//!
//! A message opens with a type header, its fields follow a `2. data:` marker,
//! and it ends at the first line that is not a field. There is no explicit end
//! marker, so the state machine below closes the message on any unexpected line:
//!
//! ```text
//! NoMessage     --type header-->   HeaderSeen
//! HeaderSeen    --2. data:-->      InDataSection
//! HeaderSeen    --anything else--> NoMessage
//! InDataSection --field-->         InDataSection
//! InDataSection --anything else--> NoMessage
//! ```
//!
//! Mask declarations are handled before any of this and never change the state.
//! A type header while a message is open is an error.

use crate::align::guess_alignment;
use crate::error::ExtractError;
use crate::line::{classify, Line};
use crate::masks::{parse_size, MaskTable};
use crate::offset::SymbolicOffset;
use crate::record::{FieldRecord, Record, TypeRecord};

/// Which records to produce and whether to check field alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Options {
    /// Emit a [`TypeRecord`] per type header.
    pub message_types: bool,
    /// Emit a [`FieldRecord`] per field.
    pub message_fields: bool,
    /// Fail on the first field whose offset is not a multiple of its alignment.
    pub check_alignment: bool,
}

/// Where the extractor is relative to the current message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum State {
    NoMessage,
    /// Type header seen, waiting for `2. data:`.
    HeaderSeen { message: String },
    InDataSection {
        message: String,
        /// Offset of the next field.
        offset: SymbolicOffset,
        /// Largest field alignment so far (1 before the first field).
        max_alignment: u64,
    },
}

impl State {
    /// Name of the open message, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            State::NoMessage => None,
            State::HeaderSeen { message } | State::InDataSection { message, .. } => {
                Some(message.as_str())
            }
        }
    }
}

/// Counters for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub lines: usize,
    pub masks: usize,
    pub messages: usize,
    pub fields: usize,
}

/// Line-at-a-time extractor. Feed lines in document order with [`Extractor::process_line`].
#[derive(Debug, Clone)]
pub struct Extractor {
    options: Options,
    masks: MaskTable,
    state: State,
    stats: Stats,
}

impl Extractor {
    pub fn new(options: Options) -> Self {
        Extractor {
            options,
            masks: MaskTable::new(),
            state: State::NoMessage,
            stats: Stats::default(),
        }
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn masks(&self) -> &MaskTable {
        &self.masks
    }

    /// Number of lines processed so far (the 1-based number of the last line).
    pub fn line_number(&self) -> usize {
        self.stats.lines
    }

    /// Process the next line. Returns the record it produced, if the options ask for one.
    pub fn process_line(&mut self, line: &str) -> Result<Option<Record>, ExtractError> {
        self.stats.lines += 1;
        let line_no = self.stats.lines;

        match classify(line) {
            Line::Mask { value, name } => {
                self.masks.declare(line_no, name, value)?;
                Ok(None)
            }
            Line::TypeHeader { value, name } => self.open_message(line_no, value, name),
            other => self.advance(line_no, other),
        }
    }

    fn open_message(
        &mut self,
        line_no: usize,
        value: &str,
        name: &str,
    ) -> Result<Option<Record>, ExtractError> {
        if let Some(open) = self.state.message() {
            return Err(ExtractError::NestedMessage {
                line: line_no,
                open: open.to_string(),
                found: name.to_string(),
            });
        }
        self.state = State::HeaderSeen {
            message: name.to_string(),
        };
        self.stats.messages += 1;
        if !self.options.message_types {
            return Ok(None);
        }
        let resolved = self.masks.evaluate(line_no, value)?;
        Ok(Some(Record::Type(TypeRecord {
            message: name.to_string(),
            value: value.to_string(),
            resolved,
        })))
    }

    /// Transition for every line that is neither a mask nor a type header.
    fn advance(&mut self, line_no: usize, line: Line<'_>) -> Result<Option<Record>, ExtractError> {
        match std::mem::replace(&mut self.state, State::NoMessage) {
            State::NoMessage => Ok(None),
            State::HeaderSeen { message } => {
                if line == Line::DataMarker {
                    self.state = State::InDataSection {
                        message,
                        offset: SymbolicOffset::new(),
                        max_alignment: 1,
                    };
                }
                Ok(None)
            }
            State::InDataSection {
                message,
                mut offset,
                max_alignment,
            } => {
                let Line::Field { size, name } = line else {
                    return Ok(None);
                };
                let alignment = guess_alignment(&message, name, size);
                if self.options.check_alignment && offset.fixed % u128::from(alignment) != 0 {
                    return Err(ExtractError::Misaligned {
                        line: line_no,
                        message,
                        field: name.to_string(),
                        offset: offset.fixed,
                        alignment,
                    });
                }
                let record = self.options.message_fields.then(|| {
                    Record::Field(FieldRecord {
                        message: message.clone(),
                        offset: offset.clone(),
                        field: name.to_string(),
                        size: size.to_string(),
                        alignment,
                    })
                });
                let out_of_range = || ExtractError::NumberOutOfRange {
                    line: line_no,
                    text: size.to_string(),
                };
                match parse_size(size) {
                    Some(Ok(bytes)) => offset.add_fixed(bytes).ok_or_else(out_of_range)?,
                    Some(Err(_)) => return Err(out_of_range()),
                    None => offset.add_term(size),
                }
                self.stats.fields += 1;
                self.state = State::InDataSection {
                    message,
                    offset,
                    max_alignment: max_alignment.max(alignment),
                };
                Ok(record)
            }
        }
    }

    /// End of input. A message still open at this point is simply dropped.
    pub fn finish(self) -> Stats {
        Stats {
            masks: self.masks.len(),
            ..self.stats
        }
    }
}

/// Run a whole in-memory document and collect the records it produces.
pub fn extract(source: &str, options: Options) -> Result<Vec<Record>, ExtractError> {
    let mut extractor = Extractor::new(options);
    let mut records = Vec::new();
    for line in source.lines() {
        if let Some(record) = extractor.process_line(line)? {
            records.push(record);
        }
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIELDS: Options = Options {
        message_types: false,
        message_fields: true,
        check_alignment: false,
    };

    fn field_lines(src: &str, options: Options) -> Vec<String> {
        extract(src, options)
            .expect("extract")
            .iter()
            .filter(|r| matches!(r, Record::Field(_)))
            .map(|r| r.to_string())
            .collect()
    }

    #[test]
    fn header_then_data_marker_opens_data_section() {
        let mut ex = Extractor::new(Options::default());
        ex.process_line("1. type: 17 (`error`)").unwrap();
        assert_eq!(ex.state(), &State::HeaderSeen { message: "error".into() });
        ex.process_line("2. data:").unwrap();
        assert_eq!(
            ex.state(),
            &State::InDataSection {
                message: "error".into(),
                offset: SymbolicOffset::new(),
                max_alignment: 1,
            }
        );
    }

    #[test]
    fn header_without_data_closes_message() {
        let mut ex = Extractor::new(FIELDS);
        ex.process_line("1. type: 19 (`ping`)").unwrap();
        ex.process_line("").unwrap();
        assert_eq!(ex.state(), &State::NoMessage);
        // A field shaped line after the message closed is ignored.
        assert_eq!(ex.process_line("    * [2:num]").unwrap(), None);
    }

    #[test]
    fn non_field_line_closes_data_section() {
        let mut ex = Extractor::new(FIELDS);
        for line in ["1. type: 17 (`error`)", "2. data:", "   * [8:channel-id]"] {
            ex.process_line(line).unwrap();
        }
        ex.process_line("For all messages:").unwrap();
        assert_eq!(ex.state(), &State::NoMessage);
    }

    #[test]
    fn mask_line_inside_data_section_keeps_offset() {
        let src = "\
1. type: 17 (`error`)
2. data:
   * [8:channel-id]
* 0x1000 (UPDATE): interleaved
   * [4:len]
";
        assert_eq!(field_lines(src, FIELDS), ["error,0,channel-id,8", "error,8,len,4"]);
    }

    #[test]
    fn mask_line_while_header_seen_keeps_header() {
        let mut ex = Extractor::new(Options::default());
        ex.process_line("1. type: 17 (`error`)").unwrap();
        ex.process_line("* 0x1000 (UPDATE): interleaved").unwrap();
        assert_eq!(ex.state(), &State::HeaderSeen { message: "error".into() });
        assert_eq!(ex.masks().get("UPDATE"), Some(0x1000));
    }

    #[test]
    fn nested_header_fails() {
        let mut ex = Extractor::new(Options::default());
        ex.process_line("1. type: 17 (`error`)").unwrap();
        let err = ex.process_line("1. type: 18 (`ping`)").unwrap_err();
        assert_eq!(
            err,
            ExtractError::NestedMessage { line: 2, open: "error".into(), found: "ping".into() }
        );
    }

    #[test]
    fn header_right_after_fields_is_nested() {
        let src = "1. type: 17 (`error`)\n2. data:\n   * [8:channel-id]\n1. type: 18 (`ping`)\n";
        assert!(matches!(
            extract(src, Options::default()),
            Err(ExtractError::NestedMessage { line: 4, .. })
        ));
    }

    #[test]
    fn max_alignment_tracks_fields() {
        let mut ex = Extractor::new(Options::default());
        for line in ["1. type: 1 (`m`)", "2. data:", "  * [2:a]", "  * [8:b]", "  * [1:c]"] {
            ex.process_line(line).unwrap();
        }
        match ex.state() {
            State::InDataSection { max_alignment, offset, .. } => {
                assert_eq!(*max_alignment, 8);
                assert_eq!(offset.fixed, 11);
            }
            other => panic!("unexpected state {:?}", other),
        }
    }

    #[test]
    fn misaligned_field_reports_position() {
        let src = "1. type: 1 (`m`)\n2. data:\n  * [1:flag]\n  * [4:count]\n";
        let options = Options { check_alignment: true, ..Options::default() };
        assert_eq!(
            extract(src, options).unwrap_err(),
            ExtractError::Misaligned {
                line: 4,
                message: "m".into(),
                field: "count".into(),
                offset: 1,
                alignment: 4,
            }
        );
    }

    #[test]
    fn alignment_ignores_symbolic_terms() {
        let src = "1. type: 1 (`m`)\n2. data:\n  * [2:len]\n  * [len:data]\n  * [2:more]\n";
        let options = Options { check_alignment: true, ..FIELDS };
        assert_eq!(
            field_lines(src, options),
            ["m,0,len,2", "m,2,data,len", "m,2+len,more,2"]
        );
    }

    #[test]
    fn type_records_only_when_requested() {
        let src = "1. type: UNKNOWN|1 (`m`)\n";
        assert!(extract(src, Options::default()).unwrap().is_empty());
        let options = Options { message_types: true, ..Options::default() };
        assert!(matches!(
            extract(src, options),
            Err(ExtractError::UnknownMask { line: 1, .. })
        ));
    }

    #[test]
    fn twenty_digit_size_fits() {
        let src = "1. type: 1 (`m`)\n2. data:\n  * [99999999999999999999:blob]\n  * [1:tail]\n";
        assert_eq!(
            field_lines(src, FIELDS),
            ["m,0,blob,99999999999999999999", "m,99999999999999999999,tail,1"]
        );
    }

    #[test]
    fn plus_signed_size_is_fixed() {
        let src = "1. type: 1 (`m`)\n2. data:\n  * [+8:a]\n  * [2:b]\n";
        let records = extract(src, FIELDS).expect("extract");
        assert_eq!(
            records.iter().map(|r| r.to_string()).collect::<Vec<_>>(),
            ["m,0,a,+8", "m,8,b,2"]
        );
        match &records[0] {
            Record::Field(f) => assert_eq!(f.alignment, 8),
            other => panic!("unexpected record {:?}", other),
        }
    }

    #[test]
    fn minus_signed_size_stays_symbolic() {
        let src = "1. type: 1 (`m`)\n2. data:\n  * [-8:a]\n  * [2:b]\n";
        assert_eq!(field_lines(src, FIELDS), ["m,0,a,-8", "m,0+-8,b,2"]);
    }

    #[test]
    fn huge_fixed_size_is_out_of_range() {
        let src = "1. type: 1 (`m`)\n2. data:\n  * [9999999999999999999999999999999999999999:blob]\n";
        assert!(matches!(
            extract(src, FIELDS),
            Err(ExtractError::NumberOutOfRange { line: 3, .. })
        ));
    }

    #[test]
    fn finish_counts() {
        let mut ex = Extractor::new(Options::default());
        let src = "* 0x2000 (NODE): x\n1. type: 1 (`a`)\n2. data:\n  * [2:x]\n  * [2:y]\n\n1. type: 2 (`b`)\n";
        for line in src.lines() {
            ex.process_line(line).unwrap();
        }
        assert_eq!(ex.line_number(), 7);
        assert_eq!(
            ex.finish(),
            Stats { lines: 7, masks: 1, messages: 2, fields: 2 }
        );
    }
}
