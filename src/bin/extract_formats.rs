//! Extract message types and field layouts from protocol specification documents as CSV.
//!
//! Usage:
//!   extract_formats [OPTIONS] [FILE.md ...]
//!   extract_formats [OPTIONS] < file.md
//!
//! All inputs are read as one document: line numbers and the open message carry
//! over from one file to the next. `-` reads stdin.
//!
//! Options:
//!   --message-types    Output MESSAGENAME,VALUE,RESOLVED for every message
//!   --message-fields   Output MESSAGENAME,OFFSET,FIELDNAME,SIZE for every field
//!   --check-alignment  Fail on the first field not aligned for its size
//!   --verbose, -v      Summary on stderr
//!
//! Exit code 1 on the first error, with the offending line number.

use anyhow::Context;
use clap::Parser;
use specformats::{Extractor, Options};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "extract_formats", version, about = "Extract message layouts from protocol specs as CSV")]
struct Cli {
    /// Output MESSAGENAME,VALUE,RESOLVED for every message
    #[arg(long = "message-types")]
    message_types: bool,

    /// Output MESSAGENAME,OFFSET,FIELDNAME,SIZE for every field of every message
    #[arg(long = "message-fields")]
    message_fields: bool,

    /// Check alignment for every field of each message
    #[arg(long = "check-alignment")]
    check_alignment: bool,

    /// Print a summary to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Specification files (stdin if none, or `-`)
    inputs: Vec<PathBuf>,
}

impl Cli {
    fn options(&self) -> Options {
        Options {
            message_types: self.message_types,
            message_fields: self.message_fields,
            check_alignment: self.check_alignment,
        }
    }
}

fn open(path: &Path) -> anyhow::Result<Box<dyn BufRead>> {
    if path.as_os_str() == "-" {
        return Ok(Box::new(BufReader::new(io::stdin())));
    }
    let file = File::open(path).with_context(|| format!("{}: open failed", path.display()))?;
    Ok(Box::new(BufReader::new(file)))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let inputs = if cli.inputs.is_empty() {
        vec![PathBuf::from("-")]
    } else {
        cli.inputs.clone()
    };

    let mut extractor = Extractor::new(cli.options());
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    for path in &inputs {
        let name = if path.as_os_str() == "-" {
            "<stdin>".to_string()
        } else {
            path.display().to_string()
        };
        if cli.verbose {
            eprintln!("{}: reading", name);
        }
        let reader = open(path)?;
        for line in reader.lines() {
            let line = line.with_context(|| format!("{}: read failed", name))?;
            if let Some(record) = extractor
                .process_line(&line)
                .with_context(|| name.clone())?
            {
                writeln!(out, "{}", record)?;
            }
        }
    }
    out.flush()?;

    let stats = extractor.finish();
    if cli.verbose {
        eprintln!(
            "extract: {} source(s), {} line(s), {} mask(s), {} message(s), {} field(s)",
            inputs.len(),
            stats.lines,
            stats.masks,
            stats.messages,
            stats.fields
        );
    }
    Ok(())
}
