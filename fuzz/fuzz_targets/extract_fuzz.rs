//! Extractor fuzz target: feed arbitrary text to the layout extractor with every
//! output enabled. It must not panic; it should return Ok(records) or Err(ExtractError).
//! Build with: cargo fuzz run extract_fuzz (requires nightly and cargo fuzz).

#![cfg_attr(fuzzing, no_main)]

#[cfg(fuzzing)]
use libfuzzer_sys::fuzz_target;

#[cfg(fuzzing)]
fuzz_target!(|data: &[u8]| {
    let s = match std::str::from_utf8(data) {
        Ok(x) => x,
        Err(_) => return,
    };
    let options = specformats::Options {
        message_types: true,
        message_fields: true,
        check_alignment: true,
    };
    let _ = specformats::extract(s, options);
});

#[cfg(not(fuzzing))]
fn main() {
    eprintln!("Build with: cargo fuzz run extract_fuzz");
}
