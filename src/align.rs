//! Alignment inference for message fields.
//!
//! The expected alignment of a field is guessed from its name, the message it
//! belongs to and its size. A handful of named exceptions come first, in this
//! order (first match wins):
//!
//! - padding (`pad*`) has no alignment requirement;
//! - `channel-id` is 8 bytes but aligned on 4;
//! - `node_announcement.ipv6` is 16 bytes but aligned on 4 (it lines up an IPv4 address);
//! - `node_announcement.alias` is a string;
//! - signatures have no alignment requirement.
//!
//! Everything else aligns on the largest of 8, 4, 2, 1 dividing its size. For
//! variable sizes like `num*33` the per-unit size after `*` is used.

use crate::masks::parse_size;

/// One entry of the exception table.
struct AlignRule {
    applies: fn(message: &str, field: &str) -> bool,
    alignment: u64,
}

const RULES: &[AlignRule] = &[
    AlignRule { applies: is_padding, alignment: 1 },
    AlignRule { applies: is_channel_id, alignment: 4 },
    AlignRule { applies: is_node_ipv6, alignment: 4 },
    AlignRule { applies: is_node_alias, alignment: 1 },
    AlignRule { applies: is_signature, alignment: 1 },
];

fn is_padding(_message: &str, field: &str) -> bool {
    field.starts_with("pad")
}

fn is_channel_id(_message: &str, field: &str) -> bool {
    field == "channel-id"
}

fn is_node_ipv6(message: &str, field: &str) -> bool {
    message == "node_announcement" && field == "ipv6"
}

fn is_node_alias(message: &str, field: &str) -> bool {
    message == "node_announcement" && field == "alias"
}

fn is_signature(_message: &str, field: &str) -> bool {
    field.contains("signature")
}

/// Expected alignment (1, 2, 4 or 8) of `field` with size token `size` in `message`.
pub fn guess_alignment(message: &str, field: &str, size: &str) -> u64 {
    if let Some(rule) = RULES.iter().find(|r| (r.applies)(message, field)) {
        return rule.alignment;
    }
    alignment_for_size(unit_size(size))
}

/// Size used for alignment: the plain size, else the `*N` per-unit factor, else 1.
fn unit_size(size: &str) -> u128 {
    if let Some(Ok(n)) = parse_size(size) {
        return n;
    }
    let digits = match size.rfind('*') {
        Some(star) => &size[star + 1..],
        None => return 1,
    };
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return 1;
    }
    // A bare trailing `*` or a factor too large for u128 says nothing useful.
    digits.parse().unwrap_or(1)
}

fn alignment_for_size(size: u128) -> u64 {
    [8u64, 4, 2]
        .into_iter()
        .find(|&a| size % u128::from(a) == 0)
        .unwrap_or(1)
}
