//! The majority predicate shared by both protocol phases.

/// Strict-majority test: `count` exceeds half of `total` (integer division).
///
/// Both phases of a round tally through this one predicate so they cannot
/// drift apart on off-by-one arithmetic.
#[must_use]
pub fn is_majority(count: usize, total: usize) -> bool {
    count > total / 2
}
