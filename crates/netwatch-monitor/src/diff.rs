//! Diff engine: newly observed connections between two snapshots.

use std::collections::HashSet;

use netwatch_types::ConnectionRecord;

/// Connections in `current` whose address appears nowhere in `previous`.
///
/// Comparison is exact string equality on the address only; the result
/// preserves the order of `current`. Memory is single-step: an address that
/// disappears and returns across one poll boundary does not reappear here,
/// because only the immediately preceding snapshot is consulted.
pub fn new_connections(
    previous: &[ConnectionRecord],
    current: &[ConnectionRecord],
) -> Vec<ConnectionRecord> {
    let known: HashSet<&str> = previous.iter().map(|c| c.address.as_str()).collect();

    current
        .iter()
        .filter(|c| !known.contains(c.address.as_str()))
        .cloned()
        .collect()
}
