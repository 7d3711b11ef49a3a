// LogMerge - core/merge.rs
//
// Pairwise merging and the balanced reduction that folds N sequences into one.
//
// Every round pairs sequences by position (0 with 1, 2 with 3, ...) and
// merges each pair; an odd sequence at the end carries over untouched. The
// count roughly halves per round, so N inputs take ceil(log2 N) rounds.
//
// Inputs are consumed by value: once a sequence has been folded into a
// merged one its allocation is released.

use crate::core::model::LogSequence;
use rayon::prelude::*;

/// Statistics from a reduction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Number of reduction rounds.
    pub rounds: usize,
    /// Number of pairwise merges across all rounds.
    pub pair_merges: usize,
}

/// Merge two sequences, each sorted ascending by timestamp.
///
/// On equal timestamps the entry from `second` is emitted first. Relative
/// order within each input is preserved, and once either side runs out the
/// other's remaining tail is appended unchanged.
pub fn merge_pair(first: LogSequence, second: LogSequence) -> LogSequence {
    let mut merged = Vec::with_capacity(first.len() + second.len());
    let mut left = first.into_iter().peekable();
    let mut right = second.into_iter().peekable();

    loop {
        let take_left = match (left.peek(), right.peek()) {
            (Some(a), Some(b)) => a.timestamp() < b.timestamp(),
            _ => break,
        };
        let next = if take_left { left.next() } else { right.next() };
        merged.extend(next);
    }

    merged.extend(left);
    merged.extend(right);
    merged
}

/// Reduce any number of sequences to one.
///
/// Zero inputs give an empty sequence; a single input is returned as-is.
/// Pairing is strictly positional, so the result depends only on the input
/// order. With `parallel` set, the merges of a round run on the current rayon
/// pool; the output is identical to the sequential path.
pub fn merge_all(sequences: Vec<LogSequence>, parallel: bool) -> (LogSequence, MergeStats) {
    let mut stats = MergeStats::default();
    let mut forest = sequences;

    while forest.len() > 1 {
        let pairs = into_pairs(forest);
        stats.rounds += 1;
        stats.pair_merges += pairs.iter().filter(|(_, b)| b.is_some()).count();

        forest = if parallel {
            pairs.into_par_iter().map(reduce_pair).collect()
        } else {
            pairs.into_iter().map(reduce_pair).collect()
        };

        tracing::debug!(
            round = stats.rounds,
            remaining = forest.len(),
            "Merge round complete"
        );
    }

    (forest.pop().unwrap_or_default(), stats)
}

fn reduce_pair((first, second): (LogSequence, Option<LogSequence>)) -> LogSequence {
    match second {
        Some(second) => merge_pair(first, second),
        None => first,
    }
}

/// Group consecutive sequences into pairs; an odd last one has no partner.
fn into_pairs(forest: Vec<LogSequence>) -> Vec<(LogSequence, Option<LogSequence>)> {
    let mut pairs = Vec::with_capacity(forest.len().div_ceil(2));
    let mut iter = forest.into_iter();
    while let Some(first) = iter.next() {
        pairs.push((first, iter.next()));
    }
    pairs
}

// =============================================================================
// Tests
// =============================================================================
