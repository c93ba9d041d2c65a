//! # Fork Choice
//!
//! Most recent root wins: among fully verified chains, the one whose root
//! record has the latest `created_at`. Chains sharing that root (siblings
//! forked by concurrent appends) are ordered by length, then by the smallest
//! record hash where they first differ. Every key is a property of the
//! records alone, so processes that read the same log at different moments
//! still pick the same chain.
//!
//! `created_at` is chosen by the signer. An admin starting a root with a
//! future timestamp keeps it ahead of every later root until that time.

use super::graph::{Chain, RecordGraph};
use std::cmp::Ordering;

/// Position in `chains` of the winning chain, `None` if there is none.
pub fn select_chain(graph: &RecordGraph, chains: &[Chain]) -> Option<usize> {
    let mut best: Option<(usize, chrono::DateTime<chrono::Utc>, usize)> = None;
    for (position, chain) in chains.iter().enumerate() {
        let Some(root) = chain.first().and_then(|&root| graph.get(root)) else {
            continue;
        };
        let key = (root.created_at(), chain.len());
        let better = match best {
            None => true,
            Some((current, created_at, len)) => match key.cmp(&(created_at, len)) {
                Ordering::Greater => true,
                Ordering::Less => false,
                Ordering::Equal => hashes_precede(graph, chain, &chains[current]),
            },
        };
        if better {
            best = Some((position, key.0, key.1));
        }
    }
    best.map(|(position, _, _)| position)
}

/// Whether `chain` sorts before `other` by record hashes, compared from the
/// root down.
fn hashes_precede(graph: &RecordGraph, chain: &Chain, other: &Chain) -> bool {
    let hashes = |chain: &Chain| {
        chain
            .iter()
            .map(|&index| graph.get(index).map(|record| record.hash.clone()))
            .collect::<Vec<_>>()
    };
    hashes(chain) < hashes(other)
}
