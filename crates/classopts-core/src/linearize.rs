//! C3 linearization of default chains.
//!
//! Merges the parents' chains into one ancestor order that:
//! - keeps every type before its ancestors
//! - is a linear extension of each parent's own chain
//! - keeps parents in their declared left-to-right order
//!
//! Ancestors are identified by link, not by name: two distinct types that
//! happen to share a name stay two separate entries in the chain.

use crate::chain::{ChainLink, LinearizedChain};
use crate::error::InconsistentHierarchyError;
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{trace, warn};

type Sequence = VecDeque<Arc<ChainLink>>;

/// Build the chain for a new type whose own link is `head`.
///
/// `parent_chains` must be given in the order the parents were declared.
pub fn linearize(
    head: ChainLink,
    parent_chains: &[&LinearizedChain],
) -> Result<LinearizedChain, InconsistentHierarchyError> {
    let mut sequences: Vec<Sequence> = parent_chains
        .iter()
        .map(|chain| chain.links().iter().cloned().collect())
        .collect();

    // Local precedence: the direct parents in declaration order
    sequences.push(
        parent_chains
            .iter()
            .filter_map(|chain| chain.head().cloned())
            .collect(),
    );

    let mut links = vec![Arc::new(head)];

    loop {
        sequences.retain(|seq| !seq.is_empty());
        if sequences.is_empty() {
            break;
        }

        let Some(candidate) = select_candidate(&sequences) else {
            let unresolved = remaining_owners(&sequences);
            warn!(
                type_name = %links[0].owner,
                unresolved = ?unresolved,
                "no consistent ancestor order"
            );
            return Err(InconsistentHierarchyError::new(links[0].owner.clone(), unresolved));
        };

        trace!(type_name = %links[0].owner, next = %candidate.owner, "merge step");

        for seq in &mut sequences {
            if seq.front().is_some_and(|link| Arc::ptr_eq(link, &candidate)) {
                seq.pop_front();
            }
        }
        links.push(candidate);
    }

    Ok(LinearizedChain::from_links(links))
}

/// Head of the first sequence that is absent from every sequence's tail.
fn select_candidate(sequences: &[Sequence]) -> Option<Arc<ChainLink>> {
    sequences
        .iter()
        .filter_map(|seq| seq.front())
        .find(|head| !in_any_tail(sequences, head))
        .cloned()
}

fn in_any_tail(sequences: &[Sequence], candidate: &Arc<ChainLink>) -> bool {
    sequences
        .iter()
        .any(|seq| seq.iter().skip(1).any(|link| Arc::ptr_eq(link, candidate)))
}

fn remaining_owners(sequences: &[Sequence]) -> Vec<String> {
    let mut seen: Vec<&Arc<ChainLink>> = Vec::new();
    for link in sequences.iter().flatten() {
        if !seen.iter().any(|s| Arc::ptr_eq(s, link)) {
            seen.push(link);
        }
    }
    seen.into_iter().map(|link| link.owner.clone()).collect()
}
