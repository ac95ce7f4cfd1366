//! Generic allowed-edge transition table, shared by [`crate::models::OtcOrderStatus`]
//! and [`crate::models::CurrencyOrderStatus`]. Built once from a static edge
//! list rather than branching on every call site, per the allowed-transitions
//! tables both status machines are specified with.

use std::fmt::Debug;
use std::hash::Hash;

use std::collections::HashSet;

pub struct TransitionTable<S: Eq + Hash + Copy> {
    edges: HashSet<(S, S)>,
}

impl<S: Eq + Hash + Copy + Debug> TransitionTable<S> {
    pub fn new(edges: &[(S, S)]) -> Self {
        Self {
            edges: edges.iter().copied().collect(),
        }
    }

    pub fn allows(&self, from: S, to: S) -> bool {
        self.edges.contains(&(from, to))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Toy {
        A,
        B,
        C,
    }

    #[test]
    fn allows_only_listed_edges() {
        let table = TransitionTable::new(&[(Toy::A, Toy::B), (Toy::B, Toy::C)]);
        assert!(table.allows(Toy::A, Toy::B));
        assert!(table.allows(Toy::B, Toy::C));
        assert!(!table.allows(Toy::A, Toy::C));
        assert!(!table.allows(Toy::C, Toy::A));
    }
}
