//! Subset construction: converting an NFA into an equivalent DFA.

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use log::debug;

use crate::nfa::{Label, Nfa, StateId};

/// A deterministic finite automaton: at most one destination per
/// (state, label) pair and no epsilon transitions at all.
#[derive(Debug, Clone, Default)]
pub struct Dfa {
    states: Vec<DfaState>,
    pub start: StateId,
    pub accepting: HashSet<StateId>,
}

#[derive(Debug, Clone, Default)]
struct DfaState {
    transitions: HashMap<Label, StateId>,
}

impl Dfa {
    fn add_state(&mut self) -> StateId {
        let id = self.states.len();
        self.states.push(DfaState::default());
        id
    }

    fn add_transition(&mut self, from: StateId, label: Label, to: StateId) {
        assert!(label != Label::Epsilon, "DFAs have no epsilon transitions");
        let previous = self.states[from].transitions.insert(label, to);
        assert!(
            previous.is_none(),
            "cannot re-add transition for label {}",
            label
        );
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// The single destination for `label` from `state`, if any.
    pub fn follow(&self, state: StateId, label: Label) -> Option<StateId> {
        self.states[state].transitions.get(&label).copied()
    }

    /// Every outgoing `(label, destination)` pair of `state`.
    pub fn edges(&self, state: StateId) -> impl Iterator<Item = (Label, StateId)> + '_ {
        self.states[state]
            .transitions
            .iter()
            .map(|(&label, &destination)| (label, destination))
    }

    /// Every state reachable from `start`, each exactly once, in DFS order.
    pub fn reachable(&self) -> Vec<StateId> {
        let mut visited = HashSet::new();
        let mut agenda = vec![self.start];
        let mut order = Vec::new();
        while let Some(state) = agenda.pop() {
            if !visited.insert(state) {
                continue;
            }
            order.push(state);
            agenda.extend(self.edges(state).map(|(_, d)| d));
        }
        order
    }

    /// Whether the automaton accepts the entire candidate. Agrees with
    /// [`Matcher::is_match`](crate::matcher::Matcher::is_match) on the NFA
    /// this DFA was built from.
    pub fn is_match(&self, candidate: &str) -> bool {
        let mut state = self.start;
        for c in candidate.chars() {
            match self.follow(state, Label::Char(c)) {
                Some(next) => state = next,
                None => return false,
            }
        }
        self.accepting.contains(&state)
    }
}

/// Convert an NFA into an equivalent DFA by worklist-driven subset
/// construction.
///
/// Each discovered epsilon-closed set of NFA states becomes one DFA state;
/// the dictionary is keyed by the set's contents, so two separately
/// discovered but equal sets map to the identical DFA state.
pub fn to_dfa(nfa: &Nfa) -> Dfa {
    let mut dfa = Dfa::default();
    let mut interned: HashMap<BTreeSet<StateId>, StateId> = HashMap::new();
    let mut done: HashSet<BTreeSet<StateId>> = HashSet::new();
    let mut worklist: VecDeque<BTreeSet<StateId>> = VecDeque::new();

    let seed = closure_set(nfa, std::iter::once(nfa.start));
    dfa.start = intern(&mut dfa, &mut interned, seed.clone());
    worklist.push_back(seed);

    while let Some(focus) = worklist.pop_front() {
        if !done.insert(focus.clone()) {
            continue;
        }

        // Partition the set's outgoing consuming transitions by label; the
        // epsilon edges were already accounted for by the closures.
        let mut partitions: HashMap<Label, BTreeSet<StateId>> = HashMap::new();
        for &state in &focus {
            for (label, destination) in nfa.edges(state) {
                if label != Label::Epsilon {
                    partitions.entry(label).or_default().insert(destination);
                }
            }
        }

        let focus_id = interned[&focus];
        for (label, destinations) in partitions {
            let next = closure_set(nfa, destinations);
            let next_id = intern(&mut dfa, &mut interned, next.clone());
            dfa.add_transition(focus_id, label, next_id);
            worklist.push_back(next);
        }
    }

    for (set, &id) in &interned {
        if set.iter().any(|state| nfa.accepting.contains(state)) {
            dfa.accepting.insert(id);
        }
    }

    debug!(
        "subset construction: {} NFA states -> {} DFA states",
        nfa.state_count(),
        dfa.state_count()
    );
    dfa
}

fn closure_set<I: IntoIterator<Item = StateId>>(nfa: &Nfa, states: I) -> BTreeSet<StateId> {
    let seed: HashSet<StateId> = states.into_iter().collect();
    nfa.epsilon_closure(&seed).into_iter().collect()
}

fn intern(
    dfa: &mut Dfa,
    interned: &mut HashMap<BTreeSet<StateId>, StateId>,
    set: BTreeSet<StateId>,
) -> StateId {
    match interned.get(&set) {
        Some(&id) => id,
        None => {
            let id = dfa.add_state();
            interned.insert(set, id);
            id
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::compile;
    use crate::matcher::Matcher;
    use crate::pattern::{Alphabet, Pattern};

    fn smoke_pattern() -> Pattern {
        // [bm]e*(at|f{4})
        Pattern::Sequence(vec![
            Pattern::one_of("bm"),
            Pattern::Star(Box::new(Pattern::Literal('e'))),
            Pattern::Or(vec![
                Pattern::literal_str("at"),
                Pattern::Repeat {
                    pattern: Box::new(Pattern::Literal('f')),
                    min: 4,
                    max: 4,
                },
            ]),
        ])
    }

    #[test]
    fn dfa_agrees_with_nfa() {
        let nfa = compile(&smoke_pattern(), &Alphabet::ascii_printable());
        let dfa = to_dfa(&nfa);
        let matcher = Matcher::new(&nfa);
        for candidate in [
            "beef",
            "beeeeeeeeffff",
            "meat",
            "beaffff",
            "",
            "b",
            "bat",
            "mffff",
            "meeeat",
            "xat",
        ] {
            assert_eq!(
                matcher.is_match(candidate),
                dfa.is_match(candidate),
                "disagreement on {:?}",
                candidate
            );
        }
    }

    #[test]
    fn dfa_has_no_epsilon_edges() {
        let nfa = compile(&smoke_pattern(), &Alphabet::ascii_printable());
        let dfa = to_dfa(&nfa);
        for state in dfa.reachable() {
            assert!(dfa.edges(state).all(|(label, _)| label != Label::Epsilon));
        }
    }

    #[test]
    fn equal_state_sets_share_a_dfa_state() {
        // In (a|a)b both branches lead to the same closure set after 'a', so
        // the DFA collapses them: start, post-a, and post-b states only.
        let pattern = Pattern::Sequence(vec![
            Pattern::Or(vec![Pattern::Literal('a'), Pattern::Literal('a')]),
            Pattern::Literal('b'),
        ]);
        let nfa = compile(&pattern, &Alphabet::ascii_printable());
        let dfa = to_dfa(&nfa);
        assert_eq!(dfa.reachable().len(), 3);
        assert!(dfa.is_match("ab"));
        assert!(!dfa.is_match("aab"));
    }

    #[test]
    fn epsilon_cycles_do_not_diverge() {
        let pattern = Pattern::Star(Box::new(Pattern::Star(Box::new(Pattern::Literal('x')))));
        let nfa = compile(&pattern, &Alphabet::ascii_printable());
        let dfa = to_dfa(&nfa);
        assert!(dfa.is_match(""));
        assert!(dfa.is_match("xxx"));
        assert!(!dfa.is_match("xy"));
    }
}
