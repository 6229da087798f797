//! NFA data types: the state arena, transition labels, and closure stepping.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;

/// A state ID: an index into an automaton's state arena.
///
/// States reference each other by index, so cyclic structures (the back-edges
/// of `*` and `+`) need no special ownership handling, and identity-based
/// equality is just index equality.
pub type StateId = usize;

/// A transition label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Label {
    /// The empty label: the transition consumes no input.
    Epsilon,
    /// A specific input character.
    Char(char),
    /// The end-of-stream sentinel, "read" exactly once when a source is
    /// exhausted. Only the lexer's end-of-input rule transitions on it.
    End,
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Epsilon => write!(f, "ε"),
            Label::Char(c) => write!(f, "{:?}", c),
            Label::End => write!(f, "EOF"),
        }
    }
}

/// A state of a nondeterministic finite automaton: a mapping from transition
/// label to a *set* of destinations. Adding the same (label, destination)
/// pair twice is a no-op.
#[derive(Debug, Clone, Default)]
struct State {
    transitions: HashMap<Label, BTreeSet<StateId>>,
}

/// A piece of an NFA graph with a single start and a single end state, not
/// yet wired into its surroundings.
///
/// Fragments are consumed by the builder's composition operations (`append`,
/// `chain`, `parallel`); moving them in makes reuse of a consumed fragment a
/// compile-time error rather than a latent graph bug.
#[derive(Debug)]
pub struct Fragment {
    pub start: StateId,
    pub end: StateId,
}

/// A nondeterministic finite automaton.
///
/// The `Nfa` value stores only the state arena and two anchors; the
/// automaton's structure is whatever is reachable from `start`. Automata are
/// immutable once built — matching never adds states or transitions — so a
/// shared reference is safe to simulate from any number of places.
#[derive(Debug, Clone, Default)]
pub struct Nfa {
    states: Vec<State>,
    /// Starting state.
    pub start: StateId,
    /// Set of accepting states.
    pub accepting: HashSet<StateId>,
}

impl Nfa {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a new state with no transitions and return its ID.
    pub fn add_state(&mut self) -> StateId {
        let id = self.states.len();
        self.states.push(State::default());
        id
    }

    /// Add a transition from `from` to `to` via `label`. Idempotent.
    pub fn add_transition(&mut self, from: StateId, label: Label, to: StateId) {
        self.states[from]
            .transitions
            .entry(label)
            .or_default()
            .insert(to);
    }

    /// Add an empty (epsilon) transition from `from` to `to`.
    pub fn add_epsilon(&mut self, from: StateId, to: StateId) {
        self.add_transition(from, Label::Epsilon, to);
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// The destinations reachable from `state` via exactly `label`.
    pub fn follow(&self, state: StateId, label: Label) -> impl Iterator<Item = StateId> + '_ {
        self.states[state]
            .transitions
            .get(&label)
            .into_iter()
            .flatten()
            .copied()
    }

    /// Every outgoing `(label, destination)` pair of `state`, one per edge.
    pub fn edges(&self, state: StateId) -> impl Iterator<Item = (Label, StateId)> + '_ {
        self.states[state]
            .transitions
            .iter()
            .flat_map(|(&label, destinations)| destinations.iter().map(move |&d| (label, d)))
    }

    /// Every successor of `state`, regardless of label. A state reached via
    /// several parallel edges is yielded once per edge.
    pub fn successors(&self, state: StateId) -> impl Iterator<Item = StateId> + '_ {
        self.edges(state).map(|(_, destination)| destination)
    }

    /// Every state reachable from `start`, each exactly once, in DFS order.
    ///
    /// Together with [`edges`](Nfa::edges) and the `accepting` set this is
    /// the whole iteration contract an external renderer needs.
    pub fn reachable(&self) -> Vec<StateId> {
        let mut visited = HashSet::new();
        let mut agenda = vec![self.start];
        let mut order = Vec::new();
        while let Some(state) = agenda.pop() {
            if !visited.insert(state) {
                continue;
            }
            order.push(state);
            agenda.extend(self.successors(state));
        }
        order
    }

    /// The set of states reachable from `states` via empty transitions only,
    /// including `states` themselves. Terminates on epsilon cycles.
    pub fn epsilon_closure(&self, states: &HashSet<StateId>) -> HashSet<StateId> {
        let mut closure = states.clone();
        let mut stack: Vec<StateId> = states.iter().copied().collect();
        while let Some(state) = stack.pop() {
            for destination in self.follow(state, Label::Epsilon) {
                if closure.insert(destination) {
                    stack.push(destination);
                }
            }
        }
        closure
    }

    /// One simulation step: the epsilon closure of every destination reached
    /// from `states` via exactly `label`. A state with no transition for the
    /// label contributes nothing.
    pub fn advance(&self, states: &HashSet<StateId>, label: Label) -> HashSet<StateId> {
        debug_assert!(label != Label::Epsilon, "advance takes a consuming label");
        let mut next = HashSet::new();
        for &state in states {
            next.extend(self.follow(state, label));
        }
        if next.is_empty() {
            next
        } else {
            self.epsilon_closure(&next)
        }
    }

    /// The accepting states among `states`.
    pub fn accepting_in(&self, states: &HashSet<StateId>) -> HashSet<StateId> {
        states
            .iter()
            .copied()
            .filter(|state| self.accepting.contains(state))
            .collect()
    }

    /// Whether any state in the set is accepting.
    pub fn is_accepting(&self, states: &HashSet<StateId>) -> bool {
        states.iter().any(|state| self.accepting.contains(state))
    }
}
