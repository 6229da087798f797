//! Thompson construction: compiling a [`Pattern`] into NFA fragments.

use log::debug;

use crate::nfa::{Fragment, Label, Nfa, StateId};
use crate::pattern::{Alphabet, Pattern};

/// Compile a single pattern into a standalone NFA.
pub fn compile(pattern: &Pattern, alphabet: &Alphabet) -> Nfa {
    let mut builder = Builder::new(alphabet.clone());
    let fragment = builder.build_fragment(pattern);
    builder.into_nfa(fragment)
}

/// Builds NFA fragments from patterns, one fragment per sub-pattern, and
/// wires them together inside a single growing state arena.
pub struct Builder {
    nfa: Nfa,
    alphabet: Alphabet,
}

impl Builder {
    pub fn new(alphabet: Alphabet) -> Self {
        Self {
            nfa: Nfa::new(),
            alphabet,
        }
    }

    /// Produce a minimal automaton fragment recognizing `pattern`.
    pub fn build_fragment(&mut self, pattern: &Pattern) -> Fragment {
        match pattern {
            Pattern::Literal(c) => {
                let start = self.state();
                let end = self.state();
                self.nfa.add_transition(start, Label::Char(*c), end);
                Fragment { start, end }
            }
            Pattern::Sequence(parts) => {
                let fragments = parts.iter().map(|p| self.build_fragment(p)).collect();
                self.chain(fragments)
            }
            Pattern::Or(parts) => {
                let fragments = parts.iter().map(|p| self.build_fragment(p)).collect();
                self.parallel(fragments)
            }
            Pattern::Star(inner) => {
                let fragment = self.build_fragment(inner);
                self.nfa.add_epsilon(fragment.end, fragment.start);
                // Entry and exit collapse onto the fragment start: zero
                // occurrences bypass everything, the back-edge allows any
                // number more.
                Fragment {
                    start: fragment.start,
                    end: fragment.start,
                }
            }
            Pattern::Plus(inner) => {
                let fragment = self.build_fragment(inner);
                // Same back-edge as Star, but start and end stay distinct:
                // at least one traversal is mandatory.
                self.nfa.add_epsilon(fragment.end, fragment.start);
                fragment
            }
            Pattern::Maybe(inner) => {
                let fragment = self.build_fragment(inner);
                self.nfa.add_epsilon(fragment.start, fragment.end);
                fragment
            }
            Pattern::Repeat { pattern, min, max } => self.build_repeat(pattern, *min, *max),
            Pattern::Selection { chars, negated } => {
                if *negated {
                    let effective: Vec<char> =
                        self.alphabet.chars().filter(|c| !chars.contains(c)).collect();
                    self.selection_fragment(&effective)
                } else {
                    let effective: Vec<char> = chars.iter().copied().collect();
                    self.selection_fragment(&effective)
                }
            }
            Pattern::Range(low, high) => {
                assert!(low <= high, "invalid range [{}-{}]", low, high);
                let effective: Vec<char> = (*low..=*high).collect();
                self.selection_fragment(&effective)
            }
            Pattern::Anything => {
                let effective: Vec<char> = self.alphabet.chars().collect();
                self.selection_fragment(&effective)
            }
        }
    }

    fn build_repeat(&mut self, pattern: &Pattern, min: usize, max: usize) -> Fragment {
        assert!(
            min <= max,
            "repeat bounds are inverted: min {} > max {}",
            min,
            max
        );
        let mut fragments: Vec<Fragment> =
            (0..min).map(|_| self.build_fragment(pattern)).collect();
        for _ in min..max {
            let maybe = self.build_fragment(pattern);
            self.nfa.add_epsilon(maybe.start, maybe.end);
            fragments.push(maybe);
        }
        if fragments.is_empty() {
            // Repeat(p, 0, 0): a lone state accepting the empty string.
            let state = self.state();
            return Fragment {
                start: state,
                end: state,
            };
        }
        self.chain(fragments)
    }

    fn selection_fragment(&mut self, chars: &[char]) -> Fragment {
        let start = self.state();
        let end = self.state();
        for &c in chars {
            self.nfa.add_transition(start, Label::Char(c), end);
        }
        Fragment { start, end }
    }

    /// Connect `follower` to the end of `first`, consuming both and returning
    /// the fragment spanning the whole chain.
    pub fn append(&mut self, first: Fragment, follower: Fragment) -> Fragment {
        self.nfa.add_epsilon(first.end, follower.start);
        Fragment {
            start: first.start,
            end: follower.end,
        }
    }

    /// Chain fragments end to start. At least one fragment is required.
    pub fn chain(&mut self, fragments: Vec<Fragment>) -> Fragment {
        let mut fragments = fragments.into_iter();
        let first = fragments
            .next()
            .expect("cannot chain zero fragments");
        fragments.fold(first, |chained, next| self.append(chained, next))
    }

    /// Join fragments in parallel under a fresh start and end state,
    /// epsilon-wired, consuming all of them.
    pub fn parallel(&mut self, fragments: Vec<Fragment>) -> Fragment {
        let start = self.state();
        let end = self.state();
        for fragment in fragments {
            self.nfa.add_epsilon(start, fragment.start);
            self.nfa.add_epsilon(fragment.end, end);
        }
        Fragment { start, end }
    }

    /// Allocate a fresh, unconnected state.
    pub fn state(&mut self) -> StateId {
        self.nfa.add_state()
    }

    /// Add an arbitrary labeled transition; the lexer uses this for its
    /// end-of-input edge.
    pub fn transition(&mut self, from: StateId, label: Label, to: StateId) {
        self.nfa.add_transition(from, label, to);
    }

    pub fn nfa(&self) -> &Nfa {
        &self.nfa
    }

    /// Anchor the automaton on a fragment: its start becomes the NFA start
    /// and its end the sole accepting state.
    pub fn into_nfa(self, fragment: Fragment) -> Nfa {
        let mut nfa = self.nfa;
        nfa.start = fragment.start;
        nfa.accepting = std::iter::once(fragment.end).collect();
        debug!(
            "compiled automaton with {} states, start {}",
            nfa.state_count(),
            nfa.start
        );
        nfa
    }

    /// Release the raw arena; the caller wires start and accepting itself.
    pub fn finish(self) -> Nfa {
        self.nfa
    }
}
