//! Longest-match simulation of an NFA over a rewindable character source.

use std::collections::HashSet;

use log::trace;

use crate::nfa::{Label, Nfa, StateId};
use crate::source::RewindSource;

/// The outcome of a [`Matcher::longest_match`] call.
#[derive(Debug, Clone)]
pub struct Match {
    /// Every accepting state live at the end of the longest accepted prefix.
    /// Empty when no prefix (not even the empty one) was accepted.
    pub acceptors: HashSet<StateId>,
    /// The matched text, already committed: the source can no longer re-read
    /// it. Empty text with non-empty acceptors means a zero-width match (an
    /// accepting start state, or the lexer's end-of-input rule).
    pub text: String,
}

impl Match {
    /// Whether no prefix of the stream was accepted.
    pub fn is_miss(&self) -> bool {
        self.acceptors.is_empty()
    }
}

/// Drives an NFA over a character source, preferring the longest accepted
/// prefix over any shorter one.
pub struct Matcher<'a> {
    nfa: &'a Nfa,
}

impl<'a> Matcher<'a> {
    pub fn new(nfa: &'a Nfa) -> Self {
        Self { nfa }
    }

    /// Find the longest prefix of `source` accepted by the automaton.
    ///
    /// Because several states are live at once, the simulation must not stop
    /// at the first accepting encounter: it records each accepting state set
    /// it passes through and keeps advancing until no states remain live or
    /// the source is exhausted, so later (longer) matches always win.
    ///
    /// On return the source is rewound past everything read beyond the match
    /// and the matched prefix itself is permanently forgotten, leaving the
    /// source positioned exactly after the match for the next call. The
    /// matcher expects to be the source's only reader: anything the caller
    /// reads directly between calls must be forgotten first.
    pub fn longest_match<I: Iterator<Item = char>>(
        &self,
        source: &mut RewindSource<I>,
    ) -> Match {
        let seed: HashSet<StateId> = std::iter::once(self.nfa.start).collect();
        let mut states = self.nfa.epsilon_closure(&seed);

        // Number of source items (characters, plus possibly the end-of-stream
        // sentinel) read so far, and the best accepting prefix seen.
        let mut reads = 0;
        let mut best_acceptors = HashSet::new();
        let mut best_reads = 0;

        loop {
            let accepting = self.nfa.accepting_in(&states);
            if !accepting.is_empty() {
                best_acceptors = accepting;
                best_reads = reads;
            }
            if states.is_empty() {
                break;
            }

            let item = source.get();
            reads += 1;
            let label = match item {
                Some(c) => Label::Char(c),
                None => Label::End,
            };
            states = self.nfa.advance(&states, label);

            if item.is_none() {
                // The sentinel ends the stream; one last check in case it
                // completed a match (the end-of-input rule).
                let accepting = self.nfa.accepting_in(&states);
                if !accepting.is_empty() {
                    best_acceptors = accepting;
                    best_reads = reads;
                }
                break;
            }
        }

        // Rewind everything, re-read the committed prefix, and forget it.
        source.rewind();
        for _ in 0..best_reads {
            source.get();
        }
        let text = source.forget(best_reads);
        trace!(
            "longest match consumed {} chars across {} acceptors",
            text.len(),
            best_acceptors.len()
        );
        Match {
            acceptors: best_acceptors,
            text,
        }
    }

    /// Whether the longest match consumes the entire candidate.
    pub fn is_match(&self, candidate: &str) -> bool {
        let mut source = RewindSource::new(candidate.chars());
        let m = self.longest_match(&mut source);
        !m.is_miss() && m.text == candidate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::compile;
    use crate::pattern::{Alphabet, Pattern};

    fn nfa_for(pattern: &Pattern) -> Nfa {
        compile(pattern, &Alphabet::ascii_printable())
    }

    #[test]
    fn longest_match_is_greedy() {
        let nfa = nfa_for(&Pattern::Star(Box::new(Pattern::Literal('a'))));
        let mut source = RewindSource::new("aaab".chars());
        let m = Matcher::new(&nfa).longest_match(&mut source);
        assert_eq!(m.text, "aaa");
        assert!(!m.is_miss());
        // The unmatched tail is still readable.
        assert_eq!(source.get(), Some('b'));
    }

    #[test]
    fn later_matches_overwrite_earlier_ones() {
        // (a|aaa) against "aaa" must prefer the three-character branch even
        // though the one-character branch accepts first.
        let nfa = nfa_for(&Pattern::Or(vec![
            Pattern::Literal('a'),
            Pattern::literal_str("aaa"),
        ]));
        let mut source = RewindSource::new("aaa".chars());
        let m = Matcher::new(&nfa).longest_match(&mut source);
        assert_eq!(m.text, "aaa");
    }

    #[test]
    fn miss_rewinds_the_source_completely() {
        let nfa = nfa_for(&Pattern::Literal('x'));
        let mut source = RewindSource::new("abc".chars());
        let m = Matcher::new(&nfa).longest_match(&mut source);
        assert!(m.is_miss());
        assert_eq!(m.text, "");
        assert_eq!(source.get(), Some('a'));
    }

    #[test]
    fn zero_width_match_when_start_accepts() {
        let nfa = nfa_for(&Pattern::Star(Box::new(Pattern::Literal('a'))));
        let mut source = RewindSource::new("bbb".chars());
        let m = Matcher::new(&nfa).longest_match(&mut source);
        assert!(!m.is_miss());
        assert_eq!(m.text, "");
        assert_eq!(source.get(), Some('b'));
    }

    #[test]
    fn match_completed_by_final_character() {
        let nfa = nfa_for(&Pattern::literal_str("ab"));
        let mut source = RewindSource::new("ab".chars());
        let m = Matcher::new(&nfa).longest_match(&mut source);
        assert_eq!(m.text, "ab");
    }

    #[test]
    fn consecutive_matches_advance_through_the_source() {
        let nfa = nfa_for(&Pattern::Plus(Box::new(Pattern::one_of("ab"))));
        let mut source = RewindSource::new("ab ba".chars());
        let matcher = Matcher::new(&nfa);
        assert_eq!(matcher.longest_match(&mut source).text, "ab");
        assert_eq!(source.get(), Some(' '));
        source.forget(1);
        assert_eq!(matcher.longest_match(&mut source).text, "ba");
    }

    #[test]
    fn smoke_patterns_from_the_original() {
        // [bm]e*(at|f{4})
        let pattern = Pattern::Sequence(vec![
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
        ]);
        let nfa = nfa_for(&pattern);
        let matcher = Matcher::new(&nfa);
        assert!(!matcher.is_match("beef"));
        assert!(matcher.is_match("beeeeeeeeffff"));
        assert!(matcher.is_match("meat"));
        assert!(!matcher.is_match("beaffff"));
    }
}
