//! A longest-match lexer multiplexing many rules over one automaton.
//!
//! Every rule's fragment hangs off a shared start state, so a single
//! [`Matcher::longest_match`] call simulates all rules at once. Ties between
//! rules that accept the same longest prefix go to the rule defined last, so
//! later definitions shadow earlier ones (define `if` after the identifier
//! rule, not before).

use std::collections::HashMap;

use log::{debug, trace};

use crate::compiler::Builder;
use crate::matcher::Matcher;
use crate::nfa::{Label, Nfa, StateId};
use crate::pattern::{Alphabet, Pattern};
use crate::source::RewindSource;
use crate::syntax;
use crate::{Error, Result};

/// A single lexing rule: a named pattern, optionally emitted.
#[derive(Debug, Clone)]
pub struct Rule {
    pub name: String,
    pub pattern: Pattern,
    /// Silent rules still consume their match but produce no token;
    /// whitespace and comments are the usual cases.
    pub emitted: bool,
}

impl Rule {
    pub fn new(name: impl Into<String>, pattern: Pattern) -> Self {
        Self {
            name: name.into(),
            pattern,
            emitted: true,
        }
    }

    pub fn silent(name: impl Into<String>, pattern: Pattern) -> Self {
        Self {
            name: name.into(),
            pattern,
            emitted: false,
        }
    }

    /// Build a rule from pattern text over the given alphabet.
    pub fn from_text(name: impl Into<String>, text: &str, alphabet: &Alphabet) -> Result<Self> {
        Ok(Self::new(name, syntax::parse(text, alphabet)?))
    }
}

/// A lexeme: the matching rule's name and the text it consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: String,
    pub text: String,
}

/// A rule-multiplexing lexer.
pub struct Lexer {
    nfa: Nfa,
    /// Accepting state of each rule's fragment, mapped back to the rule's
    /// index. The index doubles as the rule's precedence rank.
    acceptors: HashMap<StateId, usize>,
    /// Accepting state of the end-of-input rule. It transitions on the
    /// end-of-stream sentinel, which no ordinary rule can reach, so it only
    /// ever wins when nothing else accepts.
    eof_acceptor: StateId,
    rules: Vec<Rule>,
}

impl Lexer {
    /// Compile `rules` into one automaton over `alphabet`.
    ///
    /// Rejects any rule whose pattern accepts the empty string, emitted or
    /// not: a zero-width match consumes nothing, so the lexer would produce
    /// it forever without advancing.
    pub fn new(rules: Vec<Rule>, alphabet: &Alphabet) -> Result<Self> {
        let mut builder = Builder::new(alphabet.clone());
        let start = builder.state();
        let mut acceptors = HashMap::new();

        for (index, rule) in rules.iter().enumerate() {
            let fragment = builder.build_fragment(&rule.pattern);
            let seed = std::iter::once(fragment.start).collect();
            if builder.nfa().epsilon_closure(&seed).contains(&fragment.end) {
                return Err(Error::EmptyMatchRule(rule.name.clone()));
            }
            builder.transition(start, Label::Epsilon, fragment.start);
            acceptors.insert(fragment.end, index);
        }

        let eof_acceptor = builder.state();
        builder.transition(start, Label::End, eof_acceptor);

        let mut nfa = builder.finish();
        nfa.start = start;
        nfa.accepting = acceptors.keys().copied().collect();
        nfa.accepting.insert(eof_acceptor);

        debug!(
            "lexer compiled {} rules into {} states",
            rules.len(),
            nfa.state_count()
        );
        Ok(Self {
            nfa,
            acceptors,
            eof_acceptor,
            rules,
        })
    }

    /// Lazily tokenize `input`.
    pub fn lex<I>(&self, input: I) -> Tokens<'_, I::IntoIter>
    where
        I: IntoIterator<Item = char>,
    {
        Tokens {
            lexer: self,
            matcher: Matcher::new(&self.nfa),
            source: RewindSource::new(input),
            offset: 0,
            finished: false,
        }
    }

    /// Collect every token of `input`, stopping at the first error.
    pub fn tokenize(&self, input: &str) -> Result<Vec<Token>> {
        self.lex(input.chars()).collect()
    }

    pub fn nfa(&self) -> &Nfa {
        &self.nfa
    }
}

/// Iterator over the tokens of one input stream.
///
/// Yields `Err` once (and then stops) if the stream has a position where no
/// rule matches; ends cleanly when only the end-of-input rule accepts.
pub struct Tokens<'a, I: Iterator<Item = char>> {
    lexer: &'a Lexer,
    matcher: Matcher<'a>,
    source: RewindSource<I>,
    offset: usize,
    finished: bool,
}

impl<I: Iterator<Item = char>> Iterator for Tokens<'_, I> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.finished {
                return None;
            }

            let m = self.matcher.longest_match(&mut self.source);
            if m.is_miss() {
                self.finished = true;
                return Some(Err(Error::UnmatchedInput {
                    offset: self.offset,
                }));
            }

            // The highest-ranked ordinary rule among the acceptors wins;
            // if none is ordinary, the end-of-input rule matched alone.
            let winner = m
                .acceptors
                .iter()
                .filter(|&&state| state != self.lexer.eof_acceptor)
                .filter_map(|state| self.lexer.acceptors.get(state))
                .copied()
                .max();
            let index = match winner {
                Some(index) => index,
                None => {
                    self.finished = true;
                    return None;
                }
            };

            let rule = &self.lexer.rules[index];
            self.offset += m.text.chars().count();
            trace!("rule {} matched {:?}", rule.name, m.text);
            if rule.emitted {
                return Some(Ok(Token {
                    kind: rule.name.clone(),
                    text: m.text,
                }));
            }
        }
    }
}
