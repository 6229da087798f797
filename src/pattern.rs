//! The pattern AST consumed by the compiler, and the alphabet it ranges over.

use std::collections::BTreeSet;
use std::fmt;

/// A symbolic representation of a parsed regular expression.
///
/// Patterns are immutable trees. They are either built by hand or produced
/// from pattern text by [`crate::syntax::parse`]; the compiler only reads
/// them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    /// A single character.
    Literal(char),
    /// The concatenation of one or more patterns.
    Sequence(Vec<Pattern>),
    /// Exactly one pattern from one or more candidates.
    Or(Vec<Pattern>),
    /// Zero or more occurrences of a pattern.
    Star(Box<Pattern>),
    /// One or more occurrences of a pattern.
    Plus(Box<Pattern>),
    /// Zero or one occurrences of a pattern.
    Maybe(Box<Pattern>),
    /// Any single character from a set of candidates. When `negated`, any
    /// alphabet character *not* in the set.
    Selection {
        chars: BTreeSet<char>,
        negated: bool,
    },
    /// Between `min` and `max` (inclusive) occurrences of a pattern.
    /// Invariant: `min <= max`; the compiler fails fast otherwise.
    Repeat {
        pattern: Box<Pattern>,
        min: usize,
        max: usize,
    },
    /// Any character in an inclusive range.
    Range(char, char),
    /// Any single character in the configured alphabet.
    Anything,
}

impl Pattern {
    /// Convenience for a `Selection` over the given candidates.
    pub fn one_of(candidates: &str) -> Pattern {
        Pattern::Selection {
            chars: candidates.chars().collect(),
            negated: false,
        }
    }

    /// Convenience for a negated `Selection` over the given candidates.
    pub fn none_of(candidates: &str) -> Pattern {
        Pattern::Selection {
            chars: candidates.chars().collect(),
            negated: true,
        }
    }

    /// Convenience for a `Sequence` of literals, one per character.
    pub fn literal_str(text: &str) -> Pattern {
        let mut literals: Vec<Pattern> = text.chars().map(Pattern::Literal).collect();
        match literals.len() {
            1 => literals.swap_remove(0),
            _ => Pattern::Sequence(literals),
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pattern::Literal(c) => write!(f, "{}", c),
            Pattern::Sequence(parts) => {
                for part in parts {
                    write!(f, "({})", part)?;
                }
                Ok(())
            }
            Pattern::Or(parts) => {
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        write!(f, "|")?;
                    }
                    write!(f, "({})", part)?;
                }
                Ok(())
            }
            Pattern::Star(inner) => write!(f, "({})*", inner),
            Pattern::Plus(inner) => write!(f, "({})+", inner),
            Pattern::Maybe(inner) => write!(f, "({})?", inner),
            Pattern::Selection { chars, negated } => {
                write!(f, "[{}", if *negated { "^" } else { "" })?;
                for c in chars {
                    write!(f, "{}", c)?;
                }
                write!(f, "]")
            }
            Pattern::Repeat { pattern, min, max } => {
                write!(f, "({}){{{},{}}}", pattern, min, max)
            }
            Pattern::Range(low, high) => write!(f, "[{}-{}]", low, high),
            Pattern::Anything => write!(f, "."),
        }
    }
}

/// The set of characters that `Anything` and negated selections range over.
///
/// This is explicit configuration rather than ambient state so that automata
/// built from the same patterns behave identically across environments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    chars: BTreeSet<char>,
}

impl Alphabet {
    /// An alphabet over the given characters.
    pub fn new<I: IntoIterator<Item = char>>(chars: I) -> Self {
        Self {
            chars: chars.into_iter().collect(),
        }
    }

    /// The ASCII printable characters: digits, letters, punctuation, and
    /// whitespace (space, `\t`, `\n`, `\r`, `\x0b`, `\x0c`).
    pub fn ascii_printable() -> Self {
        let mut chars: BTreeSet<char> = ('\x20'..='\x7e').collect();
        chars.extend(['\t', '\n', '\r', '\x0b', '\x0c']);
        Self { chars }
    }

    pub fn contains(&self, c: char) -> bool {
        self.chars.contains(&c)
    }

    /// Iterate the alphabet in ascending character order.
    pub fn chars(&self) -> impl Iterator<Item = char> + '_ {
        self.chars.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::ascii_printable()
    }
}

impl FromIterator<char> for Alphabet {
    fn from_iter<I: IntoIterator<Item = char>>(iter: I) -> Self {
        Self::new(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_mirrors_regex_shapes() {
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
        assert_eq!(pattern.to_string(), "([bm])((e)*)((a)(t)|((f){4,4}))");
    }

    #[test]
    fn display_range_and_anything() {
        assert_eq!(Pattern::Range('a', 'z').to_string(), "[a-z]");
        assert_eq!(Pattern::Anything.to_string(), ".");
        assert_eq!(Pattern::none_of("ab").to_string(), "[^ab]");
    }

    #[test]
    fn printable_alphabet_contents() {
        let alphabet = Alphabet::ascii_printable();
        assert!(alphabet.contains('a'));
        assert!(alphabet.contains(' '));
        assert!(alphabet.contains('\n'));
        assert!(!alphabet.contains('\x00'));
        assert!(!alphabet.contains('é'));
        // 95 printable ASCII plus 5 non-space whitespace characters.
        assert_eq!(alphabet.len(), 100);
    }

    #[test]
    fn custom_alphabet() {
        let alphabet: Alphabet = "ab".chars().collect();
        assert!(alphabet.contains('a'));
        assert!(!alphabet.contains('c'));
        assert_eq!(alphabet.chars().collect::<Vec<_>>(), vec!['a', 'b']);
    }
}
