//! A regular-expression compiler and longest-match lexer built on
//! Thompson-constructed NFAs.
//!
//! Pattern text is parsed by `regex-syntax` and translated into a small
//! [`Pattern`] AST, which [`compiler`] turns into an NFA fragment graph.
//! [`matcher`] simulates an NFA directly over a rewindable character source,
//! always preferring the longest accepted prefix; [`dfa`] offers subset
//! construction for a deterministic equivalent; [`lexer`] multiplexes many
//! named rules into one automaton and streams tokens.
//!
//! ```
//! use lexparse::lexer::{Lexer, Rule};
//! use lexparse::pattern::Alphabet;
//!
//! let alphabet = Alphabet::ascii_printable();
//! let lexer = Lexer::new(
//!     vec![
//!         Rule::from_text("number", "[0-9]+", &alphabet)?,
//!         Rule::from_text("word", "[a-z]+", &alphabet)?,
//!     ],
//!     &alphabet,
//! )?;
//! let tokens = lexer.tokenize("abc123")?;
//! assert_eq!(tokens[0].kind, "word");
//! assert_eq!(tokens[1].text, "123");
//! # Ok::<(), lexparse::Error>(())
//! ```

use std::fmt;

pub mod compiler;
pub mod dfa;
pub mod lexer;
pub mod matcher;
pub mod nfa;
pub mod pattern;
pub mod source;
pub mod syntax;

pub use compiler::compile;
pub use dfa::to_dfa;
pub use lexer::{Lexer, Rule, Token};
pub use matcher::Matcher;
pub use nfa::Nfa;
pub use pattern::{Alphabet, Pattern};

/// Errors from pattern parsing, lexer construction, and tokenizing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The pattern text is not valid regex syntax.
    Parse(String),
    /// The pattern parsed but uses a construct the automaton cannot express.
    UnsupportedFeature(String),
    /// A lexer rule accepts the empty string and can never make progress.
    EmptyMatchRule(String),
    /// No rule matched the input at the given character offset.
    UnmatchedInput { offset: usize },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Parse(message) => write!(f, "pattern parse error: {}", message),
            Error::UnsupportedFeature(feature) => {
                write!(f, "unsupported pattern feature: {}", feature)
            }
            Error::EmptyMatchRule(name) => {
                write!(f, "rule {:?} matches the empty string", name)
            }
            Error::UnmatchedInput { offset } => {
                write!(f, "no rule matches the input at offset {}", offset)
            }
        }
    }
}

impl std::error::Error for Error {}

/// Convenience alias for results with the crate error type.
pub type Result<T> = std::result::Result<T, Error>;
