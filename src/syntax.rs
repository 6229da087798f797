//! Translation from `regex-syntax`'s HIR into the crate's [`Pattern`] AST.
//!
//! The text grammar lives entirely in `regex-syntax`; this module only maps
//! its parsed form onto the pattern variants the compiler understands,
//! clipping character classes to the configured alphabet along the way
//! (`regex-syntax` hands negated classes over pre-complemented against all of
//! Unicode, so the clip is what bounds them to the alphabet).

use std::collections::BTreeSet;

use regex_syntax::hir::{Class, Hir, HirKind};
use regex_syntax::ParserBuilder;

use crate::pattern::{Alphabet, Pattern};
use crate::{Error, Result};

/// Parse pattern text into a [`Pattern`] over the given alphabet.
pub fn parse(pattern: &str, alphabet: &Alphabet) -> Result<Pattern> {
    let hir = ParserBuilder::new()
        .build()
        .parse(pattern)
        .map_err(|e| Error::Parse(e.to_string()))?;
    from_hir(&hir, alphabet)
}

fn from_hir(hir: &Hir, alphabet: &Alphabet) -> Result<Pattern> {
    match hir.kind() {
        HirKind::Empty => Err(Error::UnsupportedFeature(
            "empty subexpression".to_string(),
        )),
        HirKind::Literal(literal) => {
            let text = std::str::from_utf8(&literal.0)
                .map_err(|_| Error::UnsupportedFeature("non-UTF-8 literal".to_string()))?;
            Ok(Pattern::literal_str(text))
        }
        HirKind::Class(class) => Ok(selection_for(class, alphabet)),
        HirKind::Look(_) => Err(Error::UnsupportedFeature(
            "lookaround assertions".to_string(),
        )),
        HirKind::Repetition(rep) => {
            let sub = from_hir(&rep.sub, alphabet)?;
            Ok(repetition_for(sub, rep.min as usize, rep.max.map(|m| m as usize)))
        }
        // Capturing is a non-goal; a capture group is just its sub-pattern.
        HirKind::Capture(capture) => from_hir(&capture.sub, alphabet),
        HirKind::Concat(parts) => {
            let patterns: Result<Vec<Pattern>> =
                parts.iter().map(|p| from_hir(p, alphabet)).collect();
            Ok(Pattern::Sequence(patterns?))
        }
        HirKind::Alternation(parts) => {
            let patterns: Result<Vec<Pattern>> =
                parts.iter().map(|p| from_hir(p, alphabet)).collect();
            Ok(Pattern::Or(patterns?))
        }
    }
}

/// The alphabet characters the class covers, as a non-negated selection.
fn selection_for(class: &Class, alphabet: &Alphabet) -> Pattern {
    let chars: BTreeSet<char> = match class {
        Class::Unicode(unicode) => alphabet
            .chars()
            .filter(|&c| unicode.iter().any(|r| r.start() <= c && c <= r.end()))
            .collect(),
        Class::Bytes(bytes) => alphabet
            .chars()
            .filter(|&c| {
                u8::try_from(c)
                    .map(|b| bytes.iter().any(|r| r.start() <= b && b <= r.end()))
                    .unwrap_or(false)
            })
            .collect(),
    };
    Pattern::Selection {
        chars,
        negated: false,
    }
}

fn repetition_for(sub: Pattern, min: usize, max: Option<usize>) -> Pattern {
    match (min, max) {
        (0, Some(1)) => Pattern::Maybe(Box::new(sub)),
        (0, None) => Pattern::Star(Box::new(sub)),
        (1, None) => Pattern::Plus(Box::new(sub)),
        // {n,}: n - 1 mandatory copies followed by one-or-more.
        (min, None) => {
            let mut parts: Vec<Pattern> = std::iter::repeat(sub.clone()).take(min - 1).collect();
            parts.push(Pattern::Plus(Box::new(sub)));
            Pattern::Sequence(parts)
        }
        (min, Some(max)) => Pattern::Repeat {
            pattern: Box::new(sub),
            min,
            max,
        },
    }
}
