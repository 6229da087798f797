use quickcheck::quickcheck;

use lexparse::matcher::Matcher;
use lexparse::pattern::{Alphabet, Pattern};
use lexparse::source::RewindSource;
use lexparse::{compile, syntax, to_dfa};

/// Map arbitrary bytes onto a tiny alphabet so random inputs actually
/// exercise the automata instead of missing on the first character.
fn small_input(bytes: &[u8]) -> String {
    bytes.iter().map(|b| (b'a' + (b % 3)) as char).collect()
}

fn patterns(alphabet: &Alphabet) -> Vec<Pattern> {
    ["a*", "a+b", "(ab|c)*", "a{2,4}c?", "[ab]+c", "a(b|c)*a"]
        .iter()
        .map(|text| syntax::parse(text, alphabet).unwrap())
        .collect()
}

quickcheck! {
    fn dfa_agrees_with_nfa_on_random_inputs(bytes: Vec<u8>) -> bool {
        let alphabet = Alphabet::new("abc".chars());
        let input = small_input(&bytes);
        patterns(&alphabet).iter().all(|pattern| {
            let nfa = compile(pattern, &alphabet);
            let dfa = to_dfa(&nfa);
            Matcher::new(&nfa).is_match(&input) == dfa.is_match(&input)
        })
    }

    fn rewind_restores_the_whole_stream(bytes: Vec<u8>, reads: usize) -> bool {
        let input = small_input(&bytes);
        let mut source = RewindSource::new(input.chars());
        for _ in 0..reads.min(input.len() + 2) {
            source.get();
        }
        source.rewind();
        let replay: String = std::iter::from_fn(|| source.get()).collect();
        replay == input
    }

    fn longest_match_text_is_a_matching_prefix(bytes: Vec<u8>) -> bool {
        let alphabet = Alphabet::new("abc".chars());
        let input = small_input(&bytes);
        patterns(&alphabet).iter().all(|pattern| {
            let nfa = compile(pattern, &alphabet);
            let matcher = Matcher::new(&nfa);
            let mut source = RewindSource::new(input.chars());
            let m = matcher.longest_match(&mut source);
            if m.is_miss() {
                // A miss leaves the source fully rewound.
                let rest: String = std::iter::from_fn(|| source.get()).collect();
                return rest == input;
            }
            // The committed text plus the remainder is the original input,
            // and the pattern matches the committed text exactly.
            let rest: String = std::iter::from_fn(|| source.get()).collect();
            format!("{}{}", m.text, rest) == input && matcher.is_match(&m.text)
        })
    }
}
