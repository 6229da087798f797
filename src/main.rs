use lexparse::lexer::{Lexer, Rule};
use lexparse::matcher::Matcher;
use lexparse::nfa::Nfa;
use lexparse::pattern::Alphabet;
use lexparse::{compile, syntax, to_dfa};

fn main() {
    println!("Regex -> Thompson NFA Compiler and Lexer Demo");
    println!("=============================================");

    let alphabet = Alphabet::ascii_printable();
    let test_patterns = vec![
        "ab",
        "a*",
        "a+",
        "a?",
        "a|b",
        "[abc]",
        "[^abc]",
        "a{2,4}",
        "[bm]e*(at|f{4})",
    ];

    for pattern in test_patterns {
        println!("\n=== Pattern: '{}' ===", pattern);

        let parsed = match syntax::parse(pattern, &alphabet) {
            Ok(parsed) => parsed,
            Err(e) => {
                println!("Failed to parse pattern: {}", e);
                continue;
            }
        };
        println!("AST: {}", parsed);

        let nfa = compile(&parsed, &alphabet);
        print_nfa(&nfa);

        let dfa = to_dfa(&nfa);
        println!(
            "DFA: {} states ({} reachable) from {} NFA states",
            dfa.state_count(),
            dfa.reachable().len(),
            nfa.state_count()
        );
    }

    demonstrate_matching(&alphabet);
    demonstrate_lexing(&alphabet);
}

fn print_nfa(nfa: &Nfa) {
    println!("Start state: {}", nfa.start);
    println!("Accepting states: {:?}", nfa.accepting);
    println!("States:");
    for state in nfa.reachable() {
        print!("  {}:", state);
        for (label, destination) in nfa.edges(state) {
            print!(" {} -> {}", label, destination);
        }
        println!();
    }
}

fn demonstrate_matching(alphabet: &Alphabet) {
    println!("\n=== Longest-Match Simulation ===");
    let pattern = match syntax::parse("[bm]e*(at|f{4})", alphabet) {
        Ok(pattern) => pattern,
        Err(e) => {
            println!("Failed to parse pattern: {}", e);
            return;
        }
    };
    let nfa = compile(&pattern, alphabet);
    let matcher = Matcher::new(&nfa);
    for candidate in ["beef", "beeeeeeeeffff", "meat", "beaffff"] {
        println!("  {:?} -> {}", candidate, matcher.is_match(candidate));
    }
}

fn demonstrate_lexing(alphabet: &Alphabet) {
    println!("\n=== Lexing ===");
    let rules = [
        ("number", "[0-9]+", true),
        ("ident", "[a-z][a-z0-9]*", true),
        ("op", "[-+*/=]", true),
        ("space", " +", false),
    ];
    let rules: Result<Vec<Rule>, _> = rules
        .iter()
        .map(|&(name, text, emitted)| {
            Rule::from_text(name, text, alphabet).map(|mut rule| {
                rule.emitted = emitted;
                rule
            })
        })
        .collect();
    let rules = match rules {
        Ok(rules) => rules,
        Err(e) => {
            println!("Failed to build rules: {}", e);
            return;
        }
    };

    let lexer = match Lexer::new(rules, alphabet) {
        Ok(lexer) => lexer,
        Err(e) => {
            println!("Failed to build lexer: {}", e);
            return;
        }
    };

    let input = "x1 = 40 + 2";
    println!("Input: {:?}", input);
    for token in lexer.lex(input.chars()) {
        match token {
            Ok(token) => println!("  {:<8} {:?}", token.kind, token.text),
            Err(e) => println!("  error: {}", e),
        }
    }
}
