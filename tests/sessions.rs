//! Session independence: determinism, resumption, parallel use of one lexer.
//!
//! Generated inputs come from the shared generator; set SESSIONS_SEED to
//! replay a particular run.

use std::thread;

use rand::{SeedableRng, rngs::StdRng};
use shrike::{
    Ascii, Lexer, LexerBuilder, Pattern, PositionContext, Token, TokenKind,
    dev::generator::gen_valid_source, lexer::default_patterns,
};

fn env_u64(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(default)
}

fn default_lexer() -> Lexer<Token<TokenKind>> {
    LexerBuilder::new(Ascii).patterns(default_patterns()).build().unwrap()
}

fn ints_and_spaces() -> Lexer<Token<&'static str>> {
    LexerBuilder::new(Ascii)
        .pattern(Pattern::token(r"\d+", "INTEGER"))
        .pattern(Pattern::token(r"\s+", "WHITESPACE"))
        .build()
        .unwrap()
}

#[test]
fn independent_sessions_agree() {
    let lx = default_lexer();
    let seed = env_u64("SESSIONS_SEED", 42);
    let src = gen_valid_source(&mut StdRng::seed_from_u64(seed), 4_000);

    let mut a = lx.stream(&src, PositionContext::new());
    let mut b = lx.stream(&src, PositionContext::new());
    let ta: Vec<_> = a.by_ref().collect::<Result<_, _>>().unwrap();
    let tb: Vec<_> = b.by_ref().collect::<Result<_, _>>().unwrap();
    assert_eq!(ta, tb);
    assert_eq!(a.context(), b.context());
    assert_eq!(a.context().offset(), src.chars().count());
}

#[test]
fn splitting_at_a_token_boundary_changes_nothing() {
    let lx = ints_and_spaces();
    let whole = lx.tokenize("123 456").unwrap();

    let mut first = lx.stream("123", PositionContext::new());
    let mut split: Vec<_> = first.by_ref().collect::<Result<_, _>>().unwrap();
    let resumed = first.context().clone();
    split.extend(lx.stream(" 456", resumed).collect::<Result<Vec<_>, _>>().unwrap());

    assert_eq!(whole, split);
    assert_eq!(split[2].offset, 4);
    assert_eq!(split[2].column, 5);
}

#[test]
fn generated_sources_split_anywhere_between_tokens() {
    let lx = default_lexer();
    let mut rng = StdRng::seed_from_u64(env_u64("SESSIONS_SEED", 7));
    for round in 0..8 {
        let src = gen_valid_source(&mut rng, 600);
        let whole = lx.tokenize(&src).unwrap();

        // cut before the middle token
        let cut = &whole[whole.len() / 2];
        let byte = src.char_indices().nth(cut.offset).map_or(src.len(), |(i, _)| i);
        let (head, tail) = src.split_at(byte);

        let mut s1 = lx.stream(head, PositionContext::new());
        let mut parts: Vec<_> = s1.by_ref().collect::<Result<_, _>>().unwrap();
        let ctx = s1.context().clone();
        parts.extend(lx.stream(tail, ctx).collect::<Result<Vec<_>, _>>().unwrap());

        assert_eq!(whole, parts, "round {round}");
    }
}

#[test]
fn tokenize_many_matches_sequential_runs() {
    let lx = default_lexer();
    let mut rng = StdRng::seed_from_u64(3);
    let mut sources: Vec<String> = (0..16).map(|_| gen_valid_source(&mut rng, 800)).collect();
    sources.push("let s = \"open".to_string());

    let parallel = lx.tokenize_many(&sources);
    assert_eq!(parallel.len(), sources.len());
    for (src, got) in sources.iter().zip(&parallel) {
        assert_eq!(got, &lx.tokenize(src));
    }
    assert!(parallel.last().unwrap().is_err());
}

#[test]
fn clones_share_one_automaton_across_threads() {
    let lx = ints_and_spaces();
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let lx = lx.clone();
            thread::spawn(move || lx.tokenize(&format!("{i} {i}{i}")).unwrap().len())
        })
        .collect();
    for h in handles {
        assert_eq!(h.join().unwrap(), 3);
    }
}

#[test]
fn older_context_stays_a_valid_resumption_point() {
    let lx = ints_and_spaces();
    let start = PositionContext::new();
    let first = lx.build("12 3", &start).unwrap();
    let _second = lx.build(first.remainder, &first.context).unwrap();

    // replaying from the untouched start gives the same first token
    let again = lx.build("12 3", &start).unwrap();
    assert_eq!(again.result, first.result);
    assert_eq!(again.context, first.context);
}
