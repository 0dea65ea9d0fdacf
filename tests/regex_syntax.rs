//! Pattern forms the compiler must reject, and ones it must accept in full.

use shrike::{
    Ascii, BuildConfig, BuildError, LexerBuilder, Pattern, PositionContext, RegexErrorKind,
    UnicodeFolded,
    automata::{Nfa, compile_patterns},
    regex::{self, Node},
};

fn rejected(pattern: &str) -> RegexErrorKind {
    match compile_patterns([(pattern, false)], &Ascii, &BuildConfig::default()) {
        Err(BuildError::Regex { index, source }) => {
            assert_eq!(index, 0);
            assert_eq!(source.pattern, pattern);
            source.kind
        }
        other => panic!("{pattern:?} should not compile, got {other:?}"),
    }
}

#[test]
fn invalid_forms_yield_no_automaton() {
    assert_eq!(rejected(""), RegexErrorKind::EmptyPattern);
    assert_eq!(rejected("["), RegexErrorKind::UnterminatedClass);
    assert_eq!(rejected("[abc"), RegexErrorKind::UnterminatedClass);
    assert_eq!(rejected("[]"), RegexErrorKind::EmptyClass);
    assert_eq!(rejected("[^]"), RegexErrorKind::EmptyClass);
    assert_eq!(rejected("+"), RegexErrorKind::DanglingQuantifier('+'));
    assert_eq!(rejected("*"), RegexErrorKind::DanglingQuantifier('*'));
    assert_eq!(rejected("a{a}"), RegexErrorKind::InvalidBound);
    assert_eq!(rejected("\\"), RegexErrorKind::TrailingEscape);
    assert_eq!(rejected("\\1"), RegexErrorKind::BackReference('1'));
}

#[test]
fn one_bad_pattern_aborts_the_whole_set() {
    let err = compile_patterns(
        [("[0-9]+", false), ("if", true), ("a{", false)],
        &Ascii,
        &BuildConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, BuildError::Regex { index: 2, .. }));
    assert!(err.to_string().contains("a{"), "{err}");
}

#[test]
fn valid_patterns_accept_their_whole_string() {
    let cases = [
        ("abc", "abc"),
        ("a|bc", "bc"),
        ("(ab)*c", "ababc"),
        ("x+y?", "xxx"),
        ("[a-f0-9]{2,4}", "e3f"),
        ("a{3}", "aaa"),
        ("a{2,}", "aaaaa"),
        (r"\d+\.\d+", "3.14"),
        (r"[^\n]*", "no newline here"),
        (r"\w+@\w+", "user@host"),
        (r"\(\)\[\]", "()[]"),
        ("[-+]?[0-9]+", "-42"),
        (".", "%"),
    ];
    for (pattern, text) in cases {
        let lx = LexerBuilder::new(Ascii)
            .pattern(Pattern::new(pattern, |s, _| s.to_string()))
            .build()
            .unwrap_or_else(|e| panic!("{pattern:?}: {e}"));
        let scan = lx.build(text, &PositionContext::new()).unwrap();
        assert_eq!(scan.result.as_deref(), Ok(text), "pattern {pattern:?}");
        assert_eq!(scan.lexeme, text);
        assert!(scan.remainder.is_empty());
    }
}

#[test]
fn nested_repeats_are_sized_before_building() {
    for pattern in ["(a{1000}){1000}", "((a{1000}){1000}){1000}"] {
        match rejected(pattern) {
            RegexErrorKind::TooManyStates { states, limit } => {
                assert!(states > limit, "{pattern}: {states} <= {limit}");
                assert_eq!(limit, BuildConfig::default().max_nfa_states);
            }
            other => panic!("{pattern:?}: unexpected {other:?}"),
        }
    }

    // a rejected pattern leaves the arena untouched
    let mut nfa = Nfa::new();
    regex::compile_into(&mut nfa, "ab", &Ascii, &BuildConfig::default()).unwrap();
    let before = nfa.len();
    let config = BuildConfig::default().with_max_nfa_states(100);
    let err = regex::compile_into(&mut nfa, "(a{10}){10}", &Ascii, &config).unwrap_err();
    assert!(matches!(err.kind, RegexErrorKind::TooManyStates { limit: 100, .. }));
    assert_eq!(nfa.len(), before);
}

#[test]
fn single_pattern_entry_points() {
    assert!(matches!(
        regex::parse("if|else", &Ascii, 10).unwrap(),
        Node::Alt(branches) if branches.len() == 2
    ));

    let (nfa, frag) = regex::compile("ab", &Ascii).unwrap();
    assert_eq!(nfa.len(), 4);
    assert!(!nfa.accepts_empty(frag));
    let (nfa, frag) = regex::compile("a*", &Ascii).unwrap();
    assert!(nfa.accepts_empty(frag));

    let err = regex::compile("(a{1000}){1000}", &Ascii).unwrap_err();
    assert!(matches!(err.kind, RegexErrorKind::TooManyStates { .. }));
}

#[test]
fn folded_letters_must_come_from_classes() {
    let build = |pattern: &str| {
        LexerBuilder::new(UnicodeFolded)
            .pattern(Pattern::new(pattern, |s, _| s.to_string()))
            .build()
    };
    for (pattern, bad) in [("é", 'é'), ("[à-ü]+", 'à'), ("x[ж]", 'ж')] {
        match build(pattern) {
            Err(BuildError::Regex { source, .. }) => {
                assert_eq!(source.kind, RegexErrorKind::FoldedCharacter(bad));
            }
            other => panic!("{pattern:?}: unexpected {other:?}"),
        }
    }

    // ASCII literals are exact, so they never match folded input
    let lx = build("[a-z]+").unwrap();
    assert!(lx.build("ж", &PositionContext::new()).unwrap().result.is_err());
}

#[test]
fn range_ending_in_a_class_is_its_own_error() {
    assert_eq!(rejected(r"[a-\d]"), RegexErrorKind::InvalidRangeEnd('a'));
}
