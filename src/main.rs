// src/main.rs
// Lex a file (or stdin) and print one token per line.
// Usage:
//   shrike [--spec rules.txt] [--tables rules.json] [--alphabet ascii|latin1|unicode]
//          [--json] [--keep-trivia] [input]
//
// Without --spec the built-in C-like token set is used. --tables loads a DFA
// written by gen_lex_tables instead of compiling the rules again; it must
// come from the same spec file.

use std::{
    fmt::Debug,
    io::{self, BufWriter, Read, Write},
    path::PathBuf,
    sync::Arc,
};

use anyhow::{Context, Result, bail};
use serde::Serialize;
use shrike::{
    Alphabet, Ascii, BuildConfig, Latin1, Lexer, LexerBuilder, Pattern, Token, UnicodeFolded,
    automata::io::load_tables_json,
    lexer::{
        default_patterns,
        spec_file::{parse_spec, patterns_from_specs},
    },
};

#[derive(Default)]
struct Args {
    spec: Option<PathBuf>,
    tables: Option<PathBuf>,
    alphabet: Option<String>,
    json: bool,
    keep_trivia: bool,
    input: Option<PathBuf>,
}

fn parse_args() -> Result<Args> {
    let mut args = Args::default();
    let mut it = std::env::args().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--spec" => args.spec = Some(it.next().context("--spec needs a path")?.into()),
            "--tables" => args.tables = Some(it.next().context("--tables needs a path")?.into()),
            "--alphabet" => args.alphabet = Some(it.next().context("--alphabet needs a name")?),
            "--json" => args.json = true,
            "--keep-trivia" => args.keep_trivia = true,
            s if s.starts_with("--") => bail!("unknown flag {s}"),
            _ => {
                if args.input.is_some() {
                    bail!("more than one input file given");
                }
                args.input = Some(a.into());
            }
        }
    }
    Ok(args)
}

fn alphabet_named(name: Option<&str>) -> Result<Arc<dyn Alphabet>> {
    Ok(match name.unwrap_or("unicode") {
        "ascii" => Arc::new(Ascii),
        "latin1" => Arc::new(Latin1),
        "unicode" => Arc::new(UnicodeFolded),
        other => bail!("unknown alphabet {other:?} (expected ascii, latin1 or unicode)"),
    })
}

fn make_lexer<T>(
    patterns: Vec<Pattern<T>>,
    alphabet: Arc<dyn Alphabet>,
    tables: Option<&PathBuf>,
) -> Result<Lexer<T>> {
    match tables {
        Some(path) => {
            let dfa = load_tables_json(path, alphabet.as_ref())
                .with_context(|| format!("loading tables from {}", path.display()))?;
            Ok(Lexer::from_tables(dfa, &patterns, alphabet)?)
        }
        None => Ok(LexerBuilder::with_alphabet(alphabet)
            .config(BuildConfig::from_env())
            .patterns(patterns)
            .build()?),
    }
}

fn print_tokens<K: Serialize + Debug>(
    lexer: &Lexer<Token<K>>,
    src: &str,
    json: bool,
    keep: impl Fn(&K) -> bool,
) -> Result<()> {
    let tokens = lexer.tokenize(src)?;
    let mut w = BufWriter::new(io::stdout().lock());
    let mut shown = 0usize;
    for t in tokens.iter().filter(|t| keep(&t.kind)) {
        if json {
            serde_json::to_writer(&mut w, t)?;
            writeln!(w)?;
        } else {
            writeln!(w, "{}:{}\t{:?}\t{:?}", t.line, t.column, t.kind, t.text)?;
        }
        shown += 1;
    }
    w.flush()?;
    log::info!("[shrike] {} tokens ({} shown)", tokens.len(), shown);
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = parse_args()?;
    let alphabet = alphabet_named(args.alphabet.as_deref())?;

    let mut src = String::new();
    match &args.input {
        Some(path) => {
            src = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
        }
        None => {
            io::stdin().read_to_string(&mut src).context("reading stdin")?;
        }
    }

    match &args.spec {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            let specs = parse_spec(&text).with_context(|| format!("in {}", path.display()))?;
            let lexer = make_lexer(patterns_from_specs(&specs), alphabet, args.tables.as_ref())?;
            print_tokens(&lexer, &src, args.json, |_| true)
        }
        None => {
            let lexer = make_lexer(default_patterns(), alphabet, args.tables.as_ref())?;
            let keep_trivia = args.keep_trivia;
            print_tokens(&lexer, &src, args.json, |k| keep_trivia || !k.is_trivia())
        }
    }
}
