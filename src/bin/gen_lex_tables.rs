// src/bin/gen_lex_tables.rs
// Compile a pattern spec file once and write the DFA to JSON.
// Usage:
//   cargo run --bin gen_lex_tables -- rules.txt                # writes tables/lexer_tables.json
//   cargo run --bin gen_lex_tables -- rules.txt /path/out.json
//
// Without a spec file the built-in token set is compiled. The alphabet is
// picked with SHRIKE_ALPHABET (ascii | latin1 | unicode, default unicode).

use std::{env, fs, path::Path, time::Instant};

use anyhow::{Context, Result, bail};
use shrike::{
    Alphabet, Ascii, BuildConfig, Latin1, UnicodeFolded,
    automata::{FiniteStateMachine, compile_patterns, io::save_tables_json},
    lexer::{default_patterns, spec_file::parse_spec},
};

fn main() -> Result<()> {
    env_logger::init();
    let mut args = env::args().skip(1);
    let spec = args.next().filter(|s| s != "-");
    let out = args
        .next()
        .unwrap_or_else(|| "tables/lexer_tables.json".to_string());
    let out_path = Path::new(&out);

    if let Some(parent) = out_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let alphabet: Box<dyn Alphabet> = match env::var("SHRIKE_ALPHABET").as_deref() {
        Ok("ascii") => Box::new(Ascii),
        Ok("latin1") => Box::new(Latin1),
        Ok("unicode") | Err(_) => Box::new(UnicodeFolded),
        Ok(other) => bail!("unknown SHRIKE_ALPHABET {other:?}"),
    };

    let rules: Vec<(String, bool)> = match &spec {
        Some(path) => {
            let text =
                fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
            parse_spec(&text)
                .with_context(|| format!("in {path}"))?
                .into_iter()
                .map(|s| (s.source, s.strong))
                .collect()
        }
        None => default_patterns()
            .iter()
            .map(|p| (p.source().to_string(), p.is_strong()))
            .collect(),
    };

    println!(
        "[gen_lex_tables] compiling {} patterns from {}…",
        rules.len(),
        spec.as_deref().unwrap_or("<built-in>")
    );
    let t0 = Instant::now();
    let dfa = compile_patterns(
        rules.iter().map(|(src, strong)| (src.as_str(), *strong)),
        alphabet.as_ref(),
        &BuildConfig::from_env(),
    )?;
    println!(
        "[gen_lex_tables] {} states, {} edges, {} accepting ({:.1?})",
        dfa.number_of_states(),
        dfa.transition_count(),
        dfa.accepting_states().count(),
        t0.elapsed()
    );

    save_tables_json(out_path, &dfa, alphabet.as_ref())
        .with_context(|| format!("failed to write {}", out_path.display()))?;
    println!("[gen_lex_tables] wrote {}", out_path.display());
    Ok(())
}
