// src/dev/generator.rs
// Random sources that the built-in token set always lexes without error.
// Every token is followed by whitespace, so adjacent tokens never fuse and
// the token count of a source is known while it is generated.

use rand::Rng;

pub fn gen_valid_source<R: Rng>(rng: &mut R, target_len: usize) -> String {
    let mut out = String::with_capacity(target_len + target_len / 8);

    while out.len() < target_len {
        let roll = rng.random_range(0u32..100);

        match roll {
            0..=24 => push_ident(rng, &mut out),
            25..=36 => push_int(rng, &mut out),
            37..=44 => push_double(rng, &mut out),
            45..=51 => push_string(rng, &mut out),
            52..=57 => push_line_comment(rng, &mut out),
            58..=64 => push_block_comment(rng, &mut out),
            65..=69 => push_keyword(rng, &mut out),
            70..=99 => push_operator(rng, &mut out),
            _ => unreachable!(),
        }
        push_ws(rng, &mut out);
    }

    out
}

fn push_ident<R: Rng>(rng: &mut R, out: &mut String) {
    let len = rng.random_range(1..=12);
    out.push(random_alpha(rng));
    for _ in 1..len {
        if rng.random_bool(0.6) {
            out.push(random_alpha(rng));
        } else {
            out.push(random_digit(rng));
        }
    }
}

fn push_int<R: Rng>(rng: &mut R, out: &mut String) {
    let len = rng.random_range(1..=8);
    for _ in 0..len {
        out.push(random_digit(rng));
    }
}

fn push_double<R: Rng>(rng: &mut R, out: &mut String) {
    push_int(rng, out);
    out.push('.');
    push_int(rng, out);
}

fn push_string<R: Rng>(rng: &mut R, out: &mut String) {
    const BODY: &str = "abcdefghijklmnopqrstuvwxyz0123456789 +-*/(){}<>=!&|";
    let bytes = BODY.as_bytes();
    out.push('"');
    for _ in 0..rng.random_range(0..=16) {
        if rng.random_bool(0.1) {
            // escapes: any non-newline char may follow a backslash
            out.push('\\');
            out.push(if rng.random_bool(0.5) { '"' } else { 'n' });
        } else {
            out.push(bytes[rng.random_range(0..bytes.len())] as char);
        }
    }
    out.push('"');
}

fn push_ws<R: Rng>(rng: &mut R, out: &mut String) {
    let opts: [char; 4] = [' ', '\t', '\r', '\n'];
    let len = rng.random_range(1..=4);
    for _ in 0..len {
        out.push(opts[rng.random_range(0..opts.len())]);
    }
}

fn push_line_comment<R: Rng>(rng: &mut R, out: &mut String) {
    out.push_str("//");
    const ALPH: &str =
        "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789 +-*/&|![]{}()<>=*&";
    let bytes = ALPH.as_bytes();
    for _ in 0..rng.random_range(0..=40) {
        out.push(bytes[rng.random_range(0..bytes.len())] as char);
    }
    out.push('\n');
}

fn push_block_comment<R: Rng>(rng: &mut R, out: &mut String) {
    out.push_str("/*");
    // no '/' in the body, so "*/" can only appear at the end
    const BODY: &str =
        "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789 +-![]{}()<>=&|";
    let bytes = BODY.as_bytes();
    for _ in 0..rng.random_range(0..=15) {
        for _ in 0..rng.random_range(1..=8) {
            out.push(bytes[rng.random_range(0..bytes.len())] as char);
        }
        if rng.random_bool(0.2) {
            out.push('*');
        }
        if rng.random_bool(0.2) {
            out.push('\n');
        }
    }
    out.push_str("*/");
}

fn push_keyword<R: Rng>(rng: &mut R, out: &mut String) {
    let kws = ["if", "else", "while", "return", "fn", "let"];
    out.push_str(kws[rng.random_range(0..kws.len())]);
}

fn push_operator<R: Rng>(rng: &mut R, out: &mut String) {
    let ops = [
        "(", ")", "+", "-", "*", "=", "/", "!", "[", "]", "{", "}", "<", "<=", ">", ">=", "==",
        "!=", "&", "&&", "|", "||", ",", ";",
    ];
    out.push_str(ops[rng.random_range(0..ops.len())]);
}

fn random_alpha<R: Rng>(rng: &mut R) -> char {
    const A: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ_";
    A[rng.random_range(0..A.len())] as char
}

fn random_digit<R: Rng>(rng: &mut R) -> char {
    (b'0' + rng.random_range(0..10u8)) as char
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn same_seed_same_source() {
        let a = gen_valid_source(&mut StdRng::seed_from_u64(7), 500);
        let b = gen_valid_source(&mut StdRng::seed_from_u64(7), 500);
        assert_eq!(a, b);
        assert!(a.len() >= 500);
    }
}
