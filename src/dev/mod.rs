// src/dev/mod.rs
//! Helpers for tests and benchmarks; not part of the lexing API.

pub mod generator;
