//! A Brainfuck interpreter built around a translate-then-run pipeline.
//!
//! Source is first translated into a compact [`Program`]: comments are
//! dropped, runs of `><` and `+-` are folded into single instructions and
//! brackets are resolved into jump distances. The [`Engine`] then executes
//! that program against a [`Tape`] made of fixed-size segments that is
//! allocated lazily in both directions, starting from the middle of the
//! first segment.
//!
//! Features and behaviors:
//! - Unbalanced brackets are rejected before anything runs.
//! - Cells are bytes with wraparound arithmetic.
//! - The tape has no bounds; memory is the only limit.
//! - `,` on EOF follows an [`EofPolicy`] (0 by default).
//!
//! Quick start:
//!
//! ```
//! use segbf::{run_source, EofPolicy};
//!
//! let mut output = Vec::new();
//! run_source(b"++++++++[>++++++++<-]>+.", &mut std::io::empty(), &mut output, EofPolicy::Zero)
//!     .expect("program should run");
//! assert_eq!(output, b"A");
//! ```

pub mod cli_util;
pub mod config;
pub mod engine;
pub mod logging;
pub mod tape;
pub mod translator;

use std::io::{Read, Write};

pub use engine::{Engine, EofPolicy, RunError};
pub use tape::{SEGMENT_SIZE, Tape};
pub use translator::{Instruction, Op, Program, TranslateError, translate};

/// Any error from translating or running a program.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Translate(#[from] TranslateError),
    #[error(transparent)]
    Run(#[from] RunError),
}

/// Translate `source` and run it on a fresh engine.
pub fn run_source<R, W>(source: &[u8], input: &mut R, output: &mut W, eof: EofPolicy) -> Result<(), Error>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let program = Program::from_bytes(source)?;
    Engine::new(eof).run(&program, input, output)?;
    Ok(())
}
