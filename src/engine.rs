//! The execution engine: walks a translated [`Program`] against a [`Tape`].
//!
//! Features and behaviors:
//! - The tape is unbounded in both directions and initialized to 0.
//! - Arithmetic wraps modulo 256.
//! - `,` reads one byte from the input; what happens on EOF is an [`EofPolicy`].
//! - `.` writes the current cell as a raw byte.
//! - Output is flushed before every read and when the program halts.

use std::fmt;
use std::io::{self, Read, Write};
use std::str::FromStr;

use crate::tape::Tape;
use crate::translator::{Op, Program};

/// Errors raised by the input or output collaborator during a run.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("I/O error at instruction {cursor}: {source}")]
    Io {
        cursor: usize,
        #[source]
        source: io::Error,
    },
}

/// What `,` stores when the input is exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EofPolicy {
    /// Store 0.
    #[default]
    Zero,
    /// Leave the cell as it was.
    Unchanged,
    /// Store 255, i.e. C's `EOF` truncated to a byte.
    AllOnes,
}

impl fmt::Display for EofPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EofPolicy::Zero => write!(f, "zero"),
            EofPolicy::Unchanged => write!(f, "unchanged"),
            EofPolicy::AllOnes => write!(f, "all-ones"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown EOF policy '{0}' (expected zero, unchanged or all-ones)")]
pub struct ParseEofPolicyError(String);

impl FromStr for EofPolicy {
    type Err = ParseEofPolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "zero" | "0" => Ok(EofPolicy::Zero),
            "unchanged" | "keep" => Ok(EofPolicy::Unchanged),
            "all-ones" | "255" | "-1" => Ok(EofPolicy::AllOnes),
            _ => Err(ParseEofPolicyError(s.to_string())),
        }
    }
}

/// Interpreter state for a single run: the tape, the instruction cursor and
/// the EOF policy.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    tape: Tape,
    cursor: usize,
    steps: u64,
    eof: EofPolicy,
}

impl Engine {
    /// An engine with a fresh default tape.
    pub fn new(eof: EofPolicy) -> Self {
        Self::with_tape(Tape::new(), eof)
    }

    /// An engine over a caller-provided tape.
    pub fn with_tape(tape: Tape, eof: EofPolicy) -> Self {
        Self {
            tape,
            cursor: 0,
            steps: 0,
            eof,
        }
    }

    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    /// Instructions dispatched by the last call to [`Engine::run`], halt included.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Execute `program` until it reaches its halt instruction.
    ///
    /// The tape is kept between calls; the cursor restarts at slot 0.
    /// A program that never halts never returns.
    pub fn run<R, W>(&mut self, program: &Program, input: &mut R, output: &mut W) -> Result<(), RunError>
    where
        R: Read + ?Sized,
        W: Write + ?Sized,
    {
        let code = program.instructions();
        self.cursor = 0;
        self.steps = 0;

        loop {
            self.steps += 1;
            match code[self.cursor].op {
                Op::JumpIfZero(distance) => {
                    if self.tape.get() == 0 {
                        self.cursor += distance;
                    }
                }
                Op::JumpIfNonZero(distance) => {
                    if self.tape.get() != 0 {
                        self.cursor -= distance;
                    }
                }
                Op::ShiftRight(distance) => self.tape.shift_right(distance),
                Op::ShiftLeft(distance) => self.tape.shift_left(distance),
                Op::Increment(delta) => self.tape.add(delta),
                Op::ReadByte => self.read_byte(input, output)?,
                Op::WriteByte => {
                    let byte = [self.tape.get()];
                    output.write_all(&byte).map_err(|source| self.io_error(source))?;
                }
                Op::Halt => break,
            }
            // A taken jump lands on its partner bracket; step past it.
            self.cursor += 1;
        }

        output.flush().map_err(|source| self.io_error(source))?;
        tracing::debug!(steps = self.steps, segments = self.tape.segment_count(), "program halted");
        Ok(())
    }

    fn read_byte<R, W>(&mut self, input: &mut R, output: &mut W) -> Result<(), RunError>
    where
        R: Read + ?Sized,
        W: Write + ?Sized,
    {
        output.flush().map_err(|source| self.io_error(source))?;

        let mut buf = [0u8; 1];
        loop {
            match input.read(&mut buf) {
                Ok(0) => {
                    match self.eof {
                        EofPolicy::Zero => self.tape.set(0),
                        EofPolicy::Unchanged => {}
                        EofPolicy::AllOnes => self.tape.set(u8::MAX),
                    }
                    return Ok(());
                }
                Ok(_) => {
                    self.tape.set(buf[0]);
                    return Ok(());
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(source) => return Err(self.io_error(source)),
            }
        }
    }

    fn io_error(&self, source: io::Error) -> RunError {
        RunError::Io {
            cursor: self.cursor,
            source,
        }
    }
}
