//! Translation of Brainfuck source into a flat, directly executable program.
//!
//! The translator consumes the source one byte at a time:
//! - bytes outside `><+-.,[]` are skipped and never affect slot numbering,
//! - runs of `>`/`<` fold into one shift and runs of `+`/`-` into one increment,
//! - brackets are resolved into slot distances, so the engine never scans for a match,
//! - the program always ends with [`Op::Halt`].
//!
//! ```
//! use segbf::{Op, Program};
//!
//! let program = Program::from_bytes(b"+++[->>+<<]").unwrap();
//! assert_eq!(program.instructions()[0].op, Op::Increment(3));
//! assert_eq!(program.instructions()[1].op, Op::JumpIfZero(5));
//! assert_eq!(program.instructions()[6].op, Op::JumpIfNonZero(5));
//! assert_eq!(program.instructions()[7].op, Op::Halt);
//! ```

use std::fmt;
use std::io::{self, BufReader, Read};

/// Errors that can occur while translating Brainfuck source.
#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    /// A `]` was found with no pending `[`.
    #[error("unexpected closing bracket at byte {offset}")]
    UnmatchedClose { offset: usize },

    /// The source ended while `[` brackets were still open.
    #[error("program doesn't have enough closing brackets ({count} unmatched, innermost at byte {offset})")]
    UnmatchedOpen { offset: usize, count: usize },

    /// The byte source itself failed.
    #[error("failed to read program: {source}")]
    Io {
        #[source]
        source: io::Error,
    },
}

impl TranslateError {
    /// Source byte offset the error points at, if any.
    pub fn offset(&self) -> Option<usize> {
        match self {
            TranslateError::UnmatchedClose { offset } => Some(*offset),
            TranslateError::UnmatchedOpen { offset, .. } => Some(*offset),
            TranslateError::Io { .. } => None,
        }
    }
}

/// A single operation together with its magnitude.
///
/// Jump payloads are the distance in instruction slots between the two
/// brackets of a pair; both sides of a pair carry the same distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    JumpIfZero(usize),
    JumpIfNonZero(usize),
    ShiftRight(usize),
    ShiftLeft(usize),
    /// Signed delta, applied with 8-bit wraparound.
    Increment(i64),
    ReadByte,
    WriteByte,
    Halt,
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Op::JumpIfZero(d) => write!(f, "jz    +{d}"),
            Op::JumpIfNonZero(d) => write!(f, "jnz   -{d}"),
            Op::ShiftRight(n) => write!(f, "shr   {n}"),
            Op::ShiftLeft(n) => write!(f, "shl   {n}"),
            Op::Increment(n) => write!(f, "inc   {n}"),
            Op::ReadByte => write!(f, "read"),
            Op::WriteByte => write!(f, "write"),
            Op::Halt => write!(f, "halt"),
        }
    }
}

/// One instruction slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub op: Op,
    /// Byte offset of the first source symbol folded into this slot.
    pub offset: usize,
}

/// A translated, immutable program. The last instruction is always [`Op::Halt`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    instructions: Box<[Instruction]>,
}

impl Program {
    /// Translate an in-memory source.
    pub fn from_bytes(source: &[u8]) -> Result<Self, TranslateError> {
        translate(source)
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Number of slots, including the trailing halt.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// True when the program consists of nothing but the trailing halt.
    pub fn is_halt_only(&self) -> bool {
        self.instructions.len() <= 1
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SLOT  | BYTE   | OP")?;
        writeln!(f, "------+--------+----------")?;
        for (slot, inst) in self.instructions.iter().enumerate() {
            writeln!(f, "{:<5} | {:<6} | {}", slot, inst.offset, inst.op)?;
        }
        Ok(())
    }
}

/// Translate a byte stream into a [`Program`].
///
/// Fails on the first `]` without a pending `[`, or after the whole stream
/// has been consumed if any `[` is left open.
pub fn translate<R: Read>(source: R) -> Result<Program, TranslateError> {
    let mut translator = Translator::default();
    let mut consumed = 0usize;

    for (offset, byte) in BufReader::new(source).bytes().enumerate() {
        let byte = byte.map_err(|source| TranslateError::Io { source })?;
        translator.feed(byte, offset)?;
        consumed = offset + 1;
    }

    let program = translator.finish(consumed)?;
    tracing::debug!(
        source_bytes = consumed,
        instructions = program.len(),
        "translated program"
    );
    Ok(program)
}

/// Which accumulator the previous symbol went into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Mode {
    #[default]
    Other,
    Position,
    Value,
}

/// Pre-normalization slot. Shifts carry a signed distance here.
#[derive(Debug, Clone, Copy)]
enum Draft {
    Shift(i64),
    Add(i64),
    Open(usize),
    Close(usize),
    Read,
    Write,
}

#[derive(Default)]
struct Translator {
    drafts: Vec<(Draft, usize)>,
    mode: Mode,
    // Slot indices of pending '['
    open: Vec<usize>,
}

impl Translator {
    fn feed(&mut self, byte: u8, offset: usize) -> Result<(), TranslateError> {
        match byte {
            b'>' => self.fold(Mode::Position, 1, offset),
            b'<' => self.fold(Mode::Position, -1, offset),
            b'+' => self.fold(Mode::Value, 1, offset),
            b'-' => self.fold(Mode::Value, -1, offset),
            b'[' => {
                self.open.push(self.drafts.len());
                self.emit(Draft::Open(0), offset);
            }
            b']' => {
                let Some(open_slot) = self.open.pop() else {
                    return Err(TranslateError::UnmatchedClose { offset });
                };
                let distance = self.drafts.len() - open_slot;
                if let (Draft::Open(d), _) = &mut self.drafts[open_slot] {
                    *d = distance;
                }
                self.emit(Draft::Close(distance), offset);
            }
            b'.' => self.emit(Draft::Write, offset),
            b',' => self.emit(Draft::Read, offset),
            _ => {}
        }
        Ok(())
    }

    fn fold(&mut self, mode: Mode, delta: i64, offset: usize) {
        if self.mode == mode {
            if let Some((Draft::Shift(n) | Draft::Add(n), _)) = self.drafts.last_mut() {
                *n += delta;
                return;
            }
        }

        let draft = match mode {
            Mode::Position => Draft::Shift(delta),
            _ => Draft::Add(delta),
        };
        self.drafts.push((draft, offset));
        self.mode = mode;
    }

    fn emit(&mut self, draft: Draft, offset: usize) {
        self.drafts.push((draft, offset));
        self.mode = Mode::Other;
    }

    fn finish(self, end_offset: usize) -> Result<Program, TranslateError> {
        if let Some(&innermost) = self.open.last() {
            return Err(TranslateError::UnmatchedOpen {
                offset: self.drafts[innermost].1,
                count: self.open.len(),
            });
        }

        let mut instructions: Vec<Instruction> = self
            .drafts
            .into_iter()
            .map(|(draft, offset)| {
                let op = match draft {
                    Draft::Shift(n) if n < 0 => Op::ShiftLeft(n.unsigned_abs() as usize),
                    Draft::Shift(n) => Op::ShiftRight(n as usize),
                    Draft::Add(n) => Op::Increment(n),
                    Draft::Open(d) => Op::JumpIfZero(d),
                    Draft::Close(d) => Op::JumpIfNonZero(d),
                    Draft::Read => Op::ReadByte,
                    Draft::Write => Op::WriteByte,
                };
                Instruction { op, offset }
            })
            .collect();

        instructions.push(Instruction {
            op: Op::Halt,
            offset: end_offset,
        });

        Ok(Program {
            instructions: instructions.into_boxed_slice(),
        })
    }
}
