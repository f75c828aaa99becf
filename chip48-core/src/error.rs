use std::fmt;

use crate::state::MAX_PROGRAM_SIZE;

/// A failed step or load. The machine stays usable after any of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MachineError {
    /// The word fetched from `address` matches no known instruction.
    UnknownInstruction { address: u16, word: u16 },
    /// `CALL` at `address` with all stack slots in use.
    StackOverflow { address: u16 },
    /// `RET` at `address` with an empty stack.
    StackUnderflow { address: u16 },
    ProgramTooLarge { size: usize },
}

impl fmt::Display for MachineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownInstruction { address, word } => {
                write!(f, "unknown instruction {word:04X} at {address:03X}")
            }
            Self::StackOverflow { address } => write!(f, "stack overflow at {address:03X}"),
            Self::StackUnderflow { address } => write!(f, "stack underflow at {address:03X}"),
            Self::ProgramTooLarge { size } => write!(
                f,
                "program is {size} bytes, at most {MAX_PROGRAM_SIZE} fit in memory"
            ),
        }
    }
}

impl std::error::Error for MachineError {}
