//! Virtual machine for CHIP-8 and its SCHIP high resolution extension, plus
//! an assembler for its mnemonic language.
//!
//! A host drives the machine: it calls [`Machine::step_frame`] once per
//! display refresh, [`Machine::step_instruction`] some number of times per
//! frame, forwards key events through [`Machine::set_key`] and renders
//! [`Machine::display`].

mod asm;
mod display;
mod error;
mod instruction;
mod interpreter;
mod keyboard;
mod machine;
mod opcode;
mod quirks;
pub mod state;

pub use asm::{assemble, AsmError, AsmErrorKind};
pub use display::{Display, HIRES_HEIGHT, HIRES_WIDTH, LORES_HEIGHT, LORES_WIDTH};
pub use error::MachineError;
pub use instruction::Instruction;
pub use keyboard::{Keypad, KEY_COUNT};
pub use machine::{Machine, Status};
pub use opcode::{decode, disassemble, Opcode, OpcodeMatch, OPCODE_TABLE};
pub use quirks::{Quirks, UnknownPreset};
pub use state::State;
