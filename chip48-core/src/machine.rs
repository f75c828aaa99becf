use rand::{rngs::StdRng, SeedableRng};

use crate::{
    opcode, state::MAX_PROGRAM_SIZE, Display, Instruction, MachineError, Quirks, State,
};

/// Where the fetch-execute cycle currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Running,
    /// Suspended until a key is pressed.
    AwaitingKey,
    /// Suspended until the next frame tick.
    AwaitingFrame,
}

/// The virtual machine. A host calls [`step_frame`](Self::step_frame) once
/// per display refresh and [`step_instruction`](Self::step_instruction) as
/// many times per frame as it wants the program to run.
pub struct Machine {
    pub(crate) state: State,
    pub(crate) quirks: Quirks,
    pub(crate) rng: StdRng,
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}

impl Machine {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Deterministic `RND` results, for tests and replays.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            state: State::default(),
            quirks: Quirks::default(),
            rng,
        }
    }

    /// Resets everything, then places `program` at 0x200.
    pub fn load(&mut self, program: &[u8], quirks: Quirks) -> Result<(), MachineError> {
        if program.len() > MAX_PROGRAM_SIZE {
            return Err(MachineError::ProgramTooLarge {
                size: program.len(),
            });
        }
        self.state = State::default();
        self.state.load_program(program);
        self.quirks = quirks;
        log::info!("program loaded, size: {} bytes", program.len());
        Ok(())
    }

    /// Runs one instruction, or does nothing while suspended.
    ///
    /// On failure the program counter has already moved past the offending
    /// instruction.
    pub fn step_instruction(&mut self) -> Result<(), MachineError> {
        if self.status() != Status::Running {
            return Ok(());
        }

        let address = self.state.program_counter;
        let instruction = self.state.fetch();
        self.state.program_counter = self.state.program_counter.wrapping_add(2);

        let Some(opcode) = opcode::decode(instruction) else {
            log::error!(
                "unknown instruction {:04X} at {:03X}",
                instruction.word(),
                address
            );
            return Err(MachineError::UnknownInstruction {
                address,
                word: instruction.word(),
            });
        };

        if log::log_enabled!(log::Level::Trace) {
            if let Some(text) = opcode::disassemble(instruction) {
                log::trace!("{address:03X}: {:04X} {text}", instruction.word());
            }
        }

        self.execute(opcode, instruction, address)
    }

    /// The 60 Hz tick: counts both timers down and releases a frame wait.
    pub fn step_frame(&mut self) {
        self.state.delay_timer = self.state.delay_timer.saturating_sub(1);
        self.state.sound_timer = self.state.sound_timer.saturating_sub(1);
        self.state.frame_pending = false;
    }

    pub fn set_key(&mut self, key: u8, pressed: bool) {
        if key > 0xF {
            log::warn!("ignoring key {key:#x}, the keypad has 16 keys");
            return;
        }
        self.state.keypad.set(key, pressed);
        if pressed {
            if let Some(register) = self.state.key_wait.take() {
                *self.state.register_mut(register) = key;
                log::trace!("key {key:X} -> V{register:X}");
            }
        }
    }

    /// Swaps quirks without touching any other state.
    pub fn set_quirks(&mut self, quirks: Quirks) {
        self.quirks = quirks;
    }

    pub fn quirks(&self) -> Quirks {
        self.quirks
    }

    pub fn status(&self) -> Status {
        if self.state.key_wait.is_some() {
            Status::AwaitingKey
        } else if self.state.frame_pending && self.quirks.display_wait {
            Status::AwaitingFrame
        } else {
            Status::Running
        }
    }

    /// Whether a draw happened since the last frame tick.
    pub fn frame_pending(&self) -> bool {
        self.state.frame_pending
    }

    pub fn sound_active(&self) -> bool {
        self.state.sound_timer > 0
    }

    pub fn display(&self) -> &Display {
        &self.state.display
    }

    pub fn is_hires(&self) -> bool {
        self.state.display.is_hires()
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    /// The word the next step would execute.
    pub fn next_instruction(&self) -> Instruction {
        self.state.fetch()
    }
}
