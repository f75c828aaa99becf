use crate::{Display, Instruction, Keypad};

pub const MEMORY_SIZE: usize = 4096;
pub const PROGRAM_START: u16 = 0x200;
pub const MAX_PROGRAM_SIZE: usize = MEMORY_SIZE - PROGRAM_START as usize;
pub const STACK_SIZE: usize = 16;
pub const REGISTER_COUNT: usize = 16;
pub const FLAG: u8 = 0xF;
pub const ADDRESS_MASK: u16 = 0x0FFF;

/// Bytes per glyph in the built-in font.
pub const GLYPH_SIZE: u16 = 5;

pub const FONT: [u8; 16 * GLYPH_SIZE as usize] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

/// All architectural state. Hosts get it read-only through
/// [`Machine::state`](crate::Machine::state); only instruction handlers write.
#[derive(Debug, Clone)]
pub struct State {
    pub data_registers: [u8; REGISTER_COUNT],
    /// 16 bits wide; only memory accesses mask it down to 12.
    pub index_register: u16,
    pub program_counter: u16,
    pub stack_pointer: u8,
    pub ram: [u8; MEMORY_SIZE],
    pub stack: [u16; STACK_SIZE],
    pub delay_timer: u8,
    pub sound_timer: u8,
    pub display: Display,
    pub keypad: Keypad,
    /// Register waiting for the next key press.
    pub key_wait: Option<u8>,
    /// Set by a draw, cleared by the frame tick.
    pub frame_pending: bool,
}

impl Default for State {
    fn default() -> Self {
        let mut state = Self {
            data_registers: [0; REGISTER_COUNT],
            index_register: 0,
            program_counter: PROGRAM_START,
            stack_pointer: 0,
            ram: [0; MEMORY_SIZE],
            stack: [0; STACK_SIZE],
            delay_timer: 0,
            sound_timer: 0,
            display: Display::new(),
            keypad: Keypad::default(),
            key_wait: None,
            frame_pending: false,
        };
        state.ram[..FONT.len()].copy_from_slice(&FONT);
        state
    }
}

impl State {
    /// Copies `program` to 0x200. The caller checks it fits.
    pub(crate) fn load_program(&mut self, program: &[u8]) {
        let start = PROGRAM_START as usize;
        self.ram[start..start + program.len()].copy_from_slice(program);
    }

    pub(crate) fn fetch(&self) -> Instruction {
        let pc = self.program_counter & ADDRESS_MASK;
        Instruction::from_bytes(self.read(pc), self.read(pc + 1))
    }

    pub fn read(&self, address: u16) -> u8 {
        self.ram[(address & ADDRESS_MASK) as usize]
    }

    pub(crate) fn write(&mut self, address: u16, value: u8) {
        self.ram[(address & ADDRESS_MASK) as usize] = value;
    }

    pub fn register(&self, register_index: u8) -> u8 {
        self.data_registers[(register_index & 0xF) as usize]
    }

    pub(crate) fn register_mut(&mut self, register_index: u8) -> &mut u8 {
        &mut self.data_registers[(register_index & 0xF) as usize]
    }

    pub(crate) fn vx(&mut self, ins: Instruction) -> &mut u8 {
        self.register_mut(ins.x())
    }

    pub(crate) fn vy(&mut self, ins: Instruction) -> &mut u8 {
        self.register_mut(ins.y())
    }

    /// Steps over the next instruction.
    pub(crate) fn skip(&mut self) {
        self.program_counter = self.program_counter.wrapping_add(2);
    }

    pub(crate) fn set_flag(&mut self, flag: bool) {
        *self.register_mut(FLAG) = flag as u8;
    }

    pub(crate) fn push(&mut self, address: u16) -> bool {
        let sp = self.stack_pointer as usize;
        if sp == STACK_SIZE {
            return false;
        }
        self.stack[sp] = address;
        self.stack_pointer += 1;
        true
    }

    pub(crate) fn pop(&mut self) -> Option<u16> {
        if self.stack_pointer == 0 {
            return None;
        }
        self.stack_pointer -= 1;
        Some(self.stack[self.stack_pointer as usize])
    }

    /// The stack entries currently in use, oldest first.
    pub fn call_stack(&self) -> &[u16] {
        &self.stack[..self.stack_pointer as usize]
    }
}
