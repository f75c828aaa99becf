use rand::Rng;

use crate::{state::GLYPH_SIZE, Instruction, Machine, MachineError, Opcode};

/// Pixels moved by the fixed-distance horizontal scrolls.
const HORIZONTAL_SCROLL: usize = 4;

impl Machine {
    /// Applies one decoded instruction. The program counter already points
    /// past it; `address` is where it was fetched from.
    pub(crate) fn execute(
        &mut self,
        opcode: Opcode,
        ins: Instruction,
        address: u16,
    ) -> Result<(), MachineError> {
        let quirks = self.quirks;
        let state = &mut self.state;

        match opcode {
            //clear display
            Opcode::Cls => state.display.clear(),
            //return
            Opcode::Ret => match state.pop() {
                Some(return_address) => state.program_counter = return_address,
                None => {
                    log::error!("stack underflow at {address:03X}");
                    return Err(MachineError::StackUnderflow { address });
                }
            },
            //scroll right 4
            Opcode::Scr => {
                let n = self.scroll_distance(HORIZONTAL_SCROLL);
                self.state.display.scroll_right(n);
            }
            //scroll left 4
            Opcode::Scl => {
                let n = self.scroll_distance(HORIZONTAL_SCROLL);
                self.state.display.scroll_left(n);
            }
            //low resolution
            Opcode::Low => state.display.set_hires(false),
            //high resolution
            Opcode::High => state.display.set_hires(true),
            //scroll down n
            Opcode::Scd => {
                let n = self.scroll_distance(ins.n() as usize);
                self.state.display.scroll_down(n);
            }
            //jump to address
            Opcode::Jp => state.program_counter = ins.nnn(),
            //call subroutine
            Opcode::Call => {
                if !state.push(state.program_counter) {
                    log::error!("stack overflow at {address:03X}");
                    return Err(MachineError::StackOverflow { address });
                }
                state.program_counter = ins.nnn();
            }
            //skip if Vx == kk
            Opcode::SeImm => {
                if state.register(ins.x()) == ins.kk() {
                    state.skip();
                }
            }
            //skip if Vx != kk
            Opcode::SneImm => {
                if state.register(ins.x()) != ins.kk() {
                    state.skip();
                }
            }
            //skip if Vx == Vy
            Opcode::SeReg => {
                if state.register(ins.x()) == state.register(ins.y()) {
                    state.skip();
                }
            }
            //Vx = kk
            Opcode::LdImm => *state.vx(ins) = ins.kk(),
            //Vx += kk, VF untouched
            Opcode::AddImm => {
                let vx = state.vx(ins);
                *vx = vx.wrapping_add(ins.kk());
            }
            //Vx = Vy
            Opcode::LdReg => *state.vx(ins) = state.register(ins.y()),
            //Vx |= Vy
            Opcode::Or => {
                *state.vx(ins) |= state.register(ins.y());
                if !quirks.logic_no_vf {
                    state.set_flag(false);
                }
            }
            //Vx &= Vy
            Opcode::And => {
                *state.vx(ins) &= state.register(ins.y());
                if !quirks.logic_no_vf {
                    state.set_flag(false);
                }
            }
            //Vx ^= Vy
            Opcode::Xor => {
                *state.vx(ins) ^= state.register(ins.y());
                if !quirks.logic_no_vf {
                    state.set_flag(false);
                }
            }
            //Vx += Vy, VF = carry
            Opcode::AddReg => {
                let (result, carry) = state
                    .register(ins.x())
                    .overflowing_add(state.register(ins.y()));
                *state.vx(ins) = result;
                state.set_flag(carry);
            }
            //Vx -= Vy, VF = not borrow
            Opcode::Sub => {
                let (vx, vy) = (state.register(ins.x()), state.register(ins.y()));
                *state.vx(ins) = vx.wrapping_sub(vy);
                state.set_flag(vx >= vy);
            }
            //Vx >>= 1
            Opcode::Shr => {
                let source = if quirks.shift_vx_only {
                    state.register(ins.x())
                } else {
                    *state.vy(ins)
                };
                *state.vx(ins) = source >> 1;
                state.set_flag(source & 0x01 != 0);
            }
            //Vx = Vy - Vx, VF = not borrow
            Opcode::Subn => {
                let (vx, vy) = (state.register(ins.x()), state.register(ins.y()));
                *state.vx(ins) = vy.wrapping_sub(vx);
                state.set_flag(vy >= vx);
            }
            //Vx <<= 1
            Opcode::Shl => {
                let source = if quirks.shift_vx_only {
                    state.register(ins.x())
                } else {
                    *state.vy(ins)
                };
                *state.vx(ins) = source << 1;
                state.set_flag(source & 0x80 != 0);
            }
            //skip if Vx != Vy
            Opcode::SneReg => {
                if state.register(ins.x()) != state.register(ins.y()) {
                    state.skip();
                }
            }
            //I = nnn
            Opcode::LdI => state.index_register = ins.nnn(),
            //jump to nnn + V0 (or Vx)
            Opcode::JpOffset => {
                let offset = if quirks.jump_with_vx {
                    state.register(ins.x())
                } else {
                    state.register(0x0)
                };
                state.program_counter = ins.nnn() + offset as u16;
            }
            //Vx = rand() & kk
            Opcode::Rnd => {
                let value: u8 = self.rng.gen();
                *self.state.vx(ins) = value & ins.kk();
            }
            //display sprite
            Opcode::Drw => self.draw(ins),
            //skip if key Vx down
            Opcode::Skp => {
                if state.keypad.is_pressed(state.register(ins.x())) {
                    state.skip();
                }
            }
            //skip if key Vx up
            Opcode::Sknp => {
                if !state.keypad.is_pressed(state.register(ins.x())) {
                    state.skip();
                }
            }
            //Vx = delay timer
            Opcode::LdVxDt => *state.vx(ins) = state.delay_timer,
            //Vx = next key press
            Opcode::LdVxK => state.key_wait = Some(ins.x()),
            //delay timer = Vx
            Opcode::LdDtVx => state.delay_timer = state.register(ins.x()),
            //sound timer = Vx
            Opcode::LdStVx => state.sound_timer = state.register(ins.x()),
            //I += Vx, no masking
            Opcode::AddIVx => {
                state.index_register = state
                    .index_register
                    .wrapping_add(state.register(ins.x()) as u16);
            }
            //I = address of glyph Vx
            Opcode::LdFVx => {
                let digit = state.vx(ins);
                if *digit > 0x0F {
                    log::warn!("font digit V{:X} = {:#04x} out of range", ins.x(), *digit);
                    *digit &= 0x0F;
                }
                state.index_register = *digit as u16 * GLYPH_SIZE;
            }
            //store Vx as decimal digits
            Opcode::LdBVx => {
                let value = state.register(ins.x());
                let i = state.index_register;
                state.write(i, value / 100);
                state.write(i.wrapping_add(1), value / 10 % 10);
                state.write(i.wrapping_add(2), value % 10);
            }
            //store V0..=Vx from I
            Opcode::StoreRegs => {
                let i = state.index_register;
                for r in 0..=ins.x() {
                    state.write(i.wrapping_add(r as u16), state.register(r));
                }
                if quirks.load_store_i_add {
                    state.index_register = i.wrapping_add(ins.x() as u16 + 1);
                }
            }
            //load V0..=Vx from I
            Opcode::LoadRegs => {
                let i = state.index_register;
                for r in 0..=ins.x() {
                    *state.register_mut(r) = state.read(i.wrapping_add(r as u16));
                }
                if quirks.load_store_i_add {
                    state.index_register = i.wrapping_add(ins.x() as u16 + 1);
                }
            }
        }
        Ok(())
    }

    fn scroll_distance(&self, n: usize) -> usize {
        if self.quirks.legacy_schip_scroll && !self.state.display.is_hires() {
            n / 2
        } else {
            n
        }
    }

    fn draw(&mut self, ins: Instruction) {
        let state = &mut self.state;
        let x = state.register(ins.x());
        let y = state.register(ins.y());

        let mut sprite = [0u8; 15];
        let rows = &mut sprite[..ins.n() as usize];
        for (offset, row) in rows.iter_mut().enumerate() {
            *row = state.read(state.index_register.wrapping_add(offset as u16));
        }

        let collision = state
            .display
            .draw_sprite(x, y, rows, self.quirks.sprite_wrap);
        state.set_flag(collision);
        state.frame_pending = true;
    }
}
