use std::fmt;

use crate::Instruction;

/// Every instruction the machine understands, named after its assembler form.
/// Declaration order matches [`OPCODE_TABLE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    /// 00E0
    Cls,
    /// 00EE
    Ret,
    /// 00FB
    Scr,
    /// 00FC
    Scl,
    /// 00FE
    Low,
    /// 00FF
    High,
    /// 00Cn
    Scd,
    /// 1nnn
    Jp,
    /// 2nnn
    Call,
    /// 3xkk
    SeImm,
    /// 4xkk
    SneImm,
    /// 5xy0
    SeReg,
    /// 6xkk
    LdImm,
    /// 7xkk
    AddImm,
    /// 8xy0
    LdReg,
    /// 8xy1
    Or,
    /// 8xy2
    And,
    /// 8xy3
    Xor,
    /// 8xy4
    AddReg,
    /// 8xy5
    Sub,
    /// 8xy6
    Shr,
    /// 8xy7
    Subn,
    /// 8xyE
    Shl,
    /// 9xy0
    SneReg,
    /// Annn
    LdI,
    /// Bnnn
    JpOffset,
    /// Cxkk
    Rnd,
    /// Dxyn
    Drw,
    /// Ex9E
    Skp,
    /// ExA1
    Sknp,
    /// Fx07
    LdVxDt,
    /// Fx0A
    LdVxK,
    /// Fx15
    LdDtVx,
    /// Fx18
    LdStVx,
    /// Fx1E
    AddIVx,
    /// Fx29
    LdFVx,
    /// Fx33
    LdBVx,
    /// Fx55
    StoreRegs,
    /// Fx65
    LoadRegs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpcodeMatch {
    pub opcode: Opcode,
    pub pattern: u16,
    pub mask: u16,
}

const fn entry(opcode: Opcode, pattern: u16, mask: u16) -> OpcodeMatch {
    OpcodeMatch {
        opcode,
        pattern,
        mask,
    }
}

/// Decode table, scanned front to back with the first match winning.
///
/// Entries must stay ordered from the most specific mask to the least
/// specific one. The scan stops at the first hit, so a looser entry placed
/// earlier swallows every exact encoding it overlaps.
pub static OPCODE_TABLE: [OpcodeMatch; 39] = [
    entry(Opcode::Cls, 0x00E0, 0xFFFF),
    entry(Opcode::Ret, 0x00EE, 0xFFFF),
    entry(Opcode::Scr, 0x00FB, 0xFFFF),
    entry(Opcode::Scl, 0x00FC, 0xFFFF),
    entry(Opcode::Low, 0x00FE, 0xFFFF),
    entry(Opcode::High, 0x00FF, 0xFFFF),
    entry(Opcode::Scd, 0x00C0, 0xFFF0),
    entry(Opcode::Jp, 0x1000, 0xF000),
    entry(Opcode::Call, 0x2000, 0xF000),
    entry(Opcode::SeImm, 0x3000, 0xF000),
    entry(Opcode::SneImm, 0x4000, 0xF000),
    entry(Opcode::SeReg, 0x5000, 0xF00F),
    entry(Opcode::LdImm, 0x6000, 0xF000),
    entry(Opcode::AddImm, 0x7000, 0xF000),
    entry(Opcode::LdReg, 0x8000, 0xF00F),
    entry(Opcode::Or, 0x8001, 0xF00F),
    entry(Opcode::And, 0x8002, 0xF00F),
    entry(Opcode::Xor, 0x8003, 0xF00F),
    entry(Opcode::AddReg, 0x8004, 0xF00F),
    entry(Opcode::Sub, 0x8005, 0xF00F),
    entry(Opcode::Shr, 0x8006, 0xF00F),
    entry(Opcode::Subn, 0x8007, 0xF00F),
    entry(Opcode::Shl, 0x800E, 0xF00F),
    entry(Opcode::SneReg, 0x9000, 0xF00F),
    entry(Opcode::LdI, 0xA000, 0xF000),
    entry(Opcode::JpOffset, 0xB000, 0xF000),
    entry(Opcode::Rnd, 0xC000, 0xF000),
    entry(Opcode::Drw, 0xD000, 0xF000),
    entry(Opcode::Skp, 0xE09E, 0xF0FF),
    entry(Opcode::Sknp, 0xE0A1, 0xF0FF),
    entry(Opcode::LdVxDt, 0xF007, 0xF0FF),
    entry(Opcode::LdVxK, 0xF00A, 0xF0FF),
    entry(Opcode::LdDtVx, 0xF015, 0xF0FF),
    entry(Opcode::LdStVx, 0xF018, 0xF0FF),
    entry(Opcode::AddIVx, 0xF01E, 0xF0FF),
    entry(Opcode::LdFVx, 0xF029, 0xF0FF),
    entry(Opcode::LdBVx, 0xF033, 0xF0FF),
    entry(Opcode::StoreRegs, 0xF055, 0xF0FF),
    entry(Opcode::LoadRegs, 0xF065, 0xF0FF),
];

pub fn decode(instruction: Instruction) -> Option<Opcode> {
    let word = instruction.word();
    OPCODE_TABLE
        .iter()
        .find(|m| word & m.mask == m.pattern)
        .map(|m| m.opcode)
}

impl Opcode {
    // variants are declared in table order
    fn table_entry(self) -> &'static OpcodeMatch {
        &OPCODE_TABLE[self as usize]
    }

    /// The fixed bits of the encoding, with all operand fields zero.
    pub fn pattern(self) -> u16 {
        self.table_entry().pattern
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Cls => "cls",
            Opcode::Ret => "ret",
            Opcode::Scr => "scr",
            Opcode::Scl => "scl",
            Opcode::Low => "low",
            Opcode::High => "high",
            Opcode::Scd => "scd",
            Opcode::Jp | Opcode::JpOffset => "jp",
            Opcode::Call => "call",
            Opcode::SeImm | Opcode::SeReg => "se",
            Opcode::SneImm | Opcode::SneReg => "sne",
            Opcode::LdImm
            | Opcode::LdReg
            | Opcode::LdI
            | Opcode::LdVxDt
            | Opcode::LdVxK
            | Opcode::LdDtVx
            | Opcode::LdStVx
            | Opcode::LdFVx
            | Opcode::LdBVx
            | Opcode::StoreRegs
            | Opcode::LoadRegs => "ld",
            Opcode::AddImm | Opcode::AddReg | Opcode::AddIVx => "add",
            Opcode::Or => "or",
            Opcode::And => "and",
            Opcode::Xor => "xor",
            Opcode::Sub => "sub",
            Opcode::Shr => "shr",
            Opcode::Subn => "subn",
            Opcode::Shl => "shl",
            Opcode::Rnd => "rnd",
            Opcode::Drw => "drw",
            Opcode::Skp => "skp",
            Opcode::Sknp => "sknp",
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// Renders a word in the assembler's syntax, or `None` if it does not decode.
pub fn disassemble(instruction: Instruction) -> Option<String> {
    let opcode = decode(instruction)?;
    let x = instruction.x();
    let y = instruction.y();
    let m = opcode.mnemonic();
    let text = match opcode {
        Opcode::Cls | Opcode::Ret | Opcode::Scr | Opcode::Scl | Opcode::Low | Opcode::High => {
            m.to_string()
        }
        Opcode::Scd => format!("{m} 0x{:x}", instruction.n()),
        Opcode::Jp | Opcode::Call => format!("{m} 0x{:03x}", instruction.nnn()),
        Opcode::JpOffset => format!("{m} v0 0x{:03x}", instruction.nnn()),
        Opcode::LdI => format!("{m} i 0x{:03x}", instruction.nnn()),
        Opcode::SeImm | Opcode::SneImm | Opcode::LdImm | Opcode::AddImm | Opcode::Rnd => {
            format!("{m} v{x:x} 0x{:02x}", instruction.kk())
        }
        Opcode::SeReg
        | Opcode::SneReg
        | Opcode::LdReg
        | Opcode::Or
        | Opcode::And
        | Opcode::Xor
        | Opcode::AddReg
        | Opcode::Sub
        | Opcode::Shr
        | Opcode::Subn
        | Opcode::Shl => format!("{m} v{x:x} v{y:x}"),
        Opcode::Drw => format!("{m} v{x:x} v{y:x} 0x{:x}", instruction.n()),
        Opcode::Skp | Opcode::Sknp => format!("{m} v{x:x}"),
        Opcode::LdVxDt => format!("{m} v{x:x} dt"),
        Opcode::LdVxK => format!("{m} v{x:x} k"),
        Opcode::LdDtVx => format!("{m} dt v{x:x}"),
        Opcode::LdStVx => format!("{m} st v{x:x}"),
        Opcode::AddIVx => format!("{m} i v{x:x}"),
        Opcode::LdFVx => format!("{m} f v{x:x}"),
        Opcode::LdBVx => format!("{m} b v{x:x}"),
        Opcode::StoreRegs => format!("{m} [i] v{x:x}"),
        Opcode::LoadRegs => format!("{m} v{x:x} [i]"),
    };
    Some(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn op(word: u16) -> Option<Opcode> {
        decode(Instruction(word))
    }

    #[test]
    fn exact_matches_win_over_family_matches() {
        assert_eq!(op(0x00E0), Some(Opcode::Cls));
        assert_eq!(op(0x00EE), Some(Opcode::Ret));
        assert_eq!(op(0x00FF), Some(Opcode::High));
        assert_eq!(op(0x00C3), Some(Opcode::Scd));
    }

    #[test]
    fn alu_family_is_split_on_low_nibble() {
        assert_eq!(op(0x8120), Some(Opcode::LdReg));
        assert_eq!(op(0x8124), Some(Opcode::AddReg));
        assert_eq!(op(0x812E), Some(Opcode::Shl));
        assert_eq!(op(0x8128), None);
    }

    #[test]
    fn unknown_words() {
        assert_eq!(op(0x0000), None);
        assert_eq!(op(0x0123), None);
        assert_eq!(op(0x5121), None);
        assert_eq!(op(0xE1FF), None);
        assert_eq!(op(0xF1FF), None);
    }

    #[test]
    fn every_pattern_decodes_to_itself() {
        for m in OPCODE_TABLE.iter() {
            assert_eq!(op(m.pattern), Some(m.opcode), "{:04x}", m.pattern);
            assert_eq!(m.opcode.pattern(), m.pattern);
        }
    }

    #[test]
    fn variants_line_up_with_table_rows() {
        for (i, m) in OPCODE_TABLE.iter().enumerate() {
            assert_eq!(m.opcode as usize, i);
        }
    }

    #[test]
    fn no_pattern_is_shadowed() {
        // no entry may be shadowed by an earlier, looser one
        for (i, later) in OPCODE_TABLE.iter().enumerate() {
            for earlier in &OPCODE_TABLE[..i] {
                assert_ne!(
                    later.pattern & earlier.mask,
                    earlier.pattern,
                    "{:?} shadows {:?}",
                    earlier.opcode,
                    later.opcode
                );
            }
        }
    }

    #[test]
    fn disassembly() {
        let text = |word| disassemble(Instruction(word));
        assert_eq!(text(0x3542).as_deref(), Some("se v5 0x42"));
        assert_eq!(text(0x878E).as_deref(), Some("shl v7 v8"));
        assert_eq!(text(0xB300).as_deref(), Some("jp v0 0x300"));
        assert_eq!(text(0xF455).as_deref(), Some("ld [i] v4"));
        assert_eq!(text(0xD015).as_deref(), Some("drw v0 v1 0x5"));
        assert_eq!(text(0x0000), None);
    }
}
