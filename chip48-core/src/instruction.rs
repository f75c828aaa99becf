/// A raw 16-bit instruction word with accessors for its operand fields.
///
/// ```text
/// nnn - lowest 12 bits, an address
/// n   - lowest 4 bits
/// x   - low nibble of the high byte, first register index
/// y   - high nibble of the low byte, second register index
/// kk  - lowest 8 bits, an immediate byte
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Instruction(pub u16);

impl Instruction {
    /// Big-endian: the first byte in memory is the high byte.
    pub fn from_bytes(high: u8, low: u8) -> Self {
        Self(u16::from_be_bytes([high, low]))
    }

    pub fn word(self) -> u16 {
        self.0
    }

    pub fn nnn(self) -> u16 {
        self.0 & 0x0FFF
    }

    pub fn n(self) -> u8 {
        (self.0 & 0x000F) as u8
    }

    pub fn x(self) -> u8 {
        ((self.0 & 0x0F00) >> 8) as u8
    }

    pub fn y(self) -> u8 {
        ((self.0 & 0x00F0) >> 4) as u8
    }

    pub fn kk(self) -> u8 {
        (self.0 & 0x00FF) as u8
    }
}
