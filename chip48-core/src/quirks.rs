use std::{fmt, str::FromStr};

/// Switches for the instructions whose behaviour differs between historical
/// interpreters. All off is the COSMAC VIP interpretation minus the
/// vblank wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Quirks {
    /// `8xy6`/`8xyE` shift Vx in place instead of storing shifted Vy into Vx.
    pub shift_vx_only: bool,
    /// `Fx55`/`Fx65` leave I pointing past the last register transferred.
    pub load_store_i_add: bool,
    /// `Bnnn` adds Vx (x being the top nibble of nnn) instead of V0.
    pub jump_with_vx: bool,
    /// `8xy1`/`8xy2`/`8xy3` leave VF alone instead of zeroing it.
    pub logic_no_vf: bool,
    /// Sprite pixels past the display edge wrap around instead of clipping.
    pub sprite_wrap: bool,
    /// Scrolls move half the distance while in low resolution.
    pub legacy_schip_scroll: bool,
    /// A draw suspends execution until the next frame tick.
    pub display_wait: bool,
}

impl Quirks {
    pub const CHIP8: Quirks = Quirks {
        shift_vx_only: false,
        load_store_i_add: false,
        jump_with_vx: false,
        logic_no_vf: false,
        sprite_wrap: false,
        legacy_schip_scroll: false,
        display_wait: true,
    };

    pub const SCHIP_1_0: Quirks = Quirks {
        shift_vx_only: true,
        load_store_i_add: true,
        jump_with_vx: true,
        logic_no_vf: true,
        sprite_wrap: false,
        legacy_schip_scroll: true,
        display_wait: false,
    };

    pub const SCHIP_MODERN: Quirks = Quirks {
        shift_vx_only: true,
        load_store_i_add: true,
        jump_with_vx: true,
        logic_no_vf: true,
        sprite_wrap: false,
        legacy_schip_scroll: false,
        display_wait: false,
    };
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPreset(pub String);

impl fmt::Display for UnknownPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown quirks preset '{}' (expected chip8, schip1.0 or schip-modern)",
            self.0
        )
    }
}

impl std::error::Error for UnknownPreset {}

impl FromStr for Quirks {
    type Err = UnknownPreset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "chip8" | "chip-8" => Ok(Quirks::CHIP8),
            "schip1.0" | "schip-1.0" | "schip" => Ok(Quirks::SCHIP_1_0),
            "schip-modern" | "schip_modern" => Ok(Quirks::SCHIP_MODERN),
            _ => Err(UnknownPreset(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Machine;

    #[test]
    fn presets_by_name() {
        assert_eq!("chip8".parse::<Quirks>(), Ok(Quirks::CHIP8));
        assert_eq!("SCHIP1.0".parse::<Quirks>(), Ok(Quirks::SCHIP_1_0));
        assert_eq!("schip-modern".parse::<Quirks>(), Ok(Quirks::SCHIP_MODERN));
        assert!("xo-chip".parse::<Quirks>().is_err());
    }

    #[test]
    fn presets_clip_at_the_right_edge() {
        // ld v0 60 ; ld i 0x206 ; drw v0 v1 1 ; db 0xFF
        let program = [0x60, 0x3C, 0xA2, 0x06, 0xD0, 0x11, 0xFF];
        for quirks in [Quirks::CHIP8, Quirks::SCHIP_1_0, Quirks::SCHIP_MODERN] {
            let mut m = Machine::with_seed(0);
            m.load(&program, quirks).unwrap();
            for _ in 0..3 {
                m.step_instruction().unwrap();
            }
            assert!(m.display().pixel(63, 0), "{quirks:?}");
            assert!(!m.display().pixel(0, 0), "{quirks:?}");
            assert_eq!(m.display().lit(), 4, "{quirks:?}");
        }
    }

    #[test]
    fn modern_differs_from_legacy_only_in_scroll() {
        let legacy = Quirks::SCHIP_1_0;
        let modern = Quirks::SCHIP_MODERN;
        assert_eq!(
            Quirks {
                legacy_schip_scroll: false,
                ..legacy
            },
            modern
        );
    }
}
