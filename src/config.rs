use std::{fs, io, path::PathBuf};

use chip48_core::{assemble, AsmError, Quirks};
use clap::Parser;

/// Runs CHIP-8 and SCHIP programs in the terminal.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    /// ROM image to run, or assembly source with --assemble. Runs a small
    /// demo when left out.
    pub rom: Option<PathBuf>,

    /// Quirk preset: chip8, schip1.0 or schip-modern.
    #[arg(long, default_value = "chip8")]
    pub quirks: Quirks,

    /// Instructions executed per 60 Hz frame.
    #[arg(long, default_value_t = 10)]
    pub ticks_per_frame: u32,

    /// Seed for RND, random when left out.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Treat the input file as assembly source.
    #[arg(long)]
    pub assemble: bool,
}

#[derive(Debug)]
pub enum LoadError {
    Io(io::Error),
    Asm(AsmError),
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::Io(e) => write!(f, "could not read program: {e}"),
            LoadError::Asm(e) => write!(f, "could not assemble program: {e}"),
        }
    }
}

impl std::error::Error for LoadError {}

impl From<io::Error> for LoadError {
    fn from(value: io::Error) -> Self {
        LoadError::Io(value)
    }
}

impl From<AsmError> for LoadError {
    fn from(value: AsmError) -> Self {
        LoadError::Asm(value)
    }
}

impl Args {
    /// Reads the program named on the command line, if any.
    pub fn program(&self) -> Result<Option<Vec<u8>>, LoadError> {
        let Some(path) = &self.rom else {
            return Ok(None);
        };
        let program = if self.assemble {
            assemble(&fs::read_to_string(path)?)?
        } else {
            fs::read(path)?
        };
        log::info!("read {} bytes from {}", program.len(), path.display());
        Ok(Some(program))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = Args::parse_from(["chip48"]);
        assert_eq!(args.rom, None);
        assert_eq!(args.quirks, Quirks::CHIP8);
        assert_eq!(args.ticks_per_frame, 10);
        assert_eq!(args.seed, None);
        assert!(!args.assemble);
        assert!(args.program().unwrap().is_none());
    }

    #[test]
    fn presets_by_name() {
        let args = Args::parse_from([
            "chip48",
            "game.ch8",
            "--quirks",
            "schip-modern",
            "--ticks-per-frame",
            "30",
            "--seed",
            "4",
        ]);
        assert_eq!(args.rom, Some(PathBuf::from("game.ch8")));
        assert_eq!(args.quirks, Quirks::SCHIP_MODERN);
        assert_eq!(args.ticks_per_frame, 30);
        assert_eq!(args.seed, Some(4));

        assert!(Args::try_parse_from(["chip48", "--quirks", "xo-chip"]).is_err());
    }

    #[test]
    fn missing_file() {
        let args = Args::parse_from(["chip48", "/nonexistent/game.ch8"]);
        assert!(matches!(args.program(), Err(LoadError::Io(_))));
    }
}
