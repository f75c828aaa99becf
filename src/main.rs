mod config;
mod terminal;

use std::{
    error::Error,
    process::ExitCode,
    thread,
    time::{Duration, Instant},
};

use chip48_core::Machine;
use chip48_macros::asm;
use clap::Parser;

use config::Args;
use terminal::Terminal;

const FRAME_TIME: Duration = Duration::from_micros(16_667);

/// Shows the glyph of the last key pressed.
static DEMO: &[u8] = &asm!(
    "
        ld v1 30
        ld v2 13
    loop:
        cls
        ld f v0
        drw v1 v2 5
        ld v0 k
        jp loop
    "
);

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let program = args.program()?.unwrap_or_else(|| DEMO.to_vec());

    let mut machine = match args.seed {
        Some(seed) => Machine::with_seed(seed),
        None => Machine::new(),
    };
    machine.load(&program, args.quirks)?;

    let mut terminal = Terminal::open()?;
    loop {
        let frame_start = Instant::now();

        if !terminal.poll_input(&mut machine)? {
            break;
        }
        machine.step_frame();
        for _ in 0..args.ticks_per_frame {
            machine.step_instruction()?;
        }
        terminal.render(machine.display())?;

        if let Some(wait_time) = FRAME_TIME.checked_sub(frame_start.elapsed()) {
            thread::sleep(wait_time);
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            log::error!("{error}");
            eprintln!("chip48: {error}");
            ExitCode::FAILURE
        }
    }
}
