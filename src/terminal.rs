use std::{
    io::{self, stdout, Stdout, Write},
    time::Duration,
};

use chip48_core::{Display, Machine, KEY_COUNT};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute, queue,
    style::{self, Stylize},
    terminal,
};

/// Left side of a QWERTY keyboard laid over the hex keypad:
///
/// ```text
/// 1 2 3 4      1 2 3 C
/// q w e r      4 5 6 D
/// a s d f  ->  7 8 9 E
/// z x c v      A 0 B F
/// ```
const KEYMAP: [(char, u8); 16] = [
    ('1', 0x1),
    ('2', 0x2),
    ('3', 0x3),
    ('4', 0xC),
    ('q', 0x4),
    ('w', 0x5),
    ('e', 0x6),
    ('r', 0xD),
    ('a', 0x7),
    ('s', 0x8),
    ('d', 0x9),
    ('f', 0xE),
    ('z', 0xA),
    ('x', 0x0),
    ('c', 0xB),
    ('v', 0xF),
];

/// Terminals only report presses, so a key counts as held for this many
/// frames after its last press or auto-repeat.
const HOLD_FRAMES: u8 = 6;

fn keypad_key(c: char) -> Option<u8> {
    let c = c.to_ascii_lowercase();
    KEYMAP.iter().find(|(k, _)| *k == c).map(|&(_, key)| key)
}

/// Counts down how long each keypad key stays pressed.
#[derive(Debug, Default)]
pub struct KeyHold {
    frames: [u8; KEY_COUNT as usize],
}

impl KeyHold {
    pub fn press(&mut self, machine: &mut Machine, key: u8) {
        self.frames[key as usize] = HOLD_FRAMES;
        machine.set_key(key, true);
    }

    /// Releases keys whose hold ran out.
    pub fn tick(&mut self, machine: &mut Machine) {
        for (key, frames) in self.frames.iter_mut().enumerate() {
            if *frames > 0 {
                *frames -= 1;
                if *frames == 0 {
                    machine.set_key(key as u8, false);
                }
            }
        }
    }
}

pub struct Terminal {
    stdout: Stdout,
    keys: KeyHold,
    /// What is on screen, to only redraw changed cells.
    shown: Vec<Vec<bool>>,
    shown_hires: bool,
}

impl Terminal {
    pub fn open() -> io::Result<Self> {
        let mut stdout = stdout();
        terminal::enable_raw_mode()?;
        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            terminal::Clear(terminal::ClearType::All),
            cursor::Hide
        )?;
        Ok(Self {
            stdout,
            keys: KeyHold::default(),
            shown: Vec::new(),
            shown_hires: false,
        })
    }

    /// Drains pending terminal events into the keypad. Returns false once
    /// the user asked to quit.
    pub fn poll_input(&mut self, machine: &mut Machine) -> io::Result<bool> {
        self.keys.tick(machine);

        while event::poll(Duration::ZERO)? {
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind == KeyEventKind::Release {
                continue;
            }
            match key.code {
                KeyCode::Esc => return Ok(false),
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    return Ok(false)
                }
                KeyCode::Char(c) => {
                    if let Some(key) = keypad_key(c) {
                        self.keys.press(machine, key);
                    }
                }
                _ => {}
            }
        }
        Ok(true)
    }

    pub fn render(&mut self, display: &Display) -> io::Result<()> {
        if display.is_hires() != self.shown_hires {
            queue!(self.stdout, terminal::Clear(terminal::ClearType::All))?;
            self.shown.clear();
            self.shown_hires = display.is_hires();
        }
        // low resolution pixels are two cells wide to stay roughly square
        let cell_width = if display.is_hires() { 1 } else { 2 };

        for (y, row) in display.rows().enumerate() {
            for (x, &lit) in row.iter().enumerate() {
                let previous = self.shown.get(y).and_then(|r| r.get(x)).copied();
                if previous == Some(lit) {
                    continue;
                }
                queue!(self.stdout, cursor::MoveTo((x * cell_width) as u16, y as u16))?;
                let cell = if cell_width == 1 { "█" } else { "██" };
                if lit {
                    queue!(self.stdout, style::PrintStyledContent(cell.yellow()))?;
                } else {
                    queue!(self.stdout, style::PrintStyledContent(" ".repeat(cell_width).black()))?;
                }
            }
            if y < self.shown.len() {
                self.shown[y] = row;
            } else {
                self.shown.push(row);
            }
        }
        self.stdout.flush()
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = execute!(self.stdout, cursor::Show, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}
