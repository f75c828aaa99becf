//! Two-pass assembler for the mnemonic language understood by
//! [`disassemble`](crate::disassemble).
//!
//! One instruction per line, operands separated by spaces or commas, `;`
//! starts a comment. A line may start with a `label:` which names the address
//! of whatever follows it. `db` emits raw bytes.

use std::{collections::HashMap, fmt};

use crate::{state::PROGRAM_START, Opcode};

const MNEMONICS: &[&str] = &[
    "cls", "ret", "scr", "scl", "low", "high", "scd", "jp", "call", "se", "sne", "ld", "add",
    "or", "and", "xor", "sub", "subn", "shr", "shl", "rnd", "drw", "skp", "sknp", "db",
];

/// Operand words that never name a label.
const KEYWORDS: &[&str] = &["i", "dt", "st", "k", "f", "b"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AsmErrorKind {
    UnknownMnemonic(String),
    /// The mnemonic exists but not with these operands.
    InvalidOperands(String),
    InvalidNumber(String),
    OutOfRange { value: u32, max: u32 },
    UnknownLabel(String),
    DuplicateLabel(String),
    /// The label would read as a register or keyword operand.
    ReservedLabel(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsmError {
    /// 1-based source line.
    pub line: usize,
    pub kind: AsmErrorKind,
}

impl fmt::Display for AsmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: ", self.line)?;
        match &self.kind {
            AsmErrorKind::UnknownMnemonic(m) => write!(f, "unknown mnemonic '{m}'"),
            AsmErrorKind::InvalidOperands(m) => write!(f, "invalid operands for '{m}'"),
            AsmErrorKind::InvalidNumber(n) => write!(f, "invalid number '{n}'"),
            AsmErrorKind::OutOfRange { value, max } => {
                write!(f, "value {value:#x} out of range (max {max:#x})")
            }
            AsmErrorKind::UnknownLabel(l) => write!(f, "unknown label '{l}'"),
            AsmErrorKind::DuplicateLabel(l) => write!(f, "label '{l}' defined twice"),
            AsmErrorKind::ReservedLabel(l) => write!(f, "'{l}' is reserved and cannot be a label"),
        }
    }
}

impl std::error::Error for AsmError {}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Operand {
    Register(u8),
    Number(u32),
    Label(String),
    I,
    IndirectI,
    Dt,
    St,
    K,
    F,
    B,
}

struct Line<'a> {
    number: usize,
    mnemonic: String,
    operands: Vec<&'a str>,
}

/// Assembles `source` into a ROM image meant to be loaded at 0x200.
/// Any error discards the whole output.
pub fn assemble(source: &str) -> Result<Vec<u8>, AsmError> {
    let mut labels = HashMap::new();
    let mut lines = Vec::new();
    let mut address = PROGRAM_START as u32;

    // first pass: label addresses and line sizes
    for (index, text) in source.lines().enumerate() {
        let number = index + 1;
        let code = text.split(';').next().unwrap_or_default();
        let mut tokens: Vec<&str> = code
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|t| !t.is_empty())
            .collect();

        if let Some(label) = tokens.first().and_then(|t| t.strip_suffix(':')) {
            if !is_identifier(label) {
                return Err(error(number, AsmErrorKind::InvalidOperands(label.to_string())));
            }
            if is_reserved(label) {
                return Err(error(number, AsmErrorKind::ReservedLabel(label.to_string())));
            }
            if labels.insert(label.to_string(), address).is_some() {
                return Err(error(number, AsmErrorKind::DuplicateLabel(label.to_string())));
            }
            tokens.remove(0);
        }

        let Some((mnemonic, operands)) = tokens.split_first() else {
            continue;
        };
        let mnemonic = mnemonic.to_ascii_lowercase();
        if !MNEMONICS.contains(&mnemonic.as_str()) {
            return Err(error(number, AsmErrorKind::UnknownMnemonic(mnemonic)));
        }
        address += if mnemonic == "db" {
            operands.len() as u32
        } else {
            2
        };
        lines.push(Line {
            number,
            mnemonic,
            operands: operands.to_vec(),
        });
    }

    // second pass: encode
    let mut rom = Vec::with_capacity((address - PROGRAM_START as u32) as usize);
    for line in &lines {
        let operands = line
            .operands
            .iter()
            .map(|token| resolve(parse_operand(token, line.number)?, &labels, line.number))
            .collect::<Result<Vec<_>, _>>()?;

        if line.mnemonic == "db" {
            if operands.is_empty() {
                return Err(error(line.number, AsmErrorKind::InvalidOperands("db".into())));
            }
            for operand in &operands {
                match operand {
                    Operand::Number(value) => rom.push(byte(*value, line.number)? as u8),
                    _ => {
                        return Err(error(line.number, AsmErrorKind::InvalidOperands("db".into())))
                    }
                }
            }
            continue;
        }

        let word = encode(&line.mnemonic, &operands, line.number)?;
        rom.extend_from_slice(&word.to_be_bytes());
    }

    log::debug!("assembled {} lines into {} bytes", lines.len(), rom.len());
    Ok(rom)
}

fn error(line: usize, kind: AsmErrorKind) -> AsmError {
    AsmError { line, kind }
}

fn is_identifier(token: &str) -> bool {
    let mut chars = token.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn parse_operand(token: &str, line: usize) -> Result<Operand, AsmError> {
    let lower = token.to_ascii_lowercase();
    let operand = match lower.as_str() {
        "i" => Operand::I,
        "[i]" => Operand::IndirectI,
        "dt" => Operand::Dt,
        "st" => Operand::St,
        "k" => Operand::K,
        "f" => Operand::F,
        "b" => Operand::B,
        _ => {
            if let Some(register) = register(&lower) {
                Operand::Register(register)
            } else if lower.starts_with(|c: char| c.is_ascii_digit()) {
                Operand::Number(parse_number(&lower, line)?)
            } else if is_identifier(token) {
                Operand::Label(token.to_string())
            } else {
                return Err(error(line, AsmErrorKind::InvalidNumber(token.to_string())));
            }
        }
    };
    Ok(operand)
}

fn is_reserved(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    KEYWORDS.contains(&lower.as_str()) || register(&lower).is_some()
}

fn register(token: &str) -> Option<u8> {
    let digit = token.strip_prefix('v')?;
    if digit.len() != 1 {
        return None;
    }
    u8::from_str_radix(digit, 16).ok()
}

/// Decimal, `0x` hexadecimal, or octal with a leading zero.
fn parse_number(token: &str, line: usize) -> Result<u32, AsmError> {
    let parsed = if let Some(hex) = token.strip_prefix("0x") {
        u32::from_str_radix(hex, 16)
    } else if token.len() > 1 && token.starts_with('0') {
        u32::from_str_radix(&token[1..], 8)
    } else {
        token.parse()
    };
    parsed.map_err(|_| error(line, AsmErrorKind::InvalidNumber(token.to_string())))
}

fn resolve(
    operand: Operand,
    labels: &HashMap<String, u32>,
    line: usize,
) -> Result<Operand, AsmError> {
    match operand {
        Operand::Label(name) => match labels.get(&name) {
            Some(&address) => Ok(Operand::Number(address)),
            None => Err(error(line, AsmErrorKind::UnknownLabel(name))),
        },
        other => Ok(other),
    }
}

fn limit(value: u32, max: u32, line: usize) -> Result<u16, AsmError> {
    if value > max {
        return Err(error(line, AsmErrorKind::OutOfRange { value, max }));
    }
    Ok(value as u16)
}

fn address(value: u32, line: usize) -> Result<u16, AsmError> {
    limit(value, 0x0FFF, line)
}

fn byte(value: u32, line: usize) -> Result<u16, AsmError> {
    limit(value, 0xFF, line)
}

fn nibble(value: u32, line: usize) -> Result<u16, AsmError> {
    limit(value, 0xF, line)
}

fn xy(x: u8, y: u8) -> u16 {
    (x as u16) << 8 | (y as u16) << 4
}

fn encode(mnemonic: &str, operands: &[Operand], line: usize) -> Result<u16, AsmError> {
    use Operand::*;

    let (opcode, fields) = match (mnemonic, operands) {
        ("cls", []) => (Opcode::Cls, 0),
        ("ret", []) => (Opcode::Ret, 0),
        ("scr", []) => (Opcode::Scr, 0),
        ("scl", []) => (Opcode::Scl, 0),
        ("low", []) => (Opcode::Low, 0),
        ("high", []) => (Opcode::High, 0),
        ("scd", [Number(n)]) => (Opcode::Scd, nibble(*n, line)?),
        ("jp", [Number(a)]) => (Opcode::Jp, address(*a, line)?),
        ("jp", [Register(0), Number(a)]) => (Opcode::JpOffset, address(*a, line)?),
        ("call", [Number(a)]) => (Opcode::Call, address(*a, line)?),
        ("se", [Register(x), Number(k)]) => (Opcode::SeImm, xy(*x, 0) | byte(*k, line)?),
        ("se", [Register(x), Register(y)]) => (Opcode::SeReg, xy(*x, *y)),
        ("sne", [Register(x), Number(k)]) => (Opcode::SneImm, xy(*x, 0) | byte(*k, line)?),
        ("sne", [Register(x), Register(y)]) => (Opcode::SneReg, xy(*x, *y)),
        ("ld", [Register(x), Number(k)]) => (Opcode::LdImm, xy(*x, 0) | byte(*k, line)?),
        ("ld", [Register(x), Register(y)]) => (Opcode::LdReg, xy(*x, *y)),
        ("ld", [I, Number(a)]) => (Opcode::LdI, address(*a, line)?),
        ("ld", [Register(x), Dt]) => (Opcode::LdVxDt, xy(*x, 0)),
        ("ld", [Register(x), K]) => (Opcode::LdVxK, xy(*x, 0)),
        ("ld", [Dt, Register(x)]) => (Opcode::LdDtVx, xy(*x, 0)),
        ("ld", [St, Register(x)]) => (Opcode::LdStVx, xy(*x, 0)),
        ("ld", [F, Register(x)]) => (Opcode::LdFVx, xy(*x, 0)),
        ("ld", [B, Register(x)]) => (Opcode::LdBVx, xy(*x, 0)),
        ("ld", [IndirectI, Register(x)]) => (Opcode::StoreRegs, xy(*x, 0)),
        ("ld", [Register(x), IndirectI]) => (Opcode::LoadRegs, xy(*x, 0)),
        ("add", [Register(x), Number(k)]) => (Opcode::AddImm, xy(*x, 0) | byte(*k, line)?),
        ("add", [Register(x), Register(y)]) => (Opcode::AddReg, xy(*x, *y)),
        ("add", [I, Register(x)]) => (Opcode::AddIVx, xy(*x, 0)),
        ("or", [Register(x), Register(y)]) => (Opcode::Or, xy(*x, *y)),
        ("and", [Register(x), Register(y)]) => (Opcode::And, xy(*x, *y)),
        ("xor", [Register(x), Register(y)]) => (Opcode::Xor, xy(*x, *y)),
        ("sub", [Register(x), Register(y)]) => (Opcode::Sub, xy(*x, *y)),
        ("subn", [Register(x), Register(y)]) => (Opcode::Subn, xy(*x, *y)),
        ("shr", [Register(x)]) => (Opcode::Shr, xy(*x, 0)),
        ("shr", [Register(x), Register(y)]) => (Opcode::Shr, xy(*x, *y)),
        ("shl", [Register(x)]) => (Opcode::Shl, xy(*x, 0)),
        ("shl", [Register(x), Register(y)]) => (Opcode::Shl, xy(*x, *y)),
        ("rnd", [Register(x), Number(k)]) => (Opcode::Rnd, xy(*x, 0) | byte(*k, line)?),
        ("drw", [Register(x), Register(y), Number(n)]) => {
            (Opcode::Drw, xy(*x, *y) | nibble(*n, line)?)
        }
        ("skp", [Register(x)]) => (Opcode::Skp, xy(*x, 0)),
        ("sknp", [Register(x)]) => (Opcode::Sknp, xy(*x, 0)),
        _ => {
            return Err(error(
                line,
                AsmErrorKind::InvalidOperands(mnemonic.to_string()),
            ))
        }
    };
    Ok(opcode.pattern() | fields)
}
