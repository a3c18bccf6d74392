//! Encodes resolved instructions into 16-bit Hack machine words.
//!
//! Address instruction: `0vvv vvvv vvvv vvvv`
//! Compute instruction: `111a cccc ccdd djjj`
//!
//! `a` selects the indirect operand `M` in place of `A`. The six `c`
//! bits are shared between the `A` and `M` forms of an operation.
use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;

use super::error::{AssemblerError, Field, Result};

pub const WORD_BITS: usize = 16;

/// Largest value an address instruction can carry.
pub const MAX_ADDRESS: u16 = 0x7FFF;

const INDIRECT_OPERAND: char = 'M';

const DEST_TABLE: [(&str, u16); 8] = [
    ("",    0b000), ("M",   0b001), ("D",   0b010), ("MD",  0b011),
    ("A",   0b100), ("AM",  0b101), ("AD",  0b110), ("AMD", 0b111),
];

const JUMP_TABLE: [(&str, u16); 8] = [
    ("",    0b000), ("JGT", 0b001), ("JEQ", 0b010), ("JGE", 0b011),
    ("JLT", 0b100), ("JNE", 0b101), ("JLE", 0b110), ("JMP", 0b111),
];

const COMP_TABLE: [(&str, u16); 28] = [
    ("0",   0b101010), ("1",   0b111111), ("-1",  0b111010),
    ("D",   0b001100), ("A",   0b110000), ("M",   0b110000),
    ("!D",  0b001101), ("!A",  0b110001), ("!M",  0b110001),
    ("-D",  0b001111), ("-A",  0b110011), ("-M",  0b110011),
    ("D+1", 0b011111), ("A+1", 0b110111), ("M+1", 0b110111),
    ("D-1", 0b001110), ("A-1", 0b110010), ("M-1", 0b110010),
    ("D+A", 0b000010), ("D+M", 0b000010),
    ("D-A", 0b010011), ("D-M", 0b010011),
    ("A-D", 0b000111), ("M-D", 0b000111),
    ("D&A", 0b000000), ("D&M", 0b000000),
    ("D|A", 0b010101), ("D|M", 0b010101),
];

static DEST: Lazy<HashMap<&'static str, u16>> = Lazy::new(|| DEST_TABLE.iter().copied().collect());
static JUMP: Lazy<HashMap<&'static str, u16>> = Lazy::new(|| JUMP_TABLE.iter().copied().collect());
static COMP: Lazy<HashMap<&'static str, u16>> = Lazy::new(|| COMP_TABLE.iter().copied().collect());

/// A fixed-width machine word, most significant bit at index 0.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Word([bool; WORD_BITS]);

impl Word {
    pub fn new() -> Self {
        Word([false; WORD_BITS])
    }

    /// Writes the low `width` bits of `value` into `start..start + width`.
    fn set_field(&mut self, start: usize, width: usize, value: u16) {
        for i in 0..width {
            self.0[start + i] = (value >> (width - 1 - i)) & 1 == 1;
        }
    }

    pub fn bit(&self, index: usize) -> bool {
        self.0[index]
    }

    pub fn to_u16(&self) -> u16 {
        self.0.iter().fold(0, |acc, &b| (acc << 1) | b as u16)
    }
}

impl Default for Word {
    fn default() -> Self {
        Word::new()
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for &b in self.0.iter() {
            write!(f, "{}", if b { '1' } else { '0' })?;
        }
        Ok(())
    }
}

/// Encodes an address instruction. Callers guarantee `address <= MAX_ADDRESS`.
pub fn encode_address(address: u16) -> Word {
    debug_assert!(address <= MAX_ADDRESS);
    let mut word = Word::new();
    word.set_field(1, 15, address);
    word
}

/// Encodes a compute instruction, rejecting any mnemonic missing from its table.
pub fn encode_compute(dest: Option<&str>, comp: &str, jump: Option<&str>, line: usize) -> Result<Word> {
    let dest_bits = lookup(&DEST, Field::Dest, dest.unwrap_or(""), line)?;
    let comp_bits = lookup(&COMP, Field::Comp, comp, line)?;
    let jump_bits = lookup(&JUMP, Field::Jump, jump.unwrap_or(""), line)?;

    let mut word = Word::new();
    word.set_field(0, 3, 0b111);
    word.set_field(3, 1, comp.contains(INDIRECT_OPERAND) as u16);
    word.set_field(4, 6, comp_bits);
    word.set_field(10, 3, dest_bits);
    word.set_field(13, 3, jump_bits);
    Ok(word)
}

fn lookup(table: &HashMap<&'static str, u16>, field: Field, mnemonic: &str, line: usize) -> Result<u16> {
    table.get(mnemonic).copied().ok_or_else(|| AssemblerError::InvalidMnemonic {
        line,
        field,
        mnemonic: mnemonic.to_owned(),
    })
}
