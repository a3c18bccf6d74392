//! Symbol resolution, split into two strictly separate passes.
//!
//! Pass 1 binds every label before anything else happens, so a label
//! referenced above its definition is never mistaken for a variable.
//! Pass 2 resolves each address target, allocating variables on first use.
use once_cell::sync::Lazy;
use regex::Regex;

use super::ast::Instruction;
use super::encoder::MAX_ADDRESS;
use super::error::{AssemblerError, Result};
use super::lexer::is_decimal;
use super::parser::Parser;
use super::symbols::SymbolTable;

/// RAM address handed to the first variable.
pub const FIRST_VARIABLE: u16 = 16;

// A sign in front of digits is never a symbol; the ISA has no signed literals.
static SIGNED: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[+-][0-9]+$").unwrap());

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Resolved {
    Literal(u16),
    /// A label or predefined symbol already in the table.
    Symbol(u16),
    /// A variable allocated by this lookup.
    Variable(u16),
}

impl Resolved {
    pub fn address(&self) -> u16 {
        match *self {
            Resolved::Literal(a) | Resolved::Symbol(a) | Resolved::Variable(a) => a,
        }
    }
}

pub struct Resolver {
    symbols: SymbolTable,
    next_variable: u16,
}

impl Resolver {
    pub fn new() -> Self {
        Resolver { symbols: SymbolTable::new(), next_variable: FIRST_VARIABLE }
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Pass 1: walks the whole input and binds each label to the ROM
    /// address of the instruction that follows it. Returns the label count.
    pub fn bind_labels(&mut self, parser: &mut Parser) -> Result<usize> {
        parser.reset();
        let mut count = 0;

        while let Some(stmt) = parser.advance()? {
            let name = match stmt.instruction {
                Instruction::Label(name) => name,
                _ => continue,
            };

            let index = parser.instruction_index();
            if index > MAX_ADDRESS as usize {
                return Err(AssemblerError::Overflow { line: stmt.line, value: index.to_string() });
            }
            if self.symbols.contains(&name) {
                return Err(AssemblerError::DuplicateLabel { line: stmt.line, label: name });
            }

            debug!("Bound label {} to ROM[{}] (line {}).", name, index, stmt.line);
            self.symbols.set(&name, index as u16);
            count += 1;
        }

        Ok(count)
    }

    /// Pass 2: resolves the target of an address instruction.
    pub fn resolve(&mut self, target: &str, line: usize) -> Result<Resolved> {
        if is_decimal(target) {
            return match target.parse::<u16>() {
                Ok(value) if value <= MAX_ADDRESS => Ok(Resolved::Literal(value)),
                _ => Err(AssemblerError::Overflow { line, value: target.to_owned() }),
            };
        }
        if SIGNED.is_match(target) {
            return Err(AssemblerError::Overflow { line, value: target.to_owned() });
        }

        if let Some(address) = self.symbols.get(target) {
            return Ok(Resolved::Symbol(address));
        }

        if self.next_variable > MAX_ADDRESS {
            return Err(AssemblerError::UnresolvedSymbol { line, symbol: target.to_owned() });
        }

        let address = self.next_variable;
        self.next_variable += 1;
        self.symbols.set(target, address);
        debug!("Allocated variable {} at RAM[{}] (line {}).", target, address, line);
        Ok(Resolved::Variable(address))
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Resolver::new()
    }
}
