//! The Assembler module is in charge of taking a Hack
//! assembly file and producing its textual machine code.
//!
//! It runs two passes over a restartable parser: the first binds
//! labels, the second resolves symbols and encodes each instruction.

pub mod ast;
pub mod encoder;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod resolver;
pub mod symbols;

use std::io::{Read, Write};

use self::ast::Instruction;
use self::encoder::Word;
use self::error::Result;
use self::parser::Parser;
use self::resolver::Resolver;

/// One instruction written to the output, kept for listings.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Emitted {
    /// ROM address of the word.
    pub address: u16,
    /// 1-based source line.
    pub line: usize,
    pub instruction: Instruction,
    pub word: Word,
}

pub struct Assembler {
    parser: Parser,
    resolver: Resolver,
}

impl Assembler {
    pub fn new(parser: Parser) -> Self {
        Assembler { parser, resolver: Resolver::new() }
    }

    pub fn from_reader<T: Read + ?Sized>(reader: Box<T>) -> Result<Self> {
        Ok(Assembler::new(Parser::from_reader(reader)?))
    }

    /// Runs both passes, writing one 16-character line per instruction to `out`.
    /// Stops at the first error; anything already written stays written.
    pub fn run<W: Write + ?Sized>(&mut self, out: &mut W) -> Result<Vec<Emitted>> {
        let labels = self.resolver.bind_labels(&mut self.parser)?;
        info!("Pass 1 complete: bound {} label(s).", labels);

        self.parser.reset();
        let mut emitted = Vec::new();

        while let Some(stmt) = self.parser.advance()? {
            let word = match &stmt.instruction {
                Instruction::Label(_) => continue,
                Instruction::Address(target) => {
                    let resolved = self.resolver.resolve(target, stmt.line)?;
                    encoder::encode_address(resolved.address())
                }
                Instruction::Compute { dest, comp, jump } => {
                    encoder::encode_compute(dest.as_deref(), comp, jump.as_deref(), stmt.line)?
                }
            };

            writeln!(out, "{}", word)?;
            emitted.push(Emitted {
                address: (self.parser.instruction_index() - 1) as u16,
                line: stmt.line,
                instruction: stmt.instruction,
                word,
            });
        }

        info!(
            "Pass 2 complete: emitted {} instruction(s), {} symbol(s) in table.",
            emitted.len(),
            self.resolver.symbols().len()
        );
        Ok(emitted)
    }
}

/// Assembles everything in `reader` into `out`.
pub fn assemble<T: Read + ?Sized, W: Write + ?Sized>(reader: Box<T>, out: &mut W) -> Result<Vec<Emitted>> {
    Assembler::from_reader(reader)?.run(out)
}
