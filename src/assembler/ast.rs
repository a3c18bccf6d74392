//! This AST describes a single classified line of Hack assembly.
//!
//! Comments start with `//` and run to the end of the line.
//! Instructions are delimited by newlines, one per line.
//!
//! Supported forms:
//!
//! ```nasm
//! @value        // A-instruction: load a literal, label or variable address
//! dest=comp;jump // C-instruction: dest and jump are both optional
//! (NAME)        // Label: binds NAME to the next instruction's ROM address
//! ```
//!
//! Example source file:
//!
//! ```nasm
//! (LOOP)
//!     @i        // first unknown symbol, allocated RAM[16]
//!     M=M+1
//!     @LOOP
//!     0;JMP
//! ```

use std::fmt;

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Instruction {
    /// `@target`: a decimal literal or a symbol name.
    Address(String),
    Compute {
        dest: Option<String>,
        comp: String,
        jump: Option<String>,
    },
    Label(String),
}

impl Instruction {
    /// Labels occupy no ROM word; every other instruction occupies one.
    pub fn emits_code(&self) -> bool {
        !matches!(self, Instruction::Label(_))
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Instruction::Address(target) => write!(f, "@{}", target),
            Instruction::Compute { dest, comp, jump } => {
                if let Some(d) = dest {
                    write!(f, "{}=", d)?;
                }
                write!(f, "{}", comp)?;
                if let Some(j) = jump {
                    write!(f, ";{}", j)?;
                }
                Ok(())
            }
            Instruction::Label(name) => write!(f, "({})", name),
        }
    }
}

/// A classified instruction together with the 1-based line it came from.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Statement {
    pub instruction: Instruction,
    pub line: usize,
}
