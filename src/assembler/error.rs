//! Errors raised while assembling a Hack source file.
//!
//! Every error is fatal: the driver stops at the first one it sees.

use std::fmt;
use thiserror::Error;

/// Which of the three compute-instruction fields held an unknown mnemonic.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Field {
    Dest,
    Comp,
    Jump,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Field::Dest => write!(f, "destination"),
            Field::Comp => write!(f, "computation"),
            Field::Jump => write!(f, "jump"),
        }
    }
}

#[derive(Error, Debug)]
pub enum AssemblerError {
    #[error("file error: `{path}`: {message}")]
    File { path: String, message: String },

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("read error on line {line}: {source}")]
    Read { line: usize, source: std::io::Error },

    #[error("syntax error on line {line}: \"{text}\"")]
    Syntax { line: usize, text: String },

    #[error("overflow on line {line}: {value} does not fit in 15 bits")]
    Overflow { line: usize, value: String },

    #[error("unresolved symbol on line {line}: {symbol}")]
    UnresolvedSymbol { line: usize, symbol: String },

    #[error("invalid {field} mnemonic on line {line}: \"{mnemonic}\"")]
    InvalidMnemonic {
        line: usize,
        field: Field,
        mnemonic: String,
    },

    #[error("label redefined on line {line}: {label}")]
    DuplicateLabel { line: usize, label: String },
}

impl AssemblerError {
    /// The 1-based source line the error refers to, when there is one.
    pub fn line(&self) -> Option<usize> {
        use AssemblerError::*;
        match self {
            File { .. } | Io(_) => None,
            Read { line, .. }
            | Syntax { line, .. }
            | Overflow { line, .. }
            | UnresolvedSymbol { line, .. }
            | InvalidMnemonic { line, .. }
            | DuplicateLabel { line, .. } => Some(*line),
        }
    }
}

pub type Result<T> = std::result::Result<T, AssemblerError>;
