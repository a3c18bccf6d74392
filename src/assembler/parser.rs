//! The Parser module classifies the cleaned lines from the lexer into
//! instructions, one line at a time.
//!
//! It is a restartable cursor: the driver walks it once to bind labels,
//! calls `reset`, then walks it again to resolve and encode.
use std::io::Read;

use once_cell::sync::Lazy;
use regex::Regex;

use super::ast::{Instruction, Statement};
use super::error::{AssemblerError, Result};
use super::lexer::{self, is_decimal, Line};

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

pub struct Parser {
    lines: Vec<Line>,
    cursor: usize,
    instruction_index: usize,
}

impl Parser {
    pub fn new(lines: Vec<Line>) -> Self {
        Parser { lines, cursor: 0, instruction_index: 0 }
    }

    /// Reads and cleans all of `reader` up front.
    pub fn from_reader<T: Read + ?Sized>(reader: Box<T>) -> Result<Self> {
        Ok(Parser::new(lexer::read_lines(reader)?))
    }

    /// Rewinds to the first line and clears the instruction index.
    pub fn reset(&mut self) {
        self.cursor = 0;
        self.instruction_index = 0;
    }

    pub fn has_next(&self) -> bool {
        self.cursor < self.lines.len()
    }

    /// Number of address and compute instructions consumed so far.
    /// While a label is current this is the ROM address it names.
    pub fn instruction_index(&self) -> usize {
        self.instruction_index
    }

    /// Classifies the next line. Returns `Ok(None)` once the input is exhausted.
    pub fn advance(&mut self) -> Result<Option<Statement>> {
        let line = match self.lines.get(self.cursor) {
            Some(line) => line,
            None => return Ok(None),
        };
        self.cursor += 1;

        let instruction = classify(&line.text).ok_or_else(|| AssemblerError::Syntax {
            line: line.number,
            text: line.text.clone(),
        })?;

        if instruction.emits_code() {
            self.instruction_index += 1;
        }

        Ok(Some(Statement { instruction, line: line.number }))
    }
}

/// Classifies one cleaned line, or returns `None` if it matches no grammar.
fn classify(text: &str) -> Option<Instruction> {
    if text.len() > 2 && text.starts_with('(') && text.ends_with(')') {
        // An all-digit name could never be referenced: `@5` is always the literal.
        let name = strip_whitespace(&text[1..text.len() - 1]);
        return if name.is_empty() || is_decimal(&name) { None } else { Some(Instruction::Label(name)) };
    }

    if let Some(target) = text.strip_prefix('@') {
        let target = strip_whitespace(target);
        return if target.is_empty() { None } else { Some(Instruction::Address(target)) };
    }

    if text.contains('=') || text.contains(';') {
        return Some(compute(text));
    }

    None
}

/// Splits `dest=comp;jump`. Empty dest or jump fields count as absent.
fn compute(text: &str) -> Instruction {
    let (body, jump) = match text.find(';') {
        Some(i) => (&text[..i], Some(&text[i + 1..])),
        None => (text, None),
    };
    let (dest, comp) = match body.find('=') {
        Some(i) => (Some(&body[..i]), &body[i + 1..]),
        None => (None, body),
    };

    Instruction::Compute {
        dest: dest.map(strip_whitespace).filter(|d| !d.is_empty()),
        comp: strip_whitespace(comp),
        jump: jump.map(strip_whitespace).filter(|j| !j.is_empty()),
    }
}

fn strip_whitespace(s: &str) -> String {
    WHITESPACE.replace_all(s, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(dest: Option<&str>, comp: &str, jump: Option<&str>) -> Instruction {
        Instruction::Compute {
            dest: dest.map(str::to_owned),
            comp: comp.to_owned(),
            jump: jump.map(str::to_owned),
        }
    }

    fn parser(src: &str) -> Parser {
        Parser::from_reader(Box::new(src.as_bytes())).unwrap()
    }

    #[test]
    fn test_classify_label() {
        assert_eq!(classify("(LOOP)"), Some(Instruction::Label("LOOP".to_owned())));
        assert_eq!(classify("( END LOOP )"), Some(Instruction::Label("ENDLOOP".to_owned())));
        assert_eq!(classify("(sys.init$ret.1)"), Some(Instruction::Label("sys.init$ret.1".to_owned())));
        assert_eq!(classify("()"), None);
        assert_eq!(classify("( )"), None);
        assert_eq!(classify("(LOOP"), None);
        assert_eq!(classify("(5)"), None);
        assert_eq!(classify("( 0 1 )"), None);
        assert_eq!(classify("(L5)"), Some(Instruction::Label("L5".to_owned())));
    }

    #[test]
    fn test_classify_address() {
        assert_eq!(classify("@21"), Some(Instruction::Address("21".to_owned())));
        assert_eq!(classify("@ R 1"), Some(Instruction::Address("R1".to_owned())));
        assert_eq!(classify("@i"), Some(Instruction::Address("i".to_owned())));
        assert_eq!(classify("@"), None);
        assert_eq!(classify("@  "), None);
    }

    #[test]
    fn test_classify_compute() {
        assert_eq!(classify("D=A"), Some(c(Some("D"), "A", None)));
        assert_eq!(classify("0;JMP"), Some(c(None, "0", Some("JMP"))));
        assert_eq!(classify("AM = M + 1"), Some(c(Some("AM"), "M+1", None)));
        assert_eq!(classify("D=D-M;JGT"), Some(c(Some("D"), "D-M", Some("JGT"))));
        assert_eq!(classify("=M"), Some(c(None, "M", None)));
        assert_eq!(classify("D;"), Some(c(None, "D", None)));
        assert_eq!(classify("M=;JMP"), Some(c(Some("M"), "", Some("JMP"))));
    }

    #[test]
    fn test_classify_invalid() {
        assert_eq!(classify("D"), None);
        assert_eq!(classify("LOOP"), None);
        assert_eq!(classify("/ half comment"), None);
    }

    #[test]
    fn test_advance_and_index() {
        let mut p = parser("
        // header
        (START)
        @2
        D=A
        (END)
        @END
        0;JMP
        ");

        assert!(p.has_next());
        let s = p.advance().unwrap().unwrap();
        assert_eq!(s, Statement { instruction: Instruction::Label("START".to_owned()), line: 3 });
        assert_eq!(p.instruction_index(), 0);

        assert_eq!(p.advance().unwrap().unwrap().line, 4);
        assert_eq!(p.instruction_index(), 1);
        p.advance().unwrap();
        assert_eq!(p.instruction_index(), 2);

        let s = p.advance().unwrap().unwrap();
        assert_eq!(s.instruction, Instruction::Label("END".to_owned()));
        assert_eq!(p.instruction_index(), 2);

        p.advance().unwrap();
        p.advance().unwrap();
        assert_eq!(p.instruction_index(), 4);
        assert!(!p.has_next());
        assert_eq!(p.advance().unwrap(), None);
    }

    #[test]
    fn test_numeric_label_is_syntax_error() {
        let mut p = parser("(5)\n@1\n@5\n");
        match p.advance() {
            Err(AssemblerError::Syntax { line, text }) => {
                assert_eq!(line, 1);
                assert_eq!(text, "(5)");
            }
            other => panic!("expected a syntax error, got {:?}", other),
        }
    }

    #[test]
    fn test_reset() {
        let mut p = parser("@1\nD=A\n");
        while p.advance().unwrap().is_some() {}
        assert_eq!(p.instruction_index(), 2);

        p.reset();
        assert!(p.has_next());
        assert_eq!(p.instruction_index(), 0);
        assert_eq!(p.advance().unwrap().unwrap().instruction, Instruction::Address("1".to_owned()));
    }

    #[test]
    fn test_syntax_error_reports_line() {
        let mut p = parser("@1\n\nfoo bar\n");
        assert!(p.advance().is_ok());
        match p.advance() {
            Err(AssemblerError::Syntax { line, text }) => {
                assert_eq!(line, 3);
                assert_eq!(text, "foo bar");
            }
            other => panic!("expected a syntax error, got {:?}", other),
        }
    }
}
