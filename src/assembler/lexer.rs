//! This lexer reads Hack source and strips it down to instruction text.
use std::io::{BufRead, BufReader, Read};

use once_cell::sync::Lazy;
use regex::Regex;

use super::error::{AssemblerError, Result};

static DECIMAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+$").unwrap());

/// A non-blank source line with its comment and surrounding whitespace removed.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Line {
    /// 1-based line number in the input.
    pub number: usize,
    pub text: String,
}

/// Reads every line of `reader`, keeping only the lines that still
/// contain something once comments and whitespace are stripped.
pub fn read_lines<T: Read + ?Sized>(reader: Box<T>) -> Result<Vec<Line>> {
    let mut lines: Vec<Line> = Vec::with_capacity(256);

    for (index, line) in BufReader::new(reader).lines().enumerate() {
        let line = line.map_err(|source| AssemblerError::Read { line: index + 1, source })?;
        let text = clean_line(&line);
        if !text.is_empty() {
            lines.push(Line { number: index + 1, text: text.to_owned() });
        }
    }

    debug!("Lexer kept {} non-blank line(s).", lines.len());
    Ok(lines)
}

/// True for an unsigned decimal literal such as `0`, `007` or `32767`.
pub fn is_decimal(text: &str) -> bool {
    DECIMAL.is_match(text)
}

/// Strips a trailing `//` comment and the surrounding whitespace.
/// A lone `/` is left in place: it is not a comment.
fn clean_line(line: &str) -> &str {
    let code = match line.find("//") {
        Some(start) => &line[..start],
        None => line,
    };
    code.trim()
}
