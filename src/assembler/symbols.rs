//! The symbol table maps names to 15-bit addresses.
//!
//! A fresh table is built for every run from the constant
//! `PREDEFINED` list, so nothing leaks between assemblies.
use std::collections::HashMap;

/// Symbols defined by the Hack platform itself.
pub const PREDEFINED: [(&str, u16); 23] = [
    ("R0", 0),   ("R1", 1),   ("R2", 2),   ("R3", 3),
    ("R4", 4),   ("R5", 5),   ("R6", 6),   ("R7", 7),
    ("R8", 8),   ("R9", 9),   ("R10", 10), ("R11", 11),
    ("R12", 12), ("R13", 13), ("R14", 14), ("R15", 15),
    ("SP", 0),   ("LCL", 1),  ("ARG", 2),  ("THIS", 3),
    ("THAT", 4),
    ("SCREEN", 16384),
    ("KBD", 24576),
];

#[derive(Clone, Debug)]
pub struct SymbolTable {
    entries: HashMap<String, u16>,
}

impl SymbolTable {
    /// Creates a table seeded with the platform symbols.
    pub fn new() -> Self {
        let mut entries = HashMap::with_capacity(PREDEFINED.len() * 2);
        for (name, address) in PREDEFINED.iter() {
            entries.insert((*name).to_owned(), *address);
        }
        SymbolTable { entries }
    }

    pub fn get(&self, name: &str) -> Option<u16> {
        self.entries.get(name).copied()
    }

    /// Inserts or overwrites a symbol.
    pub fn set(&mut self, name: &str, address: u16) {
        self.entries.insert(name.to_owned(), address);
    }

    /// Removes a symbol, returning the address it held.
    pub fn delete(&mut self, name: &str) -> Option<u16> {
        self.entries.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        SymbolTable::new()
    }
}
