//! Symbol handles.
//!
//! Every symbol in a [`crate::model::SymbolTable`] is addressed by a [`Token`]: a 32-bit value
//! whose high byte names the symbol table (see [`SymbolKind`]) and whose low 24 bits hold the
//! 1-based row inside that table. The table ids reuse the ECMA-335 metadata table numbers of the
//! closest matching metadata table, so tokens read naturally next to real metadata tokens.

use std::fmt;
use std::hash::{Hash, Hasher};

use strum::{Display, FromRepr};

/// The symbol table a [`Token`] points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, FromRepr)]
#[repr(u8)]
pub enum SymbolKind {
    /// A module of an assembly (`Module`, 0x00)
    Module = 0x00,
    /// A type, including constructed generics, type parameters and pointers (`TypeDef`, 0x02)
    Type = 0x02,
    /// A field (`Field`, 0x04)
    Field = 0x04,
    /// A method or accessor (`MethodDef`, 0x06)
    Method = 0x06,
    /// A method parameter (`Param`, 0x08)
    Parameter = 0x08,
    /// A local variable (`StandAloneSig`, 0x11)
    Local = 0x11,
    /// An event (`Event`, 0x14)
    Event = 0x14,
    /// A property or indexer (`Property`, 0x17)
    Property = 0x17,
    /// An assembly (`Assembly`, 0x20)
    Assembly = 0x20,
}

/// A 32-bit handle to a symbol.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Token(pub u32);

impl Token {
    /// Creates a new token from a raw 32-bit value
    #[must_use]
    pub fn new(value: u32) -> Self {
        Token(value)
    }

    /// Creates a token from a symbol table and a 1-based row.
    ///
    /// # Arguments
    ///
    /// * `kind` - The symbol table
    /// * `row` - The row inside the table, only the low 24 bits are kept
    #[must_use]
    pub fn from_parts(kind: SymbolKind, row: u32) -> Self {
        Token(((kind as u32) << 24) | (row & 0x00FF_FFFF))
    }

    /// Returns the raw token value
    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Extracts the table type from the token (high byte)
    #[must_use]
    pub fn table(&self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Extracts the row index from the token (low 24 bits)
    #[must_use]
    pub fn row(&self) -> u32 {
        self.0 & 0x00FF_FFFF
    }

    /// Returns the symbol table this token points into, if the table byte is known
    #[must_use]
    pub fn kind(&self) -> Option<SymbolKind> {
        SymbolKind::from_repr(self.table())
    }

    /// Returns true if the token points into the given symbol table and has a row
    #[must_use]
    pub fn is(&self, kind: SymbolKind) -> bool {
        self.kind() == Some(kind) && self.row() != 0
    }

    /// Returns true if this is a null token (value 0)
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.0 == 0
    }
}

impl From<u32> for Token {
    fn from(value: u32) -> Self {
        Token(value)
    }
}

impl From<Token> for u32 {
    fn from(token: Token) -> Self {
        token.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Token(0x{:08x}, table: 0x{:02x}, row: {})",
            self.0,
            self.table(),
            self.row()
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}
