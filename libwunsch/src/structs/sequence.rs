use std::fmt::{Debug, Display, Formatter};

use crate::alphabet::{symbol_display, GAP, PAD};
use anyhow::Result;
use thiserror::Error;

#[derive(Error, Debug)]
#[error("gap symbol at sequence position {position}")]
pub struct GapInSequenceError {
    pub position: usize,
}

#[derive(Error, Debug)]
#[error("invalid sequence byte: {byte}")]
pub struct InvalidSequenceByteError {
    byte: String,
}

/// An immutable sequence of symbols.
///
/// Symbols are stored 1-indexed: position 1 of the
/// sequence is at index 1, and index 0 holds a pad byte.
#[derive(Clone, PartialEq, Eq)]
pub struct Sequence {
    /// The length of the sequence
    pub length: usize,
    /// The symbol bytes of the sequence, preceded by a single pad byte
    pub utf8_bytes: Vec<u8>,
}

impl Sequence {
    pub fn from_utf8(bytes: &[u8]) -> Result<Self> {
        let mut utf8_bytes: Vec<u8> = vec![PAD; bytes.len() + 1];

        for (idx, &utf8_byte) in bytes.iter().enumerate() {
            if utf8_byte == GAP {
                return Err(GapInSequenceError { position: idx + 1 }.into());
            }

            if !utf8_byte.is_ascii_graphic() {
                return Err(InvalidSequenceByteError {
                    byte: symbol_display(utf8_byte),
                }
                .into());
            }

            utf8_bytes[idx + 1] = utf8_byte;
        }

        Ok(Sequence {
            length: bytes.len(),
            utf8_bytes,
        })
    }

    pub fn empty() -> Self {
        Sequence {
            length: 0,
            utf8_bytes: vec![PAD],
        }
    }

    /// The symbols of the sequence, without the pad byte.
    pub fn symbols(&self) -> &[u8] {
        &self.utf8_bytes[1..]
    }

    /// The symbol at 1-based `position`.
    #[inline]
    pub fn symbol(&self, position: usize) -> u8 {
        debug_assert!(position >= 1 && position <= self.length);
        self.utf8_bytes[position]
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }
}

impl Display for Sequence {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // symbols are validated as printable ASCII on construction
        match std::str::from_utf8(self.symbols()) {
            Ok(s) => write!(f, "{s}"),
            Err(_) => Err(std::fmt::Error),
        }
    }
}

impl Debug for Sequence {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sequence({self})")
    }
}
