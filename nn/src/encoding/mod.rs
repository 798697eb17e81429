//! One-hot board encoding.
//!
//! A position is encoded into 64 blocks of [`NUM_CLASSES`] slots, one block per
//! square in FEN order (a8, b8, ..., h8, a7, ..., h1). Exactly one slot of
//! each block is set, selecting what occupies the square.
//!
//! Only the piece placement field of the FEN is read: side to move, castling
//! rights, en passant square and clocks do not change the encoding.

mod piece_class;

#[cfg(test)]
mod checks;

pub use piece_class::{PieceClass, NUM_CLASSES};

use std::fmt;
use std::iter;
use thiserror::Error;

/// Number of squares on the board
pub const NUM_SQUARES: usize = 64;

/// Length of an encoded position
pub const ENCODED_SIZE: usize = NUM_SQUARES * NUM_CLASSES; // 832

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodeError {
    #[error("board placement expands to {0} squares, expected 64")]
    InvalidBoardLength(usize),

    #[error("invalid piece symbol '{0}'")]
    InvalidPieceSymbol(char),
}

/// A position encoded as 64 one-hot blocks of 13 slots
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct EncodedPosition([u8; ENCODED_SIZE]);

impl EncodedPosition {
    /// Encodes a board given in square order (a8 first, h1 last)
    pub fn from_classes(squares: &[PieceClass; NUM_SQUARES]) -> Self {
        let mut data = [0u8; ENCODED_SIZE];

        for (i, class) in squares.iter().enumerate() {
            data[NUM_CLASSES * i + class.index()] = 1;
        }

        EncodedPosition(data)
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// The 13 slots of a square (0 = a8, 63 = h1)
    pub fn block(&self, square: usize) -> &[u8] {
        &self.0[NUM_CLASSES * square..NUM_CLASSES * (square + 1)]
    }

    /// The class of the set slot in the block of a square
    pub fn class_at(&self, square: usize) -> PieceClass {
        let slot = self
            .block(square)
            .iter()
            .position(|&v| v == 1)
            .unwrap_or(PieceClass::Empty.index());

        PieceClass::ALL[slot]
    }

    /// Number of squares in each class, indexed by [`PieceClass::index`]
    pub fn class_counts(&self) -> [u32; NUM_CLASSES] {
        let mut counts = [0u32; NUM_CLASSES];

        for block in self.0.chunks_exact(NUM_CLASSES) {
            for (slot, &v) in block.iter().enumerate() {
                counts[slot] += v as u32;
            }
        }

        counts
    }

    /// Sum of every slot. Always 64 for encodings produced by this module
    pub fn sum(&self) -> u32 {
        self.0.iter().map(|&v| v as u32).sum()
    }
}

impl fmt::Debug for EncodedPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 832 digits are useless in assertion output, show the board instead
        let board: String = (0..NUM_SQUARES)
            .map(|i| self.class_at(i).fen_char().unwrap_or('.'))
            .collect();
        write!(f, "EncodedPosition({})", board)
    }
}

/// Space-delimited list of 0/1 values
impl fmt::Display for EncodedPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", v)?;
        }
        Ok(())
    }
}

/// Expands the placement field of a FEN into its 64 squares
pub fn parse_placement(fen: &str) -> Result<[PieceClass; NUM_SQUARES], EncodeError> {
    let placement = fen.split_whitespace().next().unwrap_or("");

    // `None` marks an empty square
    let mut squares: Vec<Option<char>> = Vec::with_capacity(NUM_SQUARES);

    for c in placement.chars() {
        match c {
            '/' => {} // rank separator
            '1'..='8' => {
                let run = c as usize - '0' as usize;
                squares.extend(iter::repeat(None).take(run));
            }
            _ => squares.push(Some(c)),
        }
    }

    // length is checked before symbols
    if squares.len() != NUM_SQUARES {
        return Err(EncodeError::InvalidBoardLength(squares.len()));
    }

    let mut classes = [PieceClass::Empty; NUM_SQUARES];
    for (class, square) in classes.iter_mut().zip(squares) {
        if let Some(c) = square {
            *class = PieceClass::from_fen_char(c)?;
        }
    }

    Ok(classes)
}

/// Encodes the board of a FEN string
pub fn encode(fen: &str) -> Result<EncodedPosition, EncodeError> {
    Ok(EncodedPosition::from_classes(&parse_placement(fen)?))
}
