use super::EncodeError;

/// Number of mutually exclusive classes a square can be in
pub const NUM_CLASSES: usize = 13;

/// Content of a single square.
/// The discriminant is the slot of the class inside a square block
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum PieceClass {
    Empty = 0,
    WhitePawn = 1,
    WhiteKnight = 2,
    WhiteBishop = 3,
    WhiteRook = 4,
    WhiteQueen = 5,
    WhiteKing = 6,
    BlackPawn = 7,
    BlackKnight = 8,
    BlackBishop = 9,
    BlackRook = 10,
    BlackQueen = 11,
    BlackKing = 12,
}

impl PieceClass {
    pub const ALL: [PieceClass; NUM_CLASSES] = [
        PieceClass::Empty,
        PieceClass::WhitePawn,
        PieceClass::WhiteKnight,
        PieceClass::WhiteBishop,
        PieceClass::WhiteRook,
        PieceClass::WhiteQueen,
        PieceClass::WhiteKing,
        PieceClass::BlackPawn,
        PieceClass::BlackKnight,
        PieceClass::BlackBishop,
        PieceClass::BlackRook,
        PieceClass::BlackQueen,
        PieceClass::BlackKing,
    ];

    /// Maps a FEN piece letter to its class. Empty squares never appear as a
    /// letter in FEN, they come from run-length digits.
    pub fn from_fen_char(c: char) -> Result<PieceClass, EncodeError> {
        use PieceClass::*;

        Ok(match c {
            'P' => WhitePawn,
            'N' => WhiteKnight,
            'B' => WhiteBishop,
            'R' => WhiteRook,
            'Q' => WhiteQueen,
            'K' => WhiteKing,
            'p' => BlackPawn,
            'n' => BlackKnight,
            'b' => BlackBishop,
            'r' => BlackRook,
            'q' => BlackQueen,
            'k' => BlackKing,
            _ => return Err(EncodeError::InvalidPieceSymbol(c)),
        })
    }

    /// FEN letter of the class, `None` for empty squares
    pub fn fen_char(self) -> Option<char> {
        use PieceClass::*;

        match self {
            Empty => None,
            WhitePawn => Some('P'),
            WhiteKnight => Some('N'),
            WhiteBishop => Some('B'),
            WhiteRook => Some('R'),
            WhiteQueen => Some('Q'),
            WhiteKing => Some('K'),
            BlackPawn => Some('p'),
            BlackKnight => Some('n'),
            BlackBishop => Some('b'),
            BlackRook => Some('r'),
            BlackQueen => Some('q'),
            BlackKing => Some('k'),
        }
    }

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}
