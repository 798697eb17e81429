use shakmaty::{fen::Fen, uci::UciMove, CastlingMode, Chess, EnPassantMode, Move, Position};
use thiserror::Error;

/// A FEN the rules engine refused, with the engine's reason
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct FenError(pub String);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MoveError {
    #[error("'{0}' is not valid move notation")]
    Syntax(String),

    #[error("'{0}' is not a legal move")]
    Illegal(String),
}

/// The chess rules the pipeline needs: parsing and printing positions,
/// enumerating legal moves and playing them.
///
/// Shared by reference across the batch workers, hence `Sync`.
pub trait Rules: Sync {
    type Position: Clone;
    /// Equality between moves is what decides the label of a candidate
    type Move: PartialEq;

    fn parse_fen(&self, fen: &str) -> Result<Self::Position, FenError>;

    fn to_fen(&self, position: &Self::Position) -> String;

    /// All legal moves, in the engine's own order
    fn legal_moves(&self, position: &Self::Position) -> Vec<Self::Move>;

    /// Plays a move that is known to be legal
    fn play(&self, position: &Self::Position, mov: &Self::Move) -> Self::Position;

    /// Resolves move notation against a position
    fn parse_move(&self, position: &Self::Position, notation: &str)
        -> Result<Self::Move, MoveError>;

    fn move_notation(&self, mov: &Self::Move) -> String;
}

/// Standard chess backed by shakmaty, with UCI move notation
#[derive(Debug, Default, Clone, Copy)]
pub struct ShakmatyRules;

impl Rules for ShakmatyRules {
    type Position = Chess;
    type Move = Move;

    fn parse_fen(&self, fen: &str) -> Result<Chess, FenError> {
        let fen = Fen::from_ascii(fen.trim().as_bytes()).map_err(|e| FenError(e.to_string()))?;

        fen.into_position::<Chess>(CastlingMode::Standard)
            .map_err(|e| FenError(e.to_string()))
    }

    fn to_fen(&self, position: &Chess) -> String {
        // only list the en passant square when a capture is actually possible
        Fen(position.clone().into_setup(EnPassantMode::Legal)).to_string()
    }

    fn legal_moves(&self, position: &Chess) -> Vec<Move> {
        position.legal_moves().into_iter().collect()
    }

    fn play(&self, position: &Chess, mov: &Move) -> Chess {
        let mut next = position.clone();
        next.play_unchecked(mov);
        next
    }

    fn parse_move(&self, position: &Chess, notation: &str) -> Result<Move, MoveError> {
        let notation = notation.trim();

        UciMove::from_ascii(notation.as_bytes())
            .map_err(|_| MoveError::Syntax(notation.to_string()))?
            .to_move(position)
            .map_err(|_| MoveError::Illegal(notation.to_string()))
    }

    fn move_notation(&self, mov: &Move) -> String {
        UciMove::from_move(mov, CastlingMode::Standard).to_string()
    }
}
