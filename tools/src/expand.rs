use crate::error::PuzzleError;
use crate::puzzle::advance;
use crate::rules::{MoveError, Rules};
use crate::source::{PuzzleRecord, Step};
use nn::encoding::{encode, EncodedPosition};

/// Position reached by one legal reply, labeled by whether the reply is the
/// puzzle solution
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateRow {
    pub position: EncodedPosition,
    /// 1.0 for the solution, 0.0 otherwise
    pub target: f32,
    /// FEN after the reply
    pub fen: String,
    /// The reply, in the notation of the rules engine
    pub mov: String,
}

impl CandidateRow {
    pub fn is_solution(&self) -> bool {
        self.target == 1.0
    }
}

/// Encodes the position after every legal reply from `advanced_fen`.
///
/// Rows come in the order the rules engine enumerates moves, which carries no
/// meaning. A terminal position yields no rows. If `target_move` is not legal
/// here, no row is labeled as the solution; this is not an error.
pub fn expand<R: Rules>(
    rules: &R,
    advanced_fen: &str,
    target_move: &str,
) -> Result<Vec<CandidateRow>, PuzzleError> {
    let position = rules
        .parse_fen(advanced_fen)
        .map_err(|e| PuzzleError::MalformedFen {
            fen: advanced_fen.to_string(),
            reason: e.to_string(),
        })?;

    let moves = rules.legal_moves(&position);
    if moves.is_empty() {
        return Ok(vec![]);
    }

    let target = match rules.parse_move(&position, target_move) {
        Ok(mov) => Some(mov),
        Err(MoveError::Illegal(_)) => None,
        Err(MoveError::Syntax(notation)) => return Err(PuzzleError::MalformedMove(notation)),
    };

    moves
        .iter()
        .map(|mov| {
            let fen = rules.to_fen(&rules.play(&position, mov));

            Ok(CandidateRow {
                position: encode(&fen)?,
                target: if target.as_ref() == Some(mov) { 1.0 } else { 0.0 },
                fen,
                mov: rules.move_notation(mov),
            })
        })
        .collect()
}

/// Advances the record if it still holds its setup move, then expands it
pub fn expand_record<R: Rules>(
    rules: &R,
    record: &PuzzleRecord,
) -> Result<Vec<CandidateRow>, PuzzleError> {
    match &record.step {
        Step::Moves(moves) => {
            let advanced = advance(rules, &record.fen, moves)?;
            expand(rules, &advanced.fen, &advanced.target_move)
        }
        Step::Target(target_move) => expand(rules, &record.fen, target_move),
        Step::Malformed(reason) => Err(PuzzleError::MalformedRow(reason.clone())),
    }
}
