use crate::error::PuzzleError;
use crate::rules::Rules;

/// A puzzle after its setup move: the position the solver faces and the
/// solution move, as written in the source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advanced {
    pub fen: String,
    pub target_move: String,
}

/// Plays the setup move (`moves[0]`) of a puzzle.
///
/// The solution move (`moves[1]`) is returned as is. Whether it is legal is
/// only known once the replies are enumerated by [`crate::expand::expand`].
pub fn advance<R, S>(rules: &R, starting_fen: &str, moves: &[S]) -> Result<Advanced, PuzzleError>
where
    R: Rules,
    S: AsRef<str>,
{
    if moves.len() < 2 {
        return Err(PuzzleError::TooFewMoves(moves.len()));
    }

    let position = rules
        .parse_fen(starting_fen)
        .map_err(|e| PuzzleError::MalformedFen {
            fen: starting_fen.to_string(),
            reason: e.to_string(),
        })?;

    let setup = moves[0].as_ref();
    let setup_move =
        rules
            .parse_move(&position, setup)
            .map_err(|_| PuzzleError::IllegalMove {
                mov: setup.to_string(),
                fen: starting_fen.to_string(),
            })?;

    let advanced = rules.play(&position, &setup_move);

    Ok(Advanced {
        fen: rules.to_fen(&advanced),
        target_move: moves[1].as_ref().to_string(),
    })
}

/// Splits a whitespace-delimited move list
pub fn split_moves(moves: &str) -> Vec<String> {
    moves.split_whitespace().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::ShakmatyRules;

    const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    #[test]
    fn test_advance_start() {
        let advanced = advance(&ShakmatyRules, START_FEN, &split_moves("e2e4 e7e5")).unwrap();

        assert_eq!(
            advanced.fen,
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1"
        );
        assert_eq!(advanced.target_move, "e7e5");
    }

    #[test]
    fn test_advance_lichess_puzzle() {
        // puzzle 00008 of the Lichess database
        let fen = "r6k/pp2r2p/4Rp1Q/3p4/8/1N1P2R1/PqP2bPP/7K b - - 0 24";
        let moves = split_moves("f2g3 e6e7 b2b1 b3c1 b1c1 h6c1");
        let advanced = advance(&ShakmatyRules, fen, &moves).unwrap();

        assert_eq!(
            advanced.fen,
            "r6k/pp2r2p/4Rp1Q/3p4/8/1N1P2b1/PqP3PP/7K w - - 0 25"
        );
        assert_eq!(advanced.target_move, "e6e7");
    }

    #[test]
    fn test_target_is_not_validated() {
        let advanced = advance(&ShakmatyRules, START_FEN, &["e2e4", "a1a8"]).unwrap();
        assert_eq!(advanced.target_move, "a1a8");
    }

    #[test]
    fn test_too_few_moves() {
        assert_eq!(
            advance(&ShakmatyRules, START_FEN, &["e2e4"]),
            Err(PuzzleError::TooFewMoves(1))
        );
        assert_eq!(
            advance(&ShakmatyRules, START_FEN, &split_moves("  ")),
            Err(PuzzleError::TooFewMoves(0))
        );
    }

    #[test]
    fn test_illegal_setup() {
        assert_eq!(
            advance(&ShakmatyRules, START_FEN, &["e2e5", "e7e5"]),
            Err(PuzzleError::IllegalMove {
                mov: "e2e5".to_string(),
                fen: START_FEN.to_string()
            })
        );
        assert!(matches!(
            advance(&ShakmatyRules, START_FEN, &["zz", "e7e5"]),
            Err(PuzzleError::IllegalMove { .. })
        ));
    }

    #[test]
    fn test_malformed_fen() {
        assert!(matches!(
            advance(&ShakmatyRules, "rnbqkbnr/pppppppp/8 w", &["e2e4", "e7e5"]),
            Err(PuzzleError::MalformedFen { .. })
        ));
    }
}
