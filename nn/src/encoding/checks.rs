use super::{encode, PieceClass, NUM_SQUARES};
use shakmaty::{fen::Fen, CastlingMode, Chess, EnPassantMode, File, Position, Rank, Square};

const FENS: [&str; 4] = [
    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
    "4nrk1/3q1pp1/2n1p1p1/8/1P2Q3/7P/PB1N1PP1/2R3K1 w - - 5 26",
    "5r2/1p2ppkp/p2p1nP1/qn6/4P3/2r2B2/1PPQ1PP1/2KR3R w - - 0 21",
    "r3k2r/pP4pp/8/2pP4/8/8/6PP/R3K2R w KQkq c6 0 2",
];

/// Square of the board at position `i` of the encoding (0 = a8, 63 = h1)
fn square_at(i: usize) -> Square {
    Square::from_coords(File::new((i % 8) as u32), Rank::new(7 - (i / 8) as u32))
}

/// Checks that the encoding agrees with the board of the rules engine
fn check_agrees(pos: &Chess) {
    let fen = Fen(pos.clone().into_setup(EnPassantMode::Legal)).to_string();
    let encoded = encode(&fen).unwrap();

    assert_eq!(encoded.sum(), 64);

    for i in 0..NUM_SQUARES {
        let expected = match pos.board().piece_at(square_at(i)) {
            Some(piece) => PieceClass::from_fen_char(piece.char()).unwrap(),
            None => PieceClass::Empty,
        };
        assert_eq!(encoded.class_at(i), expected, "{} at {}", fen, square_at(i));
    }
}

#[test]
fn test_sanity_checks() {
    for fen in FENS {
        let fen: Fen = fen.parse().unwrap();
        let pos: Chess = fen.into_position(CastlingMode::Standard).unwrap();

        check_agrees(&pos);

        // every successor, covering castling, promotions and en passant
        for m in pos.legal_moves() {
            let mut moved = pos.clone();
            moved.play_unchecked(&m);
            check_agrees(&moved);
        }
    }
}
