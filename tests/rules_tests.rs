//! Rules checks through the public library API
//!
//! Run with: cargo test --test rules_tests

use chess_rules::board::Board;
use chess_rules::fen::parse_fen;
use chess_rules::game::{Game, GameError};
use chess_rules::notation::{move_to_uci, square_to_string, string_to_square, uci_to_move};
use chess_rules::types::*;
use pretty_assertions::assert_eq;

fn mv(s: &str) -> Move {
    uci_to_move(s).unwrap()
}

#[test]
fn test_every_square_round_trips() {
    for file in 0..8 {
        for rank in 0..8 {
            let square = Square::new(file, rank);
            let text = square_to_string(&square).unwrap();
            assert_eq!(string_to_square(&text), Some(square));
        }
    }
}

#[test]
fn test_start_position_serialization() {
    assert_eq!(
        Board::new().get_position(Color::White),
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -"
    );
}

#[test]
fn test_every_legal_move_keeps_king_safe() {
    let parsed =
        parse_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1").unwrap();
    let board = parsed.board;
    for color in [Color::White, Color::Black] {
        for m in board.legal_moves(color) {
            assert!(board.is_valid_move(&m, color), "{}", move_to_uci(&m).unwrap());
            assert!(!board.after_move(&m).is_in_check(color));
        }
    }
}

#[test]
fn test_legal_moves_agree_with_is_valid_move() {
    let board = Board::from_fen("r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq -").unwrap();
    let legal = board.legal_moves(Color::White);
    let mut checked = 0;
    for src in Square::all() {
        for m in board.get_moves_from(&src) {
            let piece = board.piece_at(&src).unwrap();
            if piece.color == Color::White {
                assert_eq!(board.is_valid_move(&m, Color::White), legal.contains(&m));
                checked += 1;
            }
        }
    }
    assert!(checked >= legal.len());
    assert_eq!(legal.len(), 6);
}

#[test]
fn test_castling_right_not_restored_by_returning_rook() {
    let mut game = Game::from_fen_silent("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
    for m in ["h1g1", "a8b8", "g1h1", "b8a8"] {
        game.try_move(m).unwrap();
    }
    assert_eq!(game.fen(), "r3k2r/8/8/8/8/8/8/R3K2R w Qk - 4 3");
    assert!(matches!(game.try_move("e1g1"), Err(GameError::IllegalMove(_))));
    game.try_move("e1c1").unwrap();
    assert_eq!(game.fen(), "r3k2r/8/8/8/8/8/8/2KR3R b k - 5 3");
}

#[test]
fn test_en_passant_through_game() {
    let mut game = Game::new_silent();
    for m in ["e2e4", "a7a6", "e4e5", "d7d5"] {
        game.try_move(m).unwrap();
    }
    assert_eq!(game.board().en_passant(), string_to_square("d6"));
    game.try_move("e5d6").unwrap();
    assert!(game.board().piece_at(&string_to_square("d5").unwrap()).is_none());
    assert_eq!(
        game.fen(),
        "rnbqkbnr/1pp1pppp/p2P4/8/8/8/PPPP1PPP/RNBQKBNR b KQkq - 0 3"
    );
}

#[test]
fn test_sliding_pieces_stop_at_blockers() {
    let board = Board::from_fen("8/8/8/8/8/p7/8/R7 w - -").unwrap();
    let moves = board.get_moves_from(&Square::new(0, 0));
    assert!(moves.contains(&mv("a1a3")));
    assert!(!moves.contains(&mv("a1a4")));
    assert!(moves.contains(&mv("a1h1")));
}

#[test]
fn test_checkmate_and_stalemate() {
    let board = Board::from_fen("R5k1/5ppp/8/8/8/8/8/6K1 b - -").unwrap();
    assert_eq!(board.status(Color::Black), Some(Status::Checkmate(Color::White)));

    let board = Board::from_fen("k7/2Q5/8/8/8/8/8/7K b - -").unwrap();
    assert_eq!(board.status(Color::Black), Some(Status::Stalemate));
}
