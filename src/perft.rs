use rayon::prelude::*;

use crate::board::Board;
use crate::types::{Color, Move};

/// Count the leaf nodes of the legal move tree `depth` plies deep
pub fn perft(board: &Board, color: Color, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = board.legal_moves(color);
    if depth == 1 {
        return moves.len() as u64;
    }

    moves
        .iter()
        .map(|m| perft(&board.after_move(m), color.other_color(), depth - 1))
        .sum()
}

/// Node count below each root move, each root move searched on its own thread.
/// Sorted by move notation.
pub fn perft_divide(board: &Board, color: Color, depth: u8) -> Vec<(Move, u64)> {
    if depth == 0 {
        return vec![];
    }

    let mut counts: Vec<(Move, u64)> = board
        .legal_moves(color)
        .par_iter()
        .map(|m| (*m, perft(&board.after_move(m), color.other_color(), depth - 1)))
        .collect();
    counts.sort_by_key(|(m, _)| m.to_string());
    counts
}
