//! Parsing of position strings in Forsyth-Edwards notation.
//!
//! Accepts the full six field form as well as the four field form produced by
//! [`Board::get_position`]; missing move counters default to `0 1`.

use thiserror::Error;

use crate::board::Board;
use crate::notation::string_to_square;
use crate::types::{Color, Piece, Square};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FenError {
    #[error("position string must have 4 to 6 space separated fields, found {0}")]
    FieldCount(usize),

    #[error("piece placement must describe 8 ranks, found {0}")]
    RankCount(usize),

    #[error("rank {rank} does not describe exactly 8 files")]
    RankLength { rank: u8 },

    #[error("unexpected char {0:?} in piece placement")]
    UnexpectedChar(char),

    #[error("side to move must be `w` or `b`, found {0:?}")]
    ActiveColor(String),

    #[error("invalid castling availability {0:?}")]
    Castling(String),

    #[error("invalid en passant square {0:?}")]
    EnPassant(String),

    #[error("invalid move counter {0:?}")]
    Counter(String),
}

#[derive(Debug, Clone)]
pub struct ParsedFen {
    pub board: Board,
    pub active_color: Color,
    /// Half moves since the last capture or pawn move
    pub halfmove_clock: u32,
    /// Starts at 1, incremented after every black move
    pub fullmove_number: u32,
}

pub fn parse_fen(fen: &str) -> Result<ParsedFen, FenError> {
    let parts: Vec<&str> = fen.split_whitespace().collect();
    if !(4..=6).contains(&parts.len()) {
        return Err(FenError::FieldCount(parts.len()));
    }

    let mut board = Board::empty();
    parse_placement(&mut board, parts[0])?;

    let active_color = match parts[1].chars().collect::<Vec<_>>().as_slice() {
        [c] => Color::from_char(*c),
        _ => None,
    }
    .ok_or_else(|| FenError::ActiveColor(parts[1].to_string()))?;

    let castling = parts[2];
    if castling != "-" && (castling.is_empty() || !castling.chars().all(|c| "KQkq".contains(c))) {
        return Err(FenError::Castling(castling.to_string()));
    }
    board.set_castling(
        castling.contains('K'),
        castling.contains('Q'),
        castling.contains('k'),
        castling.contains('q'),
    );
    // drop rights the placement cannot back
    board.update_castles();

    let en_passant = parts[3];
    if en_passant != "-" {
        let square = match en_passant.len() {
            2 => string_to_square(en_passant),
            _ => None,
        }
        .ok_or_else(|| FenError::EnPassant(en_passant.to_string()))?;
        board.set_en_passant(Some(square));
    }

    let halfmove_clock = parse_counter(parts.get(4).copied(), 0)?;
    let fullmove_number = parse_counter(parts.get(5).copied(), 1)?;

    Ok(ParsedFen {
        board,
        active_color,
        halfmove_clock,
        fullmove_number,
    })
}

fn parse_placement(board: &mut Board, placement: &str) -> Result<(), FenError> {
    let ranks: Vec<&str> = placement.split('/').collect();
    if ranks.len() != 8 {
        return Err(FenError::RankCount(ranks.len()));
    }

    // the first rank in the string is the eighth rank
    for (i, rank_str) in ranks.iter().enumerate() {
        let rank = 7 - i as u8;
        let mut file: u8 = 0;
        for piece_char in rank_str.chars() {
            if let Some(empty_count) = piece_char.to_digit(10).filter(|d| (1..=8).contains(d)) {
                file += empty_count as u8;
            } else {
                let piece = Piece::from_fen_char(piece_char)
                    .ok_or(FenError::UnexpectedChar(piece_char))?;
                if file >= 8 {
                    return Err(FenError::RankLength { rank: rank + 1 });
                }
                board.set_piece(piece, Square::new(file, rank));
                file += 1;
            }
            if file > 8 {
                return Err(FenError::RankLength { rank: rank + 1 });
            }
        }
        if file != 8 {
            return Err(FenError::RankLength { rank: rank + 1 });
        }
    }
    Ok(())
}

fn parse_counter(field: Option<&str>, default: u32) -> Result<u32, FenError> {
    match field {
        None => Ok(default),
        Some(s) => s.parse().map_err(|_| FenError::Counter(s.to_string())),
    }
}
