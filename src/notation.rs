//! Conversions between text notation and board coordinates.
//!
//! Squares are written as a file letter and a rank digit (`e4`). Moves use the
//! UCI form: source square, destination square and an optional lowercase
//! promotion letter (`e2e4`, `e7e8q`).
//!
//! These strings usually come from users or from an engine process, so nothing
//! here panics on bad input: every conversion returns `None` instead.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::types::{Move, PieceType, Square};

const FILES: [char; 8] = ['a', 'b', 'c', 'd', 'e', 'f', 'g', 'h'];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NotationError {
    #[error("invalid square notation: {0:?}")]
    InvalidSquare(String),

    #[error("invalid move notation: {0:?}")]
    InvalidMove(String),
}

/// File letter (either case) to its 0-based index
pub fn file_to_number(file: char) -> Option<u8> {
    let file = file.to_ascii_lowercase();
    if ('a'..='h').contains(&file) {
        Some(file as u8 - b'a')
    } else {
        None
    }
}

/// 0-based file index to its lowercase letter
pub fn number_to_file(number: u8) -> Option<char> {
    FILES.get(number as usize).copied()
}

pub fn square_to_string(square: &Square) -> Option<String> {
    if !square.is_valid() {
        return None;
    }
    let file = number_to_file(square.file)?;
    Some(format!("{}{}", file, square.rank + 1))
}

/// Parse the first two characters of `s` as a square
pub fn string_to_square(s: &str) -> Option<Square> {
    let mut chars = s.chars();
    let file = file_to_number(chars.next()?)?;
    let rank_char = chars.next()?;
    if !('1'..='8').contains(&rank_char) {
        return None;
    }
    Some(Square::new(file, rank_char as u8 - b'1'))
}

pub fn move_to_uci(mv: &Move) -> Option<String> {
    let mut uci = square_to_string(&mv.src)?;
    uci.push_str(&square_to_string(&mv.dst)?);
    if let Some(promotion) = mv.promotion {
        uci.push(promotion.to_char());
    }
    Some(uci)
}

/// Parse a move in UCI notation.
///
/// A fifth character marks a promotion. A letter that names no piece falls back
/// to [`PieceType::Pawn`]; such a move never matches a generated move, so it is
/// rejected later by the legality check instead of here.
pub fn uci_to_move(uci: &str) -> Option<Move> {
    if !uci.is_ascii() || uci.len() < 4 || uci.len() > 5 {
        return None;
    }
    let src = string_to_square(&uci[0..2])?;
    let dst = string_to_square(&uci[2..4])?;
    let promotion = uci
        .chars()
        .nth(4)
        .map(|c| PieceType::from_char(c).unwrap_or(PieceType::Pawn));
    Some(Move { src, dst, promotion })
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match square_to_string(self) {
            Some(s) => write!(f, "{s}"),
            None => write!(f, "-"),
        }
    }
}

impl FromStr for Square {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 2 {
            return Err(NotationError::InvalidSquare(s.to_string()));
        }
        string_to_square(s).ok_or_else(|| NotationError::InvalidSquare(s.to_string()))
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match move_to_uci(self) {
            Some(s) => write!(f, "{s}"),
            None => write!(f, "0000"),
        }
    }
}

impl FromStr for Move {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        uci_to_move(s).ok_or_else(|| NotationError::InvalidMove(s.to_string()))
    }
}
