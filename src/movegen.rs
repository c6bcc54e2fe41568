//! Pseudo-legal move generation for a single piece.
//!
//! A pseudo-legal move obeys the piece's movement pattern and the occupancy of
//! the board, but may leave the mover's own king in check. Filtering those out
//! is the job of [`Board::is_valid_move`].

use bitflags::bitflags;
use itertools::iproduct;
use once_cell::sync::Lazy;

use crate::board::Board;
use crate::types::*;

bitflags! {
    pub struct MoveGenFlags: u8 {
        /// Do not generate castling moves. Attack detection sets this, since
        /// castling legality itself depends on attack detection.
        const EXCLUDE_CASTLES = 1 << 0;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl Direction {
    pub const ORTHOGONAL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];
    pub const DIAGONAL: [Direction; 4] = [
        Direction::NorthEast,
        Direction::NorthWest,
        Direction::SouthEast,
        Direction::SouthWest,
    ];
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
        Direction::NorthEast,
        Direction::NorthWest,
        Direction::SouthEast,
        Direction::SouthWest,
    ];

    /// (file delta, rank delta) of one step
    pub fn delta(&self) -> (i8, i8) {
        match self {
            Direction::North => (0, 1),
            Direction::South => (0, -1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
            Direction::NorthEast => (1, 1),
            Direction::NorthWest => (-1, 1),
            Direction::SouthEast => (1, -1),
            Direction::SouthWest => (-1, -1),
        }
    }
}

/// For every square, the squares reachable in each direction on an empty board,
/// nearest first.
pub struct RaysForBoard {
    rays: Vec<[Vec<Square>; 8]>,
}

impl RaysForBoard {
    pub fn new() -> Self {
        let rays = Square::all()
            .map(|square| {
                Direction::ALL.map(|direction| {
                    let (file_delta, rank_delta) = direction.delta();
                    std::iter::successors(square.offset(file_delta, rank_delta), |s| {
                        s.offset(file_delta, rank_delta)
                    })
                    .collect::<Vec<Square>>()
                })
            })
            .collect();
        RaysForBoard { rays }
    }

    pub fn ray(&self, square: Square, direction: Direction) -> &[Square] {
        &self.rays[square.index()][direction as usize]
    }
}

impl Default for RaysForBoard {
    fn default() -> Self {
        Self::new()
    }
}

pub static RAYS: Lazy<RaysForBoard> = Lazy::new(RaysForBoard::new);

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, 2),
    (-2, 1),
    (-2, -1),
    (-1, -2),
];

/// What happens when a piece tries to move onto a square
enum PotentialMove {
    /// Empty square, or an opposing piece that would be captured
    Valid { capture: bool },
    /// Blocked by a piece of the same color
    Invalid,
}

impl PotentialMove {
    fn continue_search_in_direction(&self) -> bool {
        matches!(self, PotentialMove::Valid { capture: false })
    }
}

fn check_move_target(board: &Board, piece: &Piece, candidate: &Square) -> PotentialMove {
    match board.piece_at(candidate) {
        Some(other_piece) if other_piece.color == piece.color => PotentialMove::Invalid,
        Some(_) => PotentialMove::Valid { capture: true },
        None => PotentialMove::Valid { capture: false },
    }
}

/// Get the pseudo-legal moves of `piece` on `board`.
pub fn generate_moves(piece: &Piece, board: &Board, flags: MoveGenFlags) -> Vec<Move> {
    match piece.piece_type {
        PieceType::Pawn => pawn_moves(piece, board),
        PieceType::Knight => step_moves(piece, board, KNIGHT_OFFSETS.iter().copied()),
        PieceType::Bishop => sliding_moves(piece, board, &Direction::DIAGONAL),
        PieceType::Rook => sliding_moves(piece, board, &Direction::ORTHOGONAL),
        PieceType::Queen => sliding_moves(piece, board, &Direction::ALL),
        PieceType::King => king_moves(piece, board, flags),
    }
}

fn pawn_moves(piece: &Piece, board: &Board) -> Vec<Move> {
    let mut moves: Vec<Move> = vec![];
    let src = piece.square;
    let forward = piece.color.forward();

    // move one square forward, requires no piece there
    if let Some(one_step) = src.offset(0, forward) {
        if board.piece_at(&one_step).is_none() {
            push_pawn_move(&mut moves, piece, one_step);

            // two squares from the starting rank, if both are free
            if src.rank == piece.color.pawn_rank() && !piece.has_moved {
                if let Some(two_step) = src.offset(0, 2 * forward) {
                    if board.piece_at(&two_step).is_none() {
                        moves.push(Move::new(src, two_step));
                    }
                }
            }
        }
    }

    for file_delta in [-1, 1] {
        let Some(target) = src.offset(file_delta, forward) else {
            continue;
        };
        match board.piece_at(&target) {
            Some(other_piece) if other_piece.color != piece.color => {
                push_pawn_move(&mut moves, piece, target)
            }
            Some(_) => {}
            None => {
                if is_en_passant_capture(board, piece, &target) {
                    moves.push(Move::new(src, target));
                }
            }
        }
    }
    moves
}

/// Pawn moves onto the last rank are expanded into one move per promotion piece
fn push_pawn_move(moves: &mut Vec<Move>, piece: &Piece, dst: Square) {
    if dst.rank == piece.color.other_color().back_rank() {
        for promotion in PIECES_CAN_PROMOTE_TO {
            moves.push(Move::with_promotion(piece.square, dst, promotion));
        }
    } else {
        moves.push(Move::new(piece.square, dst));
    }
}

/// The empty diagonal `target` is the square an opposing pawn just skipped over
fn is_en_passant_capture(board: &Board, piece: &Piece, target: &Square) -> bool {
    if board.en_passant() != Some(*target) {
        return false;
    }
    // the skipped square is on the capturing side's sixth rank
    let capture_rank = match piece.color {
        Color::White => 5,
        Color::Black => 2,
    };
    if target.rank != capture_rank {
        return false;
    }
    let passed = Square::new(target.file, piece.square.rank);
    board
        .piece_at(&passed)
        .is_some_and(|p| p.color != piece.color && p.piece_type == PieceType::Pawn)
}

/// Moves to fixed offsets (knight and king)
fn step_moves(
    piece: &Piece,
    board: &Board,
    offsets: impl Iterator<Item = (i8, i8)>,
) -> Vec<Move> {
    offsets
        .filter_map(|(file_delta, rank_delta)| piece.square.offset(file_delta, rank_delta))
        .filter(|candidate| {
            matches!(
                check_move_target(board, piece, candidate),
                PotentialMove::Valid { .. }
            )
        })
        .map(|candidate| Move::new(piece.square, candidate))
        .collect()
}

fn sliding_moves(piece: &Piece, board: &Board, directions: &[Direction]) -> Vec<Move> {
    let mut moves: Vec<Move> = vec![];
    for direction in directions {
        for candidate in RAYS.ray(piece.square, *direction) {
            let potential_move = check_move_target(board, piece, candidate);
            if let PotentialMove::Valid { .. } = potential_move {
                moves.push(Move::new(piece.square, *candidate));
            }
            if !potential_move.continue_search_in_direction() {
                break;
            }
        }
    }
    moves
}

fn king_moves(piece: &Piece, board: &Board, flags: MoveGenFlags) -> Vec<Move> {
    let offsets = iproduct!(-1..=1, -1..=1).filter(|&delta| delta != (0, 0));
    let mut moves = step_moves(piece, board, offsets);

    if !flags.contains(MoveGenFlags::EXCLUDE_CASTLES) {
        for side in [CastleSide::Kingside, CastleSide::Queenside] {
            let castle = side.king_move(piece.color);
            if piece.square == castle.src && board.can_castle(piece.color, side) {
                moves.push(castle);
            }
        }
    }
    moves
}
