use std::cmp::{max, min};

use crate::fen::{parse_fen, FenError};
use crate::movegen::{generate_moves, MoveGenFlags};
use crate::types::*;

const BACK_RANK_PIECES: [PieceType; 8] = [
    PieceType::Rook,
    PieceType::Knight,
    PieceType::Bishop,
    PieceType::Queen,
    PieceType::King,
    PieceType::Bishop,
    PieceType::Knight,
    PieceType::Rook,
];

/// An 8x8 grid where every square holds at most one piece, plus the state that
/// cannot be read off the pieces themselves.
///
/// Cloning is a plain copy of the grid, which is how hypothetical moves are
/// tried out (see [`Board::after_move`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    // indexed [file][rank]
    squares: [[Option<Piece>; 8]; 8],
    en_passant_target: Option<Square>,
    // castling rights not yet revoked. Only ever go from true to false, except
    // through `set_castling`
    castle_kingside_white: bool,
    castle_queenside_white: bool,
    castle_kingside_black: bool,
    castle_queenside_black: bool,
    white_king: Option<Square>,
    black_king: Option<Square>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Board in the standard starting position
    pub fn new() -> Board {
        let mut board = Board::empty();
        for (file, piece_type) in BACK_RANK_PIECES.iter().enumerate() {
            let file = file as u8;
            for color in [Color::White, Color::Black] {
                board.set_piece(Piece::new(color, *piece_type), Square::new(file, color.back_rank()));
                board.set_piece(Piece::new(color, PieceType::Pawn), Square::new(file, color.pawn_rank()));
            }
        }
        board
    }

    /// Board without pieces. Castling rights start granted and are pruned as
    /// soon as a move shows the king or rook missing.
    pub fn empty() -> Board {
        Board {
            squares: [[None; 8]; 8],
            en_passant_target: None,
            castle_kingside_white: true,
            castle_queenside_white: true,
            castle_kingside_black: true,
            castle_queenside_black: true,
            white_king: None,
            black_king: None,
        }
    }

    /// Board described by the first four fields of a FEN string. The side to move and
    /// move counters are dropped, use [`parse_fen`] to keep them.
    pub fn from_fen(fen: &str) -> Result<Board, FenError> {
        Ok(parse_fen(fen)?.board)
    }

    pub fn piece_at(&self, square: &Square) -> Option<&Piece> {
        if !square.is_valid() {
            return None;
        }
        self.squares[square.file as usize][square.rank as usize].as_ref()
    }

    /// All pieces on the board, file by file
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.squares.iter().flatten().flatten()
    }

    /// Put `piece` on `square`, discarding whatever was there
    pub fn set_piece(&mut self, mut piece: Piece, square: Square) {
        if !square.is_valid() {
            return;
        }
        piece.square = square;
        self.squares[square.file as usize][square.rank as usize] = Some(piece);
        self.sync_king_squares(Some(square));
    }

    pub fn clear_piece_at(&mut self, square: &Square) {
        if !square.is_valid() {
            return;
        }
        self.squares[square.file as usize][square.rank as usize] = None;
        self.sync_king_squares(None);
    }

    /// Remove every piece. The en passant target goes with them.
    pub fn clear(&mut self) {
        self.squares = [[None; 8]; 8];
        self.en_passant_target = None;
        self.sync_king_squares(None);
    }

    pub fn white_king(&self) -> Option<Square> {
        self.white_king
    }

    pub fn black_king(&self) -> Option<Square> {
        self.black_king
    }

    pub fn king_square(&self, color: Color) -> Option<Square> {
        match color {
            Color::White => self.white_king,
            Color::Black => self.black_king,
        }
    }

    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant_target
    }

    pub fn set_en_passant(&mut self, square: Option<Square>) {
        self.en_passant_target = square.filter(|s| s.is_valid());
    }

    /// Keep the cached king squares in step with the grid. Every mutation goes
    /// through here: `placed` is the square a piece just landed on, if any.
    fn sync_king_squares(&mut self, placed: Option<Square>) {
        let placed_king = placed
            .and_then(|square| self.piece_at(&square))
            .filter(|p| p.piece_type == PieceType::King)
            .copied();
        if let Some(king) = placed_king {
            *self.king_slot(king.color) = Some(king.square);
        }

        // a cached king may have been cleared or captured
        for color in [Color::White, Color::Black] {
            let still_there = self
                .king_square(color)
                .and_then(|square| self.piece_at(&square))
                .is_some_and(|p| p.piece_type == PieceType::King && p.color == color);
            if !still_there {
                let found = self.find_king(color);
                *self.king_slot(color) = found;
            }
        }
    }

    fn king_slot(&mut self, color: Color) -> &mut Option<Square> {
        match color {
            Color::White => &mut self.white_king,
            Color::Black => &mut self.black_king,
        }
    }

    fn find_king(&self, color: Color) -> Option<Square> {
        self.pieces()
            .find(|p| p.piece_type == PieceType::King && p.color == color)
            .map(|p| p.square)
    }

    /// Apply `mv` without checking it. Callers taking moves from outside must gate
    /// them with [`Board::is_valid_move`] first.
    ///
    /// Besides relocating the piece this handles the side effects of special moves:
    /// - the rook jumps over the king when the move matches a castling template
    /// - an en passant capture removes the passed pawn
    /// - a pawn reaching the last rank becomes the requested piece
    /// - a double pawn push sets the en passant target, any other move clears it
    ///
    /// Castling rights are recomputed afterwards. A move from an empty or off-board
    /// square does nothing.
    pub fn do_move(&mut self, mv: &Move) {
        if !mv.is_on_board() || mv.src == mv.dst {
            return;
        }
        let Some(mut piece) = self.squares[mv.src.file as usize][mv.src.rank as usize].take() else {
            return;
        };

        let castle = self.castle_for(&piece, mv);
        let en_passant_capture = piece.piece_type == PieceType::Pawn
            && Some(mv.dst) == self.en_passant_target
            && mv.src.file != mv.dst.file
            && self.piece_at(&mv.dst).is_none();
        let double_push = piece.piece_type == PieceType::Pawn && mv.src.rank.abs_diff(mv.dst.rank) == 2;

        piece.square = mv.dst;
        piece.has_moved = true;
        if let Some(promotion) = mv.promotion {
            let last_rank = piece.color.other_color().back_rank();
            if piece.piece_type == PieceType::Pawn
                && mv.dst.rank == last_rank
                && PIECES_CAN_PROMOTE_TO.contains(&promotion)
            {
                piece.piece_type = promotion;
            }
        }
        self.squares[mv.dst.file as usize][mv.dst.rank as usize] = Some(piece);

        if en_passant_capture {
            self.squares[mv.dst.file as usize][mv.src.rank as usize] = None;
        }

        if let Some(side) = castle {
            let rook_move = side.rook_move(piece.color);
            if let Some(mut rook) =
                self.squares[rook_move.src.file as usize][rook_move.src.rank as usize].take()
            {
                rook.square = rook_move.dst;
                rook.has_moved = true;
                self.squares[rook_move.dst.file as usize][rook_move.dst.rank as usize] = Some(rook);
            }
        }

        self.en_passant_target = if double_push {
            Some(Square::new(mv.src.file, (mv.src.rank + mv.dst.rank) / 2))
        } else {
            None
        };

        self.sync_king_squares(Some(mv.dst));
        self.update_castles();
    }

    /// The castle `mv` performs, if it matches one of the templates: an unmoved king
    /// leaving its home square two files toward an unmoved rook of its color.
    fn castle_for(&self, piece: &Piece, mv: &Move) -> Option<CastleSide> {
        if piece.piece_type != PieceType::King || piece.has_moved {
            return None;
        }
        [CastleSide::Kingside, CastleSide::Queenside]
            .into_iter()
            .find(|side| {
                let template = side.king_move(piece.color);
                let rook_home = side.rook_move(piece.color).src;
                template.src == mv.src
                    && template.dst == mv.dst
                    && self.piece_at(&rook_home).is_some_and(|rook| {
                        rook.piece_type == PieceType::Rook
                            && rook.color == piece.color
                            && !rook.has_moved
                    })
            })
    }

    /// Overwrite the castling rights, for setting up a position
    pub fn set_castling(&mut self, wkc: bool, wqc: bool, bkc: bool, bqc: bool) {
        self.castle_kingside_white = wkc;
        self.castle_queenside_white = wqc;
        self.castle_kingside_black = bkc;
        self.castle_queenside_black = bqc;
    }

    /// Revoke every castling right whose king or rook is no longer unmoved on its
    /// home square. Rights are never granted back, even if the piece returns.
    pub fn update_castles(&mut self) {
        let wkc = self.castle_pieces_unmoved(Color::White, CastleSide::Kingside);
        let wqc = self.castle_pieces_unmoved(Color::White, CastleSide::Queenside);
        let bkc = self.castle_pieces_unmoved(Color::Black, CastleSide::Kingside);
        let bqc = self.castle_pieces_unmoved(Color::Black, CastleSide::Queenside);
        self.castle_kingside_white &= wkc;
        self.castle_queenside_white &= wqc;
        self.castle_kingside_black &= bkc;
        self.castle_queenside_black &= bqc;
    }

    fn castle_pieces_unmoved(&self, color: Color, side: CastleSide) -> bool {
        let unmoved_at = |square: Square, piece_type: PieceType| {
            self.piece_at(&square)
                .is_some_and(|p| p.color == color && p.piece_type == piece_type && !p.has_moved)
        };
        unmoved_at(side.king_move(color).src, PieceType::King)
            && unmoved_at(side.rook_move(color).src, PieceType::Rook)
    }

    fn castle_flag(&self, color: Color, side: CastleSide) -> bool {
        match (color, side) {
            (Color::White, CastleSide::Kingside) => self.castle_kingside_white,
            (Color::White, CastleSide::Queenside) => self.castle_queenside_white,
            (Color::Black, CastleSide::Kingside) => self.castle_kingside_black,
            (Color::Black, CastleSide::Queenside) => self.castle_queenside_black,
        }
    }

    /// The castling right as written in a FEN string: not revoked, and the king and
    /// rook still unmoved on their home squares. Says nothing about checks or
    /// pieces in the way.
    pub fn has_castling_right(&self, color: Color, side: CastleSide) -> bool {
        self.castle_flag(color, side) && self.castle_pieces_unmoved(color, side)
    }

    /// [`Board::has_castling_right`] for white king side, white queen side, black
    /// king side and black queen side, in that order
    pub fn castling_rights(&self) -> [bool; 4] {
        [
            self.has_castling_right(Color::White, CastleSide::Kingside),
            self.has_castling_right(Color::White, CastleSide::Queenside),
            self.has_castling_right(Color::Black, CastleSide::Kingside),
            self.has_castling_right(Color::Black, CastleSide::Queenside),
        ]
    }

    /// Whether `color` can castle on `side` right now.
    ///
    /// Needs the castling right, every square between king and rook empty, the
    /// king out of check, and neither the square the king crosses nor the one it
    /// lands on attacked.
    pub fn can_castle(&self, color: Color, side: CastleSide) -> bool {
        if !self.has_castling_right(color, side) {
            return false;
        }
        let king_move = side.king_move(color);
        let rook_home = side.rook_move(color).src;
        let rank = color.back_rank();

        let low = min(king_move.src.file, rook_home.file) + 1;
        let high = max(king_move.src.file, rook_home.file);
        if (low..high).any(|file| self.piece_at(&Square::new(file, rank)).is_some()) {
            return false;
        }

        if self.is_in_check(color) {
            return false;
        }

        // the king may not pass through or land on an attacked square. Attack
        // detection only looks at occupied squares, so step the king there on a copy
        let step: i8 = if king_move.dst.file > king_move.src.file { 1 } else { -1 };
        let Some(transit) = king_move.src.offset(step, 0) else {
            return false;
        };
        [transit, king_move.dst].iter().all(|square| {
            !self
                .after_move(&Move::new(king_move.src, *square))
                .is_in_check(color)
        })
    }

    /// Can the piece on `square` be captured by the other side?
    ///
    /// False for an empty square: this asks whether the occupant is attacked, not
    /// whether the square is.
    pub fn can_be_captured(&self, square: &Square) -> bool {
        let Some(target) = self.piece_at(square) else {
            return false;
        };
        self.pieces()
            .filter(|p| p.color != target.color)
            .any(|p| {
                generate_moves(p, self, MoveGenFlags::EXCLUDE_CASTLES)
                    .iter()
                    .any(|m| m.dst == *square)
            })
    }

    pub fn is_in_check(&self, color: Color) -> bool {
        self.king_square(color)
            .is_some_and(|square| self.can_be_captured(&square))
    }

    /// Pseudo-legal moves of the piece on `square`
    pub fn get_moves_from(&self, square: &Square) -> Vec<Move> {
        match self.piece_at(square) {
            Some(piece) => generate_moves(piece, self, MoveGenFlags::empty()),
            None => vec![],
        }
    }

    /// Is `mv` legal for `active_color`?
    ///
    /// `mv` must be one of the pseudo-legal moves of the piece on its source
    /// square, and playing it on a copy of the board must not leave
    /// `active_color`'s king in check. On top of that the piece must belong to
    /// `active_color`, so moving the opponent's pieces is rejected even when it
    /// would leave `active_color` safe.
    pub fn is_valid_move(&self, mv: &Move, active_color: Color) -> bool {
        let Some(piece) = self.piece_at(&mv.src) else {
            return false;
        };
        if piece.color != active_color {
            return false;
        }
        if !self.get_moves_from(&mv.src).contains(mv) {
            return false;
        }
        !self.after_move(mv).is_in_check(active_color)
    }

    /// Copy of the board with `mv` applied. The board itself is left untouched.
    pub fn after_move(&self, mv: &Move) -> Board {
        let mut future_board = self.clone();
        future_board.do_move(mv);
        future_board
    }

    /// Get all legal moves for side `color`
    pub fn legal_moves(&self, color: Color) -> Vec<Move> {
        self.pieces()
            .filter(|p| p.color == color)
            .flat_map(|p| generate_moves(p, self, MoveGenFlags::empty()))
            .filter(|m| !self.after_move(m).is_in_check(color))
            .collect()
    }

    /// Checkmate, stalemate or insufficient material, with `color` to move
    pub fn status(&self, color: Color) -> Option<Status> {
        if self.legal_moves(color).is_empty() {
            if self.is_in_check(color) {
                return Some(Status::Checkmate(color.other_color()));
            }
            return Some(Status::Stalemate);
        }
        if self.has_insufficient_material() {
            return Some(Status::InsufficientMaterial);
        }
        None
    }

    /// Neither side has more than a king and a single minor piece.
    ///
    /// This is a coarse rule: king and knight against king and knight, or king and
    /// bishop against king and bishop on opposite colors, count as drawn here
    /// although a mate is still possible with help from the losing side.
    pub fn has_insufficient_material(&self) -> bool {
        [Color::White, Color::Black].iter().all(|color| {
            let pieces: Vec<&Piece> = self.pieces().filter(|p| p.color == *color).collect();
            match pieces.len() {
                0 | 1 => true,
                2 => pieces.iter().any(|p| {
                    matches!(p.piece_type, PieceType::Knight | PieceType::Bishop)
                }),
                _ => false,
            }
        })
    }

    /// The first four fields of a FEN string: placement, side to move, castling
    /// rights and en passant target. Move counters are left to the caller.
    pub fn get_position(&self, active_color: Color) -> String {
        let mut ranks: Vec<String> = Vec::with_capacity(8);
        for rank in (0..8).rev() {
            let mut rank_str = String::new();
            let mut empty_count = 0;
            for file in 0..8 {
                match self.piece_at(&Square::new(file, rank)) {
                    Some(piece) => {
                        if empty_count > 0 {
                            rank_str.push_str(&empty_count.to_string());
                            empty_count = 0;
                        }
                        rank_str.push(piece.fen_char());
                    }
                    None => empty_count += 1,
                }
            }
            if empty_count > 0 {
                rank_str.push_str(&empty_count.to_string());
            }
            ranks.push(rank_str);
        }

        let mut castling: String = self
            .castling_rights()
            .iter()
            .zip(['K', 'Q', 'k', 'q'])
            .filter(|(right, _)| **right)
            .map(|(_, letter)| letter)
            .collect();
        if castling.is_empty() {
            castling.push('-');
        }

        let en_passant = match self.en_passant_target {
            Some(square) => square.to_string(),
            None => "-".to_string(),
        };

        format!(
            "{} {} {} {}",
            ranks.join("/"),
            active_color.to_char(),
            castling,
            en_passant
        )
    }

    pub fn draw_board(&self) -> String {
        let mut string = String::new();

        for rank in (0..8).rev() {
            for file in 0..8 {
                let symbol = match self.piece_at(&Square::new(file, rank)) {
                    Some(piece) => piece.to_symbol(),
                    None => ".",
                };
                string.push(' ');
                string.push_str(symbol);
            }
            string.push('\n');
        }
        string
    }

    pub fn draw_to_terminal(&self) {
        println!("{}", self.draw_board());
    }
}
