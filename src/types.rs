use std::fmt;

pub const STARTING_POSITION_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

pub const PAWN_VALUE: u8 = 1;
pub const KNIGHT_VALUE: u8 = 3;
pub const BISHOP_VALUE: u8 = 3;
pub const ROOK_VALUE: u8 = 5;
pub const QUEEN_VALUE: u8 = 9;
/// Stand-in for an infinite value. Never used when weighing exchanges.
pub const KING_VALUE: u8 = u8::MAX;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// Side to move from the FEN letter (`w` or `b`)
    pub fn from_char(c: char) -> Option<Color> {
        match c {
            'w' => Some(Color::White),
            'b' => Some(Color::Black),
            _ => None,
        }
    }

    /// Piece color from the case of its FEN letter
    pub fn from_case(c: char) -> Option<Color> {
        if c.is_ascii_uppercase() {
            Some(Color::White)
        } else if c.is_ascii_lowercase() {
            Some(Color::Black)
        } else {
            None
        }
    }

    pub fn other_color(&self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    pub fn toggle(&mut self) {
        *self = self.other_color();
    }

    pub fn to_char(&self) -> char {
        match self {
            Self::White => 'w',
            Self::Black => 'b',
        }
    }

    pub fn to_human(&self) -> &str {
        match self {
            Self::White => "white",
            Self::Black => "black",
        }
    }

    /// Rank index (0-based) the pieces of this color start on
    pub fn back_rank(&self) -> u8 {
        match self {
            Self::White => 0,
            Self::Black => 7,
        }
    }

    /// Rank index (0-based) this color's pawns start on
    pub fn pawn_rank(&self) -> u8 {
        match self {
            Self::White => 1,
            Self::Black => 6,
        }
    }

    /// Rank delta of a pawn step forward
    pub fn forward(&self) -> i8 {
        match self {
            Self::White => 1,
            Self::Black => -1,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum PieceType {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceType {
    pub fn from_char(c: char) -> Option<PieceType> {
        match c.to_ascii_lowercase() {
            'p' => Some(PieceType::Pawn),
            'n' => Some(PieceType::Knight),
            'b' => Some(PieceType::Bishop),
            'r' => Some(PieceType::Rook),
            'q' => Some(PieceType::Queen),
            'k' => Some(PieceType::King),
            _ => None,
        }
    }

    /// Is the piece a sliding piece (one which can move multiple square in a given direction)
    pub fn is_sliding(&self) -> bool {
        matches!(self, PieceType::Rook | PieceType::Bishop | PieceType::Queen)
    }

    pub fn value(&self) -> u8 {
        match self {
            Self::Pawn => PAWN_VALUE,
            Self::Knight => KNIGHT_VALUE,
            Self::Bishop => BISHOP_VALUE,
            Self::Rook => ROOK_VALUE,
            Self::Queen => QUEEN_VALUE,
            Self::King => KING_VALUE,
        }
    }

    pub fn to_human(&self) -> &str {
        match self {
            Self::Pawn => "pawn",
            Self::Knight => "knight",
            Self::Bishop => "bishop",
            Self::Rook => "rook",
            Self::Queen => "queen",
            Self::King => "king",
        }
    }

    /// Lowercase letter, as used for promotions in move notation
    pub fn to_char(&self) -> char {
        match self {
            Self::Pawn => 'p',
            Self::Knight => 'n',
            Self::Bishop => 'b',
            Self::Rook => 'r',
            Self::Queen => 'q',
            Self::King => 'k',
        }
    }
}

pub const PIECES_CAN_PROMOTE_TO: [PieceType; 4] = [
    PieceType::Queen,
    PieceType::Rook,
    PieceType::Bishop,
    PieceType::Knight,
];

/// A square of the board. Both coordinates are 0-based: file 0 is the a-file,
/// rank 0 is the first rank.
///
/// Out of range coordinates can be stored so that they can be rejected with
/// [`Square::is_valid`] rather than wrapped or clamped.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Default)]
pub struct Square {
    pub file: u8,
    pub rank: u8,
}

impl Square {
    pub const fn new(file: u8, rank: u8) -> Self {
        Self { file, rank }
    }

    pub fn is_valid(&self) -> bool {
        self.file < 8 && self.rank < 8
    }

    /// The square `file_delta` files and `rank_delta` ranks away, if it is on the board
    pub fn offset(&self, file_delta: i8, rank_delta: i8) -> Option<Square> {
        let file = self.file as i8 + file_delta;
        let rank = self.rank as i8 + rank_delta;
        if (0..8).contains(&file) && (0..8).contains(&rank) {
            Some(Square::new(file as u8, rank as u8))
        } else {
            None
        }
    }

    /// Index into a 64 entry table, a1 = 0, h1 = 7, a8 = 56
    pub fn index(&self) -> usize {
        self.rank as usize * 8 + self.file as usize
    }

    pub fn from_index(index: usize) -> Square {
        Square::new((index % 8) as u8, (index / 8) as u8)
    }

    /// All 64 squares, a1 first
    pub fn all() -> impl Iterator<Item = Square> {
        (0..64).map(Square::from_index)
    }
}

/// A move from `src` to `dst`. Promotions carry the piece type the pawn turns into.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Move {
    pub src: Square,
    pub dst: Square,
    pub promotion: Option<PieceType>,
}

impl Move {
    pub const fn new(src: Square, dst: Square) -> Self {
        Self {
            src,
            dst,
            promotion: None,
        }
    }

    pub const fn with_promotion(src: Square, dst: Square, promotion: PieceType) -> Self {
        Self {
            src,
            dst,
            promotion: Some(promotion),
        }
    }

    pub fn is_promotion(&self) -> bool {
        self.promotion.is_some()
    }

    pub fn is_on_board(&self) -> bool {
        self.src.is_valid() && self.dst.is_valid()
    }
}

pub const WHITE_KING_CASTLE: Move = Move::new(Square::new(4, 0), Square::new(6, 0));
pub const WHITE_QUEEN_CASTLE: Move = Move::new(Square::new(4, 0), Square::new(2, 0));
pub const BLACK_KING_CASTLE: Move = Move::new(Square::new(4, 7), Square::new(6, 7));
pub const BLACK_QUEEN_CASTLE: Move = Move::new(Square::new(4, 7), Square::new(2, 7));

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum CastleSide {
    Kingside,
    Queenside,
}

impl CastleSide {
    /// The king's move for this castle
    pub fn king_move(&self, color: Color) -> Move {
        match (color, self) {
            (Color::White, CastleSide::Kingside) => WHITE_KING_CASTLE,
            (Color::White, CastleSide::Queenside) => WHITE_QUEEN_CASTLE,
            (Color::Black, CastleSide::Kingside) => BLACK_KING_CASTLE,
            (Color::Black, CastleSide::Queenside) => BLACK_QUEEN_CASTLE,
        }
    }

    /// The rook's move for this castle
    pub fn rook_move(&self, color: Color) -> Move {
        let rank = color.back_rank();
        match self {
            CastleSide::Kingside => Move::new(Square::new(7, rank), Square::new(5, rank)),
            CastleSide::Queenside => Move::new(Square::new(0, rank), Square::new(3, rank)),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Piece {
    pub color: Color,
    pub piece_type: PieceType,
    pub square: Square,
    pub has_moved: bool,
}

impl Piece {
    /// A piece that has not been placed yet. The board stamps the square on placement.
    pub fn new(color: Color, piece_type: PieceType) -> Self {
        Self {
            color,
            piece_type,
            square: Square::default(),
            has_moved: false,
        }
    }

    /// Build a piece from its FEN letter, uppercase for white
    pub fn from_fen_char(c: char) -> Option<Piece> {
        Some(Piece::new(Color::from_case(c)?, PieceType::from_char(c)?))
    }

    pub fn value(&self) -> u8 {
        self.piece_type.value()
    }

    pub fn fen_char(&self) -> char {
        match self.color {
            Color::White => self.piece_type.to_char().to_ascii_uppercase(),
            Color::Black => self.piece_type.to_char(),
        }
    }

    pub fn to_symbol(&self) -> &str {
        match (self.color, self.piece_type) {
            (Color::White, PieceType::Pawn) => "♙",
            (Color::White, PieceType::Knight) => "♘",
            (Color::White, PieceType::Bishop) => "♗",
            (Color::White, PieceType::Rook) => "♖",
            (Color::White, PieceType::Queen) => "♕",
            (Color::White, PieceType::King) => "♔",
            (Color::Black, PieceType::Pawn) => "♟︎",
            (Color::Black, PieceType::Knight) => "♞",
            (Color::Black, PieceType::Bishop) => "♝",
            (Color::Black, PieceType::Rook) => "♜",
            (Color::Black, PieceType::Queen) => "♛",
            (Color::Black, PieceType::King) => "♚",
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Status {
    /// Contains the winning color
    Checkmate(Color),
    Stalemate,
    ThreefoldRepetition,
    FiftyMoveRule,
    InsufficientMaterial,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Checkmate(winner) => write!(f, "checkmate, {} wins", winner.to_human()),
            Status::Stalemate => write!(f, "stalemate"),
            Status::ThreefoldRepetition => write!(f, "draw by threefold repetition"),
            Status::FiftyMoveRule => write!(f, "draw by the fifty move rule"),
            Status::InsufficientMaterial => write!(f, "draw by insufficient material"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_from_char() {
        assert_eq!(Color::from_char('w'), Some(Color::White));
        assert_eq!(Color::from_char('b'), Some(Color::Black));
        assert_eq!(Color::from_char('x'), None);
    }

    #[test]
    fn test_color_from_case() {
        assert_eq!(Color::from_case('K'), Some(Color::White));
        assert_eq!(Color::from_case('k'), Some(Color::Black));
        assert_eq!(Color::from_case('1'), None);
    }

    #[test]
    fn test_toggle_color() {
        let mut color = Color::White;
        color.toggle();
        assert_eq!(color, Color::Black);
        color.toggle();
        assert_eq!(color, Color::White);
        assert_eq!(Color::White, Color::Black.other_color());
    }

    #[test]
    fn test_piece_values() {
        assert_eq!(Piece::new(Color::White, PieceType::Pawn).value(), 1);
        assert_eq!(Piece::new(Color::Black, PieceType::Pawn).value(), 1);
        assert_eq!(PieceType::Knight.value(), 3);
        assert_eq!(PieceType::Bishop.value(), 3);
        assert_eq!(PieceType::Rook.value(), 5);
        assert_eq!(PieceType::Queen.value(), 9);
        assert_eq!(PieceType::King.value(), 255);
    }

    #[test]
    fn test_piece_type_from_char() {
        assert_eq!(PieceType::from_char('p'), Some(PieceType::Pawn));
        assert_eq!(PieceType::from_char('R'), Some(PieceType::Rook));
        assert_eq!(PieceType::from_char('n'), Some(PieceType::Knight));
        assert_eq!(PieceType::from_char('B'), Some(PieceType::Bishop));
        assert_eq!(PieceType::from_char('Q'), Some(PieceType::Queen));
        assert_eq!(PieceType::from_char('k'), Some(PieceType::King));
        assert_eq!(PieceType::from_char('x'), None);
    }

    #[test]
    fn test_is_sliding() {
        assert!(!PieceType::Pawn.is_sliding());
        assert!(PieceType::Rook.is_sliding());
        assert!(PieceType::Bishop.is_sliding());
        assert!(!PieceType::Knight.is_sliding());
        assert!(PieceType::Queen.is_sliding());
        assert!(!PieceType::King.is_sliding());
    }

    #[test]
    fn test_fen_char() {
        assert_eq!(Piece::from_fen_char('N').unwrap().fen_char(), 'N');
        assert_eq!(Piece::from_fen_char('q').unwrap().fen_char(), 'q');
        assert_eq!(Piece::from_fen_char('7'), None);
        let rook = Piece::from_fen_char('r').unwrap();
        assert_eq!(rook.color, Color::Black);
        assert_eq!(rook.piece_type, PieceType::Rook);
        assert!(!rook.has_moved);
    }

    #[test]
    fn test_square_offset() {
        let a1 = Square::new(0, 0);
        assert_eq!(a1.offset(1, 2), Some(Square::new(1, 2)));
        assert_eq!(a1.offset(-1, 0), None);
        assert_eq!(Square::new(7, 7).offset(0, 1), None);
        assert!(!Square::new(8, 0).is_valid());
        assert!(Square::new(7, 7).is_valid());
    }

    #[test]
    fn test_square_index() {
        for square in Square::all() {
            assert_eq!(Square::from_index(square.index()), square);
        }
        assert_eq!(Square::new(7, 0).index(), 7);
        assert_eq!(Square::new(0, 7).index(), 56);
    }

    #[test]
    fn test_move_equality_includes_promotion() {
        let src = Square::new(4, 6);
        let dst = Square::new(4, 7);
        assert_ne!(Move::new(src, dst), Move::with_promotion(src, dst, PieceType::Queen));
        assert_ne!(
            Move::with_promotion(src, dst, PieceType::Knight),
            Move::with_promotion(src, dst, PieceType::Queen)
        );
        assert!(Move::with_promotion(src, dst, PieceType::Rook).is_promotion());
        assert!(!Move::new(src, dst).is_promotion());
    }

    #[test]
    fn test_castle_moves() {
        assert_eq!(CastleSide::Kingside.king_move(Color::White), WHITE_KING_CASTLE);
        assert_eq!(CastleSide::Queenside.king_move(Color::Black), BLACK_QUEEN_CASTLE);
        assert_eq!(
            CastleSide::Queenside.rook_move(Color::White),
            Move::new(Square::new(0, 0), Square::new(3, 0))
        );
        assert_eq!(
            CastleSide::Kingside.rook_move(Color::Black),
            Move::new(Square::new(7, 7), Square::new(5, 7))
        );
    }
}
