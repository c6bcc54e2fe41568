use std::collections::HashMap;

use chrono::prelude::*;
use itertools::Itertools;
use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

use crate::board::Board;
use crate::fen::{parse_fen, FenError};
use crate::notation::NotationError;
use crate::types::*;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error(transparent)]
    Fen(#[from] FenError),

    #[error(transparent)]
    Notation(#[from] NotationError),

    #[error("illegal move {0}")]
    IllegalMove(Move),

    #[error("the game is over: {0}")]
    GameOver(Status),
}

/// A game in progress: the board plus the turn and clock state a position
/// string carries, and the moves played so far.
pub struct Game {
    board: Board,
    active_color: Color,
    halfmove_clock: u32,
    fullmove_number: u32,
    start_fen: String,
    moves: Vec<Move>,
    // occurrences of each position, keyed by `repetition_key`
    positions: HashMap<String, u32>,
    game_start_time: DateTime<Local>,
    silent: bool,
}

impl Game {
    pub fn new() -> Self {
        Self::from_parts(Board::new(), Color::White, 0, 1, false)
    }

    pub fn new_silent() -> Self {
        Self::from_parts(Board::new(), Color::White, 0, 1, true)
    }

    pub fn from_fen(fen: &str) -> Result<Self, GameError> {
        let parsed = parse_fen(fen)?;
        Ok(Self::from_parts(
            parsed.board,
            parsed.active_color,
            parsed.halfmove_clock,
            parsed.fullmove_number,
            false,
        ))
    }

    pub fn from_fen_silent(fen: &str) -> Result<Self, GameError> {
        let mut game = Self::from_fen(fen)?;
        game.silent = true;
        Ok(game)
    }

    fn from_parts(
        board: Board,
        active_color: Color,
        halfmove_clock: u32,
        fullmove_number: u32,
        silent: bool,
    ) -> Self {
        let mut game = Self {
            board,
            active_color,
            halfmove_clock,
            fullmove_number,
            start_fen: String::new(),
            moves: Vec::new(),
            positions: HashMap::new(),
            game_start_time: Local::now(),
            silent,
        };
        game.start_fen = game.fen();
        game.record_position();
        game
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn active_color(&self) -> Color {
        self.active_color
    }

    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn start_time(&self) -> DateTime<Local> {
        self.game_start_time
    }

    pub fn legal_moves(&self) -> Vec<Move> {
        self.board.legal_moves(self.active_color)
    }

    /// Play the move given in UCI notation for the side to move.
    ///
    /// Nothing changes if the move cannot be parsed, is not legal, or the game
    /// has already ended.
    pub fn try_move(&mut self, uci: &str) -> Result<Move, GameError> {
        if let Some(status) = self.status() {
            return Err(GameError::GameOver(status));
        }
        let mv: Move = uci.parse()?;
        if !self.board.is_valid_move(&mv, self.active_color) {
            return Err(GameError::IllegalMove(mv));
        }
        self.play_move(mv);
        Ok(mv)
    }

    /// Apply an already validated move and advance the turn
    fn play_move(&mut self, mv: Move) {
        let is_capture = self.board.piece_at(&mv.dst).is_some();
        let is_pawn_move = self
            .board
            .piece_at(&mv.src)
            .is_some_and(|p| p.piece_type == PieceType::Pawn);

        self.board.do_move(&mv);
        self.moves.push(mv);

        if is_capture || is_pawn_move {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }
        if self.active_color == Color::Black {
            self.fullmove_number += 1;
        }
        self.active_color.toggle();
        self.record_position();

        if !self.silent {
            self.log(&format!("move {}: {}", self.moves.len().div_ceil(2), mv));
            self.board.draw_to_terminal();
        }
    }

    fn record_position(&mut self) {
        let position = self.repetition_key();
        *self.positions.entry(position).or_insert(0) += 1;
    }

    fn repetitions(&self) -> u32 {
        self.positions.get(&self.repetition_key()).copied().unwrap_or(0)
    }

    /// Position as compared for repetitions. The en passant square only counts
    /// when a pawn of the side to move can legally capture onto it.
    fn repetition_key(&self) -> String {
        let position = self.board.get_position(self.active_color);
        let Some(target) = self.board.en_passant() else {
            return position;
        };
        let can_capture = self.legal_moves().iter().any(|m| {
            m.dst == target
                && self
                    .board
                    .piece_at(&m.src)
                    .is_some_and(|p| p.piece_type == PieceType::Pawn)
        });
        match position.rsplit_once(' ') {
            Some((head, _)) if !can_capture => format!("{} -", head),
            _ => position,
        }
    }

    /// Why the game has ended, or `None` while it goes on
    pub fn status(&self) -> Option<Status> {
        if let Some(status) = self.board.status(self.active_color) {
            return Some(status);
        }
        if self.halfmove_clock >= 100 {
            return Some(Status::FiftyMoveRule);
        }
        if self.repetitions() >= 3 {
            return Some(Status::ThreefoldRepetition);
        }
        None
    }

    /// Full six field FEN of the current position
    pub fn fen(&self) -> String {
        format!(
            "{} {} {}",
            self.board.get_position(self.active_color),
            self.halfmove_clock,
            self.fullmove_number
        )
    }

    /// Moves played so far, space separated
    pub fn moves_uci(&self) -> String {
        self.moves.iter().map(|m| m.to_string()).join(" ")
    }

    /// The `position` command that sets up this game in a UCI engine
    pub fn engine_position_command(&self) -> String {
        let mut command = if self.start_fen == STARTING_POSITION_FEN {
            "position startpos".to_string()
        } else {
            format!("position fen {}", self.start_fen)
        };
        if !self.moves.is_empty() {
            command.push_str(" moves ");
            command.push_str(&self.moves_uci());
        }
        command
    }

    /// Play up to `max_moves` random legal moves, stopping early when the game
    /// ends. Returns the status the game stopped with.
    pub fn play_random<R: Rng + ?Sized>(&mut self, max_moves: usize, rng: &mut R) -> Option<Status> {
        self.log(&format!("random playout from {}", self.fen()));
        for _ in 0..max_moves {
            if let Some(status) = self.status() {
                self.log(&format!("game over: {}", status));
                return Some(status);
            }
            let legal_moves = self.legal_moves();
            let Some(mv) = legal_moves.choose(rng).copied() else {
                break;
            };
            self.play_move(mv);
        }
        self.status()
    }

    fn log(&self, message: &str) {
        if self.silent {
            return;
        }
        let elapsed = Local::now() - self.game_start_time;
        println!(
            "[{} +{}ms] {}",
            Local::now().format("%H:%M:%S"),
            elapsed.num_milliseconds(),
            message
        );
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}
