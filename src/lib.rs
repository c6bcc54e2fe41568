pub mod types;
pub mod notation;
pub mod movegen;
pub mod board;
pub mod fen;
pub mod game;
pub mod perft;
