//! Command line front end for the rules engine.
//!
//! Usage: cargo run --release -- perft --depth 4 --divide
//!        cargo run --release -- play e2e4 e7e5 g1f3
//!        cargo run --release -- --fen "4k3/8/8/8/8/8/8/R3K3 w Q - 0 1" moves e1

use std::time::Instant;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{eyre, Result, WrapErr};
use rand::rngs::StdRng;
use rand::SeedableRng;

use chess_rules::game::Game;
use chess_rules::perft::{perft, perft_divide};
use chess_rules::types::{Square, STARTING_POSITION_FEN};

#[derive(Parser, Debug)]
#[command(name = "chess_rules")]
#[command(about = "Legal moves, positions and perft counts for standard chess")]
struct Args {
    /// Position to start from, in FEN
    #[arg(long, global = true, default_value = STARTING_POSITION_FEN)]
    fen: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Draw the board and print its FEN
    Show,

    /// List the legal moves of the piece on a square
    Moves {
        /// Square in algebraic notation, e.g. e2
        square: String,
    },

    /// Play moves in UCI notation and print the resulting position
    Play {
        /// Moves such as e2e4 or e7e8q
        moves: Vec<String>,
    },

    /// Count the leaf nodes of the legal move tree
    Perft {
        #[arg(short, long, default_value_t = 3)]
        depth: u8,

        /// Print the node count below each root move
        #[arg(long)]
        divide: bool,
    },

    /// Play random legal moves from the position
    Random {
        /// Maximum number of half moves to play
        #[arg(short, long, default_value_t = 40)]
        moves: usize,

        /// Seed for a reproducible game
        #[arg(short, long)]
        seed: Option<u64>,

        /// Only print the result, not every move
        #[arg(short, long)]
        quiet: bool,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    match args.command {
        Command::Show => {
            let game = Game::from_fen_silent(&args.fen).wrap_err("could not load position")?;
            game.board().draw_to_terminal();
            println!("{}", game.fen());
            if let Some(status) = game.status() {
                println!("{}", status);
            }
        }
        Command::Moves { square } => {
            let game = Game::from_fen_silent(&args.fen).wrap_err("could not load position")?;
            let square: Square = square.parse()?;
            let piece = game
                .board()
                .piece_at(&square)
                .ok_or_else(|| eyre!("no piece on {}", square))?;
            let mut moves: Vec<String> = game
                .board()
                .get_moves_from(&square)
                .iter()
                .filter(|m| game.board().is_valid_move(m, piece.color))
                .map(|m| m.to_string())
                .collect();
            moves.sort();
            for m in moves {
                println!("{}", m);
            }
        }
        Command::Play { moves } => {
            let mut game = Game::from_fen_silent(&args.fen).wrap_err("could not load position")?;
            for m in &moves {
                game.try_move(m)
                    .wrap_err_with(|| format!("could not play {} after {} moves", m, game.moves().len()))?;
            }
            println!("{}", game.fen());
            if let Some(status) = game.status() {
                println!("{}", status);
            }
        }
        Command::Perft { depth, divide } => {
            let game = Game::from_fen_silent(&args.fen).wrap_err("could not load position")?;
            let now = Instant::now();
            let nodes = if divide {
                let counts = perft_divide(game.board(), game.active_color(), depth);
                for (m, count) in &counts {
                    println!("{}: {}", m, count);
                }
                println!();
                counts.iter().map(|(_, count)| count).sum()
            } else {
                perft(game.board(), game.active_color(), depth)
            };
            println!("{}", nodes);
            eprintln!("elapsed: {:.3}s", now.elapsed().as_secs_f32());
        }
        Command::Random { moves, seed, quiet } => {
            let mut game = if quiet {
                Game::from_fen_silent(&args.fen)
            } else {
                Game::from_fen(&args.fen)
            }
            .wrap_err("could not load position")?;
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let status = game.play_random(moves, &mut rng);
            println!("{}", game.moves_uci());
            println!("{}", game.fen());
            if let Some(status) = status {
                println!("{}", status);
            }
        }
    }
    Ok(())
}
