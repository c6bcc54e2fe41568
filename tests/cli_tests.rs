//! Integration tests for the command line front end
//!
//! Run with: cargo test --test cli_tests

use std::process::{Command, Output};

use pretty_assertions::assert_eq;

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_chess_rules"))
        .args(args)
        .output()
        .expect("Failed to start chess_rules")
}

fn stdout_lines(output: &Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(|l| l.to_string())
        .collect()
}

#[test]
fn test_show_start_position() {
    let output = run(&["show"]);
    assert!(output.status.success());
    let lines = stdout_lines(&output);
    assert!(lines.contains(&"rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1".to_string()));
}

#[test]
fn test_moves_from_square() {
    let output = run(&["moves", "g1"]);
    assert!(output.status.success());
    assert_eq!(stdout_lines(&output), vec!["g1f3", "g1h3"]);
}

#[test]
fn test_moves_include_castles() {
    let output = run(&["--fen", "4k3/8/8/8/8/8/8/R3K2R w KQ - 0 1", "moves", "e1"]);
    assert!(output.status.success());
    let lines = stdout_lines(&output);
    assert!(lines.contains(&"e1g1".to_string()));
    assert!(lines.contains(&"e1c1".to_string()));
}

#[test]
fn test_moves_from_empty_square_fails() {
    let output = run(&["moves", "e4"]);
    assert!(!output.status.success());
}

#[test]
fn test_play_moves() {
    let output = run(&["play", "e2e4", "e7e5", "g1f3"]);
    assert!(output.status.success());
    assert_eq!(
        stdout_lines(&output),
        vec!["rnbqkbnr/pppp1ppp/8/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R b KQkq - 1 2"]
    );
}

#[test]
fn test_play_reports_checkmate() {
    let output = run(&["play", "f2f3", "e7e5", "g2g4", "d8h4"]);
    assert!(output.status.success());
    let lines = stdout_lines(&output);
    assert_eq!(lines.last().unwrap(), "checkmate, black wins");
}

#[test]
fn test_play_illegal_move_fails() {
    let output = run(&["play", "e2e4", "e2e4"]);
    assert!(!output.status.success());
    assert!(stdout_lines(&output).is_empty());
}

#[test]
fn test_bad_fen_fails() {
    let output = run(&["--fen", "8/8/8 w - -", "show"]);
    assert!(!output.status.success());
}

#[test]
fn test_perft() {
    let output = run(&["perft", "--depth", "2"]);
    assert!(output.status.success());
    assert_eq!(stdout_lines(&output), vec!["400"]);
}

#[test]
fn test_perft_divide() {
    let output = run(&["perft", "--depth", "2", "--divide"]);
    assert!(output.status.success());
    let lines = stdout_lines(&output);
    assert_eq!(lines.len(), 22);
    assert_eq!(lines[0], "a2a3: 20");
    assert_eq!(lines[21], "400");
}

#[test]
fn test_random_is_reproducible() {
    let args = ["random", "--moves", "30", "--seed", "11", "--quiet"];
    let first = run(&args);
    let second = run(&args);
    assert!(first.status.success());
    assert_eq!(stdout_lines(&first), stdout_lines(&second));

    // replaying the printed moves gives the printed position
    let lines = stdout_lines(&first);
    let mut play_args = vec!["play"];
    play_args.extend(lines[0].split_whitespace());
    let replay = run(&play_args);
    assert_eq!(stdout_lines(&replay)[0], lines[1]);
}
