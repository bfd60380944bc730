// Copyright (C) 2020-2024 Andy Kurnia.

use super::{alphabet, board, board_layout};
use std::fmt::Write;

#[inline(always)]
pub fn empty_label(board_layout: &board_layout::BoardLayout, row: i8, col: i8) -> &'static str {
    if row == board_layout.star_row() && col == board_layout.star_col() {
        return "*";
    }
    let premium = board_layout.premium_at(row, col);
    match (premium.word_multiplier, premium.letter_multiplier) {
        (3, _) => "=",
        (2, _) => "-",
        (_, 3) => "\"",
        (_, 2) => "\'",
        _ => " ",
    }
}

#[inline(always)]
pub fn board_label<'a>(
    alphabet: &'a alphabet::Alphabet,
    board_layout: &board_layout::BoardLayout,
    board: &board::Board,
    row: i8,
    col: i8,
) -> &'a str {
    alphabet
        .of(board.at(row, col))
        .unwrap_or_else(|| empty_label(board_layout, row, col))
}

// Grid with column letters and row numbers. Empty squares show their premium.
pub fn board_to_string(
    alphabet: &alphabet::Alphabet,
    board_layout: &board_layout::BoardLayout,
    board: &board::Board,
) -> String {
    let dim = board.dim();
    let mut s = String::new();
    let header = |s: &mut String| {
        s.push_str("  ");
        for c in 0..dim.cols {
            s.push(' ');
            s.push(((c as u8) + 0x61) as char);
        }
        s.push('\n');
    };
    let border = |s: &mut String| {
        s.push_str("  +");
        for _ in 1..dim.cols {
            s.push_str("--");
        }
        s.push_str("-+\n");
    };
    header(&mut s);
    border(&mut s);
    for r in 0..dim.rows {
        let _ = write!(s, "{:2}|", r + 1);
        for c in 0..dim.cols {
            if c > 0 {
                s.push(' ');
            }
            s.push_str(board_label(alphabet, board_layout, board, r, c));
        }
        let _ = writeln!(s, "|{}", r + 1);
    }
    border(&mut s);
    header(&mut s);
    s
}

pub fn print_board(
    alphabet: &alphabet::Alphabet,
    board_layout: &board_layout::BoardLayout,
    board: &board::Board,
) {
    print!("{}", board_to_string(alphabet, board_layout, board));
}
