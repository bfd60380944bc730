// Copyright (C) 2020-2024 Andy Kurnia.

use super::{movegen, rack};
use std::cmp::Reverse;

// Highest score wins. Ties go to across over down, then the topmost row, then
// the leftmost column, then the word that sorts first.
#[inline(always)]
fn rank(down: bool, row: i8, col: i8, word: &[u8], score: i16) -> (Reverse<i16>, bool, i8, i8, &[u8]) {
    (Reverse(score), down, row, col, word)
}

pub fn find_best_move(
    move_generator: &mut movegen::MoveGenerator,
    board_snapshot: &movegen::BoardSnapshot<'_>,
    rack: &rack::Rack,
) -> Option<movegen::Play> {
    let mut best: Option<movegen::Play> = None;
    let mut num_candidates = 0usize;
    move_generator.gen_moves(
        board_snapshot,
        rack,
        |down: bool, row: i8, col: i8, word: &[u8], score: i16, leave: &[u8]| {
            num_candidates += 1;
            let better = match &best {
                None => true,
                Some(play) => {
                    rank(down, row, col, word, score)
                        < rank(play.down, play.row, play.col, &play.word, play.score)
                }
            };
            if better {
                best = Some(movegen::Play {
                    down,
                    row,
                    col,
                    word: word.into(),
                    score,
                    leave: leave.into(),
                });
            }
        },
    );
    tracing::trace!(num_candidates, found = best.is_some(), "searched");
    best
}

// All candidates, best first.
pub fn rank_moves(
    move_generator: &mut movegen::MoveGenerator,
    board_snapshot: &movegen::BoardSnapshot<'_>,
    rack: &rack::Rack,
) -> Vec<movegen::Play> {
    move_generator.gen_moves_alloc(board_snapshot, rack);
    let mut plays = std::mem::take(&mut move_generator.plays);
    plays.sort_unstable_by(|a, b| {
        rank(a.down, a.row, a.col, &a.word, a.score).cmp(&rank(
            b.down, b.row, b.col, &b.word, b.score,
        ))
    });
    plays
}
