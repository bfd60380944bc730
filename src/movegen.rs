// Copyright (C) 2020-2024 Andy Kurnia.

use super::{alphabet, board, board_layout, dawg, game_config, rack};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Play {
    pub down: bool,
    pub row: i8,
    pub col: i8,
    pub word: Box<[u8]>,  // the whole word, including tiles already on the board.
    pub score: i16,
    pub leave: Box<[u8]>, // rack tally after this play.
}

impl Play {
    #[inline(always)]
    pub fn square(&self, i: i8) -> (i8, i8) {
        if self.down {
            (self.row + i, self.col)
        } else {
            (self.row, self.col + i)
        }
    }

    // the tiles this play takes from the rack, given the board before the play.
    pub fn played_tiles(&self, board: &board::Board) -> Vec<u8> {
        (0i8..)
            .zip(self.word.iter())
            .filter_map(|(i, &tile)| {
                let (row, col) = self.square(i);
                if board.at(row, col) == 0 {
                    Some(tile)
                } else {
                    None
                }
            })
            .collect()
    }

    // 8D CAT 5 (across), D8 CAT 5 (down). tiles already on the board are in parentheses.
    pub fn fmt(&self, alphabet: &alphabet::Alphabet, board: &board::Board) -> String {
        let mut s = if self.down {
            format!("{}{} ", ((self.col as u8) + 0x41) as char, self.row + 1)
        } else {
            format!("{}{} ", self.row + 1, ((self.col as u8) + 0x41) as char)
        };
        let mut inside = false;
        for (i, &tile) in (0i8..).zip(self.word.iter()) {
            let (row, col) = self.square(i);
            let on_board = board.at(row, col) != 0;
            if on_board != inside {
                s.push(if on_board { '(' } else { ')' });
                inside = on_board;
            }
            s.push_str(alphabet.of(tile).unwrap_or("?"));
        }
        if inside {
            s.push(')');
        }
        s.push_str(&format!(" {}", self.score));
        s
    }
}

pub struct BoardSnapshot<'a> {
    pub board: &'a board::Board,
    pub game_config: &'a game_config::GameConfig,
    pub dawg: &'a dawg::Dawg,
}

// Tiles that may go on an empty square with a perpendicular neighbor.
#[derive(Clone, Copy, Default)]
struct CrossSet {
    constrained: bool,
    bits: u64,
}

#[inline(always)]
fn premium_at(
    board_layout: &board_layout::BoardLayout,
    down: bool,
    lane: i8,
    idx: i8,
) -> board_layout::Premium {
    if down {
        board_layout.premium_at(idx, lane)
    } else {
        board_layout.premium_at(lane, idx)
    }
}

// Reads the maximal run of tiles down the column through (row, col), with
// tile on (row, col). Returns the score of that word if the dawg accepts it.
// The premium belongs to (row, col) and only applies because tile is new.
pub fn check_crossword(
    dawg: &dawg::Dawg,
    alphabet: &alphabet::Alphabet,
    board: &board::Board,
    row: i8,
    col: i8,
    tile: u8,
    premium: board_layout::Premium,
) -> Option<i16> {
    let mut top = row;
    while top > 0 && board.at(top - 1, col) != 0 {
        top -= 1;
    }
    let mut p = dawg.root();
    let mut score = 0i16;
    for r in top..board.dim().rows {
        let t = if r == row { tile } else { board.at(r, col) };
        if t == 0 {
            break;
        }
        p = dawg.seek(p, t)?;
        score += alphabet.score(t) as i16;
    }
    if !dawg.accepts(p) {
        return None;
    }
    Some(
        (score + (alphabet.score(tile) as i16) * (premium.letter_multiplier as i16 - 1))
            * (premium.word_multiplier as i16),
    )
}

struct WorkingBuffer {
    rack_tally: Box<[u8]>,        // alphabet.len()
    word_buffer: Box<[u8]>,       // max(r, c)
    cross_sets: Box<[CrossSet]>,  // max(r, c)
    cross_scores: Box<[i16]>,     // max(r, c) * alphabet.len()
}

impl WorkingBuffer {
    fn new(game_config: &game_config::GameConfig) -> Self {
        let dim = game_config.board_layout().dim();
        let lane_len = std::cmp::max(dim.rows, dim.cols) as usize;
        let alphabet_len = game_config.alphabet().len() as usize;
        Self {
            rack_tally: vec![0u8; alphabet_len].into_boxed_slice(),
            word_buffer: vec![0u8; lane_len].into_boxed_slice(),
            cross_sets: vec![CrossSet::default(); lane_len].into_boxed_slice(),
            cross_scores: vec![0i16; lane_len * alphabet_len].into_boxed_slice(),
        }
    }
}

fn gen_cross_sets(
    board_snapshot: &BoardSnapshot<'_>,
    board: &board::Board,
    lane: i8,
    down: bool,
    cross_sets: &mut [CrossSet],
    cross_scores: &mut [i16],
) {
    let alphabet = board_snapshot.game_config.alphabet();
    let alphabet_len = alphabet.len() as usize;
    let dim = board.dim();
    for idx in 0..dim.cols {
        let cross_set = &mut cross_sets[idx as usize];
        *cross_set = CrossSet::default();
        if board.at(lane, idx) != 0 {
            continue;
        }
        if !((lane > 0 && board.at(lane - 1, idx) != 0)
            || (lane + 1 < dim.rows && board.at(lane + 1, idx) != 0))
        {
            continue;
        }
        let premium = premium_at(board_snapshot.game_config.board_layout(), down, lane, idx);
        cross_set.constrained = true;
        for tile in 1..alphabet.len() {
            if let Some(score) = check_crossword(
                board_snapshot.dawg,
                alphabet,
                board,
                lane,
                idx,
                tile,
                premium,
            ) {
                cross_set.bits |= 1 << tile;
                cross_scores[idx as usize * alphabet_len + tile as usize] = score;
            }
        }
    }
}

// Enumerates placements along one lane of board (which may be the transposed
// board, in which case down is set so premiums are looked up correctly).
// center_col is the square a first move must cover, or -1.
fn gen_line_moves<CallbackType: FnMut(i8, &[u8], i16, &[u8])>(
    board_snapshot: &BoardSnapshot<'_>,
    board: &board::Board,
    lane: i8,
    down: bool,
    center_col: i8,
    working_buffer: &mut WorkingBuffer,
    callback: CallbackType,
) {
    let WorkingBuffer {
        rack_tally,
        word_buffer,
        cross_sets,
        cross_scores,
    } = working_buffer;
    gen_cross_sets(board_snapshot, board, lane, down, cross_sets, cross_scores);

    #[derive(Clone, Copy)]
    struct Points {
        main: i16,
        cross: i16,
        word_multiplier: i16,
    }

    struct Env<'a, CallbackType: FnMut(i8, &[u8], i16, &[u8])> {
        board: &'a board::Board,
        game_config: &'a game_config::GameConfig,
        dawg: &'a dawg::Dawg,
        cross_sets: &'a [CrossSet],
        cross_scores: &'a [i16],
        rack_tally: &'a mut [u8],
        word_buffer: &'a mut [u8],
        callback: CallbackType,
        lane: i8,
        down: bool,
        center_col: i8,
        num_played: i8,
    }

    fn record<CallbackType: FnMut(i8, &[u8], i16, &[u8])>(
        env: &mut Env<CallbackType>,
        idx_left: i8,
        idx_right: i8,
        points: Points,
    ) {
        let score = points.main * points.word_multiplier
            + points.cross
            + env.game_config.num_played_bonus(env.num_played);
        (env.callback)(
            idx_left,
            &env.word_buffer[(idx_left as usize)..(idx_right as usize)],
            score,
            env.rack_tally,
        );
    }

    // touched: the word uses a board tile or forms a crossword (or covers the
    // center on the first move). placed: at least one tile came from the rack.
    fn play<CallbackType: FnMut(i8, &[u8], i16, &[u8])>(
        env: &mut Env<CallbackType>,
        idx: i8,
        p: u32,
        word_len: i8,
        points: Points,
        touched: bool,
        placed: bool,
    ) {
        let dawg = env.dawg;
        let game_config = env.game_config;
        let alphabet = game_config.alphabet();
        let len = env.board.dim().cols;
        if touched
            && placed
            && dawg.accepts(p)
            && (idx == len || env.board.at(env.lane, idx) == 0)
        {
            record(env, idx - word_len, idx, points);
        }
        if idx == len {
            return;
        }

        let b = env.board.at(env.lane, idx);
        if b != 0 {
            // words never start on a board tile.
            if word_len > 0 {
                if let Some(q) = dawg.seek(p, b) {
                    env.word_buffer[idx as usize] = b;
                    play(
                        env,
                        idx + 1,
                        q,
                        word_len + 1,
                        Points {
                            main: points.main + alphabet.score(b) as i16,
                            ..points
                        },
                        true,
                        placed,
                    );
                }
            }
        } else if word_len > 0 || idx == 0 || env.board.at(env.lane, idx - 1) == 0 {
            let this_premium = premium_at(game_config.board_layout(), env.down, env.lane, idx);
            let this_cross_set = env.cross_sets[idx as usize];
            let alphabet_len = alphabet.len() as usize;
            for edge in dawg.edges(p) {
                let tile = edge.tile();
                if env.rack_tally[tile as usize] == 0 {
                    continue;
                }
                let cross_score = if this_cross_set.constrained {
                    if this_cross_set.bits & (1 << tile) == 0 {
                        continue;
                    }
                    Some(env.cross_scores[idx as usize * alphabet_len + tile as usize])
                } else {
                    None
                };
                env.rack_tally[tile as usize] -= 1;
                env.num_played += 1;
                env.word_buffer[idx as usize] = tile;
                play(
                    env,
                    idx + 1,
                    edge.target(),
                    word_len + 1,
                    Points {
                        main: points.main
                            + (alphabet.score(tile) as i16)
                                * (this_premium.letter_multiplier as i16),
                        cross: points.cross + cross_score.unwrap_or(0),
                        word_multiplier: points.word_multiplier
                            * (this_premium.word_multiplier as i16),
                    },
                    touched || cross_score.is_some() || idx == env.center_col,
                    true,
                );
                env.num_played -= 1;
                env.rack_tally[tile as usize] += 1;
            }
        }

        if word_len == 0 {
            // try starting further right.
            play(env, idx + 1, dawg.root(), 0, points, false, false);
        }
    }

    let mut env = Env {
        board,
        game_config: board_snapshot.game_config,
        dawg: board_snapshot.dawg,
        cross_sets,
        cross_scores,
        rack_tally,
        word_buffer,
        callback,
        lane,
        down,
        center_col,
        num_played: 0,
    };
    play(
        &mut env,
        0,
        board_snapshot.dawg.root(),
        0,
        Points {
            main: 0,
            cross: 0,
            word_multiplier: 1,
        },
        false,
        false,
    );
}

pub struct MoveGenerator {
    working_buffer: WorkingBuffer,
    transposed: board::Board,
    pub plays: Vec<Play>,
}

impl MoveGenerator {
    pub fn new(game_config: &game_config::GameConfig) -> Self {
        Self {
            working_buffer: WorkingBuffer::new(game_config),
            transposed: board::Board::new(game_config.board_layout().dim().transpose()),
            plays: Vec::new(),
        }
    }

    // found_place_move(down, row, col, word, score, leave) for every candidate.
    // Across plays come first, row by row, then down plays, column by column.
    pub fn gen_moves<FoundPlaceMove: FnMut(bool, i8, i8, &[u8], i16, &[u8])>(
        &mut self,
        board_snapshot: &BoardSnapshot<'_>,
        rack: &rack::Rack,
        mut found_place_move: FoundPlaceMove,
    ) {
        let board = board_snapshot.board;
        let board_layout = board_snapshot.game_config.board_layout();
        let dim = board.dim();
        self.working_buffer
            .rack_tally
            .copy_from_slice(rack.tally());

        if board.is_empty() {
            let row = board_layout.star_row();
            gen_line_moves(
                board_snapshot,
                board,
                row,
                false,
                board_layout.star_col(),
                &mut self.working_buffer,
                |idx: i8, word: &[u8], score: i16, leave: &[u8]| {
                    found_place_move(false, row, idx, word, score, leave)
                },
            );
            // on a symmetric layout the down plays through the star mirror the across ones.
            if !board_layout.is_symmetric() {
                self.transposed.clone_from(board);
                self.transposed.transpose();
                let col = board_layout.star_col();
                gen_line_moves(
                    board_snapshot,
                    &self.transposed,
                    col,
                    true,
                    board_layout.star_row(),
                    &mut self.working_buffer,
                    |idx: i8, word: &[u8], score: i16, leave: &[u8]| {
                        found_place_move(true, idx, col, word, score, leave)
                    },
                );
            }
            return;
        }

        for row in 0..dim.rows {
            if board.is_row_isolated(row) {
                continue;
            }
            gen_line_moves(
                board_snapshot,
                board,
                row,
                false,
                -1,
                &mut self.working_buffer,
                |idx: i8, word: &[u8], score: i16, leave: &[u8]| {
                    found_place_move(false, row, idx, word, score, leave)
                },
            );
        }

        self.transposed.clone_from(board);
        self.transposed.transpose();
        for col in 0..dim.cols {
            if self.transposed.is_row_isolated(col) {
                continue;
            }
            gen_line_moves(
                board_snapshot,
                &self.transposed,
                col,
                true,
                -1,
                &mut self.working_buffer,
                |idx: i8, word: &[u8], score: i16, leave: &[u8]| {
                    found_place_move(true, idx, col, word, score, leave)
                },
            );
        }
    }

    pub fn gen_moves_alloc(&mut self, board_snapshot: &BoardSnapshot<'_>, rack: &rack::Rack) {
        let mut plays = std::mem::take(&mut self.plays);
        plays.clear();
        self.gen_moves(
            board_snapshot,
            rack,
            |down: bool, row: i8, col: i8, word: &[u8], score: i16, leave: &[u8]| {
                plays.push(Play {
                    down,
                    row,
                    col,
                    word: word.into(),
                    score,
                    leave: leave.into(),
                });
            },
        );
        self.plays = plays;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{build, matrix};

    struct Fixture {
        game_config: game_config::GameConfig,
        reader: alphabet::AlphabetReader,
        dawg: dawg::Dawg,
    }

    impl Fixture {
        fn new(board_layout: board_layout::BoardLayout, words: &[&str]) -> Self {
            let alphabet = alphabet::make_english_alphabet();
            let reader = alphabet::AlphabetReader::new(&alphabet);
            let mut machine_words = words
                .iter()
                .map(|word| reader.read_word(word).unwrap())
                .collect::<Vec<_>>();
            machine_words.sort_unstable();
            let dawg = build::build(&machine_words).unwrap();
            Self {
                game_config: game_config::make_game_config(alphabet, board_layout, 2),
                reader,
                dawg,
            }
        }

        fn board(&self, placements: &[(bool, i8, i8, &str)]) -> board::Board {
            let mut board = board::Board::new(matrix::Dim { rows: 15, cols: 15 });
            for &(down, row, col, word) in placements {
                board.place(down, row, col, &self.reader.read_word(word).unwrap());
            }
            board
        }

        fn rack(&self, s: &str) -> rack::Rack {
            rack::Rack::from_text(self.game_config.alphabet(), &self.reader, s).unwrap()
        }

        fn plays(&self, board: &board::Board, rack: &str) -> Vec<Play> {
            let mut move_generator = MoveGenerator::new(&self.game_config);
            move_generator.gen_moves_alloc(
                &BoardSnapshot {
                    board,
                    game_config: &self.game_config,
                    dawg: &self.dawg,
                },
                &self.rack(rack),
            );
            move_generator.plays
        }

        fn word(&self, play: &Play) -> String {
            self.game_config.alphabet().fmt_rack(&play.word)
        }
    }

    #[test]
    fn test_first_move_covers_center() {
        let fixture = Fixture::new(board_layout::make_plain_board_layout(), &["CAT"]);
        let board = fixture.board(&[]);
        let plays = fixture.plays(&board, "CAT");
        // starting at columns 5, 6 and 7.
        assert_eq!(plays.len(), 3);
        for play in &plays {
            assert!(!play.down);
            assert_eq!(play.row, 7);
            assert!((5..=7).contains(&play.col));
            assert_eq!(fixture.word(play), "CAT");
            assert_eq!(play.score, 5);
            assert!(play.leave.iter().all(|&count| count == 0));
        }
    }

    #[test]
    fn test_first_move_premiums() {
        let fixture = Fixture::new(board_layout::make_standard_board_layout(), &["CAT"]);
        let board = fixture.board(&[]);
        let plays = fixture.plays(&board, "CAT");
        // every placement covers the doubled star and misses the DLS at columns 3 and 11.
        let at = |col: i8| plays.iter().find(|play| play.col == col).unwrap().score;
        assert_eq!(at(5), 10);
        assert_eq!(at(6), 10);
        assert_eq!(at(7), 10);
    }

    #[test]
    fn test_first_move_down_on_asymmetric_layout() {
        // a triple letter above the star, in the star column only.
        let fixture = Fixture::new(
            board_layout::BoardLayout::from_bonuses(
                matrix::Dim { rows: 15, cols: 15 },
                7,
                7,
                &[((5, 7), board_layout::TLS)],
            ),
            &["CAT"],
        );
        let board = fixture.board(&[]);
        let plays = fixture.plays(&board, "CAT");
        assert_eq!(plays.len(), 6);
        assert!(plays.iter().take(3).all(|play| !play.down && play.score == 5));
        let down = plays.iter().filter(|play| play.down).collect::<Vec<_>>();
        assert_eq!(down.len(), 3);
        for play in &down {
            assert_eq!(play.col, 7);
            assert!((5..=7).contains(&play.row));
        }
        // C on the triple letter.
        let best = down.iter().find(|play| play.row == 5).unwrap();
        assert_eq!(best.score, 11);
        assert_eq!(best.fmt(fixture.game_config.alphabet(), &board), "H6 CAT 11");
    }

    #[test]
    fn test_extends_through_crossword() {
        let fixture = Fixture::new(board_layout::make_plain_board_layout(), &["CATS", "SAT"]);
        let board = fixture.board(&[(false, 7, 6, "CAT")]);
        let plays = fixture.plays(&board, "SAT");
        // SAT hooking CATS, and SAT down through the A and through the T.
        assert_eq!(plays.len(), 3);
        assert!(plays.iter().all(|play| play.down && fixture.word(play) == "SAT"));
        let mut through = plays
            .iter()
            .filter(|play| play.score == 3)
            .map(|play| (play.row, play.col))
            .collect::<Vec<_>>();
        through.sort_unstable();
        assert_eq!(through, vec![(5, 8), (6, 7)]);
        let play = plays.iter().max_by_key(|play| play.score).unwrap();
        assert!(play.down);
        assert_eq!((play.row, play.col), (7, 9));
        assert_eq!(fixture.word(play), "SAT");
        // SAT 3, CATS 6.
        assert_eq!(play.score, 9);
        assert_eq!(play.fmt(fixture.game_config.alphabet(), &board), "J8 SAT 9");
    }

    #[test]
    fn test_through_board_tiles() {
        let fixture = Fixture::new(board_layout::make_plain_board_layout(), &["CAT", "SCAT"]);
        let board = fixture.board(&[(false, 7, 6, "CAT")]);
        let plays = fixture.plays(&board, "S");
        assert_eq!(plays.len(), 1);
        let play = &plays[0];
        assert!(!play.down);
        assert_eq!((play.row, play.col), (7, 5));
        assert_eq!(fixture.word(play), "SCAT");
        assert_eq!(play.played_tiles(&board), fixture.reader.read_word("S").unwrap().to_vec());
        assert_eq!(play.score, 6);
        assert_eq!(play.fmt(fixture.game_config.alphabet(), &board), "8F S(CAT) 6");
    }

    #[test]
    fn test_rejects_word_running_into_tile() {
        let fixture = Fixture::new(board_layout::make_plain_board_layout(), &["AT", "TA"]);
        // T above (7, 7), E at (7, 9).
        let board = fixture.board(&[(false, 6, 7, "T"), (false, 7, 9, "E")]);
        let plays = fixture.plays(&board, "AT");
        assert!(!plays.is_empty());
        for play in &plays {
            let (row, col) = play.square(play.word.len() as i8);
            assert!(
                row >= 15 || col >= 15 || board.at(row, col) == 0,
                "{}",
                play.fmt(fixture.game_config.alphabet(), &board)
            );
            assert!(!(play.row == 7 && play.col == 7 && !play.down));
        }
    }

    #[test]
    fn test_invalid_crossword_prunes() {
        let fixture = Fixture::new(board_layout::make_plain_board_layout(), &["AT", "CAT"]);
        let board = fixture.board(&[(false, 7, 6, "CAT")]);
        // under CAT only T fits (AT down), and nothing across in row 8 uses it.
        let plays = fixture.plays(&board, "AT");
        for play in &plays {
            assert!(play.row != 8 || play.down);
        }
    }

    #[test]
    fn test_bingo_bonus() {
        let fixture = Fixture::new(board_layout::make_plain_board_layout(), &["RETAIN", "RETAINS"]);
        let board = fixture.board(&[]);
        let plays = fixture.plays(&board, "RETAINS");
        let seven = plays.iter().find(|play| play.word.len() == 7).unwrap();
        let six = plays.iter().find(|play| play.word.len() == 6).unwrap();
        assert_eq!(six.score, 6);
        assert_eq!(seven.score, 7 + 50);
    }

    #[test]
    fn test_check_crossword_premium() {
        let fixture = Fixture::new(board_layout::make_plain_board_layout(), &["CAT", "CATS"]);
        let board = fixture.board(&[(true, 4, 3, "CAT")]);
        let alphabet = fixture.game_config.alphabet();
        let s = fixture.reader.read_word("S").unwrap()[0];
        let premium = board_layout::Premium {
            word_multiplier: 2,
            letter_multiplier: 3,
        };
        // CATS: 3 + 1 + 1 + 1 * 3, doubled.
        assert_eq!(
            check_crossword(&fixture.dawg, alphabet, &board, 7, 3, s, premium),
            Some(16)
        );
        assert_eq!(
            check_crossword(&fixture.dawg, alphabet, &board, 3, 3, s, premium),
            None
        );
    }
}
