// Copyright (C) 2020-2024 Andy Kurnia.

use dawgplay::{alphabet, board, dawg, display, error, game_config, move_picker, movegen, rack};
use std::io::Read;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// ruleset: "polish" or "english". this implies alphabet and board too.
// dawg: path of a file written by buildlex.
// rack: letters, e.g. "ŻÓŁW".
// board: one string per row, "-" for empty squares.
// count: how many moves to return, best first.
#[derive(serde::Deserialize)]
struct Question {
    ruleset: String,
    dawg: String,
    rack: String,
    board: Vec<String>,
    #[serde(default = "default_count")]
    count: usize,
}

fn default_count() -> usize {
    1
}

// every tile on the board and on the rack must exist in the bag.
fn check_tile_usage(alphabet: &alphabet::Alphabet, tiles: &[u8]) -> error::Returns<()> {
    let mut available_tally = (0..alphabet.len())
        .map(|tile| alphabet.freq(tile))
        .collect::<Box<_>>();
    for &tile in tiles {
        if available_tally[tile as usize] > 0 {
            available_tally[tile as usize] -= 1;
        } else {
            dawgplay::return_error!(format!(
                "too many tile {} (bag contains only {})",
                alphabet.of(tile).unwrap_or("?"),
                alphabet.freq(tile),
            ));
        }
    }
    Ok(())
}

fn answer(play: &movegen::Play, alphabet: &alphabet::Alphabet) -> serde_json::Value {
    serde_json::json!({
        "action": "play",
        "down": play.down,
        "row": play.row,
        "col": play.col,
        "word": alphabet.fmt_rack(&play.word),
        "score": play.score,
    })
}

fn main() -> error::Returns<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = std::env::args().collect::<Vec<_>>();
    let data = match args.get(1) {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut s = String::new();
            std::io::stdin().read_to_string(&mut s)?;
            s
        }
    };
    let question = serde_json::from_str::<Question>(&data)?;

    let game_config = match question.ruleset.as_str() {
        "polish" => game_config::make_polish_game_config(),
        "english" => game_config::make_english_game_config(),
        _ => {
            dawgplay::return_error!(format!("invalid ruleset {:?}", question.ruleset));
        }
    };
    let dawg = dawg::Dawg::from_bytes_alloc(&std::fs::read(&question.dawg)?)?;
    dawg.check_alphabet(game_config.alphabet().len())?;
    tracing::debug!(
        dawg = %question.dawg,
        nodes = dawg.num_nodes(),
        edges = dawg.num_edges(),
        "loaded"
    );

    let alphabet = game_config.alphabet();
    let alphabet_reader = alphabet::AlphabetReader::new(alphabet);
    let rack = rack::Rack::from_text(alphabet, &alphabet_reader, &question.rack)?;
    if rack.len() > game_config.rack_size() as usize {
        dawgplay::return_error!(format!(
            "rack has {} tiles, at most {} allowed",
            rack.len(),
            game_config.rack_size()
        ));
    }
    let board = board::Board::from_rows(
        &alphabet_reader,
        game_config.board_layout().dim(),
        &question.board,
    )?;
    let mut used_tiles = rack.tiles();
    used_tiles.extend(board.tiles().iter().filter(|&&tile| tile != 0));
    check_tile_usage(alphabet, &used_tiles)?;

    display::print_board(alphabet, game_config.board_layout(), &board);

    let mut move_generator = movegen::MoveGenerator::new(&game_config);
    let board_snapshot = &movegen::BoardSnapshot {
        board: &board,
        game_config: &game_config,
        dawg: &dawg,
    };
    let result = if question.count <= 1 {
        match move_picker::find_best_move(&mut move_generator, board_snapshot, &rack) {
            Some(play) => {
                println!("{}", play.fmt(alphabet, &board));
                vec![answer(&play, alphabet)]
            }
            None => vec![serde_json::json!({ "action": "none" })],
        }
    } else {
        let plays = move_picker::rank_moves(&mut move_generator, board_snapshot, &rack);
        println!("found {} moves", plays.len());
        let mut result = plays
            .iter()
            .take(question.count)
            .map(|play| {
                println!("{}", play.fmt(alphabet, &board));
                answer(play, alphabet)
            })
            .collect::<Vec<_>>();
        if result.is_empty() {
            result.push(serde_json::json!({ "action": "none" }));
        }
        result
    };

    let ret = serde_json::to_string_pretty(&result)?;
    println!("{ret}");

    Ok(())
}
