// Copyright (C) 2020-2024 Andy Kurnia.

use dawgplay::{dawg, display, error, game_config, game_state, movegen};
use rand::prelude::*;
use std::sync::{Arc, atomic, mpsc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

struct GameResult {
    game_index: usize,
    scores: Box<[i16]>,
    num_turns: usize,
    num_tiles_on_board: usize,
}

fn play_one(
    game_config: &game_config::GameConfig,
    dawg: &dawg::Dawg,
    move_generator: &mut movegen::MoveGenerator,
    seed: u64,
    game_index: usize,
    verbose: bool,
) -> error::Returns<GameResult> {
    // same seed and index, same game.
    let mut rng = rand_chacha::ChaCha20Rng::seed_from_u64(seed);
    rng.set_stream(game_index as u64);
    let mut game_state = game_state::GameState::new(game_config, &mut rng);
    let alphabet = game_config.alphabet();
    let mut num_turns = 0;
    while !game_state.ended {
        if verbose {
            for (i, player) in (1..).zip(game_state.players.iter()) {
                println!(
                    "p{} {:4} {}",
                    i,
                    player.score,
                    alphabet.fmt_rack(&player.rack.tiles())
                );
            }
            println!(
                "pool {:2}, turn: player {}",
                game_state.bag.len(),
                game_state.turn + 1
            );
        }
        let board_before = if verbose {
            Some(game_state.board.clone())
        } else {
            None
        };
        let outcome = game_state.take_turn(move_generator, dawg, &mut rng)?;
        num_turns += 1;
        if let Some(board_before) = board_before {
            match &outcome {
                game_state::TurnOutcome::Place {
                    play,
                    num_exchanged,
                } => {
                    if *num_exchanged > 0 {
                        println!("exchanged {num_exchanged}");
                    }
                    println!("{}", play.fmt(alphabet, &board_before));
                }
                game_state::TurnOutcome::Exchange { num_exchanged } => {
                    println!("exchanged {num_exchanged}, still nothing");
                }
                game_state::TurnOutcome::NoMove => {
                    println!("no move");
                }
            }
            display::print_board(alphabet, game_config.board_layout(), &game_state.board);
        }
    }
    Ok(GameResult {
        game_index,
        scores: game_state.players.iter().map(|player| player.score).collect(),
        num_turns,
        num_tiles_on_board: game_state.board.num_tiles(),
    })
}

fn main() -> error::Returns<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = std::env::args().collect::<Vec<_>>();
    if args.len() < 3 {
        println!(
            "args:
  {} polish|english words.dawg [num_games [seed]]
    self-play with the highest scoring move every turn",
            args.first().map_or("auto", |s| s.as_str())
        );
        return Ok(());
    }
    let game_config = Arc::new(match args[1].as_str() {
        "polish" => game_config::make_polish_game_config(),
        "english" => game_config::make_english_game_config(),
        _ => {
            dawgplay::return_error!(format!("invalid ruleset {:?}", args[1]));
        }
    });
    let dawg = dawg::Dawg::from_bytes_alloc(&std::fs::read(&args[2])?)?;
    dawg.check_alphabet(game_config.alphabet().len())?;
    let dawg = Arc::new(dawg);
    let num_games = match args.get(3) {
        Some(s) => s.parse::<usize>()?,
        None => 1,
    };
    let seed = match args.get(4) {
        Some(s) => s.parse::<u64>()?,
        None => rand::rng().random(),
    };
    let num_threads = num_cpus::get().min(num_games).max(1);
    tracing::info!(num_games, num_threads, seed, "starting");

    let t0 = std::time::Instant::now();
    let next_game_index = Arc::new(atomic::AtomicUsize::new(0));
    let (tx, rx) = mpsc::channel::<GameResult>();
    let handles = (0..num_threads)
        .map(|_| {
            let game_config = Arc::clone(&game_config);
            let dawg = Arc::clone(&dawg);
            let next_game_index = Arc::clone(&next_game_index);
            let tx = tx.clone();
            std::thread::spawn(move || -> error::Returns<()> {
                let mut move_generator = movegen::MoveGenerator::new(&game_config);
                loop {
                    let game_index = next_game_index.fetch_add(1, atomic::Ordering::Relaxed);
                    if game_index >= num_games {
                        break;
                    }
                    let result = play_one(
                        &game_config,
                        &dawg,
                        &mut move_generator,
                        seed,
                        game_index,
                        num_games == 1,
                    )?;
                    if tx.send(result).is_err() {
                        break;
                    }
                }
                Ok(())
            })
        })
        .collect::<Vec<_>>();
    drop(tx);

    let num_players = game_config.num_players() as usize;
    let mut total_scores = vec![0i64; num_players];
    let mut num_wins = vec![0usize; num_players];
    let mut num_draws = 0usize;
    let mut num_done = 0usize;
    for result in rx {
        tracing::debug!(
            game_index = result.game_index,
            scores = ?result.scores,
            num_turns = result.num_turns,
            num_tiles_on_board = result.num_tiles_on_board,
            "game"
        );
        let best = result.scores.iter().copied().max().unwrap_or(0);
        let winners = (0..)
            .zip(result.scores.iter())
            .filter(|&(_, &score)| score == best)
            .map(|(i, _)| i)
            .collect::<Vec<usize>>();
        if winners.len() == 1 {
            num_wins[winners[0]] += 1;
        } else {
            num_draws += 1;
        }
        for (total, &score) in total_scores.iter_mut().zip(result.scores.iter()) {
            *total += score as i64;
        }
        num_done += 1;
    }
    for handle in handles {
        handle
            .join()
            .map_err(|_| error::new("worker panicked".into()))??;
    }

    println!("{num_done} games in {:?}", t0.elapsed());
    for (i, (total, wins)) in (1..).zip(total_scores.iter().zip(num_wins.iter())) {
        println!(
            "p{}: {} wins, average {:.2}",
            i,
            wins,
            *total as f64 / num_done.max(1) as f64
        );
    }
    println!("draws: {num_draws}");
    Ok(())
}
