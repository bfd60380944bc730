// Copyright (C) 2020-2024 Andy Kurnia.

use super::{bag, board, dawg, error, game_config, move_picker, movegen, rack};
use rand::prelude::*;

#[derive(Clone)]
pub struct GamePlayer {
    pub score: i16,
    pub rack: rack::Rack,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TurnOutcome {
    // num_exchanged is nonzero when nothing fit until the rack was refreshed.
    Place {
        play: movegen::Play,
        num_exchanged: u8,
    },
    Exchange {
        num_exchanged: u8,
    },
    NoMove,
}

#[derive(Clone)]
pub struct GameState<'a> {
    pub game_config: &'a game_config::GameConfig,
    pub players: Box<[GamePlayer]>,
    pub board: board::Board,
    pub bag: bag::Bag,
    pub turn: u8,
    pub num_zeros: u8, // consecutive scoreless turns
    pub ended: bool,
}

impl<'a> GameState<'a> {
    // shuffles a full bag and deals every player a rack.
    pub fn new<R: Rng + ?Sized>(game_config: &'a game_config::GameConfig, rng: &mut R) -> Self {
        let alphabet = game_config.alphabet();
        let mut bag = bag::Bag::new(alphabet);
        bag.shuffle(rng);
        let rack_size = game_config.rack_size() as usize;
        let players = (0..game_config.num_players())
            .map(|_| {
                let mut rack = rack::Rack::new(alphabet);
                bag.replenish(&mut rack, rack_size);
                GamePlayer { score: 0, rack }
            })
            .collect();
        Self {
            game_config,
            players,
            board: board::Board::new(game_config.board_layout().dim()),
            bag,
            turn: 0,
            num_zeros: 0,
            ended: false,
        }
    }

    #[inline(always)]
    pub fn current_player(&self) -> &GamePlayer {
        &self.players[self.turn as usize]
    }

    // the play is trusted to fit the board. only the rack is checked.
    pub fn play(&mut self, play: &movegen::Play) -> error::Returns<()> {
        let played_tiles = play.played_tiles(&self.board);
        let current_player = &mut self.players[self.turn as usize];
        current_player.rack.remove(&played_tiles)?;
        self.board.place(play.down, play.row, play.col, &play.word);
        current_player.score += play.score;
        self.bag.replenish(
            &mut current_player.rack,
            self.game_config.rack_size() as usize,
        );
        Ok(())
    }

    // Returns a random subset of the current rack to the bag after drawing the
    // same number of replacements. Returns how many tiles were swapped.
    pub fn exchange<R: Rng + ?Sized>(&mut self, rng: &mut R) -> error::Returns<u8> {
        let current_player = &mut self.players[self.turn as usize];
        let mut tiles = current_player.rack.tiles();
        tiles.shuffle(rng);
        let num_exchanged = (self.game_config.exchange_tile_limit() as usize)
            .min(tiles.len())
            .min(self.bag.len());
        tiles.truncate(num_exchanged);
        current_player.rack.remove(&tiles)?;
        self.bag.replenish(
            &mut current_player.rack,
            self.game_config.rack_size() as usize,
        );
        self.bag.put_back(rng, &tiles);
        Ok(num_exchanged as u8)
    }

    fn find_best_move(
        &self,
        move_generator: &mut movegen::MoveGenerator,
        dawg: &dawg::Dawg,
    ) -> Option<movegen::Play> {
        move_picker::find_best_move(
            move_generator,
            &movegen::BoardSnapshot {
                board: &self.board,
                game_config: self.game_config,
                dawg,
            },
            &self.current_player().rack,
        )
    }

    pub fn take_turn<R: Rng + ?Sized>(
        &mut self,
        move_generator: &mut movegen::MoveGenerator,
        dawg: &dawg::Dawg,
        rng: &mut R,
    ) -> error::Returns<TurnOutcome> {
        if self.ended {
            return_error!("the game has ended".into());
        }
        let mut best = self.find_best_move(move_generator, dawg);
        let mut num_exchanged = 0;
        if best.is_none() && !self.bag.is_empty() {
            num_exchanged = self.exchange(rng)?;
            best = self.find_best_move(move_generator, dawg);
        }
        let outcome = match best {
            Some(play) => {
                tracing::debug!(
                    turn = self.turn,
                    num_exchanged,
                    play = %play.fmt(self.game_config.alphabet(), &self.board),
                    "place"
                );
                self.play(&play)?;
                TurnOutcome::Place {
                    play,
                    num_exchanged,
                }
            }
            None if num_exchanged > 0 => {
                tracing::debug!(turn = self.turn, num_exchanged, "exchange");
                TurnOutcome::Exchange { num_exchanged }
            }
            None => {
                tracing::debug!(turn = self.turn, "no move");
                TurnOutcome::NoMove
            }
        };

        match &outcome {
            TurnOutcome::Place { play, .. } => {
                if play.score == 0 {
                    self.num_zeros += 1;
                } else {
                    self.num_zeros = 0;
                }
                if self.current_player().rack.is_empty() && self.bag.is_empty() {
                    self.end_game();
                }
            }
            TurnOutcome::Exchange { .. } => {
                self.num_zeros += 1;
            }
            TurnOutcome::NoMove => {
                if self.bag.is_empty() {
                    self.end_game();
                } else {
                    // the bag could not take anything back.
                    self.num_zeros += 1;
                }
            }
        }
        if !self.ended && self.num_zeros >= self.game_config.num_zeros_to_end() {
            self.end_game();
        }
        if !self.ended {
            self.next_turn();
        }
        Ok(outcome)
    }

    // every player loses the face value of their unplayed tiles.
    pub fn end_game(&mut self) {
        let alphabet = self.game_config.alphabet();
        for player in self.players.iter_mut() {
            player.score -= player.rack.score(alphabet);
        }
        self.ended = true;
        tracing::info!(
            scores = ?self.players.iter().map(|player| player.score).collect::<Vec<_>>(),
            tiles_on_board = self.board.num_tiles(),
            "game ended"
        );
    }

    pub fn play_game<R: Rng + ?Sized>(
        &mut self,
        move_generator: &mut movegen::MoveGenerator,
        dawg: &dawg::Dawg,
        rng: &mut R,
    ) -> error::Returns<()> {
        while !self.ended {
            self.take_turn(move_generator, dawg, rng)?;
        }
        Ok(())
    }

    #[inline(always)]
    pub fn next_turn(&mut self) {
        let num_players = self.players.len() as u8;
        self.turn += 1;
        self.turn -= num_players & -((self.turn >= num_players) as i8) as u8;
    }
}
