// Copyright (C) 2020-2024 Andy Kurnia.

use super::{alphabet, board_layout};

pub struct StaticGameConfig {
    alphabet: alphabet::Alphabet,
    board_layout: board_layout::BoardLayout,
    rack_size: i8,
    num_players: u8,
    num_zeros_to_end: u8,
    exchange_tile_limit: i8, // >= 1
}

pub enum GameConfig {
    Static(StaticGameConfig),
}

impl GameConfig {
    #[inline(always)]
    pub fn alphabet(&self) -> &alphabet::Alphabet {
        match self {
            GameConfig::Static(x) => &x.alphabet,
        }
    }

    #[inline(always)]
    pub fn board_layout(&self) -> &board_layout::BoardLayout {
        match self {
            GameConfig::Static(x) => &x.board_layout,
        }
    }

    #[inline(always)]
    pub fn rack_size(&self) -> i8 {
        match self {
            GameConfig::Static(x) => x.rack_size,
        }
    }

    #[inline(always)]
    pub fn num_players(&self) -> u8 {
        match self {
            GameConfig::Static(x) => x.num_players,
        }
    }

    // consecutive scoreless turns (exchanges included) that end the game.
    #[inline(always)]
    pub fn num_zeros_to_end(&self) -> u8 {
        match self {
            GameConfig::Static(x) => x.num_zeros_to_end,
        }
    }

    #[inline(always)]
    pub fn exchange_tile_limit(&self) -> i8 {
        match self {
            GameConfig::Static(x) => x.exchange_tile_limit,
        }
    }

    #[inline(always)]
    pub fn num_played_bonus(&self, num_played: i8) -> i16 {
        match self {
            GameConfig::Static(x) => {
                // branchless
                50 & -((num_played >= x.rack_size) as i16)
            }
        }
    }
}

pub fn make_game_config(
    alphabet: alphabet::Alphabet,
    board_layout: board_layout::BoardLayout,
    num_players: u8,
) -> GameConfig {
    GameConfig::Static(StaticGameConfig {
        alphabet,
        board_layout,
        rack_size: 7,
        num_players,
        num_zeros_to_end: 6,
        exchange_tile_limit: 7,
    })
}

pub fn make_polish_game_config() -> GameConfig {
    make_game_config(
        alphabet::make_polish_alphabet(),
        board_layout::make_standard_board_layout(),
        2,
    )
}

pub fn make_english_game_config() -> GameConfig {
    make_game_config(
        alphabet::make_english_alphabet(),
        board_layout::make_standard_board_layout(),
        2,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_num_played_bonus() {
        let game_config = make_polish_game_config();
        assert_eq!(game_config.num_played_bonus(6), 0);
        assert_eq!(game_config.num_played_bonus(7), 50);
        assert_eq!(game_config.alphabet().num_tiles(), 98);
        assert_eq!(game_config.num_players(), 2);
    }
}
