// Copyright (C) 2020-2024 Andy Kurnia.

#[macro_use]
pub mod error;

pub mod alphabet;
pub mod bag;
pub mod board;
pub mod board_layout;
pub mod build;
pub mod dawg;
pub mod display;
pub mod game_config;
pub mod game_state;
pub mod matrix;
pub mod move_picker;
pub mod movegen;
pub mod rack;
