pub mod game;
pub mod player;
pub mod quintet;
