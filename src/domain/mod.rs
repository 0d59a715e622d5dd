pub mod cell;
pub mod generator;
pub mod grid;
pub mod physics;
pub mod player;
