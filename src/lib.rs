#![no_std]

extern crate alloc;

pub use board::*;
pub use constraints::*;
pub use deducer::*;
pub use error::*;
pub use game::*;
pub use generator::*;
pub use guesser::*;
pub use index_set::*;
pub use isle::*;
pub use player_view::*;
pub use types::*;

mod board;
mod constraints;
mod deducer;
mod error;
mod game;
mod generator;
mod guesser;
mod index_set;
mod isle;
mod player_view;
mod types;
