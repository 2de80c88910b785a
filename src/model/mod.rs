mod common;
mod player;
mod team;

pub use common::*;
pub use player::*;
pub use team::*;
