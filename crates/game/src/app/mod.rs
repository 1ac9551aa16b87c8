pub(crate) mod bootstrap;
mod game_over;
pub(crate) mod loop_runner;
mod overworld;
