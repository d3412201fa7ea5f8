mod args;
mod commands;
mod config_cmd;
mod setup;
mod util;

pub use args::Cli;
