mod core_cli;

pub use core_cli::{Cli, ClientCommands, Commands};
