pub mod cli;
pub mod config;

pub use cli::{Cli, Commands, OutputFormat, SocpCommands, SolverArgs, UcCommands};
pub use config::DaucConfig;
