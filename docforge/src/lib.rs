pub mod cli;
pub mod groq;
pub mod load_config;
pub mod render;
pub mod session;

pub use cli::{run, Cli, Commands, GenerateArgs};
