pub mod commands;
pub mod config;
pub mod console;
pub mod http_oracle;

pub use commands::{Command, CommandError};
pub use config::Config;
pub use console::ConsolePresenter;
pub use http_oracle::HttpOracle;
