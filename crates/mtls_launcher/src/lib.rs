pub mod cli;
pub mod command;
pub mod config;
pub mod console;
pub mod dataset;
pub mod logging;
pub mod prompt;
pub mod wizard;
