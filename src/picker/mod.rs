//! Pickers gather the tests to run from outside the program.

pub mod command;
pub mod toml;
