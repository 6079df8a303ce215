pub mod cli;
pub mod command;
pub mod utils;

pub use anyhow::{anyhow, Context, Result};
