pub mod cli;
pub mod commands;
pub mod error;

pub use typist_core::{preferences, utils};
