//! CLI library modules for the contes binary.
//!
//! Argument types and command implementations live here so they can be
//! tested without spawning the binary.

pub mod commands;
pub mod output;
pub mod parser;
pub mod utils;
