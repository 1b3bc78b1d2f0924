//! Command implementations for the contes CLI.
//!
//! Each command has its own module exposing `run(args) -> Result<(), String>`.

pub mod config;
pub mod evaluate;
pub mod info;
pub mod predict;
pub mod train;
pub mod validate;
pub mod vectors;

pub use config::{ConfigAction, ConfigArgs};
pub use evaluate::EvaluateArgs;
pub use info::InfoArgs;
pub use predict::PredictArgs;
pub use train::TrainArgs;
pub use validate::ValidateArgs;
pub use vectors::{VectorsAction, VectorsArgs};
