pub mod config;
pub mod engine;
pub mod error;
pub mod evaluate;
pub mod extract;
pub mod intake;
pub mod io;
pub mod model;
pub mod order;
pub mod render;
pub mod tracker;

pub use error::{CumulateError, Result};
